mod collector;
pub mod config_reader;
mod io_roster;
pub mod menu;
pub mod report;
pub mod store;
pub mod terminal;

use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

pub use crate::booth::collector::run_voting;
pub use crate::booth::config_reader::*;
pub use crate::booth::io_roster::*;
pub use crate::booth::menu::*;
pub use crate::booth::store::BallotStore;
pub use crate::booth::terminal::{Prompter, Terminal};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BoothError {
    #[snafu(display("File {path} not found"))]
    MissingInput { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningRoster {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    ReadingRoster {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error opening configuration file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error accessing ballot store {path}"))]
    StoreIo {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error encoding a ballot batch"))]
    EncodingBatch { source: serde_json::Error },
    #[snafu(display("Error decoding the ballot batch at line {lineno} of {path}"))]
    DecodingBatch {
        source: serde_json::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error writing report {path}"))]
    WritingReport {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference report {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(
        "Difference detected between the generated report and the reference report {path}"
    ))]
    ReportMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BoothResult<T> = Result<T, BoothError>;

/// Opens the menu on the given terminal. Returns the state at exit.
pub fn run_booth<P: Prompter>(config: BoothConfig, prompter: &mut P) -> BoothResult<AppState> {
    let rules = config.session_rules();
    let delimiter = config.delimiter_byte()?;
    let store = BallotStore::new(config.ballot_store_path());
    info!(
        "run_booth: store {:?}, report {:?}, rules {:?}",
        store.path(),
        config.report_path(),
        rules
    );
    let mut menu = Menu::new(config, store, rules, delimiter);
    let mut state = AppState::default();
    menu.run(&mut state, prompter);
    debug!(
        "run_booth: last batch {:?}",
        state.last_batch.as_ref().map(|b| b.ballots.len())
    );
    Ok(state)
}
