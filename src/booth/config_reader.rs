use crate::booth::*;

use ballot_box::SessionRules;
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_BALLOT_STORE: &str = "ballots.jsonl";
pub const DEFAULT_REPORT: &str = "ballot_report.txt";

/// The content of the JSON configuration file. Every entry is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoothConfig {
    #[serde(rename = "candidatesFile")]
    pub candidates_file: Option<String>,
    #[serde(rename = "votersFile")]
    pub voters_file: Option<String>,
    #[serde(rename = "ballotStore")]
    pub ballot_store: Option<String>,
    #[serde(rename = "reportFile")]
    pub report_file: Option<String>,
    #[serde(rename = "referenceReport")]
    pub reference_report: Option<String>,
    pub delimiter: Option<String>,
    #[serde(rename = "maxAttemptsPerOffice")]
    pub max_attempts_per_office: Option<u32>,
}

impl BoothConfig {
    pub fn ballot_store_path(&self) -> String {
        self.ballot_store
            .clone()
            .unwrap_or_else(|| DEFAULT_BALLOT_STORE.to_string())
    }

    pub fn report_path(&self) -> String {
        self.report_file
            .clone()
            .unwrap_or_else(|| DEFAULT_REPORT.to_string())
    }

    /// The roster field separator, a comma by default.
    pub fn delimiter_byte(&self) -> BoothResult<u8> {
        match self.delimiter.as_deref() {
            None => Ok(b','),
            Some(d) if d.len() == 1 && d.is_ascii() => Ok(d.as_bytes()[0]),
            Some(d) => whatever!("delimiter must be a single ASCII character, got {:?}", d),
        }
    }

    pub fn session_rules(&self) -> SessionRules {
        SessionRules {
            max_attempts_per_office: self.max_attempts_per_office.filter(|x| *x > 0),
        }
    }

    /// Values given on the command line replace the ones of the file.
    pub fn with_overrides(self, args: &crate::args::Args) -> BoothConfig {
        BoothConfig {
            candidates_file: args.candidates.clone().or(self.candidates_file),
            voters_file: args.voters.clone().or(self.voters_file),
            ballot_store: args.store.clone().or(self.ballot_store),
            report_file: args.out.clone().or(self.report_file),
            reference_report: args.reference.clone().or(self.reference_report),
            delimiter: self.delimiter,
            max_attempts_per_office: self.max_attempts_per_office,
        }
    }
}

pub fn read_config(path: &str) -> BoothResult<BoothConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: BoothConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    info!("read_config: {:?}", config);
    Ok(config)
}
