use clap::Parser;

/// This is a terminal voting booth: it loads the candidate and voter rosters, collects
/// ballots for five offices and tabulates the results per state.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The options below override its content.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The default location of the candidates roster, used when the prompt is left empty.
    #[clap(long, value_parser)]
    pub candidates: Option<String>,

    /// (file path) The default location of the voters roster, used when the prompt is left empty.
    #[clap(long, value_parser)]
    pub voters: Option<String>,

    /// (file path, default ballots.jsonl) The ballot store. Every voting run is appended to it.
    #[clap(short, long, value_parser)]
    pub store: Option<String>,

    /// (file path, default ballot_report.txt) Where the tabulation report is written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report. If provided, the tabulated report is compared to it
    /// and the differences are printed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
