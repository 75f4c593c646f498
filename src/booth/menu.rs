use ballot_box::*;
use colored::{ColoredString, Colorize};

use crate::booth::report::{check_against_reference, render_report, write_report};
use crate::booth::*;

/// Everything the menu actions share between two choices.
#[derive(Debug, Default)]
pub struct AppState {
    pub candidates: Vec<Candidate>,
    pub voters: Vec<Voter>,
    /// The batch of the last voting run of this program.
    pub last_batch: Option<BallotBatch>,
    /// The last results tabulated from the ballot store.
    pub last_tabulation: Option<Vec<StateTabulation>>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MenuAction {
    LoadCandidates,
    LoadVoters,
    StartVoting,
    ShowResults,
    Tabulate,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 6] = [
        MenuAction::LoadCandidates,
        MenuAction::LoadVoters,
        MenuAction::StartVoting,
        MenuAction::ShowResults,
        MenuAction::Tabulate,
        MenuAction::Exit,
    ];

    pub fn from_input(input: &str) -> Option<MenuAction> {
        match input.trim() {
            "1" => Some(MenuAction::LoadCandidates),
            "2" => Some(MenuAction::LoadVoters),
            "3" => Some(MenuAction::StartVoting),
            "4" => Some(MenuAction::ShowResults),
            "5" => Some(MenuAction::Tabulate),
            "6" => Some(MenuAction::Exit),
            _ => None,
        }
    }

    fn label(&self) -> ColoredString {
        match self {
            MenuAction::LoadCandidates => "1 - Load candidates file".green(),
            MenuAction::LoadVoters => "2 - Load voters file".yellow(),
            MenuAction::StartVoting => "3 - Start voting".cyan(),
            MenuAction::ShowResults => "4 - Show results".magenta(),
            MenuAction::Tabulate => "5 - Tabulate votes".red(),
            MenuAction::Exit => "6 - Close program".white(),
        }
    }
}

pub struct Menu {
    config: BoothConfig,
    store: BallotStore,
    rules: SessionRules,
    delimiter: u8,
}

impl Menu {
    pub fn new(config: BoothConfig, store: BallotStore, rules: SessionRules, delimiter: u8) -> Menu {
        Menu {
            config,
            store,
            rules,
            delimiter,
        }
    }

    /// Shows the menu until the operator exits or the input ends.
    pub fn run<P: Prompter>(&mut self, state: &mut AppState, prompter: &mut P) {
        loop {
            prompter.say("\nMenu:");
            for action in MenuAction::ALL.iter() {
                prompter.say(&action.label().to_string());
            }
            let action = match prompter.ask("Choose an option: ") {
                Some(line) => MenuAction::from_input(&line),
                None => {
                    info!("run: input ended, closing the menu");
                    Some(MenuAction::Exit)
                }
            };
            match action {
                Some(MenuAction::Exit) => {
                    prompter.say("Closing the program.");
                    return;
                }
                Some(a) => {
                    debug!("run: action {:?}", a);
                    if let Err(e) = self.dispatch(a, state, prompter) {
                        warn!("run: action {:?} failed: {:?}", a, e);
                        prompter.say(&format!("Error: {}", e).red().to_string());
                    }
                }
                None => prompter.say("Invalid option. Try again."),
            }
        }
    }

    pub fn dispatch<P: Prompter>(
        &mut self,
        action: MenuAction,
        state: &mut AppState,
        prompter: &mut P,
    ) -> BoothResult<()> {
        match action {
            MenuAction::LoadCandidates => self.load_candidates(state, prompter),
            MenuAction::LoadVoters => self.load_voters(state, prompter),
            MenuAction::StartVoting => self.start_voting(state, prompter),
            MenuAction::ShowResults => {
                self.show_results(state, prompter);
                Ok(())
            }
            MenuAction::Tabulate => self.tabulate(state, prompter),
            MenuAction::Exit => Ok(()),
        }
    }

    pub fn load_candidates<P: Prompter>(
        &mut self,
        state: &mut AppState,
        prompter: &mut P,
    ) -> BoothResult<()> {
        let default = self.config.candidates_file.clone();
        let path = match ask_path(prompter, "candidates", default) {
            Some(p) => p,
            None => return Ok(()),
        };
        state.candidates = match read_candidates(&path, self.delimiter) {
            Ok(cs) => cs,
            Err(BoothError::MissingInput { path }) => {
                notice_missing(prompter, &path);
                state.candidates = Vec::new();
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        prompter.say(&format!(
            "Candidates file read successfully ({} candidates).",
            state.candidates.len()
        ));
        Ok(())
    }

    pub fn load_voters<P: Prompter>(
        &mut self,
        state: &mut AppState,
        prompter: &mut P,
    ) -> BoothResult<()> {
        let default = self.config.voters_file.clone();
        let path = match ask_path(prompter, "voters", default) {
            Some(p) => p,
            None => return Ok(()),
        };
        state.voters = match read_voters(&path, self.delimiter) {
            Ok(vs) => vs,
            Err(BoothError::MissingInput { path }) => {
                notice_missing(prompter, &path);
                state.voters = Vec::new();
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        prompter.say(&format!(
            "Voters file read successfully ({} voters).",
            state.voters.len()
        ));
        Ok(())
    }

    /// Runs a voting session and appends its batch to the store.
    pub fn start_voting<P: Prompter>(
        &mut self,
        state: &mut AppState,
        prompter: &mut P,
    ) -> BoothResult<()> {
        if state.candidates.is_empty() || state.voters.is_empty() {
            prompter.say(
                &"The candidates and voters files must be read before the voting starts."
                    .yellow()
                    .to_string(),
            );
            return Ok(());
        }
        let station_state = match prompter.ask("State where the voting station is located: ") {
            Some(s) => s.trim().to_uppercase(),
            None => return Ok(()),
        };
        if station_state.is_empty() {
            prompter.say(
                &"The state of the voting station is required. The voting did not start."
                    .yellow()
                    .to_string(),
            );
            return Ok(());
        }
        let batch = run_voting(
            prompter,
            &state.candidates,
            &state.voters,
            &station_state,
            self.rules,
        );
        let appended = self.store.append(&batch);
        let num_ballots = batch.ballots.len();
        state.last_batch = Some(batch);
        appended?;
        prompter.say(&format!(
            "Voting finished with {} ballots. Results are not available yet.",
            num_ballots
        ));
        Ok(())
    }

    /// Prints the results of the last voting run, without reading the store.
    pub fn show_results<P: Prompter>(&mut self, state: &mut AppState, prompter: &mut P) {
        match &state.last_batch {
            Some(batch) => {
                let results = ballot_box::tabulate(std::slice::from_ref(batch), &state.candidates);
                prompter.say(&render_report(&results));
            }
            None => prompter.say(
                &"There are no counted votes. Run a voting before showing the results."
                    .yellow()
                    .to_string(),
            ),
        }
    }

    /// Counts every batch of the store and writes the report.
    pub fn tabulate<P: Prompter>(
        &mut self,
        state: &mut AppState,
        prompter: &mut P,
    ) -> BoothResult<()> {
        let batches = self.store.load_all()?;
        if batches.is_empty() {
            prompter.say(
                &"There are no stored votes. Run a voting before tabulating."
                    .yellow()
                    .to_string(),
            );
            state.last_tabulation = Some(Vec::new());
            return Ok(());
        }
        if state.candidates.is_empty() {
            prompter.say(
                &"The candidates file must be read before tabulating."
                    .yellow()
                    .to_string(),
            );
            return Ok(());
        }
        let results = ballot_box::tabulate(&batches, &state.candidates);
        let report = render_report(&results);
        let report_path = self.config.report_path();
        write_report(&report_path, &report)?;
        state.last_tabulation = Some(results);
        prompter.say(
            &format!(
                "{} batches counted. Report written to {}.",
                batches.len(),
                report_path
            )
            .green()
            .to_string(),
        );
        if let Some(reference) = self.config.reference_report.as_deref() {
            check_against_reference(&report, reference)?;
            prompter.say("The report matches the reference.");
        }
        Ok(())
    }
}

fn ask_path<P: Prompter>(prompter: &mut P, roster: &str, default: Option<String>) -> Option<String> {
    let prompt = match &default {
        Some(d) => format!("Location of the {} data [{}]: ", roster, d),
        None => format!("Location of the {} data: ", roster),
    };
    let answer = prompter.ask(&prompt)?;
    let answer = answer.trim();
    if answer.is_empty() {
        default
    } else {
        Some(answer.to_string())
    }
}

fn notice_missing<P: Prompter>(prompter: &mut P, path: &str) {
    prompter.say(&format!("File '{}' not found.", path).yellow().to_string());
}
