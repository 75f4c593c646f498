// Runs a voting session on a terminal.

use ballot_box::*;
use colored::Colorize;

use crate::booth::*;

fn prompt_text(prompt: &SessionPrompt) -> String {
    match prompt {
        SessionPrompt::RegistrationId => format!(
            "Voter registration id (or '{}' to close the voting): ",
            END_KEYWORD
        ),
        SessionPrompt::Vote(office) => format!(
            "Vote for {} ('{}' for blank, '{}' for null, '{}' to discard the ballot): ",
            office, BLANK_KEYWORD, NULL_KEYWORD, CANCEL_KEYWORD
        ),
        SessionPrompt::Confirm(_, _) => format!(
            "Confirm ({} or {})? ",
            CONFIRM_KEYWORD, REJECT_KEYWORD
        ),
    }
}

fn event_text(event: &SessionEvent) -> Option<String> {
    let s = match event {
        SessionEvent::VoterIdentified(v) => format!("\nVoter: {} | State: {}", v.name, v.state),
        SessionEvent::UnknownVoter(id) => {
            format!("Registration id {} not found.", id).yellow().to_string()
        }
        SessionEvent::CandidateFound(office, c) => {
            format!("Candidate {}: {} | {}", office, c.name, c.party)
        }
        SessionEvent::InvalidNumber(_, _) => "Incorrect candidate number. Please enter it again."
            .yellow()
            .to_string(),
        SessionEvent::ChoiceRejected(_) => "Please enter the candidate number again.".to_string(),
        SessionEvent::VoteRecorded(_, _) => "\nVote registered successfully!\n".green().to_string(),
        SessionEvent::BallotCast(n) => format!("Ballot {} cast.", n),
        SessionEvent::BallotDiscarded => "Ballot discarded.".red().to_string(),
        SessionEvent::RetryLimitReached(office) => {
            format!("Too many invalid numbers for {}.", office)
                .red()
                .to_string()
        }
        SessionEvent::BatchClosed => return None,
    };
    Some(s)
}

/// Collects ballots until the operator types the end keyword or the input ends.
pub fn run_voting<P: Prompter>(
    prompter: &mut P,
    candidates: &[Candidate],
    voters: &[Voter],
    station_state: &str,
    rules: SessionRules,
) -> BallotBatch {
    let mut session = VotingSession::new(candidates, voters, station_state, rules);
    while let Some(prompt) = session.prompt() {
        let events = match prompter.ask(&prompt_text(&prompt)) {
            Some(line) => session.feed(&line),
            None => {
                warn!("run_voting: input ended during the voting");
                session.close()
            }
        };
        for event in events.iter() {
            debug!("run_voting: {:?}", event);
            if let Some(text) = event_text(event) {
                prompter.say(&text);
            }
        }
    }
    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn voting_on_a_terminal() {
        let candidates = vec![
            Candidate::new("Ana", "10", "PA", "RS", "P"),
            Candidate::new("Bruno", "20", "PB", "SP", "E"),
        ];
        let voters = vec![Voter {
            name: "Rita".to_string(),
            id_number: "12".to_string(),
            registration_id: "555".to_string(),
            municipality: "Santos".to_string(),
            state: "SP".to_string(),
        }];
        let input = "777\n555\n30\nB\n20\nS\nB\nN\n10\nS\n555\nB\n";
        let mut t = Terminal::new(Cursor::new(input), Vec::new());
        let batch = run_voting(&mut t, &candidates, &voters, "SP", SessionRules::DEFAULT_RULES);
        // The second ballot was not finished when the input ended.
        assert_eq!(batch.ballots.len(), 1);
        assert_eq!(
            batch.ballots[0].vote_for(Office::President),
            &Vote::Candidate("10".to_string())
        );
        let out = String::from_utf8(t.into_output()).unwrap();
        assert!(out.contains("Registration id 777 not found."));
        assert!(out.contains("Voter: Rita | State: SP"));
        assert!(out.contains("Candidate State Deputy: Bruno | PB"));
        assert!(out.contains("Incorrect candidate number."));
        assert!(out.contains("Ballot discarded."));
    }
}
