//! The ballot collection state machine.
//!
//! A [VotingSession] is fed one line of operator input at a time. It never reads from a
//! terminal itself: the caller asks [VotingSession::prompt] what to request next, passes
//! the answer to [VotingSession::feed], and displays the returned events.
//!
//! ```
//! use ballot_box::*;
//!
//! let candidates = vec![Candidate::new("Ana", "10", "PA", "SP", "P")];
//! let voters = vec![Voter {
//!     name: "Rita".to_string(),
//!     id_number: "1".to_string(),
//!     registration_id: "555".to_string(),
//!     municipality: "Santos".to_string(),
//!     state: "SP".to_string(),
//! }];
//! let mut session = VotingSession::new(&candidates, &voters, "SP", SessionRules::DEFAULT_RULES);
//! for line in ["555", "B", "B", "N", "N", "10", "S", "END"] {
//!     session.feed(line);
//! }
//! let batch = session.finish();
//! assert_eq!(batch.ballots.len(), 1);
//! ```

use log::{debug, info, warn};

use crate::config::*;
use crate::resolve_candidate;

/// Closes the batch when typed instead of a registration id.
pub const END_KEYWORD: &str = "END";
/// Discards the ballot in progress.
pub const CANCEL_KEYWORD: &str = "CANCEL";
pub const BLANK_KEYWORD: &str = "B";
pub const NULL_KEYWORD: &str = "N";
pub const CONFIRM_KEYWORD: &str = "S";
pub const REJECT_KEYWORD: &str = "N";

/// What the session is waiting for.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SessionPrompt {
    RegistrationId,
    Vote(Office),
    Confirm(Office, Candidate),
}

/// What happened after an input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SessionEvent {
    VoterIdentified(Voter),
    UnknownVoter(String),
    CandidateFound(Office, Candidate),
    InvalidNumber(Office, String),
    /// The voter did not confirm the candidate. The same office is asked again.
    ChoiceRejected(Office),
    VoteRecorded(Office, Vote),
    /// Carries the number of ballots in the batch so far.
    BallotCast(usize),
    BallotDiscarded,
    RetryLimitReached(Office),
    BatchClosed,
}

#[derive(Eq, PartialEq, Debug, Clone)]
enum Phase {
    Identify,
    Voting {
        voter: Voter,
        choices: Vec<VoteChoice>,
        pending: Option<Candidate>,
        attempts: u32,
    },
    Closed,
}

pub struct VotingSession<'a> {
    candidates: &'a [Candidate],
    voters: &'a [Voter],
    rules: SessionRules,
    batch: BallotBatch,
    phase: Phase,
}

impl<'a> VotingSession<'a> {
    pub fn new(
        candidates: &'a [Candidate],
        voters: &'a [Voter],
        station_state: &str,
        rules: SessionRules,
    ) -> VotingSession<'a> {
        info!(
            "VotingSession: opening station {:?} with {} candidates and {} voters",
            station_state,
            candidates.len(),
            voters.len()
        );
        VotingSession {
            candidates,
            voters,
            rules,
            batch: BallotBatch::new(station_state),
            phase: Phase::Identify,
        }
    }

    pub fn station_state(&self) -> &str {
        &self.batch.state
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// The ballots completed so far.
    pub fn batch(&self) -> &BallotBatch {
        &self.batch
    }

    /// None once the batch is closed.
    pub fn prompt(&self) -> Option<SessionPrompt> {
        match &self.phase {
            Phase::Identify => Some(SessionPrompt::RegistrationId),
            Phase::Voting {
                choices,
                pending: Some(candidate),
                ..
            } => Some(SessionPrompt::Confirm(
                Office::ALL[choices.len()],
                candidate.clone(),
            )),
            Phase::Voting { choices, .. } => Some(SessionPrompt::Vote(Office::ALL[choices.len()])),
            Phase::Closed => None,
        }
    }

    /// Processes one line of input.
    pub fn feed(&mut self, input: &str) -> Vec<SessionEvent> {
        let input = input.trim();
        let phase = std::mem::replace(&mut self.phase, Phase::Closed);
        let (next, events) = match phase {
            Phase::Identify => self.identify(input),
            Phase::Voting {
                voter,
                choices,
                pending,
                attempts,
            } => {
                if input.eq_ignore_ascii_case(CANCEL_KEYWORD) {
                    info!("feed: ballot of {:?} cancelled", voter.registration_id);
                    (Phase::Identify, vec![SessionEvent::BallotDiscarded])
                } else if let Some(candidate) = pending {
                    self.confirm(input, voter, choices, candidate, attempts)
                } else {
                    self.vote(input, voter, choices, attempts)
                }
            }
            Phase::Closed => {
                warn!("feed: input {:?} after the batch was closed", input);
                (Phase::Closed, vec![])
            }
        };
        self.phase = next;
        events
    }

    /// Closes the batch. A ballot in progress is discarded.
    pub fn close(&mut self) -> Vec<SessionEvent> {
        let phase = std::mem::replace(&mut self.phase, Phase::Closed);
        match phase {
            Phase::Closed => vec![],
            Phase::Identify => vec![SessionEvent::BatchClosed],
            Phase::Voting { voter, .. } => {
                warn!(
                    "close: discarding the ballot in progress of {:?}",
                    voter.registration_id
                );
                vec![SessionEvent::BallotDiscarded, SessionEvent::BatchClosed]
            }
        }
    }

    pub fn finish(mut self) -> BallotBatch {
        self.close();
        info!(
            "VotingSession: station {:?} closed with {} ballots",
            self.batch.state,
            self.batch.ballots.len()
        );
        self.batch
    }

    fn identify(&mut self, input: &str) -> (Phase, Vec<SessionEvent>) {
        if input.eq_ignore_ascii_case(END_KEYWORD) {
            return (Phase::Closed, vec![SessionEvent::BatchClosed]);
        }
        match self.voters.iter().find(|v| v.registration_id == input) {
            Some(voter) => {
                debug!("identify: voter {:?} found", voter.registration_id);
                (
                    Phase::Voting {
                        voter: voter.clone(),
                        choices: Vec::with_capacity(Office::ALL.len()),
                        pending: None,
                        attempts: 0,
                    },
                    vec![SessionEvent::VoterIdentified(voter.clone())],
                )
            }
            None => {
                debug!("identify: unknown registration id {:?}", input);
                (
                    Phase::Identify,
                    vec![SessionEvent::UnknownVoter(input.to_string())],
                )
            }
        }
    }

    fn vote(
        &mut self,
        input: &str,
        voter: Voter,
        choices: Vec<VoteChoice>,
        attempts: u32,
    ) -> (Phase, Vec<SessionEvent>) {
        let office = Office::ALL[choices.len()];
        if input.eq_ignore_ascii_case(BLANK_KEYWORD) {
            return self.record(voter, choices, Vote::Blank);
        }
        if input.eq_ignore_ascii_case(NULL_KEYWORD) {
            return self.record(voter, choices, Vote::Null);
        }
        match resolve_candidate(self.candidates, office, input, &self.batch.state) {
            Some(candidate) => (
                Phase::Voting {
                    voter,
                    choices,
                    pending: Some(candidate.clone()),
                    attempts,
                },
                vec![SessionEvent::CandidateFound(office, candidate.clone())],
            ),
            None => {
                let attempts = attempts + 1;
                let invalid = SessionEvent::InvalidNumber(office, input.to_string());
                match self.rules.max_attempts_per_office {
                    Some(max) if attempts >= max => {
                        warn!(
                            "vote: {} invalid attempts for {} by {:?}, discarding the ballot",
                            attempts, office, voter.registration_id
                        );
                        (
                            Phase::Identify,
                            vec![
                                invalid,
                                SessionEvent::RetryLimitReached(office),
                                SessionEvent::BallotDiscarded,
                            ],
                        )
                    }
                    _ => (
                        Phase::Voting {
                            voter,
                            choices,
                            pending: None,
                            attempts,
                        },
                        vec![invalid],
                    ),
                }
            }
        }
    }

    fn confirm(
        &mut self,
        input: &str,
        voter: Voter,
        choices: Vec<VoteChoice>,
        candidate: Candidate,
        attempts: u32,
    ) -> (Phase, Vec<SessionEvent>) {
        if input.eq_ignore_ascii_case(CONFIRM_KEYWORD) {
            self.record(voter, choices, Vote::Candidate(candidate.number))
        } else if input.eq_ignore_ascii_case(REJECT_KEYWORD) {
            let office = Office::ALL[choices.len()];
            (
                Phase::Voting {
                    voter,
                    choices,
                    pending: None,
                    attempts,
                },
                vec![SessionEvent::ChoiceRejected(office)],
            )
        } else {
            // Ask for the confirmation again.
            (
                Phase::Voting {
                    voter,
                    choices,
                    pending: Some(candidate),
                    attempts,
                },
                vec![],
            )
        }
    }

    fn record(
        &mut self,
        voter: Voter,
        mut choices: Vec<VoteChoice>,
        vote: Vote,
    ) -> (Phase, Vec<SessionEvent>) {
        let office = Office::ALL[choices.len()];
        choices.push(VoteChoice {
            office,
            vote: vote.clone(),
        });
        let mut events = vec![SessionEvent::VoteRecorded(office, vote)];
        if choices.len() < Office::ALL.len() {
            return (
                Phase::Voting {
                    voter,
                    choices,
                    pending: None,
                    attempts: 0,
                },
                events,
            );
        }
        match Ballot::new(&self.batch.state, choices) {
            Ok(ballot) => {
                self.batch.ballots.push(ballot);
                debug!(
                    "record: ballot {} cast by {:?}",
                    self.batch.ballots.len(),
                    voter.registration_id
                );
                events.push(SessionEvent::BallotCast(self.batch.ballots.len()));
            }
            Err(e) => {
                // Not reachable: choices are collected in office order.
                warn!("record: invalid ballot: {}", e);
                events.push(SessionEvent::BallotDiscarded);
            }
        }
        (Phase::Identify, events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("Ana", "10", "PA", "RS", "P"),
            Candidate::new("Bruno", "20", "PB", "SP", "E"),
            Candidate::new("Carla", "30", "PC", "RJ", "F"),
        ]
    }

    fn voters() -> Vec<Voter> {
        vec![Voter {
            name: "Rita".to_string(),
            id_number: "12".to_string(),
            registration_id: "555".to_string(),
            municipality: "Santos".to_string(),
            state: "SP".to_string(),
        }]
    }

    fn run(session: &mut VotingSession, lines: &[&str]) -> Vec<SessionEvent> {
        lines.iter().flat_map(|l| session.feed(l)).collect()
    }

    #[test]
    fn full_ballot_scenario() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        let events = run(
            &mut session,
            &["555", "30", "B", "20", "S", "B", "N", "10", "S"],
        );
        assert!(events.contains(&SessionEvent::InvalidNumber(
            Office::FederalDeputy,
            "30".to_string()
        )));
        assert_eq!(events.last(), Some(&SessionEvent::BallotCast(1)));
        assert_eq!(session.prompt(), Some(SessionPrompt::RegistrationId));

        let batch = session.finish();
        assert_eq!(batch.state, "SP");
        let ballot = &batch.ballots[0];
        let votes: Vec<(Office, Vote)> = ballot
            .choices()
            .iter()
            .map(|c| (c.office, c.vote.clone()))
            .collect();
        assert_eq!(
            votes,
            vec![
                (Office::FederalDeputy, Vote::Blank),
                (Office::StateDeputy, Vote::Candidate("20".to_string())),
                (Office::Senator, Vote::Blank),
                (Office::Governor, Vote::Null),
                (Office::President, Vote::Candidate("10".to_string())),
            ]
        );
    }

    #[test]
    fn prompts_follow_office_order() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        session.feed("555");
        for office in Office::ALL {
            assert_eq!(session.prompt(), Some(SessionPrompt::Vote(office)));
            session.feed("n");
        }
        assert_eq!(session.prompt(), Some(SessionPrompt::RegistrationId));
    }

    #[test]
    fn unknown_voter_and_end_keyword() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        assert_eq!(
            session.feed("999"),
            vec![SessionEvent::UnknownVoter("999".to_string())]
        );
        assert_eq!(session.prompt(), Some(SessionPrompt::RegistrationId));
        assert_eq!(session.feed("end"), vec![SessionEvent::BatchClosed]);
        assert!(session.is_closed());
        assert_eq!(session.prompt(), None);
        assert!(session.finish().ballots.is_empty());
    }

    #[test]
    fn candidate_of_other_state_is_invisible() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        session.feed("555");
        // Carla runs for F in RJ.
        assert_eq!(
            session.feed("30"),
            vec![SessionEvent::InvalidNumber(
                Office::FederalDeputy,
                "30".to_string()
            )]
        );
        assert_eq!(
            session.prompt(),
            Some(SessionPrompt::Vote(Office::FederalDeputy))
        );
    }

    #[test]
    fn confirmation_flow() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        session.feed("555");
        session.feed("b");
        let found = session.feed("20");
        assert_eq!(
            found,
            vec![SessionEvent::CandidateFound(
                Office::StateDeputy,
                cs[1].clone()
            )]
        );
        assert_eq!(
            session.prompt(),
            Some(SessionPrompt::Confirm(Office::StateDeputy, cs[1].clone()))
        );
        // Anything else asks again.
        assert!(session.feed("maybe").is_empty());
        assert_eq!(
            session.prompt(),
            Some(SessionPrompt::Confirm(Office::StateDeputy, cs[1].clone()))
        );
        assert_eq!(
            session.feed("N"),
            vec![SessionEvent::ChoiceRejected(Office::StateDeputy)]
        );
        assert_eq!(
            session.prompt(),
            Some(SessionPrompt::Vote(Office::StateDeputy))
        );
        session.feed("20");
        assert_eq!(
            session.feed("s"),
            vec![SessionEvent::VoteRecorded(
                Office::StateDeputy,
                Vote::Candidate("20".to_string())
            )]
        );
    }

    #[test]
    fn cancel_discards_ballot() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        run(&mut session, &["555", "B", "20"]);
        assert_eq!(
            session.feed("cancel"),
            vec![SessionEvent::BallotDiscarded]
        );
        assert_eq!(session.prompt(), Some(SessionPrompt::RegistrationId));
        run(&mut session, &["555", "B", "B", "B", "B", "B"]);
        let batch = session.finish();
        assert_eq!(batch.ballots.len(), 1);
    }

    #[test]
    fn retry_limit_discards_ballot() {
        let (cs, vs) = (candidates(), voters());
        let rules = SessionRules {
            max_attempts_per_office: Some(2),
        };
        let mut session = VotingSession::new(&cs, &vs, "SP", rules);
        run(&mut session, &["555", "1"]);
        let events = session.feed("2");
        assert_eq!(
            events,
            vec![
                SessionEvent::InvalidNumber(Office::FederalDeputy, "2".to_string()),
                SessionEvent::RetryLimitReached(Office::FederalDeputy),
                SessionEvent::BallotDiscarded,
            ]
        );
        assert_eq!(session.prompt(), Some(SessionPrompt::RegistrationId));
    }

    #[test]
    fn attempts_reset_between_offices() {
        let (cs, vs) = (candidates(), voters());
        let rules = SessionRules {
            max_attempts_per_office: Some(2),
        };
        let mut session = VotingSession::new(&cs, &vs, "SP", rules);
        let events = run(&mut session, &["555", "1", "B", "1", "B", "B", "B", "B"]);
        assert!(!events.contains(&SessionEvent::BallotDiscarded));
        assert_eq!(session.finish().ballots.len(), 1);
    }

    #[test]
    fn close_discards_ballot_in_progress() {
        let (cs, vs) = (candidates(), voters());
        let mut session = VotingSession::new(&cs, &vs, "SP", SessionRules::DEFAULT_RULES);
        run(&mut session, &["555", "B", "B", "B", "B", "B", "555", "N"]);
        assert_eq!(
            session.close(),
            vec![SessionEvent::BallotDiscarded, SessionEvent::BatchClosed]
        );
        assert!(session.feed("555").is_empty());
        assert_eq!(session.finish().ballots.len(), 1);
    }
}
