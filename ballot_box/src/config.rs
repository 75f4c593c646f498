// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The name given to candidates whose office code is not one of the five known codes.
pub const UNKNOWN_OFFICE: &str = "Unknown Office";

/// The five offices on a ballot.
///
/// The declaration order is the order in which a voter is asked for a vote, and the
/// order of the choices inside a [Ballot].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Office {
    #[serde(rename = "F")]
    FederalDeputy,
    #[serde(rename = "E")]
    StateDeputy,
    #[serde(rename = "S")]
    Senator,
    #[serde(rename = "G")]
    Governor,
    #[serde(rename = "P")]
    President,
}

impl Office {
    pub const ALL: [Office; 5] = [
        Office::FederalDeputy,
        Office::StateDeputy,
        Office::Senator,
        Office::Governor,
        Office::President,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Office::FederalDeputy => "F",
            Office::StateDeputy => "E",
            Office::Senator => "S",
            Office::Governor => "G",
            Office::President => "P",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Office::FederalDeputy => "Federal Deputy",
            Office::StateDeputy => "State Deputy",
            Office::Senator => "Senator",
            Office::Governor => "Governor",
            Office::President => "President",
        }
    }

    pub fn from_code(code: &str) -> Option<Office> {
        Office::ALL.iter().copied().find(|o| o.code() == code)
    }

    /// Candidates for a nationwide office are not scoped to a state.
    pub fn is_nationwide(&self) -> bool {
        matches!(self, Office::President)
    }

    /// The full name for a raw office code, or [UNKNOWN_OFFICE].
    pub fn full_name_for_code(code: &str) -> &'static str {
        Office::from_code(code)
            .map(|o| o.full_name())
            .unwrap_or(UNKNOWN_OFFICE)
    }
}

impl Display for Office {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    /// The number typed by the voter. Kept as text, as read from the roster.
    pub number: String,
    pub party: String,
    pub state: String,
    pub office_code: String,
    pub office_name: String,
}

impl Candidate {
    pub fn new(name: &str, number: &str, party: &str, state: &str, office_code: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            number: number.to_string(),
            party: party.to_string(),
            state: state.to_string(),
            office_code: office_code.to_string(),
            office_name: Office::full_name_for_code(office_code).to_string(),
        }
    }

    /// None if the candidate was registered with an unknown office code.
    pub fn office(&self) -> Option<Office> {
        Office::from_code(&self.office_code)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Voter {
    pub name: String,
    pub id_number: String,
    pub registration_id: String,
    pub municipality: String,
    pub state: String,
}

/// What a voter chose for one office.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub enum Vote {
    /// The ballot number of a confirmed candidate.
    Candidate(String),
    Blank,
    Null,
}

impl Vote {
    pub fn is_nominal(&self) -> bool {
        matches!(self, Vote::Candidate(_))
    }
}

impl Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vote::Candidate(number) => write!(f, "{}", number),
            Vote::Blank => write!(f, "Blank"),
            Vote::Null => write!(f, "Null"),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
pub struct VoteChoice {
    pub office: Office,
    pub vote: Vote,
}

/// The choices of one voter.
///
/// Invariant: exactly one choice per office, in the order of [Office::ALL].
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "UncheckedBallot")]
pub struct Ballot {
    state: String,
    choices: Vec<VoteChoice>,
}

impl Ballot {
    pub fn new(state: &str, choices: Vec<VoteChoice>) -> Result<Ballot, BallotError> {
        if choices.len() != Office::ALL.len() {
            return Err(BallotError::IncompleteBallot {
                found: choices.len(),
            });
        }
        for (position, (choice, expected)) in choices.iter().zip(Office::ALL.iter()).enumerate() {
            if choice.office != *expected {
                return Err(BallotError::OfficeOutOfOrder {
                    position,
                    expected: *expected,
                    found: choice.office,
                });
            }
        }
        Ok(Ballot {
            state: state.to_string(),
            choices,
        })
    }

    /// The state of the voting station.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn choices(&self) -> &[VoteChoice] {
        &self.choices
    }

    pub fn vote_for(&self, office: Office) -> &Vote {
        // The constructor guarantees one choice per office, at the office position.
        &self.choices[office as usize].vote
    }
}

#[derive(Deserialize)]
struct UncheckedBallot {
    state: String,
    choices: Vec<VoteChoice>,
}

impl TryFrom<UncheckedBallot> for Ballot {
    type Error = BallotError;
    fn try_from(value: UncheckedBallot) -> Result<Self, Self::Error> {
        Ballot::new(&value.state, value.choices)
    }
}

/// All the ballots cast during one voting run at one station.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotBatch {
    pub state: String,
    pub ballots: Vec<Ballot>,
}

impl BallotBatch {
    pub fn new(state: &str) -> BallotBatch {
        BallotBatch {
            state: state.to_string(),
            ballots: Vec::new(),
        }
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct CandidateTally {
    pub candidate: Candidate,
    pub votes: u64,
    /// Share of the nominal votes of the state, between 0 and 100.
    pub percentage: f64,
}

/// The outcome of the tabulation for one state.
#[derive(PartialEq, Debug, Clone)]
pub struct StateTabulation {
    pub state: String,
    /// The number of ballots recorded for this state.
    pub eligible_voters: u64,
    pub nominal_votes: u64,
    pub blank_votes: u64,
    pub null_votes: u64,
    /// One entry for every registered candidate, in roster order.
    pub candidates: Vec<CandidateTally>,
}

impl StateTabulation {
    pub fn total_choices(&self) -> u64 {
        self.nominal_votes + self.blank_votes + self.null_votes
    }

    /// Blank votes are measured against the eligible voters, not the nominal votes.
    pub fn blank_percentage(&self) -> f64 {
        crate::percentage(self.blank_votes, self.eligible_voters)
    }

    pub fn null_percentage(&self) -> f64 {
        crate::percentage(self.null_votes, self.eligible_voters)
    }
}

/// Errors raised when building a ballot that breaks its invariant.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum BallotError {
    IncompleteBallot {
        found: usize,
    },
    OfficeOutOfOrder {
        position: usize,
        expected: Office,
        found: Office,
    },
}

impl Error for BallotError {}

impl Display for BallotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotError::IncompleteBallot { found } => write!(
                f,
                "a ballot needs {} choices, found {}",
                Office::ALL.len(),
                found
            ),
            BallotError::OfficeOutOfOrder {
                position,
                expected,
                found,
            } => write!(
                f,
                "choice {} should be for {}, found {}",
                position, expected, found
            ),
        }
    }
}

// ********* Configuration **********

/// Limits applied while collecting votes.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct SessionRules {
    /// Number of invalid candidate numbers accepted for one office before the
    /// ballot is discarded. None for no limit.
    pub max_attempts_per_office: Option<u32>,
}

impl SessionRules {
    pub const DEFAULT_RULES: SessionRules = SessionRules {
        max_attempts_per_office: None,
    };
}
