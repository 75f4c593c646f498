mod config;
pub mod manual;
pub mod session;

use log::{debug, info};

pub use crate::config::*;
pub use crate::session::*;

/// Finds the candidate a voter refers to with a ballot number.
///
/// Candidates of the nationwide office are matched by office and number only. For the
/// other offices, the candidate must also be registered in the state of the voting
/// station: candidates of other states cannot be voted for at this station.
pub fn resolve_candidate<'a>(
    candidates: &'a [Candidate],
    office: Office,
    number: &str,
    station_state: &str,
) -> Option<&'a Candidate> {
    candidates.iter().find(|c| {
        c.office() == Some(office)
            && (office.is_nationwide() || c.state == station_state)
            && c.number == number
    })
}

/// `count / total` as a percentage, 0 when there is nothing to divide by.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Counts the ballots of all the batches, one result per state.
///
/// Batches from the same state are merged. States are reported in the order in which
/// they first appear. Batches without a state are ignored.
///
/// Arguments:
/// * `batches` the ballot batches, as stored
/// * `candidates` the registered candidates. Every state block lists all of them,
/// with a count of zero for the candidates of other states.
pub fn tabulate(batches: &[BallotBatch], candidates: &[Candidate]) -> Vec<StateTabulation> {
    info!(
        "tabulate: processing {:?} batches, {:?} candidates",
        batches.len(),
        candidates.len()
    );
    let mut states: Vec<&str> = Vec::new();
    for batch in batches.iter() {
        if batch.state.is_empty() {
            debug!("tabulate: skipping a batch without state");
            continue;
        }
        if !states.contains(&batch.state.as_str()) {
            states.push(batch.state.as_str());
        }
    }

    states
        .iter()
        .map(|state| {
            let ballots: Vec<&Ballot> = batches
                .iter()
                .filter(|b| b.state == *state)
                .flat_map(|b| b.ballots.iter())
                .collect();
            tabulate_state(state, &ballots, candidates)
        })
        .collect()
}

fn tabulate_state(state: &str, ballots: &[&Ballot], candidates: &[Candidate]) -> StateTabulation {
    let choices: Vec<&VoteChoice> = ballots.iter().flat_map(|b| b.choices().iter()).collect();
    let nominal_votes = choices.iter().filter(|c| c.vote.is_nominal()).count() as u64;
    let blank_votes = choices.iter().filter(|c| c.vote == Vote::Blank).count() as u64;
    let null_votes = choices.iter().filter(|c| c.vote == Vote::Null).count() as u64;

    let candidate_tallies: Vec<CandidateTally> = candidates
        .iter()
        .map(|candidate| {
            let votes = match candidate.office() {
                Some(office) if office.is_nationwide() || candidate.state == state => choices
                    .iter()
                    .filter(|c| {
                        c.office == office
                            && matches!(&c.vote, Vote::Candidate(n) if *n == candidate.number)
                    })
                    .count() as u64,
                // Candidates of another state, or of an unknown office.
                _ => 0,
            };
            CandidateTally {
                candidate: candidate.clone(),
                votes,
                percentage: percentage(votes, nominal_votes),
            }
        })
        .collect();

    debug!(
        "tabulate_state: {}: {} ballots, {} nominal, {} blank, {} null",
        state,
        ballots.len(),
        nominal_votes,
        blank_votes,
        null_votes
    );

    StateTabulation {
        state: state.to_string(),
        eligible_voters: ballots.len() as u64,
        nominal_votes,
        blank_votes,
        null_votes,
        candidates: candidate_tallies,
    }
}
