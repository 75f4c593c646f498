use std::fmt::Write as FmtWrite;
use std::fs;

use ballot_box::StateTabulation;
use text_diff::print_diff;

use crate::booth::*;

/// Renders the results, one block per state.
pub fn render_report(results: &[StateTabulation]) -> String {
    let mut out = String::new();
    for st in results.iter() {
        write_state_block(&mut out, st).expect("writing into a String");
    }
    out
}

fn write_state_block(out: &mut String, st: &StateTabulation) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "Results for state {}:", st.state)?;
    writeln!(out, "Eligible voters: {}", st.eligible_voters)?;
    writeln!(out, "Total nominal votes: {}", st.nominal_votes)?;
    writeln!(out, "Blank: {}", st.blank_votes)?;
    writeln!(out, "Null: {}", st.null_votes)?;
    writeln!(out)?;
    writeln!(out, "Results:")?;
    for tally in st.candidates.iter() {
        writeln!(
            out,
            "Candidate: {} | Office: {} | State: {} | Votes: {} ({:.2}%)",
            tally.candidate.name,
            tally.candidate.office_name,
            st.state,
            tally.votes,
            tally.percentage
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Blank votes: {} ({:.2}%)",
        st.blank_votes,
        st.blank_percentage()
    )?;
    writeln!(
        out,
        "Null votes: {} ({:.2}%)",
        st.null_votes,
        st.null_percentage()
    )?;
    Ok(())
}

pub fn write_report(path: &str, report: &str) -> BoothResult<()> {
    fs::write(path, report).context(WritingReportSnafu { path })?;
    info!("write_report: {} bytes written to {:?}", report.len(), path);
    Ok(())
}

/// Compares a report with a reference file. The differences are printed.
pub fn check_against_reference(report: &str, reference_path: &str) -> BoothResult<()> {
    let reference =
        fs::read_to_string(reference_path).context(ReadingReferenceSnafu {
            path: reference_path,
        })?;
    if reference != report {
        warn!("Found differences with the reference report {:?}", reference_path);
        print_diff(reference.as_str(), report, "\n");
        return ReportMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("check_against_reference: report matches {:?}", reference_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_box::{tabulate, Ballot, BallotBatch, Candidate, Office, Vote, VoteChoice};

    fn results() -> Vec<StateTabulation> {
        let candidates = vec![
            Candidate::new("Ana", "10", "PA", "SP", "P"),
            Candidate::new("Bruno", "20", "PB", "RJ", "E"),
        ];
        let votes = [
            Vote::Blank,
            Vote::Blank,
            Vote::Blank,
            Vote::Null,
            Vote::Candidate("10".to_string()),
        ];
        let choices = Office::ALL
            .iter()
            .zip(votes)
            .map(|(o, vote)| VoteChoice { office: *o, vote })
            .collect();
        let mut batch = BallotBatch::new("SP");
        batch.ballots.push(Ballot::new("SP", choices).unwrap());
        tabulate(&[batch], &candidates)
    }

    const EXPECTED: &str = "
Results for state SP:
Eligible voters: 1
Total nominal votes: 1
Blank: 3
Null: 1

Results:
Candidate: Ana | Office: President | State: SP | Votes: 1 (100.00%)
Candidate: Bruno | Office: State Deputy | State: SP | Votes: 0 (0.00%)

Blank votes: 3 (300.00%)
Null votes: 1 (100.00%)
";

    #[test]
    fn report_layout() {
        assert_eq!(render_report(&results()), EXPECTED);
        assert_eq!(render_report(&[]), "");
    }

    #[test]
    fn reference_comparison() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference.txt");
        let reference = reference.to_str().unwrap();
        write_report(reference, EXPECTED).unwrap();
        assert!(check_against_reference(&render_report(&results()), reference).is_ok());

        let res = check_against_reference("something else\n", reference);
        assert!(matches!(res, Err(BoothError::ReportMismatch { .. })));

        let res = check_against_reference(EXPECTED, "/no/such/reference.txt");
        assert!(matches!(res, Err(BoothError::ReadingReference { .. })));
    }
}
