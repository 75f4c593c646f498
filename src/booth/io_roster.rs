// Primitives for reading the candidate and voter rosters.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};

use ballot_box::{Candidate, Voter};
use csv::StringRecord;

use crate::booth::*;

/// Records with fewer fields are skipped. The first field is not used.
pub const MIN_RECORD_FIELDS: usize = 6;

pub fn read_candidates(path: &str, delimiter: u8) -> BoothResult<Vec<Candidate>> {
    let file = open_roster(path)?;
    let res = parse_candidates(file, delimiter, path)?;
    info!("read_candidates: {} candidates read from {:?}", res.len(), path);
    Ok(res)
}

pub fn read_voters(path: &str, delimiter: u8) -> BoothResult<Vec<Voter>> {
    let file = open_roster(path)?;
    let res = parse_voters(file, delimiter, path)?;
    info!("read_voters: {} voters read from {:?}", res.len(), path);
    Ok(res)
}

pub fn parse_candidates<R: Read>(
    rdr: R,
    delimiter: u8,
    path: &str,
) -> BoothResult<Vec<Candidate>> {
    parse_records(rdr, delimiter, path, |line| {
        Candidate::new(
            field(line, 1),
            field(line, 2),
            field(line, 3),
            field(line, 4),
            field(line, 5),
        )
    })
}

pub fn parse_voters<R: Read>(rdr: R, delimiter: u8, path: &str) -> BoothResult<Vec<Voter>> {
    parse_records(rdr, delimiter, path, |line| Voter {
        name: field(line, 1).to_string(),
        id_number: field(line, 2).to_string(),
        registration_id: field(line, 3).to_string(),
        municipality: field(line, 4).to_string(),
        state: field(line, 5).to_string(),
    })
}

fn open_roster(path: &str) -> BoothResult<File> {
    match File::open(path) {
        Ok(f) => Ok(f),
        Err(e) if e.kind() == ErrorKind::NotFound => MissingInputSnafu { path }.fail(),
        Err(e) => Err(e).context(OpeningRosterSnafu { path }),
    }
}

fn parse_records<R: Read, T>(
    rdr: R,
    delimiter: u8,
    path: &str,
    build: impl Fn(&StringRecord) -> T,
) -> BoothResult<Vec<T>> {
    // One record per line. Quotes are plain text and never span lines.
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .delimiter(delimiter);

    let mut res: Vec<T> = Vec::new();
    for (idx, bytes_r) in BufReader::new(rdr).split(b'\n').enumerate() {
        let lineno = (idx + 1) as u64;
        let bytes = bytes_r
            .map_err(csv::Error::from)
            .context(ReadingRosterSnafu { path, lineno })?;
        let line = match builder.from_reader(bytes.as_slice()).records().next() {
            Some(line_r) => line_r.context(ReadingRosterSnafu { path, lineno })?,
            // Blank line.
            None => continue,
        };
        if line.len() < MIN_RECORD_FIELDS {
            debug!(
                "parse_records: {}:{}: skipping record with {} fields",
                path,
                lineno,
                line.len()
            );
            continue;
        }
        res.push(build(&line));
    }
    Ok(res)
}

fn field(line: &StringRecord, idx: usize) -> &str {
    line.get(idx).unwrap_or("")
}
