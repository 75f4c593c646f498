//! The ballot store: one JSON document per line, one line per ballot batch.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use ballot_box::BallotBatch;

use crate::booth::*;

pub struct BallotStore {
    path: PathBuf,
}

impl BallotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> BallotStore {
        BallotStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// Adds a batch at the end of the store. The store is created if needed.
    pub fn append(&self, batch: &BallotBatch) -> BoothResult<()> {
        let path = self.display_path();
        let line = serde_json::to_string(batch).context(EncodingBatchSnafu {})?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .context(StoreIoSnafu { path: path.clone() })?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", line).context(StoreIoSnafu { path: path.clone() })?;
        writer.flush().context(StoreIoSnafu { path: path.clone() })?;
        info!(
            "append: batch of {} ballots for {:?} appended to {:?}",
            batch.ballots.len(),
            batch.state,
            path
        );
        Ok(())
    }

    /// All the stored batches, in the order they were appended.
    ///
    /// A missing store is the same as an empty one.
    pub fn load_all(&self) -> BoothResult<Vec<BallotBatch>> {
        let path = self.display_path();
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("load_all: no ballot store at {:?}", path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context(StoreIoSnafu { path }),
        };

        let mut res: Vec<BallotBatch> = Vec::new();
        for (idx, line_r) in BufReader::new(file).lines().enumerate() {
            let lineno = (idx + 1) as u64;
            let line = line_r.context(StoreIoSnafu { path: path.clone() })?;
            if line.trim().is_empty() {
                continue;
            }
            let batch: BallotBatch = serde_json::from_str(&line).context(DecodingBatchSnafu {
                path: path.clone(),
                lineno,
            })?;
            debug!(
                "load_all: line {}: batch of {} ballots for {:?}",
                lineno,
                batch.ballots.len(),
                batch.state
            );
            res.push(batch);
        }
        info!("load_all: {} batches loaded from {:?}", res.len(), path);
        Ok(res)
    }

    /// Replaces the whole content of the store with a single batch.
    ///
    /// The batch is written to a temporary file next to the store, which is then renamed.
    pub fn overwrite(&self, batch: &BallotBatch) -> BoothResult<()> {
        let path = self.display_path();
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let line = serde_json::to_string(batch).context(EncodingBatchSnafu {})?;
        let file = File::create(&tmp_path).context(StoreIoSnafu { path: path.clone() })?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", line).context(StoreIoSnafu { path: path.clone() })?;
        writer.flush().context(StoreIoSnafu { path: path.clone() })?;
        drop(writer);
        fs::rename(&tmp_path, &self.path).context(StoreIoSnafu { path: path.clone() })?;
        warn!(
            "overwrite: store {:?} replaced by a batch of {} ballots for {:?}",
            path,
            batch.ballots.len(),
            batch.state
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_box::{Ballot, Office, Vote, VoteChoice};

    fn batch(state: &str, votes: &[Vote]) -> BallotBatch {
        let mut b = BallotBatch::new(state);
        for v in votes {
            let choices = Office::ALL
                .iter()
                .map(|o| VoteChoice {
                    office: *o,
                    vote: v.clone(),
                })
                .collect();
            b.ballots.push(Ballot::new(state, choices).unwrap());
        }
        b
    }

    #[test]
    fn missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BallotStore::new(dir.path().join("ballots.jsonl"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn append_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = BallotStore::new(dir.path().join("ballots.jsonl"));
        let batches = vec![
            batch("SP", &[Vote::Blank, Vote::Candidate("10".to_string())]),
            batch("RJ", &[]),
            batch("SP", &[Vote::Null]),
        ];
        for b in batches.iter() {
            store.append(b).unwrap();
        }
        assert_eq!(store.load_all().unwrap(), batches);

        // A second handle on the same file sees the same content.
        let again = BallotStore::new(store.path());
        again.append(&batches[1]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 4);
    }

    #[test]
    fn overwrite_replaces_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = BallotStore::new(dir.path().join("ballots.jsonl"));
        store.append(&batch("SP", &[Vote::Blank])).unwrap();
        store.append(&batch("RJ", &[Vote::Null])).unwrap();
        let replacement = batch("MG", &[Vote::Blank, Vote::Null]);
        store.overwrite(&replacement).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![replacement.clone()]);
        store.append(&batch("SP", &[])).unwrap();
        assert_eq!(store.load_all().unwrap()[0], replacement);
    }

    #[test]
    fn corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ballots.jsonl");
        let store = BallotStore::new(&path);
        store.append(&batch("SP", &[Vote::Blank])).unwrap();
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("\n{\"state\":\"RJ\",\"ballo\n");
        fs::write(&path, content).unwrap();
        let res = store.load_all();
        assert!(matches!(
            res,
            Err(BoothError::DecodingBatch { lineno: 3, .. })
        ));
    }
}
