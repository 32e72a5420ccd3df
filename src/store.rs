//! Per-feed state files and new-item detection.
//!
//! Each feed keeps one plain-text file, `<dir>/r_<name>.log`, holding the
//! URLs seen on the most recent run, one per line.  A run reads the file,
//! overwrites it with the freshly fetched URLs, and reports every fetched
//! URL that was not in the old file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// State files rooted in one directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the state file for `feed`.
    pub fn path_for(&self, feed: &str) -> PathBuf {
        self.dir.join(format!("r_{feed}.log"))
    }

    /// Replace the stored URLs for `feed` with `current` and return the
    /// entries of `current` that were not stored before.
    ///
    /// The old file is read in full before it is truncated.
    pub fn reconcile(&self, feed: &str, current: &[String]) -> Result<Vec<String>, StoreError> {
        let path = self.path_for(feed);

        let previous = read_urls(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        write_urls(&path, current).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        let fresh = new_items(&previous, current);
        tracing::debug!(
            path = %path.display(),
            previous = previous.len(),
            current = current.len(),
            new = fresh.len(),
            "state reconciled"
        );
        Ok(fresh)
    }
}

/// Entries of `current` absent from `previous`, in `current` order.
///
/// Membership only: a new URL listed twice in `current` is returned twice.
pub fn new_items(previous: &[String], current: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|url| !previous.contains(*url))
        .cloned()
        .collect()
}

/// Read a state file; a missing file is an empty list.
///
/// Lines are split on `\n` with a trailing `\r` removed.  Invalid UTF-8 is
/// replaced rather than rejected.
fn read_urls(path: &Path) -> io::Result<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut urls = Vec::new();
    for line in BufReader::new(file).split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        urls.push(String::from_utf8_lossy(&line).into_owned());
    }
    Ok(urls)
}

fn write_urls(path: &Path, urls: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for url in urls {
        writeln!(writer, "{url}")?;
    }
    writer.flush()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|u| u.to_string()).collect()
    }

    // -- new_items -----------------------------------------------------------

    #[test]
    fn everything_is_new_without_history() {
        let current = s(&["https://b", "https://a", "https://c"]);
        assert_eq!(new_items(&[], &current), current);
    }

    #[test]
    fn nothing_is_new_when_all_seen() {
        let previous = s(&["https://c", "https://a", "https://b", "https://z"]);
        let current = s(&["https://a", "https://b", "https://c"]);
        assert!(new_items(&previous, &current).is_empty());
    }

    #[test]
    fn membership_is_not_positional() {
        let previous = s(&["https://b", "https://a"]);
        let current = s(&["https://a", "https://x", "https://b", "https://y"]);
        assert_eq!(new_items(&previous, &current), s(&["https://x", "https://y"]));
    }

    #[test]
    fn duplicate_new_urls_are_each_reported() {
        let previous = s(&["https://old"]);
        let current = s(&["https://n", "https://old", "https://n"]);
        assert_eq!(new_items(&previous, &current), s(&["https://n", "https://n"]));
    }

    // -- reconcile -----------------------------------------------------------

    #[test]
    fn path_follows_naming_convention() {
        let store = StateStore::new("/var/sredd");
        assert_eq!(store.path_for("pics"), PathBuf::from("/var/sredd/r_pics.log"));
    }

    #[test]
    fn first_run_reports_all_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        let fresh = store.reconcile("test", &s(&["https://a", "https://b"])).unwrap();
        assert_eq!(fresh, s(&["https://a", "https://b"]));

        let written = fs::read_to_string(dir.path().join("r_test.log")).unwrap();
        assert_eq!(written, "https://a\nhttps://b\n");
    }

    #[test]
    fn second_run_reports_only_additions() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        store.reconcile("test", &s(&["https://a", "https://b"])).unwrap();
        let fresh = store.reconcile("test", &s(&["https://a", "https://c"])).unwrap();
        assert_eq!(fresh, s(&["https://c"]));

        // Only the latest fetch is kept; "b" is forgotten.
        let written = fs::read_to_string(store.path_for("test")).unwrap();
        assert_eq!(written, "https://a\nhttps://c\n");
    }

    #[test]
    fn identical_runs_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        let current = s(&["https://a", "https://b", "https://a"]);

        assert_eq!(store.reconcile("rust", &current).unwrap(), current);
        assert!(store.reconcile("rust", &current).unwrap().is_empty());
    }

    #[test]
    fn empty_fetch_truncates_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        store.reconcile("test", &s(&["https://a"])).unwrap();
        assert!(store.reconcile("test", &[]).unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path_for("test")).unwrap(), "");

        // Everything is new again after an empty snapshot.
        assert_eq!(store.reconcile("test", &s(&["https://a"])).unwrap(), s(&["https://a"]));
    }

    #[test]
    fn reads_existing_file_with_crlf_endings() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        fs::write(store.path_for("win"), "https://a\r\nhttps://b\r\n").unwrap();

        let fresh = store.reconcile("win", &s(&["https://a", "https://b", "https://c"])).unwrap();
        assert_eq!(fresh, s(&["https://c"]));
    }

    #[test]
    fn invalid_utf8_in_state_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        fs::write(store.path_for("bin"), b"https://a\n\xff\xfe junk\nhttps://b\n").unwrap();

        let fresh = store.reconcile("bin", &s(&["https://a", "https://b", "https://c"])).unwrap();
        assert_eq!(fresh, s(&["https://c"]));
        assert_eq!(
            fs::read_to_string(store.path_for("bin")).unwrap(),
            "https://a\nhttps://b\nhttps://c\n"
        );
    }

    #[test]
    fn feeds_are_tracked_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());

        store.reconcile("one", &s(&["https://a"])).unwrap();
        assert_eq!(store.reconcile("two", &s(&["https://a"])).unwrap(), s(&["https://a"]));
    }

    #[test]
    fn unwritable_directory_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("missing"));

        let err = store.reconcile("test", &s(&["https://a"])).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn unreadable_state_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path());
        // A directory where the file should be fails to read as lines.
        fs::create_dir(store.path_for("test")).unwrap();

        let err = store.reconcile("test", &s(&["https://a"])).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }
}
