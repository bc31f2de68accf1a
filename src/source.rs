//! Chains the monthly ledger files of a directory into one line stream.
//!
//! Files are visited in lexicographic filename order, which is assumed to be
//! chronological (`202101.txt`, `202102.txt`, ...). At most one file is open
//! at a time: the current handle is dropped before the next one is opened, and
//! dropping the source mid-walk releases whatever handle is still held.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// A line of report text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub file: Arc<Path>,
    /// 1-based line number within `file`.
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A new ledger file was opened; `index` counts from 0 across the walk.
    FileStart { path: Arc<Path>, index: usize },
    Line(RawLine),
}

struct OpenLedger {
    path: Arc<Path>,
    lines: Lines<BufReader<File>>,
    read: usize,
}

pub struct LineSource {
    files: std::vec::IntoIter<PathBuf>,
    current: Option<OpenLedger>,
    opened: usize,
}

/// Sorted list of the ledger files in `config.dir` with the configured
/// extension. Subdirectories are skipped.
pub fn discover_ledgers(config: &LedgerConfig) -> Result<Vec<PathBuf>> {
    let dir = config.dir();
    if !dir.is_dir() {
        return Err(LedgerError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        config.extension
    );
    let entries = glob::glob(&pattern).map_err(|source| LedgerError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "discovered ledger files");
    Ok(files)
}

impl LineSource {
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        Ok(Self::from_files(discover_ledgers(config)?))
    }

    /// Walk `files` in the order given.
    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self {
            files: files.into_iter(),
            current: None,
            opened: 0,
        }
    }

    /// Number of files opened so far.
    pub fn files_opened(&self) -> usize {
        self.opened
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_ref().map(|open| open.path.as_ref())
    }

    /// Whether another file is waiting after the current one.
    pub fn has_next_file(&self) -> bool {
        !self.files.as_slice().is_empty()
    }

    /// Release the open handle and forget the remaining files.
    pub fn close(&mut self) {
        self.close_current();
        self.files = Vec::new().into_iter();
    }

    fn close_current(&mut self) {
        if let Some(open) = self.current.take() {
            debug!(file = %open.path.display(), lines = open.read, "closed ledger");
        }
    }
}

impl Iterator for LineSource {
    type Item = Result<SourceEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(open) = self.current.as_mut() {
                match open.lines.next() {
                    Some(Ok(text)) => {
                        open.read += 1;
                        return Some(Ok(SourceEvent::Line(RawLine {
                            file: Arc::clone(&open.path),
                            number: open.read,
                            text,
                        })));
                    }
                    Some(Err(source)) => {
                        let path = open.path.to_path_buf();
                        self.close();
                        return Some(Err(LedgerError::Io { path, source }));
                    }
                    None => self.close_current(),
                }
            }

            let path = self.files.next()?;
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(source) => {
                    self.close();
                    return Some(Err(LedgerError::Io { path, source }));
                }
            };

            let path: Arc<Path> = Arc::from(path);
            let index = self.opened;
            self.opened += 1;
            debug!(file = %path.display(), index, "opened ledger");

            self.current = Some(OpenLedger {
                path: Arc::clone(&path),
                lines: BufReader::new(file).lines(),
                read: 0,
            });
            return Some(Ok(SourceEvent::FileStart { path, index }));
        }
    }
}
