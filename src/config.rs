use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "txt";

/// Border decoration around every report line, counted in characters after
/// surrounding whitespace has been trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    pub leading: usize,
    pub trailing: usize,
}

impl Default for Framing {
    fn default() -> Self {
        Self {
            leading: 1,
            trailing: 2,
        }
    }
}

impl Framing {
    pub fn new(leading: usize, trailing: usize) -> Self {
        Self { leading, trailing }
    }

    /// Trim whitespace, then drop the framing characters on both ends.
    /// Lines too short to carry the full framing collapse to "".
    pub fn strip<'a>(&self, line: &'a str) -> &'a str {
        let trimmed = line.trim();

        let start = trimmed
            .char_indices()
            .nth(self.leading)
            .map(|(i, _)| i)
            .unwrap_or(trimmed.len());

        let end = match self.trailing {
            0 => trimmed.len(),
            n => trimmed
                .char_indices()
                .rev()
                .nth(n - 1)
                .map(|(i, _)| i)
                .unwrap_or(0),
        };

        if start >= end {
            ""
        } else {
            &trimmed[start..end]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub dir: PathBuf,
    pub extension: String,
    pub framing: Framing,
}

impl LedgerConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            framing: Framing::default(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_default_framing() {
        let framing = Framing::default();
        assert_eq!(framing.strip("  |2021-03-01:BUY:REF1||  "), "2021-03-01:BUY:REF1");
    }

    #[test]
    fn test_strip_custom_framing() {
        let framing = Framing::new(2, 1);
        assert_eq!(framing.strip("[|payload|"), "payload");
        assert_eq!(Framing::new(0, 0).strip(" raw "), "raw");
    }

    #[test]
    fn test_strip_short_line() {
        let framing = Framing::default();
        assert_eq!(framing.strip("||"), "");
        assert_eq!(framing.strip("|"), "");
        assert_eq!(framing.strip(""), "");
    }

    #[test]
    fn test_config_defaults() {
        let config = LedgerConfig::new("ledger");
        assert_eq!(config.dir(), Path::new("ledger"));
        assert_eq!(config.extension, "txt");
        assert_eq!(config.framing, Framing::new(1, 2));
    }

    #[test]
    fn test_config_extension_drops_dot() {
        let config = LedgerConfig::new("ledger").with_extension(".TXT");
        assert_eq!(config.extension, "TXT");
    }
}
