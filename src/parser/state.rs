//! Region tracking for the monthly ledger layout.
//!
//! The machine never looks at byte offsets. It moves between report regions
//! on literal markers and on the number of bar lines seen, and tells the
//! caller which lines belong to the transaction table.

use tracing::debug;

pub const TABLE_START_MARKER: &str = "BEGINNING BALANCE";
pub const TABLE_END_MARKER: &str = "GAIN(LOSS)";
pub const TABLE_END_EXCLUDE: &str = "COST";
pub const LEDGER_END_MARKER: &str = "Total Account Equity";

/// Bars between the top of a ledger file and the first transaction row.
pub const HEADER_BARS: usize = 3;
/// Bars separating two transaction blocks of the same ledger.
pub const BLOCK_GAP_BARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    BeginAll,
    BeginMonthlyLedger,
    ReadTxn,
    BetweenTxn,
    EndMonthlyLedger,
    BetweenMonthlyLedger,
    EndAll,
}

/// A non-empty line made of nothing but `-`.
pub fn is_bar(line: &str) -> bool {
    let s = line.trim();
    !s.is_empty() && s.chars().all(|c| c == '-')
}

pub fn is_table_start(line: &str) -> bool {
    line.contains(TABLE_START_MARKER)
}

pub fn is_table_end(line: &str) -> bool {
    line.contains(TABLE_END_MARKER) && !line.contains(TABLE_END_EXCLUDE)
}

pub fn is_ledger_end(line: &str) -> bool {
    line.contains(LEDGER_END_MARKER)
}

#[derive(Debug)]
pub struct RegionMachine {
    state: ParserState,
    files_started: usize,
    // Bars seen since the current file was opened.
    ledger_bars: usize,
    // Bars seen since the last transaction block closed.
    block_bars: usize,
}

impl Default for RegionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionMachine {
    pub fn new() -> Self {
        Self {
            state: ParserState::BeginAll,
            files_started: 0,
            ledger_bars: 0,
            block_bars: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Only the first file carries the opening-balance preamble; every later
    /// file restarts at its table header.
    pub fn start_file(&mut self) {
        let next = if self.files_started == 0 {
            ParserState::BeginAll
        } else {
            ParserState::BeginMonthlyLedger
        };
        self.files_started += 1;
        self.ledger_bars = 0;
        self.block_bars = 0;
        self.transition(next);
    }

    /// No file remains.
    pub fn finish(&mut self) {
        self.transition(ParserState::EndAll);
    }

    /// Advance on `line`; returns it back when it should become a record.
    pub fn feed<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        match self.state {
            ParserState::BeginAll => self.begin_all(line),
            ParserState::BeginMonthlyLedger => self.begin_monthly_ledger(line),
            ParserState::ReadTxn => self.read_txn(line),
            ParserState::BetweenTxn => self.between_txn(line),
            ParserState::EndMonthlyLedger => self.end_monthly_ledger(line),
            ParserState::BetweenMonthlyLedger | ParserState::EndAll => None,
        }
    }

    fn begin_all<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if is_bar(line) {
            self.ledger_bars += 1;
        }
        if is_table_start(line) {
            self.transition(ParserState::BeginMonthlyLedger);
            return Some(line);
        }
        None
    }

    fn begin_monthly_ledger<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if is_bar(line) {
            self.ledger_bars += 1;
        }
        // A preamble with extra bars may already have passed the count.
        if self.ledger_bars >= HEADER_BARS {
            self.transition(ParserState::ReadTxn);
        }
        None
    }

    fn read_txn<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if is_bar(line) {
            self.block_bars = 0;
            self.transition(ParserState::BetweenTxn);
            return None;
        }
        if line.trim().is_empty() {
            return None;
        }
        Some(line)
    }

    fn between_txn<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if is_bar(line) {
            self.block_bars += 1;
        }
        if self.block_bars == BLOCK_GAP_BARS {
            self.transition(ParserState::ReadTxn);
        }
        if is_table_end(line) {
            self.transition(ParserState::EndMonthlyLedger);
        }
        None
    }

    fn end_monthly_ledger<'a>(&mut self, line: &'a str) -> Option<&'a str> {
        if is_ledger_end(line) {
            self.transition(ParserState::BetweenMonthlyLedger);
        }
        None
    }

    fn transition(&mut self, next: ParserState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "ledger region changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_detection() {
        assert!(is_bar("-----"));
        assert!(is_bar("   ---   "));
        assert!(is_bar("-"));
        assert!(!is_bar(""));
        assert!(!is_bar("    "));
        assert!(!is_bar("--=--"));
        assert!(!is_bar("|-----||"));
    }

    #[test]
    fn test_table_end_excludes_cost_header() {
        assert!(is_table_end("|   SUMMARY OF REALIZED GAIN(LOSS)   ||"));
        assert!(!is_table_end("| COST : GAIN(LOSS) ||"));
        assert!(!is_table_end("| GAIN ||"));
    }

    #[test]
    fn test_markers() {
        assert!(is_table_start("|      BEGINNING BALANCE     1,000.00||"));
        assert!(is_ledger_end("| Total Account Equity  5,000.00 ||"));
        assert!(!is_ledger_end("| total account equity ||"));
    }
}
