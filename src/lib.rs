pub mod config;
pub mod consolidate;
pub mod error;
pub mod parser;
pub mod source;
pub mod transaction;

pub use crate::config::{Framing, LedgerConfig};
pub use crate::consolidate::consolidate_fills;
pub use crate::error::{LedgerError, Result};
pub use crate::parser::Ledger;
pub use crate::transaction::{Action, Transaction};

use std::io::Write;
use std::path::Path;

/// Lazily walk every `*.txt` ledger in `dir`, oldest first.
pub fn stream_transactions(dir: impl AsRef<Path>) -> Result<Ledger> {
    Ledger::open(&LedgerConfig::new(dir.as_ref()))
}

/// Materialize the whole walk as table rows.
pub fn read_table(config: &LedgerConfig) -> Result<Vec<Transaction>> {
    Ledger::open(config)?.collect()
}

/// CSV table sink. The header row of [`Transaction::FIELDS`] is written up
/// front, so a walk with no records still yields a table.
pub struct TableWriter<W: Write> {
    wtr: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Result<Self> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
        wtr.write_record(Transaction::FIELDS)?;
        Ok(Self { wtr, rows: 0 })
    }

    pub fn write(&mut self, row: &Transaction) -> Result<()> {
        self.wtr.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the number of rows written, header excluded.
    pub fn finish(mut self) -> Result<usize> {
        self.wtr.flush()?;
        Ok(self.rows)
    }
}

/// Write rows as CSV with a header of [`Transaction::FIELDS`].
pub fn write_table<W: Write>(rows: &[Transaction], writer: W) -> Result<usize> {
    let mut table = TableWriter::new(writer)?;
    for row in rows {
        table.write(row)?;
    }
    table.finish()
}
