pub mod builder;
pub mod state;


use crate::config::LedgerConfig;
use crate::error::Result;
use crate::source::{LineSource, SourceEvent};
use crate::transaction::Transaction;

use builder::{CarriedContext, RecordBuilder};
use state::{ParserState, RegionMachine};

use std::iter::FusedIterator;

/// One walk over a directory of monthly ledgers, producing a record per
/// transaction line on demand.
///
/// The first `Err` ends the walk; the iterator yields nothing after it.
pub struct Ledger {
    source: LineSource,
    machine: RegionMachine,
    builder: RecordBuilder,
    context: CarriedContext,
    failed: bool,
}

impl Ledger {
    pub fn open(config: &LedgerConfig) -> Result<Self> {
        Ok(Self::with_source(
            LineSource::open(config)?,
            RecordBuilder::new(config.framing),
        ))
    }

    pub fn with_source(source: LineSource, builder: RecordBuilder) -> Self {
        Self {
            source,
            machine: RegionMachine::new(),
            builder,
            context: CarriedContext::default(),
            failed: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.machine.state()
    }

    pub fn context(&self) -> &CarriedContext {
        &self.context
    }

    fn end(&mut self) {
        self.machine.finish();
        self.source.close();
    }
}

impl Iterator for Ledger {
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.machine.state() == ParserState::EndAll {
            return None;
        }

        loop {
            let event = match self.source.next() {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    self.failed = true;
                    self.end();
                    return Some(Err(e));
                }
                None => {
                    self.end();
                    return None;
                }
            };

            let raw = match event {
                SourceEvent::FileStart { .. } => {
                    self.machine.start_file();
                    continue;
                }
                SourceEvent::Line(raw) => raw,
            };

            let emitted = self.machine.feed(&raw.text).is_some();

            if self.machine.state() == ParserState::BetweenMonthlyLedger
                && !self.source.has_next_file()
            {
                self.end();
            }

            if !emitted {
                if self.machine.state() == ParserState::EndAll {
                    return None;
                }
                continue;
            }

            return match self.builder.build(&raw, &self.context) {
                Ok(txn) => {
                    self.context.observe(&txn);
                    Some(Ok(txn))
                }
                Err(e) => {
                    self.failed = true;
                    self.end();
                    Some(Err(e))
                }
            };
        }
    }
}

impl FusedIterator for Ledger {}
