use crate::config::Framing;
use crate::error::{LedgerError, Result};
use crate::source::RawLine;
use crate::transaction::{Action, Transaction};

use tracing::trace;

pub const FIELD_DELIMITER: char = ':';
/// Leading word of a cash dividend description, e.g. `CD ABC dividend payment`.
pub const CASH_DIVIDEND_PREFIX: &str = "CD";

// Canonical column positions, matching `Transaction::FIELDS`.
const DATE: usize = 0;
const REF: usize = 2;
const SECU: usize = 3;
const SHARES: usize = 4;
const PRICE: usize = 5;
const GROSS_AMOUNT: usize = 6;
const COMM_VAT: usize = 7;
const OTHER_FEES: usize = 8;
const NET_AMOUNT: usize = 9;
const BALANCE: usize = 10;
const COST: usize = 11;
const GAINS: usize = 12;

// Cash rows (OR, CDIV) carry a description where trades carry secu.
const DESCRIPTION: usize = 3;

/// The security of the most recent BUY/SELL row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarriedContext {
    secu: Option<String>,
}

impl CarriedContext {
    pub fn secu(&self) -> Option<&str> {
        self.secu.as_deref()
    }

    pub fn observe(&mut self, txn: &Transaction) {
        if txn.is_trade() {
            self.secu = txn.secu.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder {
    framing: Framing,
}

impl RecordBuilder {
    pub fn new(framing: Framing) -> Self {
        Self { framing }
    }

    /// Turn one emitted table line into a record.
    ///
    /// Fails only when the action mnemonic is not recognised; every numeric
    /// cell that does not parse falls back to zero.
    pub fn build(&self, raw: &RawLine, context: &CarriedContext) -> Result<Transaction> {
        let body = self.framing.strip(&raw.text);

        if !body.contains(FIELD_DELIMITER) {
            return Ok(opening_balance(body));
        }

        let tokens: Vec<String> = body.split(FIELD_DELIMITER).map(clean_token).collect();
        let mnemonic = tokens.get(1).map(String::as_str).unwrap_or_default();
        let action: Action = mnemonic
            .parse()
            .map_err(|_| LedgerError::MalformedAction {
                file: raw.file.to_path_buf(),
                line_number: raw.number,
                mnemonic: mnemonic.to_string(),
                line: raw.text.clone(),
            })?;

        let mut txn = match action {
            Action::Start => Transaction::opening_balance(money(
                tokens.last().map(String::as_str),
            )),
            Action::Buy | Action::Sell => {
                let cells: Vec<Option<&str>> = tokens.iter().map(|t| Some(t.as_str())).collect();
                assemble(action, &cells)
            }
            Action::Cdiv => {
                let secu = tokens
                    .get(DESCRIPTION)
                    .and_then(|description| security_in_description(description));
                assemble(action, &cash_row(&tokens, secu))
            }
            Action::Or => assemble(action, &cash_row(&tokens, None)),
        };

        if action.is_trade() && txn.secu.is_none() {
            txn.secu = context.secu().map(str::to_owned);
        }

        Ok(txn)
    }
}

fn clean_token(token: &str) -> String {
    token.trim().replace(',', "")
}

/// The balance line has no delimiters; only its last figure matters.
fn opening_balance(body: &str) -> Transaction {
    let balance = body.split_whitespace().last().map(clean_token);
    Transaction::opening_balance(money(balance.as_deref()))
}

/// Security symbol named in a dividend description.
pub fn security_in_description(description: &str) -> Option<&str> {
    let mut words = description.split_whitespace();
    let first = words.next()?;
    if first == CASH_DIVIDEND_PREFIX {
        words.next()
    } else {
        Some(first)
    }
}

/// Put a cash row into canonical order: the description slot is replaced by
/// `secu`, shares and price are blank, and the money columns shift right.
fn cash_row<'a>(tokens: &'a [String], secu: Option<&'a str>) -> Vec<Option<&'a str>> {
    let mut cells: Vec<Option<&str>> = (0..DESCRIPTION)
        .map(|i| tokens.get(i).map(String::as_str))
        .collect();
    cells.push(secu);
    cells.push(None);
    cells.push(None);
    cells.extend(
        tokens
            .iter()
            .skip(DESCRIPTION + 1)
            .map(|t| Some(t.as_str())),
    );
    cells
}

fn assemble(action: Action, cells: &[Option<&str>]) -> Transaction {
    let cell = |i: usize| cells.get(i).copied().flatten();

    Transaction {
        date: text(cell(DATE)),
        action,
        reference: text(cell(REF)),
        secu: text(cell(SECU)),
        shares: integer(cell(SHARES)),
        price: money(cell(PRICE)),
        gross_amount: money(cell(GROSS_AMOUNT)),
        comm_vat: money(cell(COMM_VAT)),
        other_fees: money(cell(OTHER_FEES)),
        net_amount: money(cell(NET_AMOUNT)),
        balance: money(cell(BALANCE)),
        cost: money(cell(COST)),
        gains: money(cell(GAINS)),
    }
}

fn text(cell: Option<&str>) -> Option<String> {
    cell.filter(|s| !s.is_empty()).map(str::to_owned)
}

pub(crate) fn integer(cell: Option<&str>) -> i64 {
    match cell {
        None | Some("") => 0,
        Some(s) => s.parse().unwrap_or_else(|_| {
            trace!(value = s, "integer cell did not parse, using 0");
            0
        }),
    }
}

pub(crate) fn money(cell: Option<&str>) -> f64 {
    match cell {
        None | Some("") => 0.0,
        Some(s) => s.replace(',', "").parse().unwrap_or_else(|_| {
            trace!(value = s, "money cell did not parse, using 0.0");
            0.0
        }),
    }
}
