use crate::error::UnknownAction;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Start,
    Buy,
    Sell,
    Or,
    Cdiv,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Start,
        Action::Buy,
        Action::Sell,
        Action::Or,
        Action::Cdiv,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Action::Start => "START",
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Or => "OR",
            Action::Cdiv => "CDIV",
        }
    }

    pub fn is_trade(self) -> bool {
        matches!(self, Action::Buy | Action::Sell)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts the report mnemonic with an optional leading sign, e.g. `+CDIV`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.trim();
        let bare = bare.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(bare);

        Action::ALL
            .into_iter()
            .find(|action| action.mnemonic() == bare)
            .ok_or_else(|| UnknownAction(s.trim().to_string()))
    }
}

/// One ledger row in canonical column order. Serializes as a 13-column table
/// row whose headers are [`Transaction::FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: Option<String>,
    pub action: Action,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub secu: Option<String>,
    pub shares: i64,
    pub price: f64,
    pub gross_amount: f64,
    pub comm_vat: f64,
    pub other_fees: f64,
    pub net_amount: f64,
    pub balance: f64,
    pub cost: f64,
    pub gains: f64,
}

impl Transaction {
    pub const FIELDS: [&'static str; 13] = [
        "date",
        "action",
        "ref",
        "secu",
        "shares",
        "price",
        "gross_amount",
        "comm_vat",
        "other_fees",
        "net_amount",
        "balance",
        "cost",
        "gains",
    ];

    /// A record of the given kind with every other field at its default.
    pub fn new(action: Action) -> Self {
        Self {
            date: None,
            action,
            reference: None,
            secu: None,
            shares: 0,
            price: 0.0,
            gross_amount: 0.0,
            comm_vat: 0.0,
            other_fees: 0.0,
            net_amount: 0.0,
            balance: 0.0,
            cost: 0.0,
            gains: 0.0,
        }
    }

    pub fn opening_balance(balance: f64) -> Self {
        Self {
            balance,
            ..Self::new(Action::Start)
        }
    }

    pub fn is_trade(&self) -> bool {
        self.action.is_trade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_mnemonic() {
        assert_eq!("BUY".parse::<Action>(), Ok(Action::Buy));
        assert_eq!("SELL".parse::<Action>(), Ok(Action::Sell));
        assert_eq!("OR".parse::<Action>(), Ok(Action::Or));
        assert_eq!("START".parse::<Action>(), Ok(Action::Start));
        assert_eq!(" +CDIV ".parse::<Action>(), Ok(Action::Cdiv));
        assert_eq!("-SELL".parse::<Action>(), Ok(Action::Sell));
    }

    #[test]
    fn test_action_unknown_mnemonic() {
        assert_eq!(
            "XFER".parse::<Action>(),
            Err(UnknownAction("XFER".to_string()))
        );
        assert!("buy".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
        assert!("+".parse::<Action>().is_err());
    }

    #[test]
    fn test_action_display_round_trips_mnemonic() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_trade_actions() {
        assert!(Action::Buy.is_trade());
        assert!(Action::Sell.is_trade());
        assert!(!Action::Start.is_trade());
        assert!(!Action::Or.is_trade());
        assert!(!Action::Cdiv.is_trade());
    }

    #[test]
    fn test_opening_balance_defaults() {
        let txn = Transaction::opening_balance(10_000.0);
        assert_eq!(txn.action, Action::Start);
        assert_eq!(txn.balance, 10_000.0);
        assert_eq!(txn.date, None);
        assert_eq!(txn.reference, None);
        assert_eq!(txn.secu, None);
        assert_eq!(txn.shares, 0);
        assert_eq!(txn.net_amount, 0.0);
    }

    #[test]
    fn test_csv_header_matches_fields() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(Transaction::opening_balance(1.5)).unwrap();
        let output = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let mut lines = output.lines();

        assert_eq!(lines.next(), Some(Transaction::FIELDS.join(",").as_str()));
        assert_eq!(lines.next(), Some(",START,,,0,0.0,0.0,0.0,0.0,0.0,1.5,0.0,0.0"));
    }
}
