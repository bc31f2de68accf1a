//! Folds split order fills back into one trade per order.
//!
//! A BUY/SELL row carrying a `ref` opens an order; the trade rows right after
//! it with the same `secu` and no `ref` are further fills of that order.

use crate::transaction::Transaction;

use tracing::warn;

struct Fill {
    anchor: Transaction,
    shares: i64,
    notional: f64,
    rows: usize,
}

impl Fill {
    fn new(anchor: Transaction) -> Self {
        Self {
            shares: anchor.shares,
            notional: anchor.shares as f64 * anchor.price,
            rows: 1,
            anchor,
        }
    }

    fn continues_with(&self, row: &Transaction) -> bool {
        row.is_trade() && row.reference.is_none() && row.secu == self.anchor.secu
    }

    fn absorb(&mut self, row: Transaction) {
        self.shares += row.shares;
        self.notional += row.shares as f64 * row.price;
        self.rows += 1;

        let order = &mut self.anchor;
        order.gross_amount += row.gross_amount;
        order.comm_vat += row.comm_vat;
        order.other_fees += row.other_fees;
        order.net_amount += row.net_amount;
        order.cost += row.cost;
        order.gains += row.gains;
        order.balance = row.balance;
    }

    fn finish(self) -> Transaction {
        let mut order = self.anchor;
        if self.rows > 1 {
            if self.shares != 0 {
                order.price = self.notional / self.shares as f64;
            }
            order.shares = self.shares;
        }
        order
    }
}

/// Merge partial fills into aggregate trades.
///
/// Shares are summed and the price becomes the share-weighted average of the
/// fills. Text fields come from the opening row, flow amounts are summed and
/// `balance` is taken from the last fill. Rows that are not trades pass
/// through untouched; a trade row without `ref` that does not follow an open
/// order is dropped.
pub fn consolidate_fills<I>(records: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = Transaction>,
{
    let mut rows = records.into_iter().peekable();
    let mut out = Vec::new();

    while let Some(row) = rows.next() {
        if !row.is_trade() {
            out.push(row);
            continue;
        }

        if row.reference.is_none() {
            warn!(date = ?row.date, secu = ?row.secu, "dropping fill row with no opening order");
            continue;
        }

        let mut fill = Fill::new(row);
        while let Some(next) = rows.next_if(|next| fill.continues_with(next)) {
            fill.absorb(next);
        }
        out.push(fill.finish());
    }

    out
}
