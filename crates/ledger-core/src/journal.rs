//! A journal: the full set of transactions the engine balances together.

use std::collections::{HashMap, HashSet};

use crate::amount::Amount;
use crate::intern::InternedStr;
use crate::mixed::MixedAmount;
use crate::style::{AmountStyle, Precision};
use crate::transaction::Transaction;

/// An ordered sequence of transactions, plus the commodity styles and unassignable accounts
/// that govern how they are balanced.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Journal {
    /// The transactions, in input order (not necessarily date order).
    pub transactions: Vec<Transaction>,
    /// Display styles keyed by commodity, as declared or inferred from usage.
    pub commodity_styles: HashMap<InternedStr, AmountStyle>,
    /// Accounts named by a transaction-modifier rule's posting templates; balance-assignment
    /// postings on these accounts are rejected, since a rule-generated posting's target balance
    /// is not something the user directly controls.
    pub unassignable_accounts: HashSet<InternedStr>,
}

impl Journal {
    /// Builds a journal from transactions with no declared styles or unassignable accounts.
    #[must_use]
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            commodity_styles: HashMap::new(),
            unassignable_accounts: HashSet::new(),
        }
    }

    /// Consuming builder: sets the unassignable-account set.
    #[must_use]
    pub fn with_unassignable_accounts(mut self, accounts: HashSet<InternedStr>) -> Self {
        self.unassignable_accounts = accounts;
        self
    }

    /// Consuming builder: sets declared commodity styles, leaving any commodity not present to
    /// be inferred from usage by [`Journal::infer_commodity_styles`].
    #[must_use]
    pub fn with_commodity_styles(mut self, styles: HashMap<InternedStr, AmountStyle>) -> Self {
        self.commodity_styles = styles;
        self
    }

    /// Derives a style per observed commodity by scanning every posted and priced amount.
    ///
    /// A commodity's style is seeded from the first amount of that commodity encountered (in
    /// transaction, then posting, order); its precision is then widened to the highest fixed
    /// precision observed for it, since a later posting writing more decimal digits than an
    /// earlier one implies the earlier one under-represented the commodity's natural precision.
    /// Commodities with an explicitly declared style (already present in `commodity_styles`)
    /// are left untouched.
    #[must_use]
    pub fn infer_commodity_styles(&self) -> HashMap<InternedStr, AmountStyle> {
        let mut styles = self.commodity_styles.clone();
        let mut max_precision: HashMap<InternedStr, u32> = HashMap::new();

        for txn in &self.transactions {
            for posting in &txn.postings {
                if let Some(mixed) = &posting.amount {
                    for amount in mixed.raw() {
                        observe(&mut styles, &mut max_precision, amount);
                        if let Some(price) = &amount.price {
                            let priced = match price {
                                crate::amount::Price::Unit(a) | crate::amount::Price::Total(a) => {
                                    a.as_ref()
                                }
                            };
                            observe(&mut styles, &mut max_precision, priced);
                        }
                    }
                }
                if let Some(assertion) = &posting.assertion {
                    observe(&mut styles, &mut max_precision, &assertion.amount);
                }
            }
        }

        for (commodity, precision) in max_precision {
            if let Some(style) = styles.get_mut(&commodity) {
                if let Precision::Fixed(existing) = style.precision {
                    if precision > existing {
                        style.precision = Precision::Fixed(precision);
                    }
                }
            }
        }

        styles
    }

    /// The running total of every posting ever made against `account` and every account of
    /// which it is a proper prefix (colon-separated), i.e. its subaccounts.
    ///
    /// Used by the assertion checker and the assignment resolver for inclusive balances.
    #[must_use]
    pub fn subaccount_prefix_matches<'a>(
        account: &str,
        candidates: impl Iterator<Item = &'a InternedStr>,
    ) -> Vec<&'a InternedStr> {
        let prefix = format!("{account}:");
        candidates
            .filter(|c| c.as_str() == account || c.as_str().starts_with(&prefix))
            .collect()
    }
}

fn observe(
    styles: &mut HashMap<InternedStr, AmountStyle>,
    max_precision: &mut HashMap<InternedStr, u32>,
    amount: &Amount,
) {
    styles
        .entry(amount.commodity.clone())
        .or_insert_with(|| amount.style.clone());
    if let Precision::Fixed(p) = amount.style.precision {
        let entry = max_precision.entry(amount.commodity.clone()).or_insert(0);
        *entry = (*entry).max(p);
    } else {
        let fallback = amount.quantity.scale();
        let entry = max_precision.entry(amount.commodity.clone()).or_insert(0);
        *entry = (*entry).max(fallback);
    }
}

/// A zero [`MixedAmount`], useful as the initial running balance of a fresh account.
#[must_use]
pub fn zero_balance() -> MixedAmount {
    MixedAmount::empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posting::Posting;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn infers_widest_observed_precision() {
        let t1 = Transaction::new(date(2024, 1, 1), "a").with_postings(vec![Posting::new(
            "x",
            MixedAmount::single(Amount::new("USD", dec!(1.5))),
        )]);
        let t2 = Transaction::new(date(2024, 1, 2), "b").with_postings(vec![Posting::new(
            "x",
            MixedAmount::single(Amount::new("USD", dec!(1.500))),
        )]);
        let journal = Journal::new(vec![t1, t2]);
        let styles = journal.infer_commodity_styles();
        let style = styles.get(&InternedStr::new("USD")).unwrap();
        assert_eq!(style.precision, Precision::Fixed(3));
    }

    #[test]
    fn subaccount_prefix_matches_self_and_children_only() {
        let accounts = vec![
            InternedStr::new("assets:bank"),
            InternedStr::new("assets:bank:checking"),
            InternedStr::new("assets:bankrupt"),
        ];
        let matches = Journal::subaccount_prefix_matches("assets:bank", accounts.iter());
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn journal_round_trips_through_json() {
        let t = Transaction::new(date(2024, 1, 1), "groceries").with_postings(vec![Posting::new(
            "expenses:food",
            MixedAmount::single(Amount::new("USD", dec!(5))),
        )]);
        let journal = Journal::new(vec![t]);
        let json = serde_json::to_string(&journal).expect("journal serializes");
        let back: Journal = serde_json::from_str(&json).expect("journal deserializes");
        assert_eq!(back.transactions.len(), 1);
        assert_eq!(back.transactions[0].description, "groceries");
    }
}
