//! Balancing a single transaction in isolation: price inference, amount inference, then check.

use std::collections::HashMap;

use ledger_core::{AmountStyle, InternedStr, MixedAmount, Transaction};

use crate::error::BalanceError;
use crate::{check, infer_amount, infer_price};
use crate::opts::BalancingOpts;

/// Balances `txn` standalone: optionally infers prices, infers at most one missing amount per
/// posting class, then checks both classes sum to zero.
///
/// Returns the balanced transaction and the `(account, inferred_amount)` pairs the amount
/// inferrer produced, for callers (the journal balancer) that need to fold those into a
/// running-balance table. Rejects any transaction containing a balance-assignment posting:
/// resolving an assignment into a delta requires a running per-account balance, which only the
/// journal balancer maintains.
pub fn balance_transaction_with_inferred(
    opts: &BalancingOpts,
    mut txn: Transaction,
) -> Result<(Transaction, Vec<(InternedStr, MixedAmount)>), BalanceError> {
    if let Some(posting) = txn.postings.iter().find(|p| p.is_assignment()) {
        return Err(BalanceError::AssignmentOutsideJournal {
            account: posting.account.to_string(),
            pos: txn.pos.clone(),
            rendered: txn.render(),
        });
    }

    let styles = effective_styles(opts);

    if opts.infer_transaction_prices {
        infer_price::infer_prices(&mut txn);
    }

    let inferred = infer_amount::infer_amounts(&mut txn, &styles)?;

    let diagnostics = check::check_transaction(&txn, &styles);
    if !diagnostics.is_empty() {
        return Err(BalanceError::CheckFailed {
            diagnostics,
            pos: txn.pos.clone(),
            rendered: txn.render(),
        });
    }

    knot_parent_references(&mut txn);
    Ok((txn, inferred))
}

/// Balances `txn` standalone and returns just the balanced transaction, discarding the
/// inferred-amount bookkeeping. The external interface of §6.
pub fn balance_transaction(
    opts: &BalancingOpts,
    txn: Transaction,
) -> Result<Transaction, BalanceError> {
    balance_transaction_with_inferred(opts, txn).map(|(t, _)| t)
}

/// `true` if `txn` already passes the checker under `opts` without modification.
///
/// A thin convenience over [`check::check_transaction`]; does not perform any inference.
#[must_use]
pub fn is_balanced(opts: &BalancingOpts, txn: &Transaction) -> bool {
    let styles = effective_styles(opts);
    check::check_transaction(txn, &styles).is_empty()
}

fn effective_styles(opts: &BalancingOpts) -> HashMap<InternedStr, AmountStyle> {
    opts.styles()
}

/// Sets every posting's `transaction_index` to `txn.index`, after balancing has fixed both in
/// place. Named after the source's knot-tying of mutually-referential records.
fn knot_parent_references(txn: &mut Transaction) {
    for posting in &mut txn.postings {
        posting.transaction_index = Some(txn.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::{Amount, BalanceAssertion, Posting, SourcePos};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn assignment_posting_is_rejected_standalone() {
        let t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::missing("a").with_assertion(BalanceAssertion::new(
                Amount::new("USD", dec!(100)),
                SourcePos::default(),
            )),
            Posting::new("b", MixedAmount::single(Amount::new("USD", dec!(-1)))),
        ]);
        let opts = BalancingOpts::new();
        let err = balance_transaction(&opts, t).unwrap_err();
        assert!(matches!(err, BalanceError::AssignmentOutsideJournal { .. }));
        assert!(err.to_string().contains("outside of a journal"));
    }

    #[test]
    fn infers_missing_amount_as_negation() {
        let t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
            Posting::missing("b"),
        ]);
        let opts = BalancingOpts::new();
        let balanced = balance_transaction(&opts, t).unwrap();
        let amt = balanced.postings[1].amount.as_ref().unwrap().as_single().unwrap();
        assert_eq!(amt.quantity, dec!(5));
    }

    #[test]
    fn same_sign_postings_fail_to_balance() {
        let t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(1)))),
            Posting::new("b", MixedAmount::single(Amount::new("USD", dec!(1)))),
        ]);
        let opts = BalancingOpts::new();
        let err = balance_transaction(&opts, t).unwrap_err();
        assert!(err.to_string().contains("same sign"));
    }

    #[test]
    fn price_inference_then_balance_succeeds_on_cost() {
        let t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(1.35)))),
            Posting::new("b", MixedAmount::single(Amount::new("EUR", dec!(-1)))),
        ]);
        let opts = BalancingOpts::new();
        let balanced = balance_transaction(&opts, t).unwrap();
        let priced = balanced.postings[0].amount.as_ref().unwrap().as_single().unwrap();
        assert!(priced.price.is_some());
    }

    #[test]
    fn balanced_transaction_reports_balanced() {
        let t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
            Posting::new("b", MixedAmount::single(Amount::new("USD", dec!(5)))),
        ]);
        let opts = BalancingOpts::new();
        assert!(is_balanced(&opts, &t));
    }

    #[test]
    fn knot_ties_parent_index_into_postings() {
        let t = Transaction::new(date(2024, 1, 1), "t")
            .with_index(7)
            .with_postings(vec![
                Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
                Posting::new("b", MixedAmount::single(Amount::new("USD", dec!(5)))),
            ]);
        let opts = BalancingOpts::new();
        let balanced = balance_transaction(&opts, t).unwrap();
        assert!(balanced.postings.iter().all(|p| p.transaction_index == Some(7)));
    }
}
