//! Filling in the one allowed missing amount per posting class.

use std::collections::HashMap;

use ledger_core::{AmountStyle, InternedStr, MixedAmount, Posting, PostingType, Transaction};

use crate::check::PostingClass;
use crate::error::BalanceError;

fn class_matches(class: PostingClass, posting: &Posting) -> bool {
    match class {
        PostingClass::Real => posting.posting_type == PostingType::Regular,
        PostingClass::BalancedVirtual => posting.posting_type == PostingType::BalancedVirtual,
    }
}

/// Fills the single amountless posting of each posting class (real, balanced-virtual)
/// independently, returning `(account, inferred_amount)` pairs for the journal balancer's
/// running-balance bookkeeping.
///
/// Fails if either class has more than one amountless posting.
pub fn infer_amounts(
    txn: &mut Transaction,
    styles: &HashMap<InternedStr, AmountStyle>,
) -> Result<Vec<(InternedStr, MixedAmount)>, BalanceError> {
    let mut inferred = infer_class(txn, PostingClass::Real, styles)?;
    inferred.extend(infer_class(txn, PostingClass::BalancedVirtual, styles)?);
    Ok(inferred)
}

fn infer_class(
    txn: &mut Transaction,
    class: PostingClass,
    styles: &HashMap<InternedStr, AmountStyle>,
) -> Result<Vec<(InternedStr, MixedAmount)>, BalanceError> {
    let indices: Vec<usize> = txn
        .postings
        .iter()
        .enumerate()
        .filter(|(_, p)| class_matches(class, p))
        .map(|(i, _)| i)
        .collect();
    let missing: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| txn.postings[i].amount.is_none())
        .collect();

    if missing.len() > 1 {
        return Err(BalanceError::TooManyMissingAmounts {
            pos: txn.pos.clone(),
            rendered: txn.render(),
        });
    }

    if missing.is_empty() {
        return Ok(Vec::new());
    }

    let idx = missing[0];
    let mut sum = MixedAmount::empty();
    for &i in &indices {
        if i == idx {
            continue;
        }
        if let Some(amount) = &txn.postings[i].amount {
            sum = sum.add(amount);
        }
    }
    let inferred_amount = sum.negate().to_cost().canonicalize(styles).normalized();

    txn.postings[idx] = txn.postings[idx].shadow_original();
    txn.postings[idx].amount = Some(inferred_amount.clone());
    let account = txn.postings[idx].account.clone();
    Ok(vec![(account, inferred_amount)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledger_core::Amount;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn infers_negation_of_the_others() {
        let mut t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
            Posting::missing("b"),
        ]);
        let styles = HashMap::new();
        let inferred = infer_amounts(&mut t, &styles).unwrap();
        assert_eq!(inferred.len(), 1);
        let amt = t.postings[1].amount.as_ref().unwrap().as_single().unwrap();
        assert_eq!(amt.quantity, dec!(5));
        assert_eq!(amt.commodity, InternedStr::new("USD"));
    }

    #[test]
    fn two_missing_in_same_class_fails() {
        let mut t = Transaction::new(date(2024, 1, 1), "t")
            .with_postings(vec![Posting::missing("a"), Posting::missing("b")]);
        let styles = HashMap::new();
        let err = infer_amounts(&mut t, &styles).unwrap_err();
        assert!(matches!(err, BalanceError::TooManyMissingAmounts { .. }));
    }

    #[test]
    fn original_shadow_preserves_pre_inference_posting() {
        let mut t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
            Posting::missing("b"),
        ]);
        let styles = HashMap::new();
        infer_amounts(&mut t, &styles).unwrap();
        assert!(t.postings[1].original.is_some());
        assert!(t.postings[1].original.as_ref().unwrap().amount.is_none());
    }

    #[test]
    fn fully_specified_transaction_is_unchanged() {
        let mut t = Transaction::new(date(2024, 1, 1), "t").with_postings(vec![
            Posting::new("a", MixedAmount::single(Amount::new("USD", dec!(-5)))),
            Posting::new("b", MixedAmount::single(Amount::new("USD", dec!(5)))),
        ]);
        let styles = HashMap::new();
        let inferred = infer_amounts(&mut t, &styles).unwrap();
        assert!(inferred.is_empty());
    }
}
