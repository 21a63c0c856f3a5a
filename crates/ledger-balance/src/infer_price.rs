//! Inserting a conversion price between two commodities when exactly one pairing is possible.

use ledger_core::{Amount, MixedAmount, Posting, Price, Transaction};

use crate::check::PostingClass;

fn class_matches(class: PostingClass, posting: &Posting) -> bool {
    use ledger_core::PostingType;
    match class {
        PostingClass::Real => posting.posting_type == PostingType::Regular,
        PostingClass::BalancedVirtual => posting.posting_type == PostingType::BalancedVirtual,
    }
}

/// Attempts price inference independently for the real and balanced-virtual posting classes of
/// `txn`, mutating matching postings in place when it succeeds. Never fails: a class that
/// doesn't meet the exactly-two-commodities-opposite-signs-unpriced precondition is left alone.
pub fn infer_prices(txn: &mut Transaction) {
    infer_prices_for_class(txn, PostingClass::Real);
    infer_prices_for_class(txn, PostingClass::BalancedVirtual);
}

fn infer_prices_for_class(txn: &mut Transaction, class: PostingClass) {
    let matching: Vec<usize> = txn
        .postings
        .iter()
        .enumerate()
        .filter(|(_, p)| class_matches(class, p) && p.amount.is_some())
        .map(|(i, _)| i)
        .collect();
    if matching.is_empty() {
        return;
    }

    let mut combined = MixedAmount::empty();
    for &i in &matching {
        if let Some(amount) = &txn.postings[i].amount {
            combined = combined.add(amount);
        }
    }
    let normalized = combined.amounts();
    if normalized.len() != 2 {
        return;
    }
    if normalized[0].price.is_some() || normalized[1].price.is_some() {
        return;
    }
    let (a, b) = (&normalized[0], &normalized[1]);
    let opposite_signs = (a.is_negative() && b.is_positive()) || (a.is_positive() && b.is_negative());
    if !opposite_signs {
        return;
    }

    // Order (from, to) by which commodity appears first scanning postings left to right.
    let mut from_commodity = None;
    'outer: for &i in &matching {
        if let Some(amount) = &txn.postings[i].amount {
            for raw in amount.raw() {
                if raw.commodity == a.commodity || raw.commodity == b.commodity {
                    from_commodity = Some(raw.commodity.clone());
                    break 'outer;
                }
            }
        }
    }
    let Some(from_commodity) = from_commodity else {
        return;
    };
    let (from, to) = if from_commodity == a.commodity {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    };

    let from_postings: Vec<usize> = matching
        .iter()
        .copied()
        .filter(|&i| {
            txn.postings[i]
                .amount
                .as_ref()
                .and_then(MixedAmount::as_single)
                .is_some_and(|single| single.commodity == from.commodity)
        })
        .collect();
    if from_postings.is_empty() {
        return;
    }

    for &i in &from_postings {
        let single = txn.postings[i]
            .amount
            .as_ref()
            .and_then(MixedAmount::as_single)
            .expect("filtered for single-commodity amount above");
        let price = if from_postings.len() == 1 {
            Price::Total(Box::new(to.negate()))
        } else {
            Price::Unit(Box::new(Amount::unit_rate(&to, single.quantity, &from.style)))
        };
        let priced = single.with_price(price);
        txn.postings[i].amount = Some(MixedAmount::single(priced));
    }
}
