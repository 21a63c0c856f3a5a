//! Per-transaction sign and sum-to-zero checking.

use std::collections::HashMap;
use std::fmt;

use ledger_core::{AmountStyle, InternedStr, MixedAmount, Posting, PostingType, Transaction};

/// Which balance class a diagnostic applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingClass {
    /// Real (unbracketed, unparenthesized) postings.
    Real,
    /// Balanced-virtual (bracketed) postings, checked independently of the real ones.
    BalancedVirtual,
}

impl PostingClass {
    fn matches(self, posting_type: PostingType) -> bool {
        match self {
            PostingClass::Real => posting_type == PostingType::Regular,
            PostingClass::BalancedVirtual => posting_type == PostingType::BalancedVirtual,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PostingClass::Real => "real postings",
            PostingClass::BalancedVirtual => "balanced virtual postings",
        }
    }
}

/// A single check failure for one posting class.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Every nonzero amount in the class has the same sign.
    SameSign(PostingClass),
    /// The class's postings, converted to cost and summed, do not look zero.
    UnbalancedSum(PostingClass, MixedAmount),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SameSign(class) => write!(f, "{} all have the same sign", class.label()),
            Diagnostic::UnbalancedSum(class, sum) => {
                write!(f, "{}' sum should be 0 but is: {sum}", class.label())
            }
        }
    }
}

/// Checks one posting class (real or balanced-virtual) of `postings` and returns its
/// diagnostics, sign-first then sum, empty on success.
fn check_class(
    class: PostingClass,
    postings: &[Posting],
    styles: &HashMap<InternedStr, AmountStyle>,
) -> Vec<Diagnostic> {
    let costed: Vec<MixedAmount> = postings
        .iter()
        .filter(|p| class.matches(p.posting_type))
        .filter_map(|p| p.amount.as_ref())
        .map(MixedAmount::to_cost)
        .filter(|m| !m.looks_zero(styles))
        .collect();

    let mut diagnostics = Vec::new();

    // Sign check operates per filtered posting, not on their sum: a posting whose own
    // commodities disagree in sign has an indeterminate sign and the check passes rather than
    // risk a false positive.
    if costed.len() >= 2 {
        let signs: Vec<Option<bool>> = costed.iter().map(MixedAmount::sign).collect();
        if signs.iter().all(Option::is_some) {
            let first = signs[0];
            if signs.iter().all(|s| *s == first) {
                diagnostics.push(Diagnostic::SameSign(class));
            }
        }
    }

    let sum = costed
        .iter()
        .fold(MixedAmount::empty(), |acc, m| acc.add(m))
        .to_cost();
    if !sum.looks_zero(styles) {
        diagnostics.push(Diagnostic::UnbalancedSum(class, sum));
    }

    diagnostics
}

/// Checks both balance classes of a transaction, returning all diagnostics (sign-first per
/// class, real before balanced-virtual), empty on success. Virtual (parenthesized) postings are
/// excluded from balance math entirely and never produce a diagnostic.
#[must_use]
pub fn check_transaction(
    txn: &Transaction,
    styles: &HashMap<InternedStr, AmountStyle>,
) -> Vec<Diagnostic> {
    let mut diagnostics = check_class(PostingClass::Real, &txn.postings, styles);
    diagnostics.extend(check_class(PostingClass::BalancedVirtual, &txn.postings, styles));
    diagnostics
}
