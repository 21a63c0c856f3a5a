//! Postings: the individual account lines that make up a transaction.

use chrono::NaiveDate;

use crate::amount::Amount;
use crate::intern::InternedStr;
use crate::mixed::MixedAmount;
use crate::sourcepos::SourcePos;

/// Which balance class a posting participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PostingType {
    /// An ordinary posting, counted in the real-postings balance check.
    Regular,
    /// A virtual posting (parenthesized account), excluded from all balance math entirely.
    Virtual,
    /// A balanced-virtual posting (bracketed account), checked for zero-sum on its own,
    /// independent of the real postings.
    BalancedVirtual,
}

/// A posting-attached check that a running balance equals a stated amount at that point.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BalanceAssertion {
    /// The asserted amount: one commodity, one quantity.
    pub amount: Amount,
    /// `true` for a total assertion (`==`, every other commodity implicitly zero); `false` for
    /// a partial assertion (`=`, this commodity only).
    pub total: bool,
    /// `true` for an inclusive assertion (`=*`, sums subaccounts too); `false` for exclusive.
    pub inclusive: bool,
    /// Where in the source this assertion was written.
    pub pos: SourcePos,
}

impl BalanceAssertion {
    /// Builds a partial, exclusive assertion (the common case: plain `=`).
    #[must_use]
    pub fn new(amount: Amount, pos: SourcePos) -> Self {
        Self {
            amount,
            total: false,
            inclusive: false,
            pos,
        }
    }

    /// Consuming builder: marks this a total assertion (`==`).
    #[must_use]
    pub fn total(mut self) -> Self {
        self.total = true;
        self
    }

    /// Consuming builder: marks this an inclusive assertion (`=*`).
    #[must_use]
    pub fn inclusive(mut self) -> Self {
        self.inclusive = true;
        self
    }
}

/// A single account line within a [`crate::transaction::Transaction`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Posting {
    /// The account this posting charges.
    pub account: InternedStr,
    /// The posted amount, or `None` if the amount is missing and must be inferred.
    ///
    /// A present-but-empty [`MixedAmount`] (no components) is a balance-assignment posting with
    /// no explicit delta — distinct from `None`, which means "infer this from the others".
    pub amount: Option<MixedAmount>,
    /// Which balance class this posting belongs to.
    pub posting_type: PostingType,
    /// An explicit posting date overriding the parent transaction's date, if any.
    pub posting_date: Option<NaiveDate>,
    /// A balance assertion (or assignment target) attached to this posting, if any.
    pub assertion: Option<BalanceAssertion>,
    /// The 1-based index of the parent transaction, set when the transaction is balanced.
    pub transaction_index: Option<u64>,
    /// The pre-inference form of this posting, preserved so the source text can be reproduced
    /// unchanged when nothing was actually inferred.
    pub original: Option<Box<Posting>>,
}

impl Posting {
    /// Builds a regular posting with an explicit amount.
    #[must_use]
    pub fn new(account: impl Into<InternedStr>, amount: MixedAmount) -> Self {
        Self {
            account: account.into(),
            amount: Some(amount),
            posting_type: PostingType::Regular,
            posting_date: None,
            assertion: None,
            transaction_index: None,
            original: None,
        }
    }

    /// Builds a regular posting with a missing amount, to be inferred.
    #[must_use]
    pub fn missing(account: impl Into<InternedStr>) -> Self {
        Self {
            account: account.into(),
            amount: None,
            posting_type: PostingType::Regular,
            posting_date: None,
            assertion: None,
            transaction_index: None,
            original: None,
        }
    }

    /// Consuming builder: sets the posting type.
    #[must_use]
    pub fn with_type(mut self, posting_type: PostingType) -> Self {
        self.posting_type = posting_type;
        self
    }

    /// Consuming builder: sets an explicit posting date.
    #[must_use]
    pub fn with_posting_date(mut self, date: NaiveDate) -> Self {
        self.posting_date = Some(date);
        self
    }

    /// Consuming builder: attaches a balance assertion.
    #[must_use]
    pub fn with_assertion(mut self, assertion: BalanceAssertion) -> Self {
        self.assertion = Some(assertion);
        self
    }

    /// `true` if this posting's amount is entirely absent (must be inferred).
    #[must_use]
    pub fn is_amount_missing(&self) -> bool {
        self.amount.is_none()
    }

    /// `true` if this posting has no explicit amount at all (neither a quantity nor even an
    /// empty placeholder) and carries a balance assertion — i.e. it is a balance assignment.
    #[must_use]
    pub fn is_assignment(&self) -> bool {
        self.amount.is_none() && self.assertion.is_some()
    }

    /// Returns a copy of this posting with its pre-inference self stashed in `original`, unless
    /// one is already stashed (only the first inference should set the shadow).
    #[must_use]
    pub fn shadow_original(&self) -> Self {
        if self.original.is_some() {
            return self.clone();
        }
        let mut shadowed = self.clone();
        shadowed.original = Some(Box::new(self.clone()));
        shadowed
    }
}
