//! Transactions: a date, a description, and the postings that must balance against each other.

use chrono::NaiveDate;

use crate::posting::Posting;
use crate::sourcepos::SourcePos;

/// A transaction's clearing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Status {
    /// No status mark.
    #[default]
    Unmarked,
    /// Marked pending (`!`).
    Pending,
    /// Marked cleared (`*`).
    Cleared,
}

/// A dated group of postings that must independently balance to zero, per posting class.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    /// 1-based index, assigned by the journal balancer's numbering pass; stable across a single
    /// balancing run and used as the key into its mutable transaction array.
    pub index: u64,
    /// The primary (and usually only) date.
    pub date: NaiveDate,
    /// An optional secondary date (e.g. hledger's `=` secondary date).
    pub date2: Option<NaiveDate>,
    /// Where in the source this transaction was written.
    pub pos: SourcePos,
    /// Clearing status.
    pub status: Status,
    /// An optional free-text code (e.g. a check or invoice number).
    pub code: String,
    /// The transaction description.
    pub description: String,
    /// A free-text comment, if any.
    pub comment: String,
    /// Tags parsed from the comment, as (name, value) pairs.
    pub tags: Vec<(String, String)>,
    /// The postings making up this transaction.
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Builds a transaction with no index yet assigned (index `0`), no postings.
    #[must_use]
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            index: 0,
            date,
            date2: None,
            pos: SourcePos::default(),
            status: Status::Unmarked,
            code: String::new(),
            description: description.into(),
            comment: String::new(),
            tags: Vec::new(),
            postings: Vec::new(),
        }
    }

    /// Consuming builder: sets the postings.
    #[must_use]
    pub fn with_postings(mut self, postings: Vec<Posting>) -> Self {
        self.postings = postings;
        self
    }

    /// Consuming builder: sets the source position.
    #[must_use]
    pub fn with_pos(mut self, pos: SourcePos) -> Self {
        self.pos = pos;
        self
    }

    /// Consuming builder: sets the 1-based index.
    #[must_use]
    pub fn with_index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    /// The date an assignment-bearing transaction sorts by in the journal balancer's pass 2,
    /// since none of its individual postings have been resolved into a dated item of their own
    /// yet; identical to [`Transaction::date`], spelled out for that call site.
    #[must_use]
    pub fn effective_date(&self) -> NaiveDate {
        self.date
    }

    /// `true` if any posting in this transaction is a balance assignment.
    #[must_use]
    pub fn has_assignment(&self) -> bool {
        self.postings.iter().any(Posting::is_assignment)
    }

    /// A human-readable rendering of this transaction for error messages.
    ///
    /// Not a general-purpose pretty-printer (that belongs to the external report/print layer);
    /// just enough structure that an error message can show the user which transaction failed.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{} {}\n", self.date, self.description);
        for p in &self.postings {
            let amount = match &p.amount {
                Some(a) if !a.is_empty() => a.to_string(),
                Some(_) => String::new(),
                None => String::new(),
            };
            out.push_str(&format!("    {}  {amount}\n", p.account));
        }
        out
    }
}
