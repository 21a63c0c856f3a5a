//! Typed errors for every way balancing can fail, surfaced to external callers as text.

use ledger_core::SourcePos;
use thiserror::Error;

use crate::check::Diagnostic;

/// Everything that can make balancing fail.
///
/// Each variant carries the structured data behind its message, so an in-process caller can
/// match on the kind of failure instead of parsing the rendered string; external layers that
/// only want the §7 text contract can call `.to_string()`.
#[derive(Debug, Error)]
pub enum BalanceError {
    /// The transaction checker found at least one sign or sum diagnostic.
    #[error(
        "could not balance this transaction:\n{diag}\n{pos}\n{rendered}",
        diag = diagnostics_text(diagnostics)
    )]
    CheckFailed {
        /// The diagnostics the checker produced, sign-first then sum, real before
        /// balanced-virtual.
        diagnostics: Vec<Diagnostic>,
        /// Where the transaction begins in the source.
        pos: SourcePos,
        /// The transaction rendered for the error message.
        rendered: String,
    },

    /// More than one amountless posting exists in the same posting class.
    #[error(
        "can't have more than one real posting with no amount (remember to put 2 or more spaces before the amount if there is one)\n{pos}\n{rendered}"
    )]
    TooManyMissingAmounts {
        /// Where the transaction begins in the source.
        pos: SourcePos,
        /// The transaction rendered for the error message.
        rendered: String,
    },

    /// A balance-assignment posting carried an explicit posting date.
    #[error(
        "balance assignments cannot have a custom posting date\n{pos}\n{rendered}"
    )]
    AssignmentWithPostingDate {
        /// Where the offending posting begins in the source.
        pos: SourcePos,
        /// The transaction rendered for the error message.
        rendered: String,
    },

    /// A balance-assignment posting was balanced standalone, outside the journal balancer.
    ///
    /// Resolving an assignment into a delta requires a running per-account balance, which only
    /// exists across a whole journal; `balance_transaction` has no such state to consult.
    #[error(
        "cannot balance a balance assignment on account \"{account}\" outside of a journal\n{pos}\n{rendered}"
    )]
    AssignmentOutsideJournal {
        /// The account the assignment targeted.
        account: String,
        /// Where the offending posting begins in the source.
        pos: SourcePos,
        /// The transaction rendered for the error message.
        rendered: String,
    },

    /// A balance-assignment posting targeted an account used by a transaction-modifier rule.
    #[error(
        "cannot assign a balance to account \"{account}\" because it is used in a transaction modifier rule, in transaction:\n{rendered}"
    )]
    AssignmentOnUnassignableAccount {
        /// The account the assignment targeted.
        account: String,
        /// The transaction rendered for the error message.
        rendered: String,
    },

    /// A balance assertion did not hold against the running balance.
    #[error(
        "balance assertion failed for account {account_label}\ndate: {date}\ncommodity: {commodity}\ncalculated: {calculated}\nasserted: {asserted}\ndifference: {difference}\n{pos}\n{rendered}",
        account_label = if *inclusive { format!("{account} (and subs)") } else { account.clone() }
    )]
    AssertionFailed {
        /// The assertion's date (in date order, not necessarily the transaction's own date).
        date: chrono::NaiveDate,
        /// The account the assertion was written against.
        account: String,
        /// Whether the assertion summed subaccounts in (affects the rendered account label).
        inclusive: bool,
        /// The asserted commodity.
        commodity: String,
        /// The actual running balance in that commodity.
        calculated: String,
        /// The value the assertion declared.
        asserted: String,
        /// `calculated - asserted`.
        difference: String,
        /// Where the assertion was written in the source.
        pos: SourcePos,
        /// The transaction rendered for the error message.
        rendered: String,
    },
}

fn diagnostics_text(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::PostingClass;

    #[test]
    fn check_failed_text_includes_all_diagnostics() {
        let err = BalanceError::CheckFailed {
            diagnostics: vec![Diagnostic::SameSign(PostingClass::Real)],
            pos: SourcePos::new(3, 1),
            rendered: "2024-01-01 test\n".to_string(),
        };
        let text = err.to_string();
        assert!(text.starts_with("could not balance this transaction:"));
        assert!(text.contains("real postings all have the same sign"));
    }

    #[test]
    fn assignment_outside_journal_names_the_account() {
        let err = BalanceError::AssignmentOutsideJournal {
            account: "assets:bank".to_string(),
            pos: SourcePos::default(),
            rendered: String::new(),
        };
        assert!(err.to_string().contains("assets:bank"));
        assert!(err.to_string().contains("outside of a journal"));
    }

    #[test]
    fn assertion_failed_marks_inclusive_accounts() {
        let err = BalanceError::AssertionFailed {
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            account: "assets:bank".to_string(),
            inclusive: true,
            commodity: "USD".to_string(),
            calculated: "5".to_string(),
            asserted: "10".to_string(),
            difference: "-5".to_string(),
            pos: SourcePos::default(),
            rendered: String::new(),
        };
        assert!(err.to_string().contains("assets:bank (and subs)"));
    }
}
