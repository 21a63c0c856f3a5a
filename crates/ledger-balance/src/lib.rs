//! Transaction-balancing engine for a plain-text double-entry accounting journal.
//!
//! Given [`ledger_core::Transaction`]s and [`ledger_core::Journal`]s produced by an external
//! parser, this crate verifies each transaction sums to zero per posting class, infers missing
//! amounts and conversion prices where exactly one inference is possible, executes balance
//! assignments against a running per-account balance table, and verifies balance assertions in
//! date order. It does not parse ledger text, format reports, or persist anything — see the
//! crate-level `README` of the workspace for where those concerns live.
//!
//! ```
//! use chrono::NaiveDate;
//! use ledger_balance::{balance_transaction, BalancingOpts};
//! use ledger_core::{Amount, MixedAmount, Posting, Transaction};
//! use rust_decimal_macros::dec;
//!
//! let txn = Transaction::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "groceries")
//!     .with_postings(vec![
//!         Posting::new("expenses:food", MixedAmount::single(Amount::new("USD", dec!(5)))),
//!         Posting::missing("assets:cash"),
//!     ]);
//! let balanced = balance_transaction(&BalancingOpts::new(), txn).unwrap();
//! assert_eq!(
//!     balanced.postings[1].amount.as_ref().unwrap().as_single().unwrap().quantity,
//!     dec!(-5)
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assertion;
mod balance_journal;
mod balance_transaction;
pub mod check;
pub mod error;
pub mod infer_amount;
pub mod infer_price;
pub mod opts;

pub use balance_journal::balance_journal;
pub use balance_transaction::{balance_transaction, balance_transaction_with_inferred, is_balanced};
pub use check::{check_transaction, Diagnostic, PostingClass};
pub use error::BalanceError;
pub use opts::BalancingOpts;
