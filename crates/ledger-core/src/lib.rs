//! Data model for a plain-text double-entry accounting ledger.
//!
//! This crate defines the types a balancing engine operates on — amounts, postings,
//! transactions, and journals — and the pure arithmetic/display operations that work on them in
//! isolation. It does not parse ledger text, balance transactions, or render reports; see
//! `ledger-balance` for the balancing algorithm built on top of these types.
//!
//! ```
//! use ledger_core::{Amount, MixedAmount};
//! use rust_decimal_macros::dec;
//!
//! let cash = Amount::new("USD", dec!(-5));
//! let food = Amount::new("USD", dec!(5));
//! let total = MixedAmount::from_amounts(vec![cash, food]);
//! assert!(total.amounts().iter().all(|a| a.quantity.is_zero()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod amount;
pub mod intern;
pub mod journal;
pub mod mixed;
pub mod posting;
pub mod sourcepos;
pub mod style;
pub mod transaction;

pub use amount::{Amount, Price};
pub use intern::{InternedStr, StringInterner};
pub use journal::Journal;
pub use mixed::MixedAmount;
pub use posting::{BalanceAssertion, Posting, PostingType};
pub use sourcepos::SourcePos;
pub use style::{AmountStyle, DigitGroups, Precision, Side};
pub use transaction::{Status, Transaction};

pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
