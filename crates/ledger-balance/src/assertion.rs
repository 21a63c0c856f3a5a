//! Verifying balance assertions against the running-balance table the journal balancer
//! maintains as it walks postings in date order.

use std::collections::HashMap;

use chrono::NaiveDate;
use ledger_core::{BalanceAssertion, Decimal, InternedStr, Journal, MixedAmount};

use crate::error::BalanceError;

/// Checks `assertion`, written against `account`, against the running-balance table `bals`.
///
/// `inclusive` assertions are checked against the sum of `account` and every account of which it
/// is a proper (colon-separated) prefix; `total` assertions additionally require every other
/// commodity held in that (possibly summed) balance to be exactly zero. Equality is exact: the
/// user wrote a specific number and display precision plays no part here, unlike the
/// "looks zero" test the balancer itself uses.
pub fn check_assertion(
    account: &InternedStr,
    assertion: &BalanceAssertion,
    bals: &HashMap<InternedStr, MixedAmount>,
    date: NaiveDate,
    rendered: String,
) -> Result<(), BalanceError> {
    let balance = effective_balance(account, assertion.inclusive, bals);
    let commodity = &assertion.amount.commodity;
    let calculated = balance.amount_in_commodity(commodity);

    if calculated.quantity != assertion.amount.quantity {
        return Err(failure(
            account,
            assertion,
            date,
            commodity.clone(),
            calculated.quantity,
            rendered,
        ));
    }

    if assertion.total {
        for other in balance.amounts() {
            if &other.commodity == commodity {
                continue;
            }
            if !other.quantity.is_zero() {
                return Err(failure(
                    account,
                    assertion,
                    date,
                    other.commodity.clone(),
                    other.quantity,
                    rendered,
                ));
            }
        }
    }

    Ok(())
}

/// The balance to check an assertion against: `account` alone if exclusive, or `account` summed
/// with every proper subaccount if inclusive.
fn effective_balance(
    account: &InternedStr,
    inclusive: bool,
    bals: &HashMap<InternedStr, MixedAmount>,
) -> MixedAmount {
    if !inclusive {
        return bals.get(account).cloned().unwrap_or_else(MixedAmount::empty);
    }
    let matches = Journal::subaccount_prefix_matches(account.as_str(), bals.keys());
    matches
        .into_iter()
        .fold(MixedAmount::empty(), |acc, acct| {
            acc.add(bals.get(acct).expect("key came from bals"))
        })
}

fn failure(
    account: &InternedStr,
    assertion: &BalanceAssertion,
    date: NaiveDate,
    commodity: InternedStr,
    calculated: Decimal,
    rendered: String,
) -> BalanceError {
    BalanceError::AssertionFailed {
        date,
        account: account.to_string(),
        inclusive: assertion.inclusive,
        commodity: commodity.to_string(),
        calculated: calculated.to_string(),
        asserted: assertion.amount.quantity.to_string(),
        difference: (calculated - assertion.amount.quantity).to_string(),
        pos: assertion.pos.clone(),
        rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::{Amount, SourcePos};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bals_with(pairs: &[(&str, Decimal)]) -> HashMap<InternedStr, MixedAmount> {
        let mut m = HashMap::new();
        for (account, quantity) in pairs {
            m.insert(
                InternedStr::new(*account),
                MixedAmount::single(Amount::new("USD", *quantity)),
            );
        }
        m
    }

    #[test]
    fn partial_assertion_passes_on_exact_match() {
        let bals = bals_with(&[("assets:bank", dec!(10))]);
        let assertion = BalanceAssertion::new(Amount::new("USD", dec!(10)), SourcePos::default());
        let result = check_assertion(
            &InternedStr::new("assets:bank"),
            &assertion,
            &bals,
            date(2024, 1, 1),
            String::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn partial_assertion_fails_on_mismatch() {
        let bals = bals_with(&[("assets:bank", dec!(10))]);
        let assertion = BalanceAssertion::new(Amount::new("USD", dec!(11)), SourcePos::default());
        let err = check_assertion(
            &InternedStr::new("assets:bank"),
            &assertion,
            &bals,
            date(2024, 1, 1),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, BalanceError::AssertionFailed { .. }));
    }

    #[test]
    fn total_assertion_requires_other_commodities_zero() {
        let mut bals = HashMap::new();
        bals.insert(
            InternedStr::new("assets:bank"),
            MixedAmount::from_amounts(vec![
                Amount::new("USD", dec!(10)),
                Amount::new("EUR", dec!(1)),
            ]),
        );
        let assertion =
            BalanceAssertion::new(Amount::new("USD", dec!(10)), SourcePos::default()).total();
        let err = check_assertion(
            &InternedStr::new("assets:bank"),
            &assertion,
            &bals,
            date(2024, 1, 1),
            String::new(),
        )
        .unwrap_err();
        assert!(matches!(err, BalanceError::AssertionFailed { .. }));
    }

    #[test]
    fn inclusive_assertion_sums_subaccounts() {
        let bals = bals_with(&[("assets:bank", dec!(3)), ("assets:bank:checking", dec!(7))]);
        let assertion =
            BalanceAssertion::new(Amount::new("USD", dec!(10)), SourcePos::default()).inclusive();
        let result = check_assertion(
            &InternedStr::new("assets:bank"),
            &assertion,
            &bals,
            date(2024, 1, 1),
            String::new(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn exclusive_assertion_ignores_subaccounts() {
        let bals = bals_with(&[("assets:bank", dec!(3)), ("assets:bank:checking", dec!(7))]);
        let assertion = BalanceAssertion::new(Amount::new("USD", dec!(3)), SourcePos::default());
        let result = check_assertion(
            &InternedStr::new("assets:bank"),
            &assertion,
            &bals,
            date(2024, 1, 1),
            String::new(),
        );
        assert!(result.is_ok());
    }
}
