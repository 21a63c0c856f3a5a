//! A multi-commodity amount: an ordered collection of [`Amount`]s, normalized one-per-commodity
//! on demand.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::amount::Amount;
use crate::intern::InternedStr;
use crate::style::AmountStyle;

/// An ordered multiset of [`Amount`]s, possibly spanning several commodities.
///
/// [`MixedAmount::raw`] preserves the internal structure exactly as built (the order amounts
/// were added, including duplicate commodities before they are combined); [`MixedAmount::amounts`]
/// normalizes to one amount per commodity by summing quantities. Both views matter: the price
/// inferrer scans the raw postings of a class to find which posting carries which commodity,
/// while balance math always works on the normalized view.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MixedAmount {
    raw: Vec<Amount>,
}

impl MixedAmount {
    /// An empty mixed amount (no commodities at all).
    #[must_use]
    pub fn empty() -> Self {
        Self { raw: Vec::new() }
    }

    /// Wraps a single amount.
    #[must_use]
    pub fn single(amount: Amount) -> Self {
        Self { raw: vec![amount] }
    }

    /// Builds from an arbitrary list of amounts, preserving order.
    #[must_use]
    pub fn from_amounts(raw: Vec<Amount>) -> Self {
        Self { raw }
    }

    /// The raw, unnormalized components, in the order they were added.
    #[must_use]
    pub fn raw(&self) -> &[Amount] {
        &self.raw
    }

    /// `true` if there are no components at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Normalizes to one [`Amount`] per commodity, summing quantities.
    ///
    /// When several raw components share a commodity but disagree on price, the first
    /// non-`None` price encountered for that commodity wins; this only matters before a cost
    /// conversion collapses prices away.
    #[must_use]
    pub fn amounts(&self) -> Vec<Amount> {
        let mut order: Vec<InternedStr> = Vec::new();
        let mut by_commodity: HashMap<InternedStr, Amount> = HashMap::new();
        for a in &self.raw {
            match by_commodity.get_mut(&a.commodity) {
                Some(existing) => {
                    existing.quantity += a.quantity;
                    if existing.price.is_none() {
                        existing.price = a.price.clone();
                    }
                }
                None => {
                    order.push(a.commodity.clone());
                    by_commodity.insert(a.commodity.clone(), a.clone());
                }
            }
        }
        order
            .into_iter()
            .map(|c| by_commodity.remove(&c).expect("commodity recorded in order"))
            .collect()
    }

    /// The normalized amount for one commodity, or zero (in [`AmountStyle::natural`]) if absent.
    #[must_use]
    pub fn amount_in_commodity(&self, commodity: &InternedStr) -> Amount {
        self.amounts()
            .into_iter()
            .find(|a| &a.commodity == commodity)
            .unwrap_or_else(|| Amount::new(commodity.clone(), Decimal::ZERO))
    }

    /// Adds two mixed amounts by concatenating their raw components.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut raw = self.raw.clone();
        raw.extend(other.raw.iter().cloned());
        Self { raw }
    }

    /// Negates every component.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            raw: self.raw.iter().map(Amount::negate).collect(),
        }
    }

    /// Subtracts `other` from `self`.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    /// Keeps only the components matching `predicate`.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&Amount) -> bool) -> Self {
        Self {
            raw: self.raw.iter().filter(|a| predicate(a)).cloned().collect(),
        }
    }

    /// Converts every component to cost and renormalizes (a cost conversion can make two
    /// different-commodity components collapse into the same target commodity).
    #[must_use]
    pub fn to_cost(&self) -> Self {
        let costed: Vec<Amount> = self.raw.iter().map(Amount::to_cost).collect();
        Self::from_amounts(costed).normalized()
    }

    /// Re-expresses as the normalized view, discarding the raw structure.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::from_amounts(self.amounts())
    }

    /// Strips the conversion price from every component, quantities and commodities unchanged.
    #[must_use]
    pub fn strip_prices(&self) -> Self {
        Self {
            raw: self.raw.iter().map(Amount::without_price).collect(),
        }
    }

    /// Canonicalizes every component under `styles`.
    #[must_use]
    pub fn canonicalize(&self, styles: &HashMap<InternedStr, AmountStyle>) -> Self {
        Self {
            raw: self.raw.iter().map(|a| a.canonicalize(styles)).collect(),
        }
    }

    /// `true` if, after cost conversion, canonicalization and normalization, every commodity's
    /// quantity looks zero at its display precision.
    #[must_use]
    pub fn looks_zero(&self, styles: &HashMap<InternedStr, AmountStyle>) -> bool {
        self.to_cost()
            .canonicalize(styles)
            .normalized()
            .amounts()
            .iter()
            .all(|a| a.looks_zero(styles))
    }

    /// A definite sign across every nonzero normalized commodity, or `None` if they disagree.
    ///
    /// `Some(true)` means every nonzero component is positive, `Some(false)` means every one is
    /// negative, `None` means at least one of each (or mixed-sign-within-commodity after
    /// normalization, which cannot happen post-sum but can for raw un-normalized callers).
    #[must_use]
    pub fn sign(&self) -> Option<bool> {
        let nonzero: Vec<Amount> = self
            .amounts()
            .into_iter()
            .filter(|a| !a.quantity.is_zero())
            .collect();
        let first = nonzero.first()?;
        let first_negative = first.is_negative();
        if nonzero.iter().all(|a| a.is_negative() == first_negative) {
            Some(!first_negative)
        } else {
            None
        }
    }

    /// The distinct commodities present, in first-appearance order of the raw components.
    #[must_use]
    pub fn commodities(&self) -> Vec<InternedStr> {
        let mut seen = Vec::new();
        for a in &self.raw {
            if !seen.contains(&a.commodity) {
                seen.push(a.commodity.clone());
            }
        }
        seen
    }

    /// The single normalized amount, if exactly one commodity is present.
    #[must_use]
    pub fn as_single(&self) -> Option<Amount> {
        let amounts = self.amounts();
        if amounts.len() == 1 {
            amounts.into_iter().next()
        } else {
            None
        }
    }
}

impl fmt::Display for MixedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amounts = self.amounts();
        if amounts.is_empty() {
            return write!(f, "0");
        }
        let rendered: Vec<String> = amounts.iter().map(ToString::to_string).collect();
        write!(f, "{}", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Price;
    use rust_decimal_macros::dec;

    fn usd(q: Decimal) -> Amount {
        Amount::new("USD", q)
    }
    fn eur(q: Decimal) -> Amount {
        Amount::new("EUR", q)
    }

    #[test]
    fn normalization_sums_same_commodity() {
        let m = MixedAmount::from_amounts(vec![usd(dec!(1)), usd(dec!(2)), eur(dec!(3))]);
        let amounts = m.amounts();
        assert_eq!(amounts.len(), 2);
        assert_eq!(amounts[0].quantity, dec!(3));
        assert_eq!(amounts[1].quantity, dec!(3));
    }

    #[test]
    fn sign_is_none_when_mixed() {
        let m = MixedAmount::from_amounts(vec![usd(dec!(1)), eur(dec!(-1))]);
        assert_eq!(m.sign(), None);
    }

    #[test]
    fn sign_is_definite_when_uniform() {
        let m = MixedAmount::from_amounts(vec![usd(dec!(1)), eur(dec!(2))]);
        assert_eq!(m.sign(), Some(true));
        let m = MixedAmount::from_amounts(vec![usd(dec!(-1)), eur(dec!(-2))]);
        assert_eq!(m.sign(), Some(false));
    }

    #[test]
    fn to_cost_collapses_into_target_commodity() {
        let priced = usd(dec!(10)).with_price(Price::Unit(Box::new(eur(dec!(0.9)))));
        let m = MixedAmount::from_amounts(vec![priced, eur(dec!(1))]);
        let costed = m.to_cost();
        let amounts = costed.amounts();
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].commodity, InternedStr::new("EUR"));
        assert_eq!(amounts[0].quantity, dec!(10.0));
    }

    #[test]
    fn amount_in_commodity_defaults_to_zero() {
        let m = MixedAmount::from_amounts(vec![usd(dec!(5))]);
        let eur_amt = m.amount_in_commodity(&InternedStr::new("EUR"));
        assert!(eur_amt.quantity.is_zero());
    }

    #[test]
    fn strip_prices_drops_price_from_every_component() {
        let priced = usd(dec!(10)).with_price(Price::Unit(Box::new(eur(dec!(0.9)))));
        let m = MixedAmount::from_amounts(vec![priced, eur(dec!(1))]);
        let stripped = m.strip_prices();
        assert!(stripped.raw().iter().all(|a| a.price.is_none()));
    }
}
