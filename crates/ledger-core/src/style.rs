//! Display styling for amounts: symbol placement, precision, and punctuation.
//!
//! Styles are descriptive, not prescriptive: they record how a commodity was written in the
//! source so it can be rendered the same way again, and they set the precision at which a
//! quantity "looks zero" (see [`crate::amount::Amount::looks_zero`]).

use std::fmt;

/// Which side of the quantity the commodity symbol is written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// `$1.00`
    Left,
    /// `1.00 USD`
    Right,
}

/// The number of digits shown after the decimal mark.
///
/// `Natural` defers to however many digits the source actually wrote; a fixed precision rounds
/// display (and looks-zero testing) to exactly that many digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Precision {
    /// Whatever the source had; not pinned to a fixed digit count.
    Natural,
    /// A fixed, non-negative number of digits after the decimal mark.
    Fixed(u32),
}

impl Precision {
    /// The number of digits to round to for display and looks-zero purposes.
    ///
    /// `Natural` falls back to `fallback`, the precision actually observed in a given quantity,
    /// since there is no fixed digit count to use instead.
    #[must_use]
    pub fn resolve(self, fallback: u32) -> u32 {
        match self {
            Precision::Natural => fallback,
            Precision::Fixed(n) => n,
        }
    }

    /// Saturating sum of two precisions, floored at 2, per the price-inferrer's unit-price rule.
    ///
    /// `Natural` is contagious: if either side is `Natural` the combined precision is `Natural`
    /// too, since there is no fixed digit budget to add.
    #[must_use]
    pub fn combine_for_unit_price(self, other: Self) -> Self {
        match (self, other) {
            (Precision::Fixed(a), Precision::Fixed(b)) => {
                Precision::Fixed(a.saturating_add(b).max(2))
            }
            _ => Precision::Natural,
        }
    }
}

/// How digits are grouped for display, e.g. thousands separators.
///
/// Grouping never affects balancing semantics; it is carried only so a rendered transaction
/// reproduces the source faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct DigitGroups {
    /// The separator character, if any (e.g. `,`).
    pub separator: Option<char>,
    /// Group sizes from the decimal mark outward (e.g. `[3]` for thousands).
    pub sizes: Vec<u8>,
}

/// The full display style of a commodity: symbol placement, spacing, precision, and punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AmountStyle {
    /// Which side the commodity symbol is written on.
    pub side: Side,
    /// Whether a space separates the symbol from the quantity.
    pub spaced: bool,
    /// Decimal precision, or "natural".
    pub precision: Precision,
    /// The character used as a decimal mark (usually `.` or `,`).
    pub decimal_mark: char,
    /// Digit grouping, if the source used any.
    pub digit_groups: DigitGroups,
}

impl AmountStyle {
    /// A plain, unadorned style: `1234.56 XYZ`.
    #[must_use]
    pub fn natural() -> Self {
        Self {
            side: Side::Right,
            spaced: true,
            precision: Precision::Natural,
            decimal_mark: '.',
            digit_groups: DigitGroups::default(),
        }
    }
}

impl Default for AmountStyle {
    fn default() -> Self {
        Self::natural()
    }
}

impl fmt::Display for AmountStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            Precision::Natural => write!(f, "natural precision"),
            Precision::Fixed(n) => write!(f, "{n} decimal places"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_is_contagious() {
        let combined = Precision::Natural.combine_for_unit_price(Precision::Fixed(2));
        assert_eq!(combined, Precision::Natural);
    }

    #[test]
    fn fixed_precisions_sum_and_floor_at_two() {
        assert_eq!(
            Precision::Fixed(0).combine_for_unit_price(Precision::Fixed(0)),
            Precision::Fixed(2)
        );
        assert_eq!(
            Precision::Fixed(2).combine_for_unit_price(Precision::Fixed(3)),
            Precision::Fixed(5)
        );
    }

    #[test]
    fn resolve_uses_fallback_only_when_natural() {
        assert_eq!(Precision::Natural.resolve(4), 4);
        assert_eq!(Precision::Fixed(2).resolve(4), 2);
    }
}
