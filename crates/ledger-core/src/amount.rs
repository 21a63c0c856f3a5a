//! A single-commodity quantity, with an optional conversion price and display style.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;

use crate::intern::InternedStr;
use crate::style::AmountStyle;

/// A conversion factor attached to an [`Amount`], expressing its value in another commodity.
///
/// `Unit` gives the rate for one unit of the amount's commodity; `Total` gives the rate for the
/// whole amount at once. The two render differently (`@` vs `@@`) and are inferred differently
/// (see the price inferrer): `Total` is exact when only one posting carries the commodity,
/// `Unit` is used when several postings share it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Price {
    /// Rate per unit of the priced amount's commodity.
    Unit(Box<Amount>),
    /// Rate for the whole priced amount, regardless of its quantity.
    Total(Box<Amount>),
}

impl Price {
    /// The commodity the price converts *to*.
    #[must_use]
    pub fn target_commodity(&self) -> &InternedStr {
        match self {
            Price::Unit(a) | Price::Total(a) => &a.commodity,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Unit(a) => write!(f, "@ {a}"),
            Price::Total(a) => write!(f, "@@ {a}"),
        }
    }
}

/// A quantity of a single commodity, with an optional conversion price and display style.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Amount {
    /// The commodity symbol, e.g. `USD`.
    pub commodity: InternedStr,
    /// The signed quantity.
    pub quantity: Decimal,
    /// An optional conversion price to another commodity.
    pub price: Option<Price>,
    /// The display style this amount was written (or should be rendered) with.
    pub style: AmountStyle,
}

impl Amount {
    /// Builds an amount with no price, using [`AmountStyle::natural`].
    #[must_use]
    pub fn new(commodity: impl Into<InternedStr>, quantity: Decimal) -> Self {
        Self {
            commodity: commodity.into(),
            quantity,
            price: None,
            style: AmountStyle::natural(),
        }
    }

    /// Consuming builder: attaches a conversion price.
    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Consuming builder: sets the display style.
    #[must_use]
    pub fn with_style(mut self, style: AmountStyle) -> Self {
        self.style = style;
        self
    }

    /// The negation of this amount: quantity flips sign, price and style are unchanged.
    ///
    /// A price is a conversion rate, not a value, so negating the amount it is attached to does
    /// not negate the rate itself.
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            commodity: self.commodity.clone(),
            quantity: -self.quantity,
            price: self.price.clone(),
            style: self.style.clone(),
        }
    }

    /// `true` if the quantity is strictly negative.
    ///
    /// Zero is neither negative nor positive; callers that need a definite sign should check
    /// [`Amount::is_negative`] and [`Amount::is_positive`] separately and treat neither being
    /// true as "no definite sign".
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.quantity.is_sign_negative() && !self.quantity.is_zero()
    }

    /// `true` if the quantity is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.quantity.is_sign_positive() && !self.quantity.is_zero()
    }

    /// This amount with its conversion price removed, quantity and commodity unchanged.
    ///
    /// Used when folding a posting's amount into a running balance: the balance tracks what was
    /// actually posted in its own commodity, not the cost the posting happened to be priced at.
    #[must_use]
    pub fn without_price(&self) -> Self {
        Self {
            price: None,
            ..self.clone()
        }
    }

    /// Converts to the priced commodity, applying the price if present.
    ///
    /// `Unit(rate)` multiplies the quantity by the rate; `Total(rate)` replaces the quantity
    /// with the rate's magnitude, signed to match the original amount. An amount with no price
    /// converts to itself.
    #[must_use]
    pub fn to_cost(&self) -> Self {
        match &self.price {
            None => self.clone(),
            Some(Price::Unit(rate)) => Self {
                commodity: rate.commodity.clone(),
                quantity: self.quantity * rate.quantity,
                price: None,
                style: rate.style.clone(),
            },
            Some(Price::Total(rate)) => {
                let sign = if self.is_negative() {
                    Decimal::NEGATIVE_ONE
                } else {
                    Decimal::ONE
                };
                Self {
                    commodity: rate.commodity.clone(),
                    quantity: rate.quantity.abs() * sign,
                    price: None,
                    style: rate.style.clone(),
                }
            }
        }
    }

    /// Replaces this amount's style with the one registered for its commodity, if any.
    #[must_use]
    pub fn canonicalize(&self, styles: &HashMap<InternedStr, AmountStyle>) -> Self {
        match styles.get(&self.commodity) {
            Some(style) => self.clone().with_style(style.clone()),
            None => self.clone(),
        }
    }

    /// `true` if, after canonicalizing under `styles`, the quantity rounds to zero at its
    /// commodity's display precision.
    ///
    /// This is the "looks zero" test: humans read rounded numbers, so a quantity of
    /// `0.0049 USD` at two decimal places looks like zero even though it is not exactly zero.
    #[must_use]
    pub fn looks_zero(&self, styles: &HashMap<InternedStr, AmountStyle>) -> bool {
        let canon = self.canonicalize(styles);
        let fallback = canon.quantity.scale();
        let precision = canon.style.precision.resolve(fallback);
        canon.quantity.round_dp(precision).is_zero()
    }

    /// A `Unit` price amount for `-to_quantity / from_quantity`, with precision combined from
    /// both commodities' styles (used by the price inferrer).
    #[must_use]
    pub fn unit_rate(to: &Amount, from_quantity: Decimal, from_style: &AmountStyle) -> Self {
        let rate = -to.quantity / from_quantity;
        let precision = from_style
            .precision
            .combine_for_unit_price(to.style.precision);
        let mut style = to.style.clone();
        style.precision = precision;
        Self {
            commodity: to.commodity.clone(),
            quantity: rate,
            price: None,
            style,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::style::Side;
        let fallback = self.quantity.scale();
        let precision = self.style.precision.resolve(fallback);
        let quantity = self.quantity.round_dp(precision);
        let sep = if self.style.spaced { " " } else { "" };
        match self.style.side {
            Side::Left => write!(f, "{}{sep}{quantity}", self.commodity)?,
            Side::Right => write!(f, "{quantity}{sep}{}", self.commodity)?,
        }
        if let Some(price) = &self.price {
            write!(f, " {price}")?;
        }
        Ok(())
    }
}
