//! Options controlling how balancing behaves.

use std::collections::HashMap;

use ledger_core::{AmountStyle, InternedStr};

/// Options accepted by every entry point in this crate.
///
/// The defaults match a plain, unconfigured ledger: assertions are checked, prices are
/// inferred, and commodity styles are derived from the journal itself rather than supplied by
/// the caller.
#[derive(Debug, Clone)]
pub struct BalancingOpts {
    /// Skip balance-assertion checking entirely.
    ///
    /// Lets a caller re-run a journal that has known-stale assertions without giving up on
    /// balancing, at the cost of losing that safety check.
    pub ignore_assertions: bool,
    /// Attempt to infer a conversion price when a transaction's class has exactly two
    /// commodities with opposite signs and neither already carries one.
    pub infer_transaction_prices: bool,
    /// Commodity styles to use instead of ones derived from the journal.
    ///
    /// `None` means "derive from the journal" (the journal balancer does this once up front and
    /// writes the result back into the options before using them); `Some` pins styles supplied
    /// by the caller, e.g. from a `commodity` directive elsewhere in the ledger.
    pub commodity_styles: Option<HashMap<InternedStr, AmountStyle>>,
}

impl BalancingOpts {
    /// The default options: assertions checked, prices inferred, styles derived from the
    /// journal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore_assertions: false,
            infer_transaction_prices: true,
            commodity_styles: None,
        }
    }

    /// Consuming builder: skip assertion checking.
    #[must_use]
    pub fn with_ignore_assertions(mut self, ignore: bool) -> Self {
        self.ignore_assertions = ignore;
        self
    }

    /// Consuming builder: toggle price inference.
    #[must_use]
    pub fn with_infer_transaction_prices(mut self, infer: bool) -> Self {
        self.infer_transaction_prices = infer;
        self
    }

    /// Consuming builder: pin commodity styles instead of deriving them from the journal.
    #[must_use]
    pub fn with_commodity_styles(mut self, styles: HashMap<InternedStr, AmountStyle>) -> Self {
        self.commodity_styles = Some(styles);
        self
    }

    /// The styles to use right now: the pinned map if one was supplied, otherwise empty (the
    /// journal balancer fills this in from the journal before the per-transaction passes run).
    #[must_use]
    pub fn styles(&self) -> HashMap<InternedStr, AmountStyle> {
        self.commodity_styles.clone().unwrap_or_default()
    }
}

impl Default for BalancingOpts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behavior() {
        let opts = BalancingOpts::new();
        assert!(!opts.ignore_assertions);
        assert!(opts.infer_transaction_prices);
        assert!(opts.commodity_styles.is_none());
    }
}
