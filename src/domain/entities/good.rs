//! # Good Entity
//!
//! A quantity of one currency kind.
//!
//! [`Good`] is the only carrier of value in the protocol. It cannot be
//! cloned: quantity moves between goods exclusively through
//! [`split`](Good::split) and [`merge`](Good::merge), so value is never
//! created or destroyed by accident. [`GoodSnapshot`] is the copyable view
//! handed out by read-only queries.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::entities::Good;
//! use market_protocol::domain::value_objects::{GoodKind, Quantity};
//!
//! let mut wallet = Good::with_quantity(GoodKind::Usd, Quantity::from_units(100));
//! let mut part = wallet.split(Quantity::from_units(30)).unwrap();
//! assert_eq!(wallet.quantity(), Quantity::from_units(70));
//!
//! wallet.merge(&mut part).unwrap();
//! assert_eq!(wallet.quantity(), Quantity::from_units(100));
//! assert!(part.is_empty());
//! ```

use crate::domain::errors::{GoodError, GoodResult};
use crate::domain::value_objects::{GoodKind, ParseEnumError, ProtocolConstants, Quantity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity of one currency kind.
///
/// # Invariants
///
/// - `quantity >= 0` (enforced by [`Quantity`])
/// - only `split` and `merge` change the quantity, and both leave every
///   operand untouched when they fail
#[derive(Debug, PartialEq, Eq)]
pub struct Good {
    kind: GoodKind,
    quantity: Quantity,
}

impl Good {
    /// Creates a good from a currency code, holding the starting quantity.
    ///
    /// # Errors
    ///
    /// Returns `ParseEnumError` if `name` is not a known currency code.
    pub fn new(name: &str, constants: &ProtocolConstants) -> Result<Self, ParseEnumError> {
        let kind = name.parse::<GoodKind>()?;
        Ok(Self::from_kind(kind, constants))
    }

    /// Creates an EUR good holding the starting quantity.
    #[must_use]
    pub fn new_default(constants: &ProtocolConstants) -> Self {
        Self::from_kind(GoodKind::Eur, constants)
    }

    /// Creates a good of `kind` holding the starting quantity.
    #[must_use]
    pub fn from_kind(kind: GoodKind, constants: &ProtocolConstants) -> Self {
        Self::with_quantity(kind, constants.starting_quantity())
    }

    /// Creates a good with an explicit quantity.
    #[must_use]
    pub const fn with_quantity(kind: GoodKind, quantity: Quantity) -> Self {
        Self { kind, quantity }
    }

    /// Creates an empty good of `kind`.
    #[must_use]
    pub const fn empty(kind: GoodKind) -> Self {
        Self::with_quantity(kind, Quantity::ZERO)
    }

    /// Returns the kind.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> GoodKind {
        self.kind
    }

    /// Returns the quantity.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns true if the good holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Returns true if this is the settlement currency (EUR).
    #[inline]
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.kind.is_default()
    }

    /// Returns true if both goods are of the same kind.
    #[inline]
    #[must_use]
    pub fn same_kind(&self, other: &Self) -> bool {
        self.kind == other.kind
    }

    /// Returns a copyable view of this good.
    #[must_use]
    pub const fn snapshot(&self) -> GoodSnapshot {
        GoodSnapshot {
            kind: self.kind,
            quantity: self.quantity,
        }
    }

    /// Moves `quantity` out of this good into a new good of the same kind.
    ///
    /// The good must hold strictly more than `quantity`.
    ///
    /// # Errors
    ///
    /// Returns `GoodError::NotEnoughQuantity` if `self.quantity() <= quantity`;
    /// the good is left unchanged.
    pub fn split(&mut self, quantity: Quantity) -> GoodResult<Self> {
        if self.quantity <= quantity {
            return Err(GoodError::NotEnoughQuantity {
                kind: self.kind,
                requested: quantity,
                available: self.quantity,
            });
        }
        self.quantity = self.quantity.safe_sub(quantity)?;
        Ok(Self::with_quantity(self.kind, quantity))
    }

    /// Moves the whole of `other` into this good, leaving `other` empty.
    ///
    /// # Errors
    ///
    /// Returns `GoodError::DifferentKindsOfGood` if the kinds differ; both
    /// goods are left unchanged.
    pub fn merge(&mut self, other: &mut Self) -> GoodResult<()> {
        if !self.same_kind(other) {
            return Err(GoodError::DifferentKindsOfGood {
                expected: self.kind,
                found: other.kind,
            });
        }
        let merged = self.quantity.safe_add(other.quantity)?;
        self.quantity = merged;
        other.quantity = Quantity::ZERO;
        Ok(())
    }

    /// Moves everything out of this good into a new good, leaving it empty.
    ///
    /// Unlike [`split`](Self::split) this may take the full quantity.
    ///
    /// # Errors
    ///
    /// Propagates the (unreachable in practice) merge failure.
    pub fn drain(&mut self) -> GoodResult<Self> {
        let mut drained = Self::empty(self.kind);
        drained.merge(self)?;
        Ok(drained)
    }
}

impl fmt::Display for Good {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.kind)
    }
}

/// Read-only view of a good: kind and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct GoodSnapshot {
    /// Kind of the good.
    pub kind: GoodKind,
    /// Quantity held.
    pub quantity: Quantity,
}

impl fmt::Display for GoodSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn usd(units: u64) -> Good {
        Good::with_quantity(GoodKind::Usd, Quantity::from_units(units))
    }

    mod construction {
        use super::*;

        #[test]
        fn constructors_use_starting_quantity() {
            let constants = ProtocolConstants::default();
            let start = constants.starting_quantity();

            let named = Good::new("yuan", &constants).unwrap();
            assert_eq!(named.kind(), GoodKind::Yuan);
            assert_eq!(named.quantity(), start);

            let cash = Good::new_default(&constants);
            assert!(cash.is_default());
            assert_eq!(cash.quantity(), start);

            let yen = Good::from_kind(GoodKind::Yen, &constants);
            assert_eq!(yen.kind(), GoodKind::Yen);
            assert_eq!(yen.quantity(), start);
        }

        #[test]
        fn unknown_code_is_rejected() {
            let result = Good::new("doubloon", &ProtocolConstants::default());
            assert!(result.is_err());
        }

        #[test]
        fn only_eur_is_default() {
            assert!(Good::empty(GoodKind::Eur).is_default());
            assert!(!Good::empty(GoodKind::Usd).is_default());
        }
    }

    mod split {
        use super::*;

        #[test]
        fn split_moves_exact_quantity() {
            let mut good = usd(100);
            let part = good.split(Quantity::from_units(40)).unwrap();
            assert_eq!(part.quantity(), Quantity::from_units(40));
            assert_eq!(part.kind(), GoodKind::Usd);
            assert_eq!(good.quantity(), Quantity::from_units(60));
        }

        #[test]
        fn split_of_entire_quantity_fails_without_mutation() {
            let mut good = usd(100);
            let result = good.split(Quantity::from_units(100));
            assert!(matches!(result, Err(GoodError::NotEnoughQuantity { .. })));
            assert_eq!(good.quantity(), Quantity::from_units(100));
        }

        #[test]
        fn split_beyond_quantity_fails() {
            let mut good = usd(10);
            assert!(good.split(Quantity::from_units(11)).is_err());
            assert_eq!(good.quantity(), Quantity::from_units(10));
        }

        #[test]
        fn split_fractional() {
            let mut good = Good::with_quantity(GoodKind::Yen, Quantity::new(dec!(1.5)).unwrap());
            let part = good.split(Quantity::new(dec!(0.25)).unwrap()).unwrap();
            assert_eq!(part.quantity().get(), dec!(0.25));
            assert_eq!(good.quantity().get(), dec!(1.25));
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn merge_drains_other() {
            let mut a = usd(10);
            let mut b = usd(5);
            a.merge(&mut b).unwrap();
            assert_eq!(a.quantity(), Quantity::from_units(15));
            assert!(b.is_empty());
        }

        #[test]
        fn merge_different_kinds_fails_without_mutation() {
            let mut a = usd(10);
            let mut b = Good::with_quantity(GoodKind::Eur, Quantity::from_units(5));
            let result = a.merge(&mut b);
            assert_eq!(
                result,
                Err(GoodError::DifferentKindsOfGood {
                    expected: GoodKind::Usd,
                    found: GoodKind::Eur,
                })
            );
            assert_eq!(a.quantity(), Quantity::from_units(10));
            assert_eq!(b.quantity(), Quantity::from_units(5));
        }

        #[test]
        fn merge_overflow_fails_without_mutation() {
            let mut a = Good::with_quantity(GoodKind::Eur, Quantity::new(Decimal::MAX).unwrap());
            let mut b = Good::with_quantity(GoodKind::Eur, Quantity::from_units(1));
            assert!(matches!(a.merge(&mut b), Err(GoodError::Arithmetic(_))));
            assert_eq!(b.quantity(), Quantity::from_units(1));
        }

        #[test]
        fn drain_takes_everything() {
            let mut a = usd(42);
            let drained = a.drain().unwrap();
            assert_eq!(drained.quantity(), Quantity::from_units(42));
            assert!(a.is_empty());
        }
    }

    #[test]
    fn snapshot_and_display() {
        let good = usd(7);
        let snap = good.snapshot();
        assert_eq!(snap.kind, GoodKind::Usd);
        assert_eq!(snap.quantity, Quantity::from_units(7));
        assert_eq!(good.to_string(), "7 USD");
        assert_eq!(snap.to_string(), "7 USD");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn quantity_strategy() -> impl Strategy<Value = Decimal> {
            (0u64..1_000_000_000, 0u32..6).prop_map(|(mantissa, scale)| {
                Decimal::from_i128_with_scale(i128::from(mantissa), scale)
            })
        }

        proptest! {
            #[test]
            fn split_conserves_total(total in quantity_strategy(), take in quantity_strategy()) {
                let mut good = Good::with_quantity(GoodKind::Usd, Quantity::new(total).unwrap());
                let request = Quantity::new(take).unwrap();
                match good.split(request) {
                    Ok(part) => {
                        prop_assert!(request.get() < total);
                        prop_assert_eq!(part.quantity().get() + good.quantity().get(), total);
                    }
                    Err(GoodError::NotEnoughQuantity { .. }) => {
                        prop_assert!(request.get() >= total);
                        prop_assert_eq!(good.quantity().get(), total);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {other}"),
                }
            }

            #[test]
            fn split_merge_roundtrip_restores(total in quantity_strategy(), takes in proptest::collection::vec(quantity_strategy(), 1..8)) {
                let mut good = Good::with_quantity(GoodKind::Yen, Quantity::new(total).unwrap());
                let mut parts = Vec::new();
                for take in takes {
                    if let Ok(part) = good.split(Quantity::new(take).unwrap()) {
                        parts.push(part);
                    }
                }
                for mut part in parts {
                    good.merge(&mut part).unwrap();
                    prop_assert!(part.is_empty());
                }
                prop_assert_eq!(good.quantity().get(), total);
            }
        }
    }
}
