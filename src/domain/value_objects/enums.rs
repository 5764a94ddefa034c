//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`GoodKind`] - The closed set of tradeable currencies
//! - [`TradeSide`] - Buy or Sell direction, seen from the trader
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a tradeable currency.
///
/// The set is closed: every market deals in a subset of these four kinds.
/// [`GoodKind::Eur`] is the settlement currency, used to pay for every
/// other kind.
///
/// # Examples
///
/// ```
/// use market_protocol::domain::value_objects::enums::GoodKind;
///
/// let kind: GoodKind = "usd".parse().unwrap();
/// assert_eq!(kind, GoodKind::Usd);
/// assert_eq!(kind.to_string(), "USD");
/// assert!(GoodKind::Eur.is_default());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum GoodKind {
    /// Euro, the settlement currency.
    Eur = 0,
    /// US dollar.
    Usd = 1,
    /// Japanese yen.
    Yen = 2,
    /// Chinese yuan.
    Yuan = 3,
}

impl GoodKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Eur, Self::Usd, Self::Yen, Self::Yuan];

    /// Returns true for the settlement currency (EUR).
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Eur)
    }

    /// Returns the ISO-like currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Yen => "YEN",
            Self::Yuan => "YUAN",
        }
    }
}

impl fmt::Display for GoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for GoodKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "YEN" | "JPY" => Ok(Self::Yen),
            "YUAN" | "CNY" => Ok(Self::Yuan),
            _ => Err(ParseEnumError::InvalidValue("GoodKind", s.to_string())),
        }
    }
}

/// Direction of a trade, from the trader's point of view.
///
/// # Examples
///
/// ```
/// use market_protocol::domain::value_objects::enums::TradeSide;
///
/// assert_eq!(TradeSide::Buy.opposite(), TradeSide::Sell);
/// assert_eq!(TradeSide::Sell.to_string(), "SELL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum TradeSide {
    /// The trader acquires goods from the market.
    Buy = 0,
    /// The trader hands goods to the market.
    Sell = 1,
}

impl TradeSide {
    /// Returns the opposite side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns true if this is a buy.
    #[inline]
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::Buy)
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(ParseEnumError::InvalidValue("TradeSide", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod good_kind {
        use super::*;

        #[test]
        fn parses_codes_case_insensitively() {
            assert_eq!("eur".parse::<GoodKind>().unwrap(), GoodKind::Eur);
            assert_eq!("USD".parse::<GoodKind>().unwrap(), GoodKind::Usd);
            assert_eq!(" Yen ".parse::<GoodKind>().unwrap(), GoodKind::Yen);
            assert_eq!("yuan".parse::<GoodKind>().unwrap(), GoodKind::Yuan);
            assert_eq!("CNY".parse::<GoodKind>().unwrap(), GoodKind::Yuan);
        }

        #[test]
        fn rejects_unknown_code() {
            let result = "GBP".parse::<GoodKind>();
            assert_eq!(
                result,
                Err(ParseEnumError::InvalidValue("GoodKind", "GBP".to_string()))
            );
        }

        #[test]
        fn only_eur_is_default() {
            assert!(GoodKind::Eur.is_default());
            assert!(!GoodKind::Usd.is_default());
            assert!(!GoodKind::Yen.is_default());
            assert!(!GoodKind::Yuan.is_default());
        }

        #[test]
        fn display_roundtrips_through_from_str() {
            for kind in GoodKind::ALL {
                assert_eq!(kind.to_string().parse::<GoodKind>().unwrap(), kind);
            }
        }

        #[test]
        fn serde_uses_codes() {
            let json = serde_json::to_string(&GoodKind::Yuan).unwrap();
            assert_eq!(json, "\"YUAN\"");
            let back: GoodKind = serde_json::from_str("\"USD\"").unwrap();
            assert_eq!(back, GoodKind::Usd);
        }
    }

    mod trade_side {
        use super::*;

        #[test]
        fn opposite_and_parse() {
            assert_eq!(TradeSide::Buy.opposite(), TradeSide::Sell);
            assert!(TradeSide::Buy.is_buy());
            assert_eq!("sell".parse::<TradeSide>().unwrap(), TradeSide::Sell);
            assert!("hold".parse::<TradeSide>().is_err());
        }
    }

    #[test]
    fn parse_error_display() {
        let err = ParseEnumError::InvalidValue("GoodKind", "XYZ".to_string());
        assert_eq!(err.to_string(), "invalid GoodKind value: 'XYZ'");
    }
}
