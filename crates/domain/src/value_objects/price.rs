use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A price of the risky asset denominated in the stable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// The inverse quote (stable priced in risky). Zero inverts to zero.
    #[must_use]
    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Execution price implied by a quote's realized flows.
///
/// A zero-input trade has no flow ratio; it reports `Infinite` rather than
/// failing on a division by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpliedPrice {
    /// Stable-denominated flow over risky-denominated flow.
    Finite(Decimal),
    /// Sentinel for a trade with zero input.
    Infinite,
}

impl ImpliedPrice {
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            ImpliedPrice::Finite(value) => Some(*value),
            ImpliedPrice::Infinite => None,
        }
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        matches!(self, ImpliedPrice::Infinite)
    }
}

impl fmt::Display for ImpliedPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImpliedPrice::Finite(value) => write!(f, "{value}"),
            ImpliedPrice::Infinite => write!(f, "inf"),
        }
    }
}
