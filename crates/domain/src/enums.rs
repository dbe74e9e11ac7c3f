use serde::{Deserialize, Serialize};

/// Orientation of a trade against the pool.
///
/// The same direction value is used for exact-in and exact-out quotes: it
/// names which asset enters the pool and which leaves, independently of
/// which leg's size is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Risky asset in, stable asset out.
    RiskyToStable,
    /// Stable asset in, risky asset out.
    StableToRisky,
}

impl SwapDirection {
    /// Returns the opposite orientation.
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SwapDirection::RiskyToStable => SwapDirection::StableToRisky,
            SwapDirection::StableToRisky => SwapDirection::RiskyToStable,
        }
    }
}
