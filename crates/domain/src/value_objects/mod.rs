pub mod fixed_point;
pub mod price;

pub use fixed_point::FixedPointValue;
pub use price::{ImpliedPrice, Price};
