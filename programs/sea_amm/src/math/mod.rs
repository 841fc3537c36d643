pub mod curve;
pub mod liquidity;

pub use curve::*;
pub use liquidity::*;
