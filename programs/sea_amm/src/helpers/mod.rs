pub mod account;
pub mod transfer;

pub use account::*;
pub use transfer::*;
