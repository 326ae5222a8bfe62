//! Temperature sensor drivers

pub mod tmp1075;

pub use tmp1075::Tmp1075;
