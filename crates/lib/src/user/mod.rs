//! User records returned by discovery.
//!
//! Only the fields discovery reads are modelled here; anything else the
//! backend sends is ignored on deserialization.

pub mod types;

pub use types::*;
