//! In-process implementations of the store and price traits.

pub mod memory;
