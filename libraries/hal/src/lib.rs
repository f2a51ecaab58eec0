#![cfg_attr(not(test), no_std)]

mod gps;
mod types;

pub use gps::*;
pub use types::*;
