#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod log;

mod error;

pub mod cell;
pub mod clock;
pub mod config;
pub mod device;
pub mod params;

pub use crate::device::Hx711;
pub use crate::error::{Error, Result};
