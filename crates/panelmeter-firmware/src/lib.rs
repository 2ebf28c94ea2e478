//! Board support for the panelmeter-rs firmware binary: touch digitizer,
//! flash-backed settings store and the system clock.

#![no_std]

extern crate alloc;

pub mod clock;
pub mod flash_store;
pub mod screen;
pub mod xpt2046;
