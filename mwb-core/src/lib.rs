//! Control logic for the Mecanum-Wheel Bot on no-std embedded platforms.
//!
//! For a runnable host simulation, see the `mwb-app/mock-rio` crate.
#![no_std]

pub mod utils;
