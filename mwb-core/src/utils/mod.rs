//! Utility re-exports and helper macros for the Mecanum-Wheel Bot.
//!
//! This module re-exports the match lifecycle, actuator subsystems, timing,
//! and input handling:
//!
//! - `config`: dashboard value store and the fixed hardware map
//! - `controllers`: PWM motor groups and the drive/shooter/lifter subsystems
//! - `hid`: gamepad state and the input-to-velocity mapping
//! - `math`: deadband shaping and mecanum wheel resolution
//! - `robot`: lifecycle phases, periodic dispatch, and the match loop
//! - `station`: driver-station frame decoding and routing
//!
//! The `mk_static!` macro simplifies static initialization in no-std contexts.

pub mod config;
pub mod controllers;
pub mod hid;
pub mod math;
pub mod robot;
pub mod station;

pub use controllers::{Drivetrain, Lifter, Shooter};
pub use embassy_time::*;
pub use robot::{MatchLoop, MatchPhase, PhaseRunner, Robot};

#[macro_export]
/// Initialize a no-std static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a mutable reference to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
