//! Operator input handling for the Mecanum-Wheel Bot.
//!
//! - `gamepad`: per-port gamepad state updated from driver-station frames
//! - `mapping`: directional-pad/stick and trigger mapping into actuator
//!   commands

pub mod gamepad;
pub mod mapping;
