//! Actuator subsystems for the Mecanum-Wheel Bot.
//!
//! Each subsystem owns its own PWM expander on the shared I2C bus and
//! exposes brake, safety, and a move operation as its public contract:
//!
//! - `drivetrain`: two banks of four mecanum drive motors
//! - `shooter`: the two-motor shooter wheel
//! - `lifter`: the single-motor intake arm
//! - `motors`: the shared motor-group plumbing and safety watchdog

pub mod drivetrain;
pub mod lifter;
pub mod motors;
pub mod shooter;

pub use drivetrain::Drivetrain;
pub use lifter::Lifter;
pub use shooter::Shooter;
