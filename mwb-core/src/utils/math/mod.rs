//! Math utilities for the Mecanum-Wheel Bot.
//!
//! This module provides deadband shaping for operator inputs and Cartesian
//! wheel resolution for four-wheeled mecanum chassis.

pub mod mecanum;
pub mod shaping;
