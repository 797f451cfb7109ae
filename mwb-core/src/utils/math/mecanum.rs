//! Cartesian wheel resolution for four-wheeled mecanum chassis.
//!
//! Maps a body-frame [`VelocityCommand`] onto the four wheel speeds of a
//! mecanum drive. An optional field orientation angle rotates the
//! translation vector into the robot frame first, so the same command can
//! drive field-oriented when a heading source is available.
//!
//! # Example
//! ```rust
//! use mwb_core::utils::hid::mapping::VelocityCommand;
//! use mwb_core::utils::math::mecanum;
//! let cmd = VelocityCommand { forward: 1.0, strafe: 0.0, rotate: 0.0 };
//! let wheels = mecanum::resolve_cartesian(&cmd, 0.0);
//! ```

use core::f32::consts::PI;
use libm;

use crate::utils::hid::mapping::VelocityCommand;

/// Wheels on a mecanum chassis.
pub const WHEEL_COUNT: usize = 4;

/// Resolve a velocity command into wheel speeds.
///
/// `field_angle` is the chassis heading in degrees (0 with no heading
/// source). Returned order is `[front-left, rear-left, front-right,
/// rear-right]`, every speed in `[-1.0, 1.0]`.
pub fn resolve_cartesian(
    command: &VelocityCommand,
    field_angle: f32,
) -> [f32; WHEEL_COUNT] {
    // Rotate the translation vector into the robot frame.
    let a = field_angle * (PI / 180.0);
    let x = command.strafe * libm::cosf(a) + command.forward * libm::sinf(a);
    let y = -command.strafe * libm::sinf(a) + command.forward * libm::cosf(a);
    let r = command.rotate;

    let mut wheels = [
        x + y + r,
        -x + y + r,
        -x + y - r,
        x + y - r,
    ];
    normalize(&mut wheels);
    wheels
}

/// Scale all speeds down uniformly so the largest magnitude fits in `[-1, 1]`.
fn normalize(wheels: &mut [f32; WHEEL_COUNT]) {
    let mut peak = 0.0f32;
    for &w in wheels.iter() {
        if w.abs() > peak {
            peak = w.abs();
        }
    }
    if peak > 1.0 {
        for w in wheels.iter_mut() {
            *w /= peak;
        }
    }
}
