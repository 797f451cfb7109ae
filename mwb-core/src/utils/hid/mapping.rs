//! Input-to-velocity mapping.
//!
//! Two pure mappings feed the actuator subsystems: [`map_direction`] turns a
//! directional-pad angle or the analog sticks into a 3-axis
//! [`VelocityCommand`], and [`map_trigger`] folds the two analog triggers
//! into one signed shooter scalar.

/// One chassis velocity command, produced fresh every control tick.
///
/// Components are nominal `[-1.0, 1.0]`: positive `forward` drives ahead,
/// positive `strafe` drives rightward, positive `rotate` spins clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityCommand {
    pub forward: f32,
    pub strafe: f32,
    pub rotate: f32,
}

impl VelocityCommand {
    /// The zero command.
    pub const fn neutral() -> Self {
        Self {
            forward: 0.0,
            strafe: 0.0,
            rotate: 0.0,
        }
    }
}

/// One directional reading per tick: the pad wins while pressed, the sticks
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DirectionalInput {
    /// Directional-pad angle in degrees, `0..360`, 0 = up, clockwise.
    Pad(u16),
    /// Analog stick channels: `x` strafes, `y` drives, `twist` rotates.
    Sticks { x: f32, y: f32, twist: f32 },
}

/// Map a directional input into a velocity command.
///
/// Pad presses drive at the fixed `button_power`; the 45 and 315 degree
/// positions feed both forward and strafe so the pad covers diagonals.
/// Stick input scales all three channels by `axis_power`.
pub fn map_direction(
    input: DirectionalInput,
    axis_power: f32,
    button_power: f32,
) -> VelocityCommand {
    match input {
        DirectionalInput::Pad(angle) => {
            let mut forward = 0.0;
            let mut strafe = 0.0;
            if matches!(angle, 0 | 45 | 315) {
                forward = button_power;
            }
            if matches!(angle, 135 | 180 | 225) {
                forward = -button_power;
            }
            if matches!(angle, 45 | 90 | 135) {
                strafe = button_power;
            }
            if matches!(angle, 225 | 270 | 315) {
                strafe = -button_power;
            }
            VelocityCommand {
                forward,
                strafe,
                rotate: 0.0,
            }
        }
        DirectionalInput::Sticks { x, y, twist } => VelocityCommand {
            forward: y * axis_power,
            strafe: x * axis_power,
            rotate: twist * axis_power,
        },
    }
}

/// Fold the two analog triggers into one signed shooter command.
///
/// The dominant trigger wins: left shoots forward at its own magnitude,
/// right shoots backward. Exact equality is the defined neutral point, not a
/// tolerance comparison.
pub fn map_trigger(
    left: f32,
    right: f32,
) -> f32 {
    if left > right {
        left
    } else if right > left {
        -right
    } else {
        0.0
    }
}
