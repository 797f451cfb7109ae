//! Gamepad state for the driver-station link.
//!
//! A [`GamepadReport`] is the raw snapshot carried by one station frame
//! (serialized as JSON). [`Gamepad`] latches the most recent report per port
//! so the lifecycle callbacks can poll axes, buttons, and the directional
//! pad between frames.

use serde::{Deserialize, Serialize};

use crate::utils::hid::mapping::DirectionalInput;
use crate::utils::math::shaping;

/// Analog channels reported per gamepad.
pub const AXIS_COUNT: usize = 6;

/// Analog channel assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    LeftX = 0,
    LeftY = 1,
    LeftTrigger = 2,
    RightTrigger = 3,
    RightX = 4,
    RightY = 5,
}

/// Button bit assignments in the report mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    LeftBumper = 4,
    RightBumper = 5,
}

/// Raw state snapshot of one gamepad, as carried by a station frame.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct GamepadReport {
    /// Analog channels, nominal `[-1.0, 1.0]`.
    #[serde(default)]
    pub axes: [f32; AXIS_COUNT],
    /// Button bitmask, one bit per [`Button`].
    #[serde(default)]
    pub buttons: u16,
    /// Directional-pad angle in degrees, `None` while released.
    #[serde(default)]
    pub pov: Option<u16>,
}

/// Latched gamepad state polled by the lifecycle callbacks.
pub struct Gamepad {
    report: GamepadReport,
}

impl Gamepad {
    /// A gamepad with everything centered and released.
    pub const fn new() -> Self {
        Self {
            report: GamepadReport {
                axes: [0.0; AXIS_COUNT],
                buttons: 0,
                pov: None,
            },
        }
    }

    /// Latch a fresh report from the station link.
    pub fn update(
        &mut self,
        report: GamepadReport,
    ) {
        self.report = report;
    }

    /// Read one analog channel, sanitized (NaN reads as 0, clamped).
    pub fn axis(
        &self,
        axis: Axis,
    ) -> f32 {
        shaping::sanitize(self.report.axes[axis as usize])
    }

    /// Read one button from the mask.
    pub fn button(
        &self,
        button: Button,
    ) -> bool {
        self.report.buttons & (1 << button as u16) != 0
    }

    /// Directional-pad angle, folded into `0..360`.
    pub fn pov(&self) -> Option<u16> {
        self.report.pov.map(|angle| angle % 360)
    }

    /// The directional reading for this tick: the pad while pressed, the
    /// sticks otherwise (left stick translates, right stick X rotates).
    pub fn direction_input(&self) -> DirectionalInput {
        match self.pov() {
            Some(angle) => DirectionalInput::Pad(angle),
            None => DirectionalInput::Sticks {
                x: self.axis(Axis::LeftX),
                y: self.axis(Axis::LeftY),
                twist: self.axis(Axis::RightX),
            },
        }
    }
}

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}
