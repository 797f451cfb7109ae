//! Driver-station link.
//!
//! The station feeds the robot two kinds of frames: phase changes from the
//! field scheduler and gamepad reports from the operator consoles. Frames
//! arrive as tagged JSON, are decoded into a [`StationCommand`], and routed
//! onto per-concern channels that the match loop drains at tick boundaries.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::{Deserialize, Serialize};

use crate::utils::hid::gamepad::GamepadReport;
use crate::utils::robot::MatchPhase;

/// Channel carrying phase changes from the field scheduler.
pub static PHASE_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, MatchPhase, 4> =
    embassy_sync::channel::Channel::new();

/// Channel carrying gamepad frames from the operator consoles.
pub static HID_CHANNEL: embassy_sync::channel::Channel<CriticalSectionRawMutex, GamepadFrame, 16> =
    embassy_sync::channel::Channel::new();

/// One gamepad report addressed to a controller port.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GamepadFrame {
    pub port: u8,
    pub report: GamepadReport,
}

/// Station frame variants.
///
/// Serialized as JSON with tag `"sc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(tag = "sc", rename_all = "snake_case")]
pub enum StationCommand {
    /// Phase change from the field scheduler.
    P { phase: MatchPhase },
    /// Gamepad report from one operator console.
    G { port: u8, report: GamepadReport },
}

/// Decode one JSON frame from the station link.
pub fn decode(frame: &str) -> Result<StationCommand, serde_json::Error> {
    serde_json::from_str(frame)
}

/// Forward a decoded command onto its channel.
pub async fn route(command: StationCommand) {
    match command {
        StationCommand::P { phase } => PHASE_CHANNEL.send(phase).await,
        StationCommand::G { port, report } => {
            HID_CHANNEL.send(GamepadFrame { port, report }).await
        }
    }
}
