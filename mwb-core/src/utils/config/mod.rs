//! Robot configuration: the dashboard value store and the fixed hardware map.
//!
//! Two kinds of configuration feed the robot. The [`Dashboard`] is the
//! operator-tunable key/value store; a [`MatchSettings`] snapshot of it is
//! taken at every phase entry and stays immutable for the phase. The
//! [`RobotConfig`] is the fixed hardware map (expander addresses, channel
//! wiring, inversions) handed to the subsystem constructors once.

use embassy_time::Duration;
use pwm_pca9685::Channel;

/// Drive motors across both banks (two per wheel corner).
pub const DRIVE_MOTOR_COUNT: usize = 8;
/// Shooter motors.
pub const SHOOTER_MOTOR_COUNT: usize = 2;
/// Lifter motors.
pub const LIFTER_MOTOR_COUNT: usize = 1;

/// Dashboard keys understood by the robot.
pub mod keys {
    pub const DEADBAND_LIMIT: &str = "deadband_limit";
    pub const OUTPUT_LIMIT: &str = "output_limit";
    pub const AXIS_POWER: &str = "axis_power";
    pub const BUTTON_POWER: &str = "button_power";
    pub const AUTO_DRIVE_TIME: &str = "auto_drive_time";
    pub const AUTO_SHOOTER_TIME: &str = "auto_shooter_time";
    pub const AUTO_BACKWARDS: &str = "auto_backwards";
    pub const SINGLE_OPERATOR: &str = "single_operator";
}

/// One dashboard entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DashValue {
    Float(f32),
    Flag(bool),
}

/// Operator-facing key/value store.
///
/// Reads fall back to the caller's default when the key is absent or holds
/// the other value kind, mirroring how the entries behave before the
/// operator has touched them.
pub struct Dashboard {
    entries: hashbrown::HashMap<&'static str, DashValue>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            entries: hashbrown::HashMap::new(),
        }
    }

    pub fn put_float(
        &mut self,
        key: &'static str,
        value: f32,
    ) {
        self.entries.insert(key, DashValue::Float(value));
    }

    pub fn put_flag(
        &mut self,
        key: &'static str,
        value: bool,
    ) {
        self.entries.insert(key, DashValue::Flag(value));
    }

    pub fn float_or(
        &self,
        key: &str,
        default: f32,
    ) -> f32 {
        match self.entries.get(key) {
            Some(DashValue::Float(value)) => *value,
            _ => default,
        }
    }

    pub fn flag_or(
        &self,
        key: &str,
        default: bool,
    ) -> bool {
        match self.entries.get(key) {
            Some(DashValue::Flag(value)) => *value,
            _ => default,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadband threshold pair, immutable within a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeadbandConfig {
    /// Magnitudes below this count as stick noise.
    pub min_threshold: f32,
    /// Output limit; larger magnitudes clamp here.
    pub max_threshold: f32,
}

impl Default for DeadbandConfig {
    fn default() -> Self {
        Self {
            min_threshold: 0.15,
            max_threshold: 0.85,
        }
    }
}

/// Per-phase snapshot of the dashboard, reloaded on phase entry.
#[derive(Clone, Copy, Debug)]
pub struct MatchSettings {
    pub deadband: DeadbandConfig,
    /// Scale applied to analog stick drive.
    pub axis_power: f32,
    /// Fixed power for pad drive, bumper lift, and the autonomous sequence.
    pub button_power: f32,
    /// Autonomous: how long to drive before stopping.
    pub drive_time: Duration,
    /// Autonomous: how long to run the shooter.
    pub shooter_time: Duration,
    /// Autonomous drives backward instead of forward.
    pub backwards: bool,
    /// Whole match driven from gamepad 0.
    pub single_operator: bool,
}

impl MatchSettings {
    /// Snapshot the dashboard, falling back to the documented defaults.
    pub fn load(dashboard: &Dashboard) -> Self {
        Self {
            deadband: DeadbandConfig {
                min_threshold: dashboard.float_or(keys::DEADBAND_LIMIT, 0.15),
                max_threshold: dashboard.float_or(keys::OUTPUT_LIMIT, 0.85),
            },
            axis_power: dashboard.float_or(keys::AXIS_POWER, 0.85),
            button_power: dashboard.float_or(keys::BUTTON_POWER, 0.75),
            drive_time: seconds(dashboard.float_or(keys::AUTO_DRIVE_TIME, 4.0)),
            shooter_time: seconds(dashboard.float_or(keys::AUTO_SHOOTER_TIME, 2.0)),
            backwards: dashboard.flag_or(keys::AUTO_BACKWARDS, false),
            single_operator: dashboard.flag_or(keys::SINGLE_OPERATOR, false),
        }
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::load(&Dashboard::new())
    }
}

fn seconds(value: f32) -> Duration {
    Duration::from_millis((value.max(0.0) * 1000.0) as u64)
}

/// Fixed hardware map handed to the subsystem constructors.
///
/// Channel pairs are the two H-bridge inputs per motor; drive wheel order is
/// `[front-left, rear-left, front-right, rear-right]` for bank A, then the
/// same corners again for bank B.
pub struct RobotConfig {
    pub drive_address: u8,
    pub shooter_address: u8,
    pub lifter_address: u8,
    pub drive_channels: [(Channel, Channel); DRIVE_MOTOR_COUNT],
    pub drive_inverted: [bool; DRIVE_MOTOR_COUNT],
    pub shooter_channels: [(Channel, Channel); SHOOTER_MOTOR_COUNT],
    pub shooter_inverted: [bool; SHOOTER_MOTOR_COUNT],
    pub lifter_channels: [(Channel, Channel); LIFTER_MOTOR_COUNT],
    pub lifter_inverted: [bool; LIFTER_MOTOR_COUNT],
    /// Watchdog window before an unfed group is forced to neutral.
    pub safety_expiration: Duration,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            drive_address: 0x40,
            shooter_address: 0x41,
            lifter_address: 0x42,
            drive_channels: [
                (Channel::C0, Channel::C1),
                (Channel::C2, Channel::C3),
                (Channel::C4, Channel::C5),
                (Channel::C6, Channel::C7),
                (Channel::C8, Channel::C9),
                (Channel::C10, Channel::C11),
                (Channel::C12, Channel::C13),
                (Channel::C14, Channel::C15),
            ],
            // Right-side corners spin mirrored.
            drive_inverted: [false, false, true, true, false, false, true, true],
            shooter_channels: [(Channel::C0, Channel::C1), (Channel::C2, Channel::C3)],
            shooter_inverted: [false, false],
            lifter_channels: [(Channel::C0, Channel::C1)],
            lifter_inverted: [false],
            safety_expiration: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_falls_back_to_default() {
        let dash = Dashboard::new();
        assert_eq!(dash.float_or(keys::AXIS_POWER, 0.85), 0.85);
        assert!(!dash.flag_or(keys::AUTO_BACKWARDS, false));
    }

    #[test]
    fn test_dashboard_returns_stored_values() {
        let mut dash = Dashboard::new();
        dash.put_float(keys::DEADBAND_LIMIT, 0.2);
        dash.put_flag(keys::SINGLE_OPERATOR, true);
        assert_eq!(dash.float_or(keys::DEADBAND_LIMIT, 0.15), 0.2);
        assert!(dash.flag_or(keys::SINGLE_OPERATOR, false));
    }

    #[test]
    fn test_mismatched_kind_reads_as_default() {
        let mut dash = Dashboard::new();
        dash.put_flag(keys::DEADBAND_LIMIT, true);
        assert_eq!(dash.float_or(keys::DEADBAND_LIMIT, 0.15), 0.15);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = MatchSettings::default();
        assert_eq!(settings.deadband.min_threshold, 0.15);
        assert_eq!(settings.deadband.max_threshold, 0.85);
        assert_eq!(settings.axis_power, 0.85);
        assert_eq!(settings.button_power, 0.75);
        assert_eq!(settings.drive_time, Duration::from_secs(4));
        assert_eq!(settings.shooter_time, Duration::from_secs(2));
        assert!(!settings.backwards);
        assert!(!settings.single_operator);
    }

    #[test]
    fn test_settings_track_the_dashboard() {
        let mut dash = Dashboard::new();
        dash.put_float(keys::AUTO_DRIVE_TIME, 1.5);
        dash.put_flag(keys::AUTO_BACKWARDS, true);
        let settings = MatchSettings::load(&dash);
        assert_eq!(settings.drive_time, Duration::from_millis(1500));
        assert!(settings.backwards);
    }
}
