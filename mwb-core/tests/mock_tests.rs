use core::cell::RefCell;
use std::thread::sleep;
use std::time::Duration as StdDuration;

use embassy_time::Duration;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use mwb_core::utils::config::{keys, Dashboard, RobotConfig};
use mwb_core::utils::controllers::{Drivetrain, Lifter, Shooter};
use mwb_core::utils::hid::gamepad::GamepadReport;
use mwb_core::utils::hid::mapping::VelocityCommand;
use mwb_core::utils::robot::{MatchPhase, PhaseRunner, Robot};
use mwb_core::utils::station::GamepadFrame;

/// Expander addresses from the default hardware map.
pub const DRIVE_ADDRESS: u8 = 0x40;
pub const SHOOTER_ADDRESS: u8 = 0x41;
pub const LIFTER_ADDRESS: u8 = 0x42;

/// Duty for a 0.75 command on the 12-bit expander.
const THREE_QUARTER_DUTY: u16 = 3071;
/// Full-scale duty, written to both bridge inputs while braking.
const FULL_DUTY: u16 = 4095;

/// Create a write transaction for the given I2C address and data payload.
pub fn write(
    addr: u8,
    data: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write(addr, data)
}

/// Expander bring-up: enable, then prescale (sleep, divider, wake).
pub fn bringup(addr: u8) -> Vec<I2cTrans> {
    vec![
        write(addr, vec![0x00, 0x01]),
        write(addr, vec![0x00, 0x11]),
        write(addr, vec![0xFE, 100]),
        write(addr, vec![0x00, 0x01]),
    ]
}

/// The one-time auto-increment mode write before the first channel update.
pub fn auto_increment(addr: u8) -> I2cTrans {
    write(addr, vec![0x00, 0x21])
}

/// A duty update for one channel (on count 0, off count `value`).
pub fn duty(
    addr: u8,
    channel: u8,
    value: u16,
) -> I2cTrans {
    write(
        addr,
        vec![
            0x06 + 4 * channel,
            0x00,
            0x00,
            (value & 0xFF) as u8,
            (value >> 8) as u8,
        ],
    )
}

/// Every channel of an N-motor group at the same duty on both inputs.
fn all_channels(
    addr: u8,
    motors: u8,
    value: u16,
) -> Vec<I2cTrans> {
    (0..motors * 2).map(|ch| duty(addr, ch, value)).collect()
}

#[test]
fn test_group_bringup() {
    let mock = I2cMock::new(&bringup(LIFTER_ADDRESS));
    let bus = RefCell::new(mock);
    Lifter::new(&bus, &RobotConfig::default()).unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_lifter_midband_duty() {
    let mut expectations = bringup(LIFTER_ADDRESS);
    expectations.push(auto_increment(LIFTER_ADDRESS));
    // 0.5 of 4095, driving side only.
    expectations.push(duty(LIFTER_ADDRESS, 0, 2047));
    expectations.push(duty(LIFTER_ADDRESS, 1, 0));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut lifter = Lifter::new(&bus, &RobotConfig::default()).unwrap();
    lifter.run(0.5).unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_lifter_noise_collapses_to_neutral() {
    let mut expectations = bringup(LIFTER_ADDRESS);
    expectations.push(auto_increment(LIFTER_ADDRESS));
    expectations.push(duty(LIFTER_ADDRESS, 0, 0));
    expectations.push(duty(LIFTER_ADDRESS, 1, 0));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut lifter = Lifter::new(&bus, &RobotConfig::default()).unwrap();
    // Below the 0.15 deadband minimum.
    lifter.run(0.05).unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_shooter_brakes_at_zero() {
    let mut expectations = bringup(SHOOTER_ADDRESS);
    expectations.push(auto_increment(SHOOTER_ADDRESS));
    // Brake mode is forced at construction: both bridge inputs high.
    expectations.extend(all_channels(SHOOTER_ADDRESS, 2, FULL_DUTY));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut shooter = Shooter::new(&bus, &RobotConfig::default()).unwrap();
    shooter.run(0.0).unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_drivetrain_neutral_coasts() {
    let mut expectations = bringup(DRIVE_ADDRESS);
    expectations.push(auto_increment(DRIVE_ADDRESS));
    expectations.extend(all_channels(DRIVE_ADDRESS, 8, 0));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut drivetrain = Drivetrain::new(&bus, &RobotConfig::default()).unwrap();
    drivetrain.stop().unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_drivetrain_forward_inverts_right_side() {
    let mut expectations = bringup(DRIVE_ADDRESS);
    expectations.push(auto_increment(DRIVE_ADDRESS));
    // Wheel order [FL, RL, FR, RR] per bank; the right-side corners are
    // configured inverted, so their duty lands on the other bridge input.
    for bank in [0u8, 8u8] {
        expectations.push(duty(DRIVE_ADDRESS, bank, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 1, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 2, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 3, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 4, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 5, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 6, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 7, THREE_QUARTER_DUTY));
    }

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut drivetrain = Drivetrain::new(&bus, &RobotConfig::default()).unwrap();
    drivetrain
        .drive(VelocityCommand {
            forward: 0.75,
            strafe: 0.0,
            rotate: 0.0,
        })
        .unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_watchdog_forces_neutral() {
    let config = RobotConfig {
        safety_expiration: Duration::from_millis(10),
        ..RobotConfig::default()
    };

    let mut expectations = bringup(LIFTER_ADDRESS);
    expectations.push(auto_increment(LIFTER_ADDRESS));
    expectations.push(duty(LIFTER_ADDRESS, 0, 2047));
    expectations.push(duty(LIFTER_ADDRESS, 1, 0));
    // Forced neutral after the feed window lapses.
    expectations.push(duty(LIFTER_ADDRESS, 0, 0));
    expectations.push(duty(LIFTER_ADDRESS, 1, 0));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut lifter = Lifter::new(&bus, &config).unwrap();
    lifter.run(0.5).unwrap();
    sleep(StdDuration::from_millis(50));
    lifter.poll_safety().unwrap();
    // The forced neutral counts as a feed: polling again writes nothing.
    lifter.poll_safety().unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_disabled_safety_suspends_expiry() {
    let config = RobotConfig {
        safety_expiration: Duration::from_millis(10),
        ..RobotConfig::default()
    };

    let mut expectations = bringup(LIFTER_ADDRESS);
    expectations.push(auto_increment(LIFTER_ADDRESS));
    expectations.push(duty(LIFTER_ADDRESS, 0, 2047));
    expectations.push(duty(LIFTER_ADDRESS, 1, 0));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut lifter = Lifter::new(&bus, &config).unwrap();
    lifter.set_safety_enabled(false);
    lifter.run(0.5).unwrap();
    sleep(StdDuration::from_millis(50));
    lifter.poll_safety().unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_teleop_tick_dispatches_all_subsystems() {
    let mut expectations = Vec::new();
    expectations.extend(bringup(DRIVE_ADDRESS));
    expectations.extend(bringup(SHOOTER_ADDRESS));
    expectations.extend(bringup(LIFTER_ADDRESS));

    // Pad right at the default 0.75 button power, A held (chassis coasts):
    // strafing opposes the diagonals, the right side is inverted on top.
    expectations.push(auto_increment(DRIVE_ADDRESS));
    for bank in [0u8, 8u8] {
        expectations.push(duty(DRIVE_ADDRESS, bank, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 1, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 2, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 3, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 4, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 5, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 6, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 7, THREE_QUARTER_DUTY));
    }
    // Idle lifter coasts, idle shooter brakes.
    expectations.push(auto_increment(LIFTER_ADDRESS));
    expectations.extend(all_channels(LIFTER_ADDRESS, 1, 0));
    expectations.push(auto_increment(SHOOTER_ADDRESS));
    expectations.extend(all_channels(SHOOTER_ADDRESS, 2, FULL_DUTY));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut robot = Robot::new(&bus, &RobotConfig::default(), Dashboard::new()).unwrap();
    let mut runner = PhaseRunner::new();

    robot.update_gamepad(GamepadFrame {
        port: 0,
        report: GamepadReport {
            axes: [0.0; 6],
            buttons: 1, // A
            pov: Some(90),
        },
    });
    runner.set_phase(&mut robot, MatchPhase::Teleop).unwrap();
    runner.tick(&mut robot).unwrap();
    bus.borrow_mut().done();
}

#[test]
fn test_autonomous_fires_once() {
    let mut dashboard = Dashboard::new();
    dashboard.put_float(keys::AUTO_DRIVE_TIME, 0.0);
    dashboard.put_float(keys::AUTO_SHOOTER_TIME, 0.0);

    let mut expectations = Vec::new();
    expectations.extend(bringup(DRIVE_ADDRESS));
    expectations.extend(bringup(SHOOTER_ADDRESS));
    expectations.extend(bringup(LIFTER_ADDRESS));

    // Forward at button power, right side inverted.
    expectations.push(auto_increment(DRIVE_ADDRESS));
    for bank in [0u8, 8u8] {
        expectations.push(duty(DRIVE_ADDRESS, bank, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 1, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 2, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 3, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 4, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 5, THREE_QUARTER_DUTY));
        expectations.push(duty(DRIVE_ADDRESS, bank + 6, 0));
        expectations.push(duty(DRIVE_ADDRESS, bank + 7, THREE_QUARTER_DUTY));
    }
    // Stop with brake held on.
    expectations.extend(all_channels(DRIVE_ADDRESS, 8, FULL_DUTY));
    // Shooter burst, then brake.
    expectations.push(auto_increment(SHOOTER_ADDRESS));
    expectations.push(duty(SHOOTER_ADDRESS, 0, THREE_QUARTER_DUTY));
    expectations.push(duty(SHOOTER_ADDRESS, 1, 0));
    expectations.push(duty(SHOOTER_ADDRESS, 2, THREE_QUARTER_DUTY));
    expectations.push(duty(SHOOTER_ADDRESS, 3, 0));
    expectations.extend(all_channels(SHOOTER_ADDRESS, 2, FULL_DUTY));

    let bus = RefCell::new(I2cMock::new(&expectations));
    let mut robot = Robot::new(&bus, &RobotConfig::default(), dashboard).unwrap();
    let mut runner = PhaseRunner::new();

    runner
        .set_phase(&mut robot, MatchPhase::Autonomous)
        .unwrap();
    runner.tick(&mut robot).unwrap();
    // The guarded sequence already fired; a second tick dispatches nothing.
    runner.tick(&mut robot).unwrap();
    bus.borrow_mut().done();
}
