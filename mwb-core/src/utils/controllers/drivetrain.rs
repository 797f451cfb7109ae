//! Mecanum drivetrain subsystem.
//!
//! Owns the drive expander: two banks of four motors, two motors per wheel
//! corner. A velocity command is deadband-shaped component-wise, resolved
//! into wheel speeds, and dispatched to both banks in one pass.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;

use crate::utils::config::{DeadbandConfig, RobotConfig, DRIVE_MOTOR_COUNT};
use crate::utils::controllers::motors::{ActuatorError, MotorGroup};
use crate::utils::hid::mapping::VelocityCommand;
use crate::utils::math::mecanum::{self, WHEEL_COUNT};
use crate::utils::math::shaping;

pub struct Drivetrain<'a, I2C: 'static> {
    motors: MotorGroup<'a, I2C, DRIVE_MOTOR_COUNT>,
    deadband: DeadbandConfig,
}

impl<'a, I2C, E> Drivetrain<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    pub fn new(
        bus: &'a RefCell<I2C>,
        config: &RobotConfig,
    ) -> Result<Self, ActuatorError<E>> {
        let motors = MotorGroup::new(
            bus,
            config.drive_address,
            config.drive_channels,
            config.drive_inverted,
            config.safety_expiration,
        )?;
        Ok(Self {
            motors,
            deadband: DeadbandConfig::default(),
        })
    }

    pub fn set_deadband(
        &mut self,
        band: DeadbandConfig,
    ) {
        self.deadband = band;
    }

    pub fn set_brake_enabled(
        &mut self,
        brake: bool,
    ) {
        self.motors.set_brake_enabled(brake);
    }

    pub fn set_safety_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.motors.set_safety_enabled(enabled);
    }

    /// Shape the command, resolve wheel speeds, and dispatch to both banks.
    pub fn drive(
        &mut self,
        command: VelocityCommand,
    ) -> Result<(), ActuatorError<E>> {
        let shaped = VelocityCommand {
            forward: shaping::shape(command.forward, self.deadband),
            strafe: shaping::shape(command.strafe, self.deadband),
            rotate: shaping::shape(command.rotate, self.deadband),
        };
        let wheels = mecanum::resolve_cartesian(&shaped, 0.0);

        let mut speeds = [0.0; DRIVE_MOTOR_COUNT];
        speeds[..WHEEL_COUNT].copy_from_slice(&wheels);
        speeds[WHEEL_COUNT..].copy_from_slice(&wheels);
        self.motors.apply(&speeds)
    }

    /// Zero the chassis.
    pub fn stop(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.neutral()
    }

    pub fn poll_safety(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.poll_safety()
    }
}
