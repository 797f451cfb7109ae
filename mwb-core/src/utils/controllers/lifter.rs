//! Lifter subsystem.
//!
//! A single motor raising and lowering the intake arm.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;

use crate::utils::config::{DeadbandConfig, RobotConfig, LIFTER_MOTOR_COUNT};
use crate::utils::controllers::motors::{ActuatorError, MotorGroup};
use crate::utils::math::shaping;

pub struct Lifter<'a, I2C: 'static> {
    motors: MotorGroup<'a, I2C, LIFTER_MOTOR_COUNT>,
    deadband: DeadbandConfig,
}

impl<'a, I2C, E> Lifter<'a, I2C>
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
            config.lifter_address,
            config.lifter_channels,
            config.lifter_inverted,
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

    pub fn set_safety_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.motors.set_safety_enabled(enabled);
    }

    /// Run the lifter at one shaped speed, positive raising.
    pub fn run(
        &mut self,
        speed: f32,
    ) -> Result<(), ActuatorError<E>> {
        let shaped = shaping::shape(speed, self.deadband);
        self.motors.apply(&[shaped; LIFTER_MOTOR_COUNT])
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.neutral()
    }

    pub fn poll_safety(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.poll_safety()
    }
}
