//! Shooter subsystem.
//!
//! Two motors on one expander, fed the same shaped scalar. Brake mode stays
//! on for the shooter: it is forced at construction and never released, so a
//! zero command locks the wheel instead of letting it spin down.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;

use crate::utils::config::{DeadbandConfig, RobotConfig, SHOOTER_MOTOR_COUNT};
use crate::utils::controllers::motors::{ActuatorError, MotorGroup};
use crate::utils::math::shaping;

pub struct Shooter<'a, I2C: 'static> {
    motors: MotorGroup<'a, I2C, SHOOTER_MOTOR_COUNT>,
    deadband: DeadbandConfig,
}

impl<'a, I2C, E> Shooter<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    pub fn new(
        bus: &'a RefCell<I2C>,
        config: &RobotConfig,
    ) -> Result<Self, ActuatorError<E>> {
        let mut motors = MotorGroup::new(
            bus,
            config.shooter_address,
            config.shooter_channels,
            config.shooter_inverted,
            config.safety_expiration,
        )?;
        motors.set_brake_enabled(true);
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

    /// Run both shooter motors at one shaped speed.
    pub fn run(
        &mut self,
        speed: f32,
    ) -> Result<(), ActuatorError<E>> {
        let shaped = shaping::shape(speed, self.deadband);
        self.motors.apply(&[shaped; SHOOTER_MOTOR_COUNT])
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.neutral()
    }

    pub fn poll_safety(&mut self) -> Result<(), ActuatorError<E>> {
        self.motors.poll_safety()
    }
}
