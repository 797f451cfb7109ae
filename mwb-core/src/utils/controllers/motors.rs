//! PWM motor group control.
//!
//! A [`MotorGroup`] drives an ordered set of H-bridge channel pairs on one
//! PCA9685 expander over the shared I2C bus. Every dispatch feeds the
//! group's [`MotorSafety`] watchdog; an enabled watchdog that lapses forces
//! the whole group to neutral on the next poll.

use core::cell::RefCell;

use embassy_time::{Duration, Instant};
use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

/// Full-scale duty for the 12-bit expander.
const MAX_DUTY: u16 = 4095;

/// Errors raised by actuator dispatch.
#[derive(Debug)]
pub enum ActuatorError<E: core::fmt::Debug> {
    Pwm(PwmError<E>),
}

/// Command watchdog for one motor group.
///
/// While enabled, the group must be fed within the expiration window or it
/// counts as expired. Disabling suspends expiry for timed open-loop moves;
/// re-enabling starts from a clean slate.
pub struct MotorSafety {
    enabled: bool,
    expiration: Duration,
    last_feed: Option<Instant>,
}

impl MotorSafety {
    pub fn new(expiration: Duration) -> Self {
        Self {
            enabled: true,
            expiration,
            last_feed: None,
        }
    }

    pub fn set_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.enabled = enabled;
        if enabled {
            self.last_feed = None;
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Record a command dispatch.
    pub fn feed(&mut self) {
        self.last_feed = Some(Instant::now());
    }

    /// Whether the group outlived its feed window. A group that has not been
    /// commanded since (re-)arming has nothing to time out.
    pub fn expired(&self) -> bool {
        self.enabled
            && self
                .last_feed
                .map(|at| at.elapsed() > self.expiration)
                .unwrap_or(false)
    }
}

/// An ordered collection of motors behind one PWM expander.
///
/// Each motor is an H-bridge (in-a, in-b) channel pair: the driving side
/// carries the duty, the other stays low. Both high holds the bridge in
/// brake, both low coasts.
pub struct MotorGroup<'a, I2C: 'static, const N: usize> {
    pwm: Pca9685<RefCellDevice<'a, I2C>>,
    channels: [(Channel, Channel); N],
    inverted: [bool; N],
    brake: bool,
    safety: MotorSafety,
}

impl<'a, I2C, E, const N: usize> MotorGroup<'a, I2C, N>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    /// Bring up the expander at `address`: enable and prescale to 60Hz.
    pub fn new(
        bus: &'a RefCell<I2C>,
        address: u8,
        channels: [(Channel, Channel); N],
        inverted: [bool; N],
        expiration: Duration,
    ) -> Result<Self, ActuatorError<E>> {
        let mut pwm = Pca9685::new(RefCellDevice::new(bus), PwmAddress::from(address))
            .map_err(ActuatorError::Pwm)?;
        pwm.enable().map_err(ActuatorError::Pwm)?;
        pwm.set_prescale(100).map_err(ActuatorError::Pwm)?;
        Ok(Self {
            pwm,
            channels,
            inverted,
            brake: false,
            safety: MotorSafety::new(expiration),
        })
    }

    /// Select the idle behavior on zero command: brake holds, coast floats.
    pub fn set_brake_enabled(
        &mut self,
        brake: bool,
    ) {
        self.brake = brake;
    }

    pub fn set_safety_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.safety.set_enabled(enabled);
    }

    /// Apply one command per motor, feeding the watchdog.
    ///
    /// Commands are clamped to `[-1.0, 1.0]` at the duty conversion.
    pub fn apply(
        &mut self,
        speeds: &[f32; N],
    ) -> Result<(), ActuatorError<E>> {
        for (i, &(in_a, in_b)) in self.channels.iter().enumerate() {
            let speed = if self.inverted[i] { -speeds[i] } else { speeds[i] };
            let magnitude = speed.abs().min(1.0);
            let duty = (magnitude * MAX_DUTY as f32) as u16;

            let (a_duty, b_duty) = if duty == 0 {
                if self.brake {
                    (MAX_DUTY, MAX_DUTY)
                } else {
                    (0, 0)
                }
            } else if speed > 0.0 {
                (duty, 0)
            } else {
                (0, duty)
            };

            self.pwm
                .set_channel_on_off(in_a, 0, a_duty)
                .map_err(ActuatorError::Pwm)?;
            self.pwm
                .set_channel_on_off(in_b, 0, b_duty)
                .map_err(ActuatorError::Pwm)?;
        }
        self.safety.feed();
        Ok(())
    }

    /// Zero every motor in the group.
    pub fn neutral(&mut self) -> Result<(), ActuatorError<E>> {
        self.apply(&[0.0; N])
    }

    /// Force neutral if the watchdog lapsed. Call once per tick.
    pub fn poll_safety(&mut self) -> Result<(), ActuatorError<E>> {
        if self.safety.expired() {
            tracing::warn!("motor group watchdog expired, forcing neutral");
            self.neutral()?;
        }
        Ok(())
    }
}
