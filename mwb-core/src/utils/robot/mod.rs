//! Match lifecycle orchestration.
//!
//! The field scheduler owns the phase sequence; this module only reacts.
//! [`Robot`] composes the actuator subsystems and the lifecycle callbacks
//! (entry hooks on phase transitions, a periodic callback per active
//! phase). [`PhaseRunner`] applies transitions and dispatches the periodic
//! work; [`MatchLoop`] is the 50Hz tick that drains the station channels
//! around it.
//!
//! Within a tick everything is synchronous and stateless: poll inputs,
//! shape, dispatch. The only memory across ticks is the settings snapshot
//! taken at phase entry and the autonomous one-shot guard.

use core::cell::RefCell;

use embassy_time::{block_for, Duration, Ticker};
use embedded_hal::i2c::I2c;
use serde::{Deserialize, Serialize};

use crate::utils::config::{Dashboard, MatchSettings, RobotConfig};
use crate::utils::controllers::motors::ActuatorError;
use crate::utils::controllers::{Drivetrain, Lifter, Shooter};
use crate::utils::hid::gamepad::{Axis, Button, Gamepad};
use crate::utils::hid::mapping::{self, VelocityCommand};
use crate::utils::station::{GamepadFrame, HID_CHANNEL, PHASE_CHANNEL};

/// Lifecycle phases dictated by the field scheduler.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Disabled,
    Autonomous,
    Teleop,
}

/// The robot: subsystems, gamepads, and the lifecycle callbacks.
pub struct Robot<'a, I2C: 'static> {
    drivetrain: Drivetrain<'a, I2C>,
    shooter: Shooter<'a, I2C>,
    lifter: Lifter<'a, I2C>,
    dashboard: Dashboard,
    settings: MatchSettings,
    primary: Gamepad,
    secondary: Gamepad,
    auto_fired: bool,
}

impl<'a, I2C, E> Robot<'a, I2C>
where
    I2C: I2c<Error = E> + 'static,
    E: core::fmt::Debug,
{
    /// Construct every actuator handle once and take the initial settings
    /// snapshot.
    pub fn new(
        bus: &'a RefCell<I2C>,
        config: &RobotConfig,
        dashboard: Dashboard,
    ) -> Result<Self, ActuatorError<E>> {
        let drivetrain = Drivetrain::new(bus, config)?;
        let shooter = Shooter::new(bus, config)?;
        let lifter = Lifter::new(bus, config)?;

        let mut robot = Self {
            drivetrain,
            shooter,
            lifter,
            dashboard,
            settings: MatchSettings::default(),
            primary: Gamepad::new(),
            secondary: Gamepad::new(),
            auto_fired: false,
        };
        robot.refresh_settings();
        tracing::info!("robot handles constructed");
        Ok(robot)
    }

    /// Re-snapshot the dashboard and push the deadband into every subsystem.
    fn refresh_settings(&mut self) {
        self.settings = MatchSettings::load(&self.dashboard);
        self.drivetrain.set_deadband(self.settings.deadband);
        self.shooter.set_deadband(self.settings.deadband);
        self.lifter.set_deadband(self.settings.deadband);
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    /// Latch a gamepad frame onto its port.
    pub fn update_gamepad(
        &mut self,
        frame: GamepadFrame,
    ) {
        match frame.port {
            0 => self.primary.update(frame.report),
            1 => self.secondary.update(frame.report),
            port => tracing::warn!(port, "gamepad frame for unknown port"),
        }
    }

    fn set_safety_enabled(
        &mut self,
        enabled: bool,
    ) {
        self.drivetrain.set_safety_enabled(enabled);
        self.shooter.set_safety_enabled(enabled);
        self.lifter.set_safety_enabled(enabled);
    }

    /// Entry hook for teleop: fresh settings, brake on, interlocks armed.
    pub fn teleop_init(&mut self) -> Result<(), ActuatorError<E>> {
        self.refresh_settings();
        self.drivetrain.set_brake_enabled(true);
        self.set_safety_enabled(true);
        Ok(())
    }

    /// One teleop tick: poll inputs, shape, dispatch. No tick-to-tick
    /// memory.
    pub fn teleop_periodic(&mut self) -> Result<(), ActuatorError<E>> {
        // Held A coasts the chassis; released drives with brake.
        self.drivetrain
            .set_brake_enabled(!self.primary.button(Button::A));

        let command = mapping::map_direction(
            self.primary.direction_input(),
            self.settings.axis_power,
            self.settings.button_power,
        );
        self.drivetrain.drive(command)?;

        // Shooter and lifter follow the operator console, which collapses
        // onto the primary gamepad in single-operator mode.
        let operator = if self.settings.single_operator {
            &self.primary
        } else {
            &self.secondary
        };
        let lift = if operator.button(Button::LeftBumper) {
            self.settings.button_power
        } else if operator.button(Button::RightBumper) {
            -self.settings.button_power
        } else {
            0.0
        };
        let shot = mapping::map_trigger(
            operator.axis(Axis::LeftTrigger),
            operator.axis(Axis::RightTrigger),
        );
        self.lifter.run(lift)?;
        self.shooter.run(shot)
    }

    /// Entry hook for autonomous: fresh settings, brake on, re-arm the
    /// one-shot.
    pub fn autonomous_init(&mut self) -> Result<(), ActuatorError<E>> {
        self.refresh_settings();
        self.drivetrain.set_brake_enabled(true);
        self.set_safety_enabled(true);
        self.auto_fired = false;
        Ok(())
    }

    /// The autonomous sequence: drive, wait, stop, shoot, wait, stop.
    ///
    /// Fires once per phase entry. Open-loop and timer-based; the delays
    /// stall the single thread of control, which has no other obligations
    /// during this phase. Interlocks are suspended across the waits so the
    /// watchdogs do not cut the motors mid-move.
    pub fn autonomous_periodic(&mut self) -> Result<(), ActuatorError<E>> {
        if self.auto_fired {
            return Ok(());
        }
        self.auto_fired = true;

        self.set_safety_enabled(false);

        let heading = if self.settings.backwards { -1.0 } else { 1.0 };
        self.drivetrain.drive(VelocityCommand {
            forward: self.settings.button_power * heading,
            strafe: 0.0,
            rotate: 0.0,
        })?;
        block_for(self.settings.drive_time);
        self.drivetrain.stop()?;

        self.shooter.run(self.settings.button_power)?;
        block_for(self.settings.shooter_time);
        self.shooter.stop()?;

        self.set_safety_enabled(true);
        Ok(())
    }

    /// Entry hook for disabled: everything neutral, interlocks re-armed.
    ///
    /// Neutral goes out before the interlocks re-arm, so an idle disabled
    /// robot sits quiet instead of cycling through watchdog trips.
    pub fn disabled_init(&mut self) -> Result<(), ActuatorError<E>> {
        self.drivetrain.set_brake_enabled(true);
        self.drivetrain.stop()?;
        self.shooter.stop()?;
        self.lifter.stop()?;
        self.set_safety_enabled(true);
        Ok(())
    }

    /// Check every subsystem watchdog. Called each tick in all phases.
    pub fn poll_safety(&mut self) -> Result<(), ActuatorError<E>> {
        self.drivetrain.poll_safety()?;
        self.shooter.poll_safety()?;
        self.lifter.poll_safety()
    }
}

/// Applies phase transitions and runs the periodic callback for the active
/// phase.
pub struct PhaseRunner {
    phase: MatchPhase,
}

impl PhaseRunner {
    pub fn new() -> Self {
        Self {
            phase: MatchPhase::Disabled,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Apply a phase change, running the entry hook on a real transition.
    pub fn set_phase<I2C, E>(
        &mut self,
        robot: &mut Robot<'_, I2C>,
        next: MatchPhase,
    ) -> Result<(), ActuatorError<E>>
    where
        I2C: I2c<Error = E> + 'static,
        E: core::fmt::Debug,
    {
        if next == self.phase {
            return Ok(());
        }
        tracing::info!(?next, "phase change");
        self.phase = next;
        match next {
            MatchPhase::Teleop => robot.teleop_init(),
            MatchPhase::Autonomous => robot.autonomous_init(),
            MatchPhase::Disabled => robot.disabled_init(),
        }
    }

    /// Run one tick of the active phase, then the watchdogs.
    pub fn tick<I2C, E>(
        &mut self,
        robot: &mut Robot<'_, I2C>,
    ) -> Result<(), ActuatorError<E>>
    where
        I2C: I2c<Error = E> + 'static,
        E: core::fmt::Debug,
    {
        match self.phase {
            MatchPhase::Teleop => robot.teleop_periodic()?,
            MatchPhase::Autonomous => robot.autonomous_periodic()?,
            MatchPhase::Disabled => {}
        }
        robot.poll_safety()
    }
}

impl Default for PhaseRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick period of the match loop.
const TICK: Duration = Duration::from_millis(20);

/// The 50Hz control loop around the lifecycle callbacks.
pub struct MatchLoop {
    runner: PhaseRunner,
}

impl MatchLoop {
    pub fn new() -> Self {
        Self {
            runner: PhaseRunner::new(),
        }
    }

    /// Drain the station channels and run the active phase, forever.
    ///
    /// Dispatch errors are logged and the tick abandoned; the loop itself
    /// never gives up.
    pub async fn run<I2C, E>(
        mut self,
        robot: &mut Robot<'_, I2C>,
    ) -> !
    where
        I2C: I2c<Error = E> + 'static,
        E: core::fmt::Debug,
    {
        let mut ticker = Ticker::every(TICK);
        loop {
            while let Ok(phase) = PHASE_CHANNEL.try_receive() {
                if let Err(error) = self.runner.set_phase(robot, phase) {
                    tracing::error!(?error, "phase entry failed");
                }
            }
            while let Ok(frame) = HID_CHANNEL.try_receive() {
                robot.update_gamepad(frame);
            }
            if let Err(error) = self.runner.tick(robot) {
                tracing::error!(?error, "dispatch failed, tick abandoned");
            }
            ticker.next().await;
        }
    }
}

impl Default for MatchLoop {
    fn default() -> Self {
        Self::new()
    }
}
