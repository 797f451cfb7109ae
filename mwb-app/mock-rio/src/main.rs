//! Host simulator for the Mecanum-Wheel Bot control stack.
//!
//! Stands in for the robot controller: the actuator expanders sit on a
//! logging I2C stub and a scripted driver station feeds phase changes and
//! gamepad frames through the station link. Useful for watching the full
//! input-to-duty pipeline without hardware.

use core::cell::RefCell;
use std::convert::Infallible;

use clap::Parser;
use embassy_executor::{Executor, Spawner};
use embassy_time::{Duration, Timer};
use embedded_hal::i2c::{ErrorType, I2c, Operation};
use mwb_core::mk_static;
use mwb_core::utils::config::{keys, Dashboard, RobotConfig};
use mwb_core::utils::robot::{MatchLoop, Robot};
use mwb_core::utils::station;
use static_cell::StaticCell;
use tracing::{error, info};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// Drive the whole match from gamepad 0
    #[clap(long)]
    single_operator: bool,
    /// Autonomous drives backward
    #[clap(long)]
    backwards: bool,
    /// Autonomous drive time in seconds
    #[clap(long, default_value_t = 1.0)]
    drive_time: f32,
    /// Autonomous shooter time in seconds
    #[clap(long, default_value_t = 0.5)]
    shooter_time: f32,
}

/// I2C stub that logs every expander register write.
struct TraceI2c;

impl ErrorType for TraceI2c {
    type Error = Infallible;
}

impl I2c for TraceI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Infallible> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => info!("i2c write @{:02x}: {:02x?}", address, bytes),
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}

#[embassy_executor::task]
async fn robot_task(mut robot: Robot<'static, TraceI2c>) -> ! {
    MatchLoop::new().run(&mut robot).await
}

/// Scripted driver station: a teleop stint, an autonomous run, disable.
#[embassy_executor::task]
async fn station_task() {
    // Give the match loop a beat before the match starts.
    Timer::after(Duration::from_millis(100)).await;

    info!("match phase: teleop");
    route_frame(r#"{"sc":"p","phase":"teleop"}"#).await;

    // Stick drive on the primary gamepad.
    route_frame(
        r#"{"sc":"g","port":0,"report":{"axes":[0.5,-0.3,0.0,0.0,0.2,0.0],"buttons":0,"pov":null}}"#,
    )
    .await;
    Timer::after(Duration::from_millis(500)).await;

    // Pad diagonal with A held (chassis coasts).
    route_frame(r#"{"sc":"g","port":0,"report":{"buttons":1,"pov":45}}"#).await;
    Timer::after(Duration::from_millis(500)).await;

    // Operator console: left trigger shot plus a bumper lift.
    route_frame(
        r#"{"sc":"g","port":1,"report":{"axes":[0.0,0.0,0.6,0.2,0.0,0.0],"buttons":16,"pov":null}}"#,
    )
    .await;
    Timer::after(Duration::from_millis(500)).await;

    // Everything released.
    route_frame(r#"{"sc":"g","port":0,"report":{}}"#).await;
    route_frame(r#"{"sc":"g","port":1,"report":{}}"#).await;
    Timer::after(Duration::from_millis(200)).await;

    info!("match phase: autonomous");
    route_frame(r#"{"sc":"p","phase":"autonomous"}"#).await;
    Timer::after(Duration::from_secs(3)).await;

    info!("match phase: disabled");
    route_frame(r#"{"sc":"p","phase":"disabled"}"#).await;
    info!("match script complete");
}

async fn route_frame(frame: &str) {
    match station::decode(frame) {
        Ok(command) => station::route(command).await,
        Err(error) => error!(?error, "bad station frame"),
    }
}

#[embassy_executor::task]
async fn main_task(spawner: Spawner) {
    let opts: Opts = Opts::parse();

    let mut dashboard = Dashboard::new();
    dashboard.put_flag(keys::SINGLE_OPERATOR, opts.single_operator);
    dashboard.put_flag(keys::AUTO_BACKWARDS, opts.backwards);
    dashboard.put_float(keys::AUTO_DRIVE_TIME, opts.drive_time);
    dashboard.put_float(keys::AUTO_SHOOTER_TIME, opts.shooter_time);

    let bus = mk_static!(RefCell<TraceI2c>, RefCell::new(TraceI2c));
    let robot = match Robot::new(bus, &RobotConfig::default(), dashboard) {
        Ok(robot) => robot,
        Err(error) => {
            error!(?error, "robot bring-up failed");
            return;
        }
    };

    spawner.spawn(robot_task(robot)).unwrap();
    spawner.spawn(station_task()).unwrap();
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner)).unwrap();
    });
}
