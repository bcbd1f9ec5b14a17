use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use embassy_executor::Spawner;
use embassy_time::Instant;
use log::{error, info};
use moodbot_host::{
    ArmingController, Config, Context, MotionMapper, Scanner, SerialLink, TokenCache, TokenSlot,
    TokenValidator,
};

use crate::bench::{CenteredJoystick, LogDisplay, StdinTokenReader};
use crate::tasks::control::{self, Controller};

mod bench;
mod tasks;

const DEFAULT_CONFIG: &str = "moodbot.json";

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match setup() {
        Ok(controller) => control::init(spawner, controller),
        Err(err) => {
            error!("Startup failed: {err:#}");
            std::process::exit(1);
        }
    }
}

fn setup() -> anyhow::Result<Controller> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::load(&path)?;

    let motor = SerialLink::open(&config.motor_port)?;
    let validation = SerialLink::open(&config.validation_port)?;

    let tokens = Arc::new(TokenSlot::new());
    let reader = StdinTokenReader::spawn().context("Failed to start RFID reader")?;
    let scanner = Scanner::spawn(reader, tokens.clone(), config.scanner)
        .context("Failed to start RFID scanner")?;

    ctrlc::set_handler(|| tasks::SHUTDOWN.signal(())).context("Failed to install Ctrl-C handler")?;

    let ctx = Context {
        motor,
        validator: TokenValidator::new(
            validation,
            TokenCache::new(config.token_epoch(), Instant::now()),
            config.remote_policy,
        ),
        motion: CenteredJoystick,
        display: LogDisplay::default(),
        tokens,
        scanner: Some(scanner),
    };

    info!(
        "MoodBot ready: motor on {}, validation on {}, {} s sessions",
        config.motor_port.path, config.validation_port.path, config.session_limit_secs
    );
    Ok(ArmingController::new(
        ctx,
        config.arming(),
        MotionMapper::new(config.calibration),
    ))
}
