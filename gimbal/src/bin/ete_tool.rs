//! Command-line control for ETE roll/yaw gimbals.
//!
//! Sends, in order: reset (then exits), any requested test screens, roll and
//! yaw speeds, and finally a position command for the given angles.
//!
//! ```text
//! ete_tool --port /dev/ttyUSB1 90 45
//! ete_tool --dry-run --yaw-speed 2000 180 0
//! ete_tool --reset
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use ete_gimbal::ete::{CommandSink, GimbalConfig, GimbalController, TestScreen};
use tracing::info;

/// Largest roll angle the jig accepts, in degrees.
const MAX_ROLL_DEG: f64 = 360.0;

/// Largest yaw angle the jig accepts, in degrees.
const MAX_YAW_DEG: f64 = 335.0;

/// Control an ETE gimbal over its serial line
#[derive(Parser, Debug)]
#[command(name = "ete_tool")]
#[command(about = "Position and configure an ETE roll/yaw gimbal")]
#[command(version)]
struct Args {
    /// Serial port (default /dev/ttyUSB1)
    #[arg(long, conflicts_with = "dry_run")]
    port: Option<String>,

    /// Log frames instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// JSON session config; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective session config to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Delay before each command in seconds (default 0.1)
    #[arg(long)]
    delay: Option<f64>,

    /// Yaw steps per revolution (default 28800)
    #[arg(long)]
    yaw_steps: Option<u32>,

    /// Roll steps per revolution (default 9600)
    #[arg(long)]
    roll_steps: Option<u32>,

    /// Reset the jig and exit
    #[arg(long)]
    reset: bool,

    /// Show the pass screen
    #[arg(long, alias = "test_pass")]
    test_pass: bool,

    /// Show the fail screen
    #[arg(long, alias = "test_fail")]
    test_fail: bool,

    /// Show the work screen
    #[arg(long, alias = "test_work")]
    test_work: bool,

    /// Show the wait screen
    #[arg(long, alias = "test_wait")]
    test_wait: bool,

    /// Roll speed (pulses/sec)
    #[arg(long, alias = "roll_speed")]
    roll_speed: Option<i64>,

    /// Yaw speed (pulses/sec)
    #[arg(long, alias = "yaw_speed")]
    yaw_speed: Option<i64>,

    /// Roll angle (degrees)
    #[arg(default_value = "0", allow_negative_numbers = true)]
    roll: f64,

    /// Yaw angle (degrees)
    #[arg(default_value = "0", allow_negative_numbers = true)]
    yaw: f64,
}

impl Args {
    /// Session config from the optional file, with command-line overrides applied.
    fn session_config(&self) -> Result<GimbalConfig> {
        let mut config = match &self.config {
            Some(path) => GimbalConfig::load_from_file(path)?,
            None => GimbalConfig::default(),
        };

        if self.dry_run {
            config.port = None;
        } else if let Some(port) = &self.port {
            config.port = Some(port.clone());
        }
        if let Some(delay) = self.delay {
            config.delay_secs = delay;
        }
        if let Some(steps) = self.yaw_steps {
            config.yaw_steps = steps;
        }
        if let Some(steps) = self.roll_steps {
            config.roll_steps = steps;
        }

        config.delay()?;
        Ok(config)
    }

    fn requested_screens(&self) -> Vec<TestScreen> {
        [
            (self.test_pass, TestScreen::Pass),
            (self.test_fail, TestScreen::Fail),
            (self.test_work, TestScreen::Work),
            (self.test_wait, TestScreen::Wait),
        ]
        .into_iter()
        .filter_map(|(requested, screen)| requested.then_some(screen))
        .collect()
    }
}

/// Reject angles the jig cannot reach before anything is opened.
fn check_angles(roll: f64, yaw: f64) -> Result<()> {
    if !roll.is_finite() || !yaw.is_finite() {
        bail!("Angles must be finite numbers");
    }
    if roll > MAX_ROLL_DEG {
        bail!("Roll too large");
    }
    if yaw > MAX_YAW_DEG {
        bail!("Yaw too large");
    }
    Ok(())
}

/// Validate the arguments, then open the port (or a dry-run sink).
fn open_session(args: &Args) -> Result<GimbalController> {
    check_angles(args.roll, args.yaw)?;

    let config = args.session_config()?;
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Saved session config to {}", path.display());
    }

    match &config.port {
        Some(port) => info!("Opening ETE gimbal on {port}..."),
        None => info!("Dry run, no port opened"),
    }
    Ok(GimbalController::from_config(&config)?)
}

/// Send the requested commands: reset alone, or screens, speeds and position.
fn run<S: CommandSink>(args: &Args, gimbal: &mut GimbalController<S>) -> Result<()> {
    if args.reset {
        info!("Resetting");
        gimbal.reset()?;
        return Ok(());
    }

    for screen in args.requested_screens() {
        info!("Displaying {screen:?} screen");
        gimbal.show_screen(screen)?;
    }

    if let Some(speed) = args.roll_speed.filter(|&s| s != 0) {
        info!("Changing roll speed to {speed}");
        gimbal.roll_speed(speed)?;
    }

    if let Some(speed) = args.yaw_speed.filter(|&s| s != 0) {
        info!("Changing yaw speed to {speed}");
        gimbal.yaw_speed(speed)?;
    }

    info!("Moving to roll={}°, yaw={}°", args.roll, args.yaw);
    gimbal.position(args.roll, args.yaw)?;

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut gimbal = open_session(&args)?;
    run(&args, &mut gimbal)
}
