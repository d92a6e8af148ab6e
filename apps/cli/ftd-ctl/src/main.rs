use ftd_ctl::APP_DIR_NAME;
use ftd_ctl::commands::Action;
use ftd_ctl::error::CtlError;
use ftd_ctl::logger::initialize as LoggerInitialize;

use common::ErrorLocation;
use session_core::config::DeviceConfig;
use session_core::launch::DeviceProcess;

use std::env::args;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info, warn};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            if matches!(e, CtlError::Usage { .. }) {
                eprintln!("\n{}", ftd_ctl::commands::USAGE);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CtlError> {
    let arguments: Vec<String> = args().skip(1).collect();
    let actions = Action::parse_all(&arguments)?;

    if !actions.iter().any(Action::needs_device) {
        println!("{}", ftd_ctl::commands::USAGE);
        return Ok(());
    }

    let log_dir = app_dir(dirs::data_local_dir(), "data")?.join("logs");

    create_dir_all(&log_dir).map_err(|e| CtlError::Ctl {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("ftd-ctl starting");
    info!("Log directory: {}", log_dir.display());

    let config_dir = app_dir(dirs::config_dir(), "config")?;
    let config = DeviceConfig::load(&config_dir)?;

    let mut device = DeviceProcess::launch(&config.device.binary, config.device.node_id)?;
    device
        .session()
        .set_poll_interval(config.timing.poll_interval());

    let mut result = Ok(());
    for action in &actions {
        match action.run(device.session(), &config) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    if let Err(e) = device.terminate() {
        warn!("Failed to terminate device: {e}");
    }

    result
}

#[track_caller]
fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf, CtlError> {
    base.map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| CtlError::Ctl {
            message: format!("Failed to determine the {kind} directory"),
            location: ErrorLocation::from(Location::caller()),
        })
}
