use super::{commands, dispatch, telemetry};
use crate::{envs, probe::ProbeResult};
use anyhow::Result;
use tracing::debug;

/// Main orchestrator - Pure orchestration with no business logic
///
/// Six-step data flow:
/// 1. Load Env File: Make its variables available as argument fallbacks
/// 2. Parse: Extract CLI arguments
/// 3. Extract Verbosity: Convert flag count to logging level
/// 4. Initialize Telemetry: Set up structured logging on stderr
/// 5. Dispatch: Convert `ArgMatches` into typed Action enum
/// 6. Execute: Run the probe
///
/// # Errors
///
/// Returns an error if the env file is invalid, logging can not be set up or
/// no descriptor is configured
pub async fn start() -> Result<ProbeResult> {
    // 1. Load Env File: variables already set in the environment win
    let env_file = envs::env_file();
    let loaded = envs::load_env_file(&env_file)?;

    // 2. Parse: Extract CLI arguments
    let matches = commands::new().get_matches();

    // 3. Extract Verbosity
    let verbosity = matches.get_count("verbose");

    // 4. Initialize Telemetry
    telemetry::init(verbosity)?;

    if loaded {
        debug!(path = %env_file.display(), "loaded env file");
    }

    // 5. Dispatch: Convert ArgMatches into typed Action enum
    let action = dispatch::dispatch(&matches, &env_file)?;
    debug!(?action, "dispatched");

    // 6. Execute: Run the action's business logic
    Ok(action.execute().await)
}
