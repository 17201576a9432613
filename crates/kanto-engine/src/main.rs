//! Session coordinator binary.
//!
//! This is the main entry point that wires together configuration, the
//! stub emulator backend, the session facade, and a small demo driver
//! that runs policy decision steps against the emulated game.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `kanto-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the stub backend with a demo screen-context script
//! 4. Construct the session (controls come from the config)
//! 5. Start the emulator and both background loops
//! 6. Spawn a subscriber task that logs active-policy changes
//! 7. Run the configured number of decision steps
//! 8. Stop the session and log the final status

mod error;

use std::path::Path;

use kanto_core::config::KantoConfig;
use kanto_core::session::Session;
use kanto_emu::StubBackend;
use kanto_types::ScreenContext;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const CONFIG_FILE: &str = "kanto-config.yaml";

/// Application entry point for the session coordinator.
///
/// Initializes all subsystems, runs the demo decision driver, and shuts
/// the session down.
///
/// # Errors
///
/// Returns an error if configuration loading or session startup fails.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging comes after, so the config's
    //    fallback level can seed the filter.
    let config_path = Path::new(CONFIG_FILE);
    let config = load_config(config_path)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("kanto-engine starting");
    if config_path.exists() {
        info!(
            session_name = %config.session.name,
            rom_path = %config.session.rom_path,
            seed = config.session.seed,
            "Configuration loaded"
        );
    } else {
        info!("Config file not found, using defaults");
    }

    // 3. Build the stub backend with a demo context script.
    let backend =
        StubBackend::new(&config.session.rom_path).with_context_script(demo_context_script());
    info!(rom_path = %config.session.rom_path, "Stub backend prepared");

    // 4. Construct the session; the control board picks up the
    //    configured mode and policy slots.
    let driver = config.driver;
    let session = Session::new(config);
    let controls = session.controls().await;
    info!(
        mode = %controls.mode,
        player_policy = %controls.player_policy,
        pokemon_policy = %controls.pokemon_policy,
        "Controls configured"
    );

    // 5. Start the emulator and both background loops.
    session.start(Box::new(backend)).await.map_err(EngineError::from)?;

    // 6. Log active-policy changes as state broadcasts flow.
    let mut states = session.subscribe_states();
    let _policy_logger = tokio::spawn(async move {
        let mut last_active = String::new();
        loop {
            match states.recv().await {
                Ok(update) => {
                    if update.active_policy != last_active {
                        info!(
                            active_policy = %update.active_policy,
                            context = %update.state.context,
                            "Active policy changed"
                        );
                        last_active = update.active_policy;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "State subscriber lagged behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 7. Run the demo decision driver.
    info!(
        steps = driver.steps,
        step_delay_ms = driver.step_delay_ms,
        "Entering decision driver"
    );
    for step in 1..=driver.steps {
        match session.step().await {
            Ok(report) if report.outcome.success => {
                info!(step, action = %report.action, commentary = %report.commentary, "Step complete");
            }
            Ok(report) => {
                warn!(
                    step,
                    action = %report.action,
                    error = report.outcome.error.as_deref().unwrap_or(""),
                    "Step action failed"
                );
            }
            Err(err) => {
                warn!(step, error = %err, "Step skipped");
            }
        }
        tokio::time::sleep(driver.step_delay()).await;
    }

    // 8. Stop the session and report.
    session.stop().await.map_err(EngineError::from)?;
    let status = session.status().await;
    info!(
        running = status.running,
        frame_count = status.frame_count,
        "kanto-engine shutdown complete"
    );

    Ok(())
}

/// Load the coordinator configuration from `kanto-config.yaml`.
///
/// Looks for the config file relative to the current working directory
/// and falls back to defaults when it is absent.
fn load_config(path: &Path) -> Result<KantoConfig, EngineError> {
    if path.exists() {
        let config = KantoConfig::from_file(path)?;
        Ok(config)
    } else {
        Ok(KantoConfig::default())
    }
}

/// Demo screen-context script: stretches of overworld exploration
/// interleaved with wild battles, settling in the overworld once the
/// script is exhausted.
fn demo_context_script() -> Vec<ScreenContext> {
    let mut script = Vec::new();
    for _ in 0..4 {
        script.extend(std::iter::repeat_n(ScreenContext::Overworld, 15));
        script.extend(std::iter::repeat_n(ScreenContext::Battle, 10));
    }
    script.push(ScreenContext::Overworld);
    script
}
