//! # Cubepad
//!
//! Spin a 3D scene and drive an overlay GUI with a gamepad.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration (first argument, default `config/default.toml`)
//!    - Set up logging with a tracing subscriber
//!    - Scan for gamepads
//!
//! 2. **Frame Loop** (at `frame.rate_hz`)
//!    - Rescan for hot-plugged gamepads every `host.scan_interval_frames`
//!    - Apply connect/disconnect notifications
//!    - Poll gamepads and dispatch to the GUI layer and cube rotation
//!    - Render the scene
//!    - Log status every `frame.status_interval_frames`
//!
//! 3. **Graceful Shutdown** on Ctrl+C

use anyhow::{Context, Result};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cubepad::config::{Config, LoggingConfig};
use cubepad::event_log::EventLog;
use cubepad::gamepad::binding::InputPolicy;
use cubepad::gamepad::evdev_host::EvdevHost;
use cubepad::gamepad::lifecycle::InputSystem;
use cubepad::gui::GuiInputState;
use cubepad::scene::{CubeRotation, Scene};

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "cubepad.log";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _log_guard = init_logging(&config.logging);

    info!("Cubepad v{} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Configuration: {:?}", config);

    let gui = if config.event_log.enabled {
        let log = EventLog::create(&config.event_log.path)
            .with_context(|| format!("Failed to open event log {}", config.event_log.path))?;
        info!("Recording GUI events to {}", log.path().display());
        GuiInputState::with_event_log(log)
    } else {
        GuiInputState::new()
    };

    let mut input = InputSystem::new(InputPolicy::from(&config.input), gui);
    let mut host = EvdevHost::new(&config.host.input_dir);
    if let Err(e) = host.scan() {
        warn!("Initial gamepad scan failed: {}", e);
    }

    let mut scene = Scene::new();
    let mut rotation = CubeRotation::default();

    let mut frame_interval = interval(frame_period(config.frame.rate_hz));
    frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Starting frame loop at {}Hz", config.frame.rate_hz);
    info!("Press Ctrl+C to exit");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut frame: u64 = 0;

    // Main frame loop
    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                frame += 1;

                if frame % config.host.scan_interval_frames == 0 {
                    if let Err(e) = host.scan() {
                        debug!("Gamepad scan failed: {}", e);
                    }
                }

                // Connect/disconnect always land between polls
                input.apply_host_events(&mut host);
                input.poll(&mut host, &mut rotation);
                scene.draw(&rotation);

                if frame % config.frame.status_interval_frames == 0 {
                    let [x, y] = scene.orientation();
                    info!(
                        "Frame {}: {} gamepad(s), orientation ({:.3}, {:.3}), {} presses",
                        frame,
                        input.registry().len(),
                        x,
                        y,
                        input.sink().press_count()
                    );
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down...");
                info!(
                    "Total frames: {}, skipped samples: {}",
                    scene.frames(),
                    input.dispatcher().skipped_samples()
                );
                break;
            }
        }
    }

    Ok(())
}

/// Installs the tracing subscriber.
///
/// `RUST_LOG` overrides the configured level. When a log directory is set,
/// logs also go to a daily rolling file; the returned guard must be kept
/// alive for buffered lines to be written.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false));

    if config.log_dir.is_empty() {
        registry.init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Some(guard)
}

/// Time between frames at `rate_hz`.
fn frame_period(rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1)))
}
