//! Desktop platform implementation.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing_error::ErrorLayer;

use crate::error::PlatformError;
use crate::formatter::CustomFormatter;

/// Sleeps for the given duration.
///
/// Spin-sleeps for frame-accurate pacing while the window is focused; an
/// unfocused window gets the cheaper OS sleep.
pub fn sleep(duration: Duration, focused: bool) {
    if focused {
        spin_sleep::sleep(duration);
    } else {
        std::thread::sleep(duration);
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `--console` lowers the default
/// filter from `info` to `debug`.
pub fn init_console(force_console: bool) -> Result<(), PlatformError> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

    let default_filter = if force_console { "debug" } else { "info" };
    let subscriber = tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(fmt::layer().event_format(CustomFormatter))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| PlatformError::ConsoleInit(format!("Failed to set tracing subscriber: {}", e)))?;

    Ok(())
}

/// Gives control back to the browser between setup steps. No-op on desktop.
pub fn yield_to_browser() {}

/// A small fast RNG seeded from the thread-local generator.
pub fn rng() -> SmallRng {
    SmallRng::from_rng(&mut rand::rng())
}
