//! Log to a file; the terminal belongs to the animation.

use std::fs::{self, File};
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SLIPSTREAM_LOG";
const LOG_FILE: &str = "slipstream.log";

/// Install the global subscriber when `SLIPSTREAM_LOG` is set. The variable
/// takes the usual `EnvFilter` directives, e.g. `slipstream_flow=debug`.
pub fn init() -> Result<()> {
    if std::env::var_os(LOG_ENV).is_none() {
        return Ok(());
    }
    let dir = slipstream_config::data_dir().ok_or_else(|| eyre!("no home directory found"))?;
    fs::create_dir_all(&dir).wrap_err_with(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = File::create(&path).wrap_err_with(|| format!("failed to open {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).wrap_err("invalid SLIPSTREAM_LOG")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| eyre!(err))?;
    Ok(())
}
