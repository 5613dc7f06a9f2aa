pub mod play;
pub mod scenes;
pub mod show;

use std::path::Path;

use fable_stage::StageConfig;

/// Read the stage config, or fall back to the defaults.
fn load_config(path: Option<&Path>) -> Result<StageConfig, String> {
    match path {
        Some(path) => {
            let config = StageConfig::from_file(path).map_err(|e| e.to_string())?;
            log::debug!("loaded stage config from {}: {config:?}", path.display());
            Ok(config)
        }
        None => {
            log::debug!("using default stage config");
            Ok(StageConfig::default())
        }
    }
}

/// `m:ss.mmm` for a virtual timestamp.
fn format_time(ms: u64) -> String {
    format!("{}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}
