use std::io;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "climate_odds";
const SCORER_FILE_NAME: &str = "aqi_scorer.bin";

/// Default location of the air-quality scorer artifact,
/// e.g. `~/.local/share/climate_odds/aqi_scorer.bin` on Linux.
pub fn default_scorer_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(DATA_DIR_NAME).join(SCORER_FILE_NAME))
}

pub(crate) async fn ensure_parent_dir_exists(path: &Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    match tokio::fs::metadata(parent).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("Path exists but is not a directory: {}", parent.display()),
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("Creating directory: {}", parent.display());
            tokio::fs::create_dir_all(parent).await
        }
        Err(e) => Err(e),
    }
}

/// Rounds to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
