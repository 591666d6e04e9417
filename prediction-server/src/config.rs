//! Configuration module

use std::env;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory that relative artifact paths are resolved against
    pub artifact_dir: PathBuf,

    /// Serialized classifier (ONNX)
    pub model_path: PathBuf,

    /// Serialized decision threshold (JSON)
    pub threshold_path: PathBuf,

    /// Environment (development, production)
    pub environment: String,
}

pub const DEFAULT_MODEL_FILE: &str = "water_potability_model.onnx";
pub const DEFAULT_THRESHOLD_FILE: &str = "best_threshold.json";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let artifact_dir = env::var("ARTIFACT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| install_dir());

        let model_path = resolve_artifact(
            &artifact_dir,
            &env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_FILE.to_string()),
        );

        let threshold_path = resolve_artifact(
            &artifact_dir,
            &env::var("THRESHOLD_PATH").unwrap_or_else(|_| DEFAULT_THRESHOLD_FILE.to_string()),
        );

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            artifact_dir,
            model_path,
            threshold_path,

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Default `RUST_LOG` filter when none is set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_production() {
            "potability_server=info,potability_core=info,tower_http=info"
        } else {
            "potability_server=debug,potability_core=debug,tower_http=debug"
        }
    }
}

/// Directory holding the running executable, or the working directory.
fn install_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Absolute paths are kept, relative ones hang off `base`.
pub fn resolve_artifact(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
