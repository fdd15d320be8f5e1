use std::path::{Path, PathBuf};

use foundation::math::ProjectionModel;
use layers::{ConfigError, OverlayConfig};

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ConfigOverrides {
    pub radius_meters: Option<f64>,
    pub ground_offset: Option<f64>,
    pub earth_radius_meters: Option<f64>,
    pub projection: Option<ProjectionModel>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut OverlayConfig) {
        if let Some(v) = self.radius_meters {
            config.radius_meters = v;
        }
        if let Some(v) = self.ground_offset {
            config.ground_offset = v;
        }
        if let Some(v) = self.earth_radius_meters {
            config.earth_radius_meters = v;
        }
        if let Some(v) = self.projection {
            config.projection = v;
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Config(ConfigError),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Read { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            SettingsError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Read { source, .. } => Some(source),
            SettingsError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SettingsError {
    fn from(e: ConfigError) -> Self {
        SettingsError::Config(e)
    }
}

/// Defaults, then the optional JSON file, then overrides; validated last so
/// an override can bring an out-of-range file value back in range.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<OverlayConfig, SettingsError> {
    let mut config = match path {
        Some(path) => {
            let payload = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            OverlayConfig::from_json_str(&payload)?
        }
        None => OverlayConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}
