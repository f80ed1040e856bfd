//! Configuration loading and typed config structures for the Fieldgrid
//! viewer.
//!
//! The canonical configuration lives in `fieldgrid-config.yaml` in the
//! working directory. Every field has a default, so an empty file (or no
//! file at all) yields a working viewer polling `http://localhost:8000/state`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fieldgrid_render::RenderSettings;
use fieldgrid_types::{GridSnapshot, ViewState, VisiblePanels};
use serde::Deserialize;

use crate::source::SourceSettings;

/// Environment variable overriding `source.base_url`.
pub const ENV_BACKEND_URL: &str = "FIELDGRID_BACKEND_URL";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "FIELDGRID_PORT";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of range, or a referenced file is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level viewer configuration.
///
/// Mirrors the structure of `fieldgrid-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// Where frames come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Tile geometry.
    #[serde(default)]
    pub render: RenderConfig,

    /// Initial overlay and pause state.
    #[serde(default)]
    pub view: ViewConfig,

    /// HTTP bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ViewerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FIELDGRID_BACKEND_URL` overrides `source.base_url`
    /// - `FIELDGRID_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Defaults plus environment overrides, for running without a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from the process environment when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `FIELDGRID_PORT` is not a port.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Override values from `lookup`, keyed by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the port override is not a port.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.source.base_url = url;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{ENV_PORT}={port}: {e}")))?;
        }
        Ok(())
    }

    /// Reject values the viewer cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_owned()));
        if self.render.tile_size == 0 {
            return invalid("render.tile_size must be at least 1");
        }
        let dpr = self.render.device_pixel_ratio;
        if !dpr.is_finite() || dpr < 1.0 {
            return invalid("render.device_pixel_ratio must be a finite value >= 1");
        }
        if self.source.poll_interval_ms == 0 {
            return invalid("source.poll_interval_ms must be at least 1");
        }
        if self.source.playback_tick_ms == 0 {
            return invalid("source.playback_tick_ms must be at least 1");
        }
        if self.source.request_timeout_ms == 0 {
            return invalid("source.request_timeout_ms must be at least 1");
        }
        Ok(())
    }

    /// Full URL of the backend's current-state endpoint.
    pub fn state_url(&self) -> String {
        format!(
            "{}/{}",
            self.source.base_url.trim_end_matches('/'),
            self.source.state_path.trim_start_matches('/')
        )
    }

    /// Scheduling cadences for attached sources.
    pub const fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            poll_interval: Duration::from_millis(self.source.poll_interval_ms),
            playback_tick: Duration::from_millis(self.source.playback_tick_ms),
            start_paused: self.view.start_paused,
        }
    }

    /// Timeout applied to each live request.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.source.request_timeout_ms)
    }

    /// Tile geometry for the render pipeline.
    pub const fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            tile_size: self.render.tile_size,
            device_pixel_ratio: self.render.device_pixel_ratio,
        }
    }

    /// Initial presentation state.
    pub const fn initial_view(&self) -> ViewState {
        ViewState {
            paused: self.view.start_paused,
            visible_panels: VisiblePanels {
                legend: self.view.show_legend,
                messages: self.view.show_messages,
                agent_info: self.view.show_agent_info,
            },
        }
    }
}

/// Read a JSON array of snapshots for playback.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, or
/// [`ConfigError::Invalid`] if it is not a non-empty snapshot array.
pub fn load_frames(path: &Path) -> Result<Vec<GridSnapshot>, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let frames: Vec<GridSnapshot> = serde_json::from_str(&contents).map_err(|e| {
        ConfigError::Invalid(format!("{} is not a snapshot array: {e}", path.display()))
    })?;
    if frames.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{} contains no frames",
            path.display()
        )));
    }
    Ok(frames)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Frame source settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// Backend base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the current-state endpoint.
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Delay after each live poll resolves.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Delay between playback frames.
    #[serde(default = "default_playback_tick_ms")]
    pub playback_tick_ms: u64,

    /// JSON frame array to replay instead of polling.
    #[serde(default)]
    pub frames_file: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            state_path: default_state_path(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            playback_tick_ms: default_playback_tick_ms(),
            frames_file: None,
        }
    }
}

/// Tile geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// Tile side in device-independent units.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,

    /// Device pixels per unit.
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            device_pixel_ratio: default_device_pixel_ratio(),
        }
    }
}

/// Initial overlay and pause state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ViewConfig {
    /// Show the cell legend.
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Show recent announcements.
    #[serde(default = "default_true")]
    pub show_messages: bool,

    /// Show per-agent telemetry.
    #[serde(default)]
    pub show_agent_info: bool,

    /// Attach sources paused.
    #[serde(default)]
    pub start_paused: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_messages: true,
            show_agent_info: false,
            start_paused: false,
        }
    }
}

/// HTTP bind address of the operator surface.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_owned()
}

fn default_state_path() -> String {
    "/state".to_owned()
}

const fn default_poll_interval_ms() -> u64 {
    300
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_playback_tick_ms() -> u64 {
    16
}

const fn default_tile_size() -> u32 {
    25
}

const fn default_device_pixel_ratio() -> f32 {
    1.0
}

const fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8090
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse_without_env(yaml: &str) -> Result<ViewerConfig, ConfigError> {
        let config: ViewerConfig = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = ViewerConfig::default();
        assert_eq!(config.source.base_url, "http://localhost:8000");
        assert_eq!(config.source.poll_interval_ms, 300);
        assert_eq!(config.source.request_timeout_ms, 10_000);
        assert_eq!(config.render.tile_size, 25);
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.state_url(), "http://localhost:8000/state");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = parse_without_env("render:\n  tile_size: 30\n").unwrap();
        assert_eq!(config.render.tile_size, 30);
        // Everything else uses defaults
        assert_eq!(config.source.state_path, "/state");
        assert!(config.view.show_legend);
        assert!(!config.view.show_agent_info);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
source:
  base_url: "http://sim:9000/"
  state_path: "api/state"
  poll_interval_ms: 500
  request_timeout_ms: 2000
  playback_tick_ms: 33
  frames_file: "frames.json"
render:
  tile_size: 20
  device_pixel_ratio: 2.0
view:
  show_legend: false
  show_messages: true
  show_agent_info: true
  start_paused: true
server:
  host: "127.0.0.1"
  port: 9100
logging:
  level: "debug"
"#;
        let config = parse_without_env(yaml).unwrap();
        assert_eq!(config.state_url(), "http://sim:9000/api/state");
        assert_eq!(config.source.frames_file, Some(PathBuf::from("frames.json")));
        let settings = config.source_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(500));
        assert_eq!(settings.playback_tick, Duration::from_millis(33));
        assert!(settings.start_paused);
        let view = config.initial_view();
        assert!(view.paused);
        assert!(!view.visible_panels.legend);
        assert!(view.visible_panels.agent_info);
        assert_eq!(config.render_settings().tile_size, 20);
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn parse_empty_mapping() {
        assert_eq!(parse_without_env("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        for yaml in [
            "render:\n  tile_size: 0\n",
            "render:\n  device_pixel_ratio: 0.5\n",
            "source:\n  poll_interval_ms: 0\n",
            "source:\n  playback_tick_ms: 0\n",
        ] {
            assert!(
                matches!(parse_without_env(yaml), Err(ConfigError::Invalid(_))),
                "accepted {yaml:?}"
            );
        }
    }

    #[test]
    fn overrides_replace_url_and_port() {
        let mut config = ViewerConfig::default();
        config
            .apply_overrides(|key| match key {
                ENV_BACKEND_URL => Some("http://backend:8000".to_owned()),
                ENV_PORT => Some("9999".to_owned()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.source.base_url, "http://backend:8000");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn bad_port_override_is_invalid() {
        let mut config = ViewerConfig::default();
        let result = config.apply_overrides(|key| (key == ENV_PORT).then(|| "http".to_owned()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_frames_rejects_missing_file() {
        let result = load_frames(Path::new("/nonexistent/fieldgrid-frames.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fieldgrid-config.yaml");
        if path.exists() {
            let contents = std::fs::read_to_string(&path).unwrap();
            let config = parse_without_env(&contents);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
