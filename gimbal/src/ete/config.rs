//! Serial line settings and gimbal session configuration.
//!
//! The ETE controller talks 9600 baud, 7 data bits, even parity, 2 stop bits.
//! Session parameters (port, inter-command delay, steps per revolution) can be
//! loaded from a JSON file:
//!
//! ```json
//! { "port": "/dev/ttyUSB1", "delay_secs": 0.1, "yaw_steps": 28800, "roll_steps": 9600 }
//! ```
//!
//! Missing fields take their defaults; `"port": null` selects dry-run mode.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serialport::{DataBits, Parity, StopBits};

use super::error::{EteError, EteResult};

/// Serial port used when none is configured explicitly.
pub const DEFAULT_PORT: &str = "/dev/ttyUSB1";

/// Line speed of the ETE controller.
pub const BAUD_RATE: u32 = 9600;

/// 7 data bits.
pub const DATA_BITS: DataBits = DataBits::Seven;

/// Even parity.
pub const PARITY: Parity = Parity::Even;

/// 2 stop bits.
pub const STOP_BITS: StopBits = StopBits::Two;

/// Read timeout for the line.
///
/// Reads are never issued, so this is effectively unbounded: the largest
/// millisecond count the platform poll call accepts.
pub const READ_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

/// Pause before each write, keeping commands within the controller's
/// processing rate.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Yaw axis steps per full revolution.
pub const DEFAULT_YAW_STEPS: u32 = 28800;

/// Roll axis steps per full revolution.
pub const DEFAULT_ROLL_STEPS: u32 = 9600;

/// Serial line parameters for opening the ETE port.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSettings {
    pub path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub read_timeout: Duration,
}

impl SerialSettings {
    /// Standard ETE line settings (9600 7E2) on the given port.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: BAUD_RATE,
            data_bits: DATA_BITS,
            parity: PARITY,
            stop_bits: STOP_BITS,
            read_timeout: READ_TIMEOUT,
        }
    }
}

/// Session configuration for a gimbal controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GimbalConfig {
    /// Serial port path, or `None` for dry-run mode.
    pub port: Option<String>,
    /// Delay before each command, in seconds.
    pub delay_secs: f64,
    /// Yaw axis steps per revolution.
    pub yaw_steps: u32,
    /// Roll axis steps per revolution.
    pub roll_steps: u32,
}

impl Default for GimbalConfig {
    fn default() -> Self {
        Self {
            port: Some(DEFAULT_PORT.to_string()),
            delay_secs: DEFAULT_DELAY.as_secs_f64(),
            yaw_steps: DEFAULT_YAW_STEPS,
            roll_steps: DEFAULT_ROLL_STEPS,
        }
    }
}

impl GimbalConfig {
    /// Configuration that logs frames instead of opening a port.
    pub fn dry_run() -> Self {
        Self {
            port: None,
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> EteResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EteError::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| EteError::Config(format!("Failed to parse {}: {e}", path.display())))?;
        config.delay()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> EteResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| EteError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, json)
            .map_err(|e| EteError::Config(format!("Failed to write {}: {e}", path.display())))
    }

    /// Inter-command delay as a [`Duration`].
    ///
    /// Fails for negative or non-finite `delay_secs`.
    pub fn delay(&self) -> EteResult<Duration> {
        Duration::try_from_secs_f64(self.delay_secs)
            .map_err(|e| EteError::Config(format!("Invalid delay {}: {e}", self.delay_secs)))
    }

    /// Serial settings for the configured port, if any.
    pub fn serial_settings(&self) -> Option<SerialSettings> {
        self.port.as_deref().map(SerialSettings::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = GimbalConfig::default();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.delay().unwrap(), Duration::from_millis(100));
        assert_eq!(config.yaw_steps, 28800);
        assert_eq!(config.roll_steps, 9600);
    }

    #[test]
    fn test_serial_settings_line_format() {
        let settings = SerialSettings::new("/dev/ttyUSB0");
        assert_eq!(settings.path, "/dev/ttyUSB0");
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.data_bits, DataBits::Seven);
        assert_eq!(settings.parity, Parity::Even);
        assert_eq!(settings.stop_bits, StopBits::Two);
    }

    #[test]
    fn test_dry_run_has_no_serial_settings() {
        assert!(GimbalConfig::dry_run().serial_settings().is_none());
        assert!(GimbalConfig::default().serial_settings().is_some());
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let file = write_config(r#"{ "delay_secs": 0.25, "yaw_steps": 14400 }"#);
        let config = GimbalConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.port.as_deref(), Some(DEFAULT_PORT));
        assert_eq!(config.delay().unwrap(), Duration::from_millis(250));
        assert_eq!(config.yaw_steps, 14400);
        assert_eq!(config.roll_steps, DEFAULT_ROLL_STEPS);
    }

    #[test]
    fn test_load_null_port_is_dry_run() {
        let file = write_config(r#"{ "port": null }"#);
        let config = GimbalConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.port, None);
    }

    #[test]
    fn test_load_rejects_negative_delay() {
        let file = write_config(r#"{ "delay_secs": -1.0 }"#);
        let err = GimbalConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, EteError::Config(_)));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let file = write_config("{ port: ");
        assert!(matches!(
            GimbalConfig::load_from_file(file.path()),
            Err(EteError::Config(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ete.json");

        let config = GimbalConfig {
            port: Some("/dev/ttyACM0".to_string()),
            delay_secs: 0.05,
            yaw_steps: 1000,
            roll_steps: 2000,
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(GimbalConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_save_to_missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ete.json");

        let err = GimbalConfig::default().save_to_file(&path).unwrap_err();
        assert!(matches!(err, EteError::Config(ref msg) if msg.contains("Failed to write")));
    }
}
