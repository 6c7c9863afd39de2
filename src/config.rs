//! Configuration management for the capture and display pipeline
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling quick changes to sample rate, window size and display range
//! without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PipelineError;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub audio: AudioConfig,
    pub window: WindowConfig,
    pub display: DisplayConfig,
    pub recording: RecordingConfig,
    pub telemetry: TelemetryConfig,
}

/// Input device parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Sample rate requested from the input device in Hz
    pub sample_rate: u32,
    /// Frames delivered per callback invocation
    pub frames_per_buffer: u32,
    /// 1 = mono, 2 = stereo (both channels copied interleaved)
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frames_per_buffer: 512,
            channels: 1,
        }
    }
}

/// Windowing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Transform window size N in samples
    pub window_size: usize,
    /// Ring capacity as a multiple of the window size
    pub ring_windows: usize,
    /// Samples the callback-to-consumer transport can hold, in windows
    pub transport_headroom: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            ring_windows: 1,
            transport_headroom: 4,
        }
    }
}

/// Display range and axis layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub db_min: f32,
    pub db_max: f32,
    /// Number of labels along the frequency axis
    pub frequency_labels: usize,
    /// Number of labels along the dB axis
    pub db_labels: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            db_min: -80.0,
            db_max: 0.0,
            frequency_labels: 5,
            db_labels: 5,
        }
    }
}

/// Pre-recorded sample file parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Expected recording length in seconds
    pub seconds: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self { seconds: 5 }
    }
}

/// Metrics logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Log a metrics summary every N emitted windows (0 disables)
    pub log_every_n_windows: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_every_n_windows: 100,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The loaded configuration, or the defaults if the file is missing or
    /// the JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check the values every pipeline component relies on at construction.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |reason: &str| {
            Err(PipelineError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.audio.sample_rate == 0 {
            return invalid("sample_rate must be greater than 0");
        }
        if self.audio.frames_per_buffer == 0 {
            return invalid("frames_per_buffer must be greater than 0");
        }
        if !(1..=2).contains(&self.audio.channels) {
            return invalid("channels must be 1 or 2");
        }
        if self.window.window_size < 2 {
            return invalid("window_size must be at least 2");
        }
        if self.window.ring_windows == 0 {
            return invalid("ring_windows must be at least 1");
        }
        if self.window.transport_headroom == 0 {
            return invalid("transport_headroom must be at least 1");
        }
        if !(self.display.db_min < self.display.db_max) {
            return invalid("db_min must be below db_max");
        }
        if self.display.frequency_labels < 2 || self.display.db_labels < 2 {
            return invalid("axes need at least two labels");
        }
        Ok(())
    }

    /// Ring buffer capacity in samples
    pub fn ring_capacity(&self) -> usize {
        self.window.window_size * self.window.ring_windows
    }

    /// Transport capacity in samples
    pub fn transport_capacity(&self) -> usize {
        self.window.window_size * self.window.transport_headroom
    }

    /// Number of samples a complete recording holds
    pub fn recording_samples(&self) -> usize {
        self.recording.seconds as usize * self.audio.sample_rate as usize * self.audio.channels as usize
    }

    /// Frequency spacing between adjacent bins in Hz
    pub fn fundamental_frequency(&self) -> f32 {
        self.audio.sample_rate as f32 / self.window.window_size as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.audio.sample_rate, 16_000);
        assert_eq!(config.audio.frames_per_buffer, 512);
        assert_eq!(config.window.window_size, 1024);
        assert_eq!(config.display.db_min, -80.0);
        assert_eq!(config.display.db_max, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_derived_values() {
        let config = AppConfig::default();
        assert_eq!(config.ring_capacity(), 1024);
        assert_eq!(config.transport_capacity(), 4096);
        assert_eq!(config.recording_samples(), 80_000);
        assert_eq!(config.fundamental_frequency(), 15.625);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let parsed: AppConfig =
            serde_json::from_str(r#"{ "window": { "window_size": 2048 } }"#).unwrap();
        assert_eq!(parsed.window.window_size, 2048);
        assert_eq!(parsed.window.ring_windows, 1);
        assert_eq!(parsed.audio.sample_rate, 16_000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from_file("/nonexistent/spectro_ring.json");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.audio.channels = 6;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { .. })
        ));

        let mut config = AppConfig::default();
        config.display.db_min = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.window.window_size = 0;
        assert!(config.validate().is_err());
    }
}
