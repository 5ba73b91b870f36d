//! Error types for configuration, audio output and the session runner.

use thiserror::Error;

/// Rejected configuration values (CLI, settings boundary, parameter structs)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("tick interval must be > 0 ms")]
    ZeroTickInterval,

    #[error("sample rate must be > 0 Hz")]
    ZeroSampleRate,

    #[error("tone cache capacity must be > 0")]
    ZeroCacheCapacity,
}

/// Audio device and WAV export failures
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to query default output config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to enumerate output configs: {0}")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("invalid tone configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Session runner start-up failures
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid tick configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn scheduler thread: {0}")]
    Spawn(#[from] std::io::Error),
}
