//! Error types for salatsync-core

use chrono::NaiveDate;
use thiserror::Error;

/// Result type for salatsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when computing prayer times
#[derive(Error, Debug)]
pub enum Error {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The sun never crosses the horizon on this date, so no time of day
    /// can be assigned even with a high-latitude fallback
    #[error("Unresolvable geometry: sun does not rise or set at latitude {latitude} on {date}")]
    UnresolvableGeometry { latitude: f64, date: NaiveDate },

    /// Calculation method identifier outside the supported set
    #[error("Unknown calculation method: {0}")]
    UnknownMethod(String),

    /// Madhab identifier outside the supported set
    #[error("Unknown madhab: {0}")]
    UnknownMadhab(String),

    /// High latitude rule identifier outside the supported set
    #[error("Unknown high latitude rule: {0}")]
    UnknownHighLatitudeRule(String),

    /// Settings JSON parsing error
    #[error("Settings JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
