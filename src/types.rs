//! Core value types: observer coordinates and prayer identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Geographic position of the observer, in decimal degrees.
///
/// Construction validates the ranges up front so the astronomical code can
/// assume sane inputs; out-of-range values fail with
/// [`Error::InvalidCoordinate`] rather than being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Create validated coordinates.
    ///
    /// Latitude must be within [-90, 90] and longitude within [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// The six daily instants the calculator produces.
///
/// Sunrise is included as a computed instant but is not a prayer: the state
/// evaluator skips it when deciding the current and next prayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// The five obligatory prayers in chronological order (sunrise excluded).
    pub const OBLIGATORY: [Prayer; 5] = [
        Prayer::Fajr,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    /// Arabic display name.
    pub fn arabic_name(&self) -> &'static str {
        match self {
            Prayer::Fajr => "الفجر",
            Prayer::Sunrise => "الشروق",
            Prayer::Dhuhr => "الظهر",
            Prayer::Asr => "العصر",
            Prayer::Maghrib => "المغرب",
            Prayer::Isha => "العشاء",
        }
    }
}

/// A prayer together with its computed instant, as handed to display layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerMoment {
    pub prayer: Prayer,
    pub time: DateTime<Utc>,
    pub name: &'static str,
    pub arabic_name: &'static str,
}

impl PrayerMoment {
    pub(crate) fn new(prayer: Prayer, time: DateTime<Utc>) -> Self {
        Self {
            prayer,
            time,
            name: prayer.name(),
            arabic_name: prayer.arabic_name(),
        }
    }
}
