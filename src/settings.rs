//! User-facing calculation settings.
//!
//! Settings are an immutable value passed into every calculation; the core
//! never reads ambient state. Identifiers serialize as the snake_case
//! strings the surrounding application stores, and the string-parsing
//! boundary is where unknown identifiers are rejected — the enums
//! themselves are closed, so adding a method is a single compile-checked
//! change site in the parameter table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named prayer time calculation method.
///
/// Each variant maps to a fixed table of solar angles and offsets in
/// [`Parameters::resolve`](crate::parameters::Parameters::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    MuslimWorldLeague,
    Egyptian,
    Karachi,
    UmmAlQura,
    Dubai,
    MoonsightingCommittee,
    NorthAmerica,
    Kuwait,
    Qatar,
    Singapore,
    Turkey,
    Tehran,
    /// No preset angles; the caller supplies explicit adjustments.
    Other,
}

impl CalculationMethod {
    const ALL: [(&'static str, CalculationMethod); 13] = [
        ("muslim_world_league", CalculationMethod::MuslimWorldLeague),
        ("egyptian", CalculationMethod::Egyptian),
        ("karachi", CalculationMethod::Karachi),
        ("umm_al_qura", CalculationMethod::UmmAlQura),
        ("dubai", CalculationMethod::Dubai),
        (
            "moonsighting_committee",
            CalculationMethod::MoonsightingCommittee,
        ),
        ("north_america", CalculationMethod::NorthAmerica),
        ("kuwait", CalculationMethod::Kuwait),
        ("qatar", CalculationMethod::Qatar),
        ("singapore", CalculationMethod::Singapore),
        ("turkey", CalculationMethod::Turkey),
        ("tehran", CalculationMethod::Tehran),
        ("other", CalculationMethod::Other),
    ];

    /// Stored identifier for this method.
    pub fn identifier(&self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, m)| m == self)
            .map(|(id, _)| *id)
            .unwrap_or("other")
    }
}

impl FromStr for CalculationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|(id, _)| *id == s)
            .map(|(_, m)| *m)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Jurisprudential school, affecting only the Asr shadow multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Madhab {
    /// Shafi, Maliki, and Hanbali schools: shadow length 1x.
    #[serde(alias = "shafi_maliki_hanbali")]
    Shafi,
    /// Hanafi school: shadow length 2x, giving a later Asr.
    Hanafi,
}

impl Madhab {
    /// Shadow-length multiplier used in the Asr equation.
    pub fn shadow_length(&self) -> f64 {
        match self {
            Madhab::Shafi => 1.0,
            Madhab::Hanafi => 2.0,
        }
    }
}

impl FromStr for Madhab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "shafi" | "shafi_maliki_hanbali" => Ok(Madhab::Shafi),
            "hanafi" => Ok(Madhab::Hanafi),
            other => Err(Error::UnknownMadhab(other.to_string())),
        }
    }
}

/// Fallback policy for Fajr/Isha when twilight geometry is unattainable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLatitudeRule {
    /// Fajr/Isha no earlier/later than half the night from sunrise/sunset.
    MiddleOfTheNight,
    /// One seventh of the night.
    SeventhOfTheNight,
    /// Night fraction proportional to the twilight angle (angle / 60).
    TwilightAngle,
}

impl FromStr for HighLatitudeRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "middle_of_the_night" => Ok(HighLatitudeRule::MiddleOfTheNight),
            "seventh_of_the_night" => Ok(HighLatitudeRule::SeventhOfTheNight),
            "twilight_angle" => Ok(HighLatitudeRule::TwilightAngle),
            other => Err(Error::UnknownHighLatitudeRule(other.to_string())),
        }
    }
}

/// Manual per-prayer offsets in minutes.
///
/// `Some(0)` and `None` are distinct states: an explicit zero is a valid
/// adjustment and must survive round-trips, so presence is modeled with
/// `Option` instead of treating zero as unset. Values outside
/// [`PrayerAdjustments::RANGE_MINUTES`] are clamped at resolve time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerAdjustments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fajr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhuhr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maghrib: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isha: Option<i32>,
}

impl PrayerAdjustments {
    /// Accepted adjustment range in minutes; values outside are clamped.
    pub const RANGE_MINUTES: i32 = 30;

    /// True when no adjustment is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Complete calculation settings, as supplied by the preferences store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimeSettings {
    #[serde(rename = "calculation_method", alias = "calculationMethod")]
    pub method: CalculationMethod,
    pub madhab: Madhab,
    #[serde(alias = "highLatitudeRule")]
    pub high_latitude_rule: HighLatitudeRule,
    #[serde(default, skip_serializing_if = "PrayerAdjustments::is_empty")]
    pub adjustments: PrayerAdjustments,
}

impl Default for PrayerTimeSettings {
    fn default() -> Self {
        Self {
            method: CalculationMethod::MuslimWorldLeague,
            madhab: Madhab::Shafi,
            high_latitude_rule: HighLatitudeRule::MiddleOfTheNight,
            adjustments: PrayerAdjustments::default(),
        }
    }
}

impl PrayerTimeSettings {
    /// Settings for a given method with default madhab and rule.
    pub fn with_method(method: CalculationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Parse settings from their stored JSON form.
    ///
    /// Unknown method, madhab, or rule identifiers fail deserialization,
    /// mirroring the validation the preferences store performs.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings to their stored JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
