//! Resolution of named settings into concrete astronomical parameters.
//!
//! The method table here is domain knowledge: each named method carries the
//! Fajr/Isha solar angles (degrees below the horizon), fixed Isha intervals
//! where the method defines one, an optional Maghrib angle, and the minute
//! offsets the method's issuing authority publishes.

use crate::settings::{
    CalculationMethod, HighLatitudeRule, Madhab, PrayerAdjustments, PrayerTimeSettings,
};

/// Per-prayer minute offsets, fully resolved (no unset state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeAdjustments {
    pub fajr: i32,
    pub sunrise: i32,
    pub dhuhr: i32,
    pub asr: i32,
    pub maghrib: i32,
    pub isha: i32,
}

/// Fraction of the night used to bound Fajr and Isha at high latitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightPortions {
    pub fajr: f64,
    pub isha: f64,
}

/// Concrete parameters for one calculation, produced by
/// [`Parameters::resolve`] and consumed by the calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub method: CalculationMethod,
    /// Degrees below the horizon at which dawn twilight begins.
    pub fajr_angle: f64,
    /// Degrees below the horizon at which night twilight ends.
    pub isha_angle: f64,
    /// Minutes after Maghrib; when non-zero this replaces the Isha angle.
    pub isha_interval: i32,
    /// Method-specific Maghrib angle (Tehran), degrees below the horizon.
    pub maghrib_angle: Option<f64>,
    pub madhab: Madhab,
    pub high_latitude_rule: HighLatitudeRule,
    /// User adjustments, clamped to the accepted range.
    pub adjustments: TimeAdjustments,
    /// Offsets published by the method's issuing authority.
    pub method_adjustments: TimeAdjustments,
}

impl Parameters {
    /// Resolve user settings into concrete calculation parameters.
    ///
    /// The match on `CalculationMethod` is exhaustive, so adding a method
    /// is a compile-checked change at this single site. User adjustments
    /// are applied if present (an explicit zero is respected) and clamped
    /// to [-30, 30] minutes.
    pub fn resolve(settings: &PrayerTimeSettings) -> Self {
        let mut params = Self::for_method(settings.method);
        params.madhab = settings.madhab;
        params.high_latitude_rule = settings.high_latitude_rule;
        params.adjustments = clamp_adjustments(&settings.adjustments);
        params
    }

    fn for_method(method: CalculationMethod) -> Self {
        let base = Parameters {
            method,
            fajr_angle: 0.0,
            isha_angle: 0.0,
            isha_interval: 0,
            maghrib_angle: None,
            madhab: Madhab::Shafi,
            high_latitude_rule: HighLatitudeRule::MiddleOfTheNight,
            adjustments: TimeAdjustments::default(),
            method_adjustments: TimeAdjustments::default(),
        };

        match method {
            CalculationMethod::MuslimWorldLeague => Parameters {
                fajr_angle: 18.0,
                isha_angle: 17.0,
                method_adjustments: TimeAdjustments {
                    dhuhr: 1,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::Egyptian => Parameters {
                fajr_angle: 19.5,
                isha_angle: 17.5,
                method_adjustments: TimeAdjustments {
                    dhuhr: 1,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::Karachi => Parameters {
                fajr_angle: 18.0,
                isha_angle: 18.0,
                method_adjustments: TimeAdjustments {
                    dhuhr: 1,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::UmmAlQura => Parameters {
                fajr_angle: 18.5,
                isha_interval: 90,
                ..base
            },
            CalculationMethod::Dubai => Parameters {
                fajr_angle: 18.2,
                isha_angle: 18.2,
                method_adjustments: TimeAdjustments {
                    sunrise: -3,
                    dhuhr: 3,
                    asr: 3,
                    maghrib: 3,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::MoonsightingCommittee => Parameters {
                fajr_angle: 18.0,
                isha_angle: 18.0,
                method_adjustments: TimeAdjustments {
                    dhuhr: 5,
                    maghrib: 3,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::NorthAmerica => Parameters {
                fajr_angle: 15.0,
                isha_angle: 15.0,
                method_adjustments: TimeAdjustments {
                    dhuhr: 1,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::Kuwait => Parameters {
                fajr_angle: 18.0,
                isha_angle: 17.5,
                ..base
            },
            CalculationMethod::Qatar => Parameters {
                fajr_angle: 18.0,
                isha_interval: 90,
                ..base
            },
            CalculationMethod::Singapore => Parameters {
                fajr_angle: 20.0,
                isha_angle: 18.0,
                method_adjustments: TimeAdjustments {
                    dhuhr: 1,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::Turkey => Parameters {
                fajr_angle: 18.0,
                isha_angle: 17.0,
                method_adjustments: TimeAdjustments {
                    sunrise: -7,
                    dhuhr: 5,
                    asr: 4,
                    maghrib: 7,
                    ..Default::default()
                },
                ..base
            },
            CalculationMethod::Tehran => Parameters {
                fajr_angle: 17.7,
                isha_angle: 14.0,
                maghrib_angle: Some(4.5),
                ..base
            },
            CalculationMethod::Other => base,
        }
    }

    /// Night fractions the high-latitude rule allots to Fajr and Isha.
    pub fn night_portions(&self) -> NightPortions {
        match self.high_latitude_rule {
            HighLatitudeRule::MiddleOfTheNight => NightPortions {
                fajr: 1.0 / 2.0,
                isha: 1.0 / 2.0,
            },
            HighLatitudeRule::SeventhOfTheNight => NightPortions {
                fajr: 1.0 / 7.0,
                isha: 1.0 / 7.0,
            },
            HighLatitudeRule::TwilightAngle => NightPortions {
                fajr: self.fajr_angle / 60.0,
                isha: self.isha_angle / 60.0,
            },
        }
    }
}

fn clamp_adjustments(adjustments: &PrayerAdjustments) -> TimeAdjustments {
    let clamp = |value: Option<i32>| {
        value
            .map(|v| {
                v.clamp(
                    -PrayerAdjustments::RANGE_MINUTES,
                    PrayerAdjustments::RANGE_MINUTES,
                )
            })
            .unwrap_or(0)
    };
    TimeAdjustments {
        fajr: clamp(adjustments.fajr),
        sunrise: clamp(adjustments.sunrise),
        dhuhr: clamp(adjustments.dhuhr),
        asr: clamp(adjustments.asr),
        maghrib: clamp(adjustments.maghrib),
        isha: clamp(adjustments.isha),
    }
}
