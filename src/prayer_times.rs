//! Prayer time calculation and current/next prayer evaluation.
//!
//! [`PrayerTimes::new`] computes the six instants for one coordinate, date,
//! and settings triple. The result owns the inputs it was computed from, so
//! the rollover to tomorrow's Fajr always reuses the caller's real
//! coordinates and parameters.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::astronomical::{
    season_adjusted_evening_twilight, season_adjusted_morning_twilight, SolarTime,
};
use crate::error::{Error, Result};
use crate::parameters::Parameters;
use crate::settings::{CalculationMethod, PrayerTimeSettings};
use crate::types::{Coordinates, Prayer, PrayerMoment};

/// Latitude above which the night-window clamp may rein in geometric
/// twilight times. Below this, a finite geometric time is always used
/// as-is, so the choice of high-latitude rule has no effect.
pub const HIGH_LATITUDE_THRESHOLD: f64 = 48.0;

/// The Moonsighting Committee switches Fajr/Isha to a seventh of the night
/// at this northern latitude before applying its seasonal tables.
const MOONSIGHTING_NIGHT_SEVENTH_LATITUDE: f64 = 55.0;

/// Computed prayer times for one date and location, in UTC.
///
/// Always complete: construction fails with
/// [`Error::UnresolvableGeometry`] rather than returning partial times.
/// Conversion to the location's civil clock is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrayerTimes {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
    coordinates: Coordinates,
    date: NaiveDate,
    parameters: Parameters,
}

impl PrayerTimes {
    /// Compute prayer times from user settings.
    pub fn new(
        coordinates: Coordinates,
        date: NaiveDate,
        settings: &PrayerTimeSettings,
    ) -> Result<Self> {
        Self::with_parameters(coordinates, date, Parameters::resolve(settings))
    }

    /// Compute prayer times from already-resolved parameters.
    pub fn with_parameters(
        coordinates: Coordinates,
        date: NaiveDate,
        parameters: Parameters,
    ) -> Result<Self> {
        let unresolvable = || Error::UnresolvableGeometry {
            latitude: coordinates.latitude,
            date,
        };

        let solar_time = SolarTime::new(date, coordinates);
        let tomorrow = date.succ_opt().ok_or_else(unresolvable)?;
        let tomorrow_solar = SolarTime::new(tomorrow, coordinates);

        let transit = time_on(date, solar_time.transit).ok_or_else(unresolvable)?;
        let sunrise = time_on(date, solar_time.sunrise).ok_or_else(unresolvable)?;
        let sunset = time_on(date, solar_time.sunset).ok_or_else(unresolvable)?;
        let tomorrow_sunrise =
            time_on(tomorrow, tomorrow_solar.sunrise).ok_or_else(unresolvable)?;

        let night_seconds = (tomorrow_sunrise - sunset).num_seconds() as f64;
        let portions = parameters.night_portions();
        let moonsighting = parameters.method == CalculationMethod::MoonsightingCommittee;

        // Fajr: geometric twilight, bounded by the rule's night window
        let mut geometric_fajr =
            time_on(date, solar_time.hour_angle(-parameters.fajr_angle, false));
        if moonsighting && coordinates.latitude >= MOONSIGHTING_NIGHT_SEVENTH_LATITUDE {
            geometric_fajr = Some(sunrise - seconds(night_seconds / 7.0));
        }
        let safe_fajr = if moonsighting {
            let minutes =
                season_adjusted_morning_twilight(coordinates.latitude, date.ordinal(), date.year());
            sunrise - seconds(minutes * 60.0)
        } else {
            sunrise - seconds(portions.fajr * night_seconds)
        };
        let fajr = resolve_twilight(
            Prayer::Fajr,
            geometric_fajr,
            safe_fajr,
            coordinates.latitude,
            TwilightBound::Earliest,
        );

        // Isha: fixed interval after sunset when the method defines one,
        // otherwise geometric twilight bounded like Fajr
        let isha = if parameters.isha_interval > 0 {
            sunset + Duration::minutes(parameters.isha_interval as i64)
        } else {
            let mut geometric_isha =
                time_on(date, solar_time.hour_angle(-parameters.isha_angle, true));
            if moonsighting && coordinates.latitude >= MOONSIGHTING_NIGHT_SEVENTH_LATITUDE {
                geometric_isha = Some(sunset + seconds(night_seconds / 7.0));
            }
            let safe_isha = if moonsighting {
                let minutes = season_adjusted_evening_twilight(
                    coordinates.latitude,
                    date.ordinal(),
                    date.year(),
                );
                sunset + seconds(minutes * 60.0)
            } else {
                sunset + seconds(portions.isha * night_seconds)
            };
            resolve_twilight(
                Prayer::Isha,
                geometric_isha,
                safe_isha,
                coordinates.latitude,
                TwilightBound::Latest,
            )
        };

        // Maghrib is sunset unless the method's angle places it between
        // sunset and Isha (Tehran)
        let mut maghrib = sunset;
        if let Some(angle) = parameters.maghrib_angle {
            if let Some(angle_based) = time_on(date, solar_time.hour_angle(-angle, true)) {
                if sunset < angle_based && angle_based < isha {
                    maghrib = angle_based;
                }
            }
        }

        let asr = time_on(
            date,
            solar_time.afternoon(parameters.madhab.shadow_length()),
        )
        .ok_or_else(unresolvable)?;

        let finalize = |time: DateTime<Utc>, user: i32, method: i32| {
            rounded_minute(time + Duration::minutes((user + method) as i64))
        };
        let adjustments = parameters.adjustments;
        let method_adjustments = parameters.method_adjustments;

        Ok(Self {
            fajr: finalize(fajr, adjustments.fajr, method_adjustments.fajr),
            sunrise: finalize(sunrise, adjustments.sunrise, method_adjustments.sunrise),
            dhuhr: finalize(transit, adjustments.dhuhr, method_adjustments.dhuhr),
            asr: finalize(asr, adjustments.asr, method_adjustments.asr),
            maghrib: finalize(maghrib, adjustments.maghrib, method_adjustments.maghrib),
            isha: finalize(isha, adjustments.isha, method_adjustments.isha),
            coordinates,
            date,
            parameters,
        })
    }

    /// Coordinates these times were computed for.
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Calendar date these times were computed for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The instant of a given prayer (or sunrise).
    pub fn time(&self, prayer: Prayer) -> DateTime<Utc> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// The prayer whose time most recently passed, or `None` before Fajr.
    ///
    /// Sunrise is not a prayer and never returned here.
    pub fn current_prayer(&self, at: DateTime<Utc>) -> Option<PrayerMoment> {
        Prayer::OBLIGATORY
            .iter()
            .rev()
            .find(|prayer| self.time(**prayer) <= at)
            .map(|prayer| PrayerMoment::new(*prayer, self.time(*prayer)))
    }

    /// The first prayer strictly after `at`.
    ///
    /// Once all five have passed, this recomputes tomorrow's Fajr for the
    /// same coordinates and parameters.
    pub fn next_prayer(&self, at: DateTime<Utc>) -> Result<PrayerMoment> {
        for prayer in Prayer::OBLIGATORY {
            let time = self.time(prayer);
            if time > at {
                return Ok(PrayerMoment::new(prayer, time));
            }
        }

        log::debug!(
            "all prayers passed at {}, rolling over to tomorrow's fajr",
            at
        );
        let tomorrow = self
            .date
            .succ_opt()
            .ok_or_else(|| Error::UnresolvableGeometry {
                latitude: self.coordinates.latitude,
                date: self.date,
            })?;
        let tomorrow_times = Self::with_parameters(self.coordinates, tomorrow, self.parameters)?;
        Ok(PrayerMoment::new(Prayer::Fajr, tomorrow_times.fajr))
    }
}

/// Non-negative time remaining until a prayer moment.
///
/// A pure snapshot: once `at` passes the moment this returns zero, and the
/// caller is expected to derive a fresh next prayer.
pub fn time_until(moment: &PrayerMoment, at: DateTime<Utc>) -> Duration {
    std::cmp::max(moment.time - at, Duration::zero())
}

enum TwilightBound {
    /// The safe time is a floor: the prayer may not fall earlier (Fajr).
    Earliest,
    /// The safe time is a ceiling: the prayer may not fall later (Isha).
    Latest,
}

/// Apply the high-latitude fallback policy to a geometric twilight time.
///
/// The safe night-window time is used when geometry gave no answer, or when
/// the observer is at or above [`HIGH_LATITUDE_THRESHOLD`] and the
/// geometric time escapes the window. Below the threshold a finite
/// geometric time is never altered.
fn resolve_twilight(
    prayer: Prayer,
    geometric: Option<DateTime<Utc>>,
    safe: DateTime<Utc>,
    latitude: f64,
    bound: TwilightBound,
) -> DateTime<Utc> {
    match geometric {
        None => {
            log::debug!(
                "{} twilight unattainable at latitude {}, using night-window fallback",
                prayer.name(),
                latitude
            );
            safe
        }
        Some(time) => {
            let escapes = match bound {
                TwilightBound::Earliest => time < safe,
                TwilightBound::Latest => time > safe,
            };
            if latitude.abs() >= HIGH_LATITUDE_THRESHOLD && escapes {
                log::debug!(
                    "{} at latitude {} clamped to the night-window fallback",
                    prayer.name(),
                    latitude
                );
                safe
            } else {
                time
            }
        }
    }
}

/// Instant on `date` at the given fractional hours UT, `None` for `NaN`.
fn time_on(date: NaiveDate, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() {
        return None;
    }
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64))
}

fn seconds(value: f64) -> Duration {
    Duration::seconds(value.round() as i64)
}

/// Round to the nearest whole minute.
fn rounded_minute(time: DateTime<Utc>) -> DateTime<Utc> {
    let timestamp = time.timestamp() as f64 + time.timestamp_subsec_millis() as f64 / 1_000.0;
    let rounded = (timestamp / 60.0).round() as i64 * 60;
    DateTime::from_timestamp(rounded, 0).unwrap_or(time)
}
