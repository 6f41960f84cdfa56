//! salatsync-core — prayer time calculation engine.
//!
//! A pure, deterministic library with three cooperating parts:
//!
//! * **Parameter resolution** ([`Parameters::resolve`]) maps a named
//!   calculation method, madhab, and high-latitude rule plus optional
//!   per-prayer minute adjustments to concrete solar angles and offsets.
//! * **Calculation** ([`PrayerTimes::new`]) solves the solar-position
//!   equations for one coordinate and date, yielding Fajr, Sunrise, Dhuhr,
//!   Asr, Maghrib, and Isha as UTC instants.
//! * **State evaluation** ([`PrayerTimes::current_prayer`],
//!   [`PrayerTimes::next_prayer`], [`time_until`]) answers "which prayer is
//!   current, which is next, and how long until it" for a point in time,
//!   rolling over to tomorrow's Fajr at the same location once all five
//!   prayers have passed.
//!
//! Every entry point is a pure function of its arguments: no I/O, no
//! ambient state, and identical inputs give identical outputs, so calls are
//! safe from any number of threads.
//!
//! ```
//! use chrono::NaiveDate;
//! use salatsync_core::{CalculationMethod, Coordinates, PrayerTimeSettings, PrayerTimes};
//!
//! let mecca = Coordinates::new(21.4225, 39.8262)?;
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let settings = PrayerTimeSettings::with_method(CalculationMethod::UmmAlQura);
//!
//! let times = PrayerTimes::new(mecca, date, &settings)?;
//! assert!(times.fajr < times.sunrise && times.maghrib < times.isha);
//! # Ok::<(), salatsync_core::Error>(())
//! ```

mod astronomical;
mod error;
mod parameters;
mod prayer_times;
mod settings;
mod types;

pub use error::{Error, Result};
pub use parameters::{NightPortions, Parameters, TimeAdjustments};
pub use prayer_times::{time_until, PrayerTimes, HIGH_LATITUDE_THRESHOLD};
pub use settings::{
    CalculationMethod, HighLatitudeRule, Madhab, PrayerAdjustments, PrayerTimeSettings,
};
pub use types::{Coordinates, Prayer, PrayerMoment};
