//! Solar position astronomy.
//!
//! Meeus-style solar coordinates (declination, right ascension, apparent
//! sidereal time) and the interpolated transit / hour-angle solutions that
//! convert a sun-altitude condition into a fraction of the civil day.
//! Everything here works in `f64` hours and degrees; an unattainable
//! altitude surfaces as `NaN` and is left to the caller to resolve, in the
//! same spirit as the NaN-propagating angular math elsewhere in the stack.

use chrono::{Datelike, NaiveDate};

use crate::types::Coordinates;

/// Altitude of the solar disc's center at sunrise/sunset, accounting for
/// refraction and the disc's apparent radius.
pub(crate) const SOLAR_ALTITUDE: f64 = -50.0 / 60.0;

/// Julian day for a civil date with fractional hours UT.
pub(crate) fn julian_day(year: i32, month: u32, day: u32, hours: f64) -> f64 {
    let (y, m) = if month > 2 {
        (year, month as i32)
    } else {
        (year - 1, month as i32 + 12)
    };
    let a = y / 100;
    let b = 2 - a + a / 4;

    let i0 = (365.25 * (y as f64 + 4716.0)).floor();
    let i1 = (30.6001 * (m as f64 + 1.0)).floor();
    i0 + i1 + day as f64 + hours / 24.0 + b as f64 - 1524.5
}

/// Julian centuries since J2000.
fn julian_century(julian_day: f64) -> f64 {
    (julian_day - 2_451_545.0) / 36_525.0
}

/// Normalize an angle to [0, 360).
fn unwind_angle(angle: f64) -> f64 {
    angle - 360.0 * (angle / 360.0).floor()
}

/// Normalize a value to [0, max).
fn normalized_to_scale(value: f64, max: f64) -> f64 {
    value - max * (value / max).floor()
}

/// Shift an angle into (-180, 180].
fn quadrant_shift_angle(angle: f64) -> f64 {
    if (-180.0..=180.0).contains(&angle) {
        angle
    } else {
        angle - 360.0 * (angle / 360.0).round()
    }
}

fn mean_solar_longitude(t: f64) -> f64 {
    unwind_angle(280.466_456_7 + 36_000.769_83 * t + 0.000_303_2 * t * t)
}

fn mean_lunar_longitude(t: f64) -> f64 {
    unwind_angle(218.316_5 + 481_267.881_3 * t)
}

fn ascending_lunar_node_longitude(t: f64) -> f64 {
    unwind_angle(125.044_52 - 1_934.136_261 * t + 0.002_070_8 * t * t + t * t * t / 450_000.0)
}

fn mean_solar_anomaly(t: f64) -> f64 {
    unwind_angle(357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t)
}

fn solar_equation_of_the_center(t: f64, mean_anomaly: f64) -> f64 {
    let m = mean_anomaly.to_radians();
    (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin()
}

fn apparent_solar_longitude(t: f64, mean_longitude: f64) -> f64 {
    let longitude = mean_longitude + solar_equation_of_the_center(t, mean_solar_anomaly(t));
    let omega = (125.04 - 1_934.136 * t).to_radians();
    unwind_angle(longitude - 0.005_69 - 0.004_78 * omega.sin())
}

fn mean_obliquity_of_the_ecliptic(t: f64) -> f64 {
    23.439_291 - 0.013_004_167 * t - 0.000_000_163_9 * t * t + 0.000_000_503_6 * t * t * t
}

fn apparent_obliquity_of_the_ecliptic(t: f64, mean_obliquity: f64) -> f64 {
    let o = (125.04 - 1_934.136 * t).to_radians();
    mean_obliquity + 0.002_56 * o.cos()
}

fn mean_sidereal_time(t: f64) -> f64 {
    let jd = t * 36_525.0 + 2_451_545.0;
    unwind_angle(
        280.460_618_37
            + 360.985_647_366_29 * (jd - 2_451_545.0)
            + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

fn nutation_in_longitude(solar_longitude: f64, lunar_longitude: f64, ascending_node: f64) -> f64 {
    let l0 = (2.0 * solar_longitude).to_radians();
    let lp = (2.0 * lunar_longitude).to_radians();
    let omega = ascending_node.to_radians();
    -17.2 / 3_600.0 * omega.sin() - 1.32 / 3_600.0 * l0.sin() - 0.23 / 3_600.0 * lp.sin()
        + 0.21 / 3_600.0 * (2.0 * omega).sin()
}

fn nutation_in_obliquity(solar_longitude: f64, lunar_longitude: f64, ascending_node: f64) -> f64 {
    let l0 = (2.0 * solar_longitude).to_radians();
    let lp = (2.0 * lunar_longitude).to_radians();
    let omega = ascending_node.to_radians();
    9.2 / 3_600.0 * omega.cos()
        + 0.57 / 3_600.0 * l0.cos()
        + 0.10 / 3_600.0 * lp.cos()
        - 0.09 / 3_600.0 * (2.0 * omega).cos()
}

/// Altitude of a body at hour angle `h`, all in degrees.
fn altitude_of_celestial_body(observer_latitude: f64, declination: f64, local_hour_angle: f64) -> f64 {
    let phi = observer_latitude.to_radians();
    let delta = declination.to_radians();
    let h = local_hour_angle.to_radians();
    (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos())
        .asin()
        .to_degrees()
}

/// Three-point interpolation for a smoothly varying value.
fn interpolate(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = y2 - y1;
    let b = y3 - y2;
    let c = b - a;
    y2 + n / 2.0 * (a + b + n * c)
}

/// Three-point interpolation for angles, unwinding the day-to-day deltas.
fn interpolate_angles(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = unwind_angle(y2 - y1);
    let b = unwind_angle(y3 - y2);
    let c = b - a;
    y2 + n / 2.0 * (a + b + n * c)
}

/// Approximate transit of the sun as a fraction of the day.
fn approximate_transit(longitude: f64, sidereal_time: f64, right_ascension: f64) -> f64 {
    let lw = -longitude;
    normalized_to_scale((right_ascension + lw - sidereal_time) / 360.0, 1.0)
}

/// Solar position for one Julian day.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SolarCoordinates {
    /// Declination of the sun, degrees.
    pub declination: f64,
    /// Right ascension of the sun, degrees in [0, 360).
    pub right_ascension: f64,
    /// Apparent sidereal time at Greenwich, degrees.
    pub apparent_sidereal_time: f64,
}

impl SolarCoordinates {
    pub(crate) fn new(julian_day: f64) -> Self {
        let t = julian_century(julian_day);
        let l0 = mean_solar_longitude(t);
        let lp = mean_lunar_longitude(t);
        let omega = ascending_lunar_node_longitude(t);
        let lambda = apparent_solar_longitude(t, l0).to_radians();

        let theta0 = mean_sidereal_time(t);
        let d_psi = nutation_in_longitude(l0, lp, omega);
        let d_epsilon = nutation_in_obliquity(l0, lp, omega);

        let epsilon0 = mean_obliquity_of_the_ecliptic(t);
        let epsilon_apparent = apparent_obliquity_of_the_ecliptic(t, epsilon0).to_radians();

        let declination = (epsilon_apparent.sin() * lambda.sin()).asin().to_degrees();
        let right_ascension = unwind_angle(
            (epsilon_apparent.cos() * lambda.sin())
                .atan2(lambda.cos())
                .to_degrees(),
        );
        let apparent_sidereal_time =
            theta0 + d_psi * ((epsilon0 + d_epsilon).to_radians()).cos();

        Self {
            declination,
            right_ascension,
            apparent_sidereal_time,
        }
    }
}

/// Solved solar events for one date and observer, as fractional hours UT.
///
/// `transit`, `sunrise`, and `sunset` are `NaN` when the sun never crosses
/// the corresponding altitude that day (polar day or night).
#[derive(Debug, Clone, Copy)]
pub(crate) struct SolarTime {
    pub transit: f64,
    pub sunrise: f64,
    pub sunset: f64,
    observer: Coordinates,
    solar: SolarCoordinates,
    prev_solar: SolarCoordinates,
    next_solar: SolarCoordinates,
    approx_transit: f64,
}

impl SolarTime {
    pub(crate) fn new(date: NaiveDate, observer: Coordinates) -> Self {
        let jd = julian_day(date.year(), date.month(), date.day(), 0.0);
        let solar = SolarCoordinates::new(jd);
        let prev_solar = SolarCoordinates::new(jd - 1.0);
        let next_solar = SolarCoordinates::new(jd + 1.0);

        let approx_transit = approximate_transit(
            observer.longitude,
            solar.apparent_sidereal_time,
            solar.right_ascension,
        );

        let mut solar_time = Self {
            transit: f64::NAN,
            sunrise: f64::NAN,
            sunset: f64::NAN,
            observer,
            solar,
            prev_solar,
            next_solar,
            approx_transit,
        };
        solar_time.transit = solar_time.corrected_transit();
        solar_time.sunrise = solar_time.hour_angle(SOLAR_ALTITUDE, false);
        solar_time.sunset = solar_time.hour_angle(SOLAR_ALTITUDE, true);
        solar_time
    }

    /// Hour of day (UT) at which the sun reaches `angle` degrees of
    /// altitude, before or after transit. `NaN` when unattainable.
    pub(crate) fn hour_angle(&self, angle: f64, after_transit: bool) -> f64 {
        let coordinates = self.observer;
        let lw = -coordinates.longitude;

        let term1 = angle.to_radians().sin()
            - coordinates.latitude.to_radians().sin() * self.solar.declination.to_radians().sin();
        let term2 = coordinates.latitude.to_radians().cos()
            * self.solar.declination.to_radians().cos();
        // acos outside [-1, 1] yields NaN, which propagates to the result
        let h0 = (term1 / term2).acos().to_degrees();

        let m = if after_transit {
            self.approx_transit + h0 / 360.0
        } else {
            self.approx_transit - h0 / 360.0
        };
        let theta = unwind_angle(self.solar.apparent_sidereal_time + 360.985_647 * m);
        let a = interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            m,
        );
        let delta = interpolate(
            self.solar.declination,
            self.prev_solar.declination,
            self.next_solar.declination,
            m,
        );
        let h = theta - lw - a;
        let altitude = altitude_of_celestial_body(coordinates.latitude, delta, h);

        let term3 = altitude - angle;
        let term4 = 360.0
            * delta.to_radians().cos()
            * coordinates.latitude.to_radians().cos()
            * h.to_radians().sin();
        let dm = term3 / term4;

        (m + dm) * 24.0
    }

    /// Hour of day (UT) of the Asr condition: shadow of an object equals
    /// `shadow_length` times its height plus the noon shadow.
    pub(crate) fn afternoon(&self, shadow_length: f64) -> f64 {
        let tangent = (self.observer.latitude - self.solar.declination).abs();
        let inverse = shadow_length + tangent.to_radians().tan();
        let angle = (1.0 / inverse).atan().to_degrees();
        self.hour_angle(angle, true)
    }

    fn corrected_transit(&self) -> f64 {
        let lw = -self.observer.longitude;
        let theta = unwind_angle(
            self.solar.apparent_sidereal_time + 360.985_647 * self.approx_transit,
        );
        let a = unwind_angle(interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            self.approx_transit,
        ));
        let h = quadrant_shift_angle(theta - lw - a);
        let dm = h / -360.0;
        (self.approx_transit + dm) * 24.0
    }
}

/// Days elapsed since the last solstice that precedes the "twilight year"
/// used by the Moonsighting Committee seasonal tables.
pub(crate) fn days_since_solstice(day_of_year: u32, year: i32, latitude: f64) -> u32 {
    let is_leap = NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.leap_year())
        .unwrap_or(false);
    let days_in_year: i64 = if is_leap { 366 } else { 365 };

    let days = if latitude >= 0.0 {
        let d = day_of_year as i64 + 10;
        if d >= days_in_year {
            d - days_in_year
        } else {
            d
        }
    } else {
        let southern_offset: i64 = if is_leap { 173 } else { 172 };
        let d = day_of_year as i64 - southern_offset;
        if d < 0 {
            d + days_in_year
        } else {
            d
        }
    };
    days as u32
}

fn season_adjusted_twilight(a: f64, b: f64, c: f64, d: f64, dyy: u32) -> f64 {
    let dyy = dyy as f64;
    if dyy < 91.0 {
        a + (b - a) / 91.0 * dyy
    } else if dyy < 137.0 {
        b + (c - b) / 46.0 * (dyy - 91.0)
    } else if dyy < 183.0 {
        c + (d - c) / 46.0 * (dyy - 137.0)
    } else if dyy < 229.0 {
        d + (c - d) / 46.0 * (dyy - 183.0)
    } else if dyy < 275.0 {
        c + (b - c) / 46.0 * (dyy - 229.0)
    } else {
        b + (a - b) / 91.0 * (dyy - 275.0)
    }
}

/// Moonsighting Committee seasonal morning twilight: minutes before sunrise.
pub(crate) fn season_adjusted_morning_twilight(latitude: f64, day_of_year: u32, year: i32) -> f64 {
    let abs_lat = latitude.abs();
    let a = 75.0 + 28.65 / 55.0 * abs_lat;
    let b = 75.0 + 19.44 / 55.0 * abs_lat;
    let c = 75.0 + 32.74 / 55.0 * abs_lat;
    let d = 75.0 + 48.10 / 55.0 * abs_lat;
    let dyy = days_since_solstice(day_of_year, year, latitude);
    season_adjusted_twilight(a, b, c, d, dyy)
}

/// Moonsighting Committee seasonal evening twilight: minutes after sunset.
pub(crate) fn season_adjusted_evening_twilight(latitude: f64, day_of_year: u32, year: i32) -> f64 {
    let abs_lat = latitude.abs();
    let a = 75.0 + 25.60 / 55.0 * abs_lat;
    let b = 75.0 + 2.05 / 55.0 * abs_lat;
    let c = 75.0 - 9.21 / 55.0 * abs_lat;
    let d = 75.0 + 6.14 / 55.0 * abs_lat;
    let dyy = days_since_solstice(day_of_year, year, latitude);
    season_adjusted_twilight(a, b, c, d, dyy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid_latitude_observer() -> Coordinates {
        Coordinates::new(35.0, 0.0).expect("valid coordinates")
    }

    #[test]
    fn test_declination_near_solstices_and_equinox() {
        // June solstice 2024-06-20
        let jd = julian_day(2024, 6, 20, 12.0);
        let solar = SolarCoordinates::new(jd);
        assert!(
            (solar.declination - 23.43).abs() < 0.2,
            "June solstice declination should be near +23.43, got {}",
            solar.declination
        );

        // December solstice 2024-12-21
        let jd = julian_day(2024, 12, 21, 12.0);
        let solar = SolarCoordinates::new(jd);
        assert!(
            (solar.declination + 23.43).abs() < 0.2,
            "December solstice declination should be near -23.43, got {}",
            solar.declination
        );

        // March equinox 2024-03-20
        let jd = julian_day(2024, 3, 20, 12.0);
        let solar = SolarCoordinates::new(jd);
        assert!(
            solar.declination.abs() < 0.5,
            "Equinox declination should be near 0, got {}",
            solar.declination
        );
    }

    #[test]
    fn test_julian_day_reference_values() {
        // J2000.0 epoch: 2000-01-01 12:00 UT
        assert!((julian_day(2000, 1, 1, 12.0) - 2_451_545.0).abs() < 1e-9);
        // Meeus example 7.a: 1957-10-04.81
        assert!((julian_day(1957, 10, 4, 0.81 * 24.0) - 2_436_116.31).abs() < 1e-6);
    }

    #[test]
    fn test_transit_near_noon_at_greenwich() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let solar_time = SolarTime::new(date, mid_latitude_observer());
        // Equation of time never exceeds ~17 minutes
        assert!(
            (solar_time.transit - 12.0).abs() < 0.3,
            "Transit at longitude 0 should be near 12h UT, got {}",
            solar_time.transit
        );
    }

    #[test]
    fn test_sunrise_before_transit_before_sunset() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let solar_time = SolarTime::new(date, mid_latitude_observer());
        assert!(solar_time.sunrise < solar_time.transit);
        assert!(solar_time.transit < solar_time.sunset);
        // Mid-June day length at 35N is roughly 14.4 hours
        let day_length = solar_time.sunset - solar_time.sunrise;
        assert!(
            (13.5..15.5).contains(&day_length),
            "Unexpected day length: {}",
            day_length
        );
    }

    #[test]
    fn test_polar_day_yields_nan_sunrise() {
        // Longyearbyen in mid-summer: continuous daylight
        let observer = Coordinates::new(78.22, 15.64).expect("valid coordinates");
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let solar_time = SolarTime::new(date, observer);
        assert!(solar_time.sunrise.is_nan());
        assert!(solar_time.sunset.is_nan());
        assert!(!solar_time.transit.is_nan());
    }

    #[test]
    fn test_twilight_angle_unattainable_is_nan_while_sunrise_resolves() {
        // Reykjavik mid-summer: the sun sets briefly, but never reaches 18 below
        let observer = Coordinates::new(64.1, -21.9).expect("valid coordinates");
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let solar_time = SolarTime::new(date, observer);
        assert!(!solar_time.sunrise.is_nan());
        assert!(!solar_time.sunset.is_nan());
        assert!(solar_time.hour_angle(-18.0, false).is_nan());
        assert!(solar_time.hour_angle(-18.0, true).is_nan());
    }

    #[test]
    fn test_hanafi_afternoon_is_later() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let solar_time = SolarTime::new(date, mid_latitude_observer());
        let shafi = solar_time.afternoon(1.0);
        let hanafi = solar_time.afternoon(2.0);
        assert!(
            hanafi > shafi,
            "Hanafi Asr ({}) should fall after Shafi Asr ({})",
            hanafi,
            shafi
        );
    }

    #[test]
    fn test_days_since_solstice_wraps_at_year_end() {
        // Northern hemisphere: Dec 21 of a 365-day year maps to day 0
        assert_eq!(days_since_solstice(355, 2023, 45.0), 0);
        assert_eq!(days_since_solstice(1, 2023, 45.0), 11);
        // Southern hemisphere counts from the June solstice
        assert_eq!(days_since_solstice(172, 2023, -45.0), 0);
        assert_eq!(days_since_solstice(100, 2023, -45.0), 293);
    }

    #[test]
    fn test_seasonal_twilight_is_continuous_at_segment_edges() {
        for dyy in [90, 91, 136, 137, 182, 183, 228, 229, 274, 275] {
            let before = season_adjusted_twilight(80.0, 85.0, 90.0, 95.0, dyy);
            let after = season_adjusted_twilight(80.0, 85.0, 90.0, 95.0, dyy + 1);
            assert!(
                (before - after).abs() < 1.0,
                "Discontinuity at dyy={}: {} vs {}",
                dyy,
                before,
                after
            );
        }
    }
}
