use chrono::{DateTime, Utc};
use na::{Rotation3, Vector3};
use nav_types::{ECEF, WGS84};
use std::f64::consts::TAU;
use tletypes::prelude::Geodetic;

/// Advances an element set to an instant.
///
/// Implementations return `None` for malformed or numerically unstable
/// input instead of panicking.
pub trait Propagator: Send + Sync + 'static {
    fn propagate(&self, line1: &str, line2: &str, at: DateTime<Utc>) -> Option<Geodetic>;
}

impl<F> Propagator for F
where
    F: Fn(&str, &str, DateTime<Utc>) -> Option<Geodetic> + Send + Sync + 'static,
{
    fn propagate(&self, line1: &str, line2: &str, at: DateTime<Utc>) -> Option<Geodetic> {
        self(line1, line2, at)
    }
}

/// SGP4 propagation, TEME rotated into the Earth-fixed frame by GMST and
/// converted to WGS84.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(&self, line1: &str, line2: &str, at: DateTime<Utc>) -> Option<Geodetic> {
        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes()).ok()?;
        let constants = sgp4::Constants::from_elements(&elements).ok()?;
        let since_epoch = at.naive_utc() - elements.datetime;
        let minutes = since_epoch.num_milliseconds() as f64 / 60_000.0;
        let prediction = constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .ok()?;
        teme_to_geodetic(prediction.position, gmst(at))
    }
}

/// Greenwich mean sidereal time [rad], IAU 1982 model
pub fn gmst(at: DateTime<Utc>) -> f64 {
    const J2000_UNIX_SECONDS: f64 = 946_728_000.0;
    let t = (at.timestamp_millis() as f64 / 1000.0 - J2000_UNIX_SECONDS) / (86_400.0 * 36_525.0);
    let seconds = 67_310.548_41
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * t
        + 0.093_104 * t * t
        - 6.2e-6 * t * t * t;
    (seconds / 240.0).to_radians().rem_euclid(TAU)
}

fn teme_to_geodetic(teme_km: [f64; 3], gmst: f64) -> Option<Geodetic> {
    let r = Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst) * Vector3::from(teme_km);
    let ecef = ECEF::new(r.x * 1000.0, r.y * 1000.0, r.z * 1000.0);
    let wgs = WGS84::from(ecef);
    let g = Geodetic {
        lat: wgs.latitude_degrees(),
        lon: wgs.longitude_degrees(),
        height_km: wgs.altitude() / 1000.0,
    };
    g.is_finite().then_some(g)
}
