use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_MILES: f64 = 3959.0;
pub const MILES_PER_DEGREE_LATITUDE: f64 = 69.0;
/// Two places closer than this (~300 ft) are treated as the same location.
pub const SAME_LOCATION_THRESHOLD_MILES: f64 = 0.05;

const MILES_PER_KM: f64 = 0.621_371;
const METERS_PER_MILE: f64 = 1609.344;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle distance in miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

pub fn is_same_location(a: Coordinates, b: Coordinates) -> bool {
    haversine_miles(a, b) < SAME_LOCATION_THRESHOLD_MILES
}

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    /// Degrees-per-mile approximation. Always a superset of the circle, so
    /// callers post-filter with [`haversine_miles`].
    pub fn around(center: Coordinates, radius_miles: f64) -> Self {
        let lat_delta = radius_miles / MILES_PER_DEGREE_LATITUDE;
        // cos() approaches zero at the poles; cap the divisor so the box stays finite
        let lng_scale = center.latitude.to_radians().cos().abs().max(0.01);
        let lng_delta = (radius_miles / (MILES_PER_DEGREE_LATITUDE * lng_scale)).min(180.0);

        Self {
            min_latitude: (center.latitude - lat_delta).max(-90.0),
            max_latitude: (center.latitude + lat_delta).min(90.0),
            min_longitude: (center.longitude - lng_delta).max(-180.0),
            max_longitude: (center.longitude + lng_delta).min(180.0),
        }
    }
}
