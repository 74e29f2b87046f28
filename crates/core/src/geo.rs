//! Coordinate handling and map-pin grouping.
//!
//! Creations saved without a resolvable real-world place fall back to
//! [`NULL_ISLAND`]. The map view collapses creations that round to the same
//! coordinate bucket into a single pin so overlapping markers never stack.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Decimal places used when bucketing coordinates into pins (~11 m).
pub const PIN_PRECISION: u32 = 4;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// The (0, 0) fallback used when no location can be derived.
pub const NULL_ISLAND: Coordinates = Coordinates { lat: 0.0, lng: 0.0 };

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether this is the [`NULL_ISLAND`] fallback.
    pub fn is_null_island(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }
}

/// Validate that coordinates are finite and within world bounds.
///
/// Latitude must be in [-90, 90] and longitude in [-180, 180].
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoreError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(CoreError::Validation(
            "coordinates must be finite numbers".into(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoreError::Validation(format!(
            "latitude {lat} out of range [-90, 90]"
        )));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoreError::Validation(format!(
            "longitude {lng} out of range [-180, 180]"
        )));
    }
    Ok(())
}

/// Round a coordinate component to [`PIN_PRECISION`] decimal places.
///
/// Uses half-away-from-zero rounding and normalises `-0.0` to `0.0` so both
/// signed zero buckets produce the same key component.
fn round_component(value: f64) -> f64 {
    let scale = 10f64.powi(PIN_PRECISION as i32);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Stable bucket key for a coordinate pair, e.g. `"48.8584,2.2945"`.
pub fn pin_key(lat: f64, lng: f64) -> String {
    let prec = PIN_PRECISION as usize;
    format!(
        "{:.prec$},{:.prec$}",
        round_component(lat),
        round_component(lng),
    )
}

/// One creation's contribution to the map, id plus its stored coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PinPoint {
    pub id: DbId,
    pub lat: f64,
    pub lng: f64,
}

/// A map pin covering every creation in one coordinate bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// Bucket key (rounded `"lat,lng"`).
    pub key: String,
    /// Exact coordinates of the bucket's first (newest) member.
    pub lat: f64,
    pub lng: f64,
    /// Number of creations in this bucket.
    pub count: usize,
    /// Member creation ids, in input order.
    pub creation_ids: Vec<DbId>,
}

/// Group points into pins by rounded coordinate key.
///
/// Input order is preserved both across pins (a pin appears where its first
/// member appeared) and within a pin's member list, so a newest-first input
/// yields newest-first pins.
pub fn group_pins(points: &[PinPoint]) -> Vec<Pin> {
    let mut pins: Vec<Pin> = Vec::new();

    for point in points {
        let key = pin_key(point.lat, point.lng);
        match pins.iter_mut().find(|p| p.key == key) {
            Some(pin) => {
                pin.count += 1;
                pin.creation_ids.push(point.id);
            }
            None => pins.push(Pin {
                key,
                lat: point.lat,
                lng: point.lng,
                count: 1,
                creation_ids: vec![point.id],
            }),
        }
    }

    pins
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Coordinate validation --

    #[test]
    fn validate_accepts_bounds() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(0.0, 0.0).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert!(validate_coordinates(90.0001, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
    }

    #[test]
    fn validate_rejects_non_finite() {
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    // -- Pin keys --

    #[test]
    fn pin_key_rounds_to_four_decimals() {
        assert_eq!(pin_key(48.858_37, 2.294_48), "48.8584,2.2945");
    }

    #[test]
    fn pin_key_pads_short_fractions() {
        assert_eq!(pin_key(10.0, -3.5), "10.0000,-3.5000");
    }

    #[test]
    fn pin_key_collapses_signed_zero() {
        // -0.00004 rounds to -0.0 which must share a bucket with 0.0.
        assert_eq!(pin_key(-0.000_04, 0.000_04), "0.0000,0.0000");
        assert_eq!(pin_key(0.0, 0.0), "0.0000,0.0000");
    }

    #[test]
    fn null_island_detection() {
        assert!(NULL_ISLAND.is_null_island());
        assert!(!Coordinates::new(0.0, 0.0001).is_null_island());
    }

    // -- Grouping --

    fn point(id: DbId, lat: f64, lng: f64) -> PinPoint {
        PinPoint { id, lat, lng }
    }

    #[test]
    fn groups_nearby_points_into_one_pin() {
        let pins = group_pins(&[
            point(3, 48.858_40, 2.294_50),
            point(2, 48.858_41, 2.294_52),
            point(1, 40.689_2, -74.044_5),
        ]);

        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].count, 2);
        assert_eq!(pins[0].creation_ids, vec![3, 2]);
        assert_eq!(pins[1].count, 1);
        assert_eq!(pins[1].creation_ids, vec![1]);
    }

    #[test]
    fn pin_uses_first_member_exact_coordinates() {
        let pins = group_pins(&[point(2, 48.858_40, 2.294_50), point(1, 48.858_41, 2.294_52)]);
        assert_eq!(pins[0].lat, 48.858_40);
        assert_eq!(pins[0].lng, 2.294_50);
    }

    #[test]
    fn distinct_buckets_stay_separate() {
        // 0.00006 rounds to 0.0001, a different bucket from 0.0.
        let pins = group_pins(&[point(1, 0.0, 0.0), point(2, 0.000_06, 0.0)]);
        assert_eq!(pins.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_pins() {
        assert!(group_pins(&[]).is_empty());
    }

    #[test]
    fn all_null_island_points_share_one_pin() {
        let pins = group_pins(&[point(1, 0.0, 0.0), point(2, 0.0, 0.0), point(3, 0.0, 0.0)]);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].count, 3);
    }
}
