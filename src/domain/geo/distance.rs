use super::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points on a spherical Earth.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1.0 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Display label: meters below 1 km, one decimal below 10 km, whole km above.
pub fn format_distance(km: f64) -> String {
    let km = if km.is_finite() { km.max(0.0) } else { 0.0 };

    // Bands follow the rounded value: 0.9996 is "1.0km", 9.96 is "10km".
    let meters = (km * 1000.0).round();
    if meters < 1000.0 {
        return format!("{}m", meters as i64);
    }
    let tenths = (km * 10.0).round() / 10.0;
    if tenths < 10.0 {
        format!("{:.1}km", tenths)
    } else {
        format!("{}km", km.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: Coordinates = Coordinates {
        latitude: 48.8566,
        longitude: 2.3522,
    };
    const LONDON: Coordinates = Coordinates {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(PARIS, PARIS), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(PARIS, LONDON);
        let back = haversine_km(LONDON, PARIS);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn paris_london_is_about_344km() {
        let d = haversine_km(PARIS, LONDON);
        assert!((d - 343.5).abs() < 2.0, "got {}", d);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let d = haversine_km(a, b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn formats_distance_bands() {
        assert_eq!(format_distance(0.5), "500m");
        assert_eq!(format_distance(0.85), "850m");
        assert_eq!(format_distance(4.2), "4.2km");
        assert_eq!(format_distance(120.0), "120km");
        assert_eq!(format_distance(10.0), "10km");
        assert_eq!(format_distance(0.9996), "1.0km");
        assert_eq!(format_distance(0.9994), "999m");
        assert_eq!(format_distance(9.96), "10km");
        assert_eq!(format_distance(9.94), "9.9km");
    }

    #[test]
    fn formats_garbage_as_zero() {
        assert_eq!(format_distance(-3.0), "0m");
        assert_eq!(format_distance(f64::NAN), "0m");
    }
}
