use itertools::Itertools;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of a polyline given as `(latitude, longitude)` pairs, in kilometers.
pub fn path_length<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    points
        .into_iter()
        .tuple_windows()
        .map(|((lat_1, lon_1), (lat_2, lon_2))| {
            haversine_distance(lat_1, lon_1, lat_2, lon_2)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let distance = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((distance - 111.19).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn identical_points_have_no_distance() {
        assert_eq!(haversine_distance(43.45, -80.49, 43.45, -80.49), 0.0);
    }

    #[test]
    fn path_length_sums_segments() {
        let total = path_length([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let single = haversine_distance(0.0, 0.0, 2.0, 0.0);
        assert!((total - single).abs() < 1e-9);
    }

    #[test]
    fn path_length_of_short_paths_is_zero() {
        assert_eq!(path_length(Vec::<(f64, f64)>::new()), 0.0);
        assert_eq!(path_length([(10.0, 10.0)]), 0.0);
    }
}
