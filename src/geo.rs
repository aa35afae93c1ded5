//! Great-circle distance on the WGS84-as-sphere approximation.

/// Earth radius in kilometers, matching the constant used for all
/// distance values exposed by the API.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two (lat, lon) points in kilometers.
///
/// Inputs are degrees. Out-of-range coordinates are not validated here;
/// callers own that contract. Pure and deterministic.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round to two decimal places. Used for the distance attached to records;
/// radius tests and sort keys use the value as computed.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
