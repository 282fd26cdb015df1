use chrono::{DateTime, Duration, Utc};

const EARTH_RADIUS_KM: f64 = 6371.0;

// Great circle distance between two (lat, lon) points in degrees, in km.
// Inputs outside the normal coordinate ranges are accepted as-is.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn estimate_travel_time(distance_km: f64, avg_speed_kmh: f64) -> Duration {
    let seconds = distance_km / avg_speed_kmh * 3600.0;
    Duration::milliseconds((seconds * 1000.0).round() as i64)
}

// Half-open intervals [s1,e1) vs [s2,e2). Zero-length intervals never overlap.
pub fn intervals_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

// Round trip to the job plus the on-site interval must fit the shift budget.
// The budget is deliberately wider than a nominal 8h shift to absorb long jobs.
pub fn fits_in_shift(
    distance_km: f64,
    job_start: DateTime<Utc>,
    job_end: DateTime<Utc>,
    avg_speed_kmh: f64,
    shift_budget_hours: f64,
) -> bool {
    let travel_one_way = estimate_travel_time(distance_km, avg_speed_kmh);
    let on_site = job_end - job_start;
    let total = travel_one_way + on_site + travel_one_way;
    total <= Duration::milliseconds((shift_budget_hours * 3_600_000.0).round() as i64)
}
