/// `45 min`, `1h 5m`.
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round() as i64;
    if minutes < 60 {
        return format!("{minutes} min");
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// `850 m`, `2.3 km`.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{} m", meters.round() as i64);
    }
    format!("{:.1} km", meters / 1000.0)
}
