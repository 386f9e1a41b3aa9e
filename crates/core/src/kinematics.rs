//! Motion of a banner crossing the surface right to left.
//!
//! A banner starts with its leading edge on the right boundary and is
//! gone once its trailing edge passes the left boundary, so it travels
//! `container_width + object_width` in the configured crossing time.

/// Speed (distance per second) of a banner of `object_width` crossing a
/// surface of `container_width` in `cross_secs` seconds.
pub fn velocity(container_width: f64, object_width: f64, cross_secs: f64) -> f64 {
    (container_width + object_width) / cross_secs
}

/// Distance travelled after `elapsed` seconds at `velocity`.
pub fn distance_covered(velocity: f64, elapsed: f64) -> f64 {
    velocity * elapsed
}

/// X position of the banner's leading (left) edge at `now`.
pub fn leading_edge(now: f64, inserted_at: f64, container_width: f64, velocity: f64) -> f64 {
    container_width - distance_covered(velocity, now - inserted_at)
}

/// X position of the banner's trailing (right) edge at `now`.
pub fn trailing_edge(
    now: f64,
    inserted_at: f64,
    container_width: f64,
    object_width: f64,
    velocity: f64,
) -> f64 {
    leading_edge(now, inserted_at, container_width, velocity) + object_width
}
