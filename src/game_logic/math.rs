use std::f32::consts::PI;

pub fn limit(value: f32, min: f32, max: f32) -> f32 {
    min.max(value.min(max))
}

pub fn accelerate(v: f32, accel: f32, dt: f32) -> f32 {
    v + accel * dt
}

/// Fraction of the way through the current `total`-sized interval
pub fn percent_remaining(n: f32, total: f32) -> f32 {
    (n % total) / total
}

pub fn interpolate(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent
}

pub fn ease_in(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * percent.powi(2)
}

pub fn ease_out(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * (1.0 - (1.0 - percent).powi(2))
}

pub fn ease_in_out(a: f32, b: f32, percent: f32) -> f32 {
    a + (b - a) * (-(percent * PI).cos() / 2.0 + 0.5)
}

/// 1.0 at the camera, falling off with the square of the distance ratio
pub fn exponential_fog(distance: f32, density: f32) -> f32 {
    1.0 / std::f32::consts::E.powf(distance * distance * density)
}

/// Advance along a circular track of length `max`, result in `[0, max)`
pub fn increase(start: f32, increment: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return start + increment;
    }
    let result = (start + increment).rem_euclid(max);
    // rem_euclid can round up to exactly `max` for tiny negative inputs
    if result >= max { 0.0 } else { result }
}

/// True if two centered intervals, widths scaled by `percent`, intersect
pub fn overlap(x1: f32, w1: f32, x2: f32, w2: f32, percent: f32) -> bool {
    let half = percent / 2.0;
    let min1 = x1 - w1 * half;
    let max1 = x1 + w1 * half;
    let min2 = x2 - w2 * half;
    let max2 = x2 + w2 * half;
    !(max1 < min2 || min1 > max2)
}
