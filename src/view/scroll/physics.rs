/// Critically damped approach of `current` toward `target`.
///
/// `velocity` carries state between frames. `smooth_time` is roughly the time
/// it takes to cover most of the distance. The result never passes `target`.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        *velocity = 0.0;
        return target;
    }
    output
}

/// Resistance applied to a drag that has left the scrollable range: the
/// further past the edge, the less the content follows.
pub fn rubber_band(overstretch: f32, view_size: f32) -> f32 {
    if view_size <= 0.0 {
        return 0.0;
    }
    let magnitude = (1.0 - 1.0 / (overstretch.abs() * 0.55 / view_size + 1.0)) * view_size;
    magnitude.copysign(overstretch)
}
