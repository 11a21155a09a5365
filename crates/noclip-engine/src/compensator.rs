//! Compensator - final bounded override

/// Shorten `new_lock` by `reduction`, pad it with the simulated delay and
/// clamp to `[0, new_lock]`. The result never lengthens the authority's lock.
pub fn compensate(new_lock: f32, reduction: f32, simulated_delay: f32) -> f32 {
    (new_lock - reduction.max(0.0) + simulated_delay).clamp(0.0, new_lock)
}
