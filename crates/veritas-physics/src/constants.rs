//! Fixed physical constants and tolerances.

/// Reference gravitational acceleration on Earth, m/s².
pub const EARTH_GRAVITY: f64 = 9.81;

/// Allowed absolute error on measured gravity, m/s².
pub const GRAVITY_TOLERANCE: f64 = 1.5;

/// Allowed relative change in total momentum.
pub const MOMENTUM_RELATIVE_TOLERANCE: f64 = 0.10;

/// Allowed absolute change in total momentum when the initial momentum is zero.
pub const MOMENTUM_ABSOLUTE_TOLERANCE: f64 = 0.1;

/// Allowed variance of shadow angles, degrees².
pub const SHADOW_VARIANCE_TOLERANCE: f64 = 15.0;

/// Minimum shadow samples for a variance to mean anything.
pub const SHADOW_MIN_SAMPLES: usize = 2;

/// Allowed relative error on projectile apex height and range.
pub const PROJECTILE_RELATIVE_TOLERANCE: f64 = 0.15;

/// Minimum trajectory samples for a three-parameter fit.
pub const FIT_MIN_SAMPLES: usize = 3;
