//! Stateless physics checks.
//!
//! Each check is a pure function from one measurement to one `CheckResult`.
//! Checks are independent and order-insensitive.

pub mod gravity;
pub mod material;
pub mod momentum;
pub mod pendulum;
pub mod projectile;
pub mod shadow;

pub use gravity::{check_gravity, evaluate_gravity, gravity_confidence};
pub use material::check_material;
pub use momentum::check_momentum;
pub use pendulum::{check_pendulum, pendulum_gravity};
pub use projectile::{check_projectile, expected_height, expected_range};
pub use shadow::{check_shadow, variance};

use veritas_models::{CheckKind, CheckResult};

use crate::error::PhysicsError;

/// Degrade a physics error into the result the check reports.
pub(crate) fn degrade(check: CheckKind, err: &PhysicsError) -> CheckResult {
    let mut result = CheckResult::error(check, err.to_string());
    result.status = err.status();
    result
}
