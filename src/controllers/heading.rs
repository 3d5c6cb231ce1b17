use num_traits::{Float, FromPrimitive};

use super::ControllerMethod;
use crate::utils::math::clip;

/// Proportional heading-hold controller with a dead-band.
///
/// Output is recomputed fresh each cycle and always governed, so there is
/// no integral state and nothing to wind up.
pub struct HeadingHold<T: Float + FromPrimitive> {
    gains: HeadingGains<T>,
}

pub struct HeadingGains<T: Float + FromPrimitive> {
    kp: T,        // Proportional gain
    tolerance: T, // Dead-band in degrees; errors inside it produce no turn
    governor: T,  // Hard limit on the turn command magnitude
}

impl<T: Float + FromPrimitive> HeadingHold<T> {
    pub fn new(kp: T, tolerance: T, governor: T) -> Self {
        HeadingHold {
            gains: HeadingGains {
                kp,
                tolerance,
                governor,
            },
        }
    }
}

impl<T: Float + FromPrimitive> ControllerMethod<T> for HeadingHold<T> {
    fn update(&mut self, error: T) -> T {
        if error.abs() >= self.gains.tolerance {
            clip(
                error * self.gains.kp,
                -self.gains.governor,
                self.gains.governor,
            )
        } else {
            T::zero()
        }
    }

    fn reset(&mut self) {}
}
