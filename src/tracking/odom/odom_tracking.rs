use alloc::rc::Rc;
use core::cell::RefCell;

use bon::Builder;
use log::{debug, trace};
use nalgebra::{Rotation2, Vector2};
use num_traits::Float;

use super::odom_wheels::DeadWheel;
use crate::{
    devices::AbsolutePoseSource, holonomic::pose::Pose, tracking::Tracking,
    utils::math::add_angles,
};

/// Calibration for the three-dead-wheel odometry.
#[derive(Clone, Copy, PartialEq, Builder)]
pub struct OdomSettings {
    /// Heading change per tick of left/right wheel difference.
    #[builder(default = 2.36e-3)]
    pub degrees_per_tick: f64,

    /// Travel in inches per encoder tick.
    #[builder(default = 2.92e-3)]
    pub inches_per_tick: f64,

    #[builder(default = 0.9897)]
    pub heading_correction: f64,

    #[builder(default = 1.0466)]
    pub strafe_correction: f64,

    #[builder(default = 0.9962)]
    pub forward_correction: f64,
}

/// Dead-reckoning pose estimator over two parallel dead wheels and one
/// perpendicular one, with an optional absolute-pose overwrite.
pub struct DeadWheelTracking {
    left: DeadWheel,
    right: DeadWheel,
    center: DeadWheel,
    absolute: Option<Rc<RefCell<dyn AbsolutePoseSource>>>,
    settings: OdomSettings,

    pose: Pose,
    previous_left: i32,
    previous_right: i32,
    previous_center: i32,
}

impl DeadWheelTracking {
    pub fn new(
        left: DeadWheel,
        right: DeadWheel,
        center: DeadWheel,
        settings: OdomSettings,
        start: Pose,
    ) -> Self {
        // Prime the previous counts from the live encoders so the first
        // update sees no phantom travel.
        let previous_left = left.ticks();
        let previous_right = right.ticks();
        let previous_center = center.ticks();
        Self {
            left,
            right,
            center,
            absolute: None,
            settings,
            pose: Pose::new(start.x(), start.y(), add_angles(start.heading, 0.0)),
            previous_left,
            previous_right,
            previous_center,
        }
    }

    /// Attaches an absolute-pose provider, polled at the end of every
    /// update. A fix overwrites the dead-reckoned pose outright.
    pub fn with_absolute_source(mut self, source: Rc<RefCell<dyn AbsolutePoseSource>>) -> Self {
        self.absolute = Some(source);
        self
    }

    /// Raw signed dead-wheel counts for telemetry, in left, right, center
    /// order.
    pub fn wheel_ticks(&self) -> [i32; 3] {
        [self.left.ticks(), self.right.ticks(), self.center.ticks()]
    }
}

impl Tracking for DeadWheelTracking {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = Pose::new(pose.x(), pose.y(), add_angles(pose.heading, 0.0));
    }

    fn update(&mut self) {
        let current_left = self.left.ticks();
        let current_right = self.right.ticks();
        let current_center = self.center.ticks();

        let delta_left = current_left - self.previous_left;
        let delta_right = current_right - self.previous_right;
        let delta_center = current_center - self.previous_center;

        let delta_heading = f64::from(delta_right - delta_left)
            * self.settings.degrees_per_tick
            * self.settings.heading_correction;
        self.pose.heading = add_angles(self.pose.heading, delta_heading);

        let delta_strafe =
            f64::from(delta_center) * self.settings.inches_per_tick * self.settings.strafe_correction;
        let delta_forward = f64::from(delta_left + delta_right)
            * 0.5
            * self.settings.inches_per_tick
            * self.settings.forward_correction;

        // Local displacement rotated into the field frame with the updated
        // heading; -90 is the field frame's heading convention.
        self.pose.position += Rotation2::new((self.pose.heading - 90.0).to_radians())
            * Vector2::new(delta_strafe, delta_forward);

        self.previous_left = current_left;
        self.previous_right = current_right;
        self.previous_center = current_center;

        trace!(
            "dead-reckoned ({:.2}, {:.2}) @ {:.2} deg",
            self.pose.x(),
            self.pose.y(),
            self.pose.heading
        );

        let fix = self
            .absolute
            .as_ref()
            .and_then(|source| source.borrow().pose_fix());
        if let Some(fix) = fix {
            debug!(
                "absolute fix ({:.2}, {:.2}) @ {:.2} deg overwrites dead reckoning",
                fix.x(),
                fix.y(),
                fix.heading
            );
            self.set_pose(fix);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use approx::assert_relative_eq;

    use super::*;
    use crate::devices::sim::{SimEncoder, SimPoseSource};

    struct Rig {
        tracking: DeadWheelTracking,
        left: Rc<RefCell<SimEncoder>>,
        right: Rc<RefCell<SimEncoder>>,
        center: Rc<RefCell<SimEncoder>>,
    }

    fn rig(start: Pose) -> Rig {
        let left = Rc::new(RefCell::new(SimEncoder::default()));
        let right = Rc::new(RefCell::new(SimEncoder::default()));
        let center = Rc::new(RefCell::new(SimEncoder::default()));
        let tracking = DeadWheelTracking::new(
            DeadWheel::new(left.clone()),
            DeadWheel::new(right.clone()),
            DeadWheel::new(center.clone()),
            OdomSettings::builder()
                .degrees_per_tick(0.002)
                .inches_per_tick(0.003)
                .heading_correction(1.0)
                .strafe_correction(1.0)
                .forward_correction(1.0)
                .build(),
            start,
        );
        Rig {
            tracking,
            left,
            right,
            center,
        }
    }

    #[test]
    fn zero_deltas_leave_pose_unchanged() {
        let mut rig = rig(Pose::new(12.5, -3.25, 47.0));
        let before = rig.tracking.pose();
        rig.tracking.update();
        rig.tracking.update();
        assert_eq!(rig.tracking.pose(), before);
    }

    #[test]
    fn forward_rolls_along_the_heading() {
        let mut rig = rig(Pose::new(0.0, 0.0, 90.0));
        rig.left.borrow_mut().ticks = 1000;
        rig.right.borrow_mut().ticks = 1000;
        rig.tracking.update();

        let pose = rig.tracking.pose();
        // Facing 90 degrees, forward travel is +y.
        assert_relative_eq!(pose.y(), 2000.0 * 0.5 * 0.003, max_relative = 1e-12);
        assert_relative_eq!(pose.x(), 0.0, epsilon = 1e-12);
        assert_eq!(pose.heading, 90.0);
    }

    #[test]
    fn strafe_moves_perpendicular_to_the_heading() {
        let mut rig = rig(Pose::new(0.0, 0.0, 90.0));
        rig.center.borrow_mut().ticks = 1000;
        rig.tracking.update();

        let pose = rig.tracking.pose();
        assert_relative_eq!(pose.x(), 1000.0 * 0.003, max_relative = 1e-12);
        assert_relative_eq!(pose.y(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn differential_ticks_spin_in_place() {
        let mut rig = rig(Pose::new(5.0, 5.0, 0.0));
        rig.left.borrow_mut().ticks = -500;
        rig.right.borrow_mut().ticks = 500;
        rig.tracking.update();

        let pose = rig.tracking.pose();
        assert_relative_eq!(pose.heading, 1000.0 * 0.002, max_relative = 1e-12);
        assert_relative_eq!(pose.x(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(pose.y(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn heading_wraps_through_the_boundary() {
        let mut rig = rig(Pose::new(0.0, 0.0, 179.5));
        rig.left.borrow_mut().ticks = -500;
        rig.right.borrow_mut().ticks = 500;
        rig.tracking.update();

        let heading = rig.tracking.pose().heading;
        assert!((-180.0..180.0).contains(&heading));
        assert_relative_eq!(heading, 179.5 + 2.0 - 360.0, max_relative = 1e-9);
    }

    #[test]
    fn updates_integrate_across_cycles() {
        let mut rig = rig(Pose::new(0.0, 0.0, 90.0));
        rig.left.borrow_mut().ticks = 500;
        rig.right.borrow_mut().ticks = 500;
        rig.tracking.update();
        rig.left.borrow_mut().ticks = 1000;
        rig.right.borrow_mut().ticks = 1000;
        rig.tracking.update();

        // Two half-steps land where one full step would.
        assert_relative_eq!(rig.tracking.pose().y(), 3.0, max_relative = 1e-12);
    }

    #[test]
    fn absolute_fix_overwrites_dead_reckoning() {
        let left = Rc::new(RefCell::new(SimEncoder::default()));
        let right = Rc::new(RefCell::new(SimEncoder::default()));
        let center = Rc::new(RefCell::new(SimEncoder::default()));
        let source = Rc::new(RefCell::new(SimPoseSource::default()));
        let mut tracking = DeadWheelTracking::new(
            DeadWheel::new(left.clone()),
            DeadWheel::new(right.clone()),
            DeadWheel::new(center),
            OdomSettings::builder().build(),
            Pose::new(0.0, 0.0, 90.0),
        )
        .with_absolute_source(source.clone());

        // No fix: dead reckoning stands.
        left.borrow_mut().ticks = 200;
        right.borrow_mut().ticks = 200;
        tracking.update();
        assert!(tracking.pose().y() > 0.0);

        // A fix wins outright, heading normalized on the way in.
        source.borrow_mut().fix = Some(Pose::new(24.0, -30.0, 270.0));
        tracking.update();
        assert_eq!(tracking.pose(), Pose::new(24.0, -30.0, -90.0));

        // Fix gone: dead reckoning resumes from the overwrite.
        source.borrow_mut().fix = None;
        tracking.update();
        assert_eq!(tracking.pose(), Pose::new(24.0, -30.0, -90.0));
    }

    #[test]
    fn construction_primes_previous_counts() {
        let left = Rc::new(RefCell::new(SimEncoder { ticks: 700 }));
        let right = Rc::new(RefCell::new(SimEncoder { ticks: -300 }));
        let center = Rc::new(RefCell::new(SimEncoder { ticks: 50 }));
        let mut tracking = DeadWheelTracking::new(
            DeadWheel::new(left),
            DeadWheel::new(right),
            DeadWheel::new(center),
            OdomSettings::builder().build(),
            Pose::new(1.0, 2.0, 0.0),
        );
        assert_eq!(tracking.wheel_ticks(), [700, -300, 50]);
        tracking.update();
        assert_eq!(tracking.pose(), Pose::new(1.0, 2.0, 0.0));
    }
}
