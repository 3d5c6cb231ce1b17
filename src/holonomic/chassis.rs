use alloc::rc::Rc;
use core::cell::RefCell;

use bon::Builder;
use log::info;
use num_traits::Float;

use super::{motions::spline::FieldLayout, pose::Pose};
use crate::{
    controllers::{heading::HeadingHold, ControllerMethod},
    devices::{drive_motors::DriveMotors, WheelPidf},
    tracking::Tracking,
    utils::{
        math::{add_angles, clip},
        Alliance,
    },
};

/// Velocity commands for the four wheels, already scaled to the maximum
/// spin speed. Output-only.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WheelVelocities {
    pub back_left: f64,
    pub back_right: f64,
    pub front_left: f64,
    pub front_right: f64,
}

#[derive(Clone, Copy, PartialEq, Builder)]
pub struct DriveSettings {
    /// Couples translation and rotation authority: at full commanded turn
    /// the available forward power shrinks toward this limit.
    #[builder(default = 0.9)]
    pub overall_governor: f64,

    #[builder(default = 0.6)]
    pub manual_turning_governor: f64,

    /// Wheel velocity, in encoder ticks per second, commanded by a power
    /// of 1.0.
    #[builder(default = 2800.0)]
    pub max_spin_speed: f64,
}

#[derive(Clone, Copy, PartialEq, Builder)]
pub struct HeadingSettings {
    #[builder(default = 0.02)]
    pub kp: f64,

    /// Dead-band in degrees; heading errors inside it produce no turn.
    #[builder(default = 0.5)]
    pub tolerance: f64,

    #[builder(default = 0.35)]
    pub auto_turning_governor: f64,
}

/// One cycle's worth of driving intent. Transient; build one per cycle
/// and hand it to [`Chassis::apply`].
#[derive(Clone, Copy, PartialEq, Builder)]
pub struct DriveCommand {
    #[builder(default = 0.0)]
    pub power: f64,

    /// Commanded drive direction in degrees.
    #[builder(default = 0.0)]
    pub angle: f64,

    #[builder(default = 0.0)]
    pub turn: f64,

    #[builder(default = false)]
    pub auto_align: bool,

    #[builder(default = true)]
    pub field_oriented: bool,
}

#[macro_export]
macro_rules! drive_command {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::holonomic::chassis::DriveCommand::builder()
            $(.$key($value))*
            .build()
    };
}
pub use drive_command;

pub struct Chassis<T: Tracking> {
    pub(crate) drivetrain: Rc<DriveMotors>,
    pub(super) tracking: Rc<RefCell<T>>,
    pub(super) settings: DriveSettings,
    pub(super) field_layout: FieldLayout,
    pub(super) alliance: Alliance,
    heading_hold: RefCell<HeadingHold<f64>>,
    desired_heading: RefCell<f64>,
}

impl<T: Tracking> Chassis<T> {
    pub fn new(
        drivetrain: Rc<DriveMotors>,
        tracking: Rc<RefCell<T>>,
        settings: DriveSettings,
        heading: HeadingSettings,
        field_layout: FieldLayout,
        wheel_pidf: WheelPidf,
        alliance: Alliance,
    ) -> Self {
        drivetrain.apply_pidf(&wheel_pidf);
        let start = tracking.borrow().pose();
        info!(
            "chassis up: {:?} alliance, start ({:.1}, {:.1}) @ {:.1} deg",
            alliance,
            start.x(),
            start.y(),
            start.heading
        );
        Self {
            drivetrain,
            tracking,
            settings,
            field_layout,
            alliance,
            heading_hold: RefCell::new(HeadingHold::new(
                heading.kp,
                heading.tolerance,
                heading.auto_turning_governor,
            )),
            desired_heading: RefCell::new(start.heading),
        }
    }

    /// Runs one tracking update. Call once per control cycle, before
    /// anything heading-relative reads the pose.
    pub fn update(&self) {
        self.tracking.borrow_mut().update();
    }

    pub fn pose(&self) -> Pose {
        self.tracking.borrow().pose()
    }

    /// Typed handle to the tracking component, e.g. for dead-wheel
    /// telemetry.
    pub fn tracking(&self) -> Rc<RefCell<T>> {
        self.tracking.clone()
    }

    pub fn set_pose(&self, pose: Pose) {
        self.tracking.borrow_mut().set_pose(pose);
    }

    /// Current heading on the field coordinate system, degrees in
    /// [-180, 180).
    pub fn field_heading(&self) -> f64 {
        self.pose().heading
    }

    /// Sets the heading to auto-align to. Takes effect on the next
    /// evaluation.
    pub fn set_desired_heading(&self, desired_heading: f64) {
        *self.desired_heading.borrow_mut() = add_angles(desired_heading, 0.0);
    }

    pub fn desired_heading(&self) -> f64 {
        *self.desired_heading.borrow()
    }

    /// Governed turn command that spins the robot toward the desired
    /// heading.
    pub fn turn_to_angle(&self) -> f64 {
        let error = add_angles(self.field_heading(), -self.desired_heading());
        self.heading_hold.borrow_mut().update(error)
    }

    /// The holonomic mixer.
    ///
    /// Resolves the turn command (heading hold when auto-aligning
    /// field-oriented, governed manual input otherwise), governs power
    /// against the remaining turn authority, then decomposes the commanded
    /// direction onto the two ±45° wheel-pair axes. Field-oriented
    /// commands are first translated into the robot frame; the +90° term
    /// is the field frame's heading convention.
    pub fn wheel_velocities(
        &self,
        power: f64,
        angle: f64,
        turn: f64,
        auto_align: bool,
        field_oriented: bool,
    ) -> WheelVelocities {
        let turn = if auto_align && field_oriented {
            self.turn_to_angle()
        } else {
            clip(
                turn,
                -self.settings.manual_turning_governor,
                self.settings.manual_turning_governor,
            )
        };

        let power = clip(
            power,
            turn - self.settings.overall_governor,
            self.settings.overall_governor - turn,
        );

        let (corner1, corner2) = if field_oriented {
            let heading = self.field_heading();
            (
                power * add_angles(angle, -45.0 + 90.0 - heading).to_radians().sin(),
                power * add_angles(angle, 45.0 + 90.0 - heading).to_radians().sin(),
            )
        } else {
            (
                power * add_angles(angle, -45.0).to_radians().sin(),
                power * add_angles(angle, 45.0).to_radians().sin(),
            )
        };

        let max_spin_speed = self.settings.max_spin_speed;
        WheelVelocities {
            back_left: (corner1 + turn) * max_spin_speed,
            back_right: (corner2 - turn) * max_spin_speed,
            front_left: (corner2 + turn) * max_spin_speed,
            front_right: (corner1 - turn) * max_spin_speed,
        }
    }

    /// Mixes one drive cycle and dispatches it to the wheel motors.
    pub fn drive(&self, power: f64, angle: f64, turn: f64, auto_align: bool, field_oriented: bool) {
        let velocities = self.wheel_velocities(power, angle, turn, auto_align, field_oriented);
        self.drivetrain.set_velocities(
            velocities.back_left,
            velocities.back_right,
            velocities.front_left,
            velocities.front_right,
        );
    }

    pub fn apply(&self, command: DriveCommand) {
        self.drive(
            command.power,
            command.angle,
            command.turn,
            command.auto_align,
            command.field_oriented,
        );
    }

    /// Tuning helper: spins all four wheels at the same power.
    pub fn spin_all(&self, power: f64) {
        let power = clip(power, -1.0, 1.0);
        self.drivetrain
            .set_velocity_all(power * self.settings.max_spin_speed);
    }

    /// Wheel encoder positions for telemetry, in wheel order.
    pub fn motor_positions(&self) -> [f64; 4] {
        self.drivetrain.positions()
    }

    /// Wheel velocities for telemetry, in wheel order.
    pub fn motor_velocities(&self) -> [f64; 4] {
        self.drivetrain.velocities()
    }
}
