use bon::Builder;
use nalgebra::Vector2;
use num_traits::Float;

use crate::{
    holonomic::chassis::Chassis,
    tracking::Tracking,
    utils::{
        math::{add_angles, clip},
        Alliance,
    },
};

/// Fixed field landmarks and the spline approach gain.
///
/// The two waypoint x-thresholds split the field into the curved-approach
/// regions and the straight final segment; Y landmarks are
/// alliance-mirrored. Landmark ordering is
/// `scoring_x < left_waypoint_x < right_waypoint_x < intake_x`.
#[derive(Clone, Copy, PartialEq, Builder)]
pub struct FieldLayout {
    #[builder(default = 56.0)]
    pub intake_x: f64,

    #[builder(default = 47.5)]
    pub blue_intake_y: f64,

    #[builder(default = -47.5)]
    pub red_intake_y: f64,

    #[builder(default = -42.0)]
    pub scoring_x: f64,

    #[builder(default = 36.0)]
    pub blue_scoring_y: f64,

    #[builder(default = -36.0)]
    pub red_scoring_y: f64,

    #[builder(default = -18.0)]
    pub left_waypoint_x: f64,

    #[builder(default = 18.0)]
    pub right_waypoint_x: f64,

    #[builder(default = 12.0)]
    pub blue_waypoint_y: f64,

    #[builder(default = -12.0)]
    pub red_waypoint_y: f64,

    /// Power per inch of remaining distance, before the [-1, 1] clip.
    #[builder(default = 0.03)]
    pub approach_gain: f64,
}

impl FieldLayout {
    pub fn intake_y(&self, alliance: Alliance) -> f64 {
        match alliance {
            Alliance::Blue => self.blue_intake_y,
            Alliance::Red => self.red_intake_y,
        }
    }

    pub fn scoring_y(&self, alliance: Alliance) -> f64 {
        match alliance {
            Alliance::Blue => self.blue_scoring_y,
            Alliance::Red => self.red_scoring_y,
        }
    }

    pub fn waypoint_y(&self, alliance: Alliance) -> f64 {
        match alliance {
            Alliance::Blue => self.blue_waypoint_y,
            Alliance::Red => self.red_waypoint_y,
        }
    }
}

#[macro_export]
macro_rules! field_layout {
    (
        $($key:ident : $value:expr),* $(,)?
    ) => {
        $crate::holonomic::motions::spline::FieldLayout::builder()
            $(.$key($value))*
            .build()
    };
}
pub use field_layout;

impl<T: Tracking> Chassis<T> {
    /// Steers toward the alliance intake landmark along the parabolic
    /// approach path, with power proportional to the remaining distance.
    pub fn spline_to_intake(&self, turn: f64, auto_align: bool) {
        let pose = self.pose();
        let field = self.field_layout;
        let intake_y = field.intake_y(self.alliance);
        let waypoint_y = field.waypoint_y(self.alliance);

        let target = Vector2::new(field.intake_x, intake_y);
        let power = clip(
            field.approach_gain * pose.position.metric_distance(&target),
            -1.0,
            1.0,
        );

        let angle = if pose.x() <= field.left_waypoint_x {
            self.angle_to_vertex(field.left_waypoint_x, waypoint_y, true)
        } else if pose.x() <= field.right_waypoint_x {
            self.angle_to_vertex(field.right_waypoint_x, waypoint_y, true)
        } else {
            self.angle_from_vertex(field.intake_x, intake_y, field.right_waypoint_x, true)
        };

        self.drive(power, angle, turn, auto_align, true);
    }

    /// Steers toward the alliance scoring landmark along the mirrored
    /// approach path.
    pub fn spline_to_scoring(&self, turn: f64, auto_align: bool) {
        let pose = self.pose();
        let field = self.field_layout;
        let scoring_y = field.scoring_y(self.alliance);
        let waypoint_y = field.waypoint_y(self.alliance);

        let target = Vector2::new(field.scoring_x, scoring_y);
        let power = clip(
            field.approach_gain * pose.position.metric_distance(&target),
            -1.0,
            1.0,
        );

        let angle = if pose.x() >= field.right_waypoint_x {
            self.angle_to_vertex(field.right_waypoint_x, waypoint_y, false)
        } else if pose.x() >= field.left_waypoint_x {
            self.angle_to_vertex(field.left_waypoint_x, waypoint_y, false)
        } else {
            self.angle_from_vertex(field.scoring_x, scoring_y, field.left_waypoint_x, false)
        };

        self.drive(power, angle, turn, auto_align, true);
    }

    /// Drive angle along a parabola whose vertex is the target waypoint
    /// and which passes through the robot's current position.
    ///
    /// The non-degenerate result is the tangent direction toward the
    /// vertex; with the robot on the vertex's x-line the tangent is
    /// undefined and the direction convention decides.
    pub fn angle_to_vertex(&self, target_x: f64, target_y: f64, to_intake: bool) -> f64 {
        let pose = self.pose();

        if pose.x() == target_x {
            return if to_intake { 0.0 } else { -180.0 };
        }

        let angle = (2.0 * (target_y - pose.y()))
            .atan2(target_x - pose.x())
            .to_degrees();
        add_angles(angle, 0.0)
    }

    /// Drive angle along a parabola through the robot and the target whose
    /// vertex is pinned to the previous waypoint's x-coordinate.
    ///
    /// Solves for the vertex y that puts both points on the parabola, then
    /// takes the tangent direction at the robot. The sentinel branches
    /// keep the singular cases (robot on the vertex line, robot and target
    /// equidistant from it) from dividing by zero.
    pub fn angle_from_vertex(
        &self,
        target_x: f64,
        target_y: f64,
        vertex_x: f64,
        to_intake: bool,
    ) -> f64 {
        let pose = self.pose();
        let robot_diff = (pose.x() - vertex_x).powi(2);
        let target_diff = (target_x - vertex_x).powi(2);

        if pose.x() == vertex_x {
            return if to_intake { 0.0 } else { -180.0 };
        }
        if robot_diff == target_diff {
            return if pose.y() > target_y { -90.0 } else { 90.0 };
        }

        let vertex_y =
            (target_y * robot_diff - pose.y() * target_diff) / (robot_diff - target_diff);
        let angle = (2.0 * (pose.y() - vertex_y))
            .atan2(pose.x() - vertex_x)
            .to_degrees();

        // TODO: validate the past-target flip direction against field runs;
        // it only sees the straight final segment in the two shipped paths.
        if pose.x() < target_x {
            add_angles(angle, 0.0)
        } else {
            add_angles(angle, -180.0)
        }
    }
}
