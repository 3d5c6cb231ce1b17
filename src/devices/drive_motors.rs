use alloc::rc::Rc;
use core::cell::RefCell;

use super::{DriveMotor, WheelPidf};

/// The four wheel motors of the holonomic drivetrain, in the fixed
/// physical order back-left, back-right, front-left, front-right.
pub struct DriveMotors {
    back_left: Rc<RefCell<dyn DriveMotor>>,
    back_right: Rc<RefCell<dyn DriveMotor>>,
    front_left: Rc<RefCell<dyn DriveMotor>>,
    front_right: Rc<RefCell<dyn DriveMotor>>,
}

impl DriveMotors {
    pub fn new(
        back_left: Rc<RefCell<dyn DriveMotor>>,
        back_right: Rc<RefCell<dyn DriveMotor>>,
        front_left: Rc<RefCell<dyn DriveMotor>>,
        front_right: Rc<RefCell<dyn DriveMotor>>,
    ) -> Self {
        Self {
            back_left,
            back_right,
            front_left,
            front_right,
        }
    }

    pub fn set_velocities(
        &self,
        back_left: f64,
        back_right: f64,
        front_left: f64,
        front_right: f64,
    ) {
        self.back_left.borrow_mut().set_velocity(back_left);
        self.back_right.borrow_mut().set_velocity(back_right);
        self.front_left.borrow_mut().set_velocity(front_left);
        self.front_right.borrow_mut().set_velocity(front_right);
    }

    pub fn set_velocity_all(&self, velocity: f64) {
        self.set_velocities(velocity, velocity, velocity, velocity);
    }

    pub fn apply_pidf(&self, gains: &WheelPidf) {
        self.back_left
            .borrow_mut()
            .set_velocity_pidf(gains.back_left);
        self.back_right
            .borrow_mut()
            .set_velocity_pidf(gains.back_right);
        self.front_left
            .borrow_mut()
            .set_velocity_pidf(gains.front_left);
        self.front_right
            .borrow_mut()
            .set_velocity_pidf(gains.front_right);
    }

    /// Wheel encoder positions for telemetry, in wheel order.
    pub fn positions(&self) -> [f64; 4] {
        [
            self.back_left.borrow().position(),
            self.back_right.borrow().position(),
            self.front_left.borrow().position(),
            self.front_right.borrow().position(),
        ]
    }

    /// Wheel velocities for telemetry, in wheel order.
    pub fn velocities(&self) -> [f64; 4] {
        [
            self.back_left.borrow().velocity(),
            self.back_right.borrow().velocity(),
            self.front_left.borrow().velocity(),
            self.front_right.borrow().velocity(),
        ]
    }
}
