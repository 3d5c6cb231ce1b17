pub mod drive_motors;

use bon::Builder;

use crate::holonomic::pose::Pose;

/// Velocity-loop gains forwarded verbatim to a drive motor's onboard
/// controller. The velocity loop itself runs in the motor controller, not
/// in this crate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PidfGains {
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub f: f64,
}

/// Per-wheel velocity PIDF gains, applied once at chassis construction.
#[derive(Clone, Copy, PartialEq, Builder)]
pub struct WheelPidf {
    #[builder(default = PidfGains { p: 10.5, i: 3.1, d: 0.0, f: 12.2 })]
    pub back_left: PidfGains,

    #[builder(default = PidfGains { p: 10.2, i: 3.0, d: 0.0, f: 12.0 })]
    pub back_right: PidfGains,

    #[builder(default = PidfGains { p: 10.0, i: 3.0, d: 0.0, f: 11.9 })]
    pub front_left: PidfGains,

    #[builder(default = PidfGains { p: 10.4, i: 3.2, d: 0.0, f: 12.1 })]
    pub front_right: PidfGains,
}

/// A drive wheel's motor, injected by the embedding robot program.
///
/// Velocity commands are in the same units as the configured maximum spin
/// speed (encoder ticks per second). Reads are assumed well-formed; faults
/// are the hardware adapter's concern.
pub trait DriveMotor {
    fn set_velocity(&mut self, velocity: f64);
    fn set_velocity_pidf(&mut self, gains: PidfGains);
    fn velocity(&self) -> f64;
    fn position(&self) -> f64;
}

/// An incremental odometry encoder.
///
/// Counts are monotonic per physical rotation direction and reset to zero
/// only at subsystem initialization.
pub trait QuadratureEncoder {
    fn ticks(&self) -> i32;
}

/// An external absolute-pose provider, e.g. a fiducial-vision pipeline.
/// Returns `None` when there is no fix this cycle.
pub trait AbsolutePoseSource {
    fn pose_fix(&self) -> Option<Pose>;
}

#[cfg(test)]
pub mod sim {
    use super::{AbsolutePoseSource, DriveMotor, PidfGains, QuadratureEncoder};
    use crate::holonomic::pose::Pose;

    #[derive(Default)]
    pub struct SimMotor {
        pub commanded_velocity: f64,
        pub pidf: Option<PidfGains>,
        pub position: f64,
    }

    impl DriveMotor for SimMotor {
        fn set_velocity(&mut self, velocity: f64) {
            self.commanded_velocity = velocity;
        }
        fn set_velocity_pidf(&mut self, gains: PidfGains) {
            self.pidf = Some(gains);
        }
        fn velocity(&self) -> f64 {
            self.commanded_velocity
        }
        fn position(&self) -> f64 {
            self.position
        }
    }

    #[derive(Default)]
    pub struct SimEncoder {
        pub ticks: i32,
    }

    impl QuadratureEncoder for SimEncoder {
        fn ticks(&self) -> i32 {
            self.ticks
        }
    }

    #[derive(Default)]
    pub struct SimPoseSource {
        pub fix: Option<Pose>,
    }

    impl AbsolutePoseSource for SimPoseSource {
        fn pose_fix(&self) -> Option<Pose> {
            self.fix
        }
    }
}
