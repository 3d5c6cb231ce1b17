pub mod chassis;
#[macro_use]
pub mod motions;

pub mod pose {
    use nalgebra::{Vector2, Vector3};
    use num_traits::{AsPrimitive, Num};

    /// Planar field pose: position in inches, heading in degrees wrapped
    /// to [-180, 180).
    ///
    /// Headings are only ever combined through
    /// [`crate::utils::math::add_angles`].
    #[derive(Clone, Copy, PartialEq, Debug)]
    pub struct Pose {
        pub position: Vector2<f64>,
        pub heading: f64,
    }

    impl Pose {
        pub fn new<T: Num + AsPrimitive<f64>, U: Num + AsPrimitive<f64>, V: Num + AsPrimitive<f64>>(
            x: T,
            y: U,
            heading: V,
        ) -> Self {
            Self {
                position: Vector2::<f64>::new(x.as_(), y.as_()),
                heading: heading.as_(),
            }
        }

        pub fn x(&self) -> f64 {
            self.position.x
        }

        pub fn y(&self) -> f64 {
            self.position.y
        }

        pub fn distance_to(&self, pose: &Self) -> f64 {
            self.position.metric_distance(&pose.position)
        }
    }

    impl<T: AsPrimitive<f64>> From<Vector3<T>> for Pose {
        fn from(vector: Vector3<T>) -> Self {
            Pose::new(T::as_(vector[0]), T::as_(vector[1]), T::as_(vector[2]))
        }
    }

    impl<T: num_traits::FromPrimitive + core::default::Default> From<Pose> for Vector3<T> {
        fn from(pose: Pose) -> Self {
            Vector3::new(
                T::from_f64(pose.position.x).unwrap_or_default(),
                T::from_f64(pose.position.y).unwrap_or_default(),
                T::from_f64(pose.heading).unwrap_or_default(),
            )
        }
    }
}
