#[macro_use]
pub mod spline;
