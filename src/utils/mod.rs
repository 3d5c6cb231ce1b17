#[macro_use]
pub mod math;

/// Fixes the sign conventions for all alliance-relative field coordinates.
/// Immutable after chassis construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Alliance {
    Red,
    Blue,
}
