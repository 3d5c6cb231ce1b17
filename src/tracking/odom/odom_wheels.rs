use alloc::rc::Rc;
use core::cell::RefCell;

use crate::devices::QuadratureEncoder;

/// One dead wheel's encoder handle plus its mounting direction.
pub struct DeadWheel {
    encoder: Rc<RefCell<dyn QuadratureEncoder>>,
    reversed: bool,
}

impl DeadWheel {
    pub fn new(encoder: Rc<RefCell<dyn QuadratureEncoder>>) -> Self {
        Self {
            encoder,
            reversed: false,
        }
    }

    /// A dead wheel whose encoder counts down when the wheel rolls
    /// forward.
    pub fn reversed(encoder: Rc<RefCell<dyn QuadratureEncoder>>) -> Self {
        Self {
            encoder,
            reversed: true,
        }
    }

    /// Signed tick count with the mounting direction applied.
    pub fn ticks(&self) -> i32 {
        let raw = self.encoder.borrow().ticks();
        if self.reversed {
            -raw
        } else {
            raw
        }
    }
}
