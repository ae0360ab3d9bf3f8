//! math3d - Core Library
//!
//! Linear algebra for real-time graphics over a typed value stack.
//!
//! Kernel results are pushed onto a [`ValueStack`] arena instead of being
//! heap-allocated one by one. Values that must outlive the stack's LIFO
//! lifetime are promoted into a reference-counted [`RefTable`].

pub mod boxstack;
pub mod config;
pub mod error;
pub mod kernel;
pub mod refs;
pub mod stack;
pub mod types;

// Re-export commonly used types
pub use boxstack::{BoxStack, Operand, SharedRefTable};
pub use config::{DepthRange, StackConfig};
pub use error::{MathError, MathResult};
pub use kernel::ViewVolume;
pub use refs::{RefId, RefTable};
pub use stack::{with_scope, StackMark, StackOffset, StackScope, ValueStack};
pub use types::{LinearType, LinearValue};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{matrix, quat};

    #[test]
    fn srt_then_mul_h_moves_origin() {
        let mut bs = BoxStack::default();
        let m = kernel::make_srt(bs.stack_mut(), &[2.0; 3], &quat::IDENTITY, &[1.0, 0.0, 0.0])
            .expect("make_srt failed");
        let m = bs.load(&Operand::Stack(m)).expect("load failed");
        let m = *m.as_matrix().expect("not a matrix");

        kernel::mul_h(bs.stack_mut(), &m, &[0.0, 0.0, 0.0, 1.0]).expect("mul_h failed");
        let (tag, data) = bs.stack().top().expect("empty stack");
        assert_eq!(tag, LinearType::Vector4);
        assert_eq!(data, &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn decompose_pushes_in_documented_order() {
        let mut stack = ValueStack::default();
        let m = matrix::srt(&[1.0, 2.0, 3.0], &quat::IDENTITY, &[4.0, 5.0, 6.0]);
        let [s, r, t] = kernel::decompose_matrix(&mut stack, &m).expect("decompose failed");

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.get(s).unwrap().0, LinearType::Vector3);
        assert_eq!(stack.get(r).unwrap().0, LinearType::Quaternion);
        assert_eq!(stack.value(t).unwrap(), LinearValue::Vector3([4.0, 5.0, 6.0]));
        assert_eq!(stack.top_offset().unwrap(), t);
    }

    #[test]
    fn promote_survives_restore() {
        let mut bs = BoxStack::default();
        let mark = bs.stack().mark();
        kernel::cross(bs.stack_mut(), &[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).expect("cross failed");
        let id = bs.promote_top().expect("promote failed");
        bs.stack_mut().restore(mark).expect("restore failed");

        assert!(bs.stack().is_empty());
        assert_eq!(
            bs.refs().borrow().value(id).expect("handle lost"),
            LinearValue::Vector3([0.0, 0.0, 1.0])
        );
    }
}
