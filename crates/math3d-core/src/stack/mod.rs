pub mod arena;
pub mod scope;

pub use arena::{StackMark, StackOffset, ValueStack};
pub use scope::{with_scope, StackScope};
