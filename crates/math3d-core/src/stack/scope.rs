//! Scoped stack acquisition.
//!
//! A [`StackScope`] captures a mark on creation and restores it when dropped,
//! so every exit path of a multi-step computation (including `?` returns)
//! releases its intermediates.

use std::ops::{Deref, DerefMut};

use super::arena::{StackMark, ValueStack};

/// Guard that restores the stack to its creation mark on drop.
#[derive(Debug)]
pub struct StackScope<'a> {
    stack: &'a mut ValueStack,
    mark: StackMark,
}

impl<'a> StackScope<'a> {
    #[must_use]
    pub fn new(stack: &'a mut ValueStack) -> Self {
        let mark = stack.mark();
        StackScope { stack, mark }
    }

    /// Mark this scope restores to
    pub fn mark(&self) -> StackMark {
        self.mark
    }

    /// Values pushed since the scope opened
    pub fn scope_len(&self) -> usize {
        self.stack.len().saturating_sub(self.mark.depth())
    }
}

impl Deref for StackScope<'_> {
    type Target = ValueStack;

    fn deref(&self) -> &ValueStack {
        self.stack
    }
}

impl DerefMut for StackScope<'_> {
    fn deref_mut(&mut self) -> &mut ValueStack {
        self.stack
    }
}

impl Drop for StackScope<'_> {
    fn drop(&mut self) {
        // Fails only if the body already popped below the mark.
        let _ = self.stack.restore(self.mark);
    }
}

/// Run `f` under a scope; everything it pushes is popped on return.
pub fn with_scope<F, R>(stack: &mut ValueStack, f: F) -> R
where
    F: FnOnce(&mut StackScope<'_>) -> R,
{
    let mut scope = StackScope::new(stack);
    f(&mut scope)
}
