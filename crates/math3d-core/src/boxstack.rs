//! Stack Instance
//!
//! Binds one value stack to a configuration and a handle table. One
//! instance serves one host execution context; the handle table may be shared
//! with other instances on the same thread.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{DepthRange, StackConfig};
use crate::error::MathResult;
use crate::kernel::projection::{self, ViewVolume};
use crate::refs::{RefId, RefTable};
use crate::stack::{StackOffset, ValueStack};
use crate::types::LinearValue;

/// Handle table shared between stack instances of one thread
pub type SharedRefTable = Rc<RefCell<RefTable>>;

/// Where a kernel input comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    /// A live value on this instance's stack
    Stack(StackOffset),
    /// A promoted handle
    Ref(RefId),
    /// A caller-owned value
    Value(LinearValue),
}

/// A value stack bound to its handle table
#[derive(Debug)]
pub struct BoxStack {
    config: StackConfig,
    stack: ValueStack,
    refs: SharedRefTable,
}

impl BoxStack {
    /// Create an instance with a private handle table
    pub fn new(config: StackConfig) -> Self {
        Self::with_refs(config, Rc::new(RefCell::new(RefTable::new())))
    }

    /// Create an instance promoting into a shared handle table
    pub fn with_refs(config: StackConfig, refs: SharedRefTable) -> Self {
        BoxStack {
            stack: ValueStack::new(&config),
            config,
            refs,
        }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn depth_range(&self) -> DepthRange {
        self.config.depth_range
    }

    pub fn stack(&self) -> &ValueStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut ValueStack {
        &mut self.stack
    }

    /// Another owner of this instance's handle table
    pub fn refs(&self) -> SharedRefTable {
        Rc::clone(&self.refs)
    }

    /// Resolve an operand to an owned value
    pub fn load(&self, operand: &Operand) -> MathResult<LinearValue> {
        match operand {
            Operand::Stack(offset) => self.stack.value(*offset),
            Operand::Ref(id) => self.refs.borrow().value(*id),
            Operand::Value(value) => Ok(*value),
        }
    }

    /// Copy the stack value at `offset` into the handle table
    pub fn promote(&self, offset: StackOffset) -> MathResult<RefId> {
        let value = self.stack.value(offset)?;
        Ok(self.refs.borrow_mut().promote_value(value))
    }

    /// Copy the top stack value into the handle table
    pub fn promote_top(&self) -> MathResult<RefId> {
        let offset = self.stack.top_offset()?;
        self.promote(offset)
    }

    pub fn retain(&self, id: RefId) -> MathResult<u32> {
        self.refs.borrow_mut().retain(id)
    }

    pub fn release(&self, id: RefId) -> MathResult<u32> {
        self.refs.borrow_mut().release(id)
    }

    /// Push a copy of a handle's value
    pub fn push_ref(&mut self, id: RefId) -> MathResult<StackOffset> {
        let value = self.refs.borrow().value(id)?;
        self.stack.push_value(&value)
    }

    /// Perspective projection using the configured depth range
    pub fn frustum(&mut self, volume: &ViewVolume) -> MathResult<StackOffset> {
        projection::frustum_lh(&mut self.stack, volume, self.config.depth_range)
    }

    /// Orthographic projection using the configured depth range
    pub fn ortho(&mut self, volume: &ViewVolume) -> MathResult<StackOffset> {
        projection::ortho_lh(&mut self.stack, volume, self.config.depth_range)
    }

    /// Drop every stack value; promoted handles are unaffected
    pub fn reset(&mut self) {
        self.stack.clear();
    }
}

impl Default for BoxStack {
    fn default() -> Self {
        Self::new(StackConfig::default())
    }
}
