//! Value Stack Implementation
//!
//! A contiguous arena of tagged, fixed-width f32 blocks with LIFO discipline.
//! No kernel semantics live here.
//!
//! # Invariants
//!
//! - every entry spans exactly `tag.slots()` floats of `data`
//! - entry offsets are strictly increasing and the last entry ends at
//!   `data.len()`
//! - with a configured `max_capacity`, `data.len()` never exceeds it

use tracing::trace;

use crate::config::StackConfig;
use crate::error::{MathError, MathResult};
use crate::types::{LinearType, LinearValue};

/// Float offset of a live value in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StackOffset(usize);

impl StackOffset {
    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Cursor captured by [`ValueStack::mark`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackMark {
    depth: usize,
    used: usize,
}

impl StackMark {
    /// Number of values that were live when the mark was taken
    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    tag: LinearType,
    offset: usize,
}

/// Arena-backed stack of tagged math values
#[derive(Debug)]
pub struct ValueStack {
    data: Vec<f32>,
    entries: Vec<Entry>,
    max_capacity: Option<usize>,
}

impl Default for ValueStack {
    fn default() -> Self {
        Self::new(&StackConfig::default())
    }
}

impl ValueStack {
    /// Create a new stack sized by `config`
    pub fn new(config: &StackConfig) -> Self {
        let reserve = match config.max_capacity {
            Some(max) => config.initial_capacity.min(max),
            None => config.initial_capacity,
        };
        ValueStack {
            data: Vec::with_capacity(reserve),
            entries: Vec::new(),
            max_capacity: config.max_capacity,
        }
    }

    /// Push a tagged block, returning its offset
    pub fn push(&mut self, tag: LinearType, floats: &[f32]) -> MathResult<StackOffset> {
        if floats.len() != tag.slots() {
            return Err(MathError::SlotCountMismatch {
                tag,
                expected: tag.slots(),
                found: floats.len(),
            });
        }

        let offset = self.data.len();
        let requested = offset + floats.len();
        if let Some(capacity) = self.max_capacity {
            if requested > capacity {
                return Err(MathError::CapacityExceeded { requested, capacity });
            }
        }
        if requested > self.data.capacity() {
            trace!(
                from = self.data.capacity(),
                needed = requested,
                "growing value stack arena"
            );
        }

        self.data.extend_from_slice(floats);
        self.entries.push(Entry { tag, offset });
        Ok(StackOffset(offset))
    }

    /// Push an owned value
    pub fn push_value(&mut self, value: &LinearValue) -> MathResult<StackOffset> {
        self.push(value.tag(), value.as_slice())
    }

    /// Most recently pushed value
    pub fn top(&self) -> MathResult<(LinearType, &[f32])> {
        let entry = self.entries.last().ok_or(MathError::EmptyStack)?;
        Ok((entry.tag, self.span(entry)))
    }

    /// Offset of the most recently pushed value
    pub fn top_offset(&self) -> MathResult<StackOffset> {
        self.entries
            .last()
            .map(|e| StackOffset(e.offset))
            .ok_or(MathError::EmptyStack)
    }

    /// Pop the top value, returning an owned copy
    pub fn pop(&mut self) -> MathResult<LinearValue> {
        let entry = self.entries.pop().ok_or(MathError::EmptyStack)?;
        let value = LinearValue::from_slice(entry.tag, &self.data[entry.offset..])?;
        self.data.truncate(entry.offset);
        Ok(value)
    }

    /// View of the value at `offset`
    pub fn get(&self, offset: StackOffset) -> MathResult<(LinearType, &[f32])> {
        let entry = self.entry(offset)?;
        Ok((entry.tag, self.span(&entry)))
    }

    /// Owned copy of the value at `offset`
    pub fn value(&self, offset: StackOffset) -> MathResult<LinearValue> {
        let (tag, data) = self.get(offset)?;
        LinearValue::from_slice(tag, data)
    }

    /// Capture the current top
    pub fn mark(&self) -> StackMark {
        StackMark {
            depth: self.entries.len(),
            used: self.data.len(),
        }
    }

    /// Pop every value pushed since `mark` was taken
    pub fn restore(&mut self, mark: StackMark) -> MathResult<()> {
        let top = self.entries.len();
        if mark.depth > top {
            return Err(MathError::InvalidCursor { depth: mark.depth, top });
        }
        let boundary = match self.entries.get(mark.depth) {
            Some(entry) => entry.offset,
            None => self.data.len(),
        };
        if boundary != mark.used {
            return Err(MathError::InvalidCursor { depth: mark.depth, top });
        }

        self.entries.truncate(mark.depth);
        self.data.truncate(mark.used);
        Ok(())
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Floats currently in use
    pub fn used(&self) -> usize {
        self.data.len()
    }

    /// Floats reserved by the arena
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    pub fn max_capacity(&self) -> Option<usize> {
        self.max_capacity
    }

    /// Live values from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = (StackOffset, LinearType, &[f32])> + '_ {
        self.entries
            .iter()
            .map(move |e| (StackOffset(e.offset), e.tag, self.span(e)))
    }

    /// Drop every value
    pub fn clear(&mut self) {
        self.entries.clear();
        self.data.clear();
    }

    fn entry(&self, offset: StackOffset) -> MathResult<Entry> {
        // offsets are strictly increasing
        self.entries
            .binary_search_by_key(&offset.0, |e| e.offset)
            .map(|i| self.entries[i])
            .map_err(|_| MathError::InvalidOffset(offset.0))
    }

    fn span(&self, entry: &Entry) -> &[f32] {
        &self.data[entry.offset..entry.offset + entry.tag.slots()]
    }
}
