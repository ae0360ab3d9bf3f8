//! Reference Handle Table
//!
//! Heap-resident, reference-counted copies of stack values, addressed by a
//! stable 64-bit id. The id packs a slot index (low 32 bits) with the slot's
//! generation (high 32 bits). A slot's generation changes every time it is
//! reclaimed, so an id held past its final release can never observe a value
//! promoted later into the same slot.
//!
//! A slot whose generation reaches `u32::MAX` is retired instead of
//! reused, so a generation value is never handed out twice for one index.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{MathError, MathResult};
use crate::types::{LinearType, LinearValue};

/// Stable handle to a promoted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RefId(u64);

impl RefId {
    fn new(index: u32, generation: u32) -> Self {
        RefId(((generation as u64) << 32) | index as u64)
    }

    /// Raw id as handed to the host
    pub fn raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        RefId(raw)
    }

    fn index(self) -> usize {
        (self.0 & 0xFFFF_FFFF) as usize
    }

    fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref({}:{})", self.index(), self.generation())
    }
}

#[derive(Debug)]
struct Slot {
    /// Never 0, so the raw id 0 is never live
    generation: u32,
    ref_count: u32,
    value: Option<LinearValue>,
    /// Generations exhausted; never reused
    retired: bool,
}

impl Slot {
    fn is_live(&self, id: RefId) -> bool {
        self.generation == id.generation() && self.value.is_some()
    }

    /// Move to the next generation; false once the slot is retired
    fn advance_generation(&mut self) -> bool {
        match self.generation.checked_add(1) {
            Some(next) => self.generation = next,
            None => self.retired = true,
        }
        !self.retired
    }
}

/// Reference-counted value storage
#[derive(Debug, Default)]
pub struct RefTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a value into the table with a reference count of one
    pub fn promote(&mut self, tag: LinearType, floats: &[f32]) -> MathResult<RefId> {
        let value = LinearValue::from_slice(tag, floats)?;
        Ok(self.promote_value(value))
    }

    pub fn promote_value(&mut self, value: LinearValue) -> RefId {
        let index = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.ref_count = 1;
                slot.value = Some(value);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 1,
                    ref_count: 1,
                    value: Some(value),
                    retired: false,
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.live += 1;

        let id = RefId::new(index, self.slots[index as usize].generation);
        trace!(%id, tag = %value.tag(), "promoted value");
        id
    }

    /// Add a holder; returns the new count
    pub fn retain(&mut self, id: RefId) -> MathResult<u32> {
        let slot = self.live_slot_mut(id)?;
        slot.ref_count = slot.ref_count.saturating_add(1);
        Ok(slot.ref_count)
    }

    /// Drop a holder; returns the remaining count, reclaiming the slot at zero
    pub fn release(&mut self, id: RefId) -> MathResult<u32> {
        let slot = self.live_slot_mut(id)?;
        slot.ref_count -= 1;
        let remaining = slot.ref_count;
        if remaining == 0 {
            slot.value = None;
            let reusable = slot.advance_generation();
            if reusable {
                self.free.push(id.index() as u32);
            }
            self.live -= 1;
            trace!(%id, reusable, "reclaimed handle");
        }
        Ok(remaining)
    }

    /// View of a live handle's value
    pub fn read(&self, id: RefId) -> MathResult<(LinearType, &[f32])> {
        let value = self.live_value(id)?;
        Ok((value.tag(), value.as_slice()))
    }

    /// Owned copy of a live handle's value
    pub fn value(&self, id: RefId) -> MathResult<LinearValue> {
        self.live_value(id).copied()
    }

    pub fn ref_count(&self, id: RefId) -> MathResult<u32> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.is_live(id))
            .map(|slot| slot.ref_count)
            .ok_or(MathError::UnknownHandle(id))
    }

    pub fn is_live(&self, id: RefId) -> bool {
        self.slots.get(id.index()).is_some_and(|slot| slot.is_live(id))
    }

    /// Number of live handles
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Tear the table down, invalidating every outstanding handle
    /// regardless of its count.
    pub fn clear(&mut self) {
        if self.live > 0 {
            debug!(outstanding = self.live, "clearing handle table with live handles");
        }
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.advance_generation();
            }
            slot.ref_count = 0;
            if !slot.retired {
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }

    fn live_value(&self, id: RefId) -> MathResult<&LinearValue> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.value.as_ref())
            .ok_or(MathError::UnknownHandle(id))
    }

    fn live_slot_mut(&mut self, id: RefId) -> MathResult<&mut Slot> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.is_live(id))
            .ok_or(MathError::UnknownHandle(id))
    }
}
