use thiserror::Error;

use crate::bytecode::registers::{LOCALWORK_BASE, SCWK_TEMP_BASE};
use crate::limits::{LOCAL_WORK_SLOTS, TEMP_WORK_SLOTS};
use crate::symbol::ValueKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("out of local work registers ({capacity} per function)")]
    OutOfStorage { capacity: usize },
    #[error("cannot allocate storage for `{0}` values automatically")]
    UnsupportedAutoAllocation(ValueKind),
}

#[derive(Debug, Clone)]
struct SlotPool {
    base: u32,
    capacity: usize,
    used: usize,
}

impl SlotPool {
    fn new(base: u32, capacity: usize) -> Self {
        Self {
            base,
            capacity,
            used: 0,
        }
    }

    fn take(&mut self) -> Option<u32> {
        if self.used == self.capacity {
            return None;
        }
        let slot = self.base + self.used as u32;
        self.used += 1;
        Some(slot)
    }
}

#[derive(Debug, Clone)]
pub struct StorageAllocator {
    local: SlotPool,
    temp: SlotPool,
}

impl Default for StorageAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageAllocator {
    pub fn new() -> Self {
        Self {
            local: SlotPool::new(LOCALWORK_BASE, LOCAL_WORK_SLOTS),
            temp: SlotPool::new(SCWK_TEMP_BASE, TEMP_WORK_SLOTS),
        }
    }

    pub fn allocate_local(&mut self, kind: ValueKind) -> Result<u32, AllocError> {
        if kind != ValueKind::Integer {
            return Err(AllocError::UnsupportedAutoAllocation(kind));
        }
        self.local.take().ok_or(AllocError::OutOfStorage {
            capacity: self.local.capacity,
        })
    }

    // Next `SCWK_TEMPn` register for an argument binding. Exhaustion is
    // `Ok(None)`: the caller then needs an explicit slot.
    pub fn allocate_arg_temp(&mut self, kind: ValueKind) -> Result<Option<u32>, AllocError> {
        if kind != ValueKind::Integer {
            return Err(AllocError::UnsupportedAutoAllocation(kind));
        }
        Ok(self.temp.take())
    }

    pub fn locals_used(&self) -> usize {
        self.local.used
    }

    pub fn temps_used(&self) -> usize {
        self.temp.used
    }
}
