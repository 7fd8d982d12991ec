use std::fmt;

use super::vertex::{AngleUniform, LinePayload};

/// Upper bound on slots a table may be created with.
pub const MAX_BINDING_SLOTS: usize = 8;

/// A buffer the line shaders read.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferRole {
    /// The two line endpoints (slot 0).
    Payload,
    /// The rotation angle (slot 1).
    Angle,
}

impl BufferRole {
    pub fn label(self) -> &'static str {
        match self {
            BufferRole::Payload => "line payload",
            BufferRole::Angle => "line angle",
        }
    }

    /// Fixed slot index the shaders expect this buffer at.
    pub fn slot(self) -> u32 {
        match self {
            BufferRole::Payload => 0,
            BufferRole::Angle => 1,
        }
    }

    /// Size of the GPU buffer backing this role, in bytes.
    pub fn size(self) -> u64 {
        match self {
            BufferRole::Payload => std::mem::size_of::<LinePayload>() as u64,
            BufferRole::Angle => std::mem::size_of::<AngleUniform>() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Requested capacity is zero or above `MAX_BINDING_SLOTS`.
    InvalidCapacity(usize),
    /// Slot index is outside the table.
    SlotOutOfRange { slot: u32, capacity: usize },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::InvalidCapacity(n) => {
                write!(f, "binding table capacity {n} not in 1..={MAX_BINDING_SLOTS}")
            }
            BindingError::SlotOutOfRange { slot, capacity } => {
                write!(f, "binding slot {slot} out of range for table of {capacity}")
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// Maps shader-visible slot indices to buffers, refreshed every frame.
#[derive(Debug, Clone)]
pub struct BindingTable {
    slots: Vec<Option<BufferRole>>,
}

impl BindingTable {
    pub fn with_capacity(capacity: usize) -> Result<Self, BindingError> {
        if capacity == 0 || capacity > MAX_BINDING_SLOTS {
            return Err(BindingError::InvalidCapacity(capacity));
        }
        Ok(Self {
            slots: vec![None; capacity],
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn set(&mut self, slot: u32, role: BufferRole) -> Result<(), BindingError> {
        let capacity = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot as usize)
            .ok_or(BindingError::SlotOutOfRange { slot, capacity })?;
        *entry = Some(role);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Bound entries in ascending slot order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, BufferRole)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, role)| role.map(|r| (i as u32, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_have_fixed_slots() {
        assert_eq!(BufferRole::Payload.slot(), 0);
        assert_eq!(BufferRole::Angle.slot(), 1);
    }

    #[test]
    fn entries_come_back_in_slot_order() {
        let mut table = BindingTable::with_capacity(2).unwrap();
        table.set(1, BufferRole::Angle).unwrap();
        table.set(0, BufferRole::Payload).unwrap();
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries, vec![(0, BufferRole::Payload), (1, BufferRole::Angle)]);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut table = BindingTable::with_capacity(1).unwrap();
        assert_eq!(
            table.set(1, BufferRole::Angle),
            Err(BindingError::SlotOutOfRange { slot: 1, capacity: 1 })
        );
        assert_eq!(table.entries().count(), 0);
    }

    #[test]
    fn capacity_bounds() {
        assert!(BindingTable::with_capacity(0).is_err());
        assert!(BindingTable::with_capacity(MAX_BINDING_SLOTS + 1).is_err());
        assert_eq!(BindingTable::with_capacity(2).unwrap().capacity(), 2);
    }

    #[test]
    fn clear_unbinds_everything() {
        let mut table = BindingTable::with_capacity(2).unwrap();
        table.set(0, BufferRole::Payload).unwrap();
        table.clear();
        assert_eq!(table.entries().count(), 0);
    }
}
