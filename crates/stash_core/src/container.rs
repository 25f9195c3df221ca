use serde::{Deserialize, Serialize};

use crate::item::{ItemRecord, RealItem};

pub const HEADER_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    /// Opaque per-slot tag, written back unchanged.
    pub slot_index: i32,
    pub payload: ItemRecord,
}

impl SlotEntry {
    pub fn new(slot_index: i32, payload: impl Into<ItemRecord>) -> Self {
        Self {
            slot_index,
            payload: payload.into(),
        }
    }

    pub fn empty(slot_index: i32) -> Self {
        Self {
            slot_index,
            payload: ItemRecord::Empty,
        }
    }

    pub fn item(&self) -> Option<&RealItem> {
        self.payload.as_real()
    }

    pub fn item_mut(&mut self) -> Option<&mut RealItem> {
        self.payload.as_real_mut()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashContainer {
    pub header: [u8; HEADER_LEN],
    pub version: String,
    pub slot_count: String,
    pub slots: Vec<SlotEntry>,
}

impl StashContainer {
    pub fn new(
        header: [u8; HEADER_LEN],
        version: impl Into<String>,
        slot_count: impl Into<String>,
    ) -> Self {
        Self {
            header,
            version: version.into(),
            slot_count: slot_count.into(),
            slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, slot: SlotEntry) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn slot(&self, position: usize) -> Option<&SlotEntry> {
        self.slots.get(position)
    }

    pub fn slot_mut(&mut self, position: usize) -> Option<&mut SlotEntry> {
        self.slots.get_mut(position)
    }

    pub fn items(&self) -> impl Iterator<Item = &RealItem> {
        self.slots.iter().filter_map(SlotEntry::item)
    }

    pub fn occupied_count(&self) -> usize {
        self.items().count()
    }

    /// One display name per slot, in slot order.
    pub fn item_names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.payload.display_name()).collect()
    }
}
