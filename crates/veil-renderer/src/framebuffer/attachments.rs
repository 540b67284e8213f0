//! Slot bookkeeping for one framebuffer.

use std::collections::{BTreeSet, HashMap};

use veil_common::Size2D;

use crate::gl::{Attachment, ObjectKey};

/// Which layers of a texture are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentLayer {
    All,
    Index(u32),
}

impl AttachmentLayer {
    pub fn index(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Index(layer) => Some(layer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentRecord {
    pub attachment: Attachment,
    pub mip: u32,
    pub layer: AttachmentLayer,
    /// Size of the attached mip level.
    pub size: Size2D,
}

impl AttachmentRecord {
    pub fn color_slot(&self) -> Option<u32> {
        match self.attachment {
            Attachment::Color(slot) => Some(slot),
            _ => None,
        }
    }
}

/// Texture key to attachment metadata, plus the pool of free color slots.
///
/// A texture occupies at most one slot.
#[derive(Debug)]
pub struct AttachmentMap {
    free_color_slots: BTreeSet<u32>,
    records: HashMap<ObjectKey, AttachmentRecord>,
}

impl AttachmentMap {
    pub fn new(color_slots: u32) -> Self {
        Self {
            free_color_slots: (0..color_slots).collect(),
            records: HashMap::new(),
        }
    }

    pub fn get(&self, key: ObjectKey) -> Option<&AttachmentRecord> {
        self.records.get(&key)
    }

    /// Lowest free color slot, if any.
    pub fn lowest_free_color_slot(&self) -> Option<u32> {
        self.free_color_slots.first().copied()
    }

    /// Texture currently recorded in `attachment`.
    pub fn occupant(&self, attachment: Attachment) -> Option<ObjectKey> {
        self.records
            .iter()
            .find(|(_, record)| record.attachment == attachment)
            .map(|(&key, _)| key)
    }

    /// Record `key` in `record.attachment`, claiming the slot.
    pub fn insert(&mut self, key: ObjectKey, record: AttachmentRecord) {
        if let Some(slot) = record.color_slot() {
            self.free_color_slots.remove(&slot);
        }
        self.records.insert(key, record);
    }

    /// Forget `key` and return its color slot to the pool.
    pub fn remove(&mut self, key: ObjectKey) -> Option<AttachmentRecord> {
        let record = self.records.remove(&key)?;
        if let Some(slot) = record.color_slot() {
            self.free_color_slots.insert(slot);
        }
        Some(record)
    }

    /// Drop every color record, returning them in slot order.
    pub fn remove_all_color(&mut self) -> Vec<AttachmentRecord> {
        let keys: Vec<ObjectKey> = self
            .records
            .iter()
            .filter(|(_, record)| record.color_slot().is_some())
            .map(|(&key, _)| key)
            .collect();
        let mut removed: Vec<AttachmentRecord> =
            keys.into_iter().filter_map(|key| self.remove(key)).collect();
        removed.sort_by_key(|record| record.attachment);
        removed
    }

    /// Occupied color slots, ascending.
    pub fn color_slots(&self) -> Vec<u32> {
        let mut slots: Vec<u32> = self
            .records
            .values()
            .filter_map(AttachmentRecord::color_slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn color_count(&self) -> usize {
        self.records
            .values()
            .filter(|record| record.color_slot().is_some())
            .count()
    }
}
