//! Price level with reusable slots
//!
//! A price level holds every resting order at one price. Records live in
//! slots that are recycled through a free list once vacated. Each record
//! also gets a level-local insertion sequence, and a [`SlotRef`] resolves
//! only while the slot still holds the record with that sequence. Priority
//! is always selected explicitly by timestamp, with the sequence breaking
//! ties.

use types::ids::{ParticipantId, Timestamp};
use types::order::RestingOrder;

/// Position of one record inside a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub(crate) index: usize,
    pub(crate) seq: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    seq: u64,
    order: Option<RestingOrder>,
}

/// A price level containing orders at a specific price
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Generation tag, unique per level instance within a book side
    generation: u64,
    slots: Vec<Slot>,
    free: Vec<usize>,
    next_seq: u64,
    live: usize,
    total_volume: u64,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            slots: Vec::new(),
            free: Vec::new(),
            next_seq: 0,
            live: 0,
            total_volume: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Store a record, reusing a vacated slot when there is one
    pub fn insert(&mut self, order: RestingOrder) -> SlotRef {
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = Slot { seq, order: Some(order) };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = slot;
                index
            }
            None => {
                self.slots.push(slot);
                self.slots.len() - 1
            }
        };
        self.live += 1;
        self.total_volume += order.volume;
        SlotRef { index, seq }
    }

    pub fn get(&self, slot: SlotRef) -> Option<&RestingOrder> {
        self.slots
            .get(slot.index)
            .filter(|entry| entry.seq == slot.seq)
            .and_then(|entry| entry.order.as_ref())
    }

    /// Remove the record behind `slot`
    ///
    /// Returns None if the slot is out of range, vacated or reused.
    pub fn remove(&mut self, slot: SlotRef) -> Option<RestingOrder> {
        let order = self.entry_mut(slot)?.order.take()?;
        self.vacate(slot.index, order.volume);
        Some(order)
    }

    /// Take `volume` out of the record behind `slot`
    ///
    /// Vacates the slot once the record is exhausted. Returns the volume
    /// still resting, or None if the slot no longer holds the record or the
    /// record holds less than `volume`.
    pub fn consume(&mut self, slot: SlotRef, volume: u64) -> Option<u64> {
        let entry = self.entry_mut(slot)?;
        let order = entry.order.as_mut()?;
        if volume > order.volume {
            return None;
        }
        order.volume -= volume;
        let left = order.volume;
        if left == 0 {
            entry.order = None;
            self.vacate(slot.index, volume);
        } else {
            self.total_volume -= volume;
        }
        Some(left)
    }

    /// Live records in slot order
    pub fn iter(&self) -> impl Iterator<Item = (SlotRef, &RestingOrder)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .order
                .as_ref()
                .map(|order| (SlotRef { index, seq: entry.seq }, order))
        })
    }

    /// Live records in insertion order
    pub fn in_insertion_order(&self) -> Vec<(SlotRef, &RestingOrder)> {
        let mut records: Vec<_> = self.iter().collect();
        records.sort_by_key(|(slot, _)| slot.seq);
        records
    }

    /// Record with the smallest timestamp; insertion order breaks ties
    pub fn earliest(&self) -> Option<(SlotRef, &RestingOrder)> {
        self.iter().min_by_key(|(slot, order)| (order.timestamp, slot.seq))
    }

    /// Earliest record owned by `participant_id`
    pub fn earliest_of(&self, participant_id: ParticipantId) -> Option<(SlotRef, &RestingOrder)> {
        self.iter()
            .filter(|(_, order)| order.participant_id == participant_id)
            .min_by_key(|(slot, order)| (order.timestamp, slot.seq))
    }

    /// Slot of the record matching both owner and timestamp
    pub fn find(&self, participant_id: ParticipantId, timestamp: Timestamp) -> Option<SlotRef> {
        self.iter()
            .find(|(_, order)| order.participant_id == participant_id && order.timestamp == timestamp)
            .map(|(slot, _)| slot)
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of live records
    pub fn order_count(&self) -> usize {
        self.live
    }

    /// Sum of live record volumes
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    /// Allocated slots, live or free
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn entry_mut(&mut self, slot: SlotRef) -> Option<&mut Slot> {
        self.slots.get_mut(slot.index).filter(|entry| entry.seq == slot.seq)
    }

    fn vacate(&mut self, index: usize, volume: u64) {
        self.live -= 1;
        self.total_volume -= volume;
        self.free.push(index);
    }
}
