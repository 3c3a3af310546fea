//! One side of the order book
//!
//! Price levels are kept in a BTreeMap so iteration is deterministic. The
//! best bid is the last key, the best ask the first. Levels are dropped as
//! soon as their last record leaves, so every level in the map is non-empty.

use std::collections::BTreeMap;
use types::ids::{ParticipantId, Timestamp};
use types::numeric::Money;
use types::order::{OrderDir, RestingOrder};

use super::price_level::{PriceLevel, SlotRef};

/// Stable reference to a resting record
///
/// Valid until the record is removed. A handle whose level has been emptied
/// and recreated at the same price no longer resolves, because the new level
/// carries a different generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle {
    pub dir: OrderDir,
    pub price: Money,
    pub(crate) generation: u64,
    pub(crate) slot: SlotRef,
}

/// Aggregate view of one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDepth {
    pub price: Money,
    pub order_count: usize,
    pub volume: u64,
}

#[derive(Debug, Clone)]
pub struct BookSide {
    dir: OrderDir,
    levels: BTreeMap<Money, PriceLevel>,
    next_generation: u64,
    order_count: usize,
    total_volume: u64,
}

impl BookSide {
    pub fn new(dir: OrderDir) -> Self {
        Self {
            dir,
            levels: BTreeMap::new(),
            next_generation: 0,
            order_count: 0,
            total_volume: 0,
        }
    }

    pub fn dir(&self) -> OrderDir {
        self.dir
    }

    pub fn insert(&mut self, price: Money, order: RestingOrder) -> OrderHandle {
        let next_generation = &mut self.next_generation;
        let level = self.levels.entry(price).or_insert_with(|| {
            let level = PriceLevel::new(*next_generation);
            *next_generation += 1;
            level
        });
        let slot = level.insert(order);
        self.order_count += 1;
        self.total_volume += order.volume;

        OrderHandle {
            dir: self.dir,
            price,
            generation: level.generation(),
            slot,
        }
    }

    /// Best price on this side: highest bid or lowest ask
    pub fn best_price(&self) -> Option<Money> {
        match self.dir {
            OrderDir::Bid => self.levels.keys().next_back().copied(),
            OrderDir::Ask => self.levels.keys().next().copied(),
        }
    }

    /// Handles and records at the best price, in insertion order
    pub fn best_level_orders(&self) -> Vec<(OrderHandle, RestingOrder)> {
        let Some(price) = self.best_price() else {
            return Vec::new();
        };
        let Some(level) = self.levels.get(&price) else {
            return Vec::new();
        };
        level
            .in_insertion_order()
            .into_iter()
            .map(|(slot, order)| (self.handle(price, level, slot), *order))
            .collect()
    }

    /// Earliest record at the best price
    pub fn best_earliest(&self) -> Option<(OrderHandle, RestingOrder)> {
        let price = self.best_price()?;
        let level = self.levels.get(&price)?;
        let (slot, order) = level.earliest()?;
        Some((self.handle(price, level, slot), *order))
    }

    pub fn get(&self, handle: &OrderHandle) -> Option<&RestingOrder> {
        let level = self.level_for(handle)?;
        level.get(handle.slot)
    }

    pub fn remove(&mut self, handle: &OrderHandle) -> Option<RestingOrder> {
        let level = self.level_for_mut(handle)?;
        let order = level.remove(handle.slot)?;
        self.after_removal(handle.price, order.volume, 1);
        Some(order)
    }

    /// Reduce the record behind `handle` by `volume`
    ///
    /// Returns the volume left resting; the record is removed when that
    /// reaches zero.
    pub fn consume(&mut self, handle: &OrderHandle, volume: u64) -> Option<u64> {
        let level = self.level_for_mut(handle)?;
        let left = level.consume(handle.slot, volume)?;
        self.after_removal(handle.price, volume, usize::from(left == 0));
        Some(left)
    }

    /// Remove the earliest record owned by `participant_id` across all levels
    pub fn remove_earliest_by_participant(&mut self, participant_id: ParticipantId) -> Option<RestingOrder> {
        let (price, slot) = self
            .levels
            .iter()
            .filter_map(|(price, level)| {
                level
                    .earliest_of(participant_id)
                    .map(|(slot, order)| (order.timestamp, *price, slot))
            })
            .min_by_key(|(timestamp, _, _)| *timestamp)
            .map(|(_, price, slot)| (price, slot))?;
        self.remove_slot(price, slot)
    }

    /// Remove the record with this owner and timestamp, at any price
    pub fn remove_specific(&mut self, participant_id: ParticipantId, timestamp: Timestamp) -> Option<RestingOrder> {
        let (price, slot) = self
            .levels
            .iter()
            .find_map(|(price, level)| level.find(participant_id, timestamp).map(|slot| (*price, slot)))?;
        self.remove_slot(price, slot)
    }

    /// Remove the record with this owner and timestamp at a known price
    pub fn remove_at(&mut self, price: Money, participant_id: ParticipantId, timestamp: Timestamp) -> Option<RestingOrder> {
        let slot = self.levels.get(&price)?.find(participant_id, timestamp)?;
        self.remove_slot(price, slot)
    }

    /// Number of resting records
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Sum of resting volume
    pub fn total_volume(&self) -> u64 {
        self.total_volume
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Every level, best price first
    pub fn depth(&self) -> Vec<LevelDepth> {
        let summarize = |(price, level): (&Money, &PriceLevel)| LevelDepth {
            price: *price,
            order_count: level.order_count(),
            volume: level.total_volume(),
        };
        match self.dir {
            OrderDir::Bid => self.levels.iter().rev().map(summarize).collect(),
            OrderDir::Ask => self.levels.iter().map(summarize).collect(),
        }
    }

    /// All records with their prices, best price first
    pub fn iter_orders(&self) -> impl Iterator<Item = (Money, &RestingOrder)> + '_ {
        let levels: Box<dyn Iterator<Item = (&Money, &PriceLevel)> + '_> = match self.dir {
            OrderDir::Bid => Box::new(self.levels.iter().rev()),
            OrderDir::Ask => Box::new(self.levels.iter()),
        };
        levels.flat_map(|(price, level)| level.iter().map(move |(_, order)| (*price, order)))
    }

    fn handle(&self, price: Money, level: &PriceLevel, slot: SlotRef) -> OrderHandle {
        OrderHandle {
            dir: self.dir,
            price,
            generation: level.generation(),
            slot,
        }
    }

    fn level_for(&self, handle: &OrderHandle) -> Option<&PriceLevel> {
        if handle.dir != self.dir {
            return None;
        }
        self.levels
            .get(&handle.price)
            .filter(|level| level.generation() == handle.generation)
    }

    fn level_for_mut(&mut self, handle: &OrderHandle) -> Option<&mut PriceLevel> {
        if handle.dir != self.dir {
            return None;
        }
        self.levels
            .get_mut(&handle.price)
            .filter(|level| level.generation() == handle.generation)
    }

    fn remove_slot(&mut self, price: Money, slot: SlotRef) -> Option<RestingOrder> {
        let order = self.levels.get_mut(&price)?.remove(slot)?;
        self.after_removal(price, order.volume, 1);
        Some(order)
    }

    fn after_removal(&mut self, price: Money, volume: u64, records: usize) {
        self.total_volume -= volume;
        self.order_count -= records;
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }
}
