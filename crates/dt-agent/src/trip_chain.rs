//! `TripChain` — an agent's day plan: an ordered alternation of `Activity`
//! and `Trip` items, each `Trip` further split into `SubTrip`s (one per
//! transport mode used to complete that trip, e.g. walk-to-stop / bus /
//! walk-from-stop).
//!
//! Grounded on `original_source/.../entities/misc/TripChain.hpp`. The
//! original walks this structure with STL iterators into a
//! `vector<TripChainItem*>`; a reroute or schedule edit that inserts a new
//! item invalidates any iterator taken before the edit. This sequencer
//! instead tracks position as two plain integers (`item_index`,
//! `sub_trip_index`) recomputed from the `Vec`'s current contents on every
//! access, so inserting or removing items never invalidates anything the
//! agent's Role is holding onto between ticks.

use dt_core::{NodeId, Tick, TransportMode};

/// Where a `Trip` or `Activity` is headed — either a concrete node or a
/// sentinel resolved at simulation time (the agent's modeled home/work
/// location).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Node(NodeId),
    Home,
    Work,
}

/// One leg of a `Trip`, performed in a single transport mode.
#[derive(Clone, Debug)]
pub struct SubTrip {
    pub mode: TransportMode,
    pub origin: Destination,
    pub destination: Destination,
}

/// A journey from one activity location to the next, made of one or more
/// `SubTrip`s (mode changes along the way).
#[derive(Clone, Debug, Default)]
pub struct Trip {
    pub sub_trips: Vec<SubTrip>,
}

impl Trip {
    pub fn new(sub_trips: Vec<SubTrip>) -> Self {
        Self { sub_trips }
    }
}

/// A stay at a location for a purpose (work, shop, home) between trips.
#[derive(Clone, Debug)]
pub struct Activity {
    pub destination: Destination,
    pub start_tick: Tick,
    pub end_tick: Tick,
}

/// One element of a day plan.
#[derive(Clone, Debug)]
pub enum TripChainItem {
    Trip(Trip),
    Activity(Activity),
}

/// An agent's full day plan plus a cursor into it.
///
/// `item_index` addresses a position in `items`; for `Trip` items,
/// `sub_trip_index` additionally addresses a position within that trip's
/// `sub_trips`. Both reset to `0` whenever `item_index` advances onto a
/// new item.
#[derive(Clone, Debug, Default)]
pub struct TripChain {
    items: Vec<TripChainItem>,
    item_index: usize,
    sub_trip_index: usize,
}

impl TripChain {
    pub fn new(items: Vec<TripChainItem>) -> Self {
        Self {
            items,
            item_index: 0,
            sub_trip_index: 0,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.item_index >= self.items.len()
    }

    pub fn items(&self) -> &[TripChainItem] {
        &self.items
    }

    /// Insert `item` right after the current position — used when a Role
    /// reacts to a `ReRouteRequest` by splicing in a detour trip. Safe to
    /// call mid-iteration: it only shifts indices the sequencer has not
    /// visited yet.
    pub fn insert_next(&mut self, item: TripChainItem) {
        let at = (self.item_index + 1).min(self.items.len());
        self.items.insert(at, item);
    }

    /// The item the cursor currently points at, if the chain isn't done.
    pub fn current_item(&self) -> Option<&TripChainItem> {
        self.items.get(self.item_index)
    }

    /// The sub-trip the cursor points at, if the current item is a `Trip`
    /// with a valid `sub_trip_index`.
    pub fn current_sub_trip(&self) -> Option<&SubTrip> {
        match self.items.get(self.item_index)? {
            TripChainItem::Trip(trip) => trip.sub_trips.get(self.sub_trip_index),
            TripChainItem::Activity(_) => None,
        }
    }

    /// Advance the cursor by one step: to the next sub-trip within the
    /// current `Trip`, or to the next chain item if the current item is
    /// exhausted (an `Activity`, or a `Trip` whose last sub-trip just
    /// completed). Returns `false` once the chain is exhausted.
    pub fn advance(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        match &self.items[self.item_index] {
            TripChainItem::Trip(trip) => {
                if self.sub_trip_index + 1 < trip.sub_trips.len() {
                    self.sub_trip_index += 1;
                    return true;
                }
            }
            TripChainItem::Activity(_) => {}
        }
        self.item_index += 1;
        self.sub_trip_index = 0;
        !self.is_done()
    }
}
