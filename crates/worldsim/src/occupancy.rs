//! Per-turn snapshot of which cells hold an actor.

use std::collections::{BTreeMap, BTreeSet};

use crate::actor::Actor;
use crate::types::{Floor, Pos};

/// Floor -> x -> occupied ys. Rebuilt every turn and never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupancyMap {
    cells: BTreeMap<Floor, BTreeMap<i32, BTreeSet<i32>>>,
}

impl OccupancyMap {
    /// Snapshot of every visible, non-empty actor.
    pub fn from_actors(actors: &[Actor]) -> Self {
        let mut map = Self::default();
        for actor in actors.iter().filter(|actor| actor.is_visible() && !actor.is_empty()) {
            map.mark(actor.floor(), actor.pos());
        }
        map
    }

    pub fn is_occupied(&self, floor: Floor, pos: Pos) -> bool {
        self.cells
            .get(&floor)
            .and_then(|columns| columns.get(&pos.x))
            .is_some_and(|ys| ys.contains(&pos.y))
    }

    pub fn mark(&mut self, floor: Floor, pos: Pos) {
        self.cells.entry(floor).or_default().entry(pos.x).or_default().insert(pos.y);
    }

    pub fn unmark(&mut self, floor: Floor, pos: Pos) {
        let Some(columns) = self.cells.get_mut(&floor) else {
            return;
        };
        if let Some(ys) = columns.get_mut(&pos.x) {
            ys.remove(&pos.y);
            if ys.is_empty() {
                columns.remove(&pos.x);
            }
        }
    }

    pub fn relocate(&mut self, from_floor: Floor, from: Pos, to_floor: Floor, to: Pos) {
        self.unmark(from_floor, from);
        self.mark(to_floor, to);
    }

    pub fn len(&self) -> usize {
        self.cells.values().flat_map(BTreeMap::values).map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
