//! Bounded A* over per-cell walkability weights.
//! This module exists so both controllers route actors with one search implementation.
//! It does not decide when to route or what to do with a failed search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::actor::Actor;
use crate::map::LayeredMap;
use crate::types::Pos;

/// Weight grid for one search. Local cell (0, 0) sits at `origin` in map space.
#[derive(Clone, Debug)]
pub struct AStarMap {
    origin: Pos,
    width: usize,
    height: usize,
    weights: Vec<i32>,
    /// Map extents used to normalize reconstructed positions.
    wrap: Option<(usize, usize)>,
    /// The grid covers a whole wrapping map, so neighbours fold across the seam.
    torus: bool,
}

impl AStarMap {
    /// Whole-floor search space.
    pub fn for_floor(map: &LayeredMap, actor: &Actor, blocked: &[Pos]) -> Self {
        let wrap = map.is_wrapping().then_some((map.width(), map.height()));
        let mut grid = Self {
            origin: Pos::new(0, 0),
            width: map.width(),
            height: map.height(),
            weights: Vec::new(),
            wrap,
            torus: wrap.is_some(),
        };
        grid.fill_weights(map, actor, blocked);
        grid
    }

    /// Square window of `radius` around `center`. On wrapping maps the window may
    /// straddle the seam; a window wider than the map degrades to the whole floor.
    pub fn for_window(
        map: &LayeredMap,
        actor: &Actor,
        blocked: &[Pos],
        center: Pos,
        radius: i32,
    ) -> Self {
        let radius = radius.max(0);
        let side = (2 * radius + 1) as usize;
        if map.is_wrapping() && (side >= map.width() || side >= map.height()) {
            return Self::for_floor(map, actor, blocked);
        }
        let mut grid = Self {
            origin: center.offset_by(-radius, -radius),
            width: side,
            height: side,
            weights: Vec::new(),
            wrap: map.is_wrapping().then_some((map.width(), map.height())),
            torus: false,
        };
        grid.fill_weights(map, actor, blocked);
        grid
    }

    fn fill_weights(&mut self, map: &LayeredMap, actor: &Actor, blocked: &[Pos]) {
        self.weights = (0..self.height as i32)
            .flat_map(|ly| (0..self.width as i32).map(move |lx| (lx, ly)))
            .map(|(lx, ly)| {
                map.terrain_tile(self.origin.offset_by(lx, ly))
                    .map_or(-1, |tile| actor.path_weight(tile))
            })
            .collect();
        for pos in blocked {
            if let Some(slot) = self.to_local(*pos).map(|local| self.slot(local)) {
                self.weights[slot] = -1;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn slot(&self, local: (i32, i32)) -> usize {
        local.1 as usize * self.width + local.0 as usize
    }

    fn to_local(&self, pos: Pos) -> Option<(i32, i32)> {
        let (mut lx, mut ly) = (pos.x - self.origin.x, pos.y - self.origin.y);
        if let Some((map_w, map_h)) = self.wrap {
            lx = lx.rem_euclid(map_w as i32);
            ly = ly.rem_euclid(map_h as i32);
        }
        let inside = lx >= 0 && ly >= 0 && (lx as usize) < self.width && (ly as usize) < self.height;
        inside.then_some((lx, ly))
    }

    fn to_map(&self, local: (i32, i32)) -> Pos {
        let pos = self.origin.offset_by(local.0, local.1);
        match self.wrap {
            Some((map_w, map_h)) => pos.wrapped(map_w, map_h),
            None => pos,
        }
    }

    /// Weight of a map-space cell; negative when blocked or outside the grid.
    pub fn weight(&self, pos: Pos) -> i32 {
        self.to_local(pos).map_or(-1, |local| self.weights[self.slot(local)])
    }

    fn neighbor(&self, local: (i32, i32), delta: (i32, i32)) -> Option<(i32, i32)> {
        let (mut nx, mut ny) = (local.0 + delta.0, local.1 + delta.1);
        if self.torus {
            nx = nx.rem_euclid(self.width as i32);
            ny = ny.rem_euclid(self.height as i32);
        }
        let inside = nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height;
        inside.then_some((nx, ny))
    }

    fn heuristic(&self, a: (i32, i32), b: (i32, i32)) -> u32 {
        let (dx, dy) = (a.0.abs_diff(b.0), a.1.abs_diff(b.1));
        if self.torus {
            dx.min(self.width as u32 - dx) + dy.min(self.height as u32 - dy)
        } else {
            dx + dy
        }
    }

    /// Cheapest route from `start` to `goal`, both in map space, including both ends.
    /// Empty when either end is outside the grid, the goal is blocked, or no route exists.
    pub fn astar(&self, start: Pos, goal: Pos) -> Vec<Pos> {
        let (Some(start), Some(goal)) = (self.to_local(start), self.to_local(goal)) else {
            return Vec::new();
        };
        if self.weights[self.slot(goal)] < 0 {
            return Vec::new();
        }

        let cells = self.width * self.height;
        let mut g_score = vec![u32::MAX; cells];
        let mut parent: Vec<Option<usize>> = vec![None; cells];
        let mut closed = vec![false; cells];
        // Ties on f resolve first-in first-out through the sequence number.
        let mut open = BinaryHeap::new();
        let mut seq = 0_u64;

        let start_slot = self.slot(start);
        g_score[start_slot] = 0;
        open.push(Reverse((self.heuristic(start, goal), seq, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            let current_slot = self.slot(current);
            if closed[current_slot] {
                continue;
            }
            if current == goal {
                return self.reconstruct(&parent, current);
            }
            closed[current_slot] = true;

            for delta in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                let Some(next) = self.neighbor(current, delta) else {
                    continue;
                };
                let next_slot = self.slot(next);
                let weight = self.weights[next_slot];
                if weight < 0 || closed[next_slot] {
                    continue;
                }
                let tentative = g_score[current_slot].saturating_add(weight as u32);
                if tentative < g_score[next_slot] {
                    g_score[next_slot] = tentative;
                    parent[next_slot] = Some(current_slot);
                    seq += 1;
                    open.push(Reverse((tentative + self.heuristic(next, goal), seq, next)));
                }
            }
        }
        Vec::new()
    }

    fn reconstruct(&self, parent: &[Option<usize>], goal: (i32, i32)) -> Vec<Pos> {
        let mut path = Vec::new();
        let mut cursor = Some(self.slot(goal));
        while let Some(slot) = cursor {
            let local = ((slot % self.width) as i32, (slot / self.width) as i32);
            path.push(self.to_map(local));
            cursor = parent[slot];
        }
        path.reverse();
        path
    }
}
