//! Line-of-sight flood fill and radial light attenuation around the avatar.
//! This module exists so rendering and passability checks agree on what the avatar can see.
//! It does not own lighting sources; callers report whether a torch is lit.

use std::collections::VecDeque;
use std::f32::consts::SQRT_2;

use crate::config::VisibilityConfig;
use crate::date::GameDate;
use crate::map::LayeredMap;
use crate::types::Pos;

/// Distance-mask value for cells beyond the largest possible light radius.
pub const UNLIT: u8 = u8::MAX;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lighting {
    pub torch_lit: bool,
}

/// Window-local visibility bitmap and distance mask, centred on the avatar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityMap {
    center: Pos,
    radius: i32,
    side: usize,
    max_light_radius: u8,
    visible: Vec<bool>,
    distance: Vec<u8>,
}

impl VisibilityMap {
    pub fn compute(map: &LayeredMap, avatar: Pos, config: &VisibilityConfig) -> Self {
        let radius = config.window_radius.max(0);
        let side = (2 * radius + 1) as usize;
        let max_light_radius = max_light_radius(radius);
        let mut vis = Self {
            center: avatar,
            radius,
            side,
            max_light_radius,
            visible: vec![false; side * side],
            distance: vec![UNLIT; side * side],
        };

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if map.normalize(avatar.offset_by(dx, dy)).is_none() {
                    continue;
                }
                let grown = grow_radius(dx, dy);
                if grown <= u32::from(max_light_radius) {
                    let slot = vis.slot(dx, dy);
                    vis.distance[slot] = grown as u8;
                }
            }
        }

        vis.flood_fill(map);
        vis
    }

    fn slot(&self, dx: i32, dy: i32) -> usize {
        ((dy + self.radius) as usize) * self.side + (dx + self.radius) as usize
    }

    fn local_delta(&self, map: &LayeredMap, pos: Pos) -> Option<(i32, i32)> {
        let (mut dx, mut dy) = (pos.x - self.center.x, pos.y - self.center.y);
        if map.is_wrapping() {
            dx = shortest_delta(dx, map.width() as i32);
            dy = shortest_delta(dy, map.height() as i32);
        } else if !map.in_bounds(pos) {
            return None;
        }
        (dx.abs() <= self.radius && dy.abs() <= self.radius).then_some((dx, dy))
    }

    fn flood_fill(&mut self, map: &LayeredMap) {
        let mut queue = VecDeque::new();
        let origin = self.center;
        let seeds: [(i32, i32); 5] = [(0, 0), (0, -1), (1, 0), (0, 1), (-1, 0)];
        for (dx, dy) in seeds {
            if self.radius < dx.abs().max(dy.abs()) {
                continue;
            }
            if map.normalize(origin.offset_by(dx, dy)).is_none() {
                continue;
            }
            let slot = self.slot(dx, dy);
            if !self.visible[slot] {
                self.visible[slot] = true;
                queue.push_back((dx, dy));
            }
        }

        while let Some((dx, dy)) = queue.pop_front() {
            let is_avatar_cell = (dx, dy) == (0, 0);
            let see_through = map
                .terrain_tile(origin.offset_by(dx, dy))
                .is_some_and(|tile| tile.is_see_through());
            if !is_avatar_cell && !see_through {
                continue;
            }
            for (ndx, ndy) in [(dx, dy - 1), (dx + 1, dy), (dx, dy + 1), (dx - 1, dy)] {
                if ndx.abs() > self.radius || ndy.abs() > self.radius {
                    continue;
                }
                if map.normalize(origin.offset_by(ndx, ndy)).is_none() {
                    continue;
                }
                let slot = self.slot(ndx, ndy);
                if !self.visible[slot] {
                    self.visible[slot] = true;
                    queue.push_back((ndx, ndy));
                }
            }
        }
    }

    pub fn center(&self) -> Pos {
        self.center
    }

    pub fn max_light_radius(&self) -> u8 {
        self.max_light_radius
    }

    pub fn is_line_of_sight_visible(&self, map: &LayeredMap, pos: Pos) -> bool {
        self.local_delta(map, pos).is_some_and(|(dx, dy)| self.visible[self.slot(dx, dy)])
    }

    pub fn distance_at(&self, map: &LayeredMap, pos: Pos) -> u8 {
        self.local_delta(map, pos).map_or(UNLIT, |(dx, dy)| self.distance[self.slot(dx, dy)])
    }
}

/// Lit radius for the time of day, between the baseline and the window's half diagonal.
pub fn light_radius(date: &GameDate, baseline: u8, max: u8) -> u8 {
    let baseline = baseline.min(max);
    let span = f32::from(max - baseline);
    let grown = f32::from(baseline) + date.visibility_factor() * span;
    (grown.round() as u8).clamp(baseline, max)
}

fn max_light_radius(window_radius: i32) -> u8 {
    let side = (2 * window_radius + 1) as f32;
    (side * SQRT_2 / 2.0).ceil().min(f32::from(UNLIT - 1)) as u8
}

/// Smallest integer radius whose circle covers the offset.
fn grow_radius(dx: i32, dy: i32) -> u32 {
    let dist_sq = (dx * dx + dy * dy) as u32;
    let mut radius = 0_u32;
    while radius * radius < dist_sq {
        radius += 1;
    }
    radius
}

fn shortest_delta(delta: i32, extent: i32) -> i32 {
    let folded = delta.rem_euclid(extent);
    if folded > extent / 2 { folded - extent } else { folded }
}

impl LayeredMap {
    pub fn recompute_visibility(&mut self, avatar: Pos, config: &VisibilityConfig) {
        self.visibility = Some(VisibilityMap::compute(self, avatar, config));
    }

    pub fn visibility(&self) -> Option<&VisibilityMap> {
        self.visibility.as_ref()
    }

    /// Line of sight always gates; the light radius gates too unless a torch is lit.
    pub fn is_position_visible(
        &self,
        pos: Pos,
        date: &GameDate,
        lighting: Lighting,
        config: &VisibilityConfig,
    ) -> bool {
        let Some(vis) = self.visibility.as_ref() else {
            return false;
        };
        if !vis.is_line_of_sight_visible(self, pos) {
            return false;
        }
        if lighting.torch_lit {
            return true;
        }
        let radius = light_radius(date, config.baseline_light_radius, vis.max_light_radius);
        vis.distance_at(self, pos) <= radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Layer;
    use crate::test_support::*;

    fn config(window_radius: i32) -> VisibilityConfig {
        VisibilityConfig { window_radius, baseline_light_radius: 2 }
    }

    #[test]
    fn open_field_is_fully_visible_by_day() {
        let mut map = grass_map(21, 21, false);
        let avatar = Pos::new(10, 10);
        let config = config(5);
        map.recompute_visibility(avatar, &config);
        let noon = GameDate::at(12, 0);
        for pos in [Pos::new(5, 5), Pos::new(15, 15), Pos::new(10, 5)] {
            assert!(map.is_position_visible(pos, &noon, Lighting::default(), &config));
        }
        assert!(!map.is_position_visible(Pos::new(4, 10), &noon, Lighting::default(), &config));
    }

    #[test]
    fn wall_blocks_flood_fill_but_is_itself_seen() {
        let mut map = grass_map(11, 11, false);
        for y in 0..11 {
            map.set_tile_by_layer(Layer::Terrain, Pos::new(6, y), WALL);
        }
        let config = config(5);
        map.recompute_visibility(Pos::new(3, 5), &config);
        let vis = map.visibility().expect("visibility").clone();
        assert!(vis.is_line_of_sight_visible(&map, Pos::new(6, 5)));
        assert!(!vis.is_line_of_sight_visible(&map, Pos::new(7, 5)));
        assert!(!vis.is_line_of_sight_visible(&map, Pos::new(8, 2)));
    }

    #[test]
    fn window_lets_sight_through() {
        let mut map = grass_map(11, 11, false);
        for y in 0..11 {
            map.set_tile_by_layer(Layer::Terrain, Pos::new(6, y), WALL);
        }
        map.set_tile_by_layer(Layer::Terrain, Pos::new(6, 5), WINDOW);
        let config = config(5);
        map.recompute_visibility(Pos::new(3, 5), &config);
        let vis = map.visibility().expect("visibility");
        assert!(vis.is_line_of_sight_visible(&map, Pos::new(7, 5)));
        assert!(vis.is_line_of_sight_visible(&map, Pos::new(8, 1)));
    }

    #[test]
    fn darkness_limits_sight_unless_torch_is_lit() {
        let mut map = grass_map(21, 21, false);
        let config = config(6);
        map.recompute_visibility(Pos::new(10, 10), &config);
        let midnight = GameDate::at(0, 0);
        let far = Pos::new(15, 10);
        let near = Pos::new(11, 11);

        assert!(map.is_position_visible(near, &midnight, Lighting::default(), &config));
        assert!(!map.is_position_visible(far, &midnight, Lighting::default(), &config));
        assert!(map.is_position_visible(far, &midnight, Lighting { torch_lit: true }, &config));
    }

    #[test]
    fn torch_never_shows_through_walls() {
        let mut map = grass_map(11, 11, false);
        for y in 0..11 {
            map.set_tile_by_layer(Layer::Terrain, Pos::new(6, y), WALL);
        }
        let config = config(5);
        map.recompute_visibility(Pos::new(3, 5), &config);
        let torch = Lighting { torch_lit: true };
        assert!(!map.is_position_visible(Pos::new(8, 5), &GameDate::at(12, 0), torch, &config));
    }

    #[test]
    fn wrapping_window_sees_across_the_seam() {
        let mut map = grass_map(16, 16, true);
        let config = config(3);
        map.recompute_visibility(Pos::new(0, 0), &config);
        let noon = GameDate::at(12, 0);
        assert!(map.is_position_visible(Pos::new(14, 15), &noon, Lighting::default(), &config));
        assert!(!map.is_position_visible(Pos::new(8, 8), &noon, Lighting::default(), &config));
    }

    #[test]
    fn light_radius_is_clamped_between_baseline_and_max() {
        assert_eq!(light_radius(&GameDate::at(0, 0), 2, 16), 2);
        assert_eq!(light_radius(&GameDate::at(12, 0), 2, 16), 16);
        let dusk = light_radius(&GameDate::at(19, 0), 2, 16);
        assert!(dusk > 2 && dusk < 16);
        assert_eq!(light_radius(&GameDate::at(12, 0), 20, 16), 16);
    }

    #[test]
    fn distance_mask_grows_in_rings() {
        assert_eq!(grow_radius(0, 0), 0);
        assert_eq!(grow_radius(1, 0), 1);
        assert_eq!(grow_radius(1, 1), 2);
        assert_eq!(grow_radius(3, 4), 5);
    }
}
