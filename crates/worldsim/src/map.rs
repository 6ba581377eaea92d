//! Multi-layer tile grids for one floor, and the floor set of a location.
//! This module exists so every controller reads terrain and writes actor sprites the same way.
//! It does not own actors or decide who may stand where.

use std::array;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::invariant_violation;
use crate::tile::{TileDef, TileTable};
use crate::types::{Floor, Pos, TileIndex};
use crate::visibility::VisibilityMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Terrain,
    TerrainOverride,
    Provisions,
    MapUnits,
    Avatar,
    Effects,
}

const LAYER_COUNT: usize = 6;

impl Layer {
    /// Search order for the effective tile, highest priority first.
    pub const TOP_DOWN: [Layer; LAYER_COUNT] = [
        Layer::Effects,
        Layer::Avatar,
        Layer::MapUnits,
        Layer::Provisions,
        Layer::TerrainOverride,
        Layer::Terrain,
    ];

    const TERRAIN_TOP_DOWN: [Layer; 3] = [Layer::Provisions, Layer::TerrainOverride, Layer::Terrain];

    fn slot(self) -> usize {
        match self {
            Layer::Terrain => 0,
            Layer::TerrainOverride => 1,
            Layer::Provisions => 2,
            Layer::MapUnits => 3,
            Layer::Avatar => 4,
            Layer::Effects => 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayeredMap {
    width: usize,
    height: usize,
    wrapping: bool,
    layers: [Vec<Option<TileIndex>>; LAYER_COUNT],
    tiles: Arc<TileTable>,
    pub(crate) visibility: Option<VisibilityMap>,
}

impl LayeredMap {
    pub fn new(width: usize, height: usize, wrapping: bool, tiles: Arc<TileTable>) -> Self {
        Self {
            width,
            height,
            wrapping,
            layers: array::from_fn(|_| vec![None; width * height]),
            tiles,
            visibility: None,
        }
    }

    /// Builds a floor whose terrain layer is filled row-major from `terrain`.
    pub fn from_terrain(
        width: usize,
        height: usize,
        wrapping: bool,
        tiles: Arc<TileTable>,
        terrain: &[TileIndex],
    ) -> Self {
        if terrain.len() != width * height {
            invariant_violation(format_args!(
                "terrain has {} cells, expected {}x{}",
                terrain.len(),
                width,
                height
            ));
        }
        let mut map = Self::new(width, height, wrapping, tiles);
        map.layers[Layer::Terrain.slot()] = terrain.iter().copied().map(Some).collect();
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_wrapping(&self) -> bool {
        self.wrapping
    }

    pub fn tile_table(&self) -> &Arc<TileTable> {
        &self.tiles
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Wrapping maps fold any position onto the grid; others reject out-of-range cells.
    pub fn normalize(&self, pos: Pos) -> Option<Pos> {
        if self.wrapping {
            Some(pos.wrapped(self.width, self.height))
        } else if self.in_bounds(pos) {
            Some(pos)
        } else {
            None
        }
    }

    pub fn distance(&self, a: Pos, b: Pos) -> u32 {
        if self.wrapping {
            a.wrapped_heuristic_distance(b, self.width, self.height)
        } else {
            a.heuristic_distance(b)
        }
    }

    pub fn is_next_to(&self, a: Pos, b: Pos) -> bool {
        if self.wrapping { a.is_next_to_wrapped(b, self.width, self.height) } else { a.is_next_to(b) }
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        let pos = self.normalize(pos)?;
        Some((pos.y as usize) * self.width + (pos.x as usize))
    }

    fn index_or_panic(&self, pos: Pos) -> usize {
        self.index(pos).unwrap_or_else(|| {
            invariant_violation(format_args!(
                "{pos:?} outside {}x{} floor",
                self.width, self.height
            ))
        })
    }

    pub fn tile_by_layer(&self, layer: Layer, pos: Pos) -> Option<TileIndex> {
        self.index(pos).and_then(|idx| self.layers[layer.slot()][idx])
    }

    pub fn set_tile_by_layer(&mut self, layer: Layer, pos: Pos, index: TileIndex) {
        let idx = self.index_or_panic(pos);
        self.layers[layer.slot()][idx] = Some(index);
    }

    pub fn unset_tile_by_layer(&mut self, layer: Layer, pos: Pos) {
        let idx = self.index_or_panic(pos);
        self.layers[layer.slot()][idx] = None;
    }

    /// Highest non-empty layer at `pos`, or `None` for a cell with no data.
    pub fn top_tile_index(&self, pos: Pos) -> Option<TileIndex> {
        Layer::TOP_DOWN.iter().find_map(|layer| self.tile_by_layer(*layer, pos))
    }

    pub fn top_tile(&self, pos: Pos) -> Option<&TileDef> {
        self.top_tile_index(pos).and_then(|index| self.tiles.get(index))
    }

    /// Effective tile ignoring actor, avatar and effect sprites.
    pub fn terrain_tile(&self, pos: Pos) -> Option<&TileDef> {
        Layer::TERRAIN_TOP_DOWN
            .iter()
            .find_map(|layer| self.tile_by_layer(*layer, pos))
            .and_then(|index| self.tiles.get(index))
    }

    pub fn swap_tiles(&mut self, a: Pos, b: Pos) {
        let slot = Layer::Terrain.slot();
        let (ia, ib) = (self.index_or_panic(a), self.index_or_panic(b));
        self.layers[slot].swap(ia, ib);
    }

    pub fn clear_map_unit_tiles(&mut self) {
        self.layers[Layer::MapUnits.slot()].fill(None);
    }

    pub fn clear_layer(&mut self, layer: Layer) {
        self.layers[layer.slot()].fill(None);
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }
}

/// Floors of the location currently loaded by a controller.
#[derive(Clone, Debug, Default)]
pub struct LocationMaps {
    floors: BTreeMap<Floor, LayeredMap>,
}

impl LocationMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(floor: Floor, map: LayeredMap) -> Self {
        let mut maps = Self::new();
        maps.insert_floor(floor, map);
        maps
    }

    pub fn insert_floor(&mut self, floor: Floor, map: LayeredMap) {
        self.floors.insert(floor, map);
    }

    pub fn contains_floor(&self, floor: Floor) -> bool {
        self.floors.contains_key(&floor)
    }

    pub fn floor(&self, floor: Floor) -> Option<&LayeredMap> {
        self.floors.get(&floor)
    }

    pub fn floor_mut(&mut self, floor: Floor) -> Option<&mut LayeredMap> {
        self.floors.get_mut(&floor)
    }

    /// Actors may only reference floors that exist; anything else is corrupted state.
    pub fn floor_or_panic(&self, floor: Floor) -> &LayeredMap {
        self.floors.get(&floor).unwrap_or_else(|| {
            invariant_violation(format_args!("floor {floor} is not part of this location"))
        })
    }

    pub fn floor_mut_or_panic(&mut self, floor: Floor) -> &mut LayeredMap {
        self.floors.get_mut(&floor).unwrap_or_else(|| {
            invariant_violation(format_args!("floor {floor} is not part of this location"))
        })
    }

    pub fn floor_numbers(&self) -> impl Iterator<Item = Floor> + '_ {
        self.floors.keys().copied()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Floor, &mut LayeredMap)> {
        self.floors.iter_mut()
    }

    pub fn clear_map_unit_tiles(&mut self) {
        self.floors.values_mut().for_each(LayeredMap::clear_map_unit_tiles);
    }
}
