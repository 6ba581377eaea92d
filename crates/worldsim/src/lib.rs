pub mod actor;
pub mod config;
pub mod controller;
pub mod date;
pub mod error;
pub mod map;
pub mod occupancy;
pub mod pathfinding;
pub mod reference;
pub mod rng;
pub mod schedule;
pub mod spawn;
pub mod tile;
pub mod types;
pub mod visibility;
pub mod world;

#[cfg(test)]
mod test_support;

pub use actor::{Actor, ActorDetails, ActorKind, AiType, EnemySpecies, NpcReference};
pub use config::{ConfigLoadError, LargeMapConfig, MONSTER_CAP, SimConfig, VisibilityConfig};
pub use controller::{
    LargeMapController, NpcController, ScheduleOutcome, SimEvent, SmallMapController, TurnContext,
    TurnReport,
};
pub use date::{GameDate, TimeOfDay};
pub use map::{Layer, LayeredMap, LocationMaps};
pub use reference::{ReferenceData, ReferenceLoadError};
pub use rng::{RngProvider, ScriptedRng, SeededRng};
pub use schedule::{Schedule, ScheduleEntry, ScheduleError};
pub use tile::{TileDef, TileTable};
pub use types::*;
pub use visibility::Lighting;
pub use world::{AvatarState, World};
