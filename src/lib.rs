#![warn(clippy::all)]

pub mod cell;
pub mod config;
pub mod logging;
pub mod sim;
pub mod swarm;
pub mod unit;

pub use crate::cell::Cell;
pub use crate::config::FormationConfig;
pub use crate::swarm::{Formation, FormationCenter, FormationOrder, UpdateSchedule};
pub use crate::unit::{EntityId, MobileEntity, UnitWorld};
