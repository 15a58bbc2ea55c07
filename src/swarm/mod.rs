pub mod agent;
pub mod formation;
pub mod orbit;
pub mod priority;
pub mod ring;
pub mod schedule;

pub use agent::Agent;
pub use formation::{Formation, FormationCenter, FormationOrder};
pub use orbit::{Orbit, OrbitState};
pub use priority::{archetype_priority, PriorityCache, NON_COMBAT_PRIORITY};
pub use schedule::UpdateSchedule;
