use crate::cell::Cell;
use bitflags::*;
use ::serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a host-owned mobile entity. Formations only ever store handles and
/// resolve them through [`UnitWorld::entity`] when they need the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Faction/settlement identity of an entity's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

/// Identity of a unit configuration. Entities sharing an archetype share a
/// combat profile, so derived scores are cached by this key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeId(pub String);

impl From<&str> for ArchetypeId {
    fn from(uid: &str) -> Self {
        ArchetypeId(uid.to_string())
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct UnitFlags: u8 {
        /// Static structure (towers, totems, barracks).
        const BUILDING = 1;
        /// Producer or worker that should be kept out of the fighting.
        const HARVESTER = 1 << 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Armament {
    pub range: f64,
    pub damage: f64,
}

/// Combat stats of an archetype, as reported by the host content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatProfile {
    pub main_armament: Option<Armament>,
    /// Movement speed on open ground.
    pub speed: f64,
    pub max_health: f64,
    pub armor: f64,
    #[serde(default)]
    pub flags: UnitFlags,
}

impl CombatProfile {
    pub fn is_combat(&self) -> bool {
        self.main_armament.is_some() && !self.flags.intersects(UnitFlags::BUILDING | UnitFlags::HARVESTER)
    }
}

/// The kind of command handed to the host engine for a single unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Plain move, ignoring anything met on the way.
    MoveToPoint,
    /// Attack-move: walk to the cell and fight whatever blocks the way.
    Attack,
}

/// A point order issued to one unit. Every order replaces the unit's current
/// order queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitOrder {
    pub kind: OrderKind,
    pub cell: Cell,
}

impl UnitOrder {
    pub fn move_to(cell: Cell) -> Self {
        UnitOrder {
            kind: OrderKind::MoveToPoint,
            cell,
        }
    }

    pub fn attack(cell: Cell) -> Self {
        UnitOrder {
            kind: OrderKind::Attack,
            cell,
        }
    }
}

/// Read view of a single host entity.
pub trait MobileEntity {
    fn id(&self) -> EntityId;

    fn cell(&self) -> Cell;

    fn owner(&self) -> OwnerId;

    /// True when the unit has no order in progress.
    fn is_idle(&self) -> bool;

    fn is_dead(&self) -> bool;

    /// Structures still being raised must not be ordered around.
    fn building_in_progress(&self) -> bool {
        false
    }

    fn archetype(&self) -> ArchetypeId;

    fn combat_profile(&self) -> CombatProfile;

    /// Whether this unit's weapon is able to hit `target` at all.
    fn can_attack(&self, target: &dyn MobileEntity) -> bool;
}

/// The host engine as seen by a formation: entity lookup, spatial queries and
/// the order sink.
pub trait UnitWorld {
    type Entity: MobileEntity;

    fn entity(&self, id: EntityId) -> Option<&Self::Entity>;

    /// The topmost entity standing on `cell`, if any.
    fn upper_unit(&self, cell: Cell) -> Option<&Self::Entity>;

    fn are_hostile(&self, a: OwnerId, b: OwnerId) -> bool;

    fn issue_order(&mut self, id: EntityId, order: UnitOrder);

    /// Called when a unit leaves formation control.
    fn release_unit(&mut self, _id: EntityId) {}

    /// Entity lookup that treats dead entities as gone.
    fn living_entity(&self, id: EntityId) -> Option<&Self::Entity> {
        self.entity(id).filter(|e| !e.is_dead())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_profile_classification() {
        let mut profile = CombatProfile {
            main_armament: Some(Armament { range: 1.0, damage: 5.0 }),
            speed: 10.0,
            max_health: 100.0,
            armor: 2.0,
            flags: UnitFlags::empty(),
        };
        assert!(profile.is_combat());

        profile.flags = UnitFlags::HARVESTER;
        assert!(!profile.is_combat());

        profile.flags = UnitFlags::BUILDING;
        assert!(!profile.is_combat());

        profile.flags = UnitFlags::empty();
        profile.main_armament = None;
        assert!(!profile.is_combat());
    }
}
