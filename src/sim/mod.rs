//! In-memory host used by the `swarm-sim` binary and by tests. Units walk one
//! king move per step toward their current order and block each other.

mod profiles;

pub use self::profiles::*;

use crate::cell::Cell;
use crate::unit::*;
use log::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct SimUnit {
    pub id: EntityId,
    pub owner: OwnerId,
    pub archetype: ArchetypeId,
    pub profile: CombatProfile,
    pub cell: Cell,
    pub order: Option<UnitOrder>,
    pub dead: bool,
    pub building_in_progress: bool,
}

impl MobileEntity for SimUnit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn cell(&self) -> Cell {
        self.cell
    }

    fn owner(&self) -> OwnerId {
        self.owner
    }

    fn is_idle(&self) -> bool {
        self.order.is_none()
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn building_in_progress(&self) -> bool {
        self.building_in_progress
    }

    fn archetype(&self) -> ArchetypeId {
        self.archetype.clone()
    }

    fn combat_profile(&self) -> CombatProfile {
        self.profile.clone()
    }

    fn can_attack(&self, target: &dyn MobileEntity) -> bool {
        self.profile.main_armament.is_some() && !target.is_dead()
    }
}

#[derive(Debug, Default)]
pub struct GridWorld {
    units: BTreeMap<EntityId, SimUnit>,
    next_id: u32,
    order_log: Vec<(EntityId, UnitOrder)>,
    released: Vec<EntityId>,
}

impl GridWorld {
    pub fn new() -> GridWorld {
        GridWorld::default()
    }

    pub fn spawn(&mut self, owner: OwnerId, archetype: &str, profile: CombatProfile, cell: Cell) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        self.units.insert(
            id,
            SimUnit {
                id,
                owner,
                archetype: archetype.into(),
                profile,
                cell,
                order: None,
                dead: false,
                building_in_progress: false,
            },
        );

        id
    }

    pub fn unit(&self, id: EntityId) -> Option<&SimUnit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut SimUnit> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &SimUnit> {
        self.units.values()
    }

    pub fn living_count(&self) -> usize {
        self.units.values().filter(|unit| !unit.dead).count()
    }

    pub fn kill(&mut self, id: EntityId) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.dead = true;
            unit.order = None;
        }
    }

    pub fn order_log(&self) -> &[(EntityId, UnitOrder)] {
        &self.order_log
    }

    pub fn clear_order_log(&mut self) {
        self.order_log.clear();
    }

    pub fn last_order(&self, id: EntityId) -> Option<UnitOrder> {
        self.order_log
            .iter()
            .rev()
            .find(|(unit, _)| *unit == id)
            .map(|(_, order)| *order)
    }

    pub fn released(&self) -> &[EntityId] {
        &self.released
    }

    fn is_occupied(&self, cell: Cell) -> bool {
        self.units.values().any(|unit| !unit.dead && unit.cell == cell)
    }

    /// Advance every unit one step along its order.
    pub fn step(&mut self) {
        let ids: Vec<EntityId> = self.units.keys().copied().collect();

        for id in ids {
            let (cell, order) = match self.units.get(&id) {
                Some(unit) if !unit.dead => match unit.order {
                    Some(order) => (unit.cell, order),
                    None => continue,
                },
                _ => continue,
            };

            let next = cell.step_toward(order.cell);

            if next != cell && self.is_occupied(next) {
                continue;
            }

            if let Some(unit) = self.units.get_mut(&id) {
                unit.cell = next;

                if next == order.cell {
                    unit.order = None;
                }
            }
        }
    }
}

impl UnitWorld for GridWorld {
    type Entity = SimUnit;

    fn entity(&self, id: EntityId) -> Option<&SimUnit> {
        self.units.get(&id)
    }

    fn upper_unit(&self, cell: Cell) -> Option<&SimUnit> {
        self.units.values().find(|unit| !unit.dead && unit.cell == cell)
    }

    fn are_hostile(&self, a: OwnerId, b: OwnerId) -> bool {
        a != b
    }

    fn issue_order(&mut self, id: EntityId, order: UnitOrder) {
        match self.units.get_mut(&id) {
            Some(unit) if !unit.dead => {
                unit.order = if unit.cell == order.cell { None } else { Some(order) };
                self.order_log.push((id, order));
            }
            _ => debug!("Dropping order for missing unit {}", id),
        }
    }

    fn release_unit(&mut self, id: EntityId) {
        self.released.push(id);
    }
}
