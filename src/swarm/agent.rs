use crate::cell::Cell;
use crate::config::FormationConfig;
use crate::unit::*;
use log::*;

/// A unit under formation control.
#[derive(Clone, Debug)]
pub struct Agent {
    unit: EntityId,
    /// Slot in the owning orbit's ring table.
    pub(crate) slot: usize,
    /// Absolute cell the unit should stand on.
    pub(crate) target_cell: Cell,
    pub(crate) priority: f64,
    /// Last cell the unit was seen on.
    pub(crate) position: Cell,
    pub(crate) attack_target: Option<EntityId>,
}

impl Agent {
    pub fn new(unit: EntityId, position: Cell, priority: f64) -> Agent {
        Agent {
            unit,
            slot: 0,
            target_cell: position,
            priority,
            position,
            attack_target: None,
        }
    }

    pub fn unit(&self) -> EntityId {
        self.unit
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn target_cell(&self) -> Cell {
        self.target_cell
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn attack_target(&self) -> Option<EntityId> {
        self.attack_target
    }

    /// Re-read the unit's cell from the world. Returns false if the unit is gone.
    pub fn refresh_position<W: UnitWorld>(&mut self, world: &W) -> bool {
        match world.living_entity(self.unit) {
            Some(entity) => {
                self.position = entity.cell();
                true
            }
            None => false,
        }
    }

    fn give_order<W: UnitWorld>(&self, world: &mut W, order: UnitOrder) {
        trace!("Order for {}: {:?} {}", self.unit, order.kind, order.cell);

        world.issue_order(self.unit, order);
    }

    /// Send the unit to `cell`, fighting through anything hostile on the way.
    pub fn smart_attack<W: UnitWorld>(&self, cell: Cell, world: &mut W) {
        let owner = match world.living_entity(self.unit) {
            Some(entity) => entity.owner(),
            None => return,
        };

        let order = smart_order(world, owner, cell);

        self.give_order(world, order);
    }

    /// Send the unit straight back to its slot.
    pub fn smart_move_to_target<W: UnitWorld>(&self, world: &mut W) {
        if world.living_entity(self.unit).is_none() {
            return;
        }

        self.give_order(world, UnitOrder::move_to(self.target_cell));
    }

    /// Resolve this tick's order for the unit. Returns true when the unit is
    /// standing on its target cell, or cannot be moved at all.
    pub fn on_every_tick<W: UnitWorld>(&mut self, world: &mut W, config: &FormationConfig) -> bool {
        let (cell, owner, idle) = match world.living_entity(self.unit) {
            Some(entity) if !entity.building_in_progress() => (entity.cell(), entity.owner(), entity.is_idle()),
            _ => return true,
        };

        self.position = cell;

        let distance = cell.distance_chebyshev(self.target_cell);

        if let Some(order) = self.focus_fire_order(&*world, cell, owner, distance, config) {
            self.give_order(world, order);

            return false;
        }

        if distance == 0 {
            return true;
        }

        if distance > config.lost_distance {
            self.give_order(world, UnitOrder::move_to(self.target_cell));
        } else if idle {
            let order = smart_order(&*world, owner, self.target_cell);

            self.give_order(world, order);
        }

        false
    }

    fn focus_fire_order<W: UnitWorld>(
        &mut self,
        world: &W,
        cell: Cell,
        owner: OwnerId,
        distance_to_slot: u32,
        config: &FormationConfig,
    ) -> Option<UnitOrder> {
        let target_id = self.attack_target?;
        let target = world.living_entity(target_id)?;

        if target.owner() == owner {
            self.attack_target = None;

            return None;
        }

        let me = world.entity(self.unit)?;

        if !me.can_attack(target) {
            return None;
        }

        let target_cell = target.cell();

        if cell.distance_chebyshev(target_cell) < config.focus_fire_range && distance_to_slot < config.cohesion_range {
            Some(UnitOrder::attack(target_cell))
        } else {
            None
        }
    }
}

/// Move onto a cell held by a friendly unit, attack-move anywhere else.
pub fn smart_order<W: UnitWorld>(world: &W, owner: OwnerId, cell: Cell) -> UnitOrder {
    match world.upper_unit(cell) {
        Some(occupant) if !world.are_hostile(owner, occupant.owner()) => UnitOrder::move_to(cell),
        _ => UnitOrder::attack(cell),
    }
}
