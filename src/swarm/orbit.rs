use super::agent::*;
use super::ring::*;
use super::schedule::*;
use crate::cell::Cell;
use crate::config::FormationConfig;
use crate::unit::*;
use itertools::*;
use std::num::NonZeroU32;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitState {
    /// Units hold their slots; strays are nudged back.
    Idle,
    /// Units are walking to freshly computed slots.
    Offset,
    /// Center or roster changed, slots must be recomputed before any order.
    ChangedCenter,
}

/// One square ring of slots around the formation center.
#[derive(Debug)]
pub struct Orbit {
    radius: NonZeroU32,
    cells_count: usize,
    max_agents: usize,
    /// Ring offsets relative to the center, indexed by slot.
    cells: Vec<Cell>,
    /// Agents in ring order.
    agents: Vec<Agent>,
    center: Cell,
    state: OrbitState,
    update_tact: u32,
    schedule: Rc<UpdateSchedule>,
    attack_target: Option<EntityId>,
}

impl Orbit {
    pub fn new(radius: NonZeroU32, density: f64, center: Cell, schedule: &Rc<UpdateSchedule>) -> Orbit {
        let cells_count = ring_cells_count(radius);

        Orbit {
            radius,
            cells_count,
            max_agents: (cells_count as f64 * density).floor() as usize,
            cells: ring_offsets(radius),
            agents: Vec::new(),
            center,
            state: OrbitState::Idle,
            update_tact: schedule.register_orbit(),
            schedule: schedule.clone(),
            attack_target: None,
        }
    }

    pub fn radius(&self) -> NonZeroU32 {
        self.radius
    }

    pub fn cells_count(&self) -> usize {
        self.cells_count
    }

    pub fn max_agents(&self) -> usize {
        self.max_agents
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn center(&self) -> Cell {
        self.center
    }

    pub fn state(&self) -> OrbitState {
        self.state
    }

    pub fn update_tact(&self) -> u32 {
        self.update_tact
    }

    pub fn attack_target(&self) -> Option<EntityId> {
        self.attack_target
    }

    pub fn contains(&self, unit: EntityId) -> Option<usize> {
        self.agents.iter().position(|agent| agent.unit() == unit)
    }

    fn slot_cell(&self, slot: usize) -> Cell {
        self.center + self.cells[slot]
    }

    fn refresh_target_cells(&mut self) {
        let center = self.center;

        for agent in self.agents.iter_mut() {
            agent.target_cell = center + self.cells[agent.slot];
        }
    }

    /// Space every agent evenly around the ring, the first one on `start_slot`.
    fn respace_from(&mut self, start_slot: usize) {
        if self.agents.is_empty() {
            return;
        }

        let step = self.cells_count as f64 / self.agents.len() as f64;

        for (num, agent) in self.agents.iter_mut().enumerate() {
            agent.slot = spaced_slot(start_slot, step * num as f64, self.cells_count);
        }
    }

    fn structure_changed(&mut self) {
        self.refresh_target_cells();
        self.state = OrbitState::ChangedCenter;
    }

    pub fn add_agents(&mut self, agents: Vec<Agent>) {
        if agents.is_empty() {
            return;
        }

        if self.agents.len() > 2 {
            for agent in agents {
                self.add_agent(agent);
            }
        } else {
            let target = self.attack_target;

            self.agents.extend(agents.into_iter().map(|mut agent| {
                agent.attack_target = target;
                agent
            }));
            self.respace_from(0);
            self.structure_changed();
        }
    }

    /// Insert one agent between the two agents whose slots lie closest to the
    /// unit's current position, then re-space the ring around it.
    pub fn add_agent(&mut self, mut agent: Agent) {
        agent.attack_target = self.attack_target;

        if self.agents.len() <= 2 {
            self.agents.push(agent);
            self.respace_from(0);
            self.structure_changed();

            return;
        }

        let relative = agent.position - self.center;

        let mut near = (usize::MAX, f64::MAX);
        let mut second = (usize::MAX, f64::MAX);

        for (num, other) in self.agents.iter().enumerate() {
            let distance = relative.distance_l2(self.cells[other.slot]);

            if distance < near.1 {
                second = near;
                near = (num, distance);
            } else if distance < second.1 {
                second = (num, distance);
            }
        }

        let (near, second) = (near.0, second.0);

        agent.slot = arc_midpoint(self.agents[near].slot, self.agents[second].slot, self.cells_count);
        agent.target_cell = self.slot_cell(agent.slot);

        // First and last agents are ring neighbours too.
        let index = if near.abs_diff(second) == self.agents.len() - 1 {
            self.agents.len()
        } else {
            near.min(second) + 1
        };

        let in_slot = agent.slot;
        self.agents.insert(index, agent);

        let len = self.agents.len();
        let step = self.cells_count as f64 / len as f64;

        for k in 1..len {
            self.agents[(index + k) % len].slot = spaced_slot(in_slot, step * k as f64, self.cells_count);
        }

        self.structure_changed();
    }

    pub fn remove_agent(&mut self, index: usize) -> Option<Agent> {
        self.remove_agents(vec![index]).pop()
    }

    /// Remove agents by sequence index and re-space the survivors starting from
    /// the first survivor's slot. Returns the removed agents.
    pub fn remove_agents(&mut self, indices: Vec<usize>) -> Vec<Agent> {
        let len = self.agents.len();

        let removed = indices
            .into_iter()
            .filter(|index| *index < len)
            .sorted_unstable_by(|a, b| b.cmp(a))
            .dedup()
            .map(|index| self.agents.remove(index))
            .collect::<Vec<_>>();

        if let Some(start_slot) = self.agents.first().map(|agent| agent.slot) {
            self.respace_from(start_slot);
        }

        self.structure_changed();

        removed
    }

    /// Extract every agent from the ring.
    pub fn take_agents(&mut self) -> Vec<Agent> {
        self.remove_agents((0..self.agents.len()).collect())
            .into_iter()
            .rev()
            .collect()
    }

    /// Move the ring. Setting the same center again changes nothing.
    pub fn set_center(&mut self, center: Cell) {
        if center != self.center {
            self.center = center;
            self.structure_changed();
        }
    }

    pub fn set_attack_target(&mut self, target: Option<EntityId>) {
        self.attack_target = target;

        for agent in self.agents.iter_mut() {
            agent.attack_target = target;
        }
    }

    /// Attack-move every agent to its own slot around `cell`.
    pub fn smart_attack_cell<W: UnitWorld>(&mut self, cell: Cell, world: &mut W) {
        self.set_attack_target(None);

        for agent in self.agents.iter() {
            agent.smart_attack(cell + self.cells[agent.slot], world);
        }
    }

    pub fn smart_move_to_target<W: UnitWorld>(&mut self, world: &mut W) {
        self.set_attack_target(None);

        for agent in self.agents.iter() {
            agent.smart_move_to_target(world);
        }
    }

    /// Sequence indices of agents whose unit is dead or gone.
    pub fn dead_agents<W: UnitWorld>(&self, world: &W) -> Vec<usize> {
        self.agents
            .iter()
            .positions(|agent| world.living_entity(agent.unit()).is_none())
            .collect()
    }

    /// Drop the focus-fire target once it died or turned friendly.
    fn refresh_attack_target<W: UnitWorld>(&mut self, world: &W) {
        let target_id = match self.attack_target {
            Some(target_id) => target_id,
            None => return,
        };

        let stale = match world.living_entity(target_id) {
            None => true,
            Some(target) => self
                .agents
                .first()
                .and_then(|agent| world.entity(agent.unit()))
                .map(|entity| entity.owner() == target.owner())
                .unwrap_or(false),
        };

        if stale {
            self.set_attack_target(None);
        }
    }

    fn move_to_target_cells<W: UnitWorld>(&mut self, world: &mut W, config: &FormationConfig) -> bool {
        let mut reached = true;

        for agent in self.agents.iter_mut() {
            reached &= agent.on_every_tick(world, config);
        }

        reached
    }

    /// Run the orbit if this tick is its tact. Returns true if it ran.
    pub fn on_every_tick<W: UnitWorld>(&mut self, tick: u32, center: Cell, world: &mut W, config: &FormationConfig) -> bool {
        if !self.schedule.is_due(tick, self.update_tact) {
            return false;
        }

        self.set_center(center);
        self.refresh_attack_target(&*world);

        match self.state {
            OrbitState::Idle => {
                self.move_to_target_cells(world, config);
            }
            OrbitState::Offset => {
                if self.move_to_target_cells(world, config) {
                    self.state = OrbitState::Idle;
                }
            }
            OrbitState::ChangedCenter => {
                self.refresh_target_cells();
                self.state = OrbitState::Offset;
            }
        }

        true
    }
}
