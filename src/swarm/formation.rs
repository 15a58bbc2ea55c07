use super::agent::*;
use super::orbit::*;
use super::priority::*;
use super::schedule::*;
use crate::cell::Cell;
use crate::config::FormationConfig;
use crate::unit::*;
use log::*;
use std::num::NonZeroU32;
use std::rc::Rc;

/// What the formation is arranged around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationCenter {
    /// Follows a live unit; the center cell is re-read every tick.
    Unit(EntityId),
    /// A free cell moved only through `set_center`.
    Point,
}

/// Orders given to the formation as a whole by its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationOrder {
    Attack { cell: Cell },
    Cancel,
}

/// Concentric square orbits of units around a moving center.
///
/// Units are scored by archetype and distributed innermost-first; losses are
/// collected for `reformation_delay` ticks and then the whole formation is
/// rebuilt at once.
#[derive(Debug)]
pub struct Formation {
    center: FormationCenter,
    center_cell: Cell,
    config: FormationConfig,
    orbits: Vec<Orbit>,
    schedule: Rc<UpdateSchedule>,
    priorities: PriorityCache,
    reformation_tick: Option<u32>,
    reformations: u32,
    game_tick: u32,
}

impl Formation {
    fn new(center: FormationCenter, center_cell: Cell, config: FormationConfig, schedule: Rc<UpdateSchedule>) -> Result<Formation, String> {
        config.validate()?;

        let start_radius = config.start_radius()?;
        let first_orbit = Orbit::new(start_radius, config.density, center_cell, &schedule);

        Ok(Formation {
            center,
            center_cell,
            config,
            orbits: vec![first_orbit],
            schedule,
            priorities: PriorityCache::default(),
            reformation_tick: None,
            reformations: 0,
            game_tick: 0,
        })
    }

    /// Formation that follows `unit` around.
    pub fn around_unit<E: MobileEntity>(unit: &E, config: FormationConfig, schedule: Rc<UpdateSchedule>) -> Result<Formation, String> {
        Formation::new(FormationCenter::Unit(unit.id()), unit.cell(), config, schedule)
    }

    /// Formation around a free cell.
    pub fn around_point(cell: Cell, config: FormationConfig, schedule: Rc<UpdateSchedule>) -> Result<Formation, String> {
        Formation::new(FormationCenter::Point, cell, config, schedule)
    }

    pub fn center(&self) -> FormationCenter {
        self.center
    }

    pub fn center_cell(&self) -> Cell {
        self.center_cell
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    /// Tick at which the pending rebuild will run, if one is armed.
    pub fn reformation_tick(&self) -> Option<u32> {
        self.reformation_tick
    }

    /// Number of rebuilds performed so far.
    pub fn reformations(&self) -> u32 {
        self.reformations
    }

    pub fn units_count(&self) -> usize {
        self.orbits.iter().map(|orbit| orbit.len()).sum()
    }

    pub fn contains(&self, unit: EntityId) -> bool {
        self.orbits.iter().any(|orbit| orbit.contains(unit).is_some())
    }

    /// Join living units to the formation. Adding never schedules a rebuild.
    pub fn add_units<W: UnitWorld>(&mut self, units: &[EntityId], world: &W) {
        let mut agents = Vec::with_capacity(units.len());

        for &unit in units {
            if self.contains(unit) || agents.iter().any(|agent: &Agent| agent.unit() == unit) {
                warn!("Unit {} is already part of the formation", unit);
                continue;
            }

            match world.living_entity(unit) {
                Some(entity) => {
                    let priority = self.priorities.priority_of(entity);
                    agents.push(Agent::new(unit, entity.cell(), priority));
                }
                None => warn!("Ignoring dead or unknown unit {}", unit),
            }
        }

        self.add_agents(agents);
    }

    /// Take units out of formation control and hand them back to the host.
    pub fn remove_units<W: UnitWorld>(&mut self, units: &[EntityId], world: &mut W) {
        for &unit in units {
            let found = self
                .orbits
                .iter()
                .enumerate()
                .find_map(|(orbit_num, orbit)| orbit.contains(unit).map(|agent_num| (orbit_num, agent_num)));

            match found {
                Some((orbit_num, agent_num)) => {
                    self.orbits[orbit_num].remove_agent(agent_num);
                    world.release_unit(unit);
                }
                None => warn!("Unit {} is not part of the formation", unit),
            }
        }
    }

    fn push_orbit(&mut self) {
        let radius = self
            .orbits
            .last()
            .map(|orbit| orbit.radius().saturating_add(1))
            .unwrap_or(NonZeroU32::MIN);

        debug!("Creating orbit {} with radius {}", self.orbits.len(), radius);

        self.orbits
            .push(Orbit::new(radius, self.config.density, self.center_cell, &self.schedule));
    }

    /// Distribute agents innermost-first. The cursor moves outward when the
    /// current orbit is full or when the score changes, so each orbit holds a
    /// single tier.
    fn add_agents(&mut self, mut agents: Vec<Agent>) {
        if agents.is_empty() {
            return;
        }

        agents.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        let mut batches: Vec<Vec<Agent>> = self.orbits.iter().map(|_| Vec::new()).collect();
        let mut orbit_num = 0;
        let mut current_priority = agents[0].priority;

        for (agent_num, agent) in agents.into_iter().enumerate() {
            loop {
                let orbit = &self.orbits[orbit_num];
                let full = orbit.len() + batches[orbit_num].len() >= orbit.max_agents();
                let new_tier = agent_num > 0 && current_priority != agent.priority;

                if !full && !new_tier {
                    break;
                }

                current_priority = agent.priority;
                orbit_num += 1;

                if orbit_num == self.orbits.len() {
                    self.push_orbit();
                    batches.push(Vec::new());
                }
            }

            batches[orbit_num].push(agent);
        }

        for (orbit, batch) in self.orbits.iter_mut().zip(batches) {
            orbit.add_agents(batch);
        }
    }

    /// Pull every agent out and redistribute them from scratch.
    fn reform<W: UnitWorld>(&mut self, world: &W) {
        let mut agents: Vec<Agent> = self.orbits.iter_mut().flat_map(|orbit| orbit.take_agents()).collect();

        agents.retain_mut(|agent| agent.refresh_position(world));

        info!(
            "Reforming formation of {} units across {} orbits at tick {}",
            agents.len(),
            self.orbits.len(),
            self.game_tick
        );

        self.reformations += 1;
        self.add_agents(agents);
    }

    pub fn on_every_tick<W: UnitWorld>(&mut self, tick: u32, world: &mut W) {
        self.game_tick = tick;

        if let FormationCenter::Unit(center_unit) = self.center {
            if let Some(entity) = world.living_entity(center_unit) {
                self.center_cell = entity.cell();
            }
        }

        let center = self.center_cell;

        for (orbit_num, orbit) in self.orbits.iter_mut().enumerate() {
            if !orbit.on_every_tick(tick, center, world, &self.config) {
                continue;
            }

            let dead = orbit.dead_agents(&*world);

            if dead.is_empty() {
                continue;
            }

            debug!("Pruning {} dead units from orbit {} at tick {}", dead.len(), orbit_num, tick);

            orbit.remove_agents(dead);

            if self.reformation_tick.is_none() {
                self.reformation_tick = Some(tick.saturating_add(self.config.reformation_delay));
            }
        }

        if let Some(deadline) = self.reformation_tick {
            if tick >= deadline {
                self.reformation_tick = None;
                self.reform(&*world);
            }
        }
    }

    /// Move the formation center. A unit-centred formation picks its unit's
    /// cell up again on the next tick.
    pub fn set_center(&mut self, center: Cell) {
        self.center_cell = center;

        for orbit in self.orbits.iter_mut() {
            orbit.set_center(center);
        }
    }

    /// Focus every unit on `target`, or release the focus with `None`.
    pub fn set_attack_target(&mut self, target: Option<EntityId>) {
        for orbit in self.orbits.iter_mut() {
            orbit.set_attack_target(target);
        }
    }

    pub fn smart_attack_cell<W: UnitWorld>(&mut self, cell: Cell, world: &mut W) {
        for orbit in self.orbits.iter_mut() {
            orbit.smart_attack_cell(cell, world);
        }
    }

    pub fn smart_move_to_target<W: UnitWorld>(&mut self, world: &mut W) {
        for orbit in self.orbits.iter_mut() {
            orbit.smart_move_to_target(world);
        }
    }

    /// Route an order given to the formation owner.
    pub fn on_order<W: UnitWorld>(&mut self, order: FormationOrder, world: &mut W) {
        match order {
            FormationOrder::Attack { cell } => {
                let target = world.upper_unit(cell).map(|entity| entity.id());

                match target {
                    Some(target) => self.set_attack_target(Some(target)),
                    None => self.smart_attack_cell(cell, world),
                }
            }
            FormationOrder::Cancel => self.smart_move_to_target(world),
        }
    }
}
