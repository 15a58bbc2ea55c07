use swarm_formation::cell::Cell;
use swarm_formation::config::FormationConfig;
use swarm_formation::sim::*;
use swarm_formation::swarm::*;
use swarm_formation::unit::*;

const OWNER: OwnerId = OwnerId(7);

fn spawn_swordsmen(world: &mut GridWorld, count: i32) -> Vec<EntityId> {
    (0..count)
        .map(|i| world.spawn(OWNER, "swordsman", swordsman_profile(), Cell::new(40 + i, 60)))
        .collect()
}

fn spawn_row(world: &mut GridWorld, archetype: &str, profile: CombatProfile, count: i32, row: i32) -> Vec<EntityId> {
    (0..count)
        .map(|i| world.spawn(OWNER, archetype, profile.clone(), Cell::new(20 + i, row)))
        .collect()
}

fn formation_at(center: Cell) -> Formation {
    Formation::around_point(center, FormationConfig::target_point(), UpdateSchedule::shared()).unwrap()
}

fn slots(orbit: &Orbit) -> Vec<usize> {
    orbit.agents().iter().map(|agent| agent.slot()).collect()
}

#[test]
fn five_units_land_in_first_orbit_on_their_ring_cells() {
    let mut world = GridWorld::new();
    let center = Cell::new(50, 50);
    let mut formation = formation_at(center);
    let units = spawn_swordsmen(&mut world, 5);

    formation.add_units(&units, &world);

    assert_eq!(formation.orbits().len(), 1);
    let orbit = &formation.orbits()[0];
    assert_eq!(orbit.max_agents(), 8);
    assert_eq!(orbit.len(), 5);

    for agent in orbit.agents() {
        assert_eq!(agent.target_cell(), center + orbit.cells()[agent.slot()]);
    }
}

#[test]
fn overflow_creates_next_orbit() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let units = spawn_swordsmen(&mut world, 9);

    formation.add_units(&units[..8], &world);
    assert_eq!(formation.orbits().len(), 1);
    assert_eq!(formation.orbits()[0].len(), 8);

    formation.add_units(&units[8..], &world);

    assert_eq!(formation.orbits().len(), 2);
    let outer = &formation.orbits()[1];
    assert_eq!(outer.radius().get(), 4);
    assert_eq!(outer.len(), 1);
    assert_eq!(outer.agents()[0].unit(), units[8]);
    assert_eq!(formation.units_count(), 9);
}

#[test]
fn losses_in_one_pass_respace_survivors() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let units = spawn_swordsmen(&mut world, 8);
    formation.add_units(&units, &world);
    assert_eq!(slots(&formation.orbits()[0]), vec![0, 3, 6, 9, 12, 15, 18, 21]);
    assert_eq!(formation.reformation_tick(), None);

    for index in [0, 4, 6] {
        world.kill(formation.orbits()[0].agents()[index].unit());
    }

    formation.on_every_tick(0, &mut world);

    let orbit = &formation.orbits()[0];
    assert_eq!(orbit.len(), 5);
    assert_eq!(slots(orbit), vec![3, 8, 13, 17, 22]);
    assert_eq!(formation.reformation_tick(), Some(250));
}

#[test]
fn deaths_in_window_collapse_into_one_reformation() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let units = spawn_swordsmen(&mut world, 8);
    formation.add_units(&units, &world);

    for tick in 0..10 {
        formation.on_every_tick(tick, &mut world);
        world.step();
    }

    world.kill(units[2]);
    formation.on_every_tick(10, &mut world);
    world.step();

    assert_eq!(formation.units_count(), 7);
    assert!(!formation.contains(units[2]));
    assert_eq!(formation.reformation_tick(), Some(260));

    for tick in 11..260 {
        if tick == 100 {
            world.kill(units[5]);
        }

        formation.on_every_tick(tick, &mut world);
        world.step();
    }

    assert_eq!(formation.units_count(), 6);
    assert_eq!(formation.reformations(), 0);
    assert_eq!(formation.reformation_tick(), Some(260));

    formation.on_every_tick(260, &mut world);

    assert_eq!(formation.reformations(), 1);
    assert_eq!(formation.reformation_tick(), None);
    assert_eq!(formation.units_count(), 6);

    let orbit = &formation.orbits()[0];
    assert_eq!(slots(orbit), vec![0, 4, 8, 12, 16, 20]);
}

#[test]
fn repeated_set_center_is_a_no_op() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let units = spawn_swordsmen(&mut world, 2);
    formation.add_units(&units, &world);

    formation.on_every_tick(0, &mut world);
    assert_eq!(formation.orbits()[0].state(), OrbitState::Offset);

    formation.set_center(Cell::new(55, 50));
    assert_eq!(formation.orbits()[0].state(), OrbitState::ChangedCenter);
    formation.on_every_tick(1, &mut world);
    assert_eq!(formation.orbits()[0].state(), OrbitState::Offset);

    let targets: Vec<Cell> = formation.orbits()[0].agents().iter().map(|a| a.target_cell()).collect();

    formation.set_center(Cell::new(55, 50));

    assert_eq!(formation.orbits()[0].center(), Cell::new(55, 50));
    assert_eq!(formation.orbits()[0].state(), OrbitState::Offset);
    let after: Vec<Cell> = formation.orbits()[0].agents().iter().map(|a| a.target_cell()).collect();
    assert_eq!(targets, after);
}

#[test]
fn formation_settles_around_a_still_center() {
    let mut world = GridWorld::new();
    let center = Cell::new(50, 50);
    let mut formation = formation_at(center);
    let units = spawn_swordsmen(&mut world, 6);
    formation.add_units(&units, &world);

    for tick in 0..80 {
        formation.on_every_tick(tick, &mut world);
        world.step();
    }

    let orbit = &formation.orbits()[0];
    assert_eq!(orbit.state(), OrbitState::Idle);
    for agent in orbit.agents() {
        assert_eq!(world.unit(agent.unit()).unwrap().cell, agent.target_cell());
    }
}

#[test]
fn formations_share_one_update_schedule() {
    let mut world = GridWorld::new();
    let schedule = UpdateSchedule::shared();
    let mut first = Formation::around_point(Cell::new(0, 0), FormationConfig::target_point(), schedule.clone()).unwrap();
    let second = Formation::around_point(Cell::new(100, 0), FormationConfig::target_point(), schedule.clone()).unwrap();

    let units = spawn_swordsmen(&mut world, 30);
    first.add_units(&units, &world);

    let orbit_count = first.orbits().len() + second.orbits().len();
    assert_eq!(schedule.created_orbits() as usize, orbit_count);

    let tacts: Vec<u32> = first.orbits().iter().map(|orbit| orbit.update_tact()).collect();
    assert_eq!(tacts[0], 0);
    assert!(tacts.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(schedule.period(), tacts.last().unwrap() + 1);
}

#[test]
fn staggered_orbit_prunes_dead_on_its_own_tact() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let units = spawn_swordsmen(&mut world, 20);
    formation.add_units(&units, &world);

    let tacts: Vec<u32> = formation.orbits().iter().map(|orbit| orbit.update_tact()).collect();
    assert_eq!(tacts, vec![0, 0, 1]);

    for tick in 0..10 {
        formation.on_every_tick(tick, &mut world);
        world.step();
    }

    let victim = formation.orbits()[2].agents()[0].unit();
    world.kill(victim);

    formation.on_every_tick(10, &mut world);
    world.step();

    assert!(formation.contains(victim));
    assert_eq!(formation.reformation_tick(), None);

    formation.on_every_tick(11, &mut world);
    world.step();

    assert!(!formation.contains(victim));
    assert_eq!(formation.reformation_tick(), Some(261));

    for tick in 12..261 {
        formation.on_every_tick(tick, &mut world);
        world.step();
    }
    assert_eq!(formation.reformations(), 0);

    formation.on_every_tick(261, &mut world);

    assert_eq!(formation.reformations(), 1);
    assert_eq!(formation.units_count(), 19);
}

#[test]
fn reformation_regroups_survivors_by_tier() {
    let mut world = GridWorld::new();
    let mut formation = formation_at(Cell::new(50, 50));
    let workers = spawn_row(&mut world, "worker", worker_profile(), 2, 60);
    let archers = spawn_row(&mut world, "archer", archer_profile(), 4, 61);
    let swordsmen = spawn_row(&mut world, "swordsman", swordsman_profile(), 10, 62);

    let mut units = swordsmen.clone();
    units.extend(&archers);
    units.extend(&workers);
    formation.add_units(&units, &world);

    let occupancy: Vec<usize> = formation.orbits().iter().map(|orbit| orbit.len()).collect();
    assert_eq!(occupancy, vec![2, 4, 10]);

    for &unit in workers.iter().chain(&archers[..1]) {
        world.kill(unit);
    }

    for tick in 0..250 {
        formation.on_every_tick(tick, &mut world);
        world.step();
    }
    assert_eq!(formation.reformation_tick(), Some(250));

    formation.on_every_tick(250, &mut world);
    assert_eq!(formation.reformations(), 1);

    let occupancy: Vec<usize> = formation.orbits().iter().map(|orbit| orbit.len()).collect();
    assert_eq!(occupancy, vec![3, 10, 0]);

    let archer_score = archetype_priority(&archer_profile());
    let swordsman_score = archetype_priority(&swordsman_profile());
    assert!(formation.orbits()[0].agents().iter().all(|a| a.priority() == archer_score));
    assert!(formation.orbits()[1].agents().iter().all(|a| a.priority() == swordsman_score));

    for agent in formation.orbits().iter().flat_map(|orbit| orbit.agents()) {
        assert_eq!(world.unit(agent.unit()).unwrap().cell, agent.position());
    }
}
