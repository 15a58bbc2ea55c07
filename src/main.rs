use clap::Parser;
use log::*;
use std::fs;
use swarm_formation::cell::Cell;
use swarm_formation::config::FormationConfig;
use swarm_formation::logging;
use swarm_formation::sim::*;
use swarm_formation::swarm::*;
use swarm_formation::unit::*;

/// Drive one formation through a simulated match on an open grid.
#[derive(Parser, Debug)]
#[command(name = "swarm-sim")]
struct Args {
    /// JSON formation config. Defaults to the unit-tracking preset.
    #[arg(long)]
    config: Option<String>,

    /// Units joining the formation at the start.
    #[arg(long, default_value_t = 24)]
    units: u32,

    #[arg(long, default_value_t = 1000)]
    ticks: u32,

    /// Kill one formation unit every N ticks. Zero disables losses.
    #[arg(long, default_value_t = 0)]
    kill_every: u32,

    /// The center unit walks one cell every N ticks. Zero keeps it still.
    #[arg(long, default_value_t = 4)]
    hero_pace: u32,

    #[arg(short, long)]
    verbose: bool,
}

const HERO_OWNER: OwnerId = OwnerId(1);

fn load_config(path: Option<&str>) -> Result<FormationConfig, String> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("Failed to read config {}: {}", path, e))?;

            FormationConfig::from_json(&json)
        }
        None => Ok(FormationConfig::tracking()),
    }
}

fn spawn_army(world: &mut GridWorld, count: u32) -> Vec<EntityId> {
    (0..count as i32)
        .map(|i| {
            let cell = Cell::new(90 + i % 10, 110 + i / 10);

            match i % 6 {
                0 => world.spawn(HERO_OWNER, "worker", worker_profile(), cell),
                1 | 2 => world.spawn(HERO_OWNER, "archer", archer_profile(), cell),
                _ => world.spawn(HERO_OWNER, "swordsman", swordsman_profile(), cell),
            }
        })
        .collect()
}

fn next_victim(formation: &Formation, world: &GridWorld) -> Option<EntityId> {
    formation
        .orbits()
        .iter()
        .rev()
        .flat_map(|orbit| orbit.agents())
        .map(|agent| agent.unit())
        .find(|unit| world.living_entity(*unit).is_some())
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    logging::setup_logging(if args.verbose { logging::Debug } else { logging::Info })?;

    let config = load_config(args.config.as_deref())?;

    let mut world = GridWorld::new();
    let hero = world.spawn(HERO_OWNER, "hero", swordsman_profile(), Cell::new(100, 100));
    let units = spawn_army(&mut world, args.units);

    let mut formation = {
        let hero_unit = world.unit(hero).ok_or("Hero failed to spawn")?;

        Formation::around_unit(hero_unit, config, UpdateSchedule::shared())?
    };

    formation.add_units(&units, &world);

    info!(
        "Starting with {} units in {} orbits",
        formation.units_count(),
        formation.orbits().len()
    );

    for tick in 0..args.ticks {
        if args.hero_pace > 0 && tick % args.hero_pace == 0 {
            if let Some(hero_unit) = world.unit_mut(hero) {
                hero_unit.cell = hero_unit.cell + Cell::new(1, 0);
            }
        }

        if args.kill_every > 0 && tick > 0 && tick % args.kill_every == 0 {
            if let Some(victim) = next_victim(&formation, &world) {
                debug!("Killing {} at tick {}", victim, tick);
                world.kill(victim);
            }
        }

        formation.on_every_tick(tick, &mut world);
        world.step();
    }

    info!(
        "Finished {} ticks: {} units, {} reformations, center {}",
        args.ticks,
        formation.units_count(),
        formation.reformations(),
        formation.center_cell()
    );

    for (num, orbit) in formation.orbits().iter().enumerate() {
        let in_place = orbit
            .agents()
            .iter()
            .filter(|agent| {
                world
                    .living_entity(agent.unit())
                    .map(|unit| unit.cell == agent.target_cell())
                    .unwrap_or(false)
            })
            .count();

        info!(
            "Orbit {} (radius {}): {}/{} units, {} in place, {:?}",
            num,
            orbit.radius(),
            orbit.len(),
            orbit.max_agents(),
            in_place,
            orbit.state()
        );
    }

    Ok(())
}
