use crate::unit::*;
use shrinkwraprs::*;
use std::collections::HashMap;

/// Score given to units that must stay in the protected inner orbits:
/// unarmed units, workers and structures.
pub const NON_COMBAT_PRIORITY: f64 = 100_000.0;

/// Orbit placement score of an archetype. Higher scores end up closer to the
/// center: long range and low effective durability keep a unit inside, short
/// range and high durability push it to the front line.
pub fn archetype_priority(profile: &CombatProfile) -> f64 {
    let armament = match profile.main_armament {
        Some(armament) if profile.is_combat() && armament.damage > 0.0 => armament,
        _ => return NON_COMBAT_PRIORITY,
    };

    100.0 * armament.range - 10.0 * profile.speed - profile.max_health * profile.armor / armament.damage
}

/// Scores memoised per archetype for the lifetime of one formation.
#[derive(Shrinkwrap, Default, Debug)]
#[shrinkwrap(mutable)]
pub struct PriorityCache(pub HashMap<ArchetypeId, f64>);

impl PriorityCache {
    pub fn priority_of<E: MobileEntity + ?Sized>(&mut self, entity: &E) -> f64 {
        *self
            .0
            .entry(entity.archetype())
            .or_insert_with(|| archetype_priority(&entity.combat_profile()))
    }
}
