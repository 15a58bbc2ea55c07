use crate::unit::*;

pub fn swordsman_profile() -> CombatProfile {
    CombatProfile {
        main_armament: Some(Armament { range: 1.0, damage: 6.0 }),
        speed: 10.0,
        max_health: 120.0,
        armor: 4.0,
        flags: UnitFlags::empty(),
    }
}

pub fn archer_profile() -> CombatProfile {
    CombatProfile {
        main_armament: Some(Armament { range: 6.0, damage: 4.0 }),
        speed: 10.0,
        max_health: 80.0,
        armor: 1.0,
        flags: UnitFlags::empty(),
    }
}

pub fn worker_profile() -> CombatProfile {
    CombatProfile {
        main_armament: Some(Armament { range: 1.0, damage: 1.0 }),
        speed: 9.0,
        max_health: 60.0,
        armor: 0.0,
        flags: UnitFlags::HARVESTER,
    }
}

pub fn tower_profile() -> CombatProfile {
    CombatProfile {
        main_armament: Some(Armament { range: 7.0, damage: 10.0 }),
        speed: 0.0,
        max_health: 400.0,
        armor: 6.0,
        flags: UnitFlags::BUILDING,
    }
}
