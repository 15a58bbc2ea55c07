use std::cell::Cell as Counter;
use std::rc::Rc;

/// Orbits sharing one update tact.
pub const ORBITS_PER_TACT: u32 = 4;

/// Staggers orbit processing across ticks. Every orbit created against the same
/// schedule gets a tact; an orbit runs on ticks where
/// `tick % period == tact`, and the period grows so that roughly
/// `ORBITS_PER_TACT` orbits share each tact.
///
/// One schedule is shared by every formation of a match.
#[derive(Debug, Default)]
pub struct UpdateSchedule {
    created_orbits: Counter<u32>,
    period: Counter<u32>,
}

impl UpdateSchedule {
    pub fn shared() -> Rc<UpdateSchedule> {
        Rc::new(UpdateSchedule::default())
    }

    /// Assign the tact for a newly created orbit.
    pub fn register_orbit(&self) -> u32 {
        let created = self.created_orbits.get();

        // round(created / 4) with halves rounded up.
        let tact = (created + ORBITS_PER_TACT / 2) / ORBITS_PER_TACT;

        self.created_orbits.set(created + 1);
        self.period.set(self.period.get().max(tact + 1));

        tact
    }

    pub fn period(&self) -> u32 {
        self.period.get().max(1)
    }

    pub fn created_orbits(&self) -> u32 {
        self.created_orbits.get()
    }

    pub fn is_due(&self, tick: u32, tact: u32) -> bool {
        tick % self.period() == tact
    }
}
