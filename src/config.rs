use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

pub const DEFAULT_START_RADIUS: u32 = 3;
pub const DEFAULT_DENSITY: f64 = 1.0 / 3.0;
pub const DEFAULT_REFORMATION_DELAY: u32 = 250;
pub const DEFAULT_FOCUS_FIRE_RANGE: u32 = 2 * 14;
pub const DEFAULT_COHESION_RANGE: u32 = 2 * 12;

/// Distance past which a unit tracking a moving center is considered lost.
pub const TRACKING_LOST_DISTANCE: u32 = 8;
/// Point-centred formations are commanded across the map, so strays get more slack.
pub const TARGET_POINT_LOST_DISTANCE: u32 = 2 * 8;

/// Tunables for one formation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    /// Radius of the innermost orbit.
    pub start_radius: u32,
    /// Fraction of ring cells that may be occupied.
    pub density: f64,
    /// Units further than this from their slot get a direct move order.
    pub lost_distance: u32,
    /// Ticks between the first loss and the rebuild.
    pub reformation_delay: u32,
    /// Max distance from a unit to the focus-fire target.
    pub focus_fire_range: u32,
    /// Max distance from a unit to its slot while chasing the focus-fire target.
    pub cohesion_range: u32,
}

impl Default for FormationConfig {
    fn default() -> Self {
        FormationConfig::tracking()
    }
}

impl FormationConfig {
    /// Formation following a live center unit.
    pub fn tracking() -> Self {
        FormationConfig {
            start_radius: DEFAULT_START_RADIUS,
            density: DEFAULT_DENSITY,
            lost_distance: TRACKING_LOST_DISTANCE,
            reformation_delay: DEFAULT_REFORMATION_DELAY,
            focus_fire_range: DEFAULT_FOCUS_FIRE_RANGE,
            cohesion_range: DEFAULT_COHESION_RANGE,
        }
    }

    /// Formation around a free cell moved by the owner through `set_center`.
    pub fn target_point() -> Self {
        FormationConfig {
            lost_distance: TARGET_POINT_LOST_DISTANCE,
            ..FormationConfig::tracking()
        }
    }

    pub fn with_start_radius(mut self, start_radius: u32) -> Self {
        self.start_radius = start_radius;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: FormationConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.start_radius()?;

        if !(self.density > 0.0 && self.density <= 1.0) {
            return Err(format!("Orbit density must be in (0, 1], got {}", self.density));
        }

        if self.reformation_delay == 0 {
            return Err("Reformation delay must be at least one tick".to_string());
        }

        Ok(())
    }

    pub fn start_radius(&self) -> Result<NonZeroU32, String> {
        NonZeroU32::new(self.start_radius).ok_or_else(|| "Orbit radius must be at least 1".to_string())
    }
}
