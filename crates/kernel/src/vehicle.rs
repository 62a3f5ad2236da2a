use serde::{Deserialize, Serialize};

/// One of the two lanes the vehicle can drive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Lane 0, centred at x = -1.25.
    #[default]
    Left,
    /// Lane 1, centred at x = +1.25.
    Right,
}

impl Lane {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    pub fn center_x(self) -> f32 {
        match self {
            Self::Left => -1.25,
            Self::Right => 1.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Starting longitudinal position; the middle of the first segment.
    pub start_z: f32,
    pub start_lane: Lane,
    /// Units per frame.
    pub speed: f32,
    /// Added to the speed every frame.
    pub acceleration: f32,
    /// Fraction of the remaining lateral distance covered per frame.
    pub lateral_easing: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            start_z: 25.0,
            start_lane: Lane::Left,
            speed: 0.5,
            acceleration: 0.0,
            lateral_easing: 0.1,
        }
    }
}

/// The viewer. Moves forward every frame and eases toward its target lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    z: f32,
    x: f32,
    speed: f32,
    acceleration: f32,
    easing: f32,
    lane: Lane,
}

impl Vehicle {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            z: config.start_z,
            x: config.start_lane.center_x(),
            speed: config.speed,
            acceleration: config.acceleration,
            easing: config.lateral_easing,
            lane: config.start_lane,
        }
    }

    /// Place the vehicle at an explicit lateral offset, e.g. mid lane change.
    pub fn with_lateral(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    pub fn z(&self) -> f32 {
        self.z
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn target_x(&self) -> f32 {
        self.lane.center_x()
    }

    /// Last selection wins; takes effect through easing on the next frames.
    pub fn select_lane(&mut self, lane: Lane) {
        if lane != self.lane {
            tracing::debug!(from = self.lane.index(), to = lane.index(), "lane change");
        }
        self.lane = lane;
    }

    /// Ramp the speed and move forward. Speed never drops below zero, so `z`
    /// only decreases when the world is rebased.
    pub fn advance(&mut self) {
        self.speed = (self.speed + self.acceleration).max(0.0);
        self.z += self.speed;
    }

    /// Cover a fixed fraction of the remaining distance to the lane centre.
    pub fn ease_lateral(&mut self) {
        self.x += (self.target_x() - self.x) * self.easing;
    }

    pub(crate) fn shift_back(&mut self, dz: f32) {
        self.z -= dz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lanes_map_to_fixed_offsets() {
        assert_eq!(Lane::from_index(0), Some(Lane::Left));
        assert_eq!(Lane::from_index(1), Some(Lane::Right));
        assert_eq!(Lane::from_index(2), None);
        assert_eq!(Lane::Left.center_x(), -1.25);
        assert_eq!(Lane::Right.center_x(), 1.25);
        assert_eq!(Lane::Right.index(), 1);
    }

    #[test]
    fn starts_centred_in_configured_lane() {
        let v = Vehicle::new(&VehicleConfig::default());
        assert_eq!(v.z(), 25.0);
        assert_eq!(v.x(), -1.25);
        assert_eq!(v.speed(), 0.5);
    }

    #[test]
    fn one_frame_of_easing_from_the_other_lane() {
        let mut v = Vehicle::new(&VehicleConfig {
            start_z: 0.0,
            ..VehicleConfig::default()
        })
        .with_lateral(1.25);
        v.ease_lateral();
        assert_relative_eq!(v.x(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn easing_converges_within_one_percent_in_44_frames() {
        let mut v = Vehicle::new(&VehicleConfig::default()).with_lateral(1.25);
        let start_gap = (v.target_x() - v.x()).abs();
        for _ in 0..44 {
            v.ease_lateral();
        }
        let gap = (v.target_x() - v.x()).abs();
        assert!(gap < start_gap * 0.01, "gap {gap} after 44 frames");
        assert_ne!(v.x(), v.target_x());
    }

    #[test]
    fn easing_never_jumps_to_target() {
        let mut v = Vehicle::new(&VehicleConfig::default());
        v.select_lane(Lane::Right);
        v.ease_lateral();
        assert!(v.x() > -1.25 && v.x() < 1.25);
    }

    #[test]
    fn advance_applies_acceleration_and_stays_monotonic() {
        let mut v = Vehicle::new(&VehicleConfig {
            speed: 0.5,
            acceleration: 0.1,
            ..VehicleConfig::default()
        });
        v.advance();
        assert_relative_eq!(v.speed(), 0.6, epsilon = 1e-6);
        assert_relative_eq!(v.z(), 25.6, epsilon = 1e-4);

        let mut braking = Vehicle::new(&VehicleConfig {
            speed: 0.1,
            acceleration: -0.5,
            ..VehicleConfig::default()
        });
        let before = braking.z();
        braking.advance();
        assert_eq!(braking.speed(), 0.0);
        assert_eq!(braking.z(), before);
    }
}
