use serde::{Deserialize, Serialize};

/// Tunables for content generation. Distances are world units along +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    pub segment_length: f32,
    pub crosswalk_probability: f64,
    /// Distance between decoration slots on each sidewalk.
    pub decoration_spacing: f32,
    pub decoration_probability: f64,
    /// Distance between sidewalk pedestrian slots.
    pub pedestrian_spacing: f32,
    pub pedestrian_probability: f64,
    /// Distance between street lamps on each sidewalk. Zero disables lamps.
    pub lamp_spacing: f32,
    pub window_lit_probability: f64,
    pub star_count: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            segment_length: 50.0,
            crosswalk_probability: 0.2,
            decoration_spacing: 10.0,
            decoration_probability: 0.7,
            pedestrian_spacing: 5.0,
            pedestrian_probability: 0.1,
            lamp_spacing: 25.0,
            window_lit_probability: 0.7,
            star_count: 500,
        }
    }
}

impl GenConfig {
    /// Number of whole `spacing` slots that fit in one segment.
    pub fn slots(&self, spacing: f32) -> usize {
        if spacing <= 0.0 {
            return 0;
        }
        (self.segment_length / spacing).floor() as usize
    }
}
