use std::f64::consts::TAU;

use roadstream_kernel::{LightMode, StreetLamp};
use roadstream_procgen::pool_transform;
use roadstream_render::Scene;

const POOL_OPACITY: f32 = 0.5;
const PULSE_AMPLITUDE: f32 = 0.1;

/// Light intensity of a blinking lamp at time `t` (seconds): fully on while
/// `sin(t * frequency)` is positive, off otherwise.
pub fn blink_intensity(frequency: f32, t: f32) -> f32 {
    if (t * frequency).sin() > 0.0 { 1.0 } else { 0.0 }
}

/// Offset applied to the light pool's scale and opacity at time `t`.
pub fn pool_pulse(frequency: f32, t: f32) -> f32 {
    PULSE_AMPLITUDE * (t * frequency * 2.0).sin()
}

/// Drive one lamp's light and light pool for `elapsed` seconds since start.
///
/// Only blinking lamps change intensity; every lamp's pool pulses. The time
/// is reduced to one blink period before narrowing to `f32`, so the phase
/// stays precise on long runs.
pub fn update_lamp(lamp: &mut StreetLamp, scene: &mut dyn Scene, elapsed: f64) {
    let t = (elapsed % (TAU / f64::from(lamp.frequency))) as f32;
    match lamp.mode {
        LightMode::Blinking => {
            lamp.intensity = blink_intensity(lamp.frequency, t);
            scene.set_light_intensity(&lamp.handles.light, lamp.intensity);
        }
        LightMode::AlwaysOn | LightMode::AlwaysOff => {}
    }

    let pulse = pool_pulse(lamp.frequency, t);
    scene.set_transform(&lamp.handles.pool, pool_transform(1.0 + pulse));
    scene.set_opacity(&lamp.handles.pool, POOL_OPACITY + pulse);
}
