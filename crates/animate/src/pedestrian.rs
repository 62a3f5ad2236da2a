use roadstream_kernel::{CrosswalkPedestrian, SidewalkPedestrian};

use crate::AnimConfig;

/// Advance a sidewalk pedestrian and wrap it back into the window around the
/// vehicle at `vehicle_z`. Returns true if it wrapped.
pub fn step_sidewalk(walker: &mut SidewalkPedestrian, vehicle_z: f32, config: &AnimConfig) -> bool {
    let z = &mut walker.position.z;
    *z += walker.speed * walker.direction;
    if *z > vehicle_z + config.walk_ahead {
        *z = vehicle_z - config.walk_behind;
        true
    } else if *z < vehicle_z - config.walk_behind {
        *z = vehicle_z + config.respawn_ahead;
        true
    } else {
        false
    }
}

/// Advance a crossing pedestrian. Returns true once it has left the road and
/// should be removed.
pub fn step_crossing(crosser: &mut CrosswalkPedestrian, config: &AnimConfig) -> bool {
    if crosser.waiting {
        return false;
    }
    crosser.position.x += crosser.direction * crosser.speed;
    crosser.position.x.abs() > config.crossing_half_width
}

/// Vertical walking bob at `t_ms` milliseconds since start.
pub fn bob_height(t_ms: f32, config: &AnimConfig) -> f32 {
    (t_ms * config.bob_rate).sin().abs() * config.bob_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use roadstream_common::RenderHandle;

    fn walker(z: f32, speed: f32, direction: f32) -> SidewalkPedestrian {
        SidewalkPedestrian {
            position: Vec3::new(4.0, 0.0, z),
            side: 1.0,
            speed,
            direction,
            handle: RenderHandle::from_raw(0),
        }
    }

    fn crosser(x: f32, direction: f32, speed: f32) -> CrosswalkPedestrian {
        CrosswalkPedestrian {
            position: Vec3::new(x, 0.0, 25.0),
            direction,
            speed,
            waiting: false,
            handle: RenderHandle::from_raw(0),
        }
    }

    #[test]
    fn walker_moves_along_its_direction() {
        let config = AnimConfig::default();
        let mut w = walker(100.0, 0.05, -1.0);
        assert!(!step_sidewalk(&mut w, 100.0, &config));
        assert_relative_eq!(w.position.z, 99.95);
    }

    #[test]
    fn walker_ahead_of_window_wraps_behind() {
        let config = AnimConfig::default();
        let mut w = walker(299.99, 0.05, 1.0);
        assert!(step_sidewalk(&mut w, 100.0, &config));
        assert_eq!(w.position.z, 60.0);
    }

    #[test]
    fn walker_behind_window_wraps_ahead() {
        let config = AnimConfig::default();
        let mut w = walker(60.01, 0.05, -1.0);
        assert!(step_sidewalk(&mut w, 100.0, &config));
        assert_eq!(w.position.z, 280.0);
    }

    #[test]
    fn crossing_ends_when_leaving_the_road() {
        let config = AnimConfig::default();
        let mut c = crosser(3.5, -1.0, 0.04);
        let mut steps = 0;
        while !step_crossing(&mut c, &config) {
            assert!(c.position.x.abs() <= 3.5);
            steps += 1;
            assert!(steps < 1000, "never left the road");
        }
        assert!(c.position.x < -3.5);
        // 7 units of road at 0.04 per frame
        assert!((174..=176).contains(&steps), "{steps} steps");
    }

    #[test]
    fn waiting_pedestrian_stays_put() {
        let config = AnimConfig::default();
        let mut c = crosser(3.5, -1.0, 0.04);
        c.waiting = true;
        for _ in 0..10 {
            assert!(!step_crossing(&mut c, &config));
        }
        assert_eq!(c.position.x, 3.5);
    }

    #[test]
    fn bob_is_bounded_and_non_negative() {
        let config = AnimConfig::default();
        for i in 0..1000 {
            let h = bob_height(i as f32 * 7.0, &config);
            assert!((0.0..=0.1).contains(&h));
        }
        assert_relative_eq!(bob_height(50.0 * std::f32::consts::PI, &config), 0.1, epsilon = 1e-5);
    }
}
