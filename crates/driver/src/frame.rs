use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use roadstream_animate::{AnimStats, Animator};
use roadstream_common::{RenderHandle, Transform};
use roadstream_input::Action;
use roadstream_kernel::{InvariantBounds, InvariantViolation, World};
use roadstream_procgen::{generate_backdrop, timed_decorations, vehicle_body};
use roadstream_render::{RenderView, Scene};
use roadstream_stream::{CostHistory, FrameCost, StreamController, StreamStats, spawn_decoration};

use crate::config::DriveConfig;
use crate::timer::DecorationTimer;

const CAMERA_HEIGHT: f32 = 2.0;
const LOOK_AHEAD: f32 = 10.0;

/// Scene nodes that follow the vehicle instead of living in the world.
#[derive(Debug)]
struct Surroundings {
    vehicle: RenderHandle,
    vehicle_base: Transform,
    ground: RenderHandle,
    ground_base: Transform,
    sky: RenderHandle,
    sky_base: Transform,
    _lights: RenderHandle,
}

/// What one frame did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub tick: u64,
    pub stream: StreamStats,
    pub anim: AnimStats,
    /// Decorations added by the timer this frame.
    pub decorations_dropped: usize,
    /// World events produced this frame.
    pub events: usize,
    /// The local origin moved forward this frame.
    pub rebased: bool,
}

/// Owns the world and runs one frame at a time.
///
/// Steady state with no terminal condition: every `tick` moves the vehicle,
/// streams road in and out around it, animates what is alive and submits
/// the scene.
#[derive(Debug)]
pub struct FrameDriver {
    config: DriveConfig,
    seed: u64,
    world: World,
    rng: Pcg64,
    stream: StreamController,
    animator: Animator,
    timer: DecorationTimer,
    surroundings: Surroundings,
    costs: CostHistory,
    last: FrameStats,
    /// Panic from `tick` when an invariant breaks. On in debug builds.
    panic_on_violation: bool,
}

fn follow(base: &Transform, z: f32) -> Transform {
    Transform {
        position: base.position + Vec3::Z * z,
        ..*base
    }
}

impl FrameDriver {
    /// Build the backdrop and the initial road in `scene`.
    pub fn new(config: DriveConfig, scene: &mut dyn Scene) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut world = World::new(&config.vehicle);

        let backdrop = generate_backdrop(&config.generation, &mut rng);
        scene.set_environment(backdrop.environment);
        let body = vehicle_body();
        let surroundings = Surroundings {
            _lights: scene.add(None, &backdrop.lights),
            sky: scene.add(None, &backdrop.sky),
            sky_base: backdrop.sky.transform,
            ground: scene.add(None, &backdrop.ground),
            ground_base: backdrop.ground.transform,
            vehicle: scene.add(None, &body),
            vehicle_base: body.transform,
        };

        let mut stream = StreamController::new(config.stream.clone(), config.generation.clone());
        let spawned = stream.seed_initial(&mut world, scene, &mut rng);
        tracing::info!(seed, spawned, "world initialised");

        let mut driver = Self {
            animator: Animator::new(config.animation.clone()),
            timer: DecorationTimer::new(config.decoration_interval_ms),
            costs: CostHistory::new(config.cost_history),
            config,
            seed,
            world,
            rng,
            stream,
            surroundings,
            last: FrameStats::default(),
            panic_on_violation: cfg!(debug_assertions),
        };
        driver.follow_vehicle(scene);
        driver
    }

    fn follow_vehicle(&self, scene: &mut dyn Scene) {
        let vehicle = self.world.vehicle();
        let (x, z) = (vehicle.x(), vehicle.z());
        scene.set_view(RenderView {
            eye: Vec3::new(x, CAMERA_HEIGHT, z),
            target: Vec3::new(x, CAMERA_HEIGHT, z + LOOK_AHEAD),
            ..RenderView::default()
        });
        let s = &self.surroundings;
        let mut body = follow(&s.vehicle_base, z);
        body.position.x += x;
        scene.set_transform(&s.vehicle, body);
        scene.set_transform(&s.ground, follow(&s.ground_base, z));
        scene.set_transform(&s.sky, follow(&s.sky_base, z));
    }

    fn drop_decorations(&mut self, scene: &mut dyn Scene) -> usize {
        let z = self.world.vehicle().z() + self.config.decoration_ahead;
        let pair = timed_decorations(z, &mut self.rng);
        for decoration in pair {
            spawn_decoration(&mut self.world, scene, decoration);
        }
        tracing::debug!(z, "timed decorations");
        2
    }

    /// Leave invariant checking to the caller, e.g. to report violations as
    /// errors instead of panicking mid-frame.
    pub fn without_invariant_panics(mut self) -> Self {
        self.panic_on_violation = false;
        self
    }

    /// Shift the world and the scene back once the vehicle is far from the
    /// local origin. The shift is a whole number of segment lengths.
    fn rebase_if_far(&mut self, scene: &mut dyn Scene) -> bool {
        let z = self.world.vehicle().z();
        if z < self.config.rebase_distance {
            return false;
        }
        let length = self.config.generation.segment_length;
        let shift = (z / length).floor() * length;
        self.world.rebase(shift);
        scene.shift_origin(Vec3::Z * shift);
        tracing::debug!(shift, distance = self.world.distance(), "rebased local origin");
        true
    }

    /// Apply an input action. Takes effect on the next tick.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectLane(lane) => self.world.vehicle_mut().select_lane(lane),
        }
    }

    /// Run one frame. `elapsed` is the time since start in seconds.
    pub fn tick(&mut self, scene: &mut dyn Scene, elapsed: f64) -> &FrameStats {
        let vehicle = self.world.vehicle_mut();
        vehicle.advance();
        vehicle.ease_lateral();
        let rebased = self.rebase_if_far(scene);
        self.follow_vehicle(scene);

        let decorations_dropped = if self.timer.poll(elapsed) {
            self.drop_decorations(scene)
        } else {
            0
        };

        let stream = self
            .stream
            .update(&mut self.world, scene, &mut self.rng)
            .clone();
        let anim = self.animator.update(&mut self.world, scene, elapsed);
        scene.submit();

        let events = self.world.drain_events();
        for event in &events {
            tracing::trace!(?event, "world event");
        }
        self.world.step();

        if self.panic_on_violation && !stream.budget_exhausted {
            if let Err(violation) = self.check_invariants() {
                panic!("world invariant violated at tick {}: {violation}", self.world.tick());
            }
        }

        self.costs.record(FrameCost::from(&stream));
        self.last = FrameStats {
            tick: self.world.tick(),
            stream,
            anim,
            decorations_dropped,
            events: events.len(),
            rebased,
        };
        &self.last
    }

    pub fn resize(&self, scene: &mut dyn Scene, width: u32, height: u32) {
        scene.resize(width, height);
    }

    pub fn invariant_bounds(&self) -> InvariantBounds {
        InvariantBounds {
            segment_length: self.config.generation.segment_length,
            lookahead: self.config.stream.lookahead,
            segment_trailing: self.config.stream.segment_trailing,
            walk_behind: self.config.animation.walk_behind,
            walk_ahead: self.config.animation.walk_ahead,
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.world.check_invariants(&self.invariant_bounds())
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The seed actually in use, drawn from the OS if none was configured.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn costs(&self) -> &CostHistory {
        &self.costs
    }

    pub fn last_stats(&self) -> &FrameStats {
        &self.last
    }

    pub fn decorations_timer(&self) -> &DecorationTimer {
        &self.timer
    }
}
