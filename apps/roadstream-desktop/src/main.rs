use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use roadstream_driver::{DriveConfig, FrameDriver};
use roadstream_input::{Action, Key};
use roadstream_render::{Clock, Scene, SystemClock};
use roadstream_render_wgpu::WgpuScene;
use roadstream_tools::WorldInspector;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "roadstream-desktop", about = "Drive the endless night road")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML drive configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,
}

fn map_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
        WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
        WinitKey::Character(text) => Key::from_text(text),
        _ => Key::Other,
    }
}

/// Window, surface and device creation.
fn init_scene(window: Arc<Window>) -> Result<WgpuScene> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let surface = instance
        .create_surface(window.clone())
        .context("create surface")?;
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .context("no suitable GPU adapter")?;
    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("roadstream_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
        },
        None,
    ))
    .context("create device")?;

    tracing::info!(
        "GPU initialized with {} backend",
        adapter.get_info().backend.to_str()
    );
    let size = window.inner_size();
    Ok(WgpuScene::new(
        surface,
        &adapter,
        device,
        queue,
        size.width,
        size.height,
    ))
}

fn draw_hud(ctx: &EguiContext, driver: &FrameDriver) {
    let summary = WorldInspector::summary(driver.world());
    let stats = driver.last_stats();
    let costs = driver.costs();

    egui::Window::new("Road")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Seed: {}  Tick: {}", driver.seed(), summary.tick));
            ui.label(format!(
                "Vehicle: {:.0} driven, z={:.1} x={:.2} lane={}",
                summary.distance,
                summary.vehicle_z,
                summary.vehicle_x,
                summary.lane.index()
            ));
            match (summary.road_start, summary.frontier) {
                (Some(start), Some(end)) => ui.label(format!("Road: [{start:.0}, {end:.0})")),
                _ => ui.label("Road: empty"),
            };
            if let Some(current) = WorldInspector::segment_at(driver.world(), summary.vehicle_z) {
                ui.label(format!("Under vehicle: {current}"));
            }
            ui.separator();

            let c = &summary.counts;
            ui.label(format!("Entities: {}", c.total()));
            ui.label(format!(
                "segments {}  buildings {}  decorations {}",
                c.road_segments, c.buildings, c.decorations
            ));
            ui.label(format!(
                "walkers {}  crossers {}  lamps {}",
                c.sidewalk_pedestrians, c.crosswalk_pedestrians, c.street_lamps
            ));
            ui.separator();

            ui.label(format!(
                "Frame: +{} -{} entities, {} events",
                stats.stream.entities_spawned,
                stats.stream.entities_evicted(),
                stats.events
            ));
            ui.label(format!(
                "Timed decorations: {} drops",
                driver.decorations_timer().fired()
            ));
            if stats.stream.budget_exhausted {
                ui.colored_label(egui::Color32::YELLOW, "segment budget exhausted");
            }
            ui.label(format!(
                "Stream cost ({} frames): avg {:.2} ms, max {:.2} ms",
                costs.count(),
                costs.average_duration().as_secs_f64() * 1000.0,
                costs.max_duration().as_secs_f64() * 1000.0
            ));
            ui.label(format!(
                "Entities touched: avg {:.1}, max {}",
                costs.average_entities(),
                costs.max_entities()
            ));
            ui.separator();
            ui.small("Left/A, Right/D: change lane | F1: HUD | Esc: quit");
        });
}

struct Overlay {
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    config: DriveConfig,
    clock: SystemClock,
    show_hud: bool,
    window: Option<Arc<Window>>,
    scene: Option<WgpuScene>,
    driver: Option<FrameDriver>,
    overlay: Option<Overlay>,
}

impl GpuApp {
    fn new(config: DriveConfig) -> Self {
        Self {
            config,
            clock: SystemClock::new(),
            show_hud: true,
            window: None,
            scene: None,
            driver: None,
            overlay: None,
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: &WinitKey) {
        match key {
            WinitKey::Named(NamedKey::Escape) => event_loop.exit(),
            WinitKey::Named(NamedKey::F1) => self.show_hud = !self.show_hud,
            _ => {
                if let (Some(action), Some(driver)) =
                    (Action::from_key(map_key(key)), self.driver.as_mut())
                {
                    tracing::debug!(?action, "input");
                    driver.apply(action);
                }
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(window), Some(scene), Some(driver), Some(overlay)) = (
            self.window.as_ref(),
            self.scene.as_mut(),
            self.driver.as_mut(),
            self.overlay.as_mut(),
        ) else {
            return;
        };

        driver.tick(scene, self.clock.elapsed_secs());

        let raw_input = overlay.winit.take_egui_input(window);
        let show_hud = self.show_hud;
        let full_output = overlay.ctx.run(raw_input, |ctx| {
            if show_hud {
                draw_hud(ctx, driver);
            }
        });
        overlay
            .winit
            .handle_platform_output(window, full_output.platform_output);
        let paint_jobs = overlay
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = scene.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let egui_renderer = &mut overlay.renderer;
        scene.present(|device, queue, view| {
            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
            let extra = egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        });

        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Roadstream")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let mut scene = match init_scene(window.clone()) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::error!("failed to initialise GPU: {e:#}");
                event_loop.exit();
                return;
            }
        };

        let ctx = EguiContext::default();
        let overlay = Overlay {
            winit: egui_winit::State::new(
                ctx.clone(),
                egui::ViewportId::ROOT,
                &window,
                Some(window.scale_factor() as f32),
                None,
                None,
            ),
            renderer: egui_wgpu::Renderer::new(
                scene.device(),
                scene.surface_format(),
                None,
                1,
                false,
            ),
            ctx,
        };

        let driver = FrameDriver::new(self.config.clone(), &mut scene);
        tracing::info!(seed = driver.seed(), nodes = scene.node_count(), "road ready");

        self.window = Some(window);
        self.scene = Some(scene);
        self.driver = Some(driver);
        self.overlay = Some(overlay);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(overlay), Some(window)) = (self.overlay.as_mut(), self.window.as_ref()) {
            if overlay.winit.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(scene), Some(driver)) = (self.scene.as_mut(), self.driver.as_ref()) {
                    driver.resize(scene, size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, &logical_key),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => DriveConfig::load(path)?,
        None => DriveConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    tracing::info!("roadstream-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
