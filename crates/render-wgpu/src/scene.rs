use glam::Vec3;
use roadstream_common::{RenderHandle, Transform};
use roadstream_render::{Environment, RenderView, Scene, SceneNode};

use crate::camera::ChaseCamera;
use crate::gpu::WgpuRenderer;
use crate::graph::SceneGraph;

/// [`Scene`] backed by a wgpu surface.
///
/// `submit` draws the scene into the next surface texture but leaves it
/// unpresented, so an overlay (the HUD) can be painted on top through
/// [`WgpuScene::present`]. A frame left unpresented is presented by the next
/// `submit`.
pub struct WgpuScene {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    graph: SceneGraph,
    camera: ChaseCamera,
    environment: Environment,
    pending: Option<wgpu::SurfaceTexture>,
}

impl WgpuScene {
    /// Configure `surface` for the given size and build the renderer.
    pub fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
        width: u32,
        height: u32,
    ) -> Self {
        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let mut camera = ChaseCamera::default();
        camera.set_viewport(config.width, config.height);

        tracing::info!(?format, width = config.width, height = config.height, "wgpu scene ready");

        Self {
            surface,
            device,
            queue,
            config,
            renderer,
            graph: SceneGraph::new(),
            camera,
            environment: Environment::default(),
            pending: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.renderer.surface_format()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Paint `overlay` over the submitted frame, then present it.
    pub fn present(
        &mut self,
        overlay: impl FnOnce(&wgpu::Device, &wgpu::Queue, &wgpu::TextureView),
    ) {
        let Some(frame) = self.pending.take() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        overlay(&self.device, &self.queue, &view);
        frame.present();
    }

    fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(t) => Some(t),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        }
    }
}

impl Scene for WgpuScene {
    fn add(&mut self, parent: Option<&RenderHandle>, node: &SceneNode) -> RenderHandle {
        self.graph.add(parent, node)
    }

    fn remove(&mut self, handle: RenderHandle) {
        self.graph.remove(handle);
    }

    fn set_transform(&mut self, handle: &RenderHandle, transform: Transform) {
        self.graph.set_transform(handle, transform);
    }

    fn set_light_intensity(&mut self, handle: &RenderHandle, intensity: f32) {
        self.graph.set_light_intensity(handle, intensity);
    }

    fn set_opacity(&mut self, handle: &RenderHandle, opacity: f32) {
        self.graph.set_opacity(handle, opacity);
    }

    fn set_view(&mut self, view: RenderView) {
        self.camera.apply(view);
    }

    fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    fn shift_origin(&mut self, offset: Vec3) {
        self.graph.shift_roots(offset);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.pending = None;
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
        self.camera.set_viewport(self.config.width, self.config.height);
    }

    fn submit(&mut self) {
        if let Some(previous) = self.pending.take() {
            previous.present();
        }
        let Some(frame) = self.acquire() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let data = self.graph.flatten();
        self.renderer.render(
            &self.device,
            &self.queue,
            &view,
            &self.camera,
            &self.environment,
            &data,
        );
        self.pending = Some(frame);
    }

    fn node_count(&self) -> usize {
        self.graph.len()
    }
}
