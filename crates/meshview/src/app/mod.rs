//! Application window, event loop and video compositing.

mod input;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use meshview_core::{AssetCatalog, MeshviewError, Result, ViewerOptions};
use meshview_render::{
    prepare_frame, GpuContext, GpuTextureUploader, SharedSurface, ViewerContext, Viewport,
};
use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

pub use input::InputTranslator;

use crate::assets::{compile_object_set, load_object_set};
use crate::video::{open_frame_source, FrameSource, Playback};
use crate::viewer::{ViewerHandle, ViewerTask};

/// Events sent to the event loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The viewer thread left its loop.
    ViewerStopped,
}

/// What to show.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory scanned for meshes.
    pub asset_dir: PathBuf,
    /// Video for the right viewport. Defaults to `video_file_name` inside `asset_dir`.
    pub video: Option<PathBuf>,
    pub options: ViewerOptions,
}

/// Opens the window and runs until the user quits or something fails.
///
/// Startup problems (bad directory, no meshes, unreadable video) are reported before any
/// window is created.
pub fn run(config: RunConfig) -> Result<()> {
    let RunConfig {
        asset_dir,
        video,
        options,
    } = config;
    options.validate()?;

    let catalog = AssetCatalog::scan(&asset_dir, &options.mesh_extension)?;
    let video_path = video.unwrap_or_else(|| catalog.sibling(&options.video_file_name));
    let source = open_frame_source(&video_path)?;

    let event_loop = EventLoop::<AppEvent>::with_user_event()
        .build()
        .map_err(|e| MeshviewError::Render(format!("failed to create event loop: {e}")))?;
    let mut compositor = Compositor::new(catalog, options, source, event_loop.create_proxy());
    event_loop
        .run_app(&mut compositor)
        .map_err(|e| MeshviewError::Render(format!("event loop failed: {e}")))?;

    compositor.finish()
}

/// Owns the window and surface, plays the video, and supervises the viewer thread.
struct Compositor {
    catalog: AssetCatalog,
    options: ViewerOptions,
    playback: Playback<Box<dyn FrameSource>>,
    proxy: EventLoopProxy<AppEvent>,
    input: InputTranslator,
    viewer: Option<ViewerHandle>,
    surface: Option<Arc<SharedSurface>>,
    gpu: Option<GpuContext>,
    window: Option<Arc<Window>>,
    video_viewport: Viewport,
    frame_period: Duration,
    next_frame_at: Instant,
    frames_shown: u64,
    error: Option<MeshviewError>,
}

impl Compositor {
    fn new(
        catalog: AssetCatalog,
        options: ViewerOptions,
        source: Box<dyn FrameSource>,
        proxy: EventLoopProxy<AppEvent>,
    ) -> Self {
        let video_viewport = Viewport::new(
            options.viewer_width,
            0,
            options.video_width(),
            options.window_height,
        );
        let frame_period = Duration::from_secs_f64(1.0 / f64::from(options.video_fps));
        Self {
            catalog,
            options,
            playback: Playback::new(source),
            proxy,
            input: InputTranslator::new(),
            viewer: None,
            surface: None,
            gpu: None,
            window: None,
            video_viewport,
            frame_period,
            next_frame_at: Instant::now(),
            frames_shown: 0,
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let options = &self.options;
        let (width, height) = (options.window_width, options.window_height);

        let attributes = Window::default_attributes()
            .with_title("meshview")
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| MeshviewError::Render(format!("failed to create window: {e}")))?,
        );

        let (gpu, surface) = GpuContext::new_windowed(Arc::clone(&window)).block_on()?;
        let surface = Arc::new(SharedSurface::new(&gpu, surface, width, height)?);

        let (viewer_viewport, video_viewport) =
            Viewport::split_columns(width, height, options.viewer_width);
        let context = ViewerContext::new(
            &gpu,
            viewer_viewport.width,
            viewer_viewport.height,
            surface.composite_format(),
            options.background_color,
        );

        let mut textures = GpuTextureUploader::new(Arc::clone(&gpu.device), Arc::clone(&gpu.queue));
        let loaded = load_object_set(&self.catalog, options, &mut textures)?;
        let objects = compile_object_set(&context, loaded, options.default_color);

        let viewer = ViewerTask {
            objects,
            textures,
            context,
            options: options.clone(),
            surface: Arc::clone(&surface),
            viewport: viewer_viewport,
        }
        .spawn(self.proxy.clone())?;

        self.video_viewport = video_viewport;
        self.viewer = Some(viewer);
        self.surface = Some(surface);
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.next_frame_at = Instant::now();
        Ok(())
    }

    /// Decodes the next video frame into the right viewport and presents.
    fn show_next_frame(&mut self) -> Result<()> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };
        let frame = self.playback.next_frame()?;
        let region = self.video_viewport;
        let image = prepare_frame(&frame, region.width, region.height)?;
        surface.write_pixels(region, &image)?;
        surface.present()?;
        self.frames_shown += 1;
        Ok(())
    }

    fn record_error(&mut self, error: MeshviewError) {
        if self.error.is_none() {
            self.error = Some(error);
        } else {
            log::error!("{error}");
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: MeshviewError) {
        log::error!("{error}");
        self.record_error(error);
        event_loop.exit();
    }

    /// Stops the viewer, then releases the surface, the device and the window in that order.
    fn shutdown(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            if let Err(e) = viewer.shutdown() {
                self.record_error(e);
            }
        }
        self.surface = None;
        self.gpu = None;
        if self.window.take().is_some() {
            log::info!(
                "shut down after {} video frames ({} loops)",
                self.frames_shown,
                self.playback.loops()
            );
        }
    }

    fn finish(mut self) -> Result<()> {
        self.shutdown();
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler<AppEvent> for Compositor {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(input) = self.input.translate(&event) else {
            return;
        };
        let delivered = self.viewer.as_ref().is_some_and(|viewer| viewer.send(input));
        if !delivered && matches!(event, WindowEvent::CloseRequested) {
            // Nobody left to route the quit through.
            event_loop.exit();
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::ViewerStopped => {
                log::debug!("viewer stopped, closing window");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_none() || event_loop.exiting() {
            return;
        }

        let now = Instant::now();
        if now >= self.next_frame_at {
            if let Err(e) = self.show_next_frame() {
                self.fail(event_loop, e);
                return;
            }
            self.next_frame_at += self.frame_period;
            if self.next_frame_at < now {
                self.next_frame_at = now + self.frame_period;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame_at));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
