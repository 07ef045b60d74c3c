//! The mesh viewer task, running on its own thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use meshview_core::{
    CameraController, InputEvent, MeshviewError, ObjectSet, Result, ViewerCommand, ViewerOptions,
};
use meshview_render::{
    FrameUniforms, GpuTextureUploader, Renderable, SharedSurface, ViewerContext, Viewport,
};
use winit::event_loop::EventLoopProxy;

use crate::app::AppEvent;

/// Everything the viewer thread owns.
///
/// Fields drop in order: bundles and textures go before the pipeline, and the shared
/// surface reference goes last.
pub struct ViewerTask {
    pub objects: ObjectSet<Renderable>,
    /// Keeps material textures alive as long as the renderables.
    pub textures: GpuTextureUploader,
    pub context: ViewerContext,
    pub options: ViewerOptions,
    pub surface: Arc<SharedSurface>,
    pub viewport: Viewport,
}

/// Whether the loop should keep going after draining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl ViewerTask {
    /// Starts the task on a thread named `meshview-viewer`.
    ///
    /// `proxy` receives [`AppEvent::ViewerStopped`] when the loop ends for any reason.
    pub fn spawn(self, proxy: EventLoopProxy<AppEvent>) -> Result<ViewerHandle> {
        let (sender, receiver) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let thread_cancel = Arc::clone(&cancel);

        let thread = std::thread::Builder::new()
            .name("meshview-viewer".to_string())
            .spawn(move || {
                let result = self.run(&receiver, &thread_cancel);
                if let Err(e) = &result {
                    log::error!("viewer stopped: {e}");
                }
                if proxy.send_event(AppEvent::ViewerStopped).is_err() {
                    log::debug!("event loop already closed");
                }
                result
            })
            .map_err(|e| MeshviewError::Task(format!("cannot spawn viewer thread: {e}")))?;

        Ok(ViewerHandle {
            thread: Some(thread),
            input: Some(sender),
            cancel,
        })
    }

    fn run(mut self, input: &Receiver<InputEvent>, cancel: &AtomicBool) -> Result<()> {
        let period = Duration::from_secs_f64(1.0 / f64::from(self.options.tick_rate));
        let mut controller = CameraController::new(&self.options.camera);
        let mut next_tick = Instant::now();
        log::info!(
            "viewer running at {} Hz with {} object(s) and {} texture(s)",
            self.options.tick_rate,
            self.objects.len(),
            self.textures.texture_count()
        );

        while !cancel.load(Ordering::Acquire) {
            if drain_input(input, &mut controller, &mut self.objects) == Flow::Quit {
                break;
            }
            self.render_tick(&controller)?;

            next_tick += period;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                // Fell behind; don't try to catch up.
                next_tick = now;
            }
        }

        log::info!("viewer loop finished");
        Ok(())
    }

    fn render_tick(&self, controller: &CameraController) -> Result<()> {
        let uniforms = FrameUniforms::new(controller.state(), &self.options);
        self.context.update_frame(&uniforms);

        let mut encoder =
            self.context
                .device()
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("viewer encoder"),
                });
        self.context.render(&mut encoder, Some(self.objects.active()));
        self.surface
            .copy_from_texture(&mut encoder, self.context.color_texture(), self.viewport)?;
        self.context
            .queue()
            .submit(std::iter::once(encoder.finish()));
        self.surface.present()?;
        Ok(())
    }
}

/// Applies every pending input event, without blocking.
///
/// A dropped sender counts as a quit request.
fn drain_input<T>(
    input: &Receiver<InputEvent>,
    controller: &mut CameraController,
    objects: &mut ObjectSet<T>,
) -> Flow {
    loop {
        let event = match input.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return Flow::Continue,
            Err(TryRecvError::Disconnected) => return Flow::Quit,
        };
        match controller.handle(event) {
            Some(ViewerCommand::NextObject) => {
                objects.next();
                log_active(objects);
            }
            Some(ViewerCommand::PreviousObject) => {
                objects.previous();
                log_active(objects);
            }
            Some(ViewerCommand::Quit) => return Flow::Quit,
            None => {}
        }
    }
}

fn log_active<T>(objects: &ObjectSet<T>) {
    log::info!(
        "showing object {}/{}",
        objects.active_index() + 1,
        objects.len()
    );
}

/// Supervision handle for a running [`ViewerTask`].
///
/// Dropping the handle stops the task and waits for it.
pub struct ViewerHandle {
    thread: Option<JoinHandle<Result<()>>>,
    input: Option<Sender<InputEvent>>,
    cancel: Arc<AtomicBool>,
}

impl ViewerHandle {
    /// Forwards an input event. Returns false once the task has stopped listening.
    pub fn send(&self, event: InputEvent) -> bool {
        self.input
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok())
    }

    /// Cancels the task and waits for it, returning its result.
    ///
    /// Calling this again after the first time returns `Ok(())`.
    pub fn shutdown(&mut self) -> Result<()> {
        self.cancel.store(true, Ordering::Release);
        self.input = None;
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        match thread.join() {
            Ok(result) => result,
            Err(_) => Err(MeshviewError::Task("viewer thread panicked".to_string())),
        }
    }
}

impl Drop for ViewerHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("{e}");
        }
    }
}
