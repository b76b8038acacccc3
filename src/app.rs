//! Native window host.
//!
//! Wires winit events to the [`Engine`] and draws the resulting sprite
//! batch with the [`SpriteRenderer`]. The window keeps requesting redraws
//! for as long as the engine has a frame scheduled and the surface has an
//! area; a minimized window waits for the next resize.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SakuraConfig;
use crate::draw::SpriteBatch;
use crate::engine::{Engine, FrameOutcome};
use crate::error::SakuraError;
use crate::gpu::SpriteRenderer;
use crate::input::Input;
use crate::sprite::{SpriteLoader, SpriteSource};
use crate::time::{Clock, FrameTimer, SystemClock};

/// How often the event loop wakes to check on the sprite loader.
const LOADER_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Open a window and animate petals until it is closed.
pub fn run(config: SakuraConfig) -> Result<(), SakuraError> {
    let engine = Engine::new(config.clone())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, engine);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: SakuraConfig,
    engine: Engine,
    batch: SpriteBatch,
    input: Input,
    clock: SystemClock,
    timer: FrameTimer,
    loader: Option<SpriteLoader>,
    window: Option<Arc<Window>>,
    renderer: Option<SpriteRenderer>,
    error: Option<SakuraError>,
}

impl App {
    fn new(config: SakuraConfig, engine: Engine) -> Self {
        Self {
            batch: SpriteBatch::with_capacity(config.petal_count),
            config,
            engine,
            input: Input::new(),
            clock: SystemClock,
            timer: FrameTimer::new(),
            loader: None,
            window: None,
            renderer: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SakuraError) {
        log::error!("{}", err);
        self.engine.stop();
        self.error = Some(err);
        event_loop.exit();
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn poll_sprite(&mut self) {
        let Some(result) = self.loader.as_mut().and_then(SpriteLoader::poll) else {
            return;
        };
        self.loader = None;

        let uploaded = result.and_then(|sprite| match &mut self.renderer {
            Some(renderer) => renderer.set_sprite(&sprite),
            None => Ok(()),
        });
        match uploaded {
            Ok(()) => {
                self.engine.sprite_ready();
                self.request_redraw();
            }
            Err(e) => {
                self.engine.sprite_failed(&e);
                // Show the background even without petals
                self.request_redraw();
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let outcome = self.engine.render(&mut self.batch, self.clock.now_ms());

        if let Some(renderer) = &mut self.renderer {
            if outcome != FrameOutcome::Skipped {
                renderer.upload(self.batch.instances());
                match renderer.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, closing");
                        self.engine.stop();
                        event_loop.exit();
                        return;
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        if matches!(outcome, FrameOutcome::Drawn { .. }) && self.timer.update() {
            log::debug!(
                "{:.1} fps, frame {}, wind {:.4}, pointer {:.2}",
                self.timer.fps(),
                self.timer.frame(),
                self.engine.wind_direction(),
                self.engine.pointer_bias()
            );
        }

        if self.engine.needs_redraw() {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let renderer = pollster::block_on(SpriteRenderer::new(
            window.clone(),
            self.config.petal_count,
            self.config.window.background,
        ));
        match renderer {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        let size = window.inner_size();
        self.engine.init(size.width, size.height);
        self.loader = Some(SpriteLoader::spawn(
            SpriteSource::from(self.config.sprite.clone()),
            self.config.sprite_filter,
        ));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = self.input.handle_event(&event) {
            self.engine.touch_handler(&pointer);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.engine.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.engine
                    .resize_canvas(physical_size.width, physical_size.height);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                // Restarts the loop after a minimize
                if self.engine.needs_redraw() {
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_sprite();

        // Only wake up on a timer while the sprite is still on its way;
        // the animation itself is driven by redraw requests.
        if self.loader.as_ref().is_some_and(SpriteLoader::is_pending) {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                Instant::now() + LOADER_POLL_INTERVAL,
            ));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.stop();
    }
}
