//! Windowed game loop.
//!
//! winit drives one update + render cycle per `RedrawRequested`. The level is
//! generated before the loop starts; the loop itself stays idle until the
//! wall texture has finished loading.

use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::generator::Level;
use crate::input::{Action, SharedInput};
use crate::movement;
use crate::raycaster::Renderer;
use crate::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut, internal_size};
use crate::surface::FrameBuffer;
use crate::texture::{PendingTexture, Texture};
use crate::weapon::Weapon;

/// True when a key event should fire the weapon: the first press only,
/// never auto-repeat or release.
pub fn fires_on(code: KeyCode, state: ElementState, repeat: bool) -> bool {
    action_for(code) == Some(Action::Fire) && state == ElementState::Pressed && !repeat
}

/// Maps a physical key to the action it drives.
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Action::Forward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Action::Backward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Action::RotateLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Action::RotateRight),
        KeyCode::Space => Some(Action::Fire),
        _ => None,
    }
}

enum TextureState {
    Loading(PendingTexture),
    Ready(Arc<dyn Texture>),
}

struct App {
    config: GameConfig,
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    init_failed: bool,

    level: Level,
    camera: Camera,
    texture: TextureState,
    weapon: Weapon,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal low-res buffer
    fb: FrameBuffer,
    renderer: Renderer,
    scale_lut: ScaleLut,

    // Input
    input: SharedInput,
}

impl App {
    fn new(config: GameConfig, level: Level) -> Self {
        let (x, y) = level.spawn_point();
        let camera = Camera::new([x, y], config.render.plane_length);
        let texture = TextureState::Loading(PendingTexture::spawn(config.texture_path.clone()));
        let weapon = Weapon::new(config.fire_revert());
        let renderer = Renderer::new(config.render.settings());

        Self {
            config,
            window: None,
            surface: None,
            init_failed: false,
            level,
            camera,
            texture,
            weapon,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            fb: FrameBuffer::new(0, 0),
            renderer,
            scale_lut: ScaleLut::empty(),
            input: SharedInput::new(),
        }
    }

    /// Returns the texture once loading has finished.
    fn ready_texture(&mut self) -> Option<Arc<dyn Texture>> {
        if let TextureState::Loading(pending) = &self.texture {
            let tex = pending.poll_or_fallback()?;
            self.texture = TextureState::Ready(tex);
        }
        match &self.texture {
            TextureState::Ready(tex) => Some(Arc::clone(tex)),
            TextureState::Loading(_) => None,
        }
    }

    fn tick(&mut self) {
        let input = self.input.snapshot();
        self.camera = movement::update(
            &self.camera,
            input,
            self.config.movement.speeds(),
            &self.level.grid,
        );
    }

    fn rebuild_internal_fb_and_lut(&mut self, dst_w: usize, dst_h: usize) {
        let (w, h) = internal_size(dst_w, dst_h, self.config.window.internal_height);
        self.fb.resize(w, h);
        self.scale_lut = build_scale_lut(dst_w, dst_h, w, h);
        tracing::debug!(dst_w, dst_h, internal_w = w, internal_h = h, "framebuffer rebuilt");
    }

    fn redraw(&mut self, id: WindowId) {
        let Some(texture) = self.ready_texture() else {
            return;
        };

        self.tick();

        let Some(window) = self.window.as_ref().filter(|w| w.id() == id) else {
            return;
        };
        let size = window.inner_size();
        let (Some(nw), Some(nh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return; // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);
        if self.scale_lut.dst_size() != (dw, dh) {
            self.rebuild_internal_fb_and_lut(dw, dh);
        }

        self.renderer
            .render(&mut self.fb, &self.level.grid, &self.camera, texture.as_ref());
        self.weapon.draw(&mut self.fb);

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Err(e) = surface.resize(nw, nh) {
            tracing::warn!(error = %e, "surface resize failed");
            return;
        }
        let mut buf = match surface.buffer_mut() {
            Ok(buf) => buf,
            Err(e) => {
                tracing::warn!(error = %e, "failed to map surface buffer");
                return;
            }
        };
        blit_nearest_stretch(&mut buf, dw, &self.fb.pixels, &self.scale_lut);
        if let Err(e) = buf.present() {
            tracing::warn!(error = %e, "present failed");
        }

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_counter as f32 / elapsed;
            tracing::debug!(fps, x = self.camera.pos[0], y = self.camera.pos[1], "frame stats");
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window -- exiting");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                tracing::error!(error = %e, "failed to create softbuffer surface -- exiting");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.rebuild_internal_fb_and_lut(size.width as usize, size.height as usize);
        tracing::info!(width = size.width, height = size.height, "window created");

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested -- shutting down");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                    return;
                }
                if fires_on(code, state, repeat) {
                    self.weapon.fire();
                }
                if let Some(action) = action_for(code) {
                    match state {
                        ElementState::Pressed => self.input.press(action),
                        ElementState::Released => self.input.release(action),
                    }
                }
            }

            WindowEvent::RedrawRequested => self.redraw(id),

            WindowEvent::Resized(new_size) => {
                let (dw, dh) = (new_size.width as usize, new_size.height as usize);
                self.rebuild_internal_fb_and_lut(dw, dh);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Opens the window and runs the game until it is closed.
pub fn run(config: GameConfig, level: Level) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    // Frames are paced by redraw requests, one per display refresh.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, level);
    event_loop.run_app(&mut app)?;

    if app.init_failed {
        anyhow::bail!("failed to initialize window (see logs for details)");
    }
    Ok(())
}
