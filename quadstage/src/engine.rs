use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::Window,
};

use crate::{
    assets::BitmapLoader,
    error::{EngineError, EngineResult},
    facade::{AppFacade, BitmapLoad},
    gamepad::GamepadPump,
    input::{InputManager, Key},
    math::{Camera, Vec2},
    render::{DrawQuery, Frame, Renderer, UvRect, REFERENCE_VIEWPORT},
    scene::Scene,
    text::{TextLabel, TextManager},
    time::FpsCounter,
};

/// Frames skipped after the window comes back from being hidden.
const RESUME_WAIT_FRAMES: u32 = 10;

const FPS_LABEL: &str = "fps";

/// Configuration values for the engine window and runtime behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Directory bitmap paths are resolved against.
    pub asset_root: PathBuf,
    /// `env_logger` filter; `RUST_LOG` applies when unset.
    pub log_filter: Option<String>,
    /// Standard-layout gamepad button index for each key.
    pub gamepad_bindings: HashMap<Key, u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Quadstage".into(),
            width: REFERENCE_VIEWPORT.x as u32,
            height: REFERENCE_VIEWPORT.y as u32,
            vsync: true,
            asset_root: PathBuf::from("assets"),
            log_filter: None,
            gamepad_bindings: default_gamepad_bindings(),
        }
    }
}

fn default_gamepad_bindings() -> HashMap<Key, u32> {
    HashMap::from([
        (Key::Z, 0),
        (Key::X, 1),
        (Key::Shift, 4),
        (Key::Escape, 9),
        (Key::ArrowUp, 12),
        (Key::ArrowDown, 13),
        (Key::ArrowLeft, 14),
        (Key::ArrowRight, 15),
    ])
}

impl EngineConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Override the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Override the viewport size in logical pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Enable or disable vertical sync.
    #[must_use]
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    #[must_use]
    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_gamepad_binding(mut self, key: Key, button: u32) -> Self {
        self.gamepad_bindings.insert(key, button);
        self
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Runs the game from the loading screen until the window is closed.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn run(self) -> Result<()> {
        let config = self.config;

        let event_loop = EventLoop::new().map_err(EngineError::from)?;
        let mut window_attributes = Window::default_attributes();
        window_attributes.title = config.title.clone();
        window_attributes.inner_size = Some(LogicalSize::new(config.width, config.height).into());
        let window = event_loop
            .create_window(window_attributes)
            .map_err(EngineError::from)?;

        // The window lives until the process exits.
        let window: &'static Window = Box::leak(Box::new(window));

        let mut runtime = Runtime::new(window, config)?;
        window.request_redraw();

        event_loop.run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::KeyboardInput { event, .. } => runtime.input.handle_key(&event),
                WindowEvent::Focused(false) => runtime.input.clear_keyboard(),
                WindowEvent::Occluded(true) => runtime.fps.suspend(RESUME_WAIT_FRAMES),
                WindowEvent::Resized(new_size) => runtime.resize(new_size),
                WindowEvent::RedrawRequested => {
                    if let Err(err) = runtime.tick() {
                        log::error!("stopping after frame error: {err:?}");
                        elwt.exit();
                        return;
                    }
                    runtime.window.request_redraw();
                }
                _ => {}
            },
            _ => {}
        })?;

        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Everything the event loop owns between ticks.
struct Runtime<'window> {
    window: &'window Window,
    config: EngineConfig,
    renderer: Renderer<'window>,
    texts: TextManager,
    input: InputManager,
    gamepad: GamepadPump,
    loader: BitmapLoader,
    fps: FpsCounter,
    started: Instant,
    scene: Option<Scene>,
    fps_text: String,
}

impl<'window> Runtime<'window> {
    fn new(window: &'window Window, config: EngineConfig) -> EngineResult<Self> {
        let renderer = Renderer::new(window, config.vsync)?;
        let mut input = InputManager::with_bindings(&config.gamepad_bindings);
        let gamepad = GamepadPump::new();
        gamepad.announce_connected(&mut input);
        let loader = BitmapLoader::new(config.asset_root.clone());

        Ok(Self {
            window,
            renderer,
            texts: TextManager::new(),
            input,
            gamepad,
            loader,
            fps: FpsCounter::starting_at(0.0),
            started: Instant::now(),
            scene: None,
            fps_text: String::new(),
            config,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.renderer.resize(new_size);
        if new_size.height > 0 {
            self.texts
                .resize(new_size.height as f32 / REFERENCE_VIEWPORT.y);
        }
    }

    fn tick(&mut self) -> Result<()> {
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let Some(delta_time) = self.fps.update(now_ms) else {
            return Ok(());
        };
        self.refresh_fps_label();

        self.gamepad.poll(&mut self.input);
        self.input.update();
        self.loader.poll(&mut self.renderer);

        let Some(mut frame) = self.renderer.begin_frame()? else {
            return Ok(());
        };
        {
            let mut facade = EngineFacade {
                renderer: &mut self.renderer,
                frame: &mut frame,
                texts: &mut self.texts,
                input: &self.input,
                loader: &mut self.loader,
                viewport: self.config.viewport(),
            };
            let scene = match self.scene.take() {
                Some(scene) => scene,
                None => Scene::start(&mut facade),
            };
            self.scene = Some(scene.update(&mut facade, delta_time));
        }
        self.renderer.end_frame(frame)
    }

    /// Mirrors the fps label into the window title whenever it changes.
    fn refresh_fps_label(&mut self) {
        if self.fps.fps().is_none() {
            return;
        }
        let label = self.fps.label();
        if label == self.fps_text {
            return;
        }
        self.window
            .set_title(&format!("{} [{}]", self.config.title, label));
        self.texts
            .add(FPS_LABEL, TextLabel::bottom_right(label.clone(), 30.0, 10.0, 10.0));
        self.fps_text = label;
    }
}

/// [`AppFacade`] over the live renderer for the duration of one tick.
pub struct EngineFacade<'a, 'window> {
    renderer: &'a mut Renderer<'window>,
    frame: &'a mut Frame,
    texts: &'a mut TextManager,
    input: &'a InputManager,
    loader: &'a mut BitmapLoader,
    viewport: Vec2,
}

impl AppFacade for EngineFacade<'_, '_> {
    fn width(&self) -> f32 {
        self.viewport.x
    }

    fn height(&self) -> f32 {
        self.viewport.y
    }

    fn load_bitmap(&mut self, path: &str, uvs: Vec<(String, UvRect)>) -> BitmapLoad {
        self.loader.request(path, uvs)
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.renderer.set_camera(camera);
    }

    fn draw(&mut self, query: &DrawQuery) {
        self.renderer.draw(self.frame, query);
    }

    fn add_text(&mut self, key: &str, label: TextLabel) {
        self.texts.add(key, label);
    }

    fn remove_text(&mut self, key: &str) {
        self.texts.remove(key);
    }

    fn input(&self) -> &InputManager {
        self.input
    }
}
