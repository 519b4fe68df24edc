//! Quadstage - a small scene-driven 2D sprite client.
//!
//! Scenes build [`RenderingObject`]s, shape them with one-shot
//! [`Modifier`]s and long-lived [`Attachment`]s, and submit their draw
//! queries through an [`AppFacade`] once per tick.

pub mod assets;
pub mod engine;
pub mod error;
pub mod facade;
pub mod gamepad;
pub mod input;
pub mod logging;
pub mod math;
pub mod object;
pub mod render;
pub mod scene;
pub mod text;
pub mod time;

pub use crate::assets::{BitmapLoader, TextureSink};
pub use crate::engine::{Engine, EngineConfig, EngineFacade};
pub use crate::error::{EngineError, EngineResult};
pub use crate::facade::{AppFacade, BitmapLoad, LoadState};
pub use crate::gamepad::GamepadPump;
pub use crate::input::{repeat_fires, InputManager, Key};
pub use crate::logging::{init_logging, LoggingConfig};
pub use crate::math::{Camera, Mat4, Vec2, Vec3, Vec4};
pub use crate::object::{Attachment, DynamicColor, Fade, Modifier, RenderingObject, SharedAttachment};
pub use crate::render::{Anchor, DrawQuery, DrawQueryBuilder, Frame, Renderer, UvRect};
pub use crate::scene::{LoadScene, Scene, TitleScene};
pub use crate::text::{TextLabel, TextManager};
pub use crate::time::FpsCounter;
