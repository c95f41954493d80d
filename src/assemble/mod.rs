//! Clip assembly: animated capture, one still per slide, or hybrid scenes with live recordings.

pub mod compositor;
pub mod scene;
pub mod workspace;

pub use compositor::{Assembled, Compositor};
pub use scene::{CaptureAction, Scene, SceneContext, ScriptedAction, load_scenes};
pub use workspace::Workspace;
