//! Tactiboard Render Library
//!
//! Renderer abstraction for Tactiboard plus a backend-agnostic display-list
//! renderer. Any drawing backend can replay the produced [`DrawCommand`]s.

mod display_list;
mod pitch;
mod renderer;

pub use display_list::{DisplayListRenderer, DrawCommand, render_diagram, render_frame};
pub use renderer::{PitchStyle, RenderContext, RenderResult, RenderSource, Renderer, RendererError};
