//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use tactiboard_core::clock::Frame;
use tactiboard_core::scene::Scene;
use tactiboard_core::surface::{Half, Surface};
use tactiboard_core::{Diagram, ElementId, StrokePreview};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface: {0}")]
    InvalidSurface(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// How the playing surface is painted underneath the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchStyle {
    /// Flat background, no markings.
    Plain,
    /// Standard line markings.
    #[default]
    Markings,
    /// Markings over mown stripes.
    Striped,
}

impl PitchStyle {
    /// Cycle to the next style.
    pub fn next(self) -> Self {
        match self {
            PitchStyle::Plain => PitchStyle::Markings,
            PitchStyle::Markings => PitchStyle::Striped,
            PitchStyle::Striped => PitchStyle::Plain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchStyle::Plain => "Plain",
            PitchStyle::Markings => "Markings",
            PitchStyle::Striped => "Striped",
        }
    }
}

/// What is being drawn.
#[derive(Debug, Clone, Copy)]
pub enum RenderSource<'a> {
    /// An editable diagram.
    Diagram(&'a Diagram),
    /// One animation frame of a generated scene.
    Frame { scene: &'a Scene, frame: &'a Frame },
}

/// Context for a single render pass.
pub struct RenderContext<'a> {
    pub source: RenderSource<'a>,
    /// Surface in pixels; normalized coordinates are scaled by it.
    pub surface: Surface,
    pub background_color: Color,
    pub line_color: Color,
    pub pitch_style: PitchStyle,
    /// Restrict the pitch to one half; the other half is shaded.
    pub half: Option<Half>,
    /// Token radius in pixels before kind and scale factors.
    pub token_radius: f64,
    pub selection_color: Color,
    pub selected: Option<ElementId>,
    /// Stroke being drawn, shown above committed paths.
    pub preview: Option<StrokePreview<'a>>,
    pub preview_color: Color,
    /// Draw faint motion paths under animated scenes.
    pub show_motion_trails: bool,
}

impl<'a> RenderContext<'a> {
    /// Context for a diagram on a surface of `size` pixels.
    pub fn diagram(diagram: &'a Diagram, size: Size) -> Self {
        Self::new(RenderSource::Diagram(diagram), size)
    }

    /// Context for a scene frame. Half-field scenes show only their half.
    pub fn frame(scene: &'a Scene, frame: &'a Frame, size: Size) -> Self {
        let half = if scene.show_half_field { scene.half() } else { None };
        Self::new(RenderSource::Frame { scene, frame }, size).with_half(half)
    }

    fn new(source: RenderSource<'a>, size: Size) -> Self {
        Self {
            source,
            surface: Surface::new(size),
            background_color: Color::from_rgba8(46, 125, 50, 255),
            line_color: Color::from_rgba8(255, 255, 255, 200),
            pitch_style: PitchStyle::Markings,
            half: None,
            token_radius: 14.0,
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            selected: None,
            preview: None,
            preview_color: Color::from_rgba8(255, 255, 255, 150),
            show_motion_trails: true,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_line_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    pub fn with_pitch(mut self, style: PitchStyle) -> Self {
        self.pitch_style = style;
        self
    }

    pub fn with_half(mut self, half: Option<Half>) -> Self {
        self.half = half;
        self
    }

    pub fn with_token_radius(mut self, radius: f64) -> Self {
        self.token_radius = radius;
        self
    }

    /// Set the element drawn with a selection ring.
    pub fn with_selection(mut self, selected: Option<ElementId>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the in-progress stroke preview.
    pub fn with_preview(mut self, preview: Option<StrokePreview<'a>>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_motion_trails(mut self, show: bool) -> Self {
        self.show_motion_trails = show;
        self
    }

    /// Check the surface can be drawn on.
    pub fn validate(&self) -> RenderResult<()> {
        let size = self.surface.size;
        let finite = size.width.is_finite() && size.height.is_finite();
        if !finite || size.width <= 0.0 || size.height <= 0.0 {
            return Err(RendererError::InvalidSurface(format!(
                "{}x{}",
                size.width, size.height
            )));
        }
        Ok(())
    }
}

/// Trait for rendering backends.
///
/// Implementations may record commands, rasterize, or forward to a GPU scene.
pub trait Renderer: Send + Sync {
    /// Build the drawing for one pass.
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Colour used to clear before drawing.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tactiboard_core::scene::{ActorMode, Category, EquipmentSet, build_scene};
    use tactiboard_core::advance;

    #[test]
    fn test_pitch_style_cycle() {
        let mut style = PitchStyle::default();
        for _ in 0..3 {
            style = style.next();
        }
        assert_eq!(style, PitchStyle::Markings);
        assert_eq!(PitchStyle::Striped.name(), "Striped");
    }

    #[test]
    fn test_zero_surface_is_rejected() {
        let diagram = Diagram::new();
        let ctx = RenderContext::diagram(&diagram, Size::ZERO);
        assert!(matches!(ctx.validate(), Err(RendererError::InvalidSurface(_))));
        let ctx = RenderContext::diagram(&diagram, Size::new(360.0, 540.0));
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_frame_context_uses_scene_half() {
        let scene = build_scene(Category::Shooting, ActorMode::Solo, &EquipmentSet::new()).unwrap();
        let frame = advance(&scene, 0.0);
        let ctx = RenderContext::frame(&scene, &frame, Size::new(360.0, 540.0));
        assert_eq!(ctx.half, Some(Half::Top));
    }
}
