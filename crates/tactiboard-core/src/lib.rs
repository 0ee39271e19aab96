//! Tactiboard Core Library
//!
//! Platform-agnostic diagram model, gesture-driven edit session, procedural
//! scene generator and animation clock for tactical training diagrams.

pub mod clock;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod scene;
pub mod session;
pub mod surface;
pub mod tools;

pub use clock::{AnimationClock, Frame, Pose, advance};
pub use config::BoardConfig;
pub use error::{BoardError, BoardResult};
pub use model::{
    Diagram, DiagramSnapshot, DrawingPath, Element, ElementId, ElementKind, PathAttrs, PathId,
    PathType, SerializableColor, TeamColor,
};
pub use scene::{
    ActorMode, Category, Equipment, EquipmentSet, Interpolation, MotionPath, RepeatBehavior,
    Scene, SceneActor, build_scene, build_scene_by_name,
};
pub use session::{EditEvent, EditSession, Gesture, SessionState, StrokePreview};
pub use surface::Surface;
pub use tools::{EquipmentKind, ToolKind};
