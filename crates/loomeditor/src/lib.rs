//! Interaction layer for the loom workflow editor
//!
//! Turns user gestures (palette drags, handle-to-handle connects, clicks,
//! key presses) into `GraphModel` mutations, and manages the per-node
//! configuration edit buffer. Holds no graph state of its own; every
//! mutation goes through the model. Framework-independent: a web canvas,
//! a native view or a headless test drives it the same way.

mod canvas;
mod properties;

pub use canvas::{CanvasController, Interaction, Viewport};
pub use properties::{PropertyEditor, PropertyEditorError};
