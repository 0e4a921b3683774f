//! Weekly menu planning: the day/category grid and the editor that saves it.

pub mod backend;
pub mod editor;
pub mod grid;

pub use backend::MenuBackend;
pub use editor::{EditorError, MenuEditor, SaveError, SaveOutcome};
pub use grid::{GridError, MenuGrid};
