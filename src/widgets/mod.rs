pub mod editor;
pub mod modal;

pub use editor::Editor;
pub use modal::{CommandPalette, Modal};
