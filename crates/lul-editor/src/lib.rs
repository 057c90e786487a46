pub mod commands;
pub mod drag;
pub mod editor;
pub mod input;
pub mod shortcuts;
pub mod tools;

pub use commands::{Command, CommandHistory};
pub use drag::DragSession;
pub use editor::Editor;
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
