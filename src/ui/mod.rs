pub mod dialogs;
pub mod editor_view;
pub mod form_field;
pub mod keybindings;
pub mod terminal_guard;

pub use dialogs::{HelpDialog, ImageDialog, LoadDialog, SaveDialog};
pub use editor_view::{EditorView, StepField};
pub use terminal_guard::{install_panic_hook, TerminalGuard};
