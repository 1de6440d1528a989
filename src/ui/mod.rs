pub mod main_panel;
pub mod reference_window;
pub mod settings_panel;

pub use main_panel::render_main_panel;
pub use reference_window::render_reference_window;
pub use settings_panel::{render_settings_panel, FileDialogTarget};
