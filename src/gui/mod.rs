//! GUI module
//!
//! Provides the Slint main window and the `ksni` system tray. The window only
//! renders snapshots from the controller layer and forwards user input.

pub mod gui_controller;
pub mod tray;

pub use gui_controller::GuiController;
