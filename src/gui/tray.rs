//! System tray integration
//!
//! The tray is a StatusNotifierItem served by `ksni` on its own thread.
//! Left click toggles the main window; the menu offers Show, Hide and Quit.
//! The icon is a small square in the keyboard accent color, outlined in
//! white while screen color sync is running.

use crate::MainWindow;
use kbd_lightning::controller::{SyncCoordinator, SyncMode};
use ksni::menu::StandardItem;
use ksni::{MenuItem, Tray};
use slint::{ComponentHandle, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info};

/// Edge length of the generated tray icon
const ICON_SIZE: usize = 32;

/// Tray icon state and window handle
pub struct KeyboardTray {
    /// Weak reference to the main window
    window: Weak<MainWindow>,
    /// Coordinator, used to resynchronize when the window is shown
    coordinator: Arc<SyncCoordinator>,
    /// Window visibility shared with the GUI controller
    visible: Arc<AtomicBool>,
    /// Current mode, drives the icon
    mode: SyncMode,
}

impl KeyboardTray {
    /// Create the tray state for `window`
    pub fn new(
        window: &MainWindow,
        coordinator: Arc<SyncCoordinator>,
        visible: Arc<AtomicBool>,
    ) -> Self {
        Self {
            window: window.as_weak(),
            coordinator,
            visible,
            mode: SyncMode::Manual,
        }
    }

    /// Update the mode shown by the icon
    pub fn set_mode(&mut self, mode: SyncMode) {
        self.mode = mode;
    }

    fn show_window(&self) {
        self.visible.store(true, Ordering::SeqCst);
        let result = self.window.upgrade_in_event_loop(|window| {
            if let Err(e) = window.show() {
                error!("Failed to show main window: {}", e);
            }
        });
        if let Err(e) = result {
            error!("Failed to reach the GUI event loop: {}", e);
        }

        // The feed may have died while the window was hidden
        let coordinator = Arc::clone(&self.coordinator);
        std::thread::spawn(move || {
            if let Some(mode) = coordinator.resync() {
                info!("Resynchronized to {:?} on show", mode);
            }
        });
    }

    fn hide_window(&self) {
        hide_main_window(&self.window, &self.visible);
    }

    /// ARGB32 pixels of a square icon
    fn create_icon(mode: SyncMode) -> ksni::Icon {
        // Brand green
        let (r, g, b) = (0x16u8, 0x9Eu8, 0x69u8);
        let border = match mode {
            SyncMode::Manual => [255, r / 2, g / 2, b / 2],
            SyncMode::ScreenCapture => [255, 255, 255, 255],
        };
        let fill = [255, r, g, b];

        let mut data = Vec::with_capacity(ICON_SIZE * ICON_SIZE * 4);
        for y in 0..ICON_SIZE {
            for x in 0..ICON_SIZE {
                let edge = x < 2 || y < 2 || x >= ICON_SIZE - 2 || y >= ICON_SIZE - 2;
                data.extend_from_slice(if edge { &border } else { &fill });
            }
        }

        debug!("Created tray icon for {:?}", mode);

        #[expect(
            clippy::cast_possible_wrap,
            clippy::cast_possible_truncation,
            reason = "ICON_SIZE is a small constant"
        )]
        let size = ICON_SIZE as i32;
        ksni::Icon {
            width: size,
            height: size,
            data,
        }
    }
}

/// Hide the main window into the tray
///
/// Failures are logged and otherwise ignored.
pub fn hide_main_window(window: &Weak<MainWindow>, visible: &AtomicBool) {
    visible.store(false, Ordering::SeqCst);
    let result = window.upgrade_in_event_loop(|window| {
        if let Err(e) = window.hide() {
            error!("Failed to hide main window: {}", e);
        }
    });
    if let Err(e) = result {
        error!("Failed to reach the GUI event loop: {}", e);
    }
}

impl Tray for KeyboardTray {
    fn id(&self) -> String {
        "kbd-lightning".into()
    }

    fn title(&self) -> String {
        match self.mode {
            SyncMode::Manual => "Keyboard Lightning".into(),
            SyncMode::ScreenCapture => "Keyboard Lightning (screen sync)".into(),
        }
    }

    fn icon_name(&self) -> String {
        "input-keyboard".into()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        vec![Self::create_icon(self.mode)]
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        if self.visible.load(Ordering::SeqCst) {
            self.hide_window();
        } else {
            self.show_window();
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: "Show".into(),
                activate: Box::new(|this: &mut KeyboardTray| this.show_window()),
                ..Default::default()
            }
            .into(),
            StandardItem {
                label: "Hide".into(),
                activate: Box::new(|this: &mut KeyboardTray| this.hide_window()),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Quit".into(),
                activate: Box::new(|_this: &mut KeyboardTray| {
                    info!("Quit requested from tray");
                    if let Err(e) = slint::invoke_from_event_loop(|| {
                        if let Err(e) = slint::quit_event_loop() {
                            error!("Failed to quit event loop: {}", e);
                        }
                    }) {
                        error!("Failed to reach the GUI event loop: {}", e);
                    }
                }),
                ..Default::default()
            }
            .into(),
        ]
    }
}
