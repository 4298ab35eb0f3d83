//! GUI controller
//!
//! Wires the Slint window to `ColorControls` and `SyncCoordinator`.
//!
//! # Threading
//!
//! Callbacks run on the Slint event loop thread. Color edits are pure and run
//! there directly; every device command (status query, start/stop, apply) runs
//! on a short-lived worker thread. Results come back through the status channel,
//! which a forwarder thread drains into the window with `upgrade_in_event_loop`.

use crate::gui::tray::{KeyboardTray, hide_main_window};
use crate::{MainWindow, PresetSwatch};
use anyhow::{Context, Result};
use kbd_lightning::color::{Channel, ColorSnapshot, PRESETS};
use kbd_lightning::config::{AppConfig, ConfigManager};
use kbd_lightning::controller::{
    ApplyOutcome, ColorControls, Notice, NoticeLevel, StatusUpdate, SyncCoordinator, SyncMode,
    SyncSnapshot, ToggleOutcome,
};
use kbd_lightning::device::capture::{hsv_to_rgb, hue_of};
use ksni::blocking::{Handle, TrayMethods};
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use tracing::{debug, error, info, warn};

/// Owns the main window and its wiring
pub struct GuiController {
    window: MainWindow,
    controls: Arc<ColorControls>,
    coordinator: Arc<SyncCoordinator>,
    status_rx: Option<mpsc::Receiver<StatusUpdate>>,
    config: AppConfig,
    visible: Arc<AtomicBool>,
}

impl GuiController {
    /// Create the main window and register its callbacks
    pub fn new(
        controls: Arc<ColorControls>,
        status_rx: mpsc::Receiver<StatusUpdate>,
        config: AppConfig,
    ) -> Result<Self> {
        let window = MainWindow::new().context("Failed to create main window")?;
        let coordinator = Arc::clone(controls.coordinator());

        let controller = Self {
            window,
            controls,
            coordinator,
            status_rx: Some(status_rx),
            config,
            visible: Arc::new(AtomicBool::new(false)),
        };

        render_color(&controller.window, &controller.controls.snapshot());
        render_sync(&controller.window, &controller.coordinator.snapshot());
        controller.register_callbacks();

        Ok(controller)
    }

    fn register_callbacks(&self) {
        let weak = self.window.as_weak();

        let coordinator = Arc::clone(&self.coordinator);
        let toggle_weak = weak.clone();
        self.window.on_toggle_sync(move || {
            let coordinator = Arc::clone(&coordinator);
            let weak = toggle_weak.clone();
            thread::spawn(move || {
                let outcome = coordinator.request_toggle();
                debug!("Toggle outcome: {:?}", outcome);
                if matches!(outcome, ToggleOutcome::Ignored | ToggleOutcome::NotReady) {
                    // Undo the switch's own visual flip
                    let snapshot = coordinator.snapshot();
                    let _ = weak.upgrade_in_event_loop(move |window| {
                        render_sync(&window, &snapshot);
                    });
                }
            });
        });

        let controls = Arc::clone(&self.controls);
        let channel_weak = weak.clone();
        self.window.on_channel_edited(move |index, text| {
            let Some(window) = channel_weak.upgrade() else {
                return;
            };
            let edit = Channel::from_index(index).and_then(|c| controls.edit_channel(c, &text));
            render_color(&window, &edit.unwrap_or_else(|| controls.snapshot()));
        });

        let controls = Arc::clone(&self.controls);
        let hex_weak = weak.clone();
        self.window.on_hex_edited(move |text| {
            let Some(window) = hex_weak.upgrade() else {
                return;
            };
            let edit = controls.edit_hex_text(&text);
            render_color(&window, &edit.unwrap_or_else(|| controls.snapshot()));
        });

        let controls = Arc::clone(&self.controls);
        let preset_weak = weak.clone();
        self.window.on_preset_clicked(move |index| {
            let Some(window) = preset_weak.upgrade() else {
                return;
            };
            let edit = usize::try_from(index)
                .ok()
                .and_then(|i| controls.select_preset(i));
            render_color(&window, &edit.unwrap_or_else(|| controls.snapshot()));
        });

        let controls = Arc::clone(&self.controls);
        let picker_weak = weak.clone();
        self.window.on_picker_moved(move |hue| {
            let Some(window) = picker_weak.upgrade() else {
                return;
            };
            if let Some(snapshot) = controls.pick_color(hsv_to_rgb(hue, 1.0, 1.0)) {
                render_color(&window, &snapshot);
            }
        });

        let controls = Arc::clone(&self.controls);
        let apply_weak = weak.clone();
        self.window.on_apply(move || {
            let controls = Arc::clone(&controls);
            let weak = apply_weak.clone();
            thread::spawn(move || {
                // Failures arrive as notices through the status channel
                let (color, outcome) = controls.confirm();
                if outcome == ApplyOutcome::Applied {
                    let notice = Notice::info(format!("Keyboard color set to {}", color.to_hex()));
                    let _ = weak.upgrade_in_event_loop(move |window| {
                        render_notice(&window, Some(&notice));
                    });
                }
            });
        });

        let visible = Arc::clone(&self.visible);
        let hide_weak = weak.clone();
        self.window.on_hide_to_tray(move || {
            hide_main_window(&hide_weak, &visible);
        });

        let visible = Arc::clone(&self.visible);
        let minimize_on_close = self.config.preferences.minimize_to_tray_on_close;
        self.window.window().on_close_requested(move || {
            visible.store(false, Ordering::SeqCst);
            if minimize_on_close {
                debug!("Close requested, hiding to tray");
            } else {
                info!("Close requested, quitting");
                if let Err(e) = slint::quit_event_loop() {
                    error!("Failed to quit event loop: {}", e);
                }
            }
            slint::CloseRequestResponse::HideWindow
        });
    }

    /// Spawn the tray, resolve the initial mode, and run the event loop until quit
    pub fn run(mut self) -> Result<()> {
        let tray = KeyboardTray::new(
            &self.window,
            Arc::clone(&self.coordinator),
            Arc::clone(&self.visible),
        );
        let tray_handle = match tray.spawn() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to spawn system tray: {:?}", e);
                None
            }
        };

        let tray_running = tray_handle.is_some();

        if let Some(status_rx) = self.status_rx.take() {
            spawn_status_forwarder(status_rx, self.window.as_weak(), tray_handle);
        }

        let coordinator = Arc::clone(&self.coordinator);
        thread::spawn(move || {
            let snapshot = coordinator.resolve_initial_mode();
            info!("Startup capture status resolved: {:?}", snapshot.mode);
        });

        let state = &self.config.window_state;
        #[expect(clippy::cast_precision_loss, reason = "window sizes are small")]
        let size = slint::LogicalSize::new(state.width as f32, state.height as f32);
        self.window.window().set_size(size);

        if self.config.preferences.start_minimized_to_tray && tray_running {
            info!("Starting minimized to tray");
        } else {
            self.window.show().context("Failed to show main window")?;
            self.visible.store(true, Ordering::SeqCst);
        }

        slint::run_event_loop_until_quit().context("Slint event loop failed")?;

        self.save_window_state();
        Ok(())
    }

    fn save_window_state(&mut self) {
        let window = self.window.window();
        let size = window.size().to_logical(window.scale_factor());

        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "logical window sizes are positive and small"
        )]
        let (width, height) = (size.width.round() as u32, size.height.round() as u32);
        if width == 0 || height == 0 {
            return;
        }

        self.config.window_state.width = width;
        self.config.window_state.height = height;
        if let Err(e) = ConfigManager::save(&self.config) {
            warn!("Failed to save window state: {}", e);
        }
    }
}

/// Drain status updates into the window and tray until every sender is gone
fn spawn_status_forwarder(
    status_rx: mpsc::Receiver<StatusUpdate>,
    window: slint::Weak<MainWindow>,
    tray: Option<Handle<KeyboardTray>>,
) {
    thread::spawn(move || {
        while let Ok(update) = status_rx.recv() {
            debug!("Status update received: {:?}", update);

            if let Some(tray) = &tray {
                let mode = update.sync.mode;
                let _ = tray.update(|tray| tray.set_mode(mode));
            }

            let result = window.upgrade_in_event_loop(move |window| {
                render_sync(&window, &update.sync);
                render_notice(&window, update.notice.as_ref());
            });
            if result.is_err() {
                warn!("GUI event loop gone, stopping status forwarder");
                break;
            }
        }
        debug!("Status forwarder exited");
    });
}

fn render_sync(window: &MainWindow, snapshot: &SyncSnapshot) {
    window.set_sync_checked(snapshot.mode == SyncMode::ScreenCapture);
    window.set_toggle_enabled(snapshot.toggle_enabled());
    window.set_controls_enabled(snapshot.accepts_manual_edits());
    window.set_apply_label(snapshot.apply_label().into());
}

fn render_color(window: &MainWindow, snapshot: &ColorSnapshot) {
    let color = snapshot.canonical;
    window.set_current_color(slint::Color::from_rgb_u8(color.r, color.g, color.b));
    window.set_red_text(color.r.to_string().into());
    window.set_green_text(color.g.to_string().into());
    window.set_blue_text(color.b.to_string().into());
    window.set_hex_text(snapshot.display_text.as_str().into());
    // Grays keep the slider where it is
    if let Some(hue) = hue_of(color) {
        window.set_picker_hue(hue);
    }

    let swatches: Vec<PresetSwatch> = PRESETS
        .iter()
        .map(|preset| PresetSwatch {
            name: preset.name.into(),
            swatch: slint::Color::from_rgb_u8(preset.color.r, preset.color.g, preset.color.b),
            selected: preset.color == color,
        })
        .collect();

    // Only rebuild the model when the selection changed
    let current = window.get_presets();
    let unchanged = current.row_count() == swatches.len()
        && current
            .iter()
            .zip(&swatches)
            .all(|(a, b)| a.selected == b.selected);
    if !unchanged {
        window.set_presets(ModelRc::from(Rc::new(VecModel::from(swatches))));
    }
}

fn render_notice(window: &MainWindow, notice: Option<&Notice>) {
    match notice {
        Some(notice) => {
            window.set_notice(notice.message.as_str().into());
            window.set_notice_is_error(notice.level == NoticeLevel::Error);
        }
        None => window.set_notice("".into()),
    }
}
