//! Screen color feed
//!
//! Samples the screen on a background thread and drives the keyboard with the
//! average on-screen color.
//!
//! # How It Works
//!
//! 1. `CaptureEngine::start` spawns the feed thread with a shutdown channel
//! 2. The thread builds its `FrameSource` (platform capturers are not `Send`)
//!    and reports back; `start` fails if the source could not be opened
//! 3. Each iteration:
//!    - Exit if shutdown was requested or the engine was dropped
//!    - Grab a frame, retrying every 10ms while none is ready
//!    - Average every pixel, then boost saturation in HSV space
//!    - Write the result to the `ColorSink` and sleep for the interval
//! 4. `CaptureEngine::stop` signals shutdown and joins the thread
//!
//! A frame or sink failure after startup ends the feed; `is_active` then
//! reports false so the coordinator can resynchronize.
//!
//! # Saturation Boost
//!
//! Averaging a whole screen washes colors out towards gray. Multiplying the
//! HSV saturation (default 1.85, capped at 1.0) keeps the keyboard visibly
//! tinted without changing hue or brightness.

use crate::color::Color;
use crate::device::keyboard::ColorSink;
use crate::error::{LightningError, Result, StringError};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Delay between attempts while the capturer has no frame ready
const FRAME_RETRY_DELAY: Duration = Duration::from_millis(10);

/// A captured screen image in BGRA byte order
#[derive(Debug, Clone)]
pub struct Frame {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
    /// Bytes per row (at least `width * 4`)
    pub stride: usize,
    /// Pixel data
    pub data: Vec<u8>,
}

impl Frame {
    /// Average color of all pixels, or `None` for an empty frame
    pub fn average_color(&self) -> Option<Color> {
        let mut r_total: u64 = 0;
        let mut g_total: u64 = 0;
        let mut b_total: u64 = 0;
        let mut count: u64 = 0;

        for y in 0..self.height {
            let row_start = y * self.stride;
            for x in 0..self.width {
                let i = row_start + x * 4;
                let Some(pixel) = self.data.get(i..i + 3) else {
                    break;
                };
                b_total += u64::from(pixel[0]);
                g_total += u64::from(pixel[1]);
                r_total += u64::from(pixel[2]);
                count += 1;
            }
        }

        if count == 0 {
            return None;
        }

        let avg = |total: u64| u8::try_from(total / count).unwrap_or(u8::MAX);
        Some(Color::new(avg(r_total), avg(g_total), avg(b_total)))
    }
}

/// Source of screen frames
///
/// `next_frame` returns an error of kind `WouldBlock` when no new frame is
/// ready yet; any other error ends the feed.
pub trait FrameSource {
    /// Capture the next frame
    fn next_frame(&mut self) -> io::Result<Frame>;
}

/// Builds a frame source on the feed thread
pub type FrameSourceFactory =
    Arc<dyn Fn() -> io::Result<Box<dyn FrameSource>> + Send + Sync>;

/// Feed timing and color tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    /// Pause between two keyboard updates
    pub interval: Duration,
    /// Saturation multiplier applied to the averaged color
    pub saturation_boost: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            saturation_boost: 1.85,
        }
    }
}

/// Convert a color to HSV (hue in degrees, saturation and value in 0-1)
pub fn rgb_to_hsv(color: Color) -> (f32, f32, f32) {
    let r = f32::from(color.r) / 255.0;
    let g = f32::from(color.g) / 255.0;
    let b = f32::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    #[expect(clippy::float_cmp, reason = "max is one of r, g, b exactly")]
    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

/// Convert HSV (hue in degrees, saturation and value in 0-1) to a color
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to 0..=255 before the cast"
    )]
    let to_byte = |channel: f32| ((channel + m) * 255.0).round().clamp(0.0, 255.0) as u8;

    Color::new(to_byte(r1), to_byte(g1), to_byte(b1))
}

/// Hue of `color` in degrees, or `None` for grays which have no hue
pub fn hue_of(color: Color) -> Option<f32> {
    let (h, s, _) = rgb_to_hsv(color);
    (s > 0.0).then_some(h)
}

/// Multiply the saturation of `color` by `factor`, capped at full saturation
pub fn boost_saturation(color: Color, factor: f32) -> Color {
    let (h, s, v) = rgb_to_hsv(color);
    hsv_to_rgb(h, (s * factor).min(1.0), v)
}

/// Handle to the running feed thread
struct FeedHandle {
    thread: JoinHandle<()>,
    shutdown_tx: mpsc::Sender<()>,
}

/// Owns the screen color feed thread
///
/// At most one feed runs at a time. The running state lives here and is the
/// source of truth the rest of the application queries.
pub struct CaptureEngine {
    settings: CaptureSettings,
    frames: FrameSourceFactory,
    sink: Arc<dyn ColorSink>,
    feed: Mutex<Option<FeedHandle>>,
}

impl CaptureEngine {
    /// Create an idle engine
    pub fn new(
        settings: CaptureSettings,
        frames: FrameSourceFactory,
        sink: Arc<dyn ColorSink>,
    ) -> Self {
        Self {
            settings,
            frames,
            sink,
            feed: Mutex::new(None),
        }
    }

    /// Start the feed thread
    pub fn start(&self) -> Result<()> {
        let mut feed = self.feed.lock();

        if let Some(handle) = feed.as_ref()
            && !handle.thread.is_finished()
        {
            return Err(LightningError::CaptureAlreadyRunning);
        }

        // A feed that ended on its own is reaped before starting a new one
        if let Some(finished) = feed.take() {
            debug!("Reaping finished screen color feed");
            if finished.thread.join().is_err() {
                warn!("Previous screen color feed had panicked");
            }
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel::<io::Result<()>>();
        let frames = Arc::clone(&self.frames);
        let sink = Arc::clone(&self.sink);
        let settings = self.settings;

        let thread = thread::Builder::new()
            .name("screen-color-feed".to_string())
            .spawn(move || {
                let source = match frames() {
                    Ok(source) => {
                        let _ = ready_tx.send(Ok(()));
                        source
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                info!("Screen color feed started");
                if let Err(e) = run_feed(source, sink.as_ref(), settings, &shutdown_rx) {
                    error!("Screen capture error: {}", e);
                }
                info!("Screen color feed exited");
            })
            .map_err(|e| LightningError::CaptureFailed(Box::new(e)))?;

        // Only report success once the frame source is open
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread.join();
                error!("Failed to open screen frame source: {}", e);
                return Err(LightningError::CaptureFailed(Box::new(e)));
            }
            Err(_) => {
                let _ = thread.join();
                error!("Screen color feed panicked while opening the frame source");
                return Err(LightningError::CaptureFailed(StringError::new(
                    "screen color feed panicked while opening the frame source",
                )));
            }
        }

        *feed = Some(FeedHandle {
            thread,
            shutdown_tx,
        });

        Ok(())
    }

    /// Signal the feed to stop and wait for the thread to exit
    ///
    /// A feed that already died (error or panic) counts as stopped.
    pub fn stop(&self) -> Result<()> {
        let handle = self
            .feed
            .lock()
            .take()
            .ok_or(LightningError::CaptureNotRunning)?;

        // The thread may already have exited, in which case the send fails harmlessly
        let _ = handle.shutdown_tx.send(());

        if handle.thread.join().is_err() {
            warn!("Screen color feed had panicked");
        }

        info!("Screen color feed stopped");
        Ok(())
    }

    /// Whether a feed thread is currently alive
    pub fn is_active(&self) -> bool {
        self.feed
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.thread.is_finished())
    }

    /// Feed settings
    pub fn settings(&self) -> CaptureSettings {
        self.settings
    }
}

impl std::fmt::Debug for CaptureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureEngine")
            .field("settings", &self.settings)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

/// Dropping the engine drops the sender, which the feed treats as shutdown
fn shutdown_requested(shutdown_rx: &mpsc::Receiver<()>) -> bool {
    !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty))
}

fn run_feed(
    mut source: Box<dyn FrameSource>,
    sink: &dyn ColorSink,
    settings: CaptureSettings,
    shutdown_rx: &mpsc::Receiver<()>,
) -> Result<()> {

    loop {
        if shutdown_requested(shutdown_rx) {
            return Ok(());
        }

        let frame = loop {
            match source.next_frame() {
                Ok(frame) => break frame,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if shutdown_requested(shutdown_rx) {
                        return Ok(());
                    }
                    thread::sleep(FRAME_RETRY_DELAY);
                }
                Err(e) => return Err(LightningError::CaptureFailed(Box::new(e))),
            }
        };

        if let Some(average) = frame.average_color() {
            let color = boost_saturation(average, settings.saturation_boost);
            sink.write_color(color)?;
        } else {
            debug!("Skipping empty frame");
        }

        thread::sleep(settings.interval);
    }
}

/// X11 frame source backed by `scrap`
#[cfg(feature = "screen-capture")]
pub mod x11 {
    use super::{Frame, FrameSource, FrameSourceFactory};
    use std::io;
    use std::sync::Arc;

    /// Captures the primary display
    pub struct ScrapFrameSource {
        capturer: scrap::Capturer,
    }

    impl ScrapFrameSource {
        /// Open the primary display
        pub fn primary() -> io::Result<Self> {
            let display = scrap::Display::primary()?;
            let capturer = scrap::Capturer::new(display)?;
            Ok(Self { capturer })
        }
    }

    impl FrameSource for ScrapFrameSource {
        fn next_frame(&mut self) -> io::Result<Frame> {
            let width = self.capturer.width();
            let height = self.capturer.height();
            let data = self.capturer.frame()?.to_vec();
            let stride = if height == 0 {
                width * 4
            } else {
                data.len() / height
            };

            Ok(Frame {
                width,
                height,
                stride,
                data,
            })
        }
    }

    /// Factory opening the primary display on the feed thread
    pub fn frame_source_factory() -> FrameSourceFactory {
        Arc::new(|| {
            let source = ScrapFrameSource::primary()?;
            Ok(Box::new(source) as Box<dyn FrameSource>)
        })
    }
}

/// Frame source used by the desktop application
pub fn default_frame_source_factory() -> FrameSourceFactory {
    #[cfg(feature = "screen-capture")]
    {
        x11::frame_source_factory()
    }

    #[cfg(not(feature = "screen-capture"))]
    {
        Arc::new(|| {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "built without screen capture support",
            ))
        })
    }
}
