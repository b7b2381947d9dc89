//! The host-facing reveal object
//!
//! [`InkReveal`] ties the pieces together: it owns the blob set, the
//! drawing surface and the driver, and starts the reveal once the source
//! image has loaded and the host has reported the element visible.

use crate::blob::BlobDescriptor;
use crate::compositor::Surface;
use crate::config::RevealConfiguration;
use crate::driver::{FrameRenderer, RevealDriver, RevealState};
use crate::error::{Result, RevealError};
use crate::mask::{assemble_mask, MaskFrame};
use crate::pattern::BlobGenerator;
use crate::visibility;
use ink_animation::{FrameScheduler, ManualScheduler};
use ink_core::{EventKind, Rect, RevealEvent, Size};
use ink_image::{ImageData, ImageSource};

/// Reports the current logical size of the drawing target
pub trait SurfaceSizeProvider {
    /// `None` while the target is not mounted
    fn logical_size(&self) -> Option<Size>;

    fn device_pixel_ratio(&self) -> f32 {
        1.0
    }
}

impl<F> SurfaceSizeProvider for F
where
    F: Fn() -> Option<Size>,
{
    fn logical_size(&self) -> Option<Size> {
        self()
    }
}

/// A drawing target with a constant size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedSurface {
    pub size: Size,
    pub dpr: f32,
}

impl FixedSurface {
    pub fn new(size: Size, dpr: f32) -> Self {
        Self { size, dpr }
    }
}

impl SurfaceSizeProvider for FixedSurface {
    fn logical_size(&self) -> Option<Size> {
        Some(self.size)
    }

    fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }
}

/// Progress of the source image
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loading,
    Loaded,
    Failed,
}

/// One ink reveal instance
pub struct InkReveal<S: FrameScheduler = ManualScheduler> {
    config: RevealConfiguration,
    generator: BlobGenerator,
    blobs: Vec<BlobDescriptor>,
    driver: RevealDriver<S>,
    provider: Box<dyn SurfaceSizeProvider>,
    surface: Option<Surface>,
    image: Option<ImageData>,
    load_state: LoadState,
    visible: bool,
    disposed: bool,
}

impl<S: FrameScheduler> InkReveal<S> {
    pub fn new(
        config: RevealConfiguration,
        scheduler: S,
        provider: impl SurfaceSizeProvider + 'static,
    ) -> Result<Self> {
        config.validate()?;

        let mut generator = BlobGenerator::new(config.seed);
        let blobs = generator.generate(&config.layout());
        let driver = RevealDriver::new(scheduler, config.driver_options());

        Ok(Self {
            visible: !config.trigger_on_viewport,
            config,
            generator,
            blobs,
            driver,
            provider: Box::new(provider),
            surface: None,
            image: None,
            load_state: LoadState::Pending,
            disposed: false,
        })
    }

    /// Apply a new configuration and return the blob set in effect.
    ///
    /// Changing any generation input regenerates the blobs and tears the
    /// timeline back down to `Idle`. It does not restart on its own.
    pub fn configure(&mut self, config: RevealConfiguration) -> Result<&[BlobDescriptor]> {
        config.validate()?;

        let reseed = config.seed != self.config.seed;
        let regenerate = reseed || config.layout() != self.config.layout();

        if !config.trigger_on_viewport {
            self.visible = true;
        }
        self.driver.set_options(config.driver_options());
        self.config = config;

        if reseed {
            self.generator = BlobGenerator::new(self.config.seed);
        }
        if regenerate {
            tracing::debug!(pattern = %self.config.pattern, "layout changed, resetting reveal");
            self.blobs = self.generator.generate(&self.config.layout());
            self.teardown();
        }

        Ok(&self.blobs)
    }

    pub fn config(&self) -> &RevealConfiguration {
        &self.config
    }

    pub fn blobs(&self) -> &[BlobDescriptor] {
        &self.blobs
    }

    pub fn state(&self) -> RevealState {
        self.driver.state()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn progress(&self) -> f32 {
        self.driver.progress()
    }

    /// Opacity of the unmasked final image layer
    pub fn opacity(&self) -> f32 {
        self.driver.opacity()
    }

    pub fn is_complete(&self) -> bool {
        self.driver.is_complete()
    }

    /// The blurred placeholder shows until the reveal completes or fails
    pub fn placeholder_visible(&self) -> bool {
        !self.is_complete() && self.load_state != LoadState::Failed
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn driver(&self) -> &RevealDriver<S> {
        &self.driver
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.driver.scheduler_mut()
    }

    /// Mask geometry for the current progress in a frame of `frame` size
    pub fn mask(&self, frame: Size) -> MaskFrame {
        assemble_mask(
            &self.blobs,
            self.driver.progress(),
            self.config.easing,
            frame,
            self.config.edge_style(),
        )
    }

    /// Subscribe to lifecycle events
    pub fn on<F>(&mut self, kind: EventKind, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.driver.on(kind, handler);
    }

    pub fn on_any<F>(&mut self, handler: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.driver.on_any(handler);
    }

    /// The host started fetching the source image
    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
        self.driver.emit(RevealEvent::LoadStart);
    }

    /// The source image is decoded and ready
    pub fn image_loaded(&mut self, image: ImageData) {
        tracing::debug!(width = image.width(), height = image.height(), "image loaded");
        self.load_state = LoadState::Loaded;
        self.driver.emit(RevealEvent::Load {
            width: image.width(),
            height: image.height(),
        });
        self.image = Some(image);
        if self.driver.state() == RevealState::Failed {
            self.driver.reset();
        }
        self.try_start();
    }

    /// The source image could not be loaded. The reveal will not animate
    /// until a later load succeeds.
    pub fn image_failed(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "image load failed");
        self.load_state = LoadState::Failed;
        self.image = None;
        self.driver.fail();
        self.driver.emit(RevealEvent::Error(message));
    }

    /// Load the source image synchronously
    pub fn load(&mut self, source: impl Into<ImageSource>) -> Result<()> {
        self.begin_load();
        match ImageData::load(source.into()) {
            Ok(image) => {
                self.image_loaded(image);
                Ok(())
            }
            Err(err) => {
                self.image_failed(err.to_string());
                Err(RevealError::ImageLoad(err))
            }
        }
    }

    /// The host's visibility observer fired. Visibility latches once seen.
    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            tracing::debug!("reveal entered viewport");
            self.visible = true;
            self.try_start();
        }
    }

    /// Feed the element and viewport bounds from a layout pass. The reveal
    /// counts as visible once the configured threshold is crossed.
    pub fn observe(&mut self, element: Rect, viewport: Rect) {
        let visible = visibility::is_visible(
            element,
            viewport,
            self.config.viewport_threshold,
            self.config.viewport_root_margin,
        );
        self.set_visible(visible);
    }

    /// Explicit go-ahead from the host; opens the visibility gate
    pub fn trigger(&mut self) {
        self.visible = true;
        self.try_start();
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    /// Tear down, regenerate the blobs and start again if the gates are open
    pub fn replay(&mut self) {
        self.blobs = self.generator.generate(&self.config.layout());
        self.teardown();
        self.try_start();
    }

    /// Advance one frame at host time `now_ms`; returns whether it redrew
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut frame = FrameContext {
            config: &self.config,
            blobs: &self.blobs,
            provider: self.provider.as_ref(),
            surface: &mut self.surface,
            image: self.image.as_ref(),
        };
        self.driver.tick(now_ms, &mut frame)
    }

    /// Run whatever the scheduler has due at `now_ms`
    pub fn pump(&mut self, now_ms: f64) -> bool {
        let mut frame = FrameContext {
            config: &self.config,
            blobs: &self.blobs,
            provider: self.provider.as_ref(),
            surface: &mut self.surface,
            image: self.image.as_ref(),
        };
        self.driver.pump(now_ms, &mut frame)
    }

    /// Cancel all scheduled work and release the surface. Nothing restarts
    /// the instance afterwards.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.driver.dispose();
        self.surface = None;
    }

    fn teardown(&mut self) {
        self.driver.reset();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        if self.load_state == LoadState::Failed {
            self.driver.fail();
        }
    }

    fn try_start(&mut self) {
        if self.disposed || !self.visible || self.image.is_none() {
            return;
        }
        if self.driver.state() == RevealState::Idle {
            self.driver.trigger();
        }
    }
}

/// Per-frame view of the pieces a redraw needs
struct FrameContext<'a> {
    config: &'a RevealConfiguration,
    blobs: &'a [BlobDescriptor],
    provider: &'a dyn SurfaceSizeProvider,
    surface: &'a mut Option<Surface>,
    image: Option<&'a ImageData>,
}

impl FrameRenderer for FrameContext<'_> {
    fn render(&mut self, progress: f32) -> Result<()> {
        let image = self
            .image
            .ok_or(RevealError::SurfaceUnavailable("source image not loaded"))?;
        let size = self
            .provider
            .logical_size()
            .ok_or(RevealError::SurfaceUnavailable("surface not mounted"))?;
        let dpr = if self.config.high_dpi {
            self.provider.device_pixel_ratio()
        } else {
            1.0
        };

        if self.surface.is_none() {
            *self.surface = Some(Surface::new(size, dpr)?);
        }
        let surface = self
            .surface
            .as_mut()
            .ok_or(RevealError::SurfaceUnavailable("surface not mounted"))?;
        surface.resize(size, dpr)?;

        let mask = assemble_mask(
            self.blobs,
            progress,
            self.config.easing,
            surface.logical(),
            self.config.edge_style(),
        );
        self.config.compositor().draw(surface, &mask, image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn config() -> RevealConfiguration {
        RevealConfiguration {
            duration_ms: 1000,
            seed: Some(4),
            ..RevealConfiguration::default()
        }
    }

    fn reveal(config: RevealConfiguration) -> InkReveal {
        InkReveal::new(
            config,
            ManualScheduler::new(),
            FixedSurface::new(Size::new(64.0, 48.0), 1.0),
        )
        .unwrap()
    }

    fn image() -> ImageData {
        ImageData::solid(32, 24, [10, 120, 200, 255]).unwrap()
    }

    #[test]
    fn test_waits_for_image_and_visibility() {
        let mut reveal = reveal(config());
        reveal.set_visible(true);
        assert_eq!(reveal.state(), RevealState::Idle);

        reveal.image_loaded(image());
        assert_eq!(reveal.state(), RevealState::Running);
    }

    #[test]
    fn test_visibility_gate() {
        let mut reveal = reveal(config());
        reveal.image_loaded(image());
        assert_eq!(reveal.state(), RevealState::Idle);

        reveal.set_visible(true);
        assert_eq!(reveal.state(), RevealState::Running);
    }

    #[test]
    fn test_no_viewport_trigger_starts_on_load() {
        let mut reveal = reveal(RevealConfiguration {
            trigger_on_viewport: false,
            ..config()
        });
        reveal.image_loaded(image());
        assert_eq!(reveal.state(), RevealState::Running);
    }

    #[test]
    fn test_failed_load() {
        let mut reveal = reveal(config());
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = errors.clone();
        reveal.on(EventKind::Error, move |e| sink.lock().unwrap().push(e.clone()));

        let result = reveal.load(ImageSource::bytes(vec![0, 1, 2]));
        assert!(matches!(result, Err(RevealError::ImageLoad(_))));
        assert_eq!(reveal.state(), RevealState::Failed);
        assert_eq!(reveal.load_state(), LoadState::Failed);
        assert!(!reveal.placeholder_visible());
        assert_eq!(errors.lock().unwrap().len(), 1);

        reveal.trigger();
        assert!(!reveal.tick(0.0));
        assert_eq!(reveal.state(), RevealState::Failed);

        // Replay keeps the failure
        reveal.replay();
        assert_eq!(reveal.state(), RevealState::Failed);
    }

    #[test]
    fn test_load_after_failure_starts() {
        let mut reveal = reveal(config());
        reveal.image_failed("network");
        assert_eq!(reveal.state(), RevealState::Failed);

        reveal.image_loaded(image());
        assert_eq!(reveal.load_state(), LoadState::Loaded);
        assert_eq!(reveal.state(), RevealState::Idle);
        assert!(reveal.placeholder_visible());

        reveal.trigger();
        assert_eq!(reveal.state(), RevealState::Running);
        reveal.tick(0.0);
        assert!(reveal.tick(250.0));
        assert!((reveal.progress() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_observe_threshold() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut reveal = reveal(config());
        reveal.image_loaded(image());

        // 5% of the element peeks in, below the 10% threshold
        reveal.observe(Rect::new(0.0, 595.0, 100.0, 100.0), viewport);
        assert_eq!(reveal.state(), RevealState::Idle);

        reveal.observe(Rect::new(0.0, 550.0, 100.0, 100.0), viewport);
        assert_eq!(reveal.state(), RevealState::Running);

        // Scrolling away again does not stop it
        reveal.observe(Rect::new(0.0, 2000.0, 100.0, 100.0), viewport);
        assert_eq!(reveal.state(), RevealState::Running);
    }

    #[test]
    fn test_observe_root_margin() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let element = Rect::new(0.0, 640.0, 100.0, 100.0);

        let mut tight = reveal(config());
        tight.image_loaded(image());
        tight.observe(element, viewport);
        assert_eq!(tight.state(), RevealState::Idle);

        let mut margin = reveal(RevealConfiguration {
            viewport_root_margin: 60.0,
            ..config()
        });
        margin.image_loaded(image());
        margin.observe(element, viewport);
        assert_eq!(margin.state(), RevealState::Running);
    }

    #[test]
    fn test_replay_after_idle_honors_delay() {
        let mut reveal = reveal(RevealConfiguration {
            trigger_on_viewport: false,
            delay_ms: 300,
            duration_ms: 500,
            ..config()
        });
        reveal.image_loaded(image());
        assert_eq!(reveal.state(), RevealState::Delayed);

        let mut now = 0.0;
        while !reveal.is_complete() {
            reveal.pump(now);
            now += 16.0;
        }

        // The host sat idle, then replays at its current time
        reveal.scheduler_mut().set_now(10_000.0);
        reveal.replay();
        assert_eq!(reveal.state(), RevealState::Delayed);

        reveal.pump(10_000.0);
        assert_eq!(reveal.state(), RevealState::Delayed);
        reveal.pump(10_299.0);
        assert_eq!(reveal.state(), RevealState::Delayed);
        reveal.pump(10_300.0);
        assert_eq!(reveal.state(), RevealState::Running);
    }

    #[test]
    fn test_unmounted_surface_skips_redraw() {
        let mounted = Arc::new(Mutex::new(None::<Size>));
        let probe = mounted.clone();
        let mut reveal = InkReveal::new(config(), ManualScheduler::new(), move || *probe.lock().unwrap())
            .unwrap();
        reveal.image_loaded(image());
        reveal.trigger();

        assert!(!reveal.tick(0.0));
        assert!(!reveal.tick(300.0));
        assert!(reveal.surface().is_none());
        assert!((reveal.progress() - 0.3).abs() < 1e-6);

        *mounted.lock().unwrap() = Some(Size::new(40.0, 30.0));
        assert!(reveal.tick(400.0));
        assert_eq!(reveal.surface().map(Surface::backing_size), Some((40, 30)));
    }

    #[test]
    fn test_high_dpi_toggle() {
        let mut reveal = InkReveal::new(
            RevealConfiguration {
                high_dpi: false,
                ..config()
            },
            ManualScheduler::new(),
            FixedSurface::new(Size::new(50.0, 40.0), 3.0),
        )
        .unwrap();
        reveal.image_loaded(image());
        reveal.trigger();
        reveal.tick(0.0);
        assert_eq!(reveal.surface().map(Surface::backing_size), Some((50, 40)));
    }

    #[test]
    fn test_configure_resets_on_layout_change() {
        let mut reveal = reveal(config());
        reveal.image_loaded(image());
        reveal.trigger();
        reveal.tick(0.0);
        reveal.tick(500.0);
        let before = reveal.blobs().to_vec();

        // Playback-only changes leave the run alone
        let blobs = reveal
            .configure(RevealConfiguration {
                fade_in_start: 0.5,
                ..config()
            })
            .unwrap()
            .to_vec();
        assert_eq!(blobs, before);
        assert_eq!(reveal.state(), RevealState::Running);

        let blobs = reveal
            .configure(RevealConfiguration {
                pattern: crate::Pattern::Wave,
                blob_count: 6,
                ..config()
            })
            .unwrap();
        assert_eq!(blobs.len(), 6);
        assert_eq!(reveal.state(), RevealState::Idle);
        assert_eq!(reveal.progress(), 0.0);
        assert!(!reveal.driver().has_pending());
    }

    #[test]
    fn test_replay_restarts_with_fresh_blobs() {
        let mut reveal = reveal(config());
        reveal.image_loaded(image());
        reveal.trigger();
        reveal.tick(0.0);
        reveal.tick(1000.0);
        assert!(reveal.is_complete());
        let first = reveal.blobs().to_vec();

        reveal.replay();
        assert_eq!(reveal.state(), RevealState::Running);
        assert_eq!(reveal.progress(), 0.0);
        assert_ne!(reveal.blobs(), first.as_slice());
    }

    #[test]
    fn test_dispose_is_final() {
        let mut reveal = reveal(config());
        reveal.image_loaded(image());
        reveal.trigger();
        reveal.tick(0.0);
        reveal.dispose();

        assert!(!reveal.scheduler_mut().has_pending());
        reveal.trigger();
        reveal.replay();
        assert_eq!(reveal.state(), RevealState::Idle);
        assert!(!reveal.pump(100.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = InkReveal::new(
            RevealConfiguration {
                blob_complexity: 0,
                ..config()
            },
            ManualScheduler::new(),
            FixedSurface::new(Size::new(10.0, 10.0), 1.0),
        );
        assert!(matches!(result, Err(RevealError::InvalidConfig(_))));
    }
}
