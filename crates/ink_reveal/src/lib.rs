//! Ink Reveal Engine
//!
//! Progressively reveals an image through a mask of irregular "ink blobs"
//! that grow from scattered anchor points until they cover the frame.
//!
//! # Pieces
//!
//! - [`pattern`]: blob layouts for each spatial pattern, driven by an injected RNG
//! - [`mask`]: pure noisy-edge polygon tracing and per-frame mask assembly
//! - [`compositor`]: surface sizing, clipping and fitted image drawing
//! - [`driver`]: the `Idle → Delayed → Running → Complete` timeline state machine
//! - [`InkReveal`]: the host-facing object tying them together
//!
//! # Example
//!
//! ```ignore
//! use ink_reveal::{FixedSurface, InkReveal, RevealConfiguration};
//! use ink_animation::ManualScheduler;
//! use ink_core::Size;
//!
//! let surface = FixedSurface::new(Size::new(640.0, 480.0), 2.0);
//! let mut reveal = InkReveal::new(RevealConfiguration::default(), ManualScheduler::new(), surface)?;
//! reveal.load(ink_image::ImageSource::file("photo.jpg"))?;
//! reveal.trigger();
//!
//! let mut now = 0.0;
//! while !reveal.is_complete() {
//!     reveal.pump(now);
//!     now += 16.0;
//! }
//! ```

pub mod blob;
pub mod compositor;
pub mod config;
pub mod driver;
pub mod error;
pub mod mask;
pub mod pattern;
pub mod reveal;
pub mod visibility;

pub use blob::{BlobDescriptor, CustomBlob};
pub use compositor::{parse_hex_color, Compositor, LayerStack, Surface};
pub use config::RevealConfiguration;
pub use driver::{DriverOptions, FrameRenderer, RevealDriver, RevealState};
pub use error::{Result, RevealError};
pub use mask::{assemble_mask, trace_blob_path, BlobPath, BlobShape, EdgeStyle, MaskFrame};
pub use pattern::{generate_blobs, BlobGenerator, LayoutParams, Pattern};
pub use reveal::{FixedSurface, InkReveal, LoadState, SurfaceSizeProvider};
