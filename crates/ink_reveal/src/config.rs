//! Reveal configuration
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes.

use crate::blob::CustomBlob;
use crate::compositor::{parse_hex_color, Compositor};
use crate::driver::DriverOptions;
use crate::error::{Result, RevealError};
use crate::mask::{EdgeStyle, MIN_EDGE_POINTS};
use crate::pattern::{LayoutParams, Pattern};
use ink_animation::Easing;
use ink_image::{ObjectFit, ObjectPosition};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The parameter set driving blob generation and playback
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfiguration {
    /// Total reveal length
    pub duration_ms: u32,
    pub easing: Easing,
    /// Wait between trigger and the first frame
    pub delay_ms: u32,

    /// Wait for the host to report visibility before starting
    pub trigger_on_viewport: bool,
    /// Fraction of the element that must be visible, in `[0, 1]`
    pub viewport_threshold: f32,
    /// Logical pixels added around the viewport when testing visibility
    pub viewport_root_margin: f32,

    pub blob_count: usize,
    pub blob_size_min: f32,
    pub blob_size_max: f32,
    /// Edge noise amount in `[0, 1]`
    pub blob_roughness: f32,
    /// Edge points per blob
    pub blob_complexity: usize,
    /// Fraction of the timeline over which blob starts are spread
    pub blob_stagger: f32,
    pub pattern: Pattern,

    pub object_fit: ObjectFit,
    pub background_color: String,
    /// Gaussian blur radius for the placeholder, in pixels
    pub placeholder_blur: f32,
    /// Progress after which the final image fades in, in `[0, 1)`
    pub fade_in_start: f32,
    /// Scale the backing surface by the device pixel ratio
    pub high_dpi: bool,
    /// Skip the animation and show the image as soon as it can start
    pub disable_animation: bool,

    /// Fixed RNG seed for reproducible layouts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Passed through to the host untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,

    pub object_position: ObjectPosition,
    /// When non-empty, replaces the pattern
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_blobs: Vec<CustomBlob>,
}

impl Default for RevealConfiguration {
    fn default() -> Self {
        Self {
            duration_ms: 2500,
            easing: Easing::EaseOut,
            delay_ms: 0,
            trigger_on_viewport: true,
            viewport_threshold: 0.1,
            viewport_root_margin: 0.0,
            blob_count: 14,
            blob_size_min: 0.12,
            blob_size_max: 0.30,
            blob_roughness: 0.3,
            blob_complexity: 60,
            blob_stagger: 0.15,
            pattern: Pattern::Random,
            object_fit: ObjectFit::Cover,
            background_color: "#e5e7eb".to_string(),
            placeholder_blur: 20.0,
            fade_in_start: 0.7,
            high_dpi: true,
            disable_animation: false,
            seed: None,
            aria_label: None,
            object_position: ObjectPosition::CENTER,
            custom_blobs: Vec::new(),
        }
    }
}

impl RevealConfiguration {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values that cannot produce a sensible reveal
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(RevealError::InvalidConfig(msg.into()))
        }

        if !(self.blob_size_min > 0.0 && self.blob_size_max > 0.0) {
            return invalid("blob sizes must be positive");
        }
        if self.blob_size_min > self.blob_size_max {
            return invalid(format!(
                "blob_size_min ({}) exceeds blob_size_max ({})",
                self.blob_size_min, self.blob_size_max
            ));
        }
        if !(0.0..=1.0).contains(&self.blob_roughness) {
            return invalid("blob_roughness must be within [0, 1]");
        }
        if self.blob_complexity < MIN_EDGE_POINTS {
            return invalid(format!(
                "blob_complexity must be at least {MIN_EDGE_POINTS}"
            ));
        }
        if !(0.0..=1.0).contains(&self.blob_stagger) {
            return invalid("blob_stagger must be within [0, 1]");
        }
        if !(0.0..1.0).contains(&self.fade_in_start) {
            return invalid("fade_in_start must be within [0, 1)");
        }
        if !(0.0..=1.0).contains(&self.viewport_threshold) {
            return invalid("viewport_threshold must be within [0, 1]");
        }
        if !self.viewport_root_margin.is_finite() {
            return invalid("viewport_root_margin must be finite");
        }
        if !(self.placeholder_blur >= 0.0) {
            return invalid("placeholder_blur must not be negative");
        }
        if parse_hex_color(&self.background_color).is_none() {
            return invalid(format!(
                "background_color `{}` is not a hex colour",
                self.background_color
            ));
        }

        for (i, blob) in self.custom_blobs.iter().enumerate() {
            if !(blob.x.is_finite() && blob.y.is_finite()) {
                return invalid(format!("custom blob {i} has a non-finite position"));
            }
            if blob.size.is_some_and(|s| !(s > 0.0)) {
                return invalid(format!("custom blob {i} needs a positive size"));
            }
            if blob.delay.is_some_and(|d| !(d >= 0.0)) {
                return invalid(format!("custom blob {i} has a negative delay"));
            }
        }

        Ok(())
    }

    /// Inputs to blob generation
    pub fn layout(&self) -> LayoutParams {
        LayoutParams {
            count: self.blob_count,
            pattern: self.pattern,
            size_min: self.blob_size_min,
            size_max: self.blob_size_max,
            stagger: self.blob_stagger,
            custom: self.custom_blobs.clone(),
        }
    }

    pub fn edge_style(&self) -> EdgeStyle {
        EdgeStyle {
            roughness: self.blob_roughness,
            points: self.blob_complexity,
        }
    }

    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            duration_ms: self.duration_ms,
            start_delay_ms: self.delay_ms,
            fade_in_start: self.fade_in_start,
            animate: !self.disable_animation,
        }
    }

    pub fn compositor(&self) -> Compositor {
        Compositor::new(self.object_fit, self.object_position)
    }
}
