//! Blob layout generation
//!
//! Each pattern places blob anchors in normalized frame space and assigns
//! staggered delays that shape how the reveal spreads. Randomness always
//! comes from a caller-supplied RNG so layouts can be reproduced.

use crate::blob::{BlobDescriptor, CustomBlob};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// Spatial reveal pattern
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Scattered blobs plus fixed coverage blobs at the corners and centre
    #[default]
    Random,
    /// A ring around the centre, growing outward
    Center,
    /// Clusters in the four corners
    Corners,
    /// Two turns of an Archimedean spiral
    Spiral,
    /// A sine wave sweeping left to right
    Wave,
    /// Large blobs bursting from the centre at once
    Explosion,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::Random,
        Pattern::Center,
        Pattern::Corners,
        Pattern::Spiral,
        Pattern::Wave,
        Pattern::Explosion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Random => "random",
            Pattern::Center => "center",
            Pattern::Corners => "corners",
            Pattern::Spiral => "spiral",
            Pattern::Wave => "wave",
            Pattern::Explosion => "explosion",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|pattern| pattern.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown pattern `{s}`"))
    }
}

/// Corner anchors: top-left, top-right, bottom-left, bottom-right
const CORNERS: [(f32, f32); 4] = [(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)];

/// Maximum corner jitter on each axis
pub const CORNER_JITTER: f32 = 0.15;

/// Everything that determines a blob layout
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    pub count: usize,
    pub pattern: Pattern,
    pub size_min: f32,
    pub size_max: f32,
    pub stagger: f32,
    /// When non-empty, replaces the pattern entirely
    pub custom: Vec<CustomBlob>,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            count: 14,
            pattern: Pattern::Random,
            size_min: 0.12,
            size_max: 0.30,
            stagger: 0.15,
            custom: Vec::new(),
        }
    }
}

/// Owns the RNG used for successive layouts of one reveal instance
pub struct BlobGenerator {
    rng: StdRng,
}

impl BlobGenerator {
    /// Generator with a fixed seed, for reproducible layouts
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn generate(&mut self, params: &LayoutParams) -> Vec<BlobDescriptor> {
        generate_blobs(&mut self.rng, params)
    }
}

/// Produce the blob set for a layout.
///
/// Every blob gets an independent noise seed. Anchors are clamped into the
/// unit frame.
pub fn generate_blobs<R: Rng + ?Sized>(rng: &mut R, params: &LayoutParams) -> Vec<BlobDescriptor> {
    if !params.custom.is_empty() {
        return custom_blobs(rng, params);
    }

    let mut gen = Sampler {
        rng,
        size_min: params.size_min,
        size_range: params.size_max - params.size_min,
    };
    let count = params.count;
    let stagger = params.stagger;
    let mut blobs = Vec::with_capacity(count + 5);

    match params.pattern {
        Pattern::Random => {
            for _ in 0..count {
                let x = 0.1 + gen.unit() * 0.8;
                let y = 0.1 + gen.unit() * 0.8;
                let base_size = gen.size();
                let delay = gen.unit() * stagger;
                blobs.push(gen.blob(x, y, base_size, delay));
            }

            // Coverage blobs so the frame fills regardless of the scatter
            let (min, range) = (gen.size_min, gen.size_range);
            blobs.push(gen.blob(0.15, 0.15, min + range * 0.3, 0.05));
            blobs.push(gen.blob(0.85, 0.15, min + range * 0.4, 0.08));
            blobs.push(gen.blob(0.15, 0.85, min + range * 0.2, 0.1));
            blobs.push(gen.blob(0.85, 0.85, min + range * 0.3, 0.03));
            blobs.push(gen.blob(0.5, 0.5, params.size_max * 1.1, 0.0));
        }

        Pattern::Center => {
            for i in 0..count {
                let angle = (i as f32 / count as f32) * TAU;
                let dist = 0.1 + gen.unit() * 0.4;
                let base_size = gen.size();
                blobs.push(gen.blob(
                    0.5 + angle.cos() * dist,
                    0.5 + angle.sin() * dist,
                    base_size,
                    dist * stagger * 2.0,
                ));
            }
            blobs.push(gen.blob(0.5, 0.5, params.size_max * 1.2, 0.0));
        }

        Pattern::Corners => {
            // At least one blob per corner so small counts still cover all four
            let per_corner = (count / 4).max(1);
            for (idx, (cx, cy)) in CORNERS.into_iter().enumerate() {
                for _ in 0..per_corner {
                    let x = cx + (gen.unit() - 0.5) * 2.0 * CORNER_JITTER;
                    let y = cy + (gen.unit() - 0.5) * 2.0 * CORNER_JITTER;
                    let base_size = gen.size();
                    let delay = idx as f32 * 0.05 + gen.unit() * stagger;
                    blobs.push(gen.blob(x, y, base_size, delay));
                }
            }
        }

        Pattern::Spiral => {
            for i in 0..count {
                let t = i as f32 / count as f32;
                let angle = t * PI * 4.0;
                let dist = 0.1 + t * 0.35;
                let base_size = gen.size();
                blobs.push(gen.blob(
                    0.5 + angle.cos() * dist,
                    0.5 + angle.sin() * dist,
                    base_size,
                    t * stagger,
                ));
            }
        }

        Pattern::Wave => {
            for i in 0..count {
                let x = (i as f32 / count as f32) * 0.8 + 0.1;
                let y = 0.5 + (x * TAU).sin() * 0.2 + (gen.unit() - 0.5) * 0.2;
                let base_size = gen.size();
                blobs.push(gen.blob(x, y, base_size, x * stagger));
            }
        }

        Pattern::Explosion => {
            for _ in 0..count {
                let angle = gen.unit() * TAU;
                let dist = 0.05 + gen.unit() * 0.45;
                let base_size = gen.size_min + gen.unit() * gen.size_range * 1.3;
                let delay = gen.unit() * stagger * 0.5;
                blobs.push(gen.blob(
                    0.5 + angle.cos() * dist,
                    0.5 + angle.sin() * dist,
                    base_size,
                    delay,
                ));
            }
        }
    }

    tracing::debug!(pattern = %params.pattern, count, blobs = blobs.len(), "generated blob layout");
    blobs
}

fn custom_blobs<R: Rng + ?Sized>(rng: &mut R, params: &LayoutParams) -> Vec<BlobDescriptor> {
    let len = params.custom.len() as f32;
    let size_range = params.size_max - params.size_min;

    params
        .custom
        .iter()
        .enumerate()
        .map(|(i, custom)| {
            let base_size = custom
                .size
                .unwrap_or_else(|| params.size_min + rng.gen::<f32>() * size_range);
            let delay = custom
                .delay
                .unwrap_or(i as f32 / len * params.stagger);
            BlobDescriptor {
                x: custom.x,
                y: custom.y,
                base_size,
                seed: rng.gen::<f32>() * 1000.0,
                delay,
            }
        })
        .collect()
}

struct Sampler<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    size_min: f32,
    size_range: f32,
}

impl<R: Rng + ?Sized> Sampler<'_, R> {
    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn size(&mut self) -> f32 {
        self.size_min + self.unit() * self.size_range
    }

    fn blob(&mut self, x: f32, y: f32, base_size: f32, delay: f32) -> BlobDescriptor {
        BlobDescriptor {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            base_size,
            seed: self.unit() * 1000.0,
            delay,
        }
    }
}
