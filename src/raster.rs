// Copyright (c) 2026 rezky_nightky

use rand::{seq::IndexedRandom, Rng};

use crate::cell::Cell;
use crate::charset::{is_single_width, CharSets};
use crate::frame::Frame;
use crate::palette::{BaseColor, Palette, Tier};
use crate::runtime::Intensity;
use crate::stream::DEPTH_HINT_MAX;

// Larger depth is closer.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: u16,
    height: u16,
    depth: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            depth: vec![f32::NEG_INFINITY; width as usize * height as usize],
        }
    }

    pub fn reset(&mut self) {
        self.depth.fill(f32::NEG_INFINITY);
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y as usize * self.width as usize + x as usize])
    }

    // Strictly closer wins; ties keep the earlier sample.
    pub fn try_claim(&mut self, x: u16, y: u16, depth: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.depth[y as usize * self.width as usize + x as usize];
        if depth > *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Style {
    pub intensity: Intensity,
    pub bright_length: u32,
    pub glitch_rate: f64,
    pub depth_strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthCue {
    pub hint: u8,
    // Already scaled by the depth strength.
    pub global: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: u16,
    pub y: u16,
    pub depth: f32,
    pub distance_from_head: u32,
    pub char_set: usize,
    pub cue: Option<DepthCue>,
}

pub fn cylinder_dim(z_world: f32, radius: f32, strength: f32) -> f32 {
    if radius <= 0.001 {
        return 0.0;
    }
    (1.0 - z_world / radius) * strength
}

pub fn pick_glyph<R: Rng>(set: &[char], glitch_rate: f64, rng: &mut R) -> char {
    let Some(&first) = set.choose(rng) else {
        return ' ';
    };
    let mut ch = if is_single_width(first) { first } else { ' ' };
    if glitch_rate > 0.0 && rng.random_bool(glitch_rate.min(1.0)) {
        if let Some(&candidate) = set.choose(rng) {
            if is_single_width(candidate) {
                ch = candidate;
            }
        }
    }
    ch
}

// Hint pass first, then the global pass. Both saturate at Tier::Dim.
pub fn shade(tier: Tier, cue: DepthCue, strength: f32) -> Tier {
    let influence = (cue.hint as f32 / DEPTH_HINT_MAX as f32) * strength;
    let tier = match tier {
        Tier::Head if influence > 0.7 => Tier::Dim,
        Tier::Head if influence > 0.4 => Tier::Bright,
        Tier::Bright if influence > 0.6 => Tier::Dim,
        t => t,
    };

    if cue.global > 0.65 {
        tier.darker()
    } else if cue.global > 0.35 && tier == Tier::Head {
        Tier::Bright
    } else {
        tier
    }
}

pub struct Rasterizer {
    depth: DepthBuffer,
    style: Style,
    palette: Palette,
    bases: Vec<BaseColor>,
}

impl Rasterizer {
    pub fn new(width: u16, height: u16, style: Style, palette: Palette) -> Self {
        let mut bases = palette.base_colors();
        if bases.is_empty() {
            bases.push(BaseColor::Green);
        }
        Self {
            depth: DepthBuffer::new(width, height),
            style,
            palette,
            bases,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.depth = DepthBuffer::new(width, height);
    }

    pub fn begin(&mut self, frame: &mut Frame) {
        frame.clear();
        self.depth.reset();
    }

    fn pick_base<R: Rng>(&self, rng: &mut R) -> BaseColor {
        match self.bases.as_slice() {
            [only] => *only,
            many => many.choose(rng).copied().unwrap_or(BaseColor::Green),
        }
    }

    pub fn plot<R: Rng>(
        &mut self,
        frame: &mut Frame,
        sample: &Sample,
        sets: &CharSets,
        rng: &mut R,
    ) -> bool {
        if !self.depth.try_claim(sample.x, sample.y, sample.depth) {
            return false;
        }

        let ch = pick_glyph(sets.get(sample.char_set), self.style.glitch_rate, rng);
        let base = self.pick_base(rng);

        let mut tier = Tier::classify(sample.distance_from_head, self.style.bright_length);
        if let Some(cue) = sample.cue {
            tier = shade(tier, cue, self.style.depth_strength);
        }

        let role = self.palette.role_for(tier, base, self.style.intensity);
        frame.set(sample.x, sample.y, Cell::glyph(ch, role));
        true
    }
}
