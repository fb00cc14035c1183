// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;
use thiserror::Error;

use crate::charset::{charset_from_str, preset_listing, Charset};
use crate::palette::{BaseColor, ColorRole};
use crate::raster::Style;
use crate::runtime::{Intensity, RenderMode, Theme};
use crate::transform::RotationSpeed;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  matrixfall --speed 0.1 --density 0.075 --trail-length 10 --bright-length 2 --theme classic --color-intensity normal --glitch-rate 0 --charset default --mode cylinder --rotation-speed 0.1 --depth-effect-strength 0.5 --cylindrical-radius-factor 1";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_usage(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        if !line.starts_with(' ') && line.ends_with(':') {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("  matrixfall") {
            out.push_str("  \x1b[1;34mmatrixfall\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_usage(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "matrixfall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'S',
        long = "speed",
        allow_negative_numbers = true,
        default_value_t = 0.1,
        help_heading = "ANIMATION",
        help = "Seconds between frames (min 0.005 effective)"
    )]
    pub speed: f64,

    #[arg(
        short = 'd',
        long = "density",
        allow_negative_numbers = true,
        default_value_t = 0.075,
        help_heading = "ANIMATION",
        help = "Chance an idle column spawns a stream each frame (0 < d <= 1)"
    )]
    pub density: f64,

    #[arg(
        short = 't',
        long = "trail-length",
        allow_negative_numbers = true,
        default_value_t = 10,
        help_heading = "ANIMATION",
        help = "Trail length in rows (> 2)"
    )]
    pub trail_length: i64,

    #[arg(
        short = 'b',
        long = "bright-length",
        allow_negative_numbers = true,
        default_value_t = 2,
        help_heading = "APPEARANCE",
        help = "Bright segment behind the head (>= 0; trail must be >= bright + 2)"
    )]
    pub bright_length: i64,

    #[arg(
        long = "theme",
        default_value_t = Theme::Classic,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Colour theme"
    )]
    pub theme: Theme,

    #[arg(
        long = "color-intensity",
        default_value_t = Intensity::Normal,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Shift every tier toward white (bright) or base colour (dim)"
    )]
    pub color_intensity: Intensity,

    #[arg(
        short = 'G',
        long = "glitch-rate",
        allow_negative_numbers = true,
        default_value_t = 0.0,
        help_heading = "APPEARANCE",
        help = "Chance a glyph is swapped for another (min 0 max 1)"
    )]
    pub glitch_rate: f64,

    #[arg(
        long = "base-colors",
        help_heading = "APPEARANCE",
        help = "Comma-separated base colours for the colorful theme (see --list-colors)"
    )]
    pub base_colors: Option<String>,

    #[arg(
        long = "charset",
        default_value = "default",
        help_heading = "CHARSET",
        help = "Charset preset (see --list-charsets)"
    )]
    pub charset: String,

    #[arg(
        long = "char-set",
        help_heading = "CHARSET",
        help = "Literal glyphs to use instead of any preset"
    )]
    pub char_set: Option<String>,

    #[arg(
        short = 'm',
        long = "mode",
        default_value_t = RenderMode::Cylinder,
        value_enum,
        help_heading = "3D",
        help = "Projection mode"
    )]
    pub mode: RenderMode,

    #[arg(
        long = "rotation-speed",
        allow_negative_numbers = true,
        alias = "rotation_speed",
        visible_alias = "rotation-speed-y",
        default_value_t = 0.1,
        help_heading = "3D",
        help = "Rotation about the vertical axis in rad/s"
    )]
    pub rotation_speed: f32,

    #[arg(
        long = "rotation-speed-x",
        allow_negative_numbers = true,
        default_value_t = 0.0,
        help_heading = "3D",
        help = "Rotation about the X axis in rad/s (scene mode)"
    )]
    pub rotation_speed_x: f32,

    #[arg(
        long = "rotation-speed-z",
        allow_negative_numbers = true,
        default_value_t = 0.0,
        help_heading = "3D",
        help = "Rotation about the Z axis in rad/s (scene mode)"
    )]
    pub rotation_speed_z: f32,

    #[arg(
        long = "depth-effect-strength",
        allow_negative_numbers = true,
        alias = "depth_effect_strength",
        default_value_t = 0.5,
        help_heading = "3D",
        help = "How strongly depth dims glyphs (min 0 max 1)"
    )]
    pub depth_effect_strength: f32,

    #[arg(
        long = "cylindrical-radius-factor",
        allow_negative_numbers = true,
        alias = "cylindrical_radius_factor",
        default_value_t = 1.0,
        help_heading = "3D",
        help = "Cylinder radius multiplier (> 0)"
    )]
    pub cylindrical_radius_factor: f32,

    #[arg(
        long = "width",
        allow_negative_numbers = true,
        help_heading = "GENERAL",
        help = "Grid width in cells (requires --height)"
    )]
    pub width: Option<i64>,

    #[arg(
        long = "height",
        allow_negative_numbers = true,
        help_heading = "GENERAL",
        help = "Grid height in cells (requires --width)"
    )]
    pub height: Option<i64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the random generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "duration",
        allow_negative_numbers = true,
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List available charset presets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List available colour names and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

const MAX_SECONDS: f64 = 86400.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("--{flag} must be a finite number (got {value})")]
    NotFinite { flag: &'static str, value: f64 },
    #[error("animation speed must be greater than 0 and at most 86400 seconds (got {0})")]
    Speed(f64),
    #[error("column density must be greater than 0 and at most 1 (got {0})")]
    Density(f64),
    #[error("trail length must be greater than 2 (got {0})")]
    TrailLength(i64),
    #[error("bright length cannot be negative (got {0})")]
    BrightLength(i64),
    #[error(
        "trail length ({trail}) must be at least bright length ({bright}) + 2 to fit the head, the bright segment and one dim glyph"
    )]
    TrailTooShort { trail: i64, bright: i64 },
    #[error("glitch rate must be between 0 and 1 inclusive (got {0})")]
    GlitchRate(f64),
    #[error("--char-set cannot be an empty string")]
    EmptyCharSet,
    #[error("{0}")]
    Charset(String),
    #[error("--{flag} must be a positive integer no larger than 65535 (got {value})")]
    Dimension { flag: &'static str, value: i64 },
    #[error("both --width and --height must be provided if one is specified")]
    UnpairedDimensions,
    #[error("depth effect strength must be between 0 and 1 inclusive (got {0})")]
    DepthStrength(f32),
    #[error("cylindrical radius factor must be greater than 0 (got {0})")]
    RadiusFactor(f32),
    #[error("--duration must be between 0.1 and 86400 seconds (got {0})")]
    Duration(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub speed: f64,
    pub density: f64,
    pub trail_length: u32,
    pub bright_length: u32,
    pub theme: Theme,
    pub intensity: Intensity,
    pub glitch_rate: f64,
    pub charset: Charset,
    pub char_set: Option<String>,
    pub base_colors: Option<String>,
    // None follows the terminal.
    pub size: Option<(u16, u16)>,
    pub mode: RenderMode,
    pub rotation: RotationSpeed,
    pub depth_strength: f32,
    pub radius_factor: f32,
    pub seed: Option<u64>,
    pub duration: Option<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 0.1,
            density: 0.075,
            trail_length: 10,
            bright_length: 2,
            theme: Theme::Classic,
            intensity: Intensity::Normal,
            glitch_rate: 0.0,
            charset: Charset::DEFAULT,
            char_set: None,
            base_colors: None,
            size: None,
            mode: RenderMode::Cylinder,
            rotation: RotationSpeed {
                x: 0.0,
                y: 0.1,
                z: 0.0,
            },
            depth_strength: 0.5,
            radius_factor: 1.0,
            seed: None,
            duration: None,
        }
    }
}

fn finite(flag: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { flag, value })
    }
}

fn finite32(flag: &'static str, value: f32) -> Result<f32, ConfigError> {
    finite(flag, value as f64).map(|_| value)
}

fn dimension(flag: &'static str, value: i64) -> Result<u16, ConfigError> {
    match u16::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::Dimension { flag, value }),
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let speed = finite("speed", args.speed)?;
        if speed <= 0.0 || speed > MAX_SECONDS {
            return Err(ConfigError::Speed(speed));
        }

        let density = finite("density", args.density)?;
        if density <= 0.0 || density > 1.0 {
            return Err(ConfigError::Density(density));
        }

        if args.trail_length <= 2 {
            return Err(ConfigError::TrailLength(args.trail_length));
        }
        if args.bright_length < 0 {
            return Err(ConfigError::BrightLength(args.bright_length));
        }
        if args.trail_length < args.bright_length.saturating_add(2) {
            return Err(ConfigError::TrailTooShort {
                trail: args.trail_length,
                bright: args.bright_length,
            });
        }
        let trail_length =
            u32::try_from(args.trail_length).map_err(|_| ConfigError::TrailLength(args.trail_length))?;
        let bright_length = u32::try_from(args.bright_length)
            .map_err(|_| ConfigError::BrightLength(args.bright_length))?;

        let glitch_rate = finite("glitch-rate", args.glitch_rate)?;
        if !(0.0..=1.0).contains(&glitch_rate) {
            return Err(ConfigError::GlitchRate(glitch_rate));
        }

        if args.char_set.as_deref() == Some("") {
            return Err(ConfigError::EmptyCharSet);
        }
        let charset = charset_from_str(&args.charset).map_err(ConfigError::Charset)?;

        let size = match (args.width, args.height) {
            (Some(w), Some(h)) => Some((dimension("width", w)?, dimension("height", h)?)),
            (None, None) => None,
            _ => return Err(ConfigError::UnpairedDimensions),
        };

        let rotation = RotationSpeed {
            x: finite32("rotation-speed-x", args.rotation_speed_x)?,
            y: finite32("rotation-speed", args.rotation_speed)?,
            z: finite32("rotation-speed-z", args.rotation_speed_z)?,
        };

        let depth_strength = finite32("depth-effect-strength", args.depth_effect_strength)?;
        if !(0.0..=1.0).contains(&depth_strength) {
            return Err(ConfigError::DepthStrength(depth_strength));
        }

        let radius_factor = finite32("cylindrical-radius-factor", args.cylindrical_radius_factor)?;
        if radius_factor <= 0.0 {
            return Err(ConfigError::RadiusFactor(radius_factor));
        }

        let duration = match args.duration {
            Some(s) => {
                let s = finite("duration", s)?;
                if s <= 0.0 {
                    None
                } else if (0.1..=MAX_SECONDS).contains(&s) {
                    Some(s)
                } else {
                    return Err(ConfigError::Duration(s));
                }
            }
            None => None,
        };

        Ok(Self {
            speed,
            density,
            trail_length,
            bright_length,
            theme: args.theme,
            intensity: args.color_intensity,
            glitch_rate,
            charset,
            char_set: args.char_set.clone(),
            base_colors: args.base_colors.clone(),
            size,
            mode: args.mode,
            rotation,
            depth_strength,
            radius_factor,
            seed: args.seed,
            duration,
        })
    }

    pub fn style(&self) -> Style {
        Style {
            intensity: self.intensity,
            bright_length: self.bright_length,
            glitch_rate: self.glitch_rate,
            depth_strength: self.depth_strength,
        }
    }
}

fn print_heading(title: &str, note: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", title);
        println!("\x1b[2m{}\x1b[0m", note);
    } else {
        println!("{}", title);
        println!("{}", note);
    }
    println!();
}

pub fn print_list_charsets() {
    print_heading(
        "AVAILABLE CHARSET PRESETS:",
        "NOTE: Use only the VALUE (left side) with --charset.",
    );
    println!("VALUE        DESCRIPTION");
    for (name, desc) in preset_listing() {
        println!("{:<12} {}", name, desc);
    }
}

pub fn print_list_colors() {
    print_heading(
        "AVAILABLE COLOURS:",
        "NOTE: Pass a comma-separated list of VALUEs with --theme colorful --base-colors.",
    );
    println!("VALUE           ROLE");
    for role in ColorRole::registry() {
        let kind = match role {
            ColorRole::Base(_) => "base",
            ColorRole::Bright(_) => "bright variant",
            ColorRole::White => "head",
            ColorRole::Reset => "terminal default",
        };
        println!("{:<15} {}", role.name(), kind);
    }
    println!();
    println!(
        "classic theme uses {} only; colorful defaults to: {}",
        BaseColor::Green.name(),
        BaseColor::ALL.map(BaseColor::name).join(", ")
    );
}
