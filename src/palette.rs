// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use thiserror::Error;

use crate::runtime::{Intensity, Theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseColor {
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
}

impl BaseColor {
    pub const ALL: [BaseColor; 5] = [
        BaseColor::Green,
        BaseColor::Blue,
        BaseColor::Cyan,
        BaseColor::Magenta,
        BaseColor::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BaseColor::Green => "GREEN",
            BaseColor::Blue => "BLUE",
            BaseColor::Cyan => "CYAN",
            BaseColor::Magenta => "MAGENTA",
            BaseColor::Yellow => "YELLOW",
        }
    }

    pub fn bright(self) -> Option<ColorRole> {
        self.bright_color().map(|_| ColorRole::Bright(self))
    }

    fn color(self) -> Color {
        match self {
            BaseColor::Green => Color::DarkGreen,
            BaseColor::Blue => Color::DarkBlue,
            BaseColor::Cyan => Color::DarkCyan,
            BaseColor::Magenta => Color::DarkMagenta,
            BaseColor::Yellow => Color::DarkYellow,
        }
    }

    fn bright_color(self) -> Option<Color> {
        match self {
            BaseColor::Green => Some(Color::Green),
            BaseColor::Blue => Some(Color::Blue),
            BaseColor::Cyan => Some(Color::Cyan),
            BaseColor::Magenta => Some(Color::Magenta),
            BaseColor::Yellow => Some(Color::Yellow),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorRole {
    White,
    Reset,
    Base(BaseColor),
    Bright(BaseColor),
}

impl ColorRole {
    pub fn registry() -> impl Iterator<Item = ColorRole> {
        [ColorRole::White]
            .into_iter()
            .chain(BaseColor::ALL.into_iter().flat_map(|b| {
                [Some(ColorRole::Base(b)), b.bright()].into_iter().flatten()
            }))
            .chain([ColorRole::Reset])
    }

    pub fn parse(name: &str) -> Option<ColorRole> {
        let upper = name.trim().to_ascii_uppercase();
        ColorRole::registry().find(|r| r.name() == upper)
    }

    pub fn name(self) -> String {
        match self {
            ColorRole::White => "WHITE".to_string(),
            ColorRole::Reset => "RESET".to_string(),
            ColorRole::Base(b) => b.name().to_string(),
            ColorRole::Bright(b) => format!("BRIGHT_{}", b.name()),
        }
    }

    pub fn color(self) -> Color {
        match self {
            ColorRole::White => Color::White,
            ColorRole::Reset => Color::Reset,
            ColorRole::Base(b) => b.color(),
            ColorRole::Bright(b) => b.bright_color().unwrap_or_else(|| b.color()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PaletteWarning {
    #[error("invalid or unsuitable base color name '{0}' in --base-colors, ignoring")]
    Rejected(String),
    #[error("no valid base colors in --base-colors, using the full colorful palette")]
    NoValidBaseColors,
    #[error("colorful palette has no usable base colors, adding GREEN")]
    InjectedGreen,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    roles: Vec<ColorRole>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Head,
    Bright,
    Dim,
}

impl Tier {
    pub fn classify(distance_from_head: u32, bright_length: u32) -> Tier {
        if distance_from_head == 0 {
            Tier::Head
        } else if distance_from_head <= bright_length {
            Tier::Bright
        } else {
            Tier::Dim
        }
    }

    pub fn darker(self) -> Tier {
        match self {
            Tier::Head => Tier::Bright,
            Tier::Bright | Tier::Dim => Tier::Dim,
        }
    }
}

pub struct Resolved {
    pub palette: Palette,
    pub warnings: Vec<PaletteWarning>,
}

impl Palette {
    pub fn classic() -> Self {
        Self {
            roles: vec![
                ColorRole::White,
                ColorRole::Bright(BaseColor::Green),
                ColorRole::Base(BaseColor::Green),
                ColorRole::Reset,
            ],
        }
    }

    pub fn resolve(theme: Theme, base_colors: Option<&str>) -> Resolved {
        match theme {
            Theme::Classic => Resolved {
                palette: Palette::classic(),
                warnings: Vec::new(),
            },
            Theme::Colorful => resolve_colorful(base_colors.unwrap_or("")),
        }
    }

    #[cfg(test)]
    pub fn roles(&self) -> &[ColorRole] {
        &self.roles
    }

    pub fn contains(&self, role: ColorRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn base_colors(&self) -> Vec<BaseColor> {
        self.roles
            .iter()
            .filter_map(|r| match r {
                ColorRole::Base(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn white(&self) -> ColorRole {
        ColorRole::White
    }

    pub fn bright_of(&self, base: BaseColor) -> ColorRole {
        match base.bright() {
            Some(r) if self.contains(r) => r,
            _ => ColorRole::Base(base),
        }
    }

    pub fn role_for(&self, tier: Tier, base: BaseColor, intensity: Intensity) -> ColorRole {
        let white = self.white();
        let bright = self.bright_of(base);
        let plain = ColorRole::Base(base);
        let (head, seg1, seg2) = match intensity {
            Intensity::Dim => (bright, plain, plain),
            Intensity::Normal => (white, bright, plain),
            Intensity::Bright => (white, white, bright),
        };
        match tier {
            Tier::Head => head,
            Tier::Bright => seg1,
            Tier::Dim => seg2,
        }
    }
}

fn push_unique(roles: &mut Vec<ColorRole>, role: ColorRole) {
    if !roles.contains(&role) {
        roles.push(role);
    }
}

fn push_base(roles: &mut Vec<ColorRole>, base: BaseColor) {
    push_unique(roles, ColorRole::Base(base));
    if let Some(bright) = base.bright() {
        push_unique(roles, bright);
    }
}

fn full_palette(roles: &mut Vec<ColorRole>) {
    for role in ColorRole::registry() {
        if role != ColorRole::Reset {
            push_unique(roles, role);
        }
    }
}

fn resolve_colorful(list: &str) -> Resolved {
    let mut roles = vec![ColorRole::Reset, ColorRole::White];
    let mut warnings = Vec::new();

    let names: Vec<&str> = list
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect();

    if names.is_empty() {
        full_palette(&mut roles);
    } else {
        let mut accepted = 0usize;
        for name in names {
            match ColorRole::parse(name) {
                Some(ColorRole::Base(base)) => {
                    push_base(&mut roles, base);
                    accepted += 1;
                }
                _ => warnings.push(PaletteWarning::Rejected(name.to_ascii_uppercase())),
            }
        }
        if accepted == 0 {
            warnings.push(PaletteWarning::NoValidBaseColors);
            full_palette(&mut roles);
        }
    }

    if !roles.iter().any(|r| matches!(r, ColorRole::Base(_))) {
        warnings.push(PaletteWarning::InjectedGreen);
        push_base(&mut roles, BaseColor::Green);
    }

    Resolved {
        palette: Palette { roles },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_has_four_fixed_roles() {
        let r = Palette::resolve(Theme::Classic, Some("BLUE"));
        assert!(r.warnings.is_empty());
        assert_eq!(
            r.palette.roles(),
            &[
                ColorRole::White,
                ColorRole::Bright(BaseColor::Green),
                ColorRole::Base(BaseColor::Green),
                ColorRole::Reset,
            ]
        );
    }

    #[test]
    fn colorful_without_list_uses_every_base_color() {
        let r = Palette::resolve(Theme::Colorful, None);
        assert!(r.warnings.is_empty());
        assert_eq!(r.palette.base_colors(), BaseColor::ALL.to_vec());
        for b in BaseColor::ALL {
            assert!(r.palette.contains(ColorRole::Bright(b)));
        }
        assert!(r.palette.contains(ColorRole::White));
        assert!(r.palette.contains(ColorRole::Reset));
    }

    #[test]
    fn colorful_keeps_only_valid_names_and_their_bright_variants() {
        let r = Palette::resolve(Theme::Colorful, Some(" cyan, bright_blue,white,nope,Yellow "));
        assert_eq!(
            r.palette.base_colors(),
            vec![BaseColor::Cyan, BaseColor::Yellow]
        );
        assert!(r.palette.contains(ColorRole::Bright(BaseColor::Cyan)));
        assert!(!r.palette.contains(ColorRole::Bright(BaseColor::Blue)));
        assert_eq!(
            r.warnings,
            vec![
                PaletteWarning::Rejected("BRIGHT_BLUE".into()),
                PaletteWarning::Rejected("WHITE".into()),
                PaletteWarning::Rejected("NOPE".into()),
            ]
        );
    }

    #[test]
    fn colorful_with_only_invalid_names_falls_back_to_full_palette() {
        let r = Palette::resolve(Theme::Colorful, Some("reset,purple"));
        assert_eq!(r.palette.base_colors(), BaseColor::ALL.to_vec());
        assert_eq!(r.warnings.last(), Some(&PaletteWarning::NoValidBaseColors));
    }

    #[test]
    fn resolution_is_deterministic() {
        let a = Palette::resolve(Theme::Colorful, Some("magenta,green"));
        let b = Palette::resolve(Theme::Colorful, Some("magenta,green"));
        assert_eq!(a.palette, b.palette);
        assert_eq!(a.warnings, b.warnings);
    }

    #[test]
    fn intensity_remaps_tiers() {
        let p = Palette::classic();
        let g = BaseColor::Green;
        let bright = ColorRole::Bright(g);
        let base = ColorRole::Base(g);

        assert_eq!(p.role_for(Tier::Head, g, Intensity::Normal), ColorRole::White);
        assert_eq!(p.role_for(Tier::Bright, g, Intensity::Normal), bright);
        assert_eq!(p.role_for(Tier::Dim, g, Intensity::Normal), base);

        assert_eq!(p.role_for(Tier::Head, g, Intensity::Dim), bright);
        assert_eq!(p.role_for(Tier::Bright, g, Intensity::Dim), base);

        assert_eq!(p.role_for(Tier::Bright, g, Intensity::Bright), ColorRole::White);
        assert_eq!(p.role_for(Tier::Dim, g, Intensity::Bright), bright);
    }

    #[test]
    fn tiers_follow_distance_from_head() {
        assert_eq!(Tier::classify(0, 2), Tier::Head);
        assert_eq!(Tier::classify(2, 2), Tier::Bright);
        assert_eq!(Tier::classify(3, 2), Tier::Dim);
        assert_eq!(Tier::classify(1, 0), Tier::Dim);
        assert_eq!(Tier::Dim.darker(), Tier::Dim);
    }

    #[test]
    fn names_round_trip_through_parse() {
        for role in ColorRole::registry() {
            assert_eq!(ColorRole::parse(&role.name().to_lowercase()), Some(role));
        }
    }
}
