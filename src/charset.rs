// Copyright (c) 2026 rezky_nightky

use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset(u32);

impl Charset {
    pub const LATIN: Charset = Charset(0x1);
    pub const KATAKANA: Charset = Charset(0x2);
    pub const ARROWS: Charset = Charset(0x4);
    pub const HALFWIDTH_KATAKANA: Charset = Charset(0x8);
    pub const DIGITS: Charset = Charset(0x10);
    pub const BINARY: Charset = Charset(0x20);
    pub const HEX: Charset = Charset(0x40);
    pub const GREEK: Charset = Charset(0x80);
    pub const CYRILLIC: Charset = Charset(0x100);
    pub const BRAILLE: Charset = Charset(0x200);
    pub const RUNIC: Charset = Charset(0x400);
    pub const SYMBOLS: Charset = Charset(0x800);
    pub const BLOCKS: Charset = Charset(0x1000);
    pub const BOXDRAW: Charset = Charset(0x2000);
    pub const DNA: Charset = Charset(0x4000);

    pub const DEFAULT: Charset = Charset::LATIN.union(Charset::KATAKANA).union(Charset::ARROWS);
    pub const MATRIX: Charset = Charset::LATIN.union(Charset::HALFWIDTH_KATAKANA);

    pub fn contains(self, other: Charset) -> bool {
        (self.0 & other.0) != 0
    }

    pub const fn union(self, other: Charset) -> Charset {
        Charset(self.0 | other.0)
    }
}

const LATIN: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()";
const SYMBOLS: &str = "∞∑∫√π∆Ωµλ≈≠≤≥×÷±∂∇∈∉∩∪⊂⊃⊆⊇⊕⊗";

const PRESETS: &[(&str, &[&str], Charset, &str)] = &[
    ("default", &[], Charset::DEFAULT, "Latin + katakana + arrows (three sets)"),
    ("matrix", &[], Charset::MATRIX, "Latin + half-width katakana"),
    ("latin", &["ascii"], Charset::LATIN, "Letters, digits and a few symbols"),
    ("katakana", &[], Charset::KATAKANA, "Full-width katakana (wide glyphs render blank)"),
    ("halfwidth", &["hw-katakana"], Charset::HALFWIDTH_KATAKANA, "Half-width katakana"),
    ("arrows", &[], Charset::ARROWS, "Arrow block"),
    ("digits", &["dec", "decimal"], Charset::DIGITS, "Digits only"),
    ("binary", &["bin", "01"], Charset::BINARY, "0 and 1"),
    ("hex", &["hexadecimal"], Charset::HEX, "0-9 and A-F"),
    ("greek", &[], Charset::GREEK, "Greek"),
    ("cyrillic", &[], Charset::CYRILLIC, "Cyrillic"),
    ("braille", &[], Charset::BRAILLE, "Braille"),
    ("runic", &[], Charset::RUNIC, "Runic"),
    ("symbols", &[], Charset::SYMBOLS, "Math symbols"),
    ("blocks", &[], Charset::BLOCKS, "Block elements"),
    ("retro", &[], Charset::BOXDRAW, "Box drawing"),
    ("dna", &[], Charset::DNA, "DNA bases"),
    (
        "cyberpunk",
        &[],
        Charset::HALFWIDTH_KATAKANA
            .union(Charset::HEX)
            .union(Charset::SYMBOLS),
        "Half-width katakana + hex + symbols (three sets)",
    ),
];

pub fn charset_from_str(spec: &str) -> Result<Charset, String> {
    let spec = spec.trim().to_ascii_lowercase();
    PRESETS
        .iter()
        .find(|(name, aliases, _, _)| *name == spec || aliases.contains(&spec.as_str()))
        .map(|(_, _, cs, _)| *cs)
        .ok_or_else(|| format!("unsupported charset: {} (see --list-charsets)", spec))
}

pub fn preset_listing() -> impl Iterator<Item = (&'static str, &'static str)> {
    PRESETS.iter().map(|(name, _, _, desc)| (*name, *desc))
}

fn range(start: u32, end: u32) -> Vec<char> {
    (start..=end).filter_map(char::from_u32).collect()
}

pub fn is_single_width(ch: char) -> bool {
    UnicodeWidthChar::width(ch) == Some(1)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharSets {
    sets: Vec<Vec<char>>,
}

impl CharSets {
    pub fn build(charset: Charset, literal: Option<&str>) -> Self {
        if let Some(lit) = literal.filter(|l| !l.is_empty()) {
            return Self::from_sets(vec![lit.chars().collect()]);
        }

        let members: [(Charset, fn() -> Vec<char>); 15] = [
            (Charset::LATIN, || LATIN.chars().collect()),
            (Charset::KATAKANA, || range(0x30A1, 0x30F6)),
            (Charset::ARROWS, || range(0x2190, 0x21EA)),
            (Charset::HALFWIDTH_KATAKANA, || range(0xFF66, 0xFF9D)),
            (Charset::DIGITS, || range(0x30, 0x39)),
            (Charset::BINARY, || range(0x30, 0x31)),
            (Charset::HEX, || {
                let mut v = range(0x30, 0x39);
                v.extend(range(0x41, 0x46));
                v
            }),
            (Charset::GREEK, || range(0x0391, 0x03C9)),
            (Charset::CYRILLIC, || range(0x0410, 0x044F)),
            (Charset::BRAILLE, || range(0x2800, 0x28FF)),
            (Charset::RUNIC, || range(0x16A0, 0x16F0)),
            (Charset::SYMBOLS, || SYMBOLS.chars().collect()),
            (Charset::BLOCKS, || range(0x2580, 0x259F)),
            (Charset::BOXDRAW, || range(0x2500, 0x257F)),
            (Charset::DNA, || "ACGT".chars().collect()),
        ];

        let sets = members
            .iter()
            .filter(|(flag, _)| charset.contains(*flag))
            .map(|(_, make)| make())
            .collect();
        Self::from_sets(sets)
    }

    pub fn from_sets(sets: Vec<Vec<char>>) -> Self {
        let mut sets: Vec<Vec<char>> = sets.into_iter().filter(|s| !s.is_empty()).collect();
        if sets.is_empty() {
            sets.push(LATIN.chars().collect());
        }
        Self { sets }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    // Wraps so a stale index never panics.
    pub fn get(&self, idx: usize) -> &[char] {
        &self.sets[idx % self.sets.len()]
    }
}
