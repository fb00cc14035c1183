// Copyright (c) 2026 rezky_nightky

use crate::palette::ColorRole;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub role: Option<ColorRole>,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', role: None };

    pub fn glyph(ch: char, role: ColorRole) -> Self {
        Self {
            ch,
            role: Some(role),
        }
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.role.is_none()
    }
}
