// Copyright (c) 2026 rezky_nightky

use crossterm::{cursor, style, Command};

use crate::cell::Cell;
use crate::palette::ColorRole;

#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    // A colour code is emitted only when it differs from the one in effect.
    pub fn encode(&self, out: &mut String) {
        out.clear();
        let _ = cursor::MoveTo(0, 0).write_ansi(out);

        let mut current: Option<ColorRole> = None;
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for cell in self.row(y) {
                match cell.role {
                    Some(role) => {
                        if current != Some(role) {
                            let _ = style::SetForegroundColor(role.color()).write_ansi(out);
                            current = Some(role);
                        }
                        out.push(cell.ch);
                    }
                    None => out.push(' '),
                }
            }
        }

        let _ = style::ResetColor.write_ansi(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::BaseColor;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut f = Frame::new(2, 2);
        f.set(5, 0, Cell::glyph('x', ColorRole::White));
        assert!(f.cells.iter().all(Cell::is_blank));
        f.set(1, 1, Cell::glyph('x', ColorRole::White));
        assert_eq!(f.get(1, 1).unwrap().ch, 'x');
    }

    #[test]
    fn clear_blanks_every_cell() {
        let mut f = Frame::new(3, 2);
        f.set(0, 0, Cell::glyph('x', ColorRole::White));
        f.clear();
        assert_eq!(f.get(0, 0), Some(&Cell::BLANK));
    }

    #[test]
    fn encode_homes_cursor_joins_rows_and_resets() {
        let mut f = Frame::new(3, 2);
        let green = ColorRole::Base(BaseColor::Green);
        f.set(0, 0, Cell::glyph('a', green));
        f.set(1, 0, Cell::glyph('b', green));
        f.set(2, 1, Cell::glyph('c', ColorRole::White));

        let mut out = String::new();
        f.encode(&mut out);

        let mut expected = String::new();
        let _ = cursor::MoveTo(0, 0).write_ansi(&mut expected);
        let _ = style::SetForegroundColor(green.color()).write_ansi(&mut expected);
        expected.push_str("ab \n  ");
        let _ = style::SetForegroundColor(ColorRole::White.color()).write_ansi(&mut expected);
        expected.push('c');
        let _ = style::ResetColor.write_ansi(&mut expected);

        assert_eq!(out, expected);
        assert!(out.starts_with("\x1b[1;1H"));
        assert!(out.ends_with("\x1b[0m"));
    }
}
