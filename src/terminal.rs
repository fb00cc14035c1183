// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};

use crossterm::{
    cursor,
    style::{Attribute, ResetColor, SetAttribute},
    terminal, ExecutableCommand,
};
use tracing::warn;

use crate::frame::Frame;

pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

// Raw mode stays off so Ctrl-C still raises SIGINT and `\n` starts the next row.
pub struct Terminal {
    stdout: Stdout,
    buf: String,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            buf: String::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    // One blob under the stdout lock; a restore never lands mid-frame.
    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        frame.encode(&mut self.buf);
        let mut lock = self.stdout.lock();
        lock.write_all(self.buf.as_bytes())?;
        lock.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout.lock());
    }
}

fn restore<W: Write>(out: &mut W) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = out.flush();
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout().lock());
}

// The stdout lock is held through `exit`, so the frame loop cannot present
// onto the primary screen once it has been restored.
pub fn restore_and_exit(code: i32) -> ! {
    let mut out = stdout().lock();
    restore_then(&mut out, || std::process::exit(code))
}

fn restore_then<W: Write, T>(out: &mut W, finish: impl FnOnce() -> T) -> T {
    restore(out);
    finish()
}

pub fn detect_size(explicit: Option<(u16, u16)>) -> (u16, u16) {
    if let Some(dims) = explicit {
        return dims;
    }
    size_or_fallback(terminal::size())
}

fn size_or_fallback(queried: Result<(u16, u16)>) -> (u16, u16) {
    match queried {
        Ok((w, h)) if w > 0 && h > 0 => (w, h),
        Ok((w, h)) => {
            warn!(width = w, height = h, "terminal reported an empty grid, using 80x24");
            FALLBACK_SIZE
        }
        Err(e) => {
            warn!(error = %e, "could not query terminal size, using 80x24");
            FALLBACK_SIZE
        }
    }
}
