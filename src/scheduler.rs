// Copyright (c) 2026 rezky_nightky

use std::io::Result;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::config::Settings;
use crate::frame::Frame;
use crate::rain::Rain;
use crate::terminal::Terminal;

pub const MIN_TICK: Duration = Duration::from_millis(5);

pub fn effective_tick(speed_secs: f64) -> Duration {
    Duration::try_from_secs_f64(speed_secs.max(MIN_TICK.as_secs_f64())).unwrap_or(Duration::MAX)
}

pub trait Screen {
    fn size(&self) -> Result<(u16, u16)>;
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

impl Screen for Terminal {
    fn size(&self) -> Result<(u16, u16)> {
        Terminal::size(self)
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        Terminal::present(self, frame)
    }
}

pub struct Scheduler {
    tick: Duration,
    deadline: Option<Duration>,
    follow_resize: bool,
}

impl Scheduler {
    pub fn new(settings: &Settings) -> Self {
        Self {
            tick: effective_tick(settings.speed),
            deadline: settings.duration.map(Duration::from_secs_f64),
            follow_resize: settings.size.is_none(),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn run<R: Rng, S: Screen>(&self, rain: &mut Rain<R>, screen: &mut S) -> Result<u64> {
        let start = Instant::now();
        let dt = self.tick.as_secs_f32();
        let mut frames = 0u64;

        loop {
            if self.deadline.is_some_and(|d| start.elapsed() >= d) {
                break;
            }

            if self.follow_resize {
                if let Ok((w, h)) = screen.size() {
                    if w > 0 && h > 0 && (w, h) != rain.size() {
                        debug!(width = w, height = h, "terminal resized");
                        rain.resize(w, h);
                    }
                }
            }

            screen.present(rain.tick(dt))?;
            frames += 1;
            thread::sleep(self.tick);
        }

        debug!(frames, "frame loop finished");
        Ok(frames)
    }
}
