// Copyright (c) 2026 rezky_nightky

use nalgebra::Point3;
use rand::Rng;

use crate::transform::Scene;

pub const DEPTH_HINT_MAX: u8 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    // 1-based row of the leading edge; 0 means idle.
    pub head: u32,
    pub char_set: usize,
    pub depth_hint: u8,
    pub base_angle: f32,
    pub world: Point3<f32>,
}

impl Stream {
    pub fn is_falling(&self) -> bool {
        self.head > 0
    }

    // (row, distance_from_head) pairs inside 1..=height.
    pub fn visible_rows(&self, trail_length: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
        let head = self.head;
        let top = head.saturating_sub(trail_length.saturating_sub(1)).max(1);
        let bottom = head.min(height);
        (top..=bottom).map(move |row| (row, head - row))
    }
}

#[derive(Clone, Debug)]
pub struct StreamStore {
    streams: Vec<Stream>,
    visible_height: u32,
    trail_length: u32,
    density: f64,
    set_count: usize,
}

impl StreamStore {
    pub fn new<R: Rng>(
        scene: &Scene,
        trail_length: u32,
        density: f64,
        set_count: usize,
        rng: &mut R,
    ) -> Self {
        let set_count = set_count.max(1);
        let streams = (0..scene.width)
            .map(|col| {
                let base_angle = scene.base_angle(col);
                Stream {
                    head: 0,
                    char_set: rng.random_range(0..set_count),
                    depth_hint: rng.random_range(0..=DEPTH_HINT_MAX),
                    base_angle,
                    world: scene.anchor(base_angle),
                }
            })
            .collect();
        Self {
            streams,
            visible_height: scene.height as u32,
            trail_length,
            density: density.clamp(0.0, 1.0),
            set_count,
        }
    }

    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    #[cfg(test)]
    pub fn streams_mut(&mut self) -> &mut [Stream] {
        &mut self.streams
    }

    // A slot going idle keeps its set and hint until it spawns again.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        let limit = self.visible_height + self.trail_length;
        for s in &mut self.streams {
            if s.head == 0 {
                if rng.random_bool(self.density) {
                    s.head = 1;
                    s.char_set = rng.random_range(0..self.set_count);
                    s.depth_hint = rng.random_range(0..=DEPTH_HINT_MAX);
                }
                continue;
            }

            s.head += 1;
            if s.head > limit {
                s.head = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn store(width: u16, height: u16, trail: u32, density: f64) -> (StreamStore, StdRng) {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = Scene::new(width, height, 1.0);
        let s = StreamStore::new(&scene, trail, density, 3, &mut rng);
        (s, rng)
    }

    #[test]
    fn zero_density_never_spawns() {
        let (mut s, mut rng) = store(16, 10, 3, 0.0);
        for _ in 0..200 {
            s.advance(&mut rng);
            assert!(s.streams().iter().all(|st| st.head == 0));
        }
    }

    #[test]
    fn full_density_spawns_every_idle_slot_in_one_tick() {
        let (mut s, mut rng) = store(16, 10, 3, 1.0);
        s.advance(&mut rng);
        assert!(s.streams().iter().all(|st| st.head == 1));
    }

    #[test]
    fn falling_slot_resets_exactly_when_tail_leaves() {
        let (mut s, mut rng) = store(1, 10, 3, 0.0);
        s.streams_mut()[0].head = 1;
        let mut seen = Vec::new();
        for _ in 0..20 {
            s.advance(&mut rng);
            seen.push(s.streams()[0].head);
        }
        // 13 - 3 == 10 is not past the screen yet; 14 - 3 is.
        let expected: Vec<u32> = (2..=13).chain(std::iter::repeat(0).take(8)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn heads_only_grow_until_reset() {
        let (mut s, mut rng) = store(24, 12, 4, 0.3);
        let mut prev: Vec<u32> = s.streams().iter().map(|st| st.head).collect();
        for _ in 0..300 {
            s.advance(&mut rng);
            for (p, st) in prev.iter().zip(s.streams()) {
                if *p > 0 {
                    assert!(st.head == p + 1 || st.head == 0);
                } else {
                    assert!(st.head <= 1);
                }
            }
            prev = s.streams().iter().map(|st| st.head).collect();
        }
    }

    #[test]
    fn reset_keeps_set_and_hint_until_next_spawn() {
        let (mut s, mut rng) = store(1, 2, 3, 0.0);
        {
            let st = &mut s.streams_mut()[0];
            st.head = 5;
            st.char_set = 2;
            st.depth_hint = 9;
        }
        s.advance(&mut rng);
        let st = &s.streams()[0];
        assert_eq!(st.head, 0);
        assert_eq!((st.char_set, st.depth_hint), (2, 9));
    }

    #[test]
    fn spawn_rerolls_within_bounds() {
        let (mut s, mut rng) = store(64, 5, 3, 1.0);
        for _ in 0..50 {
            s.advance(&mut rng);
            for st in s.streams() {
                assert!(st.char_set < 3);
                assert!(st.depth_hint <= DEPTH_HINT_MAX);
            }
        }
    }

    #[test]
    fn trail_window_is_clipped_to_screen() {
        let st = Stream {
            head: 2,
            char_set: 0,
            depth_hint: 0,
            base_angle: 0.0,
            world: Point3::origin(),
        };
        let rows: Vec<_> = st.visible_rows(4, 10).collect();
        assert_eq!(rows, vec![(1, 1), (2, 0)]);

        let low = Stream { head: 12, ..st.clone() };
        let rows: Vec<_> = low.visible_rows(4, 10).collect();
        assert_eq!(rows, vec![(9, 3), (10, 2)]);

        let idle = Stream { head: 0, ..st };
        assert_eq!(idle.visible_rows(4, 10).count(), 0);
    }
}
