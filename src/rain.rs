// Copyright (c) 2026 rezky_nightky

use nalgebra::Point3;
use rand::{rngs::StdRng, Rng};
use tracing::debug;

use crate::charset::CharSets;
use crate::config::Settings;
use crate::frame::Frame;
use crate::palette::Palette;
use crate::raster::{cylinder_dim, DepthCue, Rasterizer, Sample};
use crate::runtime::RenderMode;
use crate::stream::StreamStore;
use crate::transform::{cylinder_column, Pipeline, Rotation, RotationSpeed, Scene};

pub struct Rain<R: Rng = StdRng> {
    mode: RenderMode,
    trail_length: u32,
    density: f64,
    radius_factor: f32,
    depth_strength: f32,
    rotation_speed: RotationSpeed,
    rotation: Rotation,
    scene: Scene,
    store: StreamStore,
    sets: CharSets,
    raster: Rasterizer,
    frame: Frame,
    rng: R,
}

impl<R: Rng> Rain<R> {
    pub fn new(
        settings: &Settings,
        sets: CharSets,
        palette: Palette,
        width: u16,
        height: u16,
        mut rng: R,
    ) -> Self {
        let scene = Scene::new(width, height, settings.radius_factor);
        let store = StreamStore::new(
            &scene,
            settings.trail_length,
            settings.density,
            sets.len(),
            &mut rng,
        );
        Self {
            mode: settings.mode,
            trail_length: settings.trail_length,
            density: settings.density,
            radius_factor: settings.radius_factor,
            depth_strength: settings.depth_strength,
            rotation_speed: settings.rotation,
            rotation: Rotation::default(),
            scene,
            store,
            sets,
            raster: Rasterizer::new(width, height, settings.style(), palette),
            frame: Frame::new(width, height),
            rng,
        }
    }

    pub fn size(&self) -> (u16, u16) {
        (self.scene.width, self.scene.height)
    }

    #[cfg(test)]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[cfg(test)]
    pub fn streams(&self) -> &[crate::stream::Stream] {
        self.store.streams()
    }

    #[cfg(test)]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    // Streams restart idle.
    pub fn resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "resizing rain");
        self.scene = Scene::new(width, height, self.radius_factor);
        self.store = StreamStore::new(
            &self.scene,
            self.trail_length,
            self.density,
            self.sets.len(),
            &mut self.rng,
        );
        self.raster.resize(width, height);
        self.frame = Frame::new(width, height);
    }

    pub fn tick(&mut self, dt_secs: f32) -> &Frame {
        self.rotation.advance(self.rotation_speed, dt_secs);
        self.store.advance(&mut self.rng);

        self.raster.begin(&mut self.frame);
        match self.mode {
            RenderMode::Flat => self.render_flat(),
            RenderMode::Cylinder => self.render_cylinder(),
            RenderMode::Scene => self.render_scene(),
        }
        &self.frame
    }

    fn render_flat(&mut self) {
        let height = self.scene.height as u32;
        for (col, s) in self.store.streams().iter().enumerate() {
            for (row, dist) in s.visible_rows(self.trail_length, height) {
                let sample = Sample {
                    x: col as u16,
                    y: (row - 1) as u16,
                    depth: 0.0,
                    distance_from_head: dist,
                    char_set: s.char_set,
                    cue: None,
                };
                self.raster
                    .plot(&mut self.frame, &sample, &self.sets, &mut self.rng);
            }
        }
    }

    fn render_cylinder(&mut self) {
        let height = self.scene.height as u32;
        let radius = self.scene.cylinder_radius();
        for s in self.store.streams() {
            if !s.is_falling() {
                continue;
            }
            let angle = s.base_angle + self.rotation.y;
            let Some((x, z)) = cylinder_column(radius, angle, self.scene.width) else {
                continue;
            };
            let cue = DepthCue {
                hint: s.depth_hint,
                global: cylinder_dim(z, radius, self.depth_strength),
            };
            for (row, dist) in s.visible_rows(self.trail_length, height) {
                let sample = Sample {
                    x,
                    y: (row - 1) as u16,
                    depth: z,
                    distance_from_head: dist,
                    char_set: s.char_set,
                    cue: Some(cue),
                };
                self.raster
                    .plot(&mut self.frame, &sample, &self.sets, &mut self.rng);
            }
        }
    }

    fn render_scene(&mut self) {
        let height = self.scene.height as u32;
        let pipeline = Pipeline::new(&self.scene, &self.rotation);
        for s in self.store.streams() {
            for (row, dist) in s.visible_rows(self.trail_length, height) {
                let world = Point3::new(s.world.x, self.scene.row_y(row), s.world.z);
                let Some(hit) = pipeline.project(world) else {
                    continue;
                };
                let sample = Sample {
                    x: hit.x,
                    y: hit.y,
                    depth: hit.depth,
                    distance_from_head: dist,
                    char_set: s.char_set,
                    cue: Some(DepthCue {
                        hint: s.depth_hint,
                        global: hit.distance * self.depth_strength,
                    }),
                };
                self.raster
                    .plot(&mut self.frame, &sample, &self.sets, &mut self.rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;

    use super::*;
    use crate::cell::Cell;
    use crate::charset::is_single_width;
    use crate::palette::{BaseColor, ColorRole};
    use crate::transform::Projected;

    fn flat_settings() -> Settings {
        Settings {
            mode: RenderMode::Flat,
            density: 1.0,
            trail_length: 3,
            bright_length: 1,
            ..Settings::default()
        }
    }

    fn rain(settings: &Settings, width: u16, height: u16) -> Rain<StdRng> {
        let sets = CharSets::build(settings.charset, settings.char_set.as_deref());
        Rain::new(
            settings,
            sets,
            Palette::classic(),
            width,
            height,
            StdRng::seed_from_u64(42),
        )
    }

    fn roles(frame: &Frame, y: u16) -> Vec<Option<ColorRole>> {
        frame.row(y).iter().map(|c| c.role).collect()
    }

    #[test]
    fn flat_heads_are_white_then_trail_turns_bright() {
        let mut r = rain(&flat_settings(), 5, 3);

        let f = r.tick(0.1);
        assert_eq!(roles(f, 0), vec![Some(ColorRole::White); 5]);
        assert!(f.row(1).iter().all(Cell::is_blank));
        assert!(f.row(2).iter().all(Cell::is_blank));

        let f = r.tick(0.1);
        assert_eq!(roles(f, 1), vec![Some(ColorRole::White); 5]);
        assert_eq!(
            roles(f, 0),
            vec![Some(ColorRole::Bright(BaseColor::Green)); 5]
        );
        assert!(f.row(2).iter().all(Cell::is_blank));
    }

    #[test]
    fn flat_trail_fades_to_base_and_then_clears() {
        let mut r = rain(&flat_settings(), 4, 3);
        for _ in 0..3 {
            r.tick(0.1);
        }
        let f = r.frame();
        assert_eq!(roles(f, 0), vec![Some(ColorRole::Base(BaseColor::Green)); 4]);

        // head 7 - trail 3 > 3 rows, so every stream has gone idle.
        for _ in 0..4 {
            r.tick(0.1);
        }
        assert!(r.streams().iter().all(|s| s.head == 0));
        assert!(r.frame().cells.iter().all(Cell::is_blank));
    }

    #[test]
    fn every_rendered_glyph_is_single_width() {
        for mode in [RenderMode::Flat, RenderMode::Cylinder, RenderMode::Scene] {
            let settings = Settings {
                mode,
                density: 0.5,
                glitch_rate: 0.3,
                ..Settings::default()
            };
            let mut r = rain(&settings, 40, 20);
            for _ in 0..30 {
                let f = r.tick(0.1);
                assert!(f.cells.iter().all(|c| is_single_width(c.ch)));
            }
        }
    }

    #[test]
    fn cylinder_draws_only_front_facing_streams() {
        let settings = Settings {
            mode: RenderMode::Cylinder,
            density: 1.0,
            depth_strength: 0.0,
            rotation: RotationSpeed::default(),
            ..Settings::default()
        };
        let mut r = rain(&settings, 30, 6);
        let f = r.tick(0.1).clone();
        let drawn = f.row(0).iter().filter(|c| !c.is_blank()).count();
        let facing = r
            .streams()
            .iter()
            .filter(|s| s.base_angle.sin() >= 0.0)
            .count();
        assert!(drawn > 0);
        assert!(drawn <= facing);
        // Zero strength disables both passes, so every head stays white.
        assert!(f
            .row(0)
            .iter()
            .filter(|c| !c.is_blank())
            .all(|c| c.role == Some(ColorRole::White)));
    }

    #[test]
    fn scene_mode_projects_visible_streams() {
        let settings = Settings {
            mode: RenderMode::Scene,
            density: 1.0,
            depth_strength: 0.0,
            ..Settings::default()
        };
        let mut r = rain(&settings, 20, 10);
        let f = r.tick(0.1);
        let drawn: Vec<_> = f.cells.iter().filter(|c| !c.is_blank()).collect();
        assert!(!drawn.is_empty());
        assert!(drawn.iter().all(|c| c.role == Some(ColorRole::White)));
    }

    // One glyph per set, so a cell's glyph names the stream set that won it.
    fn scene_rain(width: u16, height: u16) -> Rain<StdRng> {
        let settings = Settings {
            mode: RenderMode::Scene,
            density: 1.0,
            depth_strength: 1.0,
            glitch_rate: 0.0,
            rotation: RotationSpeed::default(),
            ..Settings::default()
        };
        Rain::new(
            &settings,
            CharSets::from_sets(vec![vec!['a'], vec!['b'], vec!['c']]),
            Palette::classic(),
            width,
            height,
            StdRng::seed_from_u64(42),
        )
    }

    struct Nearest {
        stream: usize,
        hit: Projected,
        candidates: usize,
    }

    // Closest head per cell after the first tick; earlier streams win ties.
    fn nearest_heads(r: &Rain<StdRng>) -> HashMap<(u16, u16), Nearest> {
        let pipeline = Pipeline::new(&r.scene, &r.rotation);
        let mut cells: HashMap<(u16, u16), Nearest> = HashMap::new();
        for (i, s) in r.streams().iter().enumerate() {
            assert_eq!(s.head, 1);
            let world = Point3::new(s.world.x, r.scene.row_y(1), s.world.z);
            let Some(hit) = pipeline.project(world) else {
                continue;
            };
            let n = cells.entry((hit.x, hit.y)).or_insert(Nearest {
                stream: i,
                hit,
                candidates: 0,
            });
            n.candidates += 1;
            if hit.depth > n.hit.depth {
                n.stream = i;
                n.hit = hit;
            }
        }
        cells
    }

    #[test]
    fn scene_far_side_heads_are_dimmed() {
        let mut r = scene_rain(20, 10);
        let f = r.tick(0.1).clone();
        let nearest = nearest_heads(&r);

        // Column 15 sits at the back of the cylinder and owns its cell alone.
        let back = nearest.values().find(|n| n.stream == 15).unwrap();
        assert!(back.hit.distance > 0.65);

        for (&(x, y), n) in &nearest {
            let role = f.get(x, y).unwrap().role;
            let hint = r.streams()[n.stream].depth_hint;
            if n.hit.distance > 0.65 {
                assert!(
                    matches!(role, Some(ColorRole::Bright(_)) | Some(ColorRole::Base(_))),
                    "far head at ({}, {}) kept {:?}",
                    x,
                    y,
                    role
                );
            } else if n.hit.distance < 0.3 && hint < 4 {
                assert_eq!(role, Some(ColorRole::White));
            }
        }
    }

    #[test]
    fn scene_closer_heads_hide_farther_ones() {
        // A narrow, short grid squeezes all 40 heads into a few cells.
        let mut r = scene_rain(40, 4);
        let f = r.tick(0.1).clone();
        let nearest = nearest_heads(&r);

        assert!(nearest.values().any(|n| n.candidates > 1));
        let drawn = f.cells.iter().filter(|c| !c.is_blank()).count();
        assert_eq!(drawn, nearest.len());
        for (&(x, y), n) in &nearest {
            let set = r.streams()[n.stream].char_set;
            assert_eq!(f.get(x, y).unwrap().ch, ['a', 'b', 'c'][set]);
        }

        // Front column 10 and back column 30 share the centre cell.
        let centre = &nearest[&(20, 1)];
        assert!(centre.candidates >= 2);
        assert_eq!(centre.stream, 10);
    }

    #[test]
    fn rotation_advances_with_frame_time() {
        let mut r = rain(&Settings::default(), 10, 5);
        r.tick(0.5);
        r.tick(0.5);
        assert!((r.rotation().y - 0.1).abs() < 1e-6);
        assert_eq!(r.rotation().x, 0.0);
    }

    #[test]
    fn resize_rebuilds_grid_and_streams() {
        let mut r = rain(&flat_settings(), 5, 3);
        r.tick(0.1);
        r.resize(8, 4);
        assert_eq!(r.size(), (8, 4));
        assert_eq!(r.streams().len(), 8);
        assert!(r.streams().iter().all(|s| s.head == 0));
        let f = r.tick(0.1);
        assert_eq!((f.width, f.height), (8, 4));
        assert_eq!(roles(f, 0), vec![Some(ColorRole::White); 8]);
    }
}
