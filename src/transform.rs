// Copyright (c) 2026 rezky_nightky

use std::f32::consts::TAU;

use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Vector3};

const FOV_DEG: f32 = 60.0;
const W_EPSILON: f32 = 1e-6;

// Radians per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationSpeed {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// Never wrapped; trig is periodic.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Rotation {
    pub fn advance(&mut self, speed: RotationSpeed, dt_secs: f32) {
        self.x += speed.x * dt_secs;
        self.y += speed.y * dt_secs;
        self.z += speed.z * dt_secs;
    }

    // Rz * Ry * Rx, so X is applied first.
    pub fn matrix(&self) -> Matrix4<f32> {
        Rotation3::from_euler_angles(self.x, self.y, self.z).to_homogeneous()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scene {
    pub width: u16,
    pub height: u16,
    pub radius_factor: f32,
    pub world_radius: f32,
    // Streams span world Y in [-half_height, half_height].
    pub half_height: f32,
    pub eye_distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Scene {
    pub fn new(width: u16, height: u16, radius_factor: f32) -> Self {
        let world_radius = radius_factor;
        let half_height = 1.0;
        let scale = world_radius.max(half_height);
        Self {
            width,
            height,
            radius_factor,
            world_radius,
            half_height,
            eye_distance: scale * 3.0,
            near: scale * 0.1,
            far: scale * 10.0,
        }
    }

    // In cells, for the screen-space cylinder.
    pub fn cylinder_radius(&self) -> f32 {
        (self.width as f32 / 3.0) * self.radius_factor
    }

    pub fn base_angle(&self, col: u16) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        (col as f32 / self.width as f32) * TAU
    }

    pub fn anchor(&self, base_angle: f32) -> Point3<f32> {
        let (s, c) = base_angle.sin_cos();
        Point3::new(self.world_radius * c, 0.0, self.world_radius * s)
    }

    // Row 1 is the top.
    pub fn row_y(&self, row: u32) -> f32 {
        let h = self.height.max(1) as f32;
        self.half_height * (1.0 - 2.0 * (row as f32 - 0.5) / h)
    }

    fn bounding_radius(&self) -> f32 {
        Vector3::new(self.world_radius, self.half_height, 0.0).norm()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x: u16,
    pub y: u16,
    // View-space z; larger is closer.
    pub depth: f32,
    // 0 at the nearest edge of the scene, 1 at the farthest.
    pub distance: f32,
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    model_view: Matrix4<f32>,
    projection: Matrix4<f32>,
    near: f32,
    width: u16,
    height: u16,
    nearest: f32,
    span: f32,
}

impl Pipeline {
    pub fn new(scene: &Scene, rotation: &Rotation) -> Self {
        let eye = Point3::new(0.0, 0.0, scene.eye_distance);
        let view = Matrix4::look_at_rh(&eye, &Point3::origin(), &Vector3::y());
        let aspect = scene.width.max(1) as f32 / scene.height.max(1) as f32;
        let projection =
            Perspective3::new(aspect, FOV_DEG.to_radians(), scene.near, scene.far).to_homogeneous();
        let bound = scene.bounding_radius();
        Self {
            model_view: view * rotation.matrix(),
            projection,
            near: scene.near,
            width: scene.width,
            height: scene.height,
            nearest: scene.eye_distance - bound,
            span: (2.0 * bound).max(f32::EPSILON),
        }
    }

    pub fn project(&self, world: Point3<f32>) -> Option<Projected> {
        let view = self.model_view * world.to_homogeneous();
        if -view.z < self.near {
            return None;
        }
        let clip = self.projection * view;
        if clip.w.abs() < W_EPSILON {
            return None;
        }
        let (x, y) = ndc_to_screen(clip.x / clip.w, clip.y / clip.w, self.width, self.height)?;
        let distance = ((-view.z - self.nearest) / self.span).clamp(0.0, 1.0);
        Some(Projected {
            x,
            y,
            depth: view.z,
            distance,
        })
    }
}

// Y is flipped because rows grow downward.
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: u16, height: u16) -> Option<(u16, u16)> {
    if !ndc_x.is_finite() || !ndc_y.is_finite() {
        return None;
    }
    let sx = ((ndc_x + 1.0) / 2.0 * width as f32).round();
    let sy = ((1.0 - (ndc_y + 1.0) / 2.0) * height as f32).round();
    if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
        return None;
    }
    Some((sx as u16, sy as u16))
}

// None when the column faces away or lands off screen.
pub fn cylinder_column(radius: f32, angle: f32, width: u16) -> Option<(u16, f32)> {
    let (s, c) = angle.sin_cos();
    let x_world = radius * c;
    let z_world = radius * s;
    if z_world < 0.0 {
        return None;
    }
    let sx = (x_world + width as f32 / 2.0).round();
    if sx < 0.0 || sx >= width as f32 {
        return None;
    }
    Some((sx as u16, z_world))
}
