use egui::Color32;
use nalgebra::Vector3;

use crate::basis::basis_primitives;
use crate::camera::{OrbitCamera, Viewport};
use crate::math::plane_frame;
use crate::model::{CalculationResult, SubspaceRole};

pub const BACKGROUND: Color32 = Color32::from_rgb(0x1e, 0x29, 0x3b);

pub const AXIS_LENGTH: f32 = 3.0;
pub const GRID_SIZE: f32 = 6.0;
pub const GRID_DIVISIONS: u32 = 6;

pub const ARROW_HEAD_LENGTH: f32 = 0.2;
pub const ARROW_HEAD_WIDTH: f32 = 0.1;
pub const PLANE_SIZE: f32 = 3.0;
pub const PLANE_OPACITY: f32 = 0.2;

const CAMERA_START: [f32; 3] = [5.0, 5.0, 5.0];


pub fn role_color(role: SubspaceRole) -> Color32 {
    match role {
        SubspaceRole::Column => Color32::from_rgb(0x3b, 0x82, 0xf6),   // blue
        SubspaceRole::Null => Color32::from_rgb(0xef, 0x44, 0x44),     // red
        SubspaceRole::Row => Color32::from_rgb(0x22, 0xc5, 0x5e),      // green
        SubspaceRole::LeftNull => Color32::from_rgb(0xa8, 0x55, 0xf7), // purple
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub color: Color32,
    pub head_length: f32,
    pub head_width: f32,
}

impl Arrow {
    pub fn new(start: Vector3<f32>, end: Vector3<f32>, color: Color32) -> Self {
        Self {
            start,
            end,
            color,
            head_length: ARROW_HEAD_LENGTH,
            head_width: ARROW_HEAD_WIDTH,
        }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }

    /// Point where the shaft ends and the head begins.
    pub fn head_base(&self) -> Vector3<f32> {
        let len = self.length();
        let head = self.head_length.min(len);
        self.end - (self.end - self.start) * (head / len)
    }
}

/// Translucent square facing `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub center: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub size: f32,
    pub color: Color32,
    pub opacity: f32,
}

impl Plane {
    pub fn new(center: Vector3<f32>, normal: Vector3<f32>, color: Color32) -> Self {
        Self {
            center,
            normal,
            size: PLANE_SIZE,
            color,
            opacity: PLANE_OPACITY,
        }
    }

    pub fn corners(&self) -> [Vector3<f32>; 4] {
        let (u, v) = plane_frame(&self.normal);
        let h = self.size * 0.5;
        [
            self.center + (u + v) * h,
            self.center + (v - u) * h,
            self.center - (u + v) * h,
            self.center + (u - v) * h,
        ]
    }

    pub fn fill(&self) -> Color32 {
        let [r, g, b, _] = self.color.to_array();
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(r, g, b, alpha)
    }
}

/// Square grid on the y = 0 plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color32,
    pub color: Color32,
}

impl Grid {
    pub fn lines(&self) -> Vec<Line> {
        let half = self.size * 0.5;
        let step = self.size / self.divisions.max(1) as f32;
        let center = self.divisions / 2;
        let mut lines = Vec::with_capacity(2 * (self.divisions as usize + 1));
        for i in 0..=self.divisions {
            let t = -half + i as f32 * step;
            let color = if self.divisions % 2 == 0 && i == center {
                self.center_color
            } else {
                self.color
            };
            lines.push(Line {
                start: Vector3::new(-half, 0.0, t),
                end: Vector3::new(half, 0.0, t),
                color,
            });
            lines.push(Line {
                start: Vector3::new(t, 0.0, -half),
                end: Vector3::new(t, 0.0, half),
                color,
            });
        }
        lines
    }
}


#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Grid(Grid),
    Arrow(Arrow),
    Plane(Plane),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Created once, never removed.
    Furniture,
    /// Rebuilt from scratch on every calculation.
    Subspace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Debugging name; not drawn.
    pub label: &'static str,
    pub layer: Layer,
    pub primitive: Primitive,
}

impl SceneObject {
    pub fn furniture(label: &'static str, primitive: Primitive) -> Self {
        Self { label, layer: Layer::Furniture, primitive }
    }

    pub fn subspace(label: &'static str, primitive: Primitive) -> Self {
        Self { label, layer: Layer::Subspace, primitive }
    }

    pub fn is_subspace(&self) -> bool {
        self.layer == Layer::Subspace
    }
}


/// The 3D scene: camera, permanent furniture, and the geometry of the latest
/// calculation.
///
/// The only way to get a `Scene` is [`Scene::initialize`], so there is no
/// uninitialized scene to render into.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: OrbitCamera,
    viewport: Viewport,
    furniture: Vec<SceneObject>,
    subspaces: Vec<SceneObject>,
    render_passes: u64,
}

impl Scene {
    pub fn initialize(viewport: Viewport) -> Self {
        let camera =
            OrbitCamera::looking_at_origin_from(Vector3::from(CAMERA_START), viewport.aspect());

        let axis_colors = [
            ("x-axis", Color32::from_rgb(0xff, 0, 0)),
            ("y-axis", Color32::from_rgb(0, 0xff, 0)),
            ("z-axis", Color32::from_rgb(0, 0, 0xff)),
        ];
        let mut furniture: Vec<SceneObject> = axis_colors
            .into_iter()
            .enumerate()
            .map(|(i, (label, color))| {
                let mut end = Vector3::<f32>::zeros();
                end[i] = AXIS_LENGTH;
                let line = Line {
                    start: Vector3::zeros(),
                    end,
                    color,
                };
                SceneObject::furniture(label, Primitive::Line(line))
            })
            .collect();

        furniture.push(SceneObject::furniture(
            "grid",
            Primitive::Grid(Grid {
                size: GRID_SIZE,
                divisions: GRID_DIVISIONS,
                center_color: Color32::from_gray(0x44),
                color: Color32::from_gray(0x33),
            }),
        ));

        log::info!("scene initialized at {}x{}", viewport.width, viewport.height);

        Self {
            camera,
            viewport,
            furniture,
            subspaces: Vec::new(),
            render_passes: 0,
        }
    }

    /// Replaces all subspace geometry with that of `result`.
    pub fn render(&mut self, result: &CalculationResult) {
        let removed = self.subspaces.len();
        self.subspaces.clear();

        for role in SubspaceRole::ALL {
            let descriptor = result.descriptor(role);
            if descriptor.basis.is_malformed() {
                log::warn!("{}: malformed basis, not drawn", role.label());
                continue;
            }
            if descriptor.basis.is_empty() {
                continue;
            }
            if role.requires_positive_dimension() && descriptor.dimension == 0 {
                continue;
            }
            let objects = basis_primitives(
                &descriptor.basis,
                role_color(role),
                role.label(),
                role.is_offset(),
            );
            self.subspaces.extend(objects);
        }

        self.render_passes += 1;
        log::info!(
            "render pass {}: removed {removed}, added {} subspace primitives (rank {})",
            self.render_passes,
            self.subspaces.len(),
            result.dimensions.rank,
        );
    }

    /// Matches the camera to a new viewport size. Geometry is untouched.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn furniture(&self) -> &[SceneObject] {
        &self.furniture
    }

    pub fn subspace_objects(&self) -> &[SceneObject] {
        &self.subspaces
    }

    /// Furniture first, then subspace geometry.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.furniture.iter().chain(&self.subspaces)
    }

    pub fn render_passes(&self) -> u64 {
        self.render_passes
    }
}
