use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 100.0;


/// Size of the drawing area in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}


/// Perspective camera orbiting a target point, with damped controls.
///
/// Drag and scroll input only accumulates into pending deltas; `update()`
/// applies a fraction of them each frame, which gives the camera its inertia.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Point3<f32>,
    yaw: f32,   // around +y, 0 looks down -z
    pitch: f32, // elevation above the xz plane
    distance: f32,

    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32, // log scale

    damping: f32,
    fov_y: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl OrbitCamera {
    pub const DAMPING: f32 = 0.05;
    pub const FOV_Y_DEGREES: f32 = 75.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    pub fn looking_at_origin_from(position: Vector3<f32>, aspect: f32) -> Self {
        let distance = position.norm().max(MIN_DISTANCE);
        Self {
            target: Point3::origin(),
            yaw: position.x.atan2(position.z),
            pitch: (position.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_PITCH, MAX_PITCH),
            distance,

            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,

            damping: Self::DAMPING,
            fov_y: Self::FOV_Y_DEGREES.to_radians(),
            near: Self::NEAR,
            far: Self::FAR,
            aspect,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vector3::new(cp * sy, sp, cp * cy) * self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Queues a rotation for a pointer drag of `(dx, dy)` points. A drag
    /// across the full viewport height turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.pending_yaw -= std::f32::consts::TAU * dx / h;
        self.pending_pitch += std::f32::consts::TAU * dy / h;
    }

    /// Queues a zoom; positive `scroll` moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.pending_zoom -= scroll * 0.002;
    }

    /// Damping integration, once per frame.
    pub fn update(&mut self) {
        let d = self.damping;
        self.yaw += self.pending_yaw * d;
        self.pitch = (self.pitch + self.pending_pitch * d).clamp(-MAX_PITCH, MAX_PITCH);
        self.distance =
            (self.distance * (self.pending_zoom * d).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);

        self.pending_yaw *= 1.0 - d;
        self.pending_pitch *= 1.0 - d;
        self.pending_zoom *= 1.0 - d;
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        let view = Isometry3::look_at_rh(&self.position(), &self.target, &Vector3::y());
        let projection = Perspective3::new(self.aspect, self.fov_y, self.near, self.far);
        projection.as_matrix() * view.to_homogeneous()
    }
}

/// Normalized device coordinates of `p`, or `None` if it is behind the
/// camera.
pub fn project_with(view_projection: &Matrix4<f32>, p: &Vector3<f32>) -> Option<Vector3<f32>> {
    let clip = view_projection * Point3::from(*p).to_homogeneous();
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(clip.xyz() / clip.w)
}
