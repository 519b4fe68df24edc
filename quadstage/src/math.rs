//! Camera and quad matrices.
//!
//! All matrices are column-major `glam::Mat4`, laid out exactly as the quad
//! shader consumes them.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Depth range shared by every screen-space camera in the game.
pub const SCREEN_DEPTH: f32 = 1000.0;

/// Sines and cosines of an Euler rotation, `(sr, sp, sy, cr, cp, cy)`.
fn euler_terms(rotation: Vec3) -> (f32, f32, f32, f32, f32, f32) {
    let (sr, cr) = rotation.x.sin_cos();
    let (sp, cp) = rotation.y.sin_cos();
    let (sy, cy) = rotation.z.sin_cos();
    (sr, sp, sy, cr, cp, cy)
}

fn rotation_columns(rotation: Vec3) -> [Vec4; 3] {
    let (sr, sp, sy, cr, cp, cy) = euler_terms(rotation);
    [
        Vec4::new(cp * cy, -cp * sy, sp, 0.0),
        Vec4::new(cr * sy + sr * sp * cy, cr * cy - sr * sp * sy, -sr * cp, 0.0),
        Vec4::new(sr * sy - cr * sp * cy, sr * cy + cr * sp * sy, cr * cp, 0.0),
    ]
}

/// Rotation applied to a single quad before translation (positive angles).
pub fn quad_rotation(rotation: Vec3) -> Mat4 {
    let [c0, c1, c2] = rotation_columns(rotation);
    Mat4::from_cols(c0, c1, c2, Vec4::W)
}

/// Camera view matrix from a position and Euler rotation (radians).
///
/// The camera rotation is inverted (angles negated) and the fourth column
/// carries the negated position.
pub fn view_matrix(position: Vec3, rotation: Vec3) -> Mat4 {
    let [c0, c1, c2] = rotation_columns(-rotation);
    Mat4::from_cols(c0, c1, c2, (-position).extend(1.0))
}

/// Orthographic projection centred on the origin.
pub fn ortho_matrix(width: f32, height: f32, depth: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0 / depth, 0.0),
        Vec4::W,
    )
}

/// Perspective projection. `fov_deg` is in degrees.
pub fn perspective_matrix(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let inv_tan = 1.0 / (std::f32::consts::PI * fov_deg / 180.0).tan();
    let inv_depth = 1.0 / (far - near);
    Mat4::from_cols(
        Vec4::new(inv_tan, 0.0, 0.0, 0.0),
        Vec4::new(0.0, inv_tan * aspect, 0.0, 0.0),
        Vec4::new(0.0, 0.0, far * inv_depth, 1.0),
        Vec4::new(0.0, 0.0, -far * near * inv_depth, 0.0),
    )
}

/// View and projection pair submitted to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Camera {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Camera at the origin looking down the z axis with a pixel-exact
    /// orthographic projection. Every scene draws through this one.
    pub fn screen(width: f32, height: f32) -> Self {
        Self {
            view: view_matrix(Vec3::ZERO, Vec3::ZERO),
            projection: ortho_matrix(width, height, SCREEN_DEPTH),
        }
    }

    /// The renderer's camera before any scene sets one.
    pub fn perspective_default(width: f32, height: f32) -> Self {
        Self {
            view: view_matrix(Vec3::new(0.0, 0.0, width / -2.0), Vec3::ZERO),
            projection: perspective_matrix(45.0, width / height, 0.0, SCREEN_DEPTH),
        }
    }
}
