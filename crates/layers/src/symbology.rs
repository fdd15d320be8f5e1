use foundation::math::Vec3;
use scene::components::{Color, Material, Transform};

pub const LINE_PALETTE: [Color; 2] = [Color(0xff0000), Color(0x00ff00)];
pub const LINE_OPACITY: f32 = 0.9;

pub const POLYGON_PALETTE: [Color; 5] = [
    Color(0x00ff00),
    Color(0xff00ff),
    Color(0xffff00),
    Color(0x00ffff),
    Color(0xff8800),
];
pub const POLYGON_OPACITY: f32 = 0.7;

pub const OUTLINE_COLOR: Color = Color::WHITE;

/// Tilt about the view axis that lines the road plane up with the panorama.
pub const GROUND_TILT_RAD: f64 = 0.15;
/// Drop (scene units) of the road plane below the camera.
pub const GROUND_DROP: f64 = -20.0;

/// Styling of one overlay feature, chosen by its collection position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FeatureStyle {
    pub fill: Material,
    pub outline: Option<Material>,
}

impl FeatureStyle {
    pub fn line(index: usize) -> Self {
        Self {
            fill: Material::translucent(LINE_PALETTE[index % LINE_PALETTE.len()], LINE_OPACITY),
            outline: None,
        }
    }

    pub fn polygon(index: usize) -> Self {
        Self {
            fill: Material::translucent(
                POLYGON_PALETTE[index % POLYGON_PALETTE.len()],
                POLYGON_OPACITY,
            )
            .double_sided(),
            outline: Some(Material::opaque(OUTLINE_COLOR)),
        }
    }
}

/// Placement shared by every overlay object: the local x/y plane laid flat
/// (rotated -90° about x), tilted, and dropped under the camera.
pub fn ground_placement() -> Transform {
    Transform::new(
        Vec3::new(0.0, GROUND_DROP, 0.0),
        Vec3::new(-std::f64::consts::FRAC_PI_2, 0.0, GROUND_TILT_RAD),
    )
}
