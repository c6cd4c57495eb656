//! View and projection matrices for the frame camera.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use lumina_scene::CameraSpec;
use static_assertions::const_assert_eq;

/// Camera data as laid out for the shader: combined view-projection plus
/// the world-space eye position used for fog distance.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = eye position, w unused.
    pub camera_pos: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<CameraUniform>(), 80);

impl CameraUniform {
    pub fn from_spec(spec: &CameraSpec, aspect_ratio: f32) -> Self {
        let view_proj = projection(spec, aspect_ratio) * view(spec);
        let eye = spec.pose.position;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

/// World-to-view transform looking from the pose's eye toward its target.
pub fn view(spec: &CameraSpec) -> Mat4 {
    Mat4::look_at_rh(spec.pose.position, spec.pose.target, Vec3::Y)
}

/// Reverse-Z perspective projection: near and far are swapped so depth
/// 1.0 lands on the near plane and 0.0 on the far plane.
pub fn projection(spec: &CameraSpec, aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh(spec.fov_y, aspect_ratio, spec.far, spec.near)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use lumina_scene::CameraSpec;
    use lumina_camera::CameraPose;

    fn looking_down_negative_z() -> CameraSpec {
        CameraSpec {
            pose: CameraPose {
                position: Vec3::new(0.0, 0.0, 10.0),
                target: Vec3::new(0.0, 0.0, 0.0),
            },
            fov_y: 75.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }

    fn ndc(view_proj: Mat4, world: Vec3) -> Vec4 {
        let clip = view_proj * world.extend(1.0);
        clip / clip.w
    }

    #[test]
    fn test_view_moves_eye_to_origin() {
        let spec = looking_down_negative_z();
        let eye = view(&spec).transform_point3(spec.pose.position);
        assert!(eye.length() < 1e-5, "eye should map to the view origin");
    }

    #[test]
    fn test_reverse_z_near_maps_to_one() {
        let spec = looking_down_negative_z();
        let view_proj = projection(&spec, 1.0) * view(&spec);
        // A point just in front of the eye sits at the near plane.
        let near_point = Vec3::new(0.0, 0.0, 10.0 - spec.near);
        let far_point = Vec3::new(0.0, 0.0, 10.0 - spec.far + 1e-3);
        let near_depth = ndc(view_proj, near_point).z;
        let far_depth = ndc(view_proj, far_point).z;
        assert!((near_depth - 1.0).abs() < 1e-3, "near depth {near_depth}");
        assert!(far_depth.abs() < 1e-3, "far depth {far_depth}");
        assert!(near_depth > far_depth);
    }

    #[test]
    fn test_uniform_records_eye_position() {
        let spec = looking_down_negative_z();
        let uniform = CameraUniform::from_spec(&spec, 16.0 / 9.0);
        assert_eq!(uniform.camera_pos[0], 0.0);
        assert_eq!(uniform.camera_pos[2], 10.0);
    }

    #[test]
    fn test_centered_target_projects_to_screen_center() {
        let spec = looking_down_negative_z();
        let view_proj = projection(&spec, 16.0 / 9.0) * view(&spec);
        let center = ndc(view_proj, spec.pose.target);
        assert!(center.x.abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);
    }
}
