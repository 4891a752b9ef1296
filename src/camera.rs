use crate::geometry::{Fp, Ray, Vec3f};

/// Perspective camera. The orthonormal basis is derived once from
/// (position, look_at, up) and never changes afterwards.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3f,
    pub width: u32,
    pub height: u32,
    forward: Vec3f,
    right: Vec3f,
    up: Vec3f,
    aspect: Fp,
    scale: Fp,
}

impl Camera {
    pub fn new(
        position: Vec3f,
        look_at: Vec3f,
        up: Vec3f,
        fov_degrees: Fp,
        width: u32,
        height: u32,
    ) -> Camera {
        let forward = (look_at - position).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward);
        Camera {
            position,
            width,
            height,
            forward,
            right,
            up,
            aspect: width as Fp / height as Fp,
            scale: (fov_degrees.to_radians() * 0.5).tan(),
        }
    }

    /// Ray through pixel (x, y). Row 0 is the top of the image.
    pub fn generate_ray(&self, x: Fp, y: Fp) -> Ray {
        let px = (2.0 * x / self.width as Fp - 1.0) * self.aspect * self.scale;
        let py = (1.0 - 2.0 * y / self.height as Fp) * self.scale;
        Ray {
            origin: self.position,
            direction: (self.forward + self.right * px + self.up * py).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EPS;

    #[test]
    fn center_pixel_looks_forward() {
        let camera = Camera::new(
            Vec3f::default(),
            Vec3f::new(0.0, 0.0, -1.0),
            Vec3f::new(0.0, 1.0, 0.0),
            90.0,
            640,
            480,
        );
        let ray = camera.generate_ray(320.0, 240.0);
        assert!((ray.direction - Vec3f::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn top_row_rays_point_above_forward() {
        let camera = Camera::new(
            Vec3f::default(),
            Vec3f::new(0.0, 0.0, -1.0),
            Vec3f::new(0.0, 1.0, 0.0),
            60.0,
            100,
            100,
        );
        let top = camera.generate_ray(50.0, 0.0);
        let bottom = camera.generate_ray(50.0, 100.0);
        assert!(top.direction.y > 0.0);
        assert!(bottom.direction.y < 0.0);
        assert!((top.direction.norm() - 1.0).abs() < EPS);
    }
}
