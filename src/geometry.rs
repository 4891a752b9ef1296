use arrayvec::ArrayVec;
use nalgebra::Vector3;

pub type Fp = f64;
pub type Vec3f = Vector3<Fp>;

// Guard for near-parallel rays and degenerate quadratics.
pub static EPS: Fp = 1e-6;
// Offset applied along the normal when spawning secondary rays.
pub static SURFACE_OFFSET: Fp = 1e-4;

#[derive(Clone, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

#[derive(Clone, Debug)]
pub enum Shape3D {
    Sphere { radius: Fp },
    Plane { normal: Vec3f },
    Cylinder { axis: Vec3f, radius: Fp, height: Fp },
}

// Real roots of a*t^2 + b*t + c = 0, smaller first. Empty when the
// discriminant is negative or the quadratic degenerates.
fn solve_quadratic(a: Fp, b: Fp, c: Fp) -> ArrayVec<Fp, 2> {
    let mut result = ArrayVec::<Fp, 2>::new();
    if a.abs() < EPS {
        return result;
    }
    let discr = b * b - 4.0 * a * c;
    if discr < 0.0 {
        return result;
    }
    let x1 = (-b - discr.sqrt()) / (2.0 * a);
    let x2 = (-b + discr.sqrt()) / (2.0 * a);
    result.push(Fp::min(x1, x2));
    result.push(Fp::max(x1, x2));
    result
}

/// Nearest positive hit distance of `ray` against a shape anchored at
/// `position`, or `None` when the ray misses.
pub fn intersect_shape(ray: &Ray, shape: &Shape3D, position: &Vec3f) -> Option<Fp> {
    match shape {
        Shape3D::Sphere { radius } => {
            let oc = ray.origin - position;
            let a = ray.direction.dot(&ray.direction);
            let b = 2.0 * oc.dot(&ray.direction);
            let c = oc.dot(&oc) - radius * radius;
            let roots = solve_quadratic(a, b, c);
            if roots.is_empty() {
                return None;
            }
            // Smaller positive root wins; rays starting inside take the
            // far root.
            let t = if roots[0] > 0.0 { roots[0] } else { roots[1] };
            if t > 0.0 {
                Some(t)
            } else {
                None
            }
        }
        Shape3D::Plane { normal } => {
            let denom = normal.dot(&ray.direction);
            if denom.abs() <= EPS {
                return None;
            }
            let t = (position - ray.origin).dot(normal) / denom;
            if t > 0.0 {
                Some(t)
            } else {
                None
            }
        }
        Shape3D::Cylinder {
            axis,
            radius,
            height,
        } => {
            // Project onto the plane perpendicular to the axis and solve
            // the infinite cylinder.
            let d = ray.direction - axis * ray.direction.dot(axis);
            let oc = ray.origin - position;
            let o = oc - axis * oc.dot(axis);
            let a = d.dot(&d);
            let b = 2.0 * o.dot(&d);
            let c = o.dot(&o) - radius * radius;
            let roots = solve_quadratic(a, b, c);
            if roots.is_empty() {
                return None;
            }
            let (t0, t1) = (roots[0], roots[1]);
            // Clip both roots to the axial range [0, height]. When the
            // near root leaves the range but the far root is inside, the
            // far root stands in for the cap crossing.
            let y0 = axis.dot(&(ray.origin + ray.direction * t0 - position));
            let y1 = axis.dot(&(ray.origin + ray.direction * t1 - position));
            let t = if y0 < 0.0 {
                if y1 < 0.0 {
                    return None;
                }
                t1
            } else if y0 > *height {
                if y1 > *height {
                    return None;
                }
                t1
            } else {
                t0
            };
            if t > 0.0 {
                Some(t)
            } else {
                None
            }
        }
    }
}

/// Unit outward normal of a shape anchored at `position`, queried at a
/// surface point.
pub fn normal_at(shape: &Shape3D, position: &Vec3f, point: &Vec3f) -> Vec3f {
    match shape {
        Shape3D::Sphere { .. } => (point - position).normalize(),
        Shape3D::Plane { normal } => *normal,
        Shape3D::Cylinder {
            axis,
            radius: _,
            height,
        } => {
            let v = point - position;
            let projection = v.dot(axis);
            if projection <= 0.0 {
                -axis
            } else if projection >= *height {
                *axis
            } else {
                (v - axis * projection).normalize()
            }
        }
    }
}

pub fn reflect(direction: &Vec3f, normal: &Vec3f) -> Vec3f {
    (direction - normal * (2.0 * direction.dot(normal))).normalize()
}

/// Snell refraction of `direction` through a surface with the given
/// refractive index, assuming the incident medium has index 1. Falls
/// back to the mirror direction on total internal reflection.
pub fn refract(direction: &Vec3f, normal: &Vec3f, refractive_index: Fp) -> Vec3f {
    let eta = 1.0 / refractive_index;
    let cos_i = normal.dot(direction);
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
    if sin_t2 > 1.0 {
        return reflect(direction, normal);
    }
    let cos_t = (1.0 - sin_t2).sqrt();
    (direction * eta - normal * (eta * cos_i + cos_t)).normalize()
}
