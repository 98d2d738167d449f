use nalgebra::Vector3;

/// Vectors no longer than this (in render units) are not drawn.
pub const DEGENERACY_EPSILON: f32 = 0.01;


/// Projects a coordinate vector of any length into render space by keeping
/// the first three components and zero-filling the missing ones.
pub fn to_render_vector(coords: &[f64]) -> Vector3<f32> {
    let component = |i: usize| coords.get(i).copied().unwrap_or(0.0) as f32;
    Vector3::new(component(0), component(1), component(2))
}


/// Too short to draw, or too large to represent. Components past the f32
/// range project to infinity.
pub fn is_degenerate(v: &Vector3<f32>) -> bool {
    let norm = v.norm();
    // NaN fails the comparison too
    !(norm > DEGENERACY_EPSILON && norm.is_finite())
}


/// Unit normal of the plane spanned by `a` and `b`, or `None` when they are
/// (nearly) parallel, zero or not finite.
pub fn plane_normal(a: &Vector3<f32>, b: &Vector3<f32>) -> Option<Vector3<f32>> {
    // f64 so that large components cannot overflow the cross product
    let n = a.cast::<f64>().cross(&b.cast::<f64>());
    let norm = n.norm();
    if !(norm > f64::from(DEGENERACY_EPSILON) && norm.is_finite()) {
        return None;
    }
    Some((n / norm).cast::<f32>())
}


/// Two unit vectors spanning the plane orthogonal to `normal`.
pub fn plane_frame(normal: &Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let u = if normal.x.abs() > 0.1 {
        Vector3::new(normal.y, -normal.x, 0.0).normalize()
    } else {
        Vector3::new(0.0, normal.z, -normal.y).normalize()
    };
    let v = normal.cross(&u).normalize();
    (u, v)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).norm() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn truncates_long_vectors() {
        assert_eq!(to_render_vector(&[1.0, 2.0, 3.0, 4.0]), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn zero_fills_short_vectors() {
        assert_eq!(to_render_vector(&[5.0]), Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(to_render_vector(&[]), Vector3::zeros());
    }

    #[test]
    fn degeneracy_threshold() {
        assert!(is_degenerate(&Vector3::zeros()));
        assert!(is_degenerate(&Vector3::new(0.005, 0.0, 0.0)));
        assert!(is_degenerate(&Vector3::new(f32::NAN, 1.0, 0.0)));
        assert!(!is_degenerate(&Vector3::new(0.0, 0.02, 0.0)));
    }

    #[test]
    fn normal_of_coordinate_plane() {
        let n = plane_normal(&Vector3::x(), &Vector3::y()).unwrap();
        assert_close(n, Vector3::z());
    }

    #[test]
    fn parallel_vectors_have_no_normal() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert!(plane_normal(&a, &(a * 2.0)).is_none());
        assert!(plane_normal(&a, &Vector3::zeros()).is_none());
    }

    #[test]
    fn values_past_f32_range_are_degenerate() {
        let v = to_render_vector(&[1e39, 0.0, 0.0]);
        assert!(is_degenerate(&v));
        assert!(is_degenerate(&Vector3::new(f32::INFINITY, 0.0, 0.0)));
        assert!(is_degenerate(&Vector3::new(3e38, 3e38, 0.0)));
    }

    #[test]
    fn large_vectors_still_have_a_normal() {
        let a = Vector3::new(1e20, 1e20, 0.0);
        let b = Vector3::new(1e20, -1e20, 0.0);
        let n = plane_normal(&a, &b).unwrap();
        assert!(n.iter().all(|c| c.is_finite()));
        assert_close(n, -Vector3::z());
        assert!(plane_normal(&Vector3::new(f32::INFINITY, 0.0, 0.0), &Vector3::y()).is_none());
    }

    #[test]
    fn frame_is_orthonormal() {
        for normal in [Vector3::x(), Vector3::y(), Vector3::new(1.0, 1.0, 1.0).normalize()] {
            let (u, v) = plane_frame(&normal);
            assert!((u.norm() - 1.0).abs() < 1e-5);
            assert!((v.norm() - 1.0).abs() < 1e-5);
            assert!(u.dot(&normal).abs() < 1e-5);
            assert!(v.dot(&normal).abs() < 1e-5);
            assert!(u.dot(&v).abs() < 1e-5);
        }
    }
}
