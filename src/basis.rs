use egui::Color32;
use nalgebra::Vector3;

use crate::math::{is_degenerate, plane_normal, to_render_vector};
use crate::model::Basis;
use crate::scene::{Arrow, Plane, Primitive, SceneObject};

/// Translation applied to offset subspaces so they do not sit exactly on top
/// of the ones drawn from the origin.
pub const SUBSPACE_OFFSET: [f32; 3] = [0.1, 0.1, 0.1];


/// Builds the arrows (and spanning plane) for one subspace.
///
/// Every basis vector becomes an arrow from the origin unless it is
/// degenerate after projection. When there are at least two vectors, the
/// plane through the first two is added as well; any further vectors only
/// show up as arrows.
pub fn basis_primitives(
    basis: &Basis,
    color: Color32,
    label: &'static str,
    offset: bool,
) -> Vec<SceneObject> {
    let vectors: Vec<Vector3<f32>> = basis.vectors().into_iter().map(to_render_vector).collect();
    let shift = if offset { Vector3::from(SUBSPACE_OFFSET) } else { Vector3::zeros() };

    let mut objects = Vec::with_capacity(vectors.len() + 1);

    for (i, v) in vectors.iter().enumerate() {
        if is_degenerate(v) {
            log::debug!("{label}: skipping degenerate basis vector #{i}");
            continue;
        }
        let arrow = Arrow::new(shift, v + shift, color);
        objects.push(SceneObject::subspace(label, Primitive::Arrow(arrow)));
    }

    // Normal comes from the unshifted vectors; the shift only moves the plane.
    if let [a, b, ..] = vectors.as_slice() {
        match plane_normal(a, b) {
            Some(normal) => {
                let plane = Plane::new(shift, normal, color);
                objects.push(SceneObject::subspace(label, Primitive::Plane(plane)));
            }
            None => log::debug!("{label}: first two basis vectors are parallel, no plane"),
        }
    }

    objects
}
