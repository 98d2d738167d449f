use nalgebra::{Matrix4, Vector3};

use crate::camera::project_with;
use crate::scene::{Arrow, Grid, Line, Plane, Primitive, Scene, BACKGROUND};


/// Maps world points to screen positions inside `rect`.
pub struct Projector {
    view_projection: Matrix4<f32>,
    rect: egui::Rect,
}

impl Projector {
    pub fn new(scene: &Scene, rect: egui::Rect) -> Self {
        Self {
            view_projection: scene.camera().view_projection(),
            rect,
        }
    }

    pub fn project(&self, v: &Vector3<f32>) -> Option<egui::Pos2> {
        let ndc = project_with(&self.view_projection, v)?;
        let half = self.rect.size() * 0.5;
        Some(self.rect.center() + egui::vec2(ndc.x * half.x, -ndc.y * half.y))
    }
}


/// Draws the whole scene. Planes go first so arrows stay visible through
/// them.
pub fn paint_scene(painter: &egui::Painter, rect: egui::Rect, scene: &Scene) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
    let projector = Projector::new(scene, rect);

    for object in scene.furniture() {
        match &object.primitive {
            Primitive::Grid(grid) => draw_grid(painter, &projector, grid),
            Primitive::Line(line) => draw_line(painter, &projector, line, 2.0),
            _ => {}
        }
    }
    for object in scene.subspace_objects() {
        if let Primitive::Plane(plane) = &object.primitive {
            draw_plane(painter, &projector, plane);
        }
    }
    for object in scene.subspace_objects() {
        if let Primitive::Arrow(arrow) = &object.primitive {
            draw_arrow(painter, &projector, arrow);
        }
    }
}


pub fn draw_grid(painter: &egui::Painter, projector: &Projector, grid: &Grid) {
    for line in grid.lines() {
        draw_line(painter, projector, &line, 1.0);
    }
}


pub fn draw_line(painter: &egui::Painter, projector: &Projector, line: &Line, width: f32) {
    if let (Some(a), Some(b)) = (projector.project(&line.start), projector.project(&line.end)) {
        painter.line_segment([a, b], egui::Stroke::new(width, line.color));
    }
}


pub fn draw_arrow(painter: &egui::Painter, projector: &Projector, arrow: &Arrow) {
    let (Some(start), Some(base), Some(tip)) = (
        projector.project(&arrow.start),
        projector.project(&arrow.head_base()),
        projector.project(&arrow.end),
    ) else {
        return;
    };

    // Main shaft
    painter.line_segment([start, base], egui::Stroke::new(2.5, arrow.color));

    // Head, seen side-on
    let head = tip - base;
    let head_len = head.length();
    if head_len < 0.5 {
        return;
    }
    let dir = head / head_len;
    let perp = egui::vec2(-dir.y, dir.x) * (head_len * arrow.head_width / arrow.head_length);

    painter.add(egui::Shape::convex_polygon(
        vec![tip, base + perp, base - perp],
        arrow.color,
        egui::Stroke::NONE,
    ));
}


pub fn draw_plane(painter: &egui::Painter, projector: &Projector, plane: &Plane) {
    let corners: Option<Vec<egui::Pos2>> =
        plane.corners().iter().map(|c| projector.project(c)).collect();
    let Some(corners) = corners else {
        return;
    };
    painter.add(egui::Shape::convex_polygon(
        corners,
        plane.fill(),
        egui::Stroke::new(1.0, plane.color.linear_multiply(0.4)),
    ));
}
