use eframe::egui;

use crate::camera::Viewport;
use crate::config::Args;
use crate::driver::FrameDriver;
use crate::input::{MatrixInput, MAX_SIZE};
use crate::model::{CalculationResult, SubspaceRole};
use crate::render::paint_scene;
use crate::scene::{role_color, Scene};
use crate::solver::{Pending, SolverClient, SolverError};


#[derive(Debug, Clone, PartialEq)]
enum SolverStatus {
    Unknown,
    Checking,
    Up,
    Down(String),
}

/// What the side panel shows about calculations.
#[derive(Debug, Default)]
pub struct Report {
    /// Latest successful result.
    pub result: Option<CalculationResult>,
    /// Why the latest attempt failed, if it did.
    pub error: Option<String>,
}


/// Hands a finished calculation to the scene. On failure nothing is drawn
/// and the previous geometry stays on screen.
pub fn apply_reply(
    scene: &mut Scene,
    report: &mut Report,
    reply: Result<CalculationResult, SolverError>,
) {
    match reply {
        Ok(result) => {
            scene.render(&result);
            report.result = Some(result);
            report.error = None;
        }
        Err(e) => {
            log::error!("calculation failed: {e}");
            report.error = Some(e.to_string());
        }
    }
}


pub struct SubspaceApp {
    client: SolverClient,
    input: MatrixInput,

    // None until the first frame tells us the viewport size
    scene: Option<Scene>,
    driver: FrameDriver,

    pending: Option<Pending<CalculationResult>>,
    health_check: Option<Pending<()>>,
    solver_status: SolverStatus,
    report: Report,
}

impl SubspaceApp {
    pub fn new(cc: &eframe::CreationContext<'_>, args: &Args) -> Self {
        let client = SolverClient::from_args(args);
        log::info!("using solver at {}", client.base_url());

        let mut app = Self {
            client,
            input: MatrixInput::default(),
            scene: None,
            driver: FrameDriver::default(),
            pending: None,
            health_check: None,
            solver_status: SolverStatus::Unknown,
            report: Report::default(),
        };
        if !args.skip_health_check {
            let client = app.client.clone();
            let ctx = cc.egui_ctx.clone();
            app.health_check = Some(Pending::spawn(Some(ctx), move || client.health()));
            app.solver_status = SolverStatus::Checking;
        }
        app
    }

    fn calculate(&mut self, ctx: &egui::Context) {
        let request = match self.input.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.report.error = Some(e.to_string());
                return;
            }
        };
        log::info!("requesting subspaces of a {}x{} matrix", self.input.rows(), self.input.cols());
        let client = self.client.clone();
        // replacing an in-flight request drops its reply
        self.pending = Some(Pending::spawn(Some(ctx.clone()), move || client.calculate(&request)));
    }

    fn poll_workers(&mut self) {
        if let Some(reply) = self.health_check.as_ref().and_then(Pending::poll) {
            self.health_check = None;
            self.solver_status = match reply {
                Ok(()) => {
                    log::info!("solver is up");
                    SolverStatus::Up
                }
                Err(e) => {
                    log::warn!("solver unavailable: {e}");
                    SolverStatus::Down(e.to_string())
                }
            };
        }

        // Replies wait in the channel until there is a scene to render into.
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if let Some(reply) = self.pending.as_ref().and_then(Pending::poll) {
            self.pending = None;
            if reply.is_ok() {
                self.solver_status = SolverStatus::Up;
            }
            apply_reply(scene, &mut self.report, reply);
        }
    }

    fn handle_hotkeys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (enter, example, random) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::E),
                i.key_pressed(egui::Key::R),
            )
        });
        if example {
            self.input.load_example();
        }
        if random {
            self.input.randomize(3.0, 0.5);
        }
        if enter {
            self.calculate(ctx);
        }
    }

    fn draw_solver_status(&self, ui: &mut egui::Ui) {
        let (color, text) = match &self.solver_status {
            SolverStatus::Unknown => (egui::Color32::GRAY, "Solver: not checked".to_owned()),
            SolverStatus::Checking => (egui::Color32::GRAY, "Solver: checking…".to_owned()),
            SolverStatus::Up => (egui::Color32::LIGHT_GREEN, "Solver: connected".to_owned()),
            SolverStatus::Down(e) => (egui::Color32::LIGHT_RED, format!("Solver unavailable: {e}")),
        };
        ui.colored_label(color, text);
    }

    fn draw_matrix_input_ui(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Matrix A");
        ui.add_space(4.0);

        let (mut rows, mut cols) = (self.input.rows(), self.input.cols());
        let rows_changed = ui
            .add(egui::Slider::new(&mut rows, 1..=MAX_SIZE).text("rows (m)"))
            .changed();
        let cols_changed = ui
            .add(egui::Slider::new(&mut cols, 1..=MAX_SIZE).text("columns (n)"))
            .changed();
        if rows_changed || cols_changed {
            self.input.resize(rows, cols);
        }

        ui.add_space(6.0);
        egui::Grid::new("matrix_input_grid").spacing([8.0, 8.0]).show(ui, |ui| {
            for r in 0..self.input.rows() {
                for c in 0..self.input.cols() {
                    ui.add(egui::DragValue::new(self.input.cell_mut(r, c)).speed(0.1));
                }
                ui.end_row();
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let example = ui
                .button("Example [E]")
                .on_hover_text("Rank 2: [[1,2,3],[4,5,6],[7,8,9]]");
            if example.clicked() {
                self.input.load_example();
            }
            if ui.button("Random [R]").clicked() {
                self.input.randomize(3.0, 0.5);
            }
        });
        ui.horizontal(|ui| {
            if ui.button("Calculate [Enter]").clicked() {
                self.calculate(ctx);
            }
            if self.pending.is_some() {
                ui.spinner();
            }
        });
    }

    fn draw_results(&self, ui: &mut egui::Ui) {
        if let Some(e) = &self.report.error {
            ui.colored_label(egui::Color32::LIGHT_RED, format!("Error: {e}"));
            ui.add_space(6.0);
        }

        let Some(result) = &self.report.result else {
            ui.label("No result yet.");
            return;
        };

        let d = result.dimensions;
        egui::Grid::new("dimensions_grid").show(ui, |ui| {
            ui.label("m");
            ui.label(d.m.to_string());
            ui.label("n");
            ui.label(d.n.to_string());
            ui.end_row();
            ui.label("rank");
            ui.label(d.rank.to_string());
            ui.label("nullity");
            ui.label(d.nullity().to_string());
            ui.end_row();
        });

        ui.add_space(6.0);
        for role in SubspaceRole::ALL {
            let descriptor = result.descriptor(role);
            egui::Frame::group(ui.style()).show(ui, |ui| {
                let title = descriptor.name.as_deref().unwrap_or(role.title());
                ui.label(egui::RichText::new(title).color(role_color(role)).strong());
                ui.horizontal(|ui| {
                    ui.label(format!("dim: {}", descriptor.dimension));
                    if let Some(k) = descriptor.ambient {
                        ui.label(format!("ambient: R^{k}"));
                    }
                    if role.is_offset() {
                        ui.weak("(offset)");
                    }
                });
            });
        }
    }
}


impl eframe::App for SubspaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.driver.stop();
        }
        self.handle_hotkeys(ctx);
        self.poll_workers();

        // --- SIDEBAR ---
        egui::SidePanel::left("controls")
            .width_range(260.0..=340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                    ui.heading("Four Fundamental Subspaces");
                    self.draw_solver_status(ui);
                    ui.separator();

                    self.draw_matrix_input_ui(ui, ctx);
                    ui.separator();

                    ui.heading("Results");
                    self.draw_results(ui);

                    ui.separator();
                    ui.collapsing("Controls", |ui| {
                        ui.label("Drag to orbit, scroll to zoom.");
                        ui.label("Row space and left null space are drawn slightly offset.");
                        if let Some(scene) = &self.scene {
                            let cam = scene.camera();
                            ui.weak(format!(
                                "yaw {:.0}°, pitch {:.0}°, distance {:.1}",
                                cam.yaw().to_degrees(),
                                cam.pitch().to_degrees(),
                                cam.distance(),
                            ));
                            ui.weak(format!(
                                "{} scene objects, {} render passes, {} frames",
                                scene.objects().count(),
                                scene.render_passes(),
                                self.driver.frames(),
                            ));
                        }
                    });
                });
            });

        // --- VIEWPORT ---
        egui::CentralPanel::default().frame(egui::Frame::none()).show(ctx, |ui| {
            let (rect, resp) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());
            let viewport = Viewport::new(rect.width(), rect.height());

            let scene = self.scene.get_or_insert_with(|| Scene::initialize(viewport));

            if resp.dragged_by(egui::PointerButton::Primary) {
                let delta = resp.drag_delta();
                scene.camera_mut().rotate(delta.x, delta.y, rect.height());
            }
            if resp.hovered() {
                let scroll = ui.input(|i| i.smooth_scroll_delta.y);
                if scroll != 0.0 {
                    scene.camera_mut().zoom(scroll);
                }
            }

            if self.driver.frame(scene, viewport) {
                paint_scene(&ui.painter_at(rect), rect, scene);
                ctx.request_repaint();
            }
        });
    }
}
