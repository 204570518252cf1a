//! Interactive playground for the particle iconography engine, built with
//! eframe/egui.
//!
//! This module defines [`Viewer`], which owns a main [`Stage`] plus a small
//! companion stage for entity cards, and implements [`eframe::App`] to drive
//! and configure them through an egui UI.

use eframe::App;
use glam::Vec2;
use swarm_core::{
    AnimationConfig, Mode, Stage, Status,
    color::Rgba,
    config::MAX_PARTICLES,
    flow::FlowLibrary,
    graph::{Bounds, CENTER_RADIUS, GraphAnchors, SATELLITE_RADIUS, place_companion_panel},
    mode::Category,
    renderer,
    types::Theme,
};

use crate::{
    entities::{self, COMPANION_SIZE, EntityCard},
    painter::{EguiSurface, from_color32, to_color32},
};

/// Particle cap for the companion graph; it is small and only shown on hover.
const COMPANION_MAX_PARTICLES: i32 = 600;

/// Main application state for the viewer.
///
/// The typical per-frame update is:
/// 1. Copy the stage config into `config` and let the top bar and config
///    panel edit it; push it back if anything changed.
/// 2. Handle mode, flow and entity-card interactions in the left panel.
/// 3. Size the canvas to the mode's preferred size, forward the pointer
///    and let the stage advance and draw.
/// 4. Overlay graph labels and the flow caption; float the companion graph
///    next to a hovered card.
///
/// ### Fields
/// - `stage` - The main animated canvas.
/// - `config` - Edit buffer for the stage config.
/// - `paused` - When set the stage is redrawn but not advanced.
/// - `notice` - Last error message shown in the status bar.
///
/// - `cards` - Entity cards listed in the sidebar.
/// - `payload_preset` - Card whose graph the main stage shows in graph mode.
/// - `hovered_card` - Index and screen rect of the card under the pointer.
/// - `companion` - Relationship-graph stage shown beside the hovered card.
pub struct Viewer {
    stage: Stage,
    config: AnimationConfig,
    paused: bool,
    notice: Option<String>,

    cards: Vec<EntityCard>,
    payload_preset: Option<usize>,
    hovered_card: Option<(usize, egui::Rect)>,
    companion: Stage,
}

impl Viewer {
    /// Creates a viewer on the default config with the bundled flows.
    pub fn new() -> Self {
        let config = AnimationConfig::default();
        let mut stage = Stage::new(config.clone(), FlowLibrary::builtin());
        let cards = entities::cards();
        stage.set_graph_payload(cards.first().map(|c| c.payload.clone()));

        let mut companion = Stage::new(companion_config(&config), FlowLibrary::default());
        companion.set_mode(Mode::RelationshipGraph);
        companion.resize(COMPANION_SIZE.x, COMPANION_SIZE.y);

        log::info!("viewer ready, {} flows available", stage.flows().len());

        Self {
            stage,
            config,
            paused: false,
            notice: None,
            cards,
            payload_preset: Some(0),
            hovered_card: None,
            companion,
        }
    }

    /// Pushes the edit buffer to both stages if it differs from the live config.
    fn apply_config(&mut self) {
        if self.config == *self.stage.config() {
            return;
        }
        self.stage.set_config(self.config.clone());
        self.companion.set_config(companion_config(&self.config));
    }

    fn start_flow(&mut self, id: &str) {
        self.notice = match self.stage.start_flow(id) {
            Ok(()) => None,
            Err(err) => Some(err.to_string()),
        };
    }

    fn set_payload_preset(&mut self, preset: Option<usize>) {
        self.payload_preset = preset;
        let payload = preset
            .and_then(|i| self.cards.get(i))
            .map(|c| c.payload.clone());
        self.stage.set_graph_payload(payload);
    }

    /// Updates the hovered card; a newly hovered card rebuilds the companion graph.
    fn focus_card(&mut self, hovered: Option<(usize, egui::Rect)>) {
        let index = hovered.map(|(i, _)| i);
        let changed = index != self.hovered_card.map(|(i, _)| i);
        self.hovered_card = hovered;
        if !changed {
            return;
        }
        if let Some(card) = index.and_then(|i| self.cards.get(i)) {
            log::debug!("companion graph for {}", card.title);
            self.companion
                .set_graph_payload(Some(card.payload.clone()));
            self.companion.reset();
        }
    }

    /// Helper to draw a labeled `i32` [`egui::DragValue`].
    fn labeled_drag_i32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut i32,
        range: std::ops::RangeInclusive<i32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn labeled_color(ui: &mut egui::Ui, label: &str, value: &mut Rgba) {
        ui.horizontal(|ui| {
            ui.label(label);
            let mut color = to_color32(*value);
            if ui.color_edit_button_srgba(&mut color).changed() {
                *value = from_color32(color);
            }
        });
    }

    /// Builds the top panel (run controls and status selection).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.paused { "▶ Run" } else { "⏸ Pause" })
                    .clicked()
                {
                    self.paused = !self.paused;
                }

                if ui.button("Reset").clicked() {
                    self.stage.reset();
                }

                ui.separator();
                ui.label("Status:");
                for status in Status::ALL {
                    if ui
                        .selectable_label(self.config.status == status, status.label())
                        .clicked()
                    {
                        self.config.status = status;
                    }
                }
            });
        });
    }

    /// Builds the bottom status bar (mode, clock, population, flow).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("t = {:.2}", self.stage.time()));
                ui.label(format!("particles = {}", self.stage.particles().len()));
                ui.separator();
                ui.label(format!(
                    "{} / {}",
                    self.stage.mode().label(),
                    self.stage.status().label()
                ));
                if let Some(flow) = self.stage.active_flow() {
                    ui.separator();
                    ui.label(format!("flow = {flow}"));
                }
                if let Some(notice) = &self.notice {
                    ui.separator();
                    ui.colored_label(ui.visuals().error_fg_color, notice.as_str());
                }
            });
        });
    }

    /// Builds the right-hand panel for animation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Swarm");
                Self::labeled_drag_i32(
                    ui,
                    "particles:",
                    &mut self.config.particle_count,
                    0..=MAX_PARTICLES,
                    10.0,
                );
                Self::labeled_drag_f32(ui, "size:", &mut self.config.particle_size, 0.5..=4.0, 0.05);
                Self::labeled_drag_f32(ui, "speed:", &mut self.config.base_speed, 0.1..=3.0, 0.02);
                Self::labeled_drag_f32(ui, "chaos:", &mut self.config.chaos_factor, 0.0..=1.0, 0.01);

                ui.separator();
                ui.label("Connections");
                Self::labeled_drag_f32(
                    ui,
                    "threshold:",
                    &mut self.config.connection_threshold,
                    0.0..=200.0,
                    1.0,
                );

                ui.separator();
                ui.label("Appearance");
                ui.horizontal(|ui| {
                    ui.label("theme:");
                    ui.selectable_value(&mut self.config.theme, Theme::Light, "Light");
                    ui.selectable_value(&mut self.config.theme, Theme::Dark, "Dark");
                });
                Self::labeled_color(ui, "primary:", &mut self.config.primary_color);
                Self::labeled_color(ui, "accent:", &mut self.config.accent_color);

                ui.separator();
                ui.label("Graph payload");
                let mut preset = self.payload_preset;
                ui.selectable_value(&mut preset, None, "None");
                for (i, card) in self.cards.iter().enumerate() {
                    ui.selectable_value(&mut preset, Some(i), card.title);
                }
                if preset != self.payload_preset {
                    self.set_payload_preset(preset);
                }

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.config = AnimationConfig {
                        status: self.config.status,
                        ..AnimationConfig::default()
                    };
                }
            });
    }

    /// Builds the left panel: modes by category, flows and entity cards.
    fn ui_modes_panel(&mut self, ctx: &egui::Context) {
        let mut hovered = None;

        egui::SidePanel::left("modes_panel")
            .resizable(true)
            .default_width(210.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for category in Category::ALL {
                        ui.label(egui::RichText::new(category.label()).strong());
                        for mode in Mode::ALL.into_iter().filter(|m| m.category() == category) {
                            if ui
                                .selectable_label(self.stage.mode() == mode, mode.label())
                                .on_hover_text(mode.description())
                                .clicked()
                            {
                                self.stage.set_mode(mode);
                            }
                        }
                        ui.separator();
                    }

                    ui.label(egui::RichText::new("Flows").strong());
                    let flows: Vec<(String, String)> = self
                        .stage
                        .flows()
                        .iter()
                        .map(|f| (f.id.clone(), f.label.clone()))
                        .collect();
                    for (id, label) in flows {
                        let active = self.stage.active_flow() == Some(id.as_str());
                        if ui.selectable_label(active, label).clicked() {
                            self.start_flow(&id);
                        }
                    }
                    if self.stage.active_flow().is_some() && ui.button("Cancel flow").clicked() {
                        self.stage.cancel_flow();
                    }
                    ui.separator();

                    ui.label(egui::RichText::new("Entities").strong());
                    for (i, card) in self.cards.iter().enumerate() {
                        let response = ui
                            .group(|ui| {
                                ui.set_width(ui.available_width());
                                ui.label(egui::RichText::new(card.title).strong());
                                ui.label(card.subtitle);
                                ui.weak(card.summary());
                            })
                            .response;
                        if response.contains_pointer() {
                            hovered = Some((i, response.rect));
                        }
                    }
                });
            });

        self.focus_card(hovered);
    }

    /// Builds the central panel where the main stage is drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let canvas = canvas_rect(response.rect, self.stage.mode());
            self.stage.resize(canvas.width(), canvas.height());

            match response.hover_pos().filter(|p| canvas.contains(*p)) {
                Some(p) => self.stage.pointer_moved(p.x - canvas.min.x, p.y - canvas.min.y),
                None => self.stage.pointer_left(),
            }

            let painter = painter.with_clip_rect(canvas);
            painter.rect_filled(canvas, 16.0, background(self.stage.config().theme));

            let dt = ctx.input(|i| i.stable_dt);
            let mut surface = EguiSurface::new(&painter, canvas.min);
            if self.paused {
                let cfg = self.stage.config();
                renderer::draw(
                    self.stage.particles(),
                    cfg.connection_threshold,
                    cfg.primary_color,
                    &mut surface,
                );
            } else if self.stage.frame(dt, &mut surface) {
                ctx.request_repaint();
            }

            if let Some(anchors) = self.stage.label_anchors() {
                draw_labels(&painter, canvas.min, &anchors, ui.visuals());
            }

            if let Some(caption) = self.stage.caption() {
                painter.text(
                    canvas.center_bottom() - egui::vec2(0.0, 16.0),
                    egui::Align2::CENTER_BOTTOM,
                    caption,
                    egui::FontId::proportional(14.0),
                    ui.visuals().strong_text_color(),
                );
            }
        });
    }

    /// Floats the companion graph beside the hovered entity card.
    fn ui_companion(&mut self, ctx: &egui::Context) {
        let Some((_, card_rect)) = self.hovered_card else {
            return;
        };

        let viewport = ctx.input(|i| i.screen_rect());
        let top_left = place_companion_panel(
            Bounds::new(card_rect.min.x, card_rect.min.y, card_rect.width(), card_rect.height()),
            Vec2::new(COMPANION_SIZE.x, COMPANION_SIZE.y),
            Vec2::new(viewport.width(), viewport.height()),
        );

        let theme = self.companion.config().theme;
        let dt = ctx.input(|i| i.stable_dt);

        egui::Area::new("companion".into())
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(top_left.x, top_left.y))
            .interactable(false)
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(COMPANION_SIZE, egui::Sense::hover());
                let canvas = response.rect;
                let painter = painter.with_clip_rect(canvas);
                painter.rect_filled(canvas, 16.0, background(theme));
                painter.rect_stroke(
                    canvas,
                    16.0,
                    ui.visuals().widgets.noninteractive.bg_stroke,
                    egui::StrokeKind::Inside,
                );

                let mut surface = EguiSurface::new(&painter, canvas.min);
                if self.companion.frame(dt, &mut surface) {
                    ctx.request_repaint();
                }
                if let Some(anchors) = self.companion.label_anchors() {
                    draw_labels(&painter, canvas.min, &anchors, ui.visuals());
                }
            });
    }

    fn sync_visuals(&self, ctx: &egui::Context) {
        let dark = self.stage.config().theme == Theme::Dark;
        if ctx.style().visuals.dark_mode != dark {
            ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// Config edits are applied before the mode panel runs, so a flow that
    /// changes the status this frame is not overwritten by the edit buffer.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.config = self.stage.config().clone();
        self.ui_top_panel(ctx);
        self.ui_config_panel(ctx);
        self.apply_config();

        self.sync_visuals(ctx);
        self.ui_status_bar(ctx);
        self.ui_modes_panel(ctx);
        self.ui_central_panel(ctx);
        self.ui_companion(ctx);
    }
}

/// Config for the companion graph: the main config, capped and always idle.
fn companion_config(config: &AnimationConfig) -> AnimationConfig {
    AnimationConfig {
        particle_count: config.particle_count.min(COMPANION_MAX_PARTICLES),
        status: Status::Idle,
        ..config.clone()
    }
}

/// The mode's preferred canvas, centered in `available` and shrunk to fit.
fn canvas_rect(available: egui::Rect, mode: Mode) -> egui::Rect {
    let (w, h) = mode.preferred_size();
    let size = egui::vec2(w, h).min(available.size());
    egui::Rect::from_center_size(available.center(), size)
}

fn background(theme: Theme) -> egui::Color32 {
    match theme {
        Theme::Light => egui::Color32::from_rgb(250, 250, 250),
        Theme::Dark => egui::Color32::from_rgb(9, 9, 11),
    }
}

/// Writes entity names under each cluster and relation names above the
/// satellites.
fn draw_labels(
    painter: &egui::Painter,
    origin: egui::Pos2,
    anchors: &GraphAnchors,
    visuals: &egui::Visuals,
) {
    let at = |p: Vec2| origin + egui::vec2(p.x, p.y);

    painter.text(
        at(anchors.center.pos) + egui::vec2(0.0, CENTER_RADIUS + 8.0),
        egui::Align2::CENTER_TOP,
        &anchors.center.label,
        egui::FontId::proportional(13.0),
        visuals.strong_text_color(),
    );

    for n in &anchors.neighbors {
        let p = at(n.pos);
        painter.text(
            p + egui::vec2(0.0, SATELLITE_RADIUS + 6.0),
            egui::Align2::CENTER_TOP,
            &n.label,
            egui::FontId::proportional(11.0),
            visuals.text_color(),
        );
        if let Some(relation) = &n.relation {
            let tint = n
                .category
                .color()
                .map(to_color32)
                .unwrap_or_else(|| visuals.weak_text_color());
            painter.text(
                p - egui::vec2(0.0, SATELLITE_RADIUS + 6.0),
                egui::Align2::CENTER_BOTTOM,
                relation.to_uppercase(),
                egui::FontId::proportional(9.0),
                tint,
            );
        }
    }
}
