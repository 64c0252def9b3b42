/// Activity chart view: scatter of concentration vs. activity type with
/// optional half-violin overlays
///
/// The model works in scale space (y grows downward from the y range's
/// start); egui_plot grows upward, so every y is flipped around that start.

use std::collections::BTreeMap;

use egui_plot::{GridInput, GridMark, MarkerShape, Plot, PlotPoint, PlotPoints, PlotUi, Points, Polygon, VLine};

use crate::data::point::Point;
use crate::engine::classify::ShapeKind;
use crate::engine::controller::ChartModel;
use crate::engine::scale::{format_tick, BandScale};
use super::theme::{hex_to_color32, ThemeColors};

/// Pointer must be within this many screen pixels of a point to hover it
const HOVER_RADIUS_PX: f32 = 10.0;

pub fn marker_shape(shape: ShapeKind) -> MarkerShape {
    match shape {
        ShapeKind::Circle => MarkerShape::Circle,
        ShapeKind::Cross => MarkerShape::Cross,
        ShapeKind::Diamond => MarkerShape::Diamond,
        ShapeKind::Square => MarkerShape::Square,
        ShapeKind::Star => MarkerShape::Asterisk,
        ShapeKind::Triangle => MarkerShape::Up,
        ShapeKind::Wye => MarkerShape::Down,
    }
}

/// Group point positions by (color, shape) so each group is one series
fn marker_groups(points: &[Point], height: f64) -> BTreeMap<(String, ShapeKind), Vec<[f64; 2]>> {
    let mut groups: BTreeMap<(String, ShapeKind), Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        let key = (
            p.color.clone().unwrap_or_default(),
            p.shape.unwrap_or(ShapeKind::Circle),
        );
        groups.entry(key).or_default().push([p.x, height - p.y]);
    }
    groups
}

/// x positions of the lines between neighbouring bands
fn band_separators(x_scale: &BandScale) -> Vec<f64> {
    (1..x_scale.domain().len())
        .map(|i| i as f64 * x_scale.step())
        .collect()
}

/// Show the chart for a loaded model
pub fn show_chart(ui: &mut egui::Ui, model: &ChartModel, colors: &ThemeColors) {
    let config = model.config();
    let width = config.plot_width;
    let y_scale = *model.y_scale();
    // The scale's bottom output is the plot height; flip around it
    let (height, _) = y_scale.range();

    ui.horizontal(|ui| {
        ui.label(format!(
            "{} | {} measurements | {} activity types",
            model.compound_name(),
            model.points().len(),
            model.x_scale().domain().len()
        ));
        if model.violin_enabled() {
            ui.separator();
            ui.label(egui::RichText::new("🎻 violin").color(colors.accent));
        }
        if model.jitter_enabled() {
            ui.separator();
            ui.label(egui::RichText::new("↔ jitter").color(colors.accent));
        }
    });

    // Category labels at band centers
    let categories: Vec<(f64, String)> = model
        .x_scale()
        .domain()
        .iter()
        .filter_map(|c| model.x_scale().band_center(c).map(|x| (x, c.clone())))
        .collect();
    let step = model.x_scale().step();
    let x_marks: Vec<GridMark> = categories
        .iter()
        .map(|(x, _)| GridMark { value: *x, step_size: step })
        .collect();

    let separators = band_separators(model.x_scale());

    // Log ticks, flipped into plot space
    let tick_step = height / config.tick_count.max(1) as f64;
    let y_marks: Vec<GridMark> = y_scale
        .ticks(config.tick_count)
        .into_iter()
        .map(|v| GridMark {
            value: height - y_scale.scale(v),
            step_size: tick_step,
        })
        .collect();

    let plot = Plot::new(format!("activity_chart_{}", model.compound_name()))
        .height(ui.available_height() - 4.0)
        .x_axis_label("Activity type")
        .y_axis_label("Concentration")
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .allow_boxed_zoom(true)
        .show_x(false)
        .show_y(false)
        .show_grid([false, true])
        .include_x(0.0)
        .include_x(width)
        .include_y(0.0)
        .include_y(height)
        .x_grid_spacer(move |_input: GridInput| x_marks.clone())
        .y_grid_spacer(move |_input: GridInput| y_marks.clone())
        .x_axis_formatter(move |mark, _range| {
            categories
                .iter()
                .find(|(x, _)| (x - mark.value).abs() < 1e-6)
                .map(|(_, label)| label.clone())
                .unwrap_or_default()
        })
        .y_axis_formatter(move |mark, _range| format_tick(y_scale.invert(height - mark.value)));

    let radius = config.point_radius;
    let groups = marker_groups(model.points(), height);

    let plot_resp = plot.show(ui, |plot_ui: &mut PlotUi| {
        for x in &separators {
            plot_ui.vline(VLine::new(*x).color(colors.band_separator).width(1.0));
        }

        if model.violin_enabled() {
            for category in model.x_scale().domain() {
                let outline: Vec<[f64; 2]> = model
                    .violin_outline(category)
                    .into_iter()
                    .map(|[x, y]| [x, height - y])
                    .collect();
                if outline.len() < 3 {
                    continue;
                }
                let poly = Polygon::new(PlotPoints::from(outline))
                    .name(format!("{} distribution", category))
                    .fill_color(colors.violin_fill)
                    .stroke(egui::Stroke::new(1.0, colors.violin_stroke));
                plot_ui.polygon(poly);
            }
        }

        for ((hex, shape), positions) in &groups {
            let color = hex_to_color32(hex).unwrap_or(colors.text_primary);
            let pts = Points::new(PlotPoints::from(positions.clone()))
                .name(format!("{} {}", hex, shape))
                .color(color)
                .shape(marker_shape(*shape))
                .filled(true)
                .radius(radius);
            plot_ui.points(pts);
        }

        let hovered = hovered_point(plot_ui, model.points(), height);
        if let Some(idx) = hovered {
            let p = &model.points()[idx];
            let ring = Points::new(PlotPoints::from(vec![[p.x, height - p.y]]))
                .color(colors.hover_ring)
                .shape(MarkerShape::Circle)
                .filled(false)
                .radius(radius + 3.0);
            plot_ui.points(ring);
        }
        hovered
    });

    if let Some(idx) = plot_resp.inner {
        let point = &model.points()[idx];
        plot_resp.response.on_hover_ui(|ui| point_tooltip(ui, point));
    }
}

/// Index of the point nearest the pointer, if within the hover radius
fn hovered_point(plot_ui: &PlotUi, points: &[Point], height: f64) -> Option<usize> {
    let pointer = plot_ui.pointer_coordinate()?;
    let pointer_screen = plot_ui.screen_from_plot(pointer);

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let screen = plot_ui.screen_from_plot(PlotPoint::new(p.x, height - p.y));
            (i, screen.distance(pointer_screen))
        })
        .filter(|(_, d)| d.is_finite() && *d <= HOVER_RADIUS_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn point_tooltip(ui: &mut egui::Ui, point: &Point) {
    ui.strong(format!("{} ({})", point.gene_symbol, point.primary_accession));
    ui.label(point.organism.as_deref().unwrap_or("—"));
    ui.separator();
    ui.label(format!("{}: {}", point.activity_type, point.concentration_label()));
}
