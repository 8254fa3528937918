use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, Points, uniform_grid_spacer,
};

use crate::color::{EarthScale, token_to_color32, with_opacity};
use crate::data::basemap::initial_bounds;
use crate::data::encode::{PLATE_STYLE, marker_style, popup_text};
use crate::data::trace::{BarTrace, BubbleTrace};
use crate::state::{AppState, MapState};

/// Smallest radius drawn on screen. Zero and negative encoded radii are
/// clamped here.
const MIN_MARKER_RADIUS: f32 = 1.0;

const BAR_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Samples dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render both subject charts stacked vertically.
pub fn samples_plots(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.samples.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.samples.pending.is_some() {
                ui.heading("Loading samples…");
            } else {
                ui.heading("No samples loaded  (File → Reload or File → Open…)");
            }
        });
        return;
    };

    let chart_height = (ui.available_height() / 2.0 - 40.0).max(120.0);
    bar_chart(ui, &view.bar, chart_height);
    ui.separator();
    bubble_chart(ui, &view.bubble, chart_height);
}

/// Horizontal bar chart of the top OTUs, largest on top.
pub fn bar_chart(ui: &mut Ui, trace: &BarTrace, height: f32) {
    ui.heading(trace.layout.title.as_str());

    let bars: Vec<Bar> = trace
        .bars
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Bar::new(i as f64, entry.value)
                .name(&entry.hover)
                .fill(BAR_COLOR)
                .width(0.7)
        })
        .collect();
    let chart = BarChart::new(bars)
        .horizontal()
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{}", bar.name, bar.value)
        }));

    let labels: Vec<String> = trace.bars.iter().map(|b| b.label.clone()).collect();
    Plot::new("otu_bar_chart")
        .height(height)
        .x_axis_label(trace.layout.x_title.as_str())
        .y_axis_label(trace.layout.y_title.as_str())
        .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

/// Label of the category drawn at `position`, empty between categories.
fn category_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Bubble chart of every OTU: size from the reading, colour from the OTU id.
pub fn bubble_chart(ui: &mut Ui, trace: &BubbleTrace, height: f32) {
    ui.heading(trace.layout.title.as_str());

    let scale = EarthScale::new(trace.color_range);
    Plot::new("otu_bubble_chart")
        .height(height)
        .x_axis_label(trace.layout.x_title.as_str())
        .y_axis_label(trace.layout.y_title.as_str())
        .label_formatter(hover_label)
        .show(ui, |plot_ui| {
            for bubble in &trace.bubbles {
                // Marker size is a diameter in pixels.
                let radius = ((bubble.size / 2.0) as f32).max(MIN_MARKER_RADIUS);
                plot_ui.points(
                    Points::new(vec![[bubble.x, bubble.y]])
                        .radius(radius)
                        .color(scale.color_for(bubble.color_value))
                        .filled(true)
                        .name(&bubble.text),
                );
            }
        });
}

fn hover_label(name: &str, value: &PlotPoint) -> String {
    if name.is_empty() {
        format!("x: {:.1}\ny: {:.1}", value.x, value.y)
    } else {
        format!("{name}\nx: {:.1}\ny: {:.1}", value.x, value.y)
    }
}

// ---------------------------------------------------------------------------
// Earthquake map (central panel)
// ---------------------------------------------------------------------------

/// Render plates and earthquakes on a lon/lat plot over the base layer's
/// backdrop.
pub fn quake_map(ui: &mut Ui, map: &MapState) {
    let (r, g, b) = map.base_layer.backdrop_rgb();
    let rect = ui.available_rect_before_wrap();
    ui.painter().rect_filled(rect, 0.0, Color32::from_rgb(r, g, b));

    let ((lon_min, lon_max), (lat_min, lat_max)) = initial_bounds();
    let plate_color = token_to_color32(PLATE_STYLE.color);

    Plot::new("quake_map")
        .data_aspect(1.0)
        .default_x_bounds(lon_min, lon_max)
        .default_y_bounds(lat_min, lat_max)
        .show_background(false)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|name: &str, value: &PlotPoint| {
            if name.is_empty() {
                format!("{:.3}, {:.3}", value.y, value.x)
            } else {
                name.to_string()
            }
        })
        .show(ui, |plot_ui| {
            if let (true, Some(plates)) = (map.show_plates, &map.plates) {
                for line in &plates.lines {
                    plot_ui.line(
                        Line::new(PlotPoints::from(line.points.clone()))
                            .color(plate_color)
                            .width(PLATE_STYLE.weight),
                    );
                }
            }

            if let (true, Some(quakes)) = (map.show_quakes, &map.quakes) {
                for feature in &quakes.features {
                    let style = marker_style(feature);
                    let radius = (style.radius as f32).max(MIN_MARKER_RADIUS);
                    let position = vec![[feature.longitude, feature.latitude]];
                    let popup = popup_text(feature);

                    plot_ui.points(
                        Points::new(position.clone())
                            .radius(radius)
                            .color(with_opacity(
                                token_to_color32(style.fill_color),
                                style.fill_opacity,
                            ))
                            .filled(true)
                            .name(&popup),
                    );
                    if style.stroke {
                        plot_ui.points(
                            Points::new(position)
                                .radius(radius)
                                .color(with_opacity(
                                    token_to_color32(style.outline),
                                    style.opacity,
                                ))
                                .filled(false)
                                .name(&popup),
                        );
                    }
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label() {
        let labels = vec!["OTU 482".to_string(), "OTU 1167".to_string()];
        assert_eq!(category_label(&labels, 0.0), "OTU 482");
        assert_eq!(category_label(&labels, 1.0000001), "OTU 1167");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn test_hover_label() {
        let point = PlotPoint::new(1167.0, 163.0);
        assert_eq!(hover_label("", &point), "x: 1167.0\ny: 163.0");
        assert!(hover_label("Bacteria", &point).starts_with("Bacteria\n"));
    }
}
