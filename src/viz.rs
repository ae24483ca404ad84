// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;

use crate::models::{DonationFigures, FigureSource, Progress};
use crate::utils::format_brl;

const COLOR_RAISED: RGBColor = RGBColor(0x19, 0x87, 0x54);
const COLOR_REMAINING: RGBColor = RGBColor(0x8d, 0x99, 0xae);
const COLOR_RAISED_LOCAL: RGBColor = RGBColor(0x4c, 0xaf, 0x50);
const COLOR_REMAINING_LOCAL: RGBColor = RGBColor(0xf4, 0x43, 0x36);

/// Viewport width from which the chart switches to the wide layout
pub const WIDE_VIEWPORT: u32 = 768;
const MIN_WIDTH: u32 = 240;
const HOLE_RATIO: f64 = 0.4;

/// Size and decoration of the chart for a given viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
    pub show_legend: bool,
}

impl ChartLayout {
    pub fn for_viewport(viewport_width: u32) -> Self {
        let wide = viewport_width >= WIDE_VIEWPORT;
        Self {
            width: viewport_width.max(MIN_WIDTH),
            height: if wide { 400 } else { 300 },
            font_size: if wide { 14 } else { 12 },
            show_legend: wide,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: &'static str,
    pub value: f64,
    pub color: RGBColor,
    /// Amount and share of the goal, e.g. `R$ 7.734,45 (16.7% of goal)`
    pub caption: String,
}

/// Everything the donut needs, computed up front so rendering stays dumb.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChartData {
    pub title: String,
    pub slices: [Slice; 2],
}

impl PieChartData {
    pub fn new(figures: &DonationFigures, source: FigureSource) -> Self {
        let remaining = Progress::from_figures(figures).remaining;
        let (raised_color, remaining_color, suffix) = match source {
            FigureSource::Live => (COLOR_RAISED, COLOR_REMAINING, ""),
            FigureSource::Backup => (COLOR_RAISED_LOCAL, COLOR_REMAINING_LOCAL, " (local data)"),
        };

        let caption = |amount: f64| {
            format!(
                "{} ({:.1}% of goal)",
                format_brl(amount),
                Progress::share_of_goal(amount, figures.needed)
            )
        };

        Self {
            title: format!(
                "Fundraising progress{} - Goal: {}",
                suffix,
                format_brl(figures.needed)
            ),
            slices: [
                Slice {
                    label: "Raised",
                    value: figures.raised.max(0.0),
                    color: raised_color,
                    caption: caption(figures.raised),
                },
                Slice {
                    label: "Remaining",
                    value: remaining,
                    color: remaining_color,
                    caption: caption(remaining),
                },
            ],
        }
    }

    fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// Draw the donut chart into a PNG file.
pub fn render_pie_chart(data: &PieChartData, layout: ChartLayout, output_path: &Path) -> Result<()> {
    let root = BitMapBackend::new(output_path, (layout.width, layout.height)).into_drawing_area();
    draw_pie_chart(&root, data, layout)
        .with_context(|| format!("Failed to render chart to {}", output_path.display()))?;
    root.present()
        .with_context(|| format!("Failed to write chart to {}", output_path.display()))?;
    Ok(())
}

fn draw_pie_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    data: &PieChartData,
    layout: ChartLayout,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let title_style = ("sans-serif", layout.font_size + 4).into_font().color(&BLACK);
    root.draw_text(&data.title, &title_style, (20, 15))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let (width, height) = (layout.width as i32, layout.height as i32);
    let top = 50;
    let pie_area_width = if layout.show_legend { width * 55 / 100 } else { width };
    let center = (pie_area_width / 2, top + (height - top) / 2);
    let radius = ((pie_area_width.min(height - top) as f64) * 0.9 / 2.0).max(10.0);

    if data.total() <= 0.0 {
        root.draw_text("No data", &title_style, (center.0 - 30, center.1))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        return Ok(());
    }

    let sizes: Vec<f64> = data.slices.iter().map(|s| s.value).collect();
    let colors: Vec<RGBColor> = data.slices.iter().map(|s| s.color).collect();
    let labels: Vec<&str> = if layout.show_legend {
        data.slices.iter().map(|s| s.label).collect()
    } else {
        vec![""; data.slices.len()]
    };

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.donut_hole(radius * HOLE_RATIO);
    pie.label_style(("sans-serif", layout.font_size).into_font().color(&BLACK));
    pie.percentages(("sans-serif", layout.font_size).into_font().color(&WHITE));
    root.draw(&pie).map_err(|e| anyhow::anyhow!("{:?}", e))?;

    if layout.show_legend {
        let legend_style = ("sans-serif", layout.font_size).into_font().color(&BLACK);
        let legend_x = pie_area_width + 10;
        for (i, slice) in data.slices.iter().enumerate() {
            let y = center.1 - 20 + i as i32 * (layout.font_size as i32 * 2 + 4);
            root.draw(&Rectangle::new(
                [(legend_x, y), (legend_x + 12, y + 12)],
                slice.color.filled(),
            ))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            root.draw_text(
                &format!("{}: {}", slice.label, slice.caption),
                &legend_style,
                (legend_x + 18, y),
            )
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layout_wide_viewport() {
        let layout = ChartLayout::for_viewport(1024);
        assert_eq!(layout.height, 400);
        assert_eq!(layout.font_size, 14);
        assert!(layout.show_legend);
        assert_eq!(ChartLayout::for_viewport(WIDE_VIEWPORT).height, 400);
    }

    #[test]
    fn test_layout_narrow_viewport() {
        let layout = ChartLayout::for_viewport(767);
        assert_eq!(layout.width, 767);
        assert_eq!(layout.height, 300);
        assert_eq!(layout.font_size, 12);
        assert!(!layout.show_legend);
        assert_eq!(ChartLayout::for_viewport(100).width, MIN_WIDTH);
    }

    #[test]
    fn test_live_chart_data() {
        let figures = DonationFigures {
            raised: 7734.45,
            needed: 46181.25,
        };
        let data = PieChartData::new(&figures, FigureSource::Live);

        assert_eq!(data.title, "Fundraising progress - Goal: R$ 46.181,25");
        assert_eq!(data.slices[0].color, COLOR_RAISED);
        assert_eq!(data.slices[0].caption, "R$ 7.734,45 (16.7% of goal)");
        assert_relative_eq!(data.slices[1].value, 38446.80, epsilon = 0.001);
        assert_eq!(data.slices[1].caption, "R$ 38.446,80 (83.3% of goal)");
        assert_relative_eq!(data.total(), figures.needed, epsilon = 0.001);
    }

    #[test]
    fn test_backup_chart_data() {
        let figures = DonationFigures {
            raised: 50000.0,
            needed: 40000.0,
        };
        let data = PieChartData::new(&figures, FigureSource::Backup);

        assert!(data.title.contains("(local data)"));
        assert_eq!(data.slices[0].color, COLOR_RAISED_LOCAL);
        assert_eq!(data.slices[1].color, COLOR_REMAINING_LOCAL);
        assert_eq!(data.slices[1].value, 0.0);
    }
}
