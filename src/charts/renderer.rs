//! Static Chart Renderer
//! Draws the dashboard charts to PNG images with plotters, for report export.
//!
//! Layout of every image:
//! 1. Title centered at the top
//! 2. Chart body (pie with legend, vertical bars, or line with markers)
//! 3. Optional note in the bottom-left corner

use crate::charts::{percentage, pie_angles, ChartData, ChartKind, ChartSeries};
use crate::data::DataProcessor;
use crate::stats::{total, CategoryCount, DateCount};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] image::ImageError),
    #[error("Invalid image size {0}x{1}")]
    InvalidSize(u32, u32),
}

impl RenderError {
    fn drawing<E: std::fmt::Display>(e: E) -> Self {
        RenderError::Drawing(e.to_string())
    }
}

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(99, 110, 250);
const SLICE_COLORS: [RGBColor; 10] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
    RGBColor(255, 102, 146),
    RGBColor(182, 232, 128),
    RGBColor(255, 151, 255),
    RGBColor(254, 203, 82),
];

/// Longest category label drawn under a bar before it is shortened.
const MAX_LABEL_CHARS: usize = 18;

pub struct ChartRenderer;

impl ChartRenderer {
    /// Render one chart to PNG bytes.
    pub fn render_chart_to_bytes(
        chart: &ChartData,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize(width, height));
        }

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(RenderError::drawing)?;

            let body = root
                .titled(&chart.title, (FONT, 30).into_font())
                .map_err(RenderError::drawing)?;

            match (&chart.series, chart.kind) {
                (series, _) if series.is_empty() => Self::draw_empty(&body)?,
                (ChartSeries::Categories(counts), ChartKind::Pie) => Self::draw_pie(&body, counts)?,
                (ChartSeries::Categories(counts), _) => Self::draw_bars(&body, chart, counts)?,
                (ChartSeries::Dates(points), _) => Self::draw_line(&body, chart, points)?,
            }

            if let Some(note) = &chart.note {
                root.draw(&Text::new(
                    note.clone(),
                    (20, height as i32 - 30),
                    (FONT, 16).into_font().color(&RGBColor(120, 120, 120)),
                ))
                .map_err(RenderError::drawing)?;
            }

            root.present().map_err(RenderError::drawing)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::InvalidSize(width, height))?;
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    fn draw_empty<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            "No data",
            (w as i32 / 2 - 40, h as i32 / 2),
            (FONT, 24).into_font().color(&RGBColor(150, 150, 150)),
        ))
        .map_err(RenderError::drawing)
    }

    fn draw_pie<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        counts: &[CategoryCount],
    ) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        let (chart_area, legend_area) = area.split_horizontally((w as f64 * 0.65) as u32);

        let (cw, ch) = chart_area.dim_in_pixel();
        let center = (cw as i32 / 2, ch as i32 / 2);
        let radius = (cw.min(ch) as f64 * 0.4).max(1.0);
        let sum = total(counts);

        for (idx, &(start, end)) in pie_angles(counts).iter().enumerate() {
            let steps = ((end - start) * 30.0).ceil().max(1.0) as usize;
            let mut points = vec![center];
            for i in 0..=steps {
                let angle = start + (end - start) * i as f64 / steps as f64;
                points.push((
                    center.0 + (radius * angle.sin()) as i32,
                    center.1 - (radius * angle.cos()) as i32,
                ));
            }
            chart_area
                .draw(&Polygon::new(points, SLICE_COLORS[idx % SLICE_COLORS.len()].filled()))
                .map_err(RenderError::drawing)?;
        }

        for (idx, c) in counts.iter().enumerate() {
            let y = 40 + idx as i32 * 32;
            if y > h as i32 - 20 {
                break;
            }
            let color = SLICE_COLORS[idx % SLICE_COLORS.len()];
            legend_area
                .draw(&Rectangle::new([(10, y), (30, y + 20)], color.filled()))
                .map_err(RenderError::drawing)?;
            legend_area
                .draw(&Text::new(
                    format!("{} ({:.1}%)", c.category, percentage(c.count, sum)),
                    (40, y + 2),
                    (FONT, 18).into_font(),
                ))
                .map_err(RenderError::drawing)?;
        }

        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        counts: &[CategoryCount],
    ) -> Result<(), RenderError> {
        let labels: Vec<String> = counts.iter().map(|c| Self::short_label(&c.category)).collect();
        let y_max = counts.iter().map(|c| c.count).max().unwrap_or(0) as u32;
        let n = counts.len() as u32;

        let mut cc = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(80)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), 0u32..Self::headroom(y_max))
            .map_err(RenderError::drawing)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(counts.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .label_style((FONT, 14))
            .draw()
            .map_err(RenderError::drawing)?;

        cc.draw_series(
            Histogram::vertical(&cc)
                .style(BAR_COLOR.filled())
                .margin(10)
                .data(counts.iter().enumerate().map(|(i, c)| (i as u32, c.count as u32))),
        )
        .map_err(RenderError::drawing)?;

        Ok(())
    }

    fn draw_line<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        chart: &ChartData,
        points: &[DateCount],
    ) -> Result<(), RenderError> {
        let xy: Vec<(i32, u32)> = points
            .iter()
            .map(|p| (DataProcessor::date_to_days(p.date), p.count as u32))
            .collect();
        let x_min = xy.first().map(|p| p.0).unwrap_or(0);
        let x_max = xy.last().map(|p| p.0).unwrap_or(0);
        let y_max = xy.iter().map(|p| p.1).max().unwrap_or(0);

        let mut cc = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d((x_min - 1)..(x_max + 1), 0u32..Self::headroom(y_max))
            .map_err(RenderError::drawing)?;

        cc.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_labels(8)
            .x_label_formatter(&|days| {
                DataProcessor::days_to_date(*days)
                    .map(|d| d.format("%d %b").to_string())
                    .unwrap_or_default()
            })
            .label_style((FONT, 14))
            .draw()
            .map_err(RenderError::drawing)?;

        cc.draw_series(LineSeries::new(xy.iter().copied(), BAR_COLOR.stroke_width(3)))
            .map_err(RenderError::drawing)?;
        cc.draw_series(
            xy.iter()
                .map(|&(x, y)| Circle::new((x, y), 5, BAR_COLOR.filled())),
        )
        .map_err(RenderError::drawing)?;

        Ok(())
    }

    /// Axis upper bound leaving some room above the tallest value.
    fn headroom(max: u32) -> u32 {
        (max + max / 10).max(max + 1)
    }

    fn short_label(label: &str) -> String {
        if label.chars().count() <= MAX_LABEL_CHARS {
            label.to_string()
        } else {
            let cut: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{}…", cut)
        }
    }
}
