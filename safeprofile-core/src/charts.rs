//! Chart requests and the PNG renderer.
//!
//! Report code describes each chart as a [`PlotRequest`] and hands it to a
//! [`ChartRenderer`]. The default [`PngChartRenderer`] rasterizes bars and
//! heat cells and writes the request's title, labels and values next to the
//! image as `<file>.png.json`, since the raster itself carries no text.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use serde::Serialize;

use crate::Result;
use crate::error::ProfileError;

/// Chart shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Vertical bars
    Bar,
    /// Horizontal bars, first label at the bottom
    Barh,
    /// Square matrix of colored cells
    Heatmap,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRequest {
    /// Chart shape
    pub kind: PlotKind,
    /// Chart title
    pub title: String,
    /// Bar labels, or axis labels for a heatmap
    pub labels: Vec<String>,
    /// Bar lengths; empty for heatmaps
    pub values: Vec<f64>,
    /// Heatmap cells, row-major; empty for bar charts
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Horizontal axis caption
    pub x_label: Option<String>,
    /// Vertical axis caption
    pub y_label: Option<String>,
    /// Target PNG path
    #[serde(skip)]
    pub output: PathBuf,
}

impl PlotRequest {
    /// A vertical bar chart.
    pub fn bar(
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: PlotKind::Bar,
            title: title.into(),
            labels,
            values,
            matrix: Vec::new(),
            x_label: None,
            y_label: None,
            output: output.into(),
        }
    }

    /// A horizontal bar chart.
    pub fn barh(
        title: impl Into<String>,
        labels: Vec<String>,
        values: Vec<f64>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: PlotKind::Barh,
            ..Self::bar(title, labels, values, output)
        }
    }

    /// A heatmap over a square matrix.
    pub fn heatmap(
        title: impl Into<String>,
        labels: Vec<String>,
        matrix: Vec<Vec<Option<f64>>>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind: PlotKind::Heatmap,
            matrix,
            ..Self::bar(title, labels, Vec::new(), output)
        }
    }

    /// Sets the horizontal axis caption.
    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    /// Sets the vertical axis caption.
    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }
}

/// Draws charts.
pub trait ChartRenderer {
    /// Renders one chart to `request.output`.
    fn render(&mut self, request: &PlotRequest) -> Result<()>;
}

/// Sidecar path holding the chart metadata.
pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);
const MISSING_CELL: Rgb<u8> = Rgb([200, 200, 200]);

/// Raster renderer writing PNG files with a JSON sidecar.
#[derive(Debug, Clone, Copy)]
pub struct PngChartRenderer {
    width: u32,
    height: u32,
    margin: u32,
}

impl Default for PngChartRenderer {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 40,
        }
    }
}

impl PngChartRenderer {
    /// Creates a renderer with a custom canvas size.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            margin: (width.min(height) / 15).max(1),
        }
    }

    /// Rasterizes a request without writing it.
    pub fn rasterize(&self, request: &PlotRequest) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        match request.kind {
            PlotKind::Bar => self.draw_bars(&mut canvas, &request.values, false),
            PlotKind::Barh => self.draw_bars(&mut canvas, &request.values, true),
            PlotKind::Heatmap => self.draw_heatmap(&mut canvas, &request.matrix),
        }
        self.draw_axes(&mut canvas);
        canvas
    }

    fn plot_area(&self) -> (u32, u32, u32, u32) {
        let x0 = self.margin;
        let y0 = self.margin;
        let w = self.width.saturating_sub(2 * self.margin).max(1);
        let h = self.height.saturating_sub(2 * self.margin).max(1);
        (x0, y0, w, h)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn draw_bars(&self, canvas: &mut RgbImage, values: &[f64], horizontal: bool) {
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        if values.is_empty() || max <= 0.0 {
            return;
        }

        let (x0, y0, w, h) = self.plot_area();
        let slots = values.len() as u32;
        let along = if horizontal { h } else { w };
        let slot = (along / slots).max(1);
        let gap = slot / 5;

        for (i, value) in values.iter().enumerate() {
            let share = (value.max(0.0) / max).min(1.0);
            let offset = i as u32 * slot;
            if horizontal {
                // first value at the bottom
                let length = (share * f64::from(w)) as u32;
                let top = (y0 + h).saturating_sub(offset + slot) + gap;
                fill_rect(canvas, x0, top, length, slot - gap, BAR);
            } else {
                let length = (share * f64::from(h)) as u32;
                fill_rect(canvas, x0 + offset + gap, y0 + h - length, slot - gap, length, BAR);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_heatmap(&self, canvas: &mut RgbImage, matrix: &[Vec<Option<f64>>]) {
        let n = u32::try_from(matrix.len()).unwrap_or(u32::MAX);
        if n == 0 {
            return;
        }
        let (x0, y0, w, h) = self.plot_area();
        let cell_w = (w / n).max(1);
        let cell_h = (h / n).max(1);

        for (r, row) in (0_u32..).zip(matrix) {
            for (c, cell) in (0_u32..).zip(row) {
                let color = cell.map_or(MISSING_CELL, diverging_color);
                fill_rect(canvas, x0 + c * cell_w, y0 + r * cell_h, cell_w, cell_h, color);
            }
        }
    }

    fn draw_axes(&self, canvas: &mut RgbImage) {
        let (x0, y0, w, h) = self.plot_area();
        fill_rect(canvas, x0, y0 + h, w, 1, AXIS);
        fill_rect(canvas, x0, y0, 1, h, AXIS);
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&mut self, request: &PlotRequest) -> Result<()> {
        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ProfileError::io(format!("creating {}", parent.display()), e)
            })?;
        }

        self.rasterize(request).save(&request.output).map_err(|e| {
            ProfileError::render_failed(format!("writing {}", request.output.display()), e)
        })?;

        let sidecar = sidecar_path(&request.output);
        let json = serde_json::to_vec_pretty(request).map_err(|e| {
            ProfileError::serialization(format!("chart metadata for {}", sidecar.display()), e)
        })?;
        std::fs::write(&sidecar, json)
            .map_err(|e| ProfileError::io(format!("writing {}", sidecar.display()), e))?;

        tracing::debug!("Rendered {:?} chart to {}", request.kind, request.output.display());
        Ok(())
    }
}

/// Blue for -1, white for 0, red for +1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn diverging_color(value: f64) -> Rgb<u8> {
    let v = value.clamp(-1.0, 1.0);
    let fade = ((1.0 - v.abs()) * 255.0) as u8;
    if v >= 0.0 {
        Rgb([255, fade, fade])
    } else {
        Rgb([fade, fade, 255])
    }
}

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}
