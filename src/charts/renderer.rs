//! Static Map Renderer
//! Draws the choropleth with plotters, to a PNG file or an RGB buffer.
//!
//! Layout:
//! 1. Optional caption centred on top
//! 2. Map area: one filled polygon per region ring, outlined in dark grey
//! 3. Colour bar on the right, with min/max labels when text is enabled

use crate::charts::{ColorScale, MapResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

// Colors
const BACKGROUND: RGBColor = RGBColor(255, 255, 255);
const OUTLINE: RGBColor = RGBColor(60, 60, 60);
const TEXT: RGBColor = RGBColor(0, 0, 0);

// Layout (pixels)
const COLOR_BAR_WIDTH: u32 = 90;
const COLOR_BAR_STEPS: i32 = 100;
const MARGIN: u32 = 15;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No region has a geometry to draw")]
    NothingToDraw,
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Buffer of {actual} bytes cannot hold a {width}x{height} RGB image")]
    BufferSize {
        width: u32,
        height: u32,
        actual: usize,
    },
}

/// What to draw around the map itself.
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub caption: Option<String>,
    /// Draw min/max labels on the colour bar (requires a system font).
    pub labels: bool,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            caption: Some("Choice A share of expressed ballots".to_string()),
            labels: true,
        }
    }
}

impl MapStyle {
    /// No text at all, so nothing depends on installed fonts.
    pub fn plain() -> Self {
        Self {
            caption: None,
            labels: false,
        }
    }
}

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render the map to a PNG file.
    pub fn render_png(
        map: &MapResult,
        path: &Path,
        width: u32,
        height: u32,
        style: &MapStyle,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        Self::draw(&root, map, style)?;
        root.present().map_err(draw_error)?;
        info!(path = ?path, width, height, "rendered map");
        Ok(())
    }

    /// Render the map into an RGB buffer of `width * height * 3` bytes.
    pub fn render_to_buffer(
        map: &MapResult,
        buffer: &mut [u8],
        width: u32,
        height: u32,
        style: &MapStyle,
    ) -> Result<(), RenderError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3));
        if expected != Some(buffer.len()) {
            return Err(RenderError::BufferSize {
                width,
                height,
                actual: buffer.len(),
            });
        }
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        Self::draw(&root, map, style)?;
        root.present().map_err(draw_error)?;
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        map: &MapResult,
        style: &MapStyle,
    ) -> Result<(), RenderError> {
        let projection = map.projection().ok_or(RenderError::NothingToDraw)?;
        let scale = map.color_scale();

        root.fill(&BACKGROUND).map_err(draw_error)?;

        let (width, _) = root.dim_in_pixel();
        let bar_width = COLOR_BAR_WIDTH.min(width / 4);
        let (map_area, bar_area) = root.split_horizontally((width - bar_width) as i32);

        let (x0, x1) = projection.x_range();
        let (y0, y1) = projection.y_range();

        let mut builder = ChartBuilder::on(&map_area);
        builder.margin(MARGIN);
        if let Some(caption) = &style.caption {
            builder.caption(caption, ("sans-serif", 24).into_font().color(&TEXT));
        }
        let mut chart = builder
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_error)?;

        for region in &map.regions {
            let Some(geometry) = &region.geometry else {
                continue;
            };
            let (r, g, b) = scale.color(region.ratio);
            let fill = RGBColor(r, g, b);

            for ring in projection.project_rings(geometry) {
                chart
                    .draw_series(std::iter::once(Polygon::new(ring.clone(), fill.filled())))
                    .map_err(draw_error)?;
                chart
                    .draw_series(std::iter::once(PathElement::new(ring, OUTLINE.stroke_width(1))))
                    .map_err(draw_error)?;
            }
        }

        Self::draw_color_bar(&bar_area, &scale, style)
    }

    /// Vertical gradient, highest ratio on top.
    fn draw_color_bar<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        scale: &ColorScale,
        style: &MapStyle,
    ) -> Result<(), RenderError> {
        let (width, height) = area.dim_in_pixel();
        let (width, height) = (width as i32, height as i32);
        let margin = MARGIN as i32;

        let left = margin / 2;
        let right = (width / 3).max(left + 4);
        let top = margin * 3;
        let bottom = (height - margin * 3).max(top + COLOR_BAR_STEPS);
        let step_h = (bottom - top) as f64 / COLOR_BAR_STEPS as f64;

        for step in 0..COLOR_BAR_STEPS {
            let t = 1.0 - step as f64 / (COLOR_BAR_STEPS - 1) as f64;
            let (r, g, b) = ColorScale::ramp(t);
            let y_top = top + (step as f64 * step_h) as i32;
            let y_bottom = top + ((step + 1) as f64 * step_h).ceil() as i32;
            area.draw(&Rectangle::new(
                [(left, y_top), (right, y_bottom)],
                RGBColor(r, g, b).filled(),
            ))
            .map_err(draw_error)?;
        }
        area.draw(&Rectangle::new([(left, top), (right, bottom)], OUTLINE.stroke_width(1)))
            .map_err(draw_error)?;

        if style.labels {
            let font = ("sans-serif", 14).into_font().color(&TEXT);
            area.draw(&Text::new(format!("{:.2}", scale.max), (right + 4, top), font.clone()))
                .map_err(draw_error)?;
            area.draw(&Text::new(
                format!("{:.2}", scale.min),
                (right + 4, bottom - 14),
                font,
            ))
            .map_err(draw_error)?;
        }

        Ok(())
    }
}

fn draw_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::build_map_result;
    use crate::data::columns::{
        ABSTENTIONS, CHOICE_A, CHOICE_B, CODE_REG, NAME_REG, NULL, REGISTERED,
    };
    use crate::geography::RegionGeometry;
    use geo::{polygon, MultiPolygon};
    use polars::prelude::*;

    fn map(with_geometry: bool) -> MapResult {
        let results = df!(
            CODE_REG => ["84", "11"],
            NAME_REG => ["Auvergne-Rhône-Alpes", "Île-de-France"],
            REGISTERED => [100i64, 500],
            ABSTENTIONS => [20i64, 100],
            NULL => [5i64, 25],
            CHOICE_A => [30i64, 0],
            CHOICE_B => [45i64, 0],
        )
        .unwrap();

        let geometries = if with_geometry {
            vec![
                RegionGeometry {
                    code: "84".to_string(),
                    geometry: MultiPolygon::new(vec![polygon![
                        (x: 3.0, y: 44.0),
                        (x: 7.0, y: 44.0),
                        (x: 7.0, y: 47.0),
                        (x: 3.0, y: 47.0),
                    ]]),
                },
                RegionGeometry {
                    code: "11".to_string(),
                    geometry: MultiPolygon::new(vec![polygon![
                        (x: 1.5, y: 48.0),
                        (x: 3.5, y: 48.0),
                        (x: 3.5, y: 49.3),
                        (x: 1.5, y: 49.3),
                    ]]),
                },
            ]
        } else {
            Vec::new()
        };

        build_map_result(&results, geometries).unwrap()
    }

    #[test]
    fn renders_into_buffer() {
        let (width, height) = (200u32, 160u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        let style = MapStyle::plain();
        StaticMapRenderer::render_to_buffer(&map(true), &mut buffer, width, height, &style)
            .unwrap();

        // Background is white and at least one region pixel is not.
        assert_eq!(&buffer[0..3], &[255, 255, 255]);
        assert!(buffer.chunks(3).any(|px| px != [255, 255, 255]));
    }

    #[test]
    fn undefined_ratio_region_is_drawn_grey() {
        let (width, height) = (200u32, 160u32);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        let style = MapStyle::plain();
        StaticMapRenderer::render_to_buffer(&map(true), &mut buffer, width, height, &style)
            .unwrap();

        let grey = [200u8, 200, 200];
        assert!(buffer.chunks(3).any(|px| px == grey));
    }

    #[test]
    fn nothing_to_draw_without_geometry() {
        let mut buffer = vec![0u8; 100 * 100 * 3];
        let style = MapStyle::plain();
        let err = StaticMapRenderer::render_to_buffer(&map(false), &mut buffer, 100, 100, &style)
            .unwrap_err();
        assert!(matches!(err, RenderError::NothingToDraw));
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let mut buffer = vec![0u8; 10];
        let style = MapStyle::plain();
        let err = StaticMapRenderer::render_to_buffer(&map(true), &mut buffer, 100, 100, &style)
            .unwrap_err();
        assert!(matches!(err, RenderError::BufferSize { actual: 10, .. }));
    }

    #[test]
    fn oversized_dimensions_are_rejected_without_overflow() {
        let mut buffer = vec![0u8; 10];
        let style = MapStyle::plain();
        let (width, height) = (u32::MAX, u32::MAX);
        let err =
            StaticMapRenderer::render_to_buffer(&map(true), &mut buffer, width, height, &style)
                .unwrap_err();
        assert!(matches!(err, RenderError::BufferSize { actual: 10, .. }));
    }
}
