//! Equirectangular projection fitted to a set of region outlines.

use geo::{BoundingRect, Coord, MultiPolygon, Rect};

/// Projects lon/lat degrees onto a plane where one unit of x equals one unit
/// of y on the ground at the centre latitude of the mapped area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    bounds: Rect<f64>,
    x_scale: f64,
}

impl MapProjection {
    /// Fit a projection to the combined bounding box of `geometries`.
    ///
    /// Returns `None` when there is nothing to draw.
    pub fn fit<'a>(geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> Option<Self> {
        let bounds = geometries
            .into_iter()
            .filter_map(|g| g.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    Coord {
                        x: a.min().x.min(b.min().x),
                        y: a.min().y.min(b.min().y),
                    },
                    Coord {
                        x: a.max().x.max(b.max().x),
                        y: a.max().y.max(b.max().y),
                    },
                )
            })?;

        let centre_lat = (bounds.min().y + bounds.max().y) / 2.0;
        Some(Self {
            bounds,
            x_scale: centre_lat.to_radians().cos(),
        })
    }

    pub fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        (coord.x * self.x_scale, coord.y)
    }

    /// Projected x range.
    pub fn x_range(&self) -> (f64, f64) {
        (
            self.bounds.min().x * self.x_scale,
            self.bounds.max().x * self.x_scale,
        )
    }

    /// Projected y range.
    pub fn y_range(&self) -> (f64, f64) {
        (self.bounds.min().y, self.bounds.max().y)
    }

    /// Width over height of the projected area.
    pub fn aspect_ratio(&self) -> f64 {
        let (x0, x1) = self.x_range();
        let (y0, y1) = self.y_range();
        let height = y1 - y0;
        if height <= 0.0 {
            1.0
        } else {
            (x1 - x0) / height
        }
    }

    /// Exterior rings of `geometry`, projected.
    pub fn project_rings(&self, geometry: &MultiPolygon<f64>) -> Vec<Vec<(f64, f64)>> {
        geometry
            .iter()
            .map(|polygon| {
                polygon
                    .exterior()
                    .coords()
                    .map(|c| self.project(*c))
                    .collect()
            })
            .collect()
    }
}
