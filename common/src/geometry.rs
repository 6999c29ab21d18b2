//! Resolution-independent geometry math.
//!
//! Field positions and sizes are expressed as floating percentages (0–100)
//! of the logical page dimensions, never as pixels. Pointer input arrives in
//! pixels and is converted against the *displayed* page container, so the
//! same field data renders correctly at any on-screen scale.
//!
//! Everything in this module is a pure function. The only possible error is
//! a degenerate container (`InvalidGeometry`), which indicates a caller bug.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Fixed logical page width, in abstract units. All scale factors and
/// percentage conversions are computed against this reference width.
pub const LOGICAL_PAGE_WIDTH: f64 = 800.0;

/// Default logical page height (A4-ish aspect), used until rasterization
/// reports the real page aspect ratio.
pub const DEFAULT_PAGE_HEIGHT: f64 = 1132.0;

/// Size floor for fields, in percentage units. Resizing clamps against
/// these so a field can never become degenerate.
pub const MIN_FIELD_W: f64 = 2.0;
pub const MIN_FIELD_H: f64 = 1.0;

/// Position and size of a field as percentages of the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FieldGeometry {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
}

/// The eight compass-direction resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::S => "s",
            ResizeHandle::E => "e",
            ResizeHandle::W => "w",
            ResizeHandle::Ne => "ne",
            ResizeHandle::Nw => "nw",
            ResizeHandle::Se => "se",
            ResizeHandle::Sw => "sw",
        }
    }

    fn has_east(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::Ne | ResizeHandle::Se)
    }

    fn has_west(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::Nw | ResizeHandle::Sw)
    }

    fn has_north(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::Ne | ResizeHandle::Nw)
    }

    fn has_south(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::Se | ResizeHandle::Sw)
    }
}

/// Converts a pixel delta into a percentage delta relative to the displayed
/// page container. Fails on a non-positive container dimension.
pub fn pixel_delta_to_percent(
    dx_px: f64,
    dy_px: f64,
    container_w_px: f64,
    container_h_px: f64,
) -> Result<(f64, f64), CoreError> {
    if container_w_px <= 0.0 || container_h_px <= 0.0 {
        return Err(CoreError::InvalidGeometry {
            width: container_w_px,
            height: container_h_px,
        });
    }
    Ok((
        dx_px / container_w_px * 100.0,
        dy_px / container_h_px * 100.0,
    ))
}

/// Shifts a geometry by a percentage delta. No clamping: a field may be
/// dragged partially off-page, that is accepted behavior.
pub fn apply_move(geometry: FieldGeometry, dx_pct: f64, dy_pct: f64) -> FieldGeometry {
    FieldGeometry {
        x: geometry.x + dx_pct,
        y: geometry.y + dy_pct,
        ..geometry
    }
}

/// Resizes a geometry through one of the eight handles.
///
/// East/south handles grow or shrink width/height directly. West/north
/// handles also shift `x`/`y` so the opposite edge stays fixed; the shift
/// applied is the *clamped* delta, not the requested one, so the field does
/// not jump when the size floor is hit.
pub fn apply_resize(
    geometry: FieldGeometry,
    handle: ResizeHandle,
    dx_pct: f64,
    dy_pct: f64,
) -> FieldGeometry {
    let mut g = geometry;

    if handle.has_east() {
        g.w = (g.w + dx_pct).max(MIN_FIELD_W);
    }
    if handle.has_west() {
        let applied = dx_pct.min(g.w - MIN_FIELD_W);
        g.x += applied;
        g.w -= applied;
    }
    if handle.has_south() {
        g.h = (g.h + dy_pct).max(MIN_FIELD_H);
    }
    if handle.has_north() {
        let applied = dy_pct.min(g.h - MIN_FIELD_H);
        g.y += applied;
        g.h -= applied;
    }
    g
}

/// Pulls a geometry back so that at least `MIN_VISIBLE` percent of it stays
/// on the page. Applied once when a gesture ends, never during the drag.
pub fn clamp_visible(geometry: FieldGeometry) -> FieldGeometry {
    const MIN_VISIBLE: f64 = 1.0;
    FieldGeometry {
        x: geometry
            .x
            .clamp(MIN_VISIBLE - geometry.w, 100.0 - MIN_VISIBLE),
        y: geometry
            .y
            .clamp(MIN_VISIBLE - geometry.h, 100.0 - MIN_VISIBLE),
        ..geometry
    }
}

/// Scale factor for rendering a logical page into the available width.
/// Documents only ever scale down to fit, never up past 100%.
pub fn fit_scale(available_w_px: f64, logical_w: f64) -> f64 {
    if logical_w <= 0.0 {
        return 1.0;
    }
    (available_w_px / logical_w).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(x: f64, y: f64, w: f64, h: f64) -> FieldGeometry {
        FieldGeometry::new(x, y, w, h)
    }

    #[test]
    fn pixel_delta_scales_by_container() {
        let (dx, dy) = pixel_delta_to_percent(40.0, 0.0, 800.0, 1132.0).unwrap();
        assert!((dx - 5.0).abs() < 1e-9);
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn degenerate_container_is_rejected() {
        let err = pixel_delta_to_percent(10.0, 10.0, 0.0, 500.0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidGeometry { .. }));
    }

    #[test]
    fn move_deltas_compose_from_the_original_position() {
        // Applying the summed delta to the start geometry must equal the
        // result of re-applying each total against the same start geometry.
        let start = geom(10.0, 10.0, 20.0, 5.0);
        let deltas = [(3.5, -1.25), (-0.5, 4.0), (12.0, 0.75)];
        let (sx, sy) = deltas
            .iter()
            .fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
        let stepped = apply_move(start, sx, sy);
        assert!((stepped.x - (10.0 + sx)).abs() < 1e-9);
        assert!((stepped.y - (10.0 + sy)).abs() < 1e-9);
        assert_eq!(stepped.w, start.w);
        assert_eq!(stepped.h, start.h);
    }

    #[test]
    fn east_resize_grows_width_only() {
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::E, 4.0, 99.0);
        assert_eq!(g, geom(10.0, 10.0, 24.0, 5.0));
    }

    #[test]
    fn west_resize_keeps_opposite_edge_fixed() {
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::W, -4.0, 0.0);
        assert_eq!(g, geom(6.0, 10.0, 24.0, 5.0));
        // Right edge unchanged.
        assert!((g.x + g.w - 30.0).abs() < 1e-9);
    }

    #[test]
    fn west_clamp_shifts_x_by_the_applied_amount_only() {
        // Requesting w -> 1 against the floor of 2 must land exactly at 2,
        // and x must move by (original width - 2), not the raw delta.
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::W, 19.0, 0.0);
        assert_eq!(g.w, MIN_FIELD_W);
        assert_eq!(g.x, 10.0 + (20.0 - MIN_FIELD_W));
    }

    #[test]
    fn north_clamp_shifts_y_by_the_applied_amount_only() {
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::N, 0.0, 30.0);
        assert_eq!(g.h, MIN_FIELD_H);
        assert_eq!(g.y, 10.0 + (5.0 - MIN_FIELD_H));
    }

    #[test]
    fn south_resize_floors_height() {
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::S, 0.0, -30.0);
        assert_eq!(g.h, MIN_FIELD_H);
        assert_eq!(g.y, 10.0);
    }

    #[test]
    fn corner_resize_adjusts_both_axes() {
        let g = apply_resize(geom(10.0, 10.0, 20.0, 5.0), ResizeHandle::Se, 2.0, 3.0);
        assert_eq!(g, geom(10.0, 10.0, 22.0, 8.0));
    }

    #[test]
    fn scale_never_exceeds_one() {
        assert_eq!(fit_scale(1600.0, LOGICAL_PAGE_WIDTH), 1.0);
        assert!((fit_scale(400.0, LOGICAL_PAGE_WIDTH) - 0.5).abs() < 1e-9);
        assert_eq!(fit_scale(-20.0, LOGICAL_PAGE_WIDTH), 0.0);
    }

    #[test]
    fn clamp_visible_keeps_a_sliver_on_page() {
        let g = clamp_visible(geom(-40.0, 120.0, 20.0, 5.0));
        assert_eq!(g.x, -19.0);
        assert_eq!(g.y, 99.0);
    }
}
