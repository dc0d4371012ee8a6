use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::types::{DataPoint, PointRef, ScreenPoint};
use super::view_state::ViewState;

/// Below this size the sequential scan beats the rayon split overhead.
#[cfg(feature = "parallel-hit-test")]
const PARALLEL_HIT_TEST_MIN_POINTS: usize = 16_384;

/// One point as laid out by the renderer at identity view transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderedPoint {
    pub point: PointRef,
    pub layout: ScreenPoint,
    pub value: DataPoint,
}

/// Result of a nearest-point search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointHit {
    pub point: PointRef,
    /// Current screen position (layout projected through the view).
    pub screen: ScreenPoint,
    pub value: DataPoint,
    pub distance: f64,
}

/// Rendered geometry the host exposes for hit-testing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedGeometry {
    points: Vec<RenderedPoint>,
    series_count: usize,
}

impl RenderedGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one series and returns its index.
    pub fn push_series<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = (ScreenPoint, DataPoint)>,
    {
        let series = self.series_count;
        self.series_count += 1;
        self.points.extend(
            points
                .into_iter()
                .enumerate()
                .map(|(index, (layout, value))| RenderedPoint {
                    point: PointRef::new(series, index),
                    layout,
                    value,
                }),
        );
        series
    }

    #[must_use]
    pub fn with_series<I>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = (ScreenPoint, DataPoint)>,
    {
        self.push_series(points);
        self
    }

    #[must_use]
    pub fn points(&self) -> &[RenderedPoint] {
        &self.points
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn get(&self, point: PointRef) -> Option<&RenderedPoint> {
        self.points.iter().find(|candidate| candidate.point == point)
    }

    /// Finds the rendered point nearest to `cursor` within `max_distance` px.
    ///
    /// Points are projected through `view` first. Equal distances resolve to
    /// the lowest series index, then the lowest point index. Non-finite
    /// projections are skipped.
    #[must_use]
    pub fn nearest_within(
        &self,
        cursor: ScreenPoint,
        view: &ViewState,
        max_distance: f64,
    ) -> Option<PointHit> {
        if !cursor.is_finite() || !(max_distance >= 0.0) {
            return None;
        }
        let max_sq = max_distance * max_distance;

        #[cfg(feature = "parallel-hit-test")]
        if self.points.len() >= PARALLEL_HIT_TEST_MIN_POINTS {
            return self.nearest_within_parallel(cursor, view, max_sq);
        }

        self.points
            .iter()
            .filter_map(|rendered| candidate(rendered, cursor, view, max_sq))
            .min_by_key(|(key, _)| *key)
            .map(|(_, hit)| hit)
    }

    #[cfg(feature = "parallel-hit-test")]
    fn nearest_within_parallel(
        &self,
        cursor: ScreenPoint,
        view: &ViewState,
        max_sq: f64,
    ) -> Option<PointHit> {
        use rayon::prelude::*;

        self.points
            .par_iter()
            .filter_map(|rendered| candidate(rendered, cursor, view, max_sq))
            .min_by_key(|(key, _)| *key)
            .map(|(_, hit)| hit)
    }
}

type HitKey = (OrderedFloat<f64>, PointRef);

fn candidate(
    rendered: &RenderedPoint,
    cursor: ScreenPoint,
    view: &ViewState,
    max_sq: f64,
) -> Option<(HitKey, PointHit)> {
    let screen = view.project(rendered.layout);
    if !screen.is_finite() {
        return None;
    }
    let dist_sq = screen.distance_sq(cursor);
    if dist_sq > max_sq {
        return None;
    }
    Some((
        (OrderedFloat(dist_sq), rendered.point),
        PointHit {
            point: rendered.point,
            screen,
            value: rendered.value,
            distance: dist_sq.sqrt(),
        },
    ))
}
