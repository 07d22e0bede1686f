use serde_json::Value;

use super::metadata::{self, Weight};
use crate::notebook::{Cell, Metadata};

pub const GRADING_METADATA_KEY: &str = "nbgrader";
const POINTS_FIELD: &str = "points";
/// Class of the points display a grading toolbar places on the cell.
pub const POINTS_DISPLAY_CLASS: &str = "nbgrader-points-input";

/// Sum of the strictly positive weights; zero, negative and non-numeric entries don't count.
/// Saturates at `i64::MAX`.
pub fn point_total(weights: &[Weight]) -> i64 {
    weights
        .iter()
        .flatten()
        .filter(|w| **w > 0)
        .fold(0i64, |acc, w| acc.saturating_add(*w))
}

/// The grading subsystem's points field, when the cell has one.
pub fn declared_points(metadata: &Metadata) -> Option<&Value> {
    metadata
        .get(GRADING_METADATA_KEY)
        .and_then(|grading| grading.get(POINTS_FIELD))
}

/// Recomputes the total from the current weights and mirrors it into the declared
/// points field and the points display, whichever of them exist.
pub fn recompute_and_apply(cell: &mut Cell) -> i64 {
    let total = point_total(&metadata::get_weights(cell.metadata()));

    if let Some(points) = cell
        .metadata_mut()
        .get_mut(GRADING_METADATA_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|grading| grading.get_mut(POINTS_FIELD))
    {
        *points = Value::from(total);
    }

    if let Some(display) = cell.element_mut().find_by_class_mut(POINTS_DISPLAY_CLASS) {
        display.set_attr("value", total.to_string());
    }

    tracing::trace!(cell = cell.id(), total, "points recomputed");
    total
}
