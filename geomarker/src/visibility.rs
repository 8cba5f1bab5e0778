//! The zoom-driven visibility state machine.
//!
//! At any zoom level either the raw markers or exactly one rule's cluster layer is visible.
//! The transition rule: among all rules whose threshold strictly exceeds the current zoom,
//! the one with the smallest such threshold wins (the finest-granularity rule that has not
//! yet expanded). At the exact boundary `zoom == threshold` the rule is not active.

use crate::marker::{ClusterBy, ClusteringOptions};

/// Which marker layer is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityState {
    /// Raw markers are visible; all cluster layers are hidden.
    NoClustering,
    /// Only the cluster layer of the rule with this key is visible. Raw markers are hidden,
    /// except `custom`-style ones which stay visible in every state.
    ClusteredBy(ClusterBy),
}

/// Runs the transition algorithm for the given zoom.
///
/// Returns `None` when clustering is absent or disabled: this is an explicit early exit, not
/// a transition — current visibility is left untouched by the caller.
pub fn resolve(zoom: f64, options: Option<&ClusteringOptions>) -> Option<VisibilityState> {
    let options = options?;
    if !options.enabled {
        return None;
    }

    let mut sorted = options.rules.clone();
    sorted.sort_by(|a, b| {
        b.threshold_zoom_level
            .partial_cmp(&a.threshold_zoom_level)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Later iterations have smaller-or-equal thresholds and overwrite earlier assignments,
    // so equal thresholds are won by the rule sorted last.
    let mut active = None;
    for rule in &sorted {
        if zoom < rule.threshold_zoom_level {
            active = Some(rule);
        }
    }

    Some(match active {
        Some(rule) => VisibilityState::ClusteredBy(rule.by),
        None => VisibilityState::NoClustering,
    })
}
