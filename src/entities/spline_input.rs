//! Spline records: host splines and procedural engine curves.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::component_input::SceneComponentSnapshot;
use super::context::{InputContext, Probe};
use super::snapshot::{InputSnapshot, SnapshotRecord};
use super::transform::Transform;

/// Curve primitive of a procedural curve component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveType {
    #[default]
    Polygon,
    Nurbs,
    Bezier,
    Points,
}

/// How the curve's points are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveMethod {
    #[default]
    CVs,
    Breakpoints,
    Freehand,
}

/// Host spline: closed flag, length and local-space control points.
#[derive(Clone, Debug, Default)]
pub struct SplineSnapshot {
    pub scene: SceneComponentSnapshot,
    pub point_count: usize,
    pub length: f32,
    pub closed: bool,
    pub control_points: Vec<Transform>,
}

impl SplineSnapshot {
    /// Resampling resolution is not cached, so this never reports drift.
    pub fn has_spline_component_changed(&self, _resolution: f32) -> bool {
        false
    }
}

#[inline]
fn same_point(cached: &Transform, live: &Transform) -> bool {
    cached.location() == live.location()
        && cached.rotator() == live.rotator()
        && cached.scale == live.scale
}

impl SnapshotRecord for SplineSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.scene.capture(probe);
        let host = probe.host();
        self.point_count = host.spline_point_count(probe.id);
        self.length = host.spline_length(probe.id);
        self.closed = host.spline_is_closed_loop(probe.id);
        self.control_points = (0..self.point_count)
            .map(|i| host.spline_point_transform(probe.id, i).unwrap_or_default())
            .collect();
    }

    // Transform queries keep the no-drift defaults.

    /// Closed flag, then point count, then each point in order.
    fn has_component_changed(&self, probe: &Probe<'_>) -> bool {
        let host = probe.host();
        if self.closed != host.spline_is_closed_loop(probe.id) {
            return true;
        }
        let count = host.spline_point_count(probe.id);
        if count != self.point_count {
            return true;
        }
        self.control_points.iter().take(count).enumerate().any(|(i, cached)| {
            let live = host.spline_point_transform(probe.id, i).unwrap_or_default();
            !same_point(cached, &live)
        })
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}

/// Procedural engine curve: only its curve settings are cached.
#[derive(Clone, Debug, Default)]
pub struct ProceduralSplineSnapshot {
    pub scene: SceneComponentSnapshot,
    pub curve_type: CurveType,
    pub curve_method: CurveMethod,
    pub reversed: bool,
}

impl ProceduralSplineSnapshot {
    fn reset_curve(&mut self) {
        self.curve_type = CurveType::default();
        self.curve_method = CurveMethod::default();
        self.reversed = false;
    }
}

impl SnapshotRecord for ProceduralSplineSnapshot {
    fn update(&mut self, probe: &Probe<'_>) {
        self.scene.capture(probe);
        if probe.is_pending_kill() {
            self.reset_curve();
            return;
        }
        match probe.host().curve_settings(probe.id) {
            Some((curve_type, curve_method)) => {
                self.curve_type = curve_type;
                self.curve_method = curve_method;
                self.reversed = false;
            }
            None => self.reset_curve(),
        }
    }

    fn source_lost(&mut self) {
        self.reset_curve();
    }

    fn has_actor_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.actor_transform_changed(probe)
    }

    fn has_component_transform_changed(&self, probe: &Probe<'_>) -> bool {
        self.scene.component_transform_changed(probe)
    }

    fn duplicate(&self, _ctx: &Arc<InputContext>, _owner: &str) -> InputSnapshot {
        self.clone().into()
    }
}

/// Total length of a polyline through `points`.
pub fn polyline_length(points: &[DVec3], closed: bool) -> f64 {
    let mut length: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if closed && points.len() > 1 {
        length += points[points.len() - 1].distance(points[0]);
    }
    length
}
