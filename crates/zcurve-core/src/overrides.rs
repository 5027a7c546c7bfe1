//! 覆盖记录模型
//!
//! 每种曲线类型一个 [`OverrideSet`]，包含三组互不相关的记录：
//! - `additions`：需要新建的几何
//! - `removals`：需要从当前集合删除的标识
//! - `edits`：对已有元素的几何替换
//!
//! 记录在每次运行时都会重新应用，因此匹配不到任何元素的删除/编辑不是错误。
//!
//! 贝塞尔记录携带控制多边形（一条多段线），见 [`BezierOverride`]。

use crate::curve::{Arc, Bezier, Circle, Curve, Ellipse, Line, Polyline};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// 单条带标识的覆盖记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord<T> {
    pub id: Identity,
    pub value: T,
}

impl<T> OverrideRecord<T> {
    pub fn new(id: impl Into<Identity>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// 单一曲线类型的覆盖集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct OverrideSet<T> {
    #[serde(default)]
    pub additions: Vec<OverrideRecord<T>>,
    #[serde(default)]
    pub removals: Vec<Identity>,
    #[serde(default)]
    pub edits: Vec<OverrideRecord<T>>,
}

impl<T> Default for OverrideSet<T> {
    fn default() -> Self {
        Self {
            additions: Vec::new(),
            removals: Vec::new(),
            edits: Vec::new(),
        }
    }
}

impl<T> OverrideSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addition(mut self, id: impl Into<Identity>, value: T) -> Self {
        self.additions.push(OverrideRecord::new(id, value));
        self
    }

    pub fn with_removal(mut self, id: impl Into<Identity>) -> Self {
        self.removals.push(id.into());
        self
    }

    pub fn with_edit(mut self, id: impl Into<Identity>, value: T) -> Self {
        self.edits.push(OverrideRecord::new(id, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.edits.is_empty()
    }

    /// 记录总数
    pub fn record_count(&self) -> usize {
        self.additions.len() + self.removals.len() + self.edits.len()
    }
}

/// 贝塞尔覆盖值
///
/// 以多段线给出控制多边形，顶点按顺序成为贝塞尔控制点。
/// JSON 形式与多段线相同：`{"vertices": [...]}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BezierOverride(pub Polyline);

impl BezierOverride {
    pub fn polyline(&self) -> &Polyline {
        &self.0
    }
}

impl From<Polyline> for BezierOverride {
    fn from(polyline: Polyline) -> Self {
        Self(polyline)
    }
}

impl From<Bezier> for BezierOverride {
    fn from(bezier: Bezier) -> Self {
        Self(bezier.control_polygon())
    }
}

impl From<BezierOverride> for Curve {
    fn from(value: BezierOverride) -> Self {
        Curve::Bezier(Bezier::from(value.0))
    }
}

/// 一次运行的全部覆盖输入，按曲线类型分组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideInput {
    pub lines: OverrideSet<Line>,
    pub polylines: OverrideSet<Polyline>,
    pub beziers: OverrideSet<BezierOverride>,
    pub circles: OverrideSet<Circle>,
    pub arcs: OverrideSet<Arc>,
    pub ellipses: OverrideSet<Ellipse>,
}

impl OverrideInput {
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn record_count(&self) -> usize {
        self.lines.record_count()
            + self.polylines.record_count()
            + self.beziers.record_count()
            + self.circles.record_count()
            + self.arcs.record_count()
            + self.ellipses.record_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;

    #[test]
    fn test_builder_counts() {
        let line = Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0));
        let set = OverrideSet::new()
            .with_addition("a", line.clone())
            .with_removal("b")
            .with_edit("c", line);
        assert_eq!(set.record_count(), 3);
        assert!(!set.is_empty());
        assert!(OverrideSet::<Line>::new().is_empty());

        let input = OverrideInput {
            lines: set,
            ..Default::default()
        };
        assert_eq!(input.record_count(), 3);
    }

    #[test]
    fn test_override_set_from_json() {
        let set: OverrideSet<Line> = serde_json::from_str(
            r#"{
                "additions": [
                    {"id": "a", "value": {"start": [0.0, 0.0, 0.0], "end": [2.0, 0.0, 0.0]}}
                ],
                "removals": ["b"]
            }"#,
        )
        .unwrap();

        assert_eq!(set.additions.len(), 1);
        assert_eq!(set.additions[0].id.as_str(), "a");
        assert_eq!(set.additions[0].value.end, Point3::new(2.0, 0.0, 0.0));
        assert_eq!(set.removals, vec![Identity::from("b")]);
        assert!(set.edits.is_empty());

        let empty: OverrideSet<Ellipse> = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_bezier_override_from_polyline() {
        let set: OverrideSet<BezierOverride> = serde_json::from_str(
            r#"{
                "additions": [
                    {"id": "b", "value": {"vertices": [[0.0, 0.0, 0.0], [1.0, 2.0, 0.0], [2.0, 0.0, 0.0]]}}
                ]
            }"#,
        )
        .unwrap();

        let value = set.additions[0].value.clone();
        let polyline = value.polyline().clone();
        assert_eq!(polyline.vertex_count(), 3);

        match Curve::from(value) {
            Curve::Bezier(bezier) => {
                assert_eq!(bezier.control_polygon(), polyline);
                assert_eq!(bezier.point_at(0.5), Point3::new(1.0, 1.0, 0.0));
            }
            other => panic!("expected bezier, got {:?}", other.kind()),
        }
    }
}
