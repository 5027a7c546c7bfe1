//! 基准场景
//!
//! 每次运行都会生成的一组固定曲线，追加在覆盖合并的结果之后。
//! 标识固定为 `baseline/<名称>`，保证跨运行稳定。
//!
//! 椭圆的折线近似只作为参考几何输出，不参与标记放置。

use crate::curve::{Arc, Bezier, Circle, Ellipse, Line, Polyline};
use crate::math::Point3;
use crate::work::CurveWork;

/// 椭圆折线近似的默认分段数
pub const DEFAULT_ELLIPSE_DIVISIONS: usize = 40;

/// 基准场景
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineScene {
    /// 参与标记放置的元素
    pub marked: Vec<CurveWork>,
    /// 仅作参考输出的元素
    pub reference: Vec<CurveWork>,
}

impl BaselineScene {
    /// 生成基准场景
    pub fn generate(ellipse_divisions: usize) -> Self {
        let ellipse = Ellipse::new(Point3::new(25.0, 5.0, 0.0), 2.0, 4.0);

        let reference = vec![CurveWork::new(
            "baseline/ellipse-polyline",
            ellipse.to_polyline(ellipse_divisions),
        )];

        let marked = vec![
            CurveWork::new(
                "baseline/line",
                Line::new(Point3::new(45.0, 1.0, 0.0), Point3::new(45.0, 9.0, 0.0)),
            ),
            CurveWork::new("baseline/polyline", zigzag()),
            CurveWork::new(
                "baseline/bezier",
                Bezier::new(vec![
                    Point3::new(31.0, 5.0, 0.0),
                    Point3::new(35.0, 20.0, 0.0),
                    Point3::new(35.0, -10.0, 0.0),
                    Point3::new(39.0, 5.01, 0.0),
                ]),
            ),
            CurveWork::new(
                "baseline/circle",
                Circle::new(Point3::new(5.0, 5.0, 0.0), 4.0),
            ),
            CurveWork::new(
                "baseline/arc",
                Arc::from_degrees(Point3::new(15.0, 5.0, 0.0), 4.0, 0.0, 270.0),
            ),
            CurveWork::new("baseline/ellipse", ellipse),
        ];

        Self { marked, reference }
    }

    /// 所有元素（先放置元素后参考元素）
    pub fn all(&self) -> impl Iterator<Item = &CurveWork> {
        self.marked.iter().chain(self.reference.iter())
    }
}

impl Default for BaselineScene {
    fn default() -> Self {
        Self::generate(DEFAULT_ELLIPSE_DIVISIONS)
    }
}

fn zigzag() -> Polyline {
    Polyline::from_points(
        [
            (56.5, 9.0),
            (54.0, 6.5),
            (55.0, 6.5),
            (52.0, 4.0),
            (53.0, 4.0),
            (51.0, 1.0),
            (55.5, 4.5),
            (54.5, 4.5),
            (57.5, 7.0),
            (56.5, 7.0),
            (59.0, 9.0),
        ]
        .into_iter()
        .map(|(x, y)| Point3::new(x, y, 0.0)),
    )
}
