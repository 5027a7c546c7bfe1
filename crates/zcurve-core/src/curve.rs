//! 参数曲线定义
//!
//! 支持的曲线类型：
//! - 线段 (Line)：按弧长参数化，`u ∈ [0, length]`
//! - 多段线 (Polyline)：按顶点索引参数化，`u ∈ [0, vertex_count - 1]`
//! - 贝塞尔曲线 (Bezier)：按定义域参数化，`u ∈ [0, 1]`
//! - 圆 (Circle)、椭圆 (Ellipse)：按角度参数化，`u ∈ [0, 2π]`
//! - 圆弧 (Arc)：按角度参数化，`u ∈ [domain.min, domain.max]`
//!
//! 放置引擎只使用归一化参数 `t ∈ [0, 1]`，由 [`Curve::native_parameter`]
//! 换算到各曲线的原生定义域。

use crate::error::{GeometryError, GeometryResult};
use crate::math::{lerp_point, Point3, Vector3, EPSILON};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// 贝塞尔曲线估算长度时的采样数
const BEZIER_LENGTH_SAMPLES: usize = 64;

/// 曲线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    Line,
    Polyline,
    Bezier,
    Circle,
    Arc,
    Ellipse,
}

impl CurveKind {
    /// 所有类型，按覆盖合并的处理顺序排列
    pub const ALL: [CurveKind; 6] = [
        CurveKind::Line,
        CurveKind::Polyline,
        CurveKind::Bezier,
        CurveKind::Circle,
        CurveKind::Arc,
        CurveKind::Ellipse,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::Line => "Line",
            CurveKind::Polyline => "Polyline",
            CurveKind::Bezier => "Bezier",
            CurveKind::Circle => "Circle",
            CurveKind::Arc => "Arc",
            CurveKind::Ellipse => "Ellipse",
        }
    }
}

/// 参数区间
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// 将 `t ∈ [0, 1]` 线性映射到区间内
    pub fn lerp(&self, t: f64) -> f64 {
        t * self.span() + self.min
    }
}

/// 曲线枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Curve {
    Line(Line),
    Polyline(Polyline),
    Bezier(Bezier),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
}

impl Curve {
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Line(_) => CurveKind::Line,
            Curve::Polyline(_) => CurveKind::Polyline,
            Curve::Bezier(_) => CurveKind::Bezier,
            Curve::Circle(_) => CurveKind::Circle,
            Curve::Arc(_) => CurveKind::Arc,
            Curve::Ellipse(_) => CurveKind::Ellipse,
        }
    }

    /// 获取曲线的类型名称
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// 在原生定义域参数 `u` 处取点
    pub fn point_at(&self, u: f64) -> Point3 {
        match self {
            Curve::Line(l) => l.point_at(u),
            Curve::Polyline(pl) => pl.point_at(u),
            Curve::Bezier(b) => b.point_at(u),
            Curve::Circle(c) => c.point_at(u),
            Curve::Arc(a) => a.point_at(u),
            Curve::Ellipse(e) => e.point_at(u),
        }
    }

    /// 曲线长度
    pub fn length(&self) -> f64 {
        match self {
            Curve::Line(l) => l.length(),
            Curve::Polyline(pl) => pl.length(),
            Curve::Bezier(b) => b.length(),
            Curve::Circle(c) => c.circumference(),
            Curve::Arc(a) => a.length(),
            Curve::Ellipse(e) => e.perimeter(),
        }
    }

    /// 沿长度方向的线段列表（仅线段和多段线有）
    pub fn segments(&self) -> Vec<Line> {
        match self {
            Curve::Line(l) => vec![l.clone()],
            Curve::Polyline(pl) => pl.segments(),
            _ => Vec::new(),
        }
    }

    /// 原生参数定义域
    pub fn native_domain(&self) -> Domain {
        match self {
            Curve::Line(l) => Domain::new(0.0, l.length()),
            Curve::Polyline(pl) => {
                Domain::new(0.0, pl.vertex_count().saturating_sub(1) as f64)
            }
            Curve::Bezier(_) => Domain::new(0.0, 1.0),
            Curve::Circle(_) | Curve::Ellipse(_) => Domain::new(0.0, TAU),
            Curve::Arc(a) => a.domain,
        }
    }

    /// 将归一化参数 `t ∈ [0, 1]` 换算为原生参数
    ///
    /// 多段线使用弧长重参数化，其余类型为直接的线性缩放。
    pub fn native_parameter(&self, t: f64) -> GeometryResult<f64> {
        if !t.is_finite() || t < -EPSILON || t > 1.0 + EPSILON {
            return Err(GeometryError::InvalidParameter(t));
        }
        let t = t.clamp(0.0, 1.0);

        match self {
            Curve::Line(l) => Ok(t * l.length()),
            Curve::Polyline(pl) => pl.parameter_at_length_fraction(t),
            Curve::Bezier(_) => Ok(t),
            Curve::Circle(_) | Curve::Ellipse(_) => Ok(t * TAU),
            Curve::Arc(a) => Ok(a.domain.lerp(t)),
        }
    }

    /// 在归一化参数处取点
    pub fn point_at_normalized(&self, t: f64) -> GeometryResult<Point3> {
        Ok(self.point_at(self.native_parameter(t)?))
    }
}

impl From<Line> for Curve {
    fn from(line: Line) -> Self {
        Curve::Line(line)
    }
}

impl From<Polyline> for Curve {
    fn from(polyline: Polyline) -> Self {
        Curve::Polyline(polyline)
    }
}

impl From<Bezier> for Curve {
    fn from(bezier: Bezier) -> Self {
        Curve::Bezier(bezier)
    }
}

impl From<Circle> for Curve {
    fn from(circle: Circle) -> Self {
        Curve::Circle(circle)
    }
}

impl From<Arc> for Curve {
    fn from(arc: Arc) -> Self {
        Curve::Arc(arc)
    }
}

impl From<Ellipse> for Curve {
    fn from(ellipse: Ellipse) -> Self {
        Curve::Ellipse(ellipse)
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3,
    pub end: Point3,
}

impl Line {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 计算线段方向向量（单位向量），退化线段返回零向量
    pub fn direction(&self) -> Vector3 {
        (self.end - self.start)
            .try_normalize(EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// 计算线段中点
    pub fn mid(&self) -> Point3 {
        lerp_point(&self.start, &self.end, 0.5)
    }

    /// 沿线段距起点 `distance` 处的点
    pub fn point_at(&self, distance: f64) -> Point3 {
        self.start + self.direction() * distance
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<Point3>,
}

impl Polyline {
    pub fn new(vertices: Vec<Point3>) -> Self {
        Self { vertices }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Self {
        Self {
            vertices: points.into_iter().collect(),
        }
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn segments(&self) -> Vec<Line> {
        self.vertices
            .windows(2)
            .map(|pair| Line::new(pair[0], pair[1]))
            .collect()
    }

    /// 计算总长度（各线段长度之和）
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// 按顶点索引取点，小数部分在 `floor(u)..floor(u)+1` 线段内插值
    ///
    /// 空多段线返回原点，单顶点多段线返回该顶点。这两种情况没有线段，
    /// 经 [`Curve::point_at_normalized`] 取点时会先报告映射错误。
    pub fn point_at(&self, u: f64) -> Point3 {
        match self.vertices.len() {
            0 => Point3::origin(),
            1 => self.vertices[0],
            n => {
                let u = u.clamp(0.0, (n - 1) as f64);
                let index = (u.floor() as usize).min(n - 2);
                let fraction = u - index as f64;
                lerp_point(&self.vertices[index], &self.vertices[index + 1], fraction)
            }
        }
    }

    /// 弧长重参数化：长度比例 `t` 对应的顶点索引参数
    ///
    /// 逐段累加长度，目标长度落在第 `i` 段时返回
    /// `i + (目标 - 之前累计) / 段长`；零长度线段直接跳过。
    /// 走完所有线段仍未超过目标时返回最后一个顶点索引。
    pub fn parameter_at_length_fraction(&self, t: f64) -> GeometryResult<f64> {
        let segments = self.segments();
        if segments.is_empty() {
            return Err(GeometryError::DomainMapping {
                kind: CurveKind::Polyline.name(),
                reason: format!("no segments ({} vertices)", self.vertices.len()),
            });
        }

        let total = self.length();
        if total <= EPSILON {
            return Err(GeometryError::DomainMapping {
                kind: CurveKind::Polyline.name(),
                reason: "total length is zero".to_string(),
            });
        }

        let target = t * total;
        let mut accumulated = 0.0;
        for (index, segment) in segments.iter().enumerate() {
            let length = segment.length();
            if length <= EPSILON {
                continue;
            }
            if accumulated + length > target {
                return Ok(index as f64 + (target - accumulated) / length);
            }
            accumulated += length;
        }

        Ok(segments.len() as f64)
    }
}

/// 贝塞尔曲线（任意阶，由控制点定义）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bezier {
    pub control_points: Vec<Point3>,
}

impl Bezier {
    pub fn new(control_points: Vec<Point3>) -> Self {
        Self { control_points }
    }

    /// 以多段线顶点作为控制点创建
    pub fn from_polyline(polyline: &Polyline) -> Self {
        Self::new(polyline.vertices.clone())
    }

    /// 控制多边形
    pub fn control_polygon(&self) -> Polyline {
        Polyline::new(self.control_points.clone())
    }

    pub fn start(&self) -> Option<Point3> {
        self.control_points.first().copied()
    }

    pub fn end(&self) -> Option<Point3> {
        self.control_points.last().copied()
    }

    /// de Casteljau 求值，`u ∈ [0, 1]`
    pub fn point_at(&self, u: f64) -> Point3 {
        let mut points = self.control_points.clone();
        if points.is_empty() {
            return Point3::origin();
        }
        for level in (1..points.len()).rev() {
            for i in 0..level {
                points[i] = lerp_point(&points[i], &points[i + 1], u);
            }
        }
        points[0]
    }

    /// 折线采样估算长度
    pub fn length(&self) -> f64 {
        let samples = (0..=BEZIER_LENGTH_SAMPLES)
            .map(|i| self.point_at(i as f64 / BEZIER_LENGTH_SAMPLES as f64));
        Polyline::from_points(samples).length()
    }
}

impl From<Polyline> for Bezier {
    fn from(polyline: Polyline) -> Self {
        Self::new(polyline.vertices)
    }
}

/// 圆（位于 z = center.z 的水平面内）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point3,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// 计算周长
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// 获取圆上指定角度（弧度）的点
    pub fn point_at(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }
}

/// 圆弧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point3,
    pub radius: f64,
    /// 角度区间（弧度）
    pub domain: Domain,
}

impl Arc {
    pub fn new(center: Point3, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            domain: Domain::new(start_angle, end_angle),
        }
    }

    /// 以角度制的起止角创建
    pub fn from_degrees(center: Point3, radius: f64, start_degrees: f64, end_degrees: f64) -> Self {
        Self::new(
            center,
            radius,
            start_degrees.to_radians(),
            end_degrees.to_radians(),
        )
    }

    /// 扫过的角度
    pub fn sweep_angle(&self) -> f64 {
        self.domain.span()
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle().abs() * self.radius
    }

    pub fn point_at(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.center.z,
        )
    }

    pub fn start_point(&self) -> Point3 {
        self.point_at(self.domain.min)
    }

    pub fn end_point(&self) -> Point3 {
        self.point_at(self.domain.max)
    }
}

/// 椭圆，`major_axis` / `minor_axis` 分别为 X / Y 方向的半轴长
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point3,
    pub major_axis: f64,
    pub minor_axis: f64,
}

impl Ellipse {
    pub fn new(center: Point3, major_axis: f64, minor_axis: f64) -> Self {
        Self {
            center,
            major_axis,
            minor_axis,
        }
    }

    pub fn point_at(&self, angle: f64) -> Point3 {
        Point3::new(
            self.center.x + self.major_axis * angle.cos(),
            self.center.y + self.minor_axis * angle.sin(),
            self.center.z,
        )
    }

    /// Ramanujan 周长近似
    pub fn perimeter(&self) -> f64 {
        let a = self.major_axis.abs();
        let b = self.minor_axis.abs();
        PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
    }

    /// 用 `divisions` 段折线近似（首尾点重合）
    pub fn to_polyline(&self, divisions: usize) -> Polyline {
        let divisions = divisions.max(1);
        Polyline::from_points(
            (0..=divisions).map(|i| self.point_at(i as f64 / divisions as f64 * TAU)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point3, b: Point3) {
        assert!((a - b).norm() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_line_length_and_mapping() {
        let line = Curve::Line(Line::new(Point3::origin(), Point3::new(3.0, 4.0, 0.0)));
        assert!((line.length() - 5.0).abs() < EPSILON);
        assert_eq!(line.native_parameter(0.0).unwrap(), 0.0);
        assert_eq!(line.native_parameter(1.0).unwrap(), 5.0);
        assert_point_eq(line.point_at_normalized(0.5).unwrap(), Point3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_polyline_point_at_vertex_index() {
        let pl = Polyline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
        ]);
        assert_point_eq(pl.point_at(0.5), Point3::new(5.0, 0.0, 0.0));
        assert_point_eq(pl.point_at(1.5), Point3::new(10.0, 5.0, 0.0));
        assert_point_eq(pl.point_at(2.0), Point3::new(10.0, 10.0, 0.0));
        assert_point_eq(pl.point_at(7.0), Point3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_polyline_point_at_without_segments() {
        let empty = Polyline::new(Vec::new());
        assert_point_eq(empty.point_at(0.0), Point3::origin());
        assert_point_eq(empty.point_at(3.5), Point3::origin());

        let single = Polyline::from_points([Point3::new(2.0, -1.0, 4.0)]);
        assert_point_eq(single.point_at(0.7), Point3::new(2.0, -1.0, 4.0));

        // 采样接口不会把这两种情况当作有效取点
        for pl in [empty, single] {
            assert!(matches!(
                Curve::Polyline(pl).point_at_normalized(0.5),
                Err(GeometryError::DomainMapping { .. })
            ));
        }
    }

    #[test]
    fn test_polyline_arc_length_mapping_collinear() {
        let pl = Polyline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ]);
        assert_eq!(pl.parameter_at_length_fraction(0.5).unwrap(), 1.0);
        assert_eq!(pl.parameter_at_length_fraction(1.0).unwrap(), 2.0);
        assert_eq!(pl.parameter_at_length_fraction(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_polyline_arc_length_uneven_segments() {
        // 第一段长 2，第二段长 8
        let pl = Polyline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 8.0, 0.0),
        ]);
        let u = pl.parameter_at_length_fraction(0.6).unwrap();
        assert!((u - 1.5).abs() < EPSILON);
        assert_point_eq(pl.point_at(u), Point3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn test_polyline_arc_length_monotonic() {
        let pl = Polyline::from_points([
            Point3::new(56.5, 9.0, 0.0),
            Point3::new(54.0, 6.5, 0.0),
            Point3::new(55.0, 6.5, 0.0),
            Point3::new(52.0, 4.0, 0.0),
            Point3::new(53.0, 4.0, 0.0),
            Point3::new(51.0, 1.0, 0.0),
        ]);
        let mut last = -1.0;
        for i in 0..=100 {
            let u = pl.parameter_at_length_fraction(i as f64 / 100.0).unwrap();
            assert!(u >= last, "u={} dropped below {}", u, last);
            last = u;
        }
        assert_eq!(last, 5.0);
    }

    #[test]
    fn test_polyline_zero_length_segments_skipped() {
        let pl = Polyline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ]);
        let u = pl.parameter_at_length_fraction(0.25).unwrap();
        assert!((u - 1.25).abs() < EPSILON);
        assert!(u.is_finite());
    }

    #[test]
    fn test_polyline_degenerate_mapping_errors() {
        let single = Polyline::from_points([Point3::origin()]);
        assert!(matches!(
            single.parameter_at_length_fraction(0.5),
            Err(GeometryError::DomainMapping { .. })
        ));

        let collapsed = Polyline::from_points([Point3::origin(), Point3::origin()]);
        assert!(matches!(
            collapsed.parameter_at_length_fraction(0.5),
            Err(GeometryError::DomainMapping { .. })
        ));
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let bezier = Bezier::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);
        assert_point_eq(bezier.point_at(0.0), Point3::new(0.0, 0.0, 0.0));
        assert_point_eq(bezier.point_at(1.0), Point3::new(2.0, 0.0, 0.0));
        // 二次贝塞尔中点 = 0.25*P0 + 0.5*P1 + 0.25*P2
        assert_point_eq(bezier.point_at(0.5), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_circle_and_ellipse_angle_mapping() {
        let circle = Curve::Circle(Circle::new(Point3::new(5.0, 5.0, 0.0), 4.0));
        assert_point_eq(circle.point_at_normalized(0.25).unwrap(), Point3::new(5.0, 9.0, 0.0));

        let ellipse = Curve::Ellipse(Ellipse::new(Point3::new(25.0, 5.0, 0.0), 2.0, 4.0));
        assert_point_eq(ellipse.point_at_normalized(0.0).unwrap(), Point3::new(27.0, 5.0, 0.0));
        assert_point_eq(ellipse.point_at_normalized(0.25).unwrap(), Point3::new(25.0, 9.0, 0.0));
    }

    #[test]
    fn test_arc_domain_mapping() {
        let arc = Arc::from_degrees(Point3::origin(), 2.0, 90.0, 270.0);
        let curve = Curve::Arc(arc.clone());
        let u = curve.native_parameter(0.5).unwrap();
        assert!((u - PI).abs() < EPSILON);
        assert_point_eq(curve.point_at(u), Point3::new(-2.0, 0.0, 0.0));
        assert_point_eq(arc.start_point(), Point3::new(0.0, 2.0, 0.0));
        assert!((arc.length() - 2.0 * PI).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_parameter_rejected() {
        let line = Curve::Line(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)));
        assert!(matches!(line.native_parameter(f64::NAN), Err(GeometryError::InvalidParameter(_))));
        assert!(matches!(line.native_parameter(1.5), Err(GeometryError::InvalidParameter(_))));
    }

    #[test]
    fn test_segments_per_kind() {
        let pl = Curve::Polyline(Polyline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]));
        assert_eq!(pl.segments().len(), 3);
        assert!((pl.length() - 3.0).abs() < EPSILON);

        let line = Curve::Line(Line::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(line.segments().len(), 1);

        let circle = Curve::Circle(Circle::new(Point3::origin(), 1.0));
        assert!(circle.segments().is_empty());
    }

    #[test]
    fn test_ellipse_to_polyline_closes() {
        let ellipse = Ellipse::new(Point3::new(25.0, 5.0, 0.0), 2.0, 4.0);
        let pl = ellipse.to_polyline(40);
        assert_eq!(pl.vertex_count(), 41);
        assert_point_eq(pl.vertices[0], pl.vertices[40]);
        // 近似周长应接近真实周长
        assert!((pl.length() - ellipse.perimeter()).abs() < 0.05);
    }
}
