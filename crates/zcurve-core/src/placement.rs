//! 参数化放置引擎
//!
//! 给定元素集合和一个全局参数 `t ∈ [0, 1]`，为每个元素生成标记放置请求
//! （位置、方向、尺寸）：
//! - 线段/贝塞尔/圆/圆弧/椭圆：在 `t` 处放置一个主标记；
//! - 多段线：在 `t` 处和弧长中点各放置一个主标记，线段多于一条时，
//!   每条线段在 `t` 处和中点各放置一个子标记。
//!
//! 单个放置失败只跳过该放置并记录错误，不影响其余元素。

use crate::curve::{Curve, Line};
use crate::error::{GeometryError, GeometryResult};
use crate::identity::Identity;
use crate::math::{Point3, Unit, Vector3, EPSILON};
use crate::work::CurveWork;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 切线探测步长
pub const PROBE_EPSILON: f64 = 0.01;

/// 放置参数
///
/// 切线探测步长固定为 [`PROBE_EPSILON`]，不在配置中开放。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// 主标记尺寸
    pub size: f64,

    /// 多段线子标记尺寸
    pub sub_size: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            sub_size: 0.5,
        }
    }
}

/// 有限差分切线探测
///
/// 在 `t = 0` 时向前探测（`t + ε`），其余情况向后探测（`t - ε`）。
/// 探测点截断到 `[0, 1]`，`0 < t < ε` 时落在起点上。
/// 得到的方向总是指向参数增大的一侧。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentProbe {
    epsilon: f64,
}

impl Default for TangentProbe {
    fn default() -> Self {
        Self::new(PROBE_EPSILON)
    }
}

impl TangentProbe {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    /// 探测偏移量：`t == 0` 时为 `+ε`，否则为 `-ε`
    pub fn offset(&self, parameter: f64) -> f64 {
        if parameter == 0.0 {
            self.epsilon
        } else {
            -self.epsilon
        }
    }

    /// 曲线在归一化参数处的单位切线方向
    pub fn direction(&self, curve: &Curve, parameter: f64) -> GeometryResult<Unit<Vector3>> {
        let offset = self.offset(parameter);
        let here = curve.point_at_normalized(parameter)?;
        let probe = curve.point_at_normalized((parameter + offset).clamp(0.0, 1.0))?;

        let difference = here - probe;
        // 向前探测时差值指向参数减小方向，需要翻转
        let forward = if offset > 0.0 { -difference } else { difference };
        orient(forward)
    }
}

/// 归一化方向，长度接近零时报告退化错误
pub fn orient(direction: Vector3) -> GeometryResult<Unit<Vector3>> {
    Unit::try_new(direction, EPSILON).ok_or(GeometryError::DegenerateOrientation {
        length: direction.norm(),
    })
}

/// 放置锚点：放置请求由元素的哪个位置产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementAnchor {
    /// 全局参数处
    Parameter,
    /// 弧长中点
    Midpoint,
    /// 第 n 条线段的参数处
    SegmentParameter(usize),
    /// 第 n 条线段的中点
    SegmentMidpoint(usize),
}

impl fmt::Display for PlacementAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementAnchor::Parameter => write!(f, "parameter"),
            PlacementAnchor::Midpoint => write!(f, "midpoint"),
            PlacementAnchor::SegmentParameter(i) => write!(f, "segment {} parameter", i),
            PlacementAnchor::SegmentMidpoint(i) => write!(f, "segment {} midpoint", i),
        }
    }
}

/// 放置请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// 产生该请求的元素
    pub identity: Identity,
    pub anchor: PlacementAnchor,
    pub position: Point3,
    pub direction: Unit<Vector3>,
    pub scale: f64,
}

/// 单个放置的失败
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("placement '{anchor}' of '{identity}' skipped: {source}")]
pub struct PlacementError {
    pub identity: Identity,
    pub anchor: PlacementAnchor,
    pub source: GeometryError,
}

/// 一次放置计算的结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    pub placements: Vec<PlacementRequest>,
    pub errors: Vec<PlacementError>,
}

impl PlacementReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: PlacementReport) {
        self.placements.extend(other.placements);
        self.errors.extend(other.errors);
    }
}

/// 放置引擎
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: PlacementConfig,
    probe: TangentProbe,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            probe: TangentProbe::default(),
        }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// 计算所有元素的放置请求，输出顺序与输入元素顺序一致
    pub fn compute(&self, elements: &[CurveWork], parameter: f64) -> PlacementReport {
        let mut report = PlacementReport::default();
        for work in elements {
            report.merge(self.place_element(work, parameter));
        }
        self.log_report(elements.len(), &report);
        report
    }

    /// 并行版本，结果与 [`PlacementEngine::compute`] 完全相同
    pub fn compute_parallel(&self, elements: &[CurveWork], parameter: f64) -> PlacementReport {
        let per_element: Vec<PlacementReport> = elements
            .par_iter()
            .map(|work| self.place_element(work, parameter))
            .collect();

        let mut report = PlacementReport::default();
        for partial in per_element {
            report.merge(partial);
        }
        self.log_report(elements.len(), &report);
        report
    }

    /// 计算单个元素的放置请求
    pub fn place_element(&self, work: &CurveWork, parameter: f64) -> PlacementReport {
        let mut report = PlacementReport::default();

        if !parameter.is_finite() || !(0.0..=1.0).contains(&parameter) {
            report.errors.push(PlacementError {
                identity: work.identity.clone(),
                anchor: PlacementAnchor::Parameter,
                source: GeometryError::InvalidParameter(parameter),
            });
            return report;
        }

        self.place_on_curve(work, parameter, PlacementAnchor::Parameter, &mut report);

        if let Curve::Polyline(polyline) = &work.curve {
            self.place_on_curve(work, 0.5, PlacementAnchor::Midpoint, &mut report);

            let segments = polyline.segments();
            if segments.len() > 1 {
                for (index, segment) in segments.iter().enumerate() {
                    self.place_on_segment(work, segment, index, parameter, &mut report);
                }
            }
        }

        report
    }

    fn place_on_curve(
        &self,
        work: &CurveWork,
        parameter: f64,
        anchor: PlacementAnchor,
        report: &mut PlacementReport,
    ) {
        let placed = work
            .curve
            .point_at_normalized(parameter)
            .and_then(|position| {
                let direction = self.probe.direction(&work.curve, parameter)?;
                Ok((position, direction))
            });

        self.record(work, anchor, self.config.size, placed, report);
    }

    fn place_on_segment(
        &self,
        work: &CurveWork,
        segment: &Line,
        index: usize,
        parameter: f64,
        report: &mut PlacementReport,
    ) {
        let size = self.config.sub_size;
        let direction = orient(segment.end - segment.start);

        let at_parameter = direction
            .clone()
            .map(|d| (segment.point_at(parameter * segment.length()), d));
        self.record(work, PlacementAnchor::SegmentParameter(index), size, at_parameter, report);

        let at_mid = direction.map(|d| (segment.mid(), d));
        self.record(work, PlacementAnchor::SegmentMidpoint(index), size, at_mid, report);
    }

    fn record(
        &self,
        work: &CurveWork,
        anchor: PlacementAnchor,
        scale: f64,
        placed: GeometryResult<(Point3, Unit<Vector3>)>,
        report: &mut PlacementReport,
    ) {
        match placed {
            Ok((position, direction)) => report.placements.push(PlacementRequest {
                identity: work.identity.clone(),
                anchor,
                position,
                direction,
                scale,
            }),
            Err(source) => {
                tracing::warn!(
                    identity = %work.identity,
                    kind = work.curve.type_name(),
                    %anchor,
                    error = %source,
                    "placement skipped"
                );
                report.errors.push(PlacementError {
                    identity: work.identity.clone(),
                    anchor,
                    source,
                });
            }
        }
    }

    fn log_report(&self, element_count: usize, report: &PlacementReport) {
        tracing::debug!(
            elements = element_count,
            placements = report.placements.len(),
            errors = report.errors.len(),
            "computed placements"
        );
    }
}

/// 使用默认配置计算放置请求
pub fn compute_placements(elements: &[CurveWork], parameter: f64) -> PlacementReport {
    PlacementEngine::default().compute(elements, parameter)
}
