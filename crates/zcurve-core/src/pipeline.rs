//! 单次运行流程
//!
//! 覆盖合并 → 追加基准场景 → 标记放置。整个过程同步完成，
//! 除外部传入的上一次元素快照外没有跨运行的状态。

use crate::baseline::{BaselineScene, DEFAULT_ELLIPSE_DIVISIONS};
use crate::overrides::OverrideInput;
use crate::placement::{PlacementConfig, PlacementEngine, PlacementError, PlacementRequest};
use crate::reconcile::reconcile_scene;
use crate::work::CurveWork;
use serde::{Deserialize, Serialize};

/// 运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub placement: PlacementConfig,

    /// 是否追加基准场景
    pub include_baseline: bool,

    /// 椭圆折线近似分段数
    pub ellipse_divisions: usize,

    /// 是否并行计算放置
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            include_baseline: true,
            ellipse_divisions: DEFAULT_ELLIPSE_DIVISIONS,
            parallel: false,
        }
    }
}

/// 运行输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInput {
    #[serde(default)]
    pub overrides: OverrideInput,

    /// 全局放置参数，`[0, 1]`
    #[serde(default)]
    pub parameter: f64,

    #[serde(default)]
    pub config: RunConfig,
}

impl RunInput {
    pub fn new(overrides: OverrideInput, parameter: f64) -> Self {
        Self {
            overrides,
            parameter,
            config: RunConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }
}

/// 运行输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutput {
    /// 覆盖合并得到的元素，可作为下一次运行的 `previous`
    pub reconciled: Vec<CurveWork>,

    /// 基准场景中参与放置的元素
    pub baseline: Vec<CurveWork>,

    /// 仅作参考的元素
    pub reference: Vec<CurveWork>,

    pub placements: Vec<PlacementRequest>,
    pub errors: Vec<PlacementError>,
}

impl RunOutput {
    /// 场景中的全部元素
    pub fn elements(&self) -> impl Iterator<Item = &CurveWork> {
        self.reconciled
            .iter()
            .chain(self.baseline.iter())
            .chain(self.reference.iter())
    }

    pub fn element_count(&self) -> usize {
        self.reconciled.len() + self.baseline.len() + self.reference.len()
    }
}

/// 执行一次运行
///
/// 放置顺序：先是全部合并元素，按 Line、Polyline、Bezier、Circle、Arc、Ellipse
/// 分组；然后是基准场景元素，按 [`BaselineScene`] 中的顺序。
/// 参考元素不参与放置。
pub fn run(input: &RunInput, previous: Vec<CurveWork>) -> RunOutput {
    let config = &input.config;
    let reconciled = reconcile_scene(&input.overrides, previous);

    let (baseline, reference) = if config.include_baseline {
        let scene = BaselineScene::generate(config.ellipse_divisions);
        (scene.marked, scene.reference)
    } else {
        (Vec::new(), Vec::new())
    };

    let marked: Vec<CurveWork> = reconciled.iter().chain(baseline.iter()).cloned().collect();
    let engine = PlacementEngine::new(config.placement.clone());
    let report = if config.parallel {
        engine.compute_parallel(&marked, input.parameter)
    } else {
        engine.compute(&marked, input.parameter)
    };

    tracing::info!(
        overrides = input.overrides.record_count(),
        elements = reconciled.len() + baseline.len() + reference.len(),
        placements = report.placements.len(),
        skipped = report.errors.len(),
        parameter = input.parameter,
        "run complete"
    );

    RunOutput {
        reconciled,
        baseline,
        reference,
        placements: report.placements,
        errors: report.errors,
    }
}
