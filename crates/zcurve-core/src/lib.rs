//! ZCurve 核心引擎
//!
//! 维护一组参数曲线元素，并沿曲线放置朝向一致的代理标记。
//!
//! # 架构设计
//!
//! - `Identity` / `OverrideSet`: 以稳定标识描述的新增、删除、编辑记录
//! - `Curve`: 六种曲线的统一采样接口（归一化参数 → 原生参数）
//! - `reconcile`: 把覆盖记录合并到上一次的元素集合
//! - `placement`: 根据全局参数生成标记放置请求
//!
//! # 示例
//!
//! ```rust
//! use zcurve_core::prelude::*;
//!
//! let line = Line::new(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
//! let works = vec![CurveWork::new("a", line)];
//!
//! let report = compute_placements(&works, 0.25);
//! assert_eq!(report.placements.len(), 1);
//! ```

pub mod baseline;
pub mod curve;
pub mod error;
pub mod identity;
pub mod marker;
pub mod math;
pub mod overrides;
pub mod pipeline;
pub mod placement;
pub mod reconcile;
pub mod work;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::baseline::BaselineScene;
    pub use crate::curve::{Arc, Bezier, Circle, Curve, CurveKind, Domain, Ellipse, Line, Polyline};
    pub use crate::error::{GeometryError, GeometryResult};
    pub use crate::identity::Identity;
    pub use crate::marker::{instantiate_markers, marker_transform, MarkerBox, MarkerSink};
    pub use crate::math::{Point3, Vector3, EPSILON};
    pub use crate::overrides::{BezierOverride, OverrideInput, OverrideRecord, OverrideSet};
    pub use crate::pipeline::{run, RunConfig, RunInput, RunOutput};
    pub use crate::placement::{
        compute_placements, PlacementAnchor, PlacementConfig, PlacementEngine, PlacementError,
        PlacementReport, PlacementRequest, TangentProbe,
    };
    pub use crate::reconcile::{reconcile, reconcile_scene, reconcile_targets, OverrideTarget};
    pub use crate::work::CurveWork;
}
