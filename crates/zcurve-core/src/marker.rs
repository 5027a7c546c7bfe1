//! 标记变换
//!
//! 标记是一个 `size × size` 的正方形沿 +Z 拉伸 `size` 高度得到的方块，
//! 局部坐标下底面中心位于原点。放置变换把方块几何中心 `(0, 0, size/2)`
//! 移到放置点，并让拉伸轴 +Z 对齐放置方向。

use crate::error::GeometryResult;
use crate::math::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use crate::placement::{orient, PlacementError, PlacementRequest};
use std::f64::consts::PI;

/// 构造标记放置变换
pub fn marker_transform(
    position: &Point3,
    direction: &Vector3,
    size: f64,
) -> GeometryResult<Isometry3<f64>> {
    let axis = orient(*direction)?;
    let rotation = UnitQuaternion::rotation_between_axis(&Vector3::z_axis(), &axis)
        // 反向平行时没有唯一旋转轴，绕 X 轴翻转
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));

    let placed = Isometry3::from_parts(Translation3::from(position.coords), rotation);
    Ok(placed * Translation3::new(0.0, 0.0, -size / 2.0))
}

impl PlacementRequest {
    /// 该请求对应的标记变换
    pub fn transform(&self) -> GeometryResult<Isometry3<f64>> {
        marker_transform(&self.position, &self.direction, self.scale)
    }

    /// 变换后的标记方块
    pub fn marker_box(&self) -> GeometryResult<MarkerBox> {
        Ok(MarkerBox {
            size: self.scale,
            transform: self.transform()?,
        })
    }
}

/// 已放置的标记方块
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerBox {
    pub size: f64,
    pub transform: Isometry3<f64>,
}

impl MarkerBox {
    /// 世界坐标下的几何中心
    pub fn center(&self) -> Point3 {
        self.transform * Point3::new(0.0, 0.0, self.size / 2.0)
    }

    /// 世界坐标下的 8 个角点（先底面后顶面，逆时针）
    pub fn corners(&self) -> [Point3; 8] {
        let h = self.size / 2.0;
        let local = [
            Point3::new(-h, -h, 0.0),
            Point3::new(h, -h, 0.0),
            Point3::new(h, h, 0.0),
            Point3::new(-h, h, 0.0),
            Point3::new(-h, -h, self.size),
            Point3::new(h, -h, self.size),
            Point3::new(h, h, self.size),
            Point3::new(-h, h, self.size),
        ];
        local.map(|p| self.transform * p)
    }
}

/// 标记实例化回调
///
/// 由外部的网格/渲染构建器实现，核心只负责提供放置请求和变换。
pub trait MarkerSink {
    fn place_marker(&mut self, request: &PlacementRequest, transform: &Isometry3<f64>);
}

impl<F> MarkerSink for F
where
    F: FnMut(&PlacementRequest, &Isometry3<f64>),
{
    fn place_marker(&mut self, request: &PlacementRequest, transform: &Isometry3<f64>) {
        self(request, transform)
    }
}

/// 把放置请求逐个交给回调，无法构造变换的请求被跳过并返回错误
pub fn instantiate_markers<S: MarkerSink>(
    requests: &[PlacementRequest],
    sink: &mut S,
) -> Vec<PlacementError> {
    let mut errors = Vec::new();
    for request in requests {
        match request.transform() {
            Ok(transform) => sink.place_marker(request, &transform),
            Err(source) => {
                tracing::warn!(identity = %request.identity, error = %source, "marker skipped");
                errors.push(PlacementError {
                    identity: request.identity.clone(),
                    anchor: request.anchor,
                    source,
                });
            }
        }
    }
    errors
}
