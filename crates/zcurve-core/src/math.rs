//! 数学类型与常量
//!
//! 统一使用 nalgebra 的双精度三维类型。

pub use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion};

/// 三维点
pub type Point3 = nalgebra::Point3<f64>;

/// 三维向量
pub type Vector3 = nalgebra::Vector3<f64>;

/// 几何比较容差
pub const EPSILON: f64 = 1e-10;

/// 两点之间线性插值
#[inline]
pub fn lerp_point(a: &Point3, b: &Point3, t: f64) -> Point3 {
    a + (b - a) * t
}
