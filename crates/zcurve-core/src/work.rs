//! 曲线元素
//!
//! `CurveWork` 把一条曲线几何和它的稳定标识绑定在一起。
//! 编辑采用值语义：[`CurveWork::with_curve`] 返回新值，标识保持不变。

use crate::curve::{Curve, CurveKind};
use crate::identity::Identity;
use crate::overrides::OverrideRecord;
use crate::reconcile::OverrideTarget;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveWork {
    pub identity: Identity,
    pub curve: Curve,
}

impl CurveWork {
    pub fn new(identity: impl Into<Identity>, curve: impl Into<Curve>) -> Self {
        Self {
            identity: identity.into(),
            curve: curve.into(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn kind(&self) -> CurveKind {
        self.curve.kind()
    }

    /// 按标识字符串匹配
    pub fn matches(&self, identity: &Identity) -> bool {
        self.identity == *identity
    }

    /// 替换几何，保留标识
    pub fn with_curve(&self, curve: impl Into<Curve>) -> Self {
        Self {
            identity: self.identity.clone(),
            curve: curve.into(),
        }
    }
}

impl<T> OverrideTarget<T> for CurveWork
where
    T: Clone + Into<Curve>,
{
    fn from_addition(record: &OverrideRecord<T>) -> Self {
        CurveWork::new(record.id.clone(), record.value.clone())
    }

    fn matches(&self, identity: &Identity) -> bool {
        CurveWork::matches(self, identity)
    }

    fn updated(&self, edit: &OverrideRecord<T>) -> Self {
        self.with_curve(edit.value.clone())
    }
}
