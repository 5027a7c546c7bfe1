//! 覆盖合并引擎
//!
//! 把一组覆盖记录应用到上一次的元素集合上，得到本次的元素集合：
//!
//! 1. 从 `previous` 开始；
//! 2. 删除：移除与任一删除标识匹配的所有元素；
//! 3. 编辑：在删除后的集合中找到第一个匹配的元素并整体替换；找不到时忽略；
//! 4. 新增：按输入顺序追加，不与已有元素去重。
//!
//! 删除只作用于上一次的元素，因此同一轮中新增又删除同一标识时，新增的元素会保留。
//! 整个过程不会失败，匹配不到的记录只记录日志。

use crate::curve::CurveKind;
use crate::identity::Identity;
use crate::overrides::{OverrideInput, OverrideRecord, OverrideSet};
use crate::work::CurveWork;

/// 可被覆盖记录创建、匹配和更新的元素
pub trait OverrideTarget<T>: Sized {
    /// 由新增记录构造元素，元素标识取自记录
    fn from_addition(record: &OverrideRecord<T>) -> Self;

    /// 是否与给定标识匹配
    fn matches(&self, identity: &Identity) -> bool;

    /// 应用编辑后的新值，标识不变
    fn updated(&self, edit: &OverrideRecord<T>) -> Self;
}

/// 合并统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub removed: usize,
    pub unmatched_removals: usize,
    pub edited: usize,
    pub unmatched_edits: usize,
    pub added: usize,
}

/// 通用合并算法
///
/// 输出顺序：保留下来的旧元素（含编辑后的替换），然后是按输入顺序的新增元素。
pub fn reconcile<E, T, F, M, U>(
    overrides: &OverrideSet<T>,
    previous: Vec<E>,
    factory: F,
    match_fn: M,
    update_fn: U,
) -> Vec<E>
where
    F: FnMut(&OverrideRecord<T>) -> E,
    M: FnMut(&E, &Identity) -> bool,
    U: FnMut(&E, &OverrideRecord<T>) -> E,
{
    reconcile_with_stats(overrides, previous, factory, match_fn, update_fn).0
}

/// 同 [`reconcile`]，并返回统计信息
pub fn reconcile_with_stats<E, T, F, M, U>(
    overrides: &OverrideSet<T>,
    previous: Vec<E>,
    mut factory: F,
    mut match_fn: M,
    mut update_fn: U,
) -> (Vec<E>, ReconcileStats)
where
    F: FnMut(&OverrideRecord<T>) -> E,
    M: FnMut(&E, &Identity) -> bool,
    U: FnMut(&E, &OverrideRecord<T>) -> E,
{
    let mut elements = previous;
    let mut stats = ReconcileStats::default();

    for identity in &overrides.removals {
        let before = elements.len();
        elements.retain(|element| !match_fn(element, identity));
        let removed = before - elements.len();
        if removed == 0 {
            tracing::debug!(%identity, "removal matched no element, ignored");
            stats.unmatched_removals += 1;
        }
        stats.removed += removed;
    }

    for edit in &overrides.edits {
        let positions: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter(|(_, element)| match_fn(*element, &edit.id))
            .map(|(index, _)| index)
            .collect();

        match positions.first() {
            Some(&index) => {
                if positions.len() > 1 {
                    tracing::warn!(
                        identity = %edit.id,
                        matches = positions.len(),
                        "edit matched several elements, only the first is updated"
                    );
                }
                let replacement = update_fn(&elements[index], edit);
                elements[index] = replacement;
                stats.edited += 1;
            }
            None => {
                tracing::debug!(identity = %edit.id, "edit matched no element, ignored");
                stats.unmatched_edits += 1;
            }
        }
    }

    for addition in &overrides.additions {
        elements.push(factory(addition));
        stats.added += 1;
    }

    tracing::debug!(
        removed = stats.removed,
        edited = stats.edited,
        added = stats.added,
        total = elements.len(),
        "reconciled override set"
    );

    (elements, stats)
}

/// 使用 [`OverrideTarget`] 实现的合并
pub fn reconcile_targets<E, T>(overrides: &OverrideSet<T>, previous: Vec<E>) -> Vec<E>
where
    E: OverrideTarget<T>,
{
    reconcile(
        overrides,
        previous,
        E::from_addition,
        E::matches,
        E::updated,
    )
}

/// 按曲线类型分别合并整个场景
///
/// `previous` 按类型拆分（保持各自相对顺序），每种类型用自己的覆盖集合合并，
/// 结果按 [`CurveKind::ALL`] 的顺序拼接。
pub fn reconcile_scene(input: &OverrideInput, previous: Vec<CurveWork>) -> Vec<CurveWork> {
    let mut by_kind: Vec<(CurveKind, Vec<CurveWork>)> =
        CurveKind::ALL.iter().map(|kind| (*kind, Vec::new())).collect();
    for work in previous {
        if let Some((_, bucket)) = by_kind.iter_mut().find(|(kind, _)| *kind == work.kind()) {
            bucket.push(work);
        }
    }

    let mut result = Vec::new();
    for (kind, bucket) in by_kind {
        let reconciled = match kind {
            CurveKind::Line => reconcile_targets(&input.lines, bucket),
            CurveKind::Polyline => reconcile_targets(&input.polylines, bucket),
            CurveKind::Bezier => reconcile_targets(&input.beziers, bucket),
            CurveKind::Circle => reconcile_targets(&input.circles, bucket),
            CurveKind::Arc => reconcile_targets(&input.arcs, bucket),
            CurveKind::Ellipse => reconcile_targets(&input.ellipses, bucket),
        };
        result.extend(reconciled);
    }

    tracing::debug!(elements = result.len(), "reconciled scene");
    result
}
