//! Rank maintenance for single-item moves.
//!
//! A collection is valid when its ranks are exactly `0..len`, each used once.
//! Moving one item from `from_index` to `to_index` only ever touches ranks in
//! [`affected_range`]: items between the two positions slide by one toward the
//! vacated slot and the moved item takes the destination rank.

use std::{cmp::Ordering, ops::RangeInclusive};

use thiserror::Error;

use crate::domain::{Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReindexError {
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("index {index} is out of range for {len} items")]
    IndexOutOfRange { index: u32, len: usize },
    #[error("item {id} is at position {actual}, not {expected}")]
    PositionMismatch { id: ItemId, expected: u32, actual: u32 },
    #[error("item ranks are not a dense sequence starting at zero")]
    NotDense,
}

/// A single rank rewrite produced by a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankChange {
    pub id: ItemId,
    pub from: u32,
    pub to: u32,
}

/// Ranks a move between `from_index` and `to_index` may rewrite.
pub fn affected_range(from_index: u32, to_index: u32) -> RangeInclusive<u32> {
    from_index.min(to_index)..=from_index.max(to_index)
}

/// Rank of an item after the move, given its rank before the move.
pub fn shifted_rank(rank: u32, is_moved: bool, from_index: u32, to_index: u32) -> u32 {
    if is_moved {
        return to_index;
    }
    match from_index.cmp(&to_index) {
        Ordering::Less if rank > from_index && rank <= to_index => rank - 1,
        Ordering::Greater if rank >= to_index && rank < from_index => rank + 1,
        _ => rank,
    }
}

pub fn is_dense_permutation(items: &[Item]) -> bool {
    ensure_dense(items).is_ok()
}

pub fn ensure_dense(items: &[Item]) -> Result<(), ReindexError> {
    let mut seen = vec![false; items.len()];
    for item in items {
        let slot = seen
            .get_mut(item.order as usize)
            .ok_or(ReindexError::NotDense)?;
        if *slot {
            return Err(ReindexError::NotDense);
        }
        *slot = true;
    }
    Ok(())
}

/// Checks every precondition of a move without touching any rank.
pub fn validate_move(
    items: &[Item],
    moved_id: &ItemId,
    from_index: u32,
    to_index: u32,
) -> Result<(), ReindexError> {
    let moved = items
        .iter()
        .find(|item| &item.id == moved_id)
        .ok_or_else(|| ReindexError::ItemNotFound(moved_id.clone()))?;

    for index in [from_index, to_index] {
        if index as usize >= items.len() {
            return Err(ReindexError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
    }

    if moved.order != from_index {
        return Err(ReindexError::PositionMismatch {
            id: moved_id.clone(),
            expected: from_index,
            actual: moved.order,
        });
    }

    ensure_dense(items)
}

/// Lists the rank rewrites a move needs, in input order. Items whose rank is
/// unchanged are left out, so an in-place move yields nothing.
pub fn plan_move(
    items: &[Item],
    moved_id: &ItemId,
    from_index: u32,
    to_index: u32,
) -> Result<Vec<RankChange>, ReindexError> {
    validate_move(items, moved_id, from_index, to_index)?;
    Ok(items
        .iter()
        .filter_map(|item| {
            let to = shifted_rank(item.order, &item.id == moved_id, from_index, to_index);
            (to != item.order).then(|| RankChange {
                id: item.id.clone(),
                from: item.order,
                to,
            })
        })
        .collect())
}

/// Returns the collection after moving `moved_id` from `from_index` to
/// `to_index`, sorted by rank.
pub fn reindex(
    items: &[Item],
    moved_id: &ItemId,
    from_index: u32,
    to_index: u32,
) -> Result<Vec<Item>, ReindexError> {
    validate_move(items, moved_id, from_index, to_index)?;

    // Ranks are dense on both sides of the move, so each item lands in its own slot.
    let mut slots: Vec<Option<Item>> = (0..items.len()).map(|_| None).collect();
    for item in items {
        let order = shifted_rank(item.order, &item.id == moved_id, from_index, to_index);
        slots[order as usize] = Some(Item {
            order,
            ..item.clone()
        });
    }
    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(ReindexError::NotDense)
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
