//! Pointer jumping over masked-index arrays.
//!
//! A pointer array encodes a forest: slot `s` points at `pointers[s]`, and a
//! chain ends at a slot holding the sentinel or a terminal element. One
//! [`compress_step`] replaces every pointer whose target is not a chain end by
//! the target's own pointer, halving every chain. Steps read a snapshot and
//! write afterwards, so the outcome does not depend on how the active list is
//! split among workers.

use crate::algs::executor::Executor;
use crate::contour_error::ContourTreeError;
use crate::topology::masked_index::MaskedIndex;

/// The pointer slot `slot` should hold after one jump.
#[inline]
pub fn jump(pointers: &[MaskedIndex], slot: usize) -> MaskedIndex {
    let target = pointers[slot];
    if target.ends_chain() {
        return target;
    }
    let next = pointers[target.index()];
    if next.ends_chain() { target } else { next }
}

/// Slots whose pointer can still move.
pub fn unsettled<E: Executor>(pointers: &[MaskedIndex], candidates: &[usize], exec: &E) -> Vec<usize> {
    exec.compact(candidates, |s| {
        let target = pointers[s];
        !target.ends_chain() && !pointers[target.index()].ends_chain()
    })
}

/// One jump for every slot of `active`; returns the slots that can still move.
pub fn compress_step<E: Executor>(
    pointers: &mut [MaskedIndex],
    active: &[usize],
    exec: &E,
    what: &'static str,
) -> Result<Vec<usize>, ContourTreeError> {
    let updates = {
        let snapshot: &[MaskedIndex] = pointers;
        exec.map_list(active, |s| jump(snapshot, s))
    };
    for (&slot, &target) in active.iter().zip(&updates) {
        if !target.ends_chain() && target.index() == slot {
            return Err(ContourTreeError::CompressionCycle { what, sort_index: slot });
        }
        pointers[slot] = target;
    }
    Ok(unsettled(pointers, active, exec))
}

/// Jump until no pointer moves. Returns the number of steps taken.
///
/// Pointer doubling settles any forest in `ceil(log2 n)` steps; running past
/// that bound means the pointers contain a cycle.
pub fn compress_to_fixed_point<E: Executor>(
    pointers: &mut [MaskedIndex],
    exec: &E,
    what: &'static str,
) -> Result<usize, ContourTreeError> {
    let all: Vec<usize> = (0..pointers.len()).collect();
    compress_slots(pointers, &all, exec, what)
}

/// [`compress_to_fixed_point`] restricted to `slots`; pointers outside the
/// list are read but never rewritten.
pub fn compress_slots<E: Executor>(
    pointers: &mut [MaskedIndex],
    slots: &[usize],
    exec: &E,
    what: &'static str,
) -> Result<usize, ContourTreeError> {
    let mut active = unsettled(pointers, slots, exec);
    let bound = ceil_log2(pointers.len()) + 2;
    let mut steps = 0;
    while !active.is_empty() {
        if steps >= bound {
            return Err(ContourTreeError::CompressionCycle {
                what,
                sort_index: active[0],
            });
        }
        active = compress_step(pointers, &active, exec, what)?;
        steps += 1;
        log::debug!("compress {what}: step {steps}, {} slots still moving", active.len());
    }
    Ok(steps)
}

/// Follow `slot` to the end of its chain and return the last index reached.
///
/// A terminal element names itself; a sentinel leaves the walk at the slot
/// that holds it.
pub fn chain_end(pointers: &[MaskedIndex], slot: usize) -> Result<usize, ContourTreeError> {
    let mut current = slot;
    for _ in 0..=pointers.len() {
        let target = pointers[current];
        if target.is_none() {
            return Ok(current);
        }
        if target.is_terminal() {
            return Ok(target.index());
        }
        current = target.index();
    }
    Err(ContourTreeError::CompressionCycle {
        what: "chain walk",
        sort_index: slot,
    })
}

#[inline]
pub(crate) fn ceil_log2(n: usize) -> usize {
    (usize::BITS - n.max(1).saturating_sub(1).leading_zeros()) as usize
}
