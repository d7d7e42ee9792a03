//! Circular dependency detection for formula cells.
//!
//! When a formula is entered, we must verify it doesn't create a cycle
//! (e.g., A1 references B1, B1 references C1, C1 references A1).
//! The check runs before the edit is committed: the edited cell's proposed
//! references are supplied directly, every other cell's references come from
//! the live grid through a callback.

use std::collections::HashSet;

use super::Position;

/// Detect whether giving `target` the references `proposed` would close a cycle.
///
/// `refs_of` returns the current references of any other cell. Returns
/// `Some(path)` (starting and ending at `target`) if a cycle is found, `None`
/// otherwise. Cells reachable along several paths are only expanded once.
///
/// The walk keeps its own stack, so arbitrarily long reference chains are fine.
pub fn detect_cycle<F, R>(
    target: Position,
    proposed: &[Position],
    refs_of: F,
) -> Option<Vec<Position>>
where
    F: Fn(Position) -> R,
    R: AsRef<[Position]>,
{
    let mut visited = HashSet::new();
    let mut path = vec![target];

    for &root in proposed {
        if root == target {
            path.push(root);
            return Some(path);
        }
        if !visited.insert(root) {
            continue;
        }
        path.push(root);
        // One frame per cell on `path` (after the target): its references and
        // the index of the next one to follow.
        let mut stack: Vec<(R, usize)> = vec![(refs_of(root), 0)];

        while let Some((refs, next)) = stack.last_mut() {
            let dep = refs.as_ref().get(*next).copied();
            *next += 1;
            let Some(dep) = dep else {
                stack.pop();
                path.pop();
                continue;
            };
            if dep == target {
                path.push(dep);
                return Some(path);
            }
            if visited.insert(dep) {
                path.push(dep);
                stack.push((refs_of(dep), 0));
            }
        }
    }
    None
}
