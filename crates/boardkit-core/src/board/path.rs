//! Structural paths into the element tree and their rebasing across operations.

use super::Operation;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Index path from the board root to a node: `[2, 0]` is the first child of the third top-level element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

/// Which side a reference sticks to when a node is inserted exactly at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affinity {
    /// Move along with the displaced node.
    #[default]
    Forward,
    /// Stay at the same index and refer to the inserted node.
    Backward,
}

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the node within its parent.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the child at `index` below this one.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Path of the next sibling.
    pub fn next(&self) -> Self {
        let mut indices = self.0.clone();
        if let Some(last) = indices.last_mut() {
            *last += 1;
        }
        Self(indices)
    }

    /// Path of the previous sibling, if there is one.
    pub fn previous(&self) -> Option<Self> {
        let mut indices = self.0.clone();
        let last = indices.last_mut()?;
        *last = last.checked_sub(1)?;
        Some(Self(indices))
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Whether `self` sits before `other` at the depth of `self` (same parent prefix, lower index).
    pub fn ends_before(&self, other: &Path) -> bool {
        let Some(i) = self.0.len().checked_sub(1) else {
            return false;
        };
        other.0.len() > i && self.0[..i] == other.0[..i] && self.0[i] < other.0[i]
    }

    /// Whether both paths share a parent but differ.
    pub fn is_sibling(&self, other: &Path) -> bool {
        !self.0.is_empty() && self.0.len() == other.0.len() && self.parent() == other.parent() && self != other
    }

    fn shift(&mut self, depth: usize, up: bool) {
        if let Some(index) = self.0.get_mut(depth) {
            if up {
                *index += 1;
            } else {
                *index = index.saturating_sub(1);
            }
        }
    }

    /// Where this path points after `op` is applied. `None` if the node was removed.
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Path> {
        let mut p = self.clone();
        if p.is_root() {
            return Some(p);
        }
        match op {
            Operation::InsertNode { path: op_path, .. } => {
                let at_same = *op_path == p;
                if (at_same && affinity == Affinity::Forward) || op_path.ends_before(&p) || op_path.is_ancestor(&p) {
                    p.shift(op_path.0.len() - 1, true);
                }
                Some(p)
            }
            Operation::RemoveNode { path: op_path, .. } => {
                if *op_path == p || op_path.is_ancestor(&p) {
                    return None;
                }
                if op_path.ends_before(&p) {
                    p.shift(op_path.0.len() - 1, false);
                }
                Some(p)
            }
            Operation::SetNode { .. } => Some(p),
            Operation::MoveNode { path: op_path, new_path } => {
                if op_path == new_path {
                    return Some(p);
                }
                if op_path.is_ancestor(&p) || *op_path == p {
                    let mut moved = new_path.clone();
                    if op_path.ends_before(new_path) && op_path.0.len() < new_path.0.len() {
                        moved.shift(op_path.0.len() - 1, false);
                    }
                    moved.0.extend_from_slice(&p.0[op_path.0.len()..]);
                    return Some(moved);
                }
                if op_path.is_sibling(new_path) && (new_path.is_ancestor(&p) || *new_path == p) {
                    if op_path.ends_before(&p) {
                        p.shift(op_path.0.len() - 1, false);
                    } else {
                        p.shift(op_path.0.len() - 1, true);
                    }
                } else if new_path.ends_before(&p) || *new_path == p || new_path.is_ancestor(&p) {
                    if op_path.ends_before(&p) {
                        p.shift(op_path.0.len() - 1, false);
                    }
                    p.shift(new_path.0.len() - 1, true);
                } else if op_path.ends_before(&p) {
                    if *new_path == p {
                        p.shift(new_path.0.len() - 1, true);
                    }
                    p.shift(op_path.0.len() - 1, false);
                }
                Some(p)
            }
        }
    }
}

impl Deref for Path {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(value: Vec<usize>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(value: [usize; N]) -> Self {
        Self(value.to_vec())
    }
}

/// Handle to a path the board keeps up to date as operations are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathRefId(pub(crate) u64);

#[derive(Debug, Clone)]
pub(crate) struct PathRefEntry {
    pub current: Option<Path>,
    pub affinity: Affinity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Element, MindElement};
    use kurbo::Point;

    fn node() -> Element {
        MindElement::new("n", Point::ZERO, 10.0, 10.0).into()
    }

    fn insert(path: impl Into<Path>) -> Operation {
        Operation::InsertNode {
            path: path.into(),
            node: node(),
        }
    }

    fn remove(path: impl Into<Path>) -> Operation {
        Operation::RemoveNode {
            path: path.into(),
            node: node(),
        }
    }

    #[test]
    fn test_path_relations() {
        let a = Path::from([0, 1]);
        assert_eq!(a.parent(), Some(Path::from([0])));
        assert_eq!(a.next(), Path::from([0, 2]));
        assert_eq!(a.previous(), Some(Path::from([0, 0])));
        assert_eq!(Path::from([0, 0]).previous(), None);
        assert!(Path::from([0]).is_ancestor(&a));
        assert!(!a.is_ancestor(&a));
        assert!(Path::from([0, 0]).ends_before(&Path::from([0, 1, 3])));
        assert!(!Path::from([1, 0]).ends_before(&Path::from([0, 1])));
        assert!(a.is_sibling(&Path::from([0, 3])));
        assert!(!a.is_sibling(&Path::from([1, 1])));
    }

    #[test]
    fn test_transform_insert() {
        let p = Path::from([1, 2]);
        assert_eq!(p.transform(&insert([0]), Affinity::Forward), Some(Path::from([2, 2])));
        assert_eq!(p.transform(&insert([1, 2]), Affinity::Forward), Some(Path::from([1, 3])));
        assert_eq!(p.transform(&insert([1, 2]), Affinity::Backward), Some(Path::from([1, 2])));
        assert_eq!(p.transform(&insert([1, 3]), Affinity::Forward), Some(Path::from([1, 2])));
    }

    #[test]
    fn test_transform_remove() {
        let p = Path::from([1, 2]);
        assert_eq!(p.transform(&remove([1]), Affinity::Forward), None);
        assert_eq!(p.transform(&remove([1, 2]), Affinity::Forward), None);
        assert_eq!(p.transform(&remove([0]), Affinity::Forward), Some(Path::from([0, 2])));
        assert_eq!(p.transform(&remove([1, 0]), Affinity::Forward), Some(Path::from([1, 1])));
    }

    #[test]
    fn test_transform_move() {
        let op = Operation::MoveNode {
            path: Path::from([0]),
            new_path: Path::from([2]),
        };
        // The moved node itself.
        assert_eq!(Path::from([0, 1]).transform(&op, Affinity::Forward), Some(Path::from([2, 1])));
        // A sibling after the source shifts back.
        assert_eq!(Path::from([1]).transform(&op, Affinity::Forward), Some(Path::from([0])));
        // The node previously at the destination shifts back as well.
        assert_eq!(Path::from([2]).transform(&op, Affinity::Forward), Some(Path::from([1])));
        assert_eq!(Path::from([3]).transform(&op, Affinity::Forward), Some(Path::from([3])));
    }
}
