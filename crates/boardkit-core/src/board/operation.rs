//! Tree mutations and the helpers that build them.

use super::{Affinity, Board, BoardError, BoardResult, Path};
use crate::shapes::Element;
use serde::{Deserialize, Serialize};

/// A single mutation of the element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    InsertNode { path: Path, node: Element },
    RemoveNode { path: Path, node: Element },
    /// Replace the node's own properties; its children are kept.
    SetNode {
        path: Path,
        previous: Element,
        node: Element,
    },
    /// Move a node so that it ends up at `new_path`.
    MoveNode { path: Path, new_path: Path },
}

impl Operation {
    /// Path the operation targets.
    pub fn path(&self) -> &Path {
        match self {
            Operation::InsertNode { path, .. }
            | Operation::RemoveNode { path, .. }
            | Operation::SetNode { path, .. }
            | Operation::MoveNode { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::InsertNode { .. } => "insert_node",
            Operation::RemoveNode { .. } => "remove_node",
            Operation::SetNode { .. } => "set_node",
            Operation::MoveNode { .. } => "move_node",
        }
    }

    /// The operation that undoes this one.
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::InsertNode { path, node } => Operation::RemoveNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::RemoveNode { path, node } => Operation::InsertNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::SetNode { path, previous, node } => Operation::SetNode {
                path: path.clone(),
                previous: node.clone(),
                node: previous.clone(),
            },
            Operation::MoveNode { path, new_path } => {
                if path == new_path {
                    return self.clone();
                }
                if path.is_sibling(new_path) {
                    return Operation::MoveNode {
                        path: new_path.clone(),
                        new_path: path.clone(),
                    };
                }
                let inverse_path = path.transform(self, Affinity::Forward).unwrap_or_else(|| new_path.clone());
                let inverse_new_path = path.next().transform(self, Affinity::Forward).unwrap_or_else(|| path.clone());
                Operation::MoveNode {
                    path: inverse_path,
                    new_path: inverse_new_path,
                }
            }
        }
    }
}

fn children_at<'a>(children: &'a mut Vec<Element>, parent: &Path) -> BoardResult<&'a mut Vec<Element>> {
    let mut current = children;
    for (depth, &index) in parent.iter().enumerate() {
        let prefix = Path::new(parent[..=depth].to_vec());
        let node = current.get_mut(index).ok_or_else(|| BoardError::PathNotFound(prefix.clone()))?;
        current = node.children_mut().ok_or(BoardError::NotAParent(prefix))?;
    }
    Ok(current)
}

fn split(path: &Path) -> BoardResult<(Path, usize)> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(BoardError::InvalidPath(path.clone(), "the root cannot be targeted")),
    }
}

/// Look up the node at `path`.
pub(crate) fn node_at<'a>(children: &'a [Element], path: &Path) -> Option<&'a Element> {
    let (&first, rest) = path.split_first()?;
    let mut node = children.get(first)?;
    for &index in rest {
        node = node.children()?.get(index)?;
    }
    Some(node)
}

/// Apply `op` to a tree. The tree is left untouched on error.
pub(crate) fn apply_to_tree(children: &mut Vec<Element>, op: &Operation) -> BoardResult<()> {
    match op {
        Operation::InsertNode { path, node } => {
            let (parent, index) = split(path)?;
            let siblings = children_at(children, &parent)?;
            if index > siblings.len() {
                return Err(BoardError::InvalidPath(path.clone(), "insert index out of range"));
            }
            siblings.insert(index, node.clone());
        }
        Operation::RemoveNode { path, .. } => {
            let (parent, index) = split(path)?;
            let siblings = children_at(children, &parent)?;
            if index >= siblings.len() {
                return Err(BoardError::PathNotFound(path.clone()));
            }
            siblings.remove(index);
        }
        Operation::SetNode { path, node, .. } => {
            let (parent, index) = split(path)?;
            let siblings = children_at(children, &parent)?;
            let slot = siblings.get_mut(index).ok_or_else(|| BoardError::PathNotFound(path.clone()))?;
            let mut replacement = node.clone();
            replacement.adopt_children(slot);
            *slot = replacement;
        }
        Operation::MoveNode { path, new_path } => {
            if path == new_path {
                return Ok(());
            }
            if path.is_ancestor(new_path) {
                return Err(BoardError::InvalidPath(new_path.clone(), "cannot move a node into itself"));
            }
            let landing = path
                .transform(op, Affinity::Forward)
                .ok_or_else(|| BoardError::InvalidPath(path.clone(), "moved node vanished"))?;
            let (landing_parent, landing_index) = split(&landing)?;
            let (parent, index) = split(path)?;
            // Validate the destination before detaching anything.
            {
                let siblings = children_at(children, &parent)?;
                if index >= siblings.len() {
                    return Err(BoardError::PathNotFound(path.clone()));
                }
            }
            let node = children_at(children, &parent)?.remove(index);
            let rejected = match children_at(children, &landing_parent) {
                Ok(target) if landing_index <= target.len() => {
                    target.insert(landing_index, node);
                    None
                }
                _ => Some(node),
            };
            if let Some(node) = rejected {
                children_at(children, &parent)?.insert(index, node);
                return Err(BoardError::InvalidPath(new_path.clone(), "destination does not resolve"));
            }
        }
    }
    Ok(())
}

/// Convenience constructors that build and apply operations on a board.
pub struct Transforms;

impl Transforms {
    pub fn insert_node(board: &mut Board, node: Element, path: Path) -> BoardResult<()> {
        board.apply(Operation::InsertNode { path, node })
    }

    pub fn remove_node(board: &mut Board, path: Path) -> BoardResult<()> {
        let node = board.get(&path)?.clone();
        board.apply(Operation::RemoveNode { path, node })
    }

    /// Replace the properties of the node at `path` with those of `node`.
    pub fn set_node(board: &mut Board, node: Element, path: Path) -> BoardResult<()> {
        let previous = board.get(&path)?.clone();
        board.apply(Operation::SetNode { path, previous, node })
    }

    pub fn move_node(board: &mut Board, path: Path, new_path: Path) -> BoardResult<()> {
        board.apply(Operation::MoveNode { path, new_path })
    }
}
