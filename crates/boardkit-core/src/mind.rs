//! Mind-map summary ("abstract") nodes.
//!
//! An abstract node is a child of a mind node that summarizes a contiguous range
//! `start..=end` of its siblings. In a standard layout the children split into a
//! right side (`0..right_node_count`) and a left side, and a summary never spans both.

use crate::board::{Board, BoardError, BoardResult, Path, Transforms};
use crate::geometry::rectangle_from_points;
use crate::shapes::{Element, ElementId, MindElement, MindLayout, SerializableColor};
use kurbo::Point;

/// Topic of a freshly inserted summary node.
pub const ABSTRACT_TOPIC: &str = "Summary";
/// Size of a freshly inserted summary node.
pub const ABSTRACT_WIDTH: f64 = 28.0;
pub const ABSTRACT_HEIGHT: f64 = 20.0;
/// Gap between the summarized range and its summary node.
const ABSTRACT_GAP: f64 = 24.0;

/// Children of a mind node split by side.
#[derive(Debug, Default)]
pub struct SeparatedChildren<'a> {
    pub left: Vec<&'a Element>,
    pub right: Vec<&'a Element>,
}

fn abstract_range(element: &Element) -> Option<(usize, usize)> {
    let mind = element.as_mind()?;
    Some((mind.start?, mind.end?))
}

/// Split the children of a standard-layout node into right and left sides.
/// Summary nodes go to the side of the range they cover.
pub fn separate_children(parent: &MindElement) -> SeparatedChildren<'_> {
    let right_node_count = parent.right_node_count.unwrap_or(0);
    let mut separated = SeparatedChildren::default();
    for (index, child) in parent.children.iter().enumerate() {
        match abstract_range(child) {
            Some((_, end)) if end < right_node_count => separated.right.push(child),
            Some((start, _)) if start >= right_node_count => separated.left.push(child),
            _ if index < right_node_count => separated.right.push(child),
            _ => separated.left.push(child),
        }
    }
    separated
}

fn mind_parent<'a>(board: &'a Board, path: &Path) -> Option<&'a MindElement> {
    board.parent_of(path).and_then(Element::as_mind)
}

/// Whether the element with `id` is already covered by a sibling summary.
pub fn is_set_abstract(board: &Board, id: ElementId) -> bool {
    let Ok(path) = board.find_path(id) else {
        return false;
    };
    let (Some(parent), Some(index)) = (mind_parent(board, &path), path.last()) else {
        return false;
    };
    parent
        .children
        .iter()
        .filter_map(Element::as_mind)
        .any(|child| child.covers(index))
}

/// Whether a summary can be added for `element`: it is neither a root, a summary,
/// nor already summarized.
pub fn can_set_abstract(board: &Board, element: &Element) -> bool {
    let Some(mind) = element.as_mind() else {
        return false;
    };
    let is_root = mind.is_root || board.find_path(mind.id).map(|path| path.len() == 1).unwrap_or(true);
    !is_root && !mind.is_abstract() && !is_set_abstract(board, mind.id)
}

/// Layout in effect at `path`: the nearest explicit layout on the node or its ancestors.
pub fn layout_at(board: &Board, path: &Path) -> MindLayout {
    let mut current = Some(path.clone());
    while let Some(p) = current {
        if p.is_root() {
            break;
        }
        if let Some(layout) = board.get(&p).ok().and_then(Element::as_mind).and_then(|mind| mind.layout) {
            return layout;
        }
        current = p.parent();
    }
    MindLayout::default()
}

/// Add summaries for `ids`, one per parent (two when a range straddles both sides
/// of a standard layout). Roots and descendants of other ids are ignored.
pub fn set_abstract(board: &mut Board, ids: &[ElementId]) -> BoardResult<()> {
    let mut paths = Vec::with_capacity(ids.len());
    for &id in ids {
        paths.push((id, board.find_path(id)?));
    }
    // Keep only the topmost of nested selections.
    let tops: Vec<(ElementId, Path)> = paths
        .iter()
        .filter(|(_, path)| !paths.iter().any(|(_, other)| other.is_ancestor(path)))
        .cloned()
        .collect();

    let mut groups: Vec<(ElementId, Vec<ElementId>)> = Vec::new();
    for (id, path) in tops {
        let Some(parent) = mind_parent(board, &path) else {
            continue;
        };
        match groups.iter_mut().find(|(parent_id, _)| *parent_id == parent.id) {
            Some((_, members)) => members.push(id),
            None => groups.push((parent.id, vec![id])),
        }
    }
    for (parent_id, members) in groups {
        set_abstract_by_elements(board, parent_id, &members)?;
    }
    Ok(())
}

/// Add a summary under `parent_id` covering the sibling range spanned by `group`.
pub fn set_abstract_by_elements(board: &mut Board, parent_id: ElementId, group: &[ElementId]) -> BoardResult<()> {
    let parent_path = board.find_path(parent_id)?;
    let parent = board
        .get(&parent_path)?
        .as_mind()
        .ok_or_else(|| BoardError::NotAParent(parent_path.clone()))?;
    let mut indices = Vec::with_capacity(group.len());
    for &id in group {
        indices.push(parent.child_index(id).ok_or(BoardError::ElementNotFound(id))?);
    }
    indices.sort_unstable();
    let (Some(&start), Some(&end)) = (indices.first(), indices.last()) else {
        return Ok(());
    };
    let right_node_count = parent.right_node_count.unwrap_or(0);
    let path = parent_path.child(parent.children.len());

    if layout_at(board, &parent_path).is_standard() && right_node_count > 0 && start < right_node_count && end >= right_node_count {
        let right: Vec<usize> = indices.iter().copied().filter(|&i| i < right_node_count).collect();
        let left: Vec<usize> = indices.iter().copied().filter(|&i| i >= right_node_count).collect();
        let next = path.next();
        if let (Some(&r0), Some(&r1)) = (right.first(), right.last()) {
            insert_abstract_node(board, path, r0, r1)?;
        }
        if let (Some(&l0), Some(&l1)) = (left.first(), left.last()) {
            insert_abstract_node(board, next, l0, l1)?;
        }
        Ok(())
    } else {
        insert_abstract_node(board, path, start, end)
    }
}

/// Insert a gray summary node covering siblings `start..=end` at `path`.
pub fn insert_abstract_node(board: &mut Board, path: Path, start: usize, end: usize) -> BoardResult<()> {
    let origin = path
        .parent()
        .and_then(|parent| board.get(&parent).ok())
        .and_then(Element::as_mind)
        .map(|parent| {
            let corners: Vec<Point> = parent
                .children
                .get(start..=end.min(parent.children.len().saturating_sub(1)))
                .unwrap_or_default()
                .iter()
                .filter_map(Element::rectangle)
                .flat_map(|rect| [Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1)])
                .collect();
            if corners.is_empty() {
                parent.origin
            } else {
                let covered = rectangle_from_points(&corners);
                Point::new(covered.x1 + ABSTRACT_GAP, covered.center().y - ABSTRACT_HEIGHT / 2.0)
            }
        })
        .unwrap_or(Point::ZERO);

    let mut node = MindElement::new(ABSTRACT_TOPIC, origin, ABSTRACT_WIDTH, ABSTRACT_HEIGHT);
    node.stroke_color = Some(SerializableColor::gray());
    node.link_color = Some(SerializableColor::gray());
    node.start = Some(start);
    node.end = Some(end);
    log::debug!("inserting summary for {start}..={end} at {path:?}");
    Transforms::insert_node(board, node.into(), path)
}
