//! Board state: the element tree, selection, viewport and the operation log.
//!
//! All mutation goes through [`Board::apply`]. Operations applied during one input
//! event are batched and announced to listeners once, when the host calls
//! [`Board::flush`].

mod operation;
mod overlay;
mod path;

pub use operation::{Operation, Transforms};
pub use overlay::{Overlay, OverlayItem};
pub use path::{Affinity, Path, PathRefId};

use crate::geometry::rectangle_from_points;
use crate::resize::ActiveResize;
use crate::routing::DEFAULT_STANDOFF;
use crate::shapes::{Element, ElementId, Line};
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use path::PathRefEntry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Board errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    #[error("no node at path {0:?}")]
    PathNotFound(Path),
    #[error("invalid path {0:?}: {1}")]
    InvalidPath(Path, &'static str),
    #[error("node at {0:?} cannot have children")]
    NotAParent(Path),
    #[error("element {0} is not on the board")]
    ElementNotFound(ElementId),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Board-wide tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardOptions {
    /// Reject every editing gesture.
    pub readonly: bool,
    /// Distance (document units) within which a resize handle is hit.
    pub hit_radius: f64,
    /// Distance within which a resized edge snaps to a sibling edge.
    pub align_tolerance: f64,
    /// Stand-off between a shape and the first bend of an elbow connector.
    pub line_standoff: f64,
    /// Pointer travel (host pixels) before a press turns into a drag.
    pub drag_threshold: f64,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            readonly: false,
            hit_radius: 8.0,
            align_tolerance: 2.0,
            line_standoff: DEFAULT_STANDOFF,
            drag_threshold: 3.0,
        }
    }
}

/// Active pointer tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    #[default]
    Selection,
    Hand,
    Geometry,
    Line,
}

/// Cursor the host should display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
    Move,
    NwseResize,
    NeswResize,
    EwResize,
    NsResize,
}

type ChangeListener = Box<dyn FnMut(&[Operation])>;

/// Shared editing context.
pub struct Board {
    pub children: Vec<Element>,
    pub selection: Vec<ElementId>,
    pub pointer: PointerType,
    pub viewport: Viewport,
    pub options: BoardOptions,
    pub cursor: Cursor,
    /// Element currently under the pointer.
    pub hovered: Option<ElementId>,
    operations: Vec<Operation>,
    flushing: bool,
    path_refs: HashMap<PathRefId, PathRefEntry>,
    next_path_ref: u64,
    overlays: BTreeMap<String, Overlay>,
    resizing: Option<ActiveResize>,
    previews: HashMap<ElementId, Element>,
    listeners: Vec<ChangeListener>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("children", &self.children.len())
            .field("selection", &self.selection)
            .field("pointer", &self.pointer)
            .field("pending_operations", &self.operations.len())
            .field("resizing", &self.resizing)
            .finish_non_exhaustive()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Vec::new(), BoardOptions::default())
    }
}

impl Board {
    pub fn new(children: Vec<Element>, options: BoardOptions) -> Self {
        Self {
            children,
            selection: Vec::new(),
            pointer: PointerType::default(),
            viewport: Viewport::default(),
            options,
            cursor: Cursor::default(),
            hovered: None,
            operations: Vec::new(),
            flushing: false,
            path_refs: HashMap::new(),
            next_path_ref: 0,
            overlays: BTreeMap::new(),
            resizing: None,
            previews: HashMap::new(),
            listeners: Vec::new(),
        }
    }

    // --- mutation -------------------------------------------------------

    /// Apply an operation: mutate the tree, rebase live path refs and queue a flush.
    pub fn apply(&mut self, op: Operation) -> BoardResult<()> {
        operation::apply_to_tree(&mut self.children, &op)?;
        for entry in self.path_refs.values_mut() {
            if let Some(current) = &entry.current {
                entry.current = current.transform(&op, entry.affinity);
            }
        }
        log::trace!("applied {} at {:?}", op.name(), op.path());
        self.operations.push(op);
        self.flushing = true;
        Ok(())
    }

    /// Operations applied since the last flush.
    pub fn pending_operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_flushing(&self) -> bool {
        self.flushing
    }

    /// Deliver the pending batch to change listeners. Returns whether anything was flushed.
    pub fn flush(&mut self) -> bool {
        if !self.flushing {
            return false;
        }
        self.flushing = false;
        let batch = std::mem::take(&mut self.operations);
        log::trace!("flushing {} operation(s)", batch.len());
        for listener in &mut self.listeners {
            listener(&batch);
        }
        true
    }

    /// Register a listener called once per flushed batch.
    pub fn on_change(&mut self, listener: impl FnMut(&[Operation]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- path refs ------------------------------------------------------

    /// Track `path` across subsequent operations.
    pub fn path_ref(&mut self, path: Path, affinity: Affinity) -> PathRefId {
        let id = PathRefId(self.next_path_ref);
        self.next_path_ref += 1;
        self.path_refs.insert(
            id,
            PathRefEntry {
                current: Some(path),
                affinity,
            },
        );
        id
    }

    /// Current value of a tracked path; `None` once its node was removed.
    pub fn path_ref_current(&self, id: PathRefId) -> Option<&Path> {
        self.path_refs.get(&id).and_then(|entry| entry.current.as_ref())
    }

    /// Stop tracking a path and return its final value.
    pub fn unref(&mut self, id: PathRefId) -> Option<Path> {
        self.path_refs.remove(&id).and_then(|entry| entry.current)
    }

    // --- queries --------------------------------------------------------

    pub fn get(&self, path: &Path) -> BoardResult<&Element> {
        operation::node_at(&self.children, path).ok_or_else(|| BoardError::PathNotFound(path.clone()))
    }

    /// Structural path of the element with `id`.
    pub fn find_path(&self, id: ElementId) -> BoardResult<Path> {
        fn search(children: &[Element], id: ElementId, prefix: &Path) -> Option<Path> {
            for (index, child) in children.iter().enumerate() {
                let path = prefix.child(index);
                if child.id() == id {
                    return Some(path);
                }
                if let Some(found) = child.children().and_then(|nested| search(nested, id, &path)) {
                    return Some(found);
                }
            }
            None
        }
        search(&self.children, id, &Path::root()).ok_or(BoardError::ElementNotFound(id))
    }

    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.find_path(id).ok().and_then(|path| operation::node_at(&self.children, &path))
    }

    /// Every element with its path, parents before children.
    pub fn elements_with_paths(&self) -> Vec<(Path, &Element)> {
        fn walk<'a>(children: &'a [Element], prefix: &Path, out: &mut Vec<(Path, &'a Element)>) {
            for (index, child) in children.iter().enumerate() {
                let path = prefix.child(index);
                out.push((path.clone(), child));
                if let Some(nested) = child.children() {
                    walk(nested, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), &mut out);
        out
    }

    /// Parent element of the node at `path`, if it is not top-level.
    pub fn parent_of(&self, path: &Path) -> Option<&Element> {
        let parent = path.parent()?;
        if parent.is_root() {
            None
        } else {
            operation::node_at(&self.children, &parent)
        }
    }

    /// Rendered waypoints of a line, with bound ends resolved against the board.
    pub fn line_points(&self, line: &Line) -> Vec<Point> {
        let bound_rect = |id: Option<ElementId>| {
            id.and_then(|id| self.get_element(id))
                .filter(|element| !element.is_line())
                .and_then(Element::rectangle)
        };
        line.waypoints(bound_rect(line.source.bound_id), bound_rect(line.target.bound_id), self.options.line_standoff)
    }

    /// Bounding rectangle of an element as rendered.
    pub fn get_rectangle(&self, element: &Element) -> Option<Rect> {
        match element {
            Element::Line(line) => {
                let points = self.line_points(line);
                (!points.is_empty()).then(|| rectangle_from_points(&points))
            }
            other => other.rectangle(),
        }
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected elements in selection order. Ids no longer on the board are skipped.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.selection.iter().filter_map(|&id| self.get_element(id)).collect()
    }

    /// Topmost element under `point`.
    pub fn hit_element(&self, point: Point) -> Option<ElementId> {
        let tolerance = self.options.hit_radius / 2.0;
        fn hit(board: &Board, children: &[Element], point: Point, tolerance: f64) -> Option<ElementId> {
            for child in children.iter().rev() {
                if let Some(found) = child.children().and_then(|nested| hit(board, nested, point, tolerance)) {
                    return Some(found);
                }
                let is_hit = match child {
                    Element::Line(line) => line.hit_test_points(&board.line_points(line), point, tolerance),
                    other => other.hit_test(point, tolerance),
                };
                if is_hit {
                    return Some(child.id());
                }
            }
            None
        }
        hit(self, &self.children, point, tolerance)
    }

    /// Rectangles of unselected, non-connector elements other than `exclude`, for alignment.
    pub fn alignment_rectangles(&self, exclude: ElementId) -> Vec<Rect> {
        self.elements_with_paths()
            .into_iter()
            .filter(|(_, element)| {
                let id = element.id();
                id != exclude && !element.is_line() && !self.is_selected(id)
            })
            .filter_map(|(_, element)| element.rectangle())
            .collect()
    }

    // --- transient state ------------------------------------------------

    pub fn set_overlay(&mut self, key: impl Into<String>, overlay: Overlay) {
        self.overlays.insert(key.into(), overlay);
    }

    pub fn remove_overlay(&mut self, key: &str) -> Option<Overlay> {
        self.overlays.remove(key)
    }

    pub fn overlay(&self, key: &str) -> Option<&Overlay> {
        self.overlays.get(key)
    }

    /// All overlays in key order.
    pub fn overlays(&self) -> impl Iterator<Item = (&str, &Overlay)> {
        self.overlays.iter().map(|(key, overlay)| (key.as_str(), overlay))
    }

    /// Publish the resize gesture in progress.
    pub fn start_resizing(&mut self, active: ActiveResize) {
        self.resizing = Some(active);
    }

    pub fn end_resizing(&mut self) {
        self.resizing = None;
    }

    pub fn resizing(&self) -> Option<&ActiveResize> {
        self.resizing.as_ref()
    }

    /// Show `element` in place of its committed version until cleared.
    pub fn set_preview(&mut self, element: Element) {
        self.previews.insert(element.id(), element);
    }

    pub fn clear_preview(&mut self, id: ElementId) -> Option<Element> {
        self.previews.remove(&id)
    }

    pub fn preview(&self, id: ElementId) -> Option<&Element> {
        self.previews.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Geometry, GeometryShape, MindElement};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rect_element(x: f64, y: f64) -> Element {
        Geometry::new(GeometryShape::Rectangle, [Point::new(x, y), Point::new(x + 100.0, y + 50.0)]).into()
    }

    #[test]
    fn test_apply_and_flush_once() {
        let mut board = Board::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        board.on_change(move |ops| sink.borrow_mut().push(ops.len()));

        Transforms::insert_node(&mut board, rect_element(0.0, 0.0), Path::from([0])).unwrap();
        Transforms::insert_node(&mut board, rect_element(200.0, 0.0), Path::from([1])).unwrap();
        assert_eq!(board.children.len(), 2);
        assert!(board.is_flushing());

        assert!(board.flush());
        assert!(!board.flush());
        assert_eq!(*calls.borrow(), vec![2]);
        assert!(board.pending_operations().is_empty());
    }

    #[test]
    fn test_failed_apply_does_not_flush() {
        let mut board = Board::default();
        let err = Transforms::insert_node(&mut board, rect_element(0.0, 0.0), Path::from([3])).unwrap_err();
        assert!(matches!(err, BoardError::InvalidPath(..)));
        assert!(!board.is_flushing());
        assert!(matches!(Transforms::remove_node(&mut board, Path::from([0])), Err(BoardError::PathNotFound(_))));
    }

    #[test]
    fn test_find_path_nested() {
        let child = MindElement::new("child", Point::ZERO, 10.0, 10.0);
        let child_id = child.id;
        let root = MindElement::root("root", Point::ZERO, 100.0, 40.0).with_children(vec![child.into()]);
        let board = Board::new(vec![rect_element(0.0, 0.0), root.into()], BoardOptions::default());
        assert_eq!(board.find_path(child_id).unwrap(), Path::from([1, 0]));
        assert_eq!(board.get(&Path::from([1, 0])).unwrap().id(), child_id);
        let missing = ElementId::new_v4();
        assert_eq!(board.find_path(missing), Err(BoardError::ElementNotFound(missing)));
    }

    #[test]
    fn test_insert_into_leaf_is_rejected() {
        let mut board = Board::new(vec![rect_element(0.0, 0.0)], BoardOptions::default());
        let result = Transforms::insert_node(&mut board, rect_element(5.0, 5.0), Path::from([0, 0]));
        assert_eq!(result, Err(BoardError::NotAParent(Path::from([0]))));
    }

    #[test]
    fn test_set_node_keeps_children() {
        let child = MindElement::new("child", Point::ZERO, 10.0, 10.0);
        let root = MindElement::root("root", Point::ZERO, 100.0, 40.0).with_children(vec![child.into()]);
        let mut board = Board::new(vec![root.clone().into()], BoardOptions::default());

        let mut renamed = root;
        renamed.topic = "renamed".into();
        renamed.children.clear();
        Transforms::set_node(&mut board, renamed.into(), Path::from([0])).unwrap();

        let node = board.get(&Path::from([0])).unwrap().as_mind().unwrap();
        assert_eq!(node.topic, "renamed");
        assert_eq!(node.children.len(), 1);
    }

    #[test]
    fn test_move_node_and_inverse() {
        let elements: Vec<Element> = (0..3).map(|i| rect_element(i as f64 * 200.0, 0.0)).collect();
        let ids: Vec<ElementId> = elements.iter().map(Element::id).collect();
        let mut board = Board::new(elements, BoardOptions::default());

        Transforms::move_node(&mut board, Path::from([0]), Path::from([2])).unwrap();
        let order: Vec<ElementId> = board.children.iter().map(Element::id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);

        let inverse = board.pending_operations()[0].inverse();
        board.apply(inverse).unwrap();
        let order: Vec<ElementId> = board.children.iter().map(Element::id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_path_refs_follow_operations() {
        let mut board = Board::new(vec![rect_element(0.0, 0.0), rect_element(200.0, 0.0)], BoardOptions::default());
        let second = board.path_ref(Path::from([1]), Affinity::Forward);
        let first = board.path_ref(Path::from([0]), Affinity::Forward);

        Transforms::insert_node(&mut board, rect_element(400.0, 0.0), Path::from([0])).unwrap();
        assert_eq!(board.path_ref_current(second), Some(&Path::from([2])));

        Transforms::remove_node(&mut board, Path::from([1])).unwrap();
        assert_eq!(board.path_ref_current(first), None);
        assert_eq!(board.unref(second), Some(Path::from([1])));
        assert_eq!(board.path_ref_current(second), None);
    }

    #[test]
    fn test_selected_elements_and_hit() {
        let a = rect_element(0.0, 0.0);
        let b = rect_element(50.0, 20.0);
        let (a_id, b_id) = (a.id(), b.id());
        let mut board = Board::new(vec![a, b], BoardOptions::default());
        board.selection = vec![b_id, ElementId::new_v4()];
        assert_eq!(board.selected_elements().len(), 1);
        // Overlapping area resolves to the topmost element.
        assert_eq!(board.hit_element(Point::new(60.0, 30.0)), Some(b_id));
        assert_eq!(board.hit_element(Point::new(10.0, 10.0)), Some(a_id));
        assert_eq!(board.hit_element(Point::new(500.0, 500.0)), None);
        assert_eq!(board.alignment_rectangles(a_id).len(), 0);
    }

    #[test]
    fn test_line_rectangle_uses_bound_element() {
        let shape = rect_element(0.0, 0.0);
        let shape_id = shape.id();
        let mut line = Line::new(crate::routing::ConnectorShape::Straight, Point::new(0.0, 0.0), Point::new(300.0, 25.0));
        line.source = crate::shapes::LineHandle::bound(shape_id, Point::new(1.0, 0.5), crate::shapes::LineMarker::None);
        let board = Board::new(vec![shape, line.clone().into()], BoardOptions::default());
        let rect = board.get_rectangle(&line.into()).unwrap();
        assert_eq!(rect, Rect::new(100.0, 25.0, 300.0, 25.0));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: BoardOptions = serde_json::from_str(r#"{"readonly": true}"#).unwrap();
        assert!(options.readonly);
        assert!((options.hit_radius - 8.0).abs() < f64::EPSILON);
        assert!((options.line_standoff - DEFAULT_STANDOFF).abs() < f64::EPSILON);
    }
}
