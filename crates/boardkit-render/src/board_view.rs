//! Keeps a [`VisualTree`] in step with a [`Board`].
//!
//! Every element gets a container group in the elements layer (nested under its
//! parent's container for tree elements) holding the node of its kind's generator.
//! Selection and hover decorations live in the active layer, overlays in the
//! topmost layer. A reconciliation pass redraws the elements whose drawing inputs
//! changed, drops what left it and restores z-order.

use crate::generator::{DrawContext, GeneratorOptions, GeneratorSlot};
use crate::generators::{
    ActiveData, ActiveGenerator, GeometryShapeGenerator, ImageGenerator, LineShapeGenerator, MindNodeData, MindNodeGenerator,
};
use crate::scene::{NodeId, SceneResult, ShapeNode, VisualTree};
use boardkit_core::board::{Board, Overlay, OverlayItem};
use boardkit_core::geometry::rectangle_from_points;
use boardkit_core::resize::has_resize_handle;
use boardkit_core::shapes::{Element, ElementId};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape};
use peniko::Color;
use std::collections::{HashMap, HashSet};

const MASK_ALPHA: f32 = 0.25;

/// The generator slot matching an element's kind.
#[derive(Debug)]
enum ContentSlot {
    Geometry(GeneratorSlot<GeometryShapeGenerator>),
    Image(GeneratorSlot<ImageGenerator>),
    Line(GeneratorSlot<LineShapeGenerator>),
    Mind(GeneratorSlot<MindNodeGenerator>),
}

impl ContentSlot {
    fn for_element(element: &Element) -> Self {
        // Content goes before nested child containers.
        let options = GeneratorOptions { prepend: true };
        match element {
            Element::Geometry(_) => ContentSlot::Geometry(GeneratorSlot::with_options(GeometryShapeGenerator, options)),
            Element::Image(_) => ContentSlot::Image(GeneratorSlot::with_options(ImageGenerator, options)),
            Element::Line(_) => ContentSlot::Line(GeneratorSlot::with_options(LineShapeGenerator, options)),
            Element::Mind(_) => ContentSlot::Mind(GeneratorSlot::with_options(MindNodeGenerator, options)),
        }
    }

    fn matches(&self, element: &Element) -> bool {
        matches!(
            (self, element),
            (ContentSlot::Geometry(_), Element::Geometry(_))
                | (ContentSlot::Image(_), Element::Image(_))
                | (ContentSlot::Line(_), Element::Line(_))
                | (ContentSlot::Mind(_), Element::Mind(_))
        )
    }

    fn node(&self) -> Option<NodeId> {
        match self {
            ContentSlot::Geometry(slot) => slot.node(),
            ContentSlot::Image(slot) => slot.node(),
            ContentSlot::Line(slot) => slot.node(),
            ContentSlot::Mind(slot) => slot.node(),
        }
    }

    fn process(
        &mut self,
        ctx: &DrawContext<'_>,
        tree: &mut VisualTree,
        element: &Element,
        parent: NodeId,
        mind: &MindNodeData,
    ) -> SceneResult<()> {
        match (self, element) {
            (ContentSlot::Geometry(slot), Element::Geometry(e)) => slot.process_drawing(ctx, tree, e, parent, &()),
            (ContentSlot::Image(slot), Element::Image(e)) => slot.process_drawing(ctx, tree, e, parent, &()),
            (ContentSlot::Line(slot), Element::Line(e)) => slot.process_drawing(ctx, tree, e, parent, &()),
            (ContentSlot::Mind(slot), Element::Mind(e)) => slot.process_drawing(ctx, tree, e, parent, mind),
            (slot, _) => slot.destroy(tree),
        }
    }

    fn destroy(&mut self, tree: &mut VisualTree) -> SceneResult<()> {
        match self {
            ContentSlot::Geometry(slot) => slot.destroy(tree),
            ContentSlot::Image(slot) => slot.destroy(tree),
            ContentSlot::Line(slot) => slot.destroy(tree),
            ContentSlot::Mind(slot) => slot.destroy(tree),
        }
    }
}

/// Everything an element's drawing depends on.
#[derive(Debug, Clone, PartialEq)]
struct DrawInputs {
    /// The shown element with its children left out; they have views of their own.
    element: Element,
    /// Resolved points of a connector, which move with the shapes it is bound to.
    line_points: Vec<Point>,
}

impl DrawInputs {
    fn of(board: &Board, shown: &Element) -> Self {
        let mut element = shown.clone();
        if let Some(children) = element.children_mut() {
            children.clear();
        }
        let line_points = shown.as_line().map(|line| board.line_points(line)).unwrap_or_default();
        Self { element, line_points }
    }
}

#[derive(Debug)]
struct ElementView {
    container: NodeId,
    content: ContentSlot,
    active: GeneratorSlot<ActiveGenerator>,
    /// Inputs of the last content pass; `None` forces a redraw.
    drawn: Option<(DrawInputs, MindNodeData)>,
    /// Inputs of the last active pass.
    drawn_active: Option<(DrawInputs, ActiveData)>,
}

/// Retained rendering of a board.
#[derive(Debug)]
pub struct BoardView {
    tree: VisualTree,
    elements_layer: NodeId,
    active_layer: NodeId,
    overlay_layer: NodeId,
    views: HashMap<ElementId, ElementView>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    pub fn new() -> Self {
        let mut tree = VisualTree::new();
        let elements_layer = tree.create_layer("elements");
        let active_layer = tree.create_layer("active");
        let overlay_layer = tree.create_layer("overlays");
        Self {
            tree,
            elements_layer,
            active_layer,
            overlay_layer,
            views: HashMap::new(),
        }
    }

    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn elements_layer(&self) -> NodeId {
        self.elements_layer
    }

    pub fn active_layer(&self) -> NodeId {
        self.active_layer
    }

    pub fn overlay_layer(&self) -> NodeId {
        self.overlay_layer
    }

    /// Container group of an element.
    pub fn container_of(&self, id: ElementId) -> Option<NodeId> {
        self.views.get(&id).map(|view| view.container)
    }

    /// Node drawn by the element's generator.
    pub fn node_of(&self, id: ElementId) -> Option<NodeId> {
        self.views.get(&id).and_then(|view| view.content.node())
    }

    /// Selection or hover decoration of an element.
    pub fn active_node_of(&self, id: ElementId) -> Option<NodeId> {
        self.views.get(&id).and_then(|view| view.active.node())
    }

    /// Bring the visual tree in step with `board`.
    pub fn reconcile(&mut self, board: &Board) -> SceneResult<()> {
        let root = self.tree.root();
        self.tree.set_transform(root, board.viewport.transform())?;
        let ctx = DrawContext::new(board);
        let mut seen = HashSet::new();
        let order = self.reconcile_list(&ctx, &board.children, self.elements_layer, None, &mut seen)?;
        self.tree.reorder(self.elements_layer, &order)?;
        self.drop_unseen(&seen)?;
        self.redraw_overlays(board)?;
        log::trace!("reconciled {} element view(s), {} visual node(s)", self.views.len(), self.tree.len());
        Ok(())
    }

    fn reconcile_list(
        &mut self,
        ctx: &DrawContext<'_>,
        elements: &[Element],
        parent: NodeId,
        parent_rect: Option<Rect>,
        seen: &mut HashSet<ElementId>,
    ) -> SceneResult<Vec<NodeId>> {
        let mut order = Vec::with_capacity(elements.len());
        for element in elements {
            let id = element.id();
            seen.insert(id);
            let shown = ctx.board.preview(id).unwrap_or(element);

            let tree = &mut self.tree;
            let view = self.views.entry(id).or_insert_with(|| ElementView {
                container: tree.create_group(Some("element")),
                content: ContentSlot::for_element(shown),
                active: GeneratorSlot::new(ActiveGenerator),
                drawn: None,
                drawn_active: None,
            });
            if tree.parent(view.container) != Some(parent) {
                tree.append(parent, view.container)?;
            }
            if !view.content.matches(shown) {
                view.content.destroy(tree)?;
                view.content = ContentSlot::for_element(shown);
                view.drawn = None;
            }

            let inputs = DrawInputs::of(ctx.board, shown);
            let mind = MindNodeData {
                parent: parent_rect,
                covered: covered_range(elements, shown),
            };
            let content = (inputs.clone(), mind);
            if view.drawn.as_ref() != Some(&content) {
                view.content.process(ctx, tree, shown, view.container, &mind)?;
                view.drawn = Some(content);
            }

            let active = ActiveData {
                selected: ctx.board.is_selected(id),
                hovered: ctx.board.hovered == Some(id),
                handles: has_resize_handle(ctx.board, shown),
            };
            let active_inputs = (inputs, active);
            if view.drawn_active.as_ref() != Some(&active_inputs) {
                view.active.process_drawing(ctx, tree, shown, self.active_layer, &active)?;
                view.drawn_active = Some(active_inputs);
            }

            let container = view.container;
            let content = view.content.node();
            if let Some(children) = shown.children() {
                let child_order = self.reconcile_list(ctx, children, container, shown.rectangle(), seen)?;
                let layout: Vec<NodeId> = content.into_iter().chain(child_order).collect();
                self.tree.reorder(container, &layout)?;
            }
            order.push(container);
        }
        Ok(order)
    }

    fn drop_unseen(&mut self, seen: &HashSet<ElementId>) -> SceneResult<()> {
        let gone: Vec<ElementId> = self.views.keys().filter(|id| !seen.contains(id)).copied().collect();
        let mut views = Vec::with_capacity(gone.len());
        for id in gone {
            if let Some(mut view) = self.views.remove(&id) {
                view.content.destroy(&mut self.tree)?;
                view.active.destroy(&mut self.tree)?;
                views.push(view);
            }
        }
        // Containers of nested elements may already have gone with their parent's.
        for view in views {
            if self.tree.is_alive(view.container) {
                self.tree.remove(view.container)?;
            }
        }
        Ok(())
    }

    fn redraw_overlays(&mut self, board: &Board) -> SceneResult<()> {
        self.tree.clear_children(self.overlay_layer)?;
        for (key, overlay) in board.overlays() {
            let group = self.tree.create_group(Some(key));
            self.tree.append(self.overlay_layer, group)?;
            for item in &overlay.items {
                let node = self.tree.create_shape(overlay_shape(overlay, item));
                self.tree.append(group, node)?;
            }
        }
        Ok(())
    }
}

/// Union of the sibling rectangles a summary node covers.
fn covered_range(siblings: &[Element], element: &Element) -> Option<Rect> {
    let mind = element.as_mind()?;
    let (start, end) = (mind.start?, mind.end?);
    let corners: Vec<Point> = siblings
        .get(start..=end)?
        .iter()
        .filter_map(Element::rectangle)
        .flat_map(|rect| [Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1)])
        .collect();
    (!corners.is_empty()).then(|| rectangle_from_points(&corners))
}

fn overlay_shape(overlay: &Overlay, item: &OverlayItem) -> ShapeNode {
    let stroke: Color = overlay.stroke.into();
    let fill: Option<Color> = overlay.fill.map(Into::into);
    match item {
        OverlayItem::Segment { start, end } => {
            let mut path = BezPath::new();
            path.move_to(*start);
            path.line_to(*end);
            ShapeNode::stroked(path, stroke, overlay.stroke_width)
        }
        OverlayItem::Circle { center, radius } => {
            ShapeNode::stroked(Circle::new(*center, *radius).to_path(0.1), stroke, overlay.stroke_width).with_fill(fill)
        }
        OverlayItem::Mask { rect, angle } => {
            let mut path = rect.to_path(0.1);
            if *angle != 0.0 {
                path.apply_affine(Affine::rotate_about(*angle, rect.center()));
            }
            ShapeNode::filled(path, fill.unwrap_or(stroke).with_alpha(MASK_ALPHA))
        }
    }
}
