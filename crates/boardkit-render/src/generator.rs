//! Incremental draw/redraw/destroy of one element's visual node.
//!
//! A [`Generator`] knows how to turn an element into a visual subtree. A
//! [`GeneratorSlot`] owns the node the generator produced last time and keeps the
//! visual tree in step with the element across reconciliation passes.

use crate::scene::{NodeId, SceneResult, VisualTree};
use boardkit_core::board::Board;
use boardkit_core::shapes::ElementTrait;
use kurbo::Affine;

/// Read-only state available while drawing.
#[derive(Clone, Copy)]
pub struct DrawContext<'a> {
    pub board: &'a Board,
}

impl<'a> DrawContext<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

/// Produces the visual subtree of an element.
pub trait Generator {
    /// Element type this generator draws.
    type Target: ElementTrait + ?Sized;
    /// Extra data supplied by the caller on every pass.
    type Data;

    fn can_draw(&self, ctx: &DrawContext<'_>, element: &Self::Target, data: &Self::Data) -> bool;

    /// Build a detached node for `element`, or `None` when there is nothing to show.
    fn draw(&mut self, ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Self::Target, data: &Self::Data) -> Option<NodeId>;

    /// Post-draw capability. Generators that decorate their node after it is
    /// attached return themselves here.
    fn as_after_draw(&mut self) -> Option<&mut dyn AfterDraw<Self::Target>> {
        None
    }
}

/// Decoration step run after every successful draw or redraw.
pub trait AfterDraw<T: ?Sized> {
    fn after_draw(&mut self, ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &T, node: NodeId);
}

/// Per-slot configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Insert a fresh node before its siblings instead of after them.
    pub prepend: bool,
}

/// A generator together with the node it currently has on screen.
#[derive(Debug)]
pub struct GeneratorSlot<G> {
    generator: G,
    options: GeneratorOptions,
    node: Option<NodeId>,
}

impl<G: Generator> GeneratorSlot<G> {
    pub fn new(generator: G) -> Self {
        Self::with_options(generator, GeneratorOptions::default())
    }

    pub fn with_options(generator: G, options: GeneratorOptions) -> Self {
        Self {
            generator,
            options,
            node: None,
        }
    }

    /// Node currently on screen.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Bring the slot in step with `element`: draw, redraw in place, or destroy.
    pub fn process_drawing(
        &mut self,
        ctx: &DrawContext<'_>,
        tree: &mut VisualTree,
        element: &G::Target,
        parent: NodeId,
        data: &G::Data,
    ) -> SceneResult<()> {
        if !self.generator.can_draw(ctx, element, data) {
            return self.destroy(tree);
        }
        let Some(node) = self.generator.draw(ctx, tree, element, data) else {
            return self.destroy(tree);
        };
        self.attach(tree, parent, node)?;
        let angle = element.angle();
        if angle != 0.0 {
            if let Some(rect) = element.rectangle() {
                tree.set_transform(node, Affine::rotate_about(angle, rect.center()))?;
            }
        }
        if let Some(hook) = self.generator.as_after_draw() {
            hook.after_draw(ctx, tree, element, node);
        }
        Ok(())
    }

    /// Replace the previous node in place, or insert when there is none under `parent`.
    fn attach(&mut self, tree: &mut VisualTree, parent: NodeId, node: NodeId) -> SceneResult<()> {
        match self.node.take() {
            Some(old) if tree.is_alive(old) && tree.contains(parent, old) => tree.replace_with(old, node)?,
            previous => {
                if let Some(old) = previous.filter(|&old| tree.is_alive(old)) {
                    tree.remove(old)?;
                }
                if self.options.prepend {
                    tree.prepend(parent, node)?;
                } else {
                    tree.append(parent, node)?;
                }
            }
        }
        self.node = Some(node);
        Ok(())
    }

    /// Remove the node from the tree and forget it.
    pub fn destroy(&mut self, tree: &mut VisualTree) -> SceneResult<()> {
        if let Some(node) = self.node.take() {
            if tree.is_alive(node) {
                tree.remove(node)?;
            } else {
                log::warn!("visual node {node:?} was removed behind its generator");
            }
        }
        Ok(())
    }
}
