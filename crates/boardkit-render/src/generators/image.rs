//! Image generator.

use super::group_of;
use crate::generator::{DrawContext, Generator};
use crate::scene::{NodeId, VisualTree};
use boardkit_core::shapes::Image;

/// Places an image reference in its frame.
#[derive(Debug, Default)]
pub struct ImageGenerator;

impl Generator for ImageGenerator {
    type Target = Image;
    type Data = ();

    fn can_draw(&self, _ctx: &DrawContext<'_>, element: &Image, _data: &()) -> bool {
        !element.url.is_empty() && element.bounds().area() > 0.0
    }

    fn draw(&mut self, _ctx: &DrawContext<'_>, tree: &mut VisualTree, element: &Image, _data: &()) -> Option<NodeId> {
        let image = tree.create_image(element.url.clone(), element.bounds());
        group_of(tree, "image", [image])
    }
}
