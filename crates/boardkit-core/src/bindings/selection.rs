//! Click selection.

use crate::board::{Board, PointerType};
use crate::input::{KeyEvent, PointerEvent};
use crate::plugin::{BoardPlugin, Next};

/// Selects the element under a click; shift toggles membership, empty space clears.
#[derive(Debug, Default)]
pub struct Selection;

impl BoardPlugin for Selection {
    fn name(&self) -> &'static str {
        "selection"
    }

    fn pointer_down(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        if board.pointer == PointerType::Selection {
            let point = board.viewport.client_to_view_box(event.client_point());
            match (board.hit_element(point), event.modifiers.shift) {
                (Some(id), true) => {
                    if let Some(index) = board.selection.iter().position(|&selected| selected == id) {
                        board.selection.remove(index);
                    } else {
                        board.selection.push(id);
                    }
                }
                (Some(id), false) => {
                    if !board.is_selected(id) {
                        board.selection = vec![id];
                    }
                }
                (None, true) => {}
                (None, false) => board.selection.clear(),
            }
        }
        next.pointer_down(board, event);
    }

    fn key_down(&mut self, board: &mut Board, event: &KeyEvent, next: Next<'_>) {
        if event.is_escape() && board.resizing().is_none() {
            board.selection.clear();
        }
        next.key_down(board, event);
    }
}
