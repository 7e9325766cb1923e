//! Pointer-driven resizing of the selected element.
//!
//! [`WithResize`] owns the gesture state machine; a [`ResizeOptions`] implementation
//! decides which handle is under the pointer and what the element looks like for
//! a given pointer offset.

mod engine;
mod geometry_resize;
mod handle;
mod line_resize;

pub use engine::{
    move_point_by_zoom, resize_align, resize_origin_and_handle_point, resize_points, resize_zoom, ResizeAlignResult,
    ResizeHit, ResizeRef, ResizeState,
};
pub use geometry_resize::{resize_geometry, GeometryResize, ALIGN_OVERLAY_KEY};
pub use handle::{hit_rectangle_resize_handle, resize_handles, ResizeHandle, RESIZE_HANDLE_SIZE};
pub use line_resize::{LineResize, LineResizeHandle};

use crate::board::{Affinity, Board, Cursor, PathRefId, Transforms};
use crate::geometry::distance;
use crate::input::{KeyEvent, PointerEvent};
use crate::plugin::{BoardPlugin, Next};
use crate::shapes::{Element, ElementId};
use kurbo::Point;
use std::fmt::Debug;

/// Handle of an in-progress resize, as published on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveHandle {
    Rectangle(ResizeHandle),
    Line(LineResizeHandle),
}

impl From<ResizeHandle> for ActiveHandle {
    fn from(value: ResizeHandle) -> Self {
        ActiveHandle::Rectangle(value)
    }
}

impl From<LineResizeHandle> for ActiveHandle {
    fn from(value: LineResizeHandle) -> Self {
        ActiveHandle::Line(value)
    }
}

/// The resize gesture currently in progress on a board.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveResize {
    /// Key of the resize module driving the gesture.
    pub key: &'static str,
    pub element: ElementId,
    pub is_line: bool,
    pub handle: ActiveHandle,
}

/// How a resize gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Committed,
    Cancelled,
}

/// Element-specific half of a resize module.
pub trait ResizeOptions {
    type Handle: Copy + Debug + Into<ActiveHandle>;

    /// Identifies the module on the board while it resizes.
    fn key(&self) -> &'static str;

    fn can_resize(&self, _board: &Board) -> bool {
        true
    }

    /// Handle under `point` (document coordinates), if a resize can start there.
    fn hit_test(&self, board: &Board, point: Point) -> Option<ResizeHit<Self::Handle>>;

    /// The element as it would look for `state`. Live feedback goes into board overlays.
    fn on_resize(&mut self, board: &mut Board, resize_ref: &ResizeRef<Self::Handle>, state: &ResizeState) -> Option<Element>;

    /// Runs once when the gesture ends, whether it was committed or cancelled.
    fn after_resize(&mut self, _board: &mut Board, _resize_ref: &ResizeRef<Self::Handle>, _outcome: ResizeOutcome) {}
}

/// Whether `element` shows resize handles: single selection of that element on an editable board.
pub fn has_resize_handle(board: &Board, element: &Element) -> bool {
    !board.options.readonly
        && board.selection.len() == 1
        && board.is_selected(element.id())
        && (element.is_line() || element.angle() == 0.0)
}

/// Whether a resize gesture matching `predicate` is in progress.
pub fn is_resizing_by(board: &Board, predicate: impl Fn(&ActiveResize) -> bool) -> bool {
    board.resizing().is_some_and(predicate)
}

enum Phase<H> {
    Idle,
    Pressed {
        resize_ref: ResizeRef<H>,
        path_ref: PathRefId,
        start: Point,
        start_client: Point,
    },
    Resizing {
        resize_ref: ResizeRef<H>,
        path_ref: PathRefId,
        state: ResizeState,
        preview: Option<Element>,
    },
}

/// Drives a [`ResizeOptions`] module from pointer events.
pub struct WithResize<O: ResizeOptions> {
    options: O,
    phase: Phase<O::Handle>,
    hovering: bool,
}

impl<O: ResizeOptions> WithResize<O> {
    pub fn new(options: O) -> Self {
        Self {
            options,
            phase: Phase::Idle,
            hovering: false,
        }
    }

    pub fn options(&self) -> &O {
        &self.options
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.phase, Phase::Resizing { .. })
    }

    fn refresh(&mut self, board: &mut Board) {
        if let Phase::Resizing {
            resize_ref,
            state,
            preview,
            ..
        } = &mut self.phase
        {
            *preview = self.options.on_resize(board, resize_ref, state);
            match preview {
                Some(element) => board.set_preview(element.clone()),
                None => {
                    board.clear_preview(resize_ref.element.id());
                }
            }
        }
    }

    fn finish(&mut self, board: &mut Board, commit: bool) {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match phase {
            Phase::Idle => {}
            Phase::Pressed { path_ref, .. } => {
                board.unref(path_ref);
            }
            Phase::Resizing {
                resize_ref,
                path_ref,
                preview,
                ..
            } => {
                let id = resize_ref.element.id();
                board.clear_preview(id);
                let path = board.unref(path_ref);
                let mut outcome = ResizeOutcome::Cancelled;
                if commit {
                    match (preview, path) {
                        (Some(element), Some(path)) => match Transforms::set_node(board, element, path) {
                            Ok(()) => outcome = ResizeOutcome::Committed,
                            Err(err) => log::warn!("resize of {id} not applied: {err}"),
                        },
                        (_, None) => log::warn!("resized element {id} left the board during the gesture"),
                        (None, Some(_)) => {}
                    }
                }
                log::debug!("{} resize of {id}: {:?}", self.options.key(), outcome);
                self.options.after_resize(board, &resize_ref, outcome);
                board.end_resizing();
                board.cursor = Cursor::Default;
                self.hovering = false;
            }
        }
    }
}

impl<O: ResizeOptions> BoardPlugin for WithResize<O> {
    fn name(&self) -> &'static str {
        self.options.key()
    }

    fn pointer_down(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        if board.options.readonly || !self.options.can_resize(board) || !matches!(self.phase, Phase::Idle) {
            next.pointer_down(board, event);
            return;
        }
        let point = board.viewport.client_to_view_box(event.client_point());
        let Some(hit) = self.options.hit_test(board, point) else {
            next.pointer_down(board, event);
            return;
        };
        let Ok(path) = board.find_path(hit.element.id()) else {
            next.pointer_down(board, event);
            return;
        };
        let path_ref = board.path_ref(path.clone(), Affinity::Forward);
        self.phase = Phase::Pressed {
            resize_ref: ResizeRef::new(hit, path),
            path_ref,
            start: point,
            start_client: event.client_point(),
        };
    }

    fn pointer_move(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        let point = board.viewport.client_to_view_box(event.client_point());
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = match phase {
            Phase::Pressed {
                resize_ref,
                path_ref,
                start,
                start_client,
            } => {
                if distance(start_client, event.client_point()) <= board.options.drag_threshold {
                    self.phase = Phase::Pressed {
                        resize_ref,
                        path_ref,
                        start,
                        start_client,
                    };
                    next.pointer_move(board, event);
                    return;
                }
                log::debug!("{} resize of {} started", self.options.key(), resize_ref.element.id());
                board.start_resizing(ActiveResize {
                    key: self.options.key(),
                    element: resize_ref.element.id(),
                    is_line: resize_ref.element.is_line(),
                    handle: resize_ref.handle.into(),
                });
                board.cursor = resize_ref.cursor;
                Phase::Resizing {
                    resize_ref,
                    path_ref,
                    state: ResizeState {
                        start_point: start,
                        end_point: point,
                        is_shift: event.modifiers.shift,
                    },
                    preview: None,
                }
            }
            Phase::Resizing {
                resize_ref,
                path_ref,
                mut state,
                preview,
            } => {
                state.end_point = point;
                state.is_shift = event.modifiers.shift;
                Phase::Resizing {
                    resize_ref,
                    path_ref,
                    state,
                    preview,
                }
            }
            Phase::Idle => {
                if !board.options.readonly && board.resizing().is_none() {
                    match self.options.hit_test(board, point) {
                        Some(hit) => {
                            board.cursor = hit.cursor;
                            self.hovering = true;
                        }
                        None if self.hovering => {
                            board.cursor = Cursor::Default;
                            self.hovering = false;
                        }
                        None => {}
                    }
                }
                Phase::Idle
            }
        };
        if self.is_resizing() {
            self.refresh(board);
        }
        next.pointer_move(board, event);
    }

    fn pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        self.finish(board, true);
        next.pointer_up(board, event);
    }

    fn global_pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        self.finish(board, true);
        next.global_pointer_up(board, event);
    }

    fn pointer_cancel(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        self.finish(board, false);
        next.pointer_cancel(board, event);
    }

    fn key_down(&mut self, board: &mut Board, event: &KeyEvent, next: Next<'_>) {
        if self.is_resizing() {
            if event.is_escape() {
                self.finish(board, false);
                return;
            }
            if event.is_shift() {
                if let Phase::Resizing { state, .. } = &mut self.phase {
                    state.is_shift = true;
                }
                self.refresh(board);
            }
        }
        next.key_down(board, event);
    }

    fn key_up(&mut self, board: &mut Board, event: &KeyEvent, next: Next<'_>) {
        if self.is_resizing() && event.is_shift() {
            if let Phase::Resizing { state, .. } = &mut self.phase {
                state.is_shift = false;
            }
            self.refresh(board);
        }
        next.key_up(board, event);
    }
}
