//! Plugin chain: ordered interceptors around the board's input handlers.
//!
//! Each plugin sees an event first and decides whether to pass it on through
//! [`Next`]. The most recently registered plugin is the outermost one.

use crate::board::Board;
use crate::input::{BoardEvent, KeyEvent, PointerEvent};

/// The remainder of the chain below the current plugin.
pub struct Next<'a> {
    rest: &'a mut [Box<dyn BoardPlugin>],
}

macro_rules! forward {
    ($name:ident, $event:ty) => {
        pub fn $name(self, board: &mut Board, event: &$event) {
            if let Some((inner, rest)) = self.rest.split_last_mut() {
                inner.$name(board, event, Next { rest });
            }
        }
    };
}

impl Next<'_> {
    forward!(pointer_down, PointerEvent);
    forward!(pointer_move, PointerEvent);
    forward!(pointer_up, PointerEvent);
    forward!(global_pointer_up, PointerEvent);
    forward!(pointer_cancel, PointerEvent);
    forward!(key_down, KeyEvent);
    forward!(key_up, KeyEvent);
}

/// An interceptor on the board's input handlers. Every handler passes through by default.
pub trait BoardPlugin {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn pointer_down(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        next.pointer_down(board, event);
    }

    fn pointer_move(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        next.pointer_move(board, event);
    }

    fn pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        next.pointer_up(board, event);
    }

    fn global_pointer_up(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        next.global_pointer_up(board, event);
    }

    fn pointer_cancel(&mut self, board: &mut Board, event: &PointerEvent, next: Next<'_>) {
        next.pointer_cancel(board, event);
    }

    fn key_down(&mut self, board: &mut Board, event: &KeyEvent, next: Next<'_>) {
        next.key_down(board, event);
    }

    fn key_up(&mut self, board: &mut Board, event: &KeyEvent, next: Next<'_>) {
        next.key_up(board, event);
    }
}

/// A board together with its plugin chain.
pub struct BoardHost {
    pub board: Board,
    plugins: Vec<Box<dyn BoardPlugin>>,
}

impl BoardHost {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            plugins: Vec::new(),
        }
    }

    /// Wrap the current chain with `plugin`.
    pub fn register(&mut self, plugin: impl BoardPlugin + 'static) {
        log::debug!("registering plugin {}", plugin.name());
        self.plugins.push(Box::new(plugin));
    }

    pub fn with_plugin(mut self, plugin: impl BoardPlugin + 'static) -> Self {
        self.register(plugin);
        self
    }

    /// Plugin names from outermost to innermost.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().rev().map(|plugin| plugin.name()).collect()
    }

    /// Run `event` through the chain without flushing.
    pub fn dispatch(&mut self, event: &BoardEvent) {
        let next = Next { rest: &mut self.plugins };
        let board = &mut self.board;
        match event {
            BoardEvent::PointerDown(e) => next.pointer_down(board, e),
            BoardEvent::PointerMove(e) => next.pointer_move(board, e),
            BoardEvent::PointerUp(e) => next.pointer_up(board, e),
            BoardEvent::GlobalPointerUp(e) => next.global_pointer_up(board, e),
            BoardEvent::PointerCancel(e) => next.pointer_cancel(board, e),
            BoardEvent::KeyDown(e) => next.key_down(board, e),
            BoardEvent::KeyUp(e) => next.key_up(board, e),
        }
    }

    /// Run `event` through the chain, then flush pending operations.
    /// Returns whether the event produced a flushed batch.
    pub fn handle(&mut self, event: &BoardEvent) -> bool {
        self.dispatch(event);
        self.board.flush()
    }
}
