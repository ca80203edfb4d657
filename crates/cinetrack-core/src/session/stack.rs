//! Per-user navigation stack.

use super::frame::Frame;
use crate::error::{CinetrackError, Result};
use serde::{Deserialize, Serialize};

/// An ordered stack of active dialog contexts, bottom = oldest.
///
/// The stack always holds at least one frame after initialization; popping
/// the last remaining frame is an invariant violation surfaced as
/// [`CinetrackError::EmptyStack`]. Mutation is purely in-memory;
/// persistence is the dialog engine's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStack {
    frames: Vec<Frame>,
}

impl NavigationStack {
    /// Creates a one-frame stack rooted at `root`.
    pub fn new(root: Frame) -> Self {
        Self { frames: vec![root] }
    }

    /// Appends a new frame. Existing frames' local data is untouched.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pops the top frame and pushes `frame` in one step; stack depth is
    /// unchanged.
    pub fn replace_top(&mut self, frame: Frame) -> Result<()> {
        let top = self
            .frames
            .last_mut()
            .ok_or(CinetrackError::EmptyStack)?;
        *top = frame;
        Ok(())
    }

    /// Clears the entire stack and starts a new one-frame stack.
    ///
    /// Used for "reset to start" transitions, e.g. returning to the movie
    /// list after any sub-flow.
    pub fn replace_from_bottom(&mut self, root: Frame) {
        self.frames.clear();
        self.frames.push(root);
    }

    /// Removes the top frame, discarding its local data.
    ///
    /// Fails with [`CinetrackError::EmptyStack`] when the stack holds one
    /// frame or fewer: there is always a root.
    pub fn pop(&mut self) -> Result<Frame> {
        if self.frames.len() <= 1 {
            return Err(CinetrackError::EmptyStack);
        }
        // Safe to unwrap: len > 1 was just checked
        Ok(self.frames.pop().unwrap())
    }

    /// Returns the current frame.
    pub fn top(&self) -> Result<&Frame> {
        self.frames.last().ok_or(CinetrackError::EmptyStack)
    }

    /// Returns the current frame mutably.
    pub fn top_mut(&mut self) -> Result<&mut Frame> {
        self.frames.last_mut().ok_or(CinetrackError::EmptyStack)
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
