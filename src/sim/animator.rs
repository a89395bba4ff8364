//! Frame-set animation state machine
//!
//! Each animated entity owns an `Animator` that walks an ordered set of
//! source-image frames. Frame sets are shared `Arc` slices so switching to
//! the set that is already active is an identity comparison and a no-op,
//! which keeps a looping animation from restarting every tick while the
//! caller keeps re-requesting the same state.

use std::sync::Arc;

/// A single source-image sub-rectangle of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Draw offset relative to the entity origin
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Frame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn with_offset(mut self, offset_x: f32, offset_y: f32) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }
}

/// An ordered, shared sequence of frames composing one animation.
pub type FrameSet = Arc<[Frame]>;

/// Playback mode for the active frame set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimMode {
    /// Cycle through the set, one step per elapsed delay
    Loop,
    /// Freeze on the current frame (single-frame idle poses)
    Hold,
}

/// Default ticks per frame step when none is given.
pub const DEFAULT_FRAME_DELAY: f32 = 10.0;

#[derive(Debug, Clone)]
pub struct Animator {
    frame_set: FrameSet,
    frame_index: usize,
    /// Ticks per frame step; fractional values below 1.0 step several
    /// frames per tick
    delay: f32,
    mode: AnimMode,
    /// Ticks accumulated since the last frame step
    count: f32,
}

impl Animator {
    /// Panics on an empty frame set or non-positive delay; level validation
    /// rejects empty sets before any animator is built.
    pub fn new(frame_set: FrameSet, delay: f32, mode: AnimMode) -> Self {
        assert!(!frame_set.is_empty(), "animator needs at least one frame");
        assert!(delay > 0.0, "frame delay must be positive");
        Self {
            frame_set,
            frame_index: 0,
            delay,
            mode,
            count: 0.0,
        }
    }

    /// The frame to render this tick.
    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame_set[self.frame_index]
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    #[inline]
    pub fn mode(&self) -> AnimMode {
        self.mode
    }

    /// Switch to a different frame set, starting at `start_index`.
    ///
    /// A no-op when `frame_set` is the identical shared set already playing,
    /// preserving the in-progress frame index and tick count.
    pub fn change_frame_set(
        &mut self,
        frame_set: &FrameSet,
        mode: AnimMode,
        delay: f32,
        start_index: usize,
    ) {
        if Arc::ptr_eq(&self.frame_set, frame_set) {
            return;
        }
        assert!(!frame_set.is_empty(), "animator needs at least one frame");
        assert!(delay > 0.0, "frame delay must be positive");
        debug_assert!(start_index < frame_set.len());

        self.frame_set = Arc::clone(frame_set);
        self.frame_index = start_index;
        self.delay = delay;
        self.mode = mode;
        self.count = 0.0;
    }

    /// Advance the animation by one tick. Only acts in `Loop` mode; the
    /// while-loop carries surplus counts over, so a delay smaller than one
    /// tick steps multiple frames in a single call.
    pub fn advance(&mut self) {
        if self.mode != AnimMode::Loop {
            return;
        }

        self.count += 1.0;
        while self.count >= self.delay {
            self.count -= self.delay;
            self.frame_index = (self.frame_index + 1) % self.frame_set.len();
        }
    }
}
