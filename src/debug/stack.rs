//! Frame-pointer stack walking.
//!
//! With frame pointers enabled every frame starts with a two-word record:
//!
//! ```text
//! fp + 0*W  saved frame pointer of the caller (0 at the root)
//! fp + 1*W  return address
//! fp + 2*W  first word above the record (call arguments on stack-passing ABIs)
//! ```
//!
//! Memory is read through a [`WordReader`] so that a corrupted chain ends in
//! a reported read failure rather than a wild dereference.

use core::fmt;
use core::mem::size_of;
use core::ops::Range;

use crate::MonitorResult;
use crate::WORD_WIDTH;
use crate::config::monitor::{FRAME_ARGS, MAX_FRAMES};
use crate::error::MonitorError;

const WORD: usize = size_of::<usize>();

/// Bounds-checked word access to kernel memory.
pub trait WordReader {
    fn read_word(&self, addr: usize) -> MonitorResult<usize>;
}

/// Reads words of a live stack, refusing anything outside `range`.
pub struct StackReader {
    range: Range<usize>,
}

impl StackReader {
    /// # Safety
    ///
    /// Every aligned word in `range` must be mapped and readable for as long
    /// as the reader is used.
    pub const unsafe fn new(range: Range<usize>) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &Range<usize> {
        &self.range
    }
}

impl WordReader for StackReader {
    fn read_word(&self, addr: usize) -> MonitorResult<usize> {
        let in_range = addr
            .checked_add(WORD)
            .is_some_and(|end| addr >= self.range.start && end <= self.range.end);
        if addr % WORD != 0 || !in_range {
            anyhow::bail!(MonitorError::BadFrameRead(addr));
        }
        // SAFETY: aligned and inside the range promised readable by `new`.
        Ok(unsafe { core::ptr::read_volatile(addr as *const usize) })
    }
}

/// One frame of the call chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Frame pointer identifying this frame.
    pub fp: usize,
    /// Return address stored in the frame record.
    pub ra: usize,
    /// Raw words following the frame record.
    pub args: [usize; FRAME_ARGS],
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fp {:0w$x} ra {:0w$x} args", self.fp, self.ra, w = WORD_WIDTH)?;
        for arg in self.args {
            write!(f, " {arg:0w$x}", w = WORD_WIDTH)?;
        }
        Ok(())
    }
}

/// Iterates the frame chain from the innermost frame outwards.
///
/// Stops at a zero frame pointer. A read failure or exceeding
/// [`MAX_FRAMES`] yields one final `Err` and ends the iteration.
pub struct FrameWalker<'a, R: WordReader + ?Sized> {
    reader: &'a R,
    fp: usize,
    depth: usize,
    done: bool,
}

impl<'a, R: WordReader + ?Sized> FrameWalker<'a, R> {
    pub fn new(reader: &'a R, fp: usize) -> Self {
        Self {
            reader,
            fp,
            depth: 0,
            done: false,
        }
    }

    fn word(&self, index: usize) -> MonitorResult<usize> {
        let addr = index
            .checked_mul(WORD)
            .and_then(|off| self.fp.checked_add(off))
            .ok_or_else(|| anyhow::anyhow!(MonitorError::BadFrameRead(self.fp)))?;
        self.reader.read_word(addr)
    }

    fn read_frame(&self) -> MonitorResult<(Frame, usize)> {
        let saved_fp = self.word(0)?;
        let ra = self.word(1)?;
        let mut args = [0; FRAME_ARGS];
        for (i, arg) in args.iter_mut().enumerate() {
            *arg = self.word(2 + i)?;
        }
        Ok((
            Frame {
                fp: self.fp,
                ra,
                args,
            },
            saved_fp,
        ))
    }
}

impl<R: WordReader + ?Sized> Iterator for FrameWalker<'_, R> {
    type Item = MonitorResult<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.fp == 0 {
            return None;
        }
        if self.depth == MAX_FRAMES {
            self.done = true;
            return Some(Err(anyhow::anyhow!(MonitorError::FrameLimit(MAX_FRAMES))));
        }
        match self.read_frame() {
            Ok((frame, saved_fp)) => {
                self.fp = saved_fp;
                self.depth += 1;
                Some(Ok(frame))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
