//! Break/continue/fallthrough target stack.
//!
//! A C builder typically links these as a singly-linked stack frame per
//! nested loop/switch; a `Vec`-backed stack gives the same push/pop/
//! lookup-the-innermost-match behavior without the intrusive-list
//! plumbing, and is the natural Rust shape for a scope stack.

use alloc::string::String;
use alloc::vec::Vec;

use crate::entity::BlockId;

#[derive(Debug, Clone)]
pub struct TargetFrame {
    /// `break` target; `None` for frames that don't admit `break` (none in
    /// practice, but kept optional for the loop-lowering path's two-phase
    /// construction).
    pub break_: Option<BlockId>,
    /// `continue` target; `None` for `match`/`switch` frames.
    pub continue_: Option<BlockId>,
    /// `fallthrough` target; `None` for everything but `match` cases.
    pub fallthrough_: Option<BlockId>,
    /// The statement's label, if any, so labeled `break`/`continue` can
    /// find a non-innermost frame.
    pub label: Option<String>,
}

impl TargetFrame {
    pub fn new() -> Self {
        Self {
            break_: None,
            continue_: None,
            fallthrough_: None,
            label: None,
        }
    }

    pub fn labeled(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }
}

impl Default for TargetFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// A stack of nested break/continue/fallthrough scopes.
#[derive(Debug, Clone, Default)]
pub struct TargetList {
    frames: Vec<TargetFrame>,
}

impl TargetList {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: TargetFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<TargetFrame> {
        self.frames.pop()
    }

    pub fn innermost(&self) -> Option<&TargetFrame> {
        self.frames.last()
    }

    /// Find the frame a labeled `break`/`continue` refers to; falls back to
    /// the innermost frame when `label` is `None`.
    pub fn find(&self, label: Option<&str>) -> Option<&TargetFrame> {
        match label {
            Some(l) => self
                .frames
                .iter()
                .rev()
                .find(|f| f.label.as_deref() == Some(l)),
            None => self.innermost(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_frame_wins_when_unlabeled() {
        let mut list = TargetList::new();
        list.push(TargetFrame::new().labeled("outer".into()));
        list.push(TargetFrame {
            break_: Some(BlockId::new(9)),
            ..TargetFrame::new()
        });
        assert_eq!(list.find(None).unwrap().break_, Some(BlockId::new(9)));
    }

    #[test]
    fn labeled_lookup_skips_inner_unlabeled_frames() {
        let mut list = TargetList::new();
        list.push(TargetFrame {
            break_: Some(BlockId::new(1)),
            ..TargetFrame::new().labeled("outer".into())
        });
        list.push(TargetFrame {
            break_: Some(BlockId::new(2)),
            ..TargetFrame::new()
        });
        assert_eq!(list.find(Some("outer")).unwrap().break_, Some(BlockId::new(1)));
    }
}
