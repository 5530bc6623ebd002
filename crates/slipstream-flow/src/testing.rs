//! Test doubles for the surface and the host.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use slipstream_core::{BlendMode, Rgba, Size};

use crate::animator::Host;
use crate::surface::{Path, Region, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(Size),
    Blend(BlendMode),
    Fill(Region, Rgba),
    Stroke { color: Rgba, width: f32 },
}

/// Records every call instead of drawing.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub size: Size,
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    pub fn fills(&self) -> impl Iterator<Item = (&Region, &Rgba)> {
        self.ops.iter().filter_map(|op| match op {
            Op::Fill(region, color) => Some((region, color)),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter().filter(|op| matches!(op, Op::Stroke { .. }))
    }

    pub fn resizes(&self) -> impl Iterator<Item = &Size> {
        self.ops.iter().filter_map(|op| match op {
            Op::Resize(size) => Some(size),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        self.ops.push(Op::Resize(size));
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.ops.push(Op::Blend(mode));
    }

    fn fill_rect(&mut self, region: Region, color: Rgba) {
        self.ops.push(Op::Fill(region, color));
    }

    fn stroke(&mut self, _path: &Path, color: Rgba, width: f32) {
        self.ops.push(Op::Stroke { color, width });
    }
}

/// Listener bookkeeping shared with the test after the host moves into the
/// animator.
#[derive(Debug, Default)]
pub struct HostLog {
    pub attached: usize,
    pub detached: usize,
}

#[derive(Debug)]
pub struct TestHost {
    pub viewport: Size,
    pub reduced_motion: bool,
    pub has_surface: bool,
    pub fail_attach: bool,
    pub log: Rc<RefCell<HostLog>>,
}

impl TestHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            reduced_motion: false,
            has_surface: true,
            fail_attach: false,
            log: Rc::default(),
        }
    }
}

impl Host for TestHost {
    type Surface = RecordingSurface;

    fn surface(&mut self) -> Option<RecordingSurface> {
        self.has_surface.then(|| RecordingSurface::new(Size::default()))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn attach_listeners(&mut self) -> io::Result<()> {
        if self.fail_attach {
            return Err(io::Error::other("no pointer device"));
        }
        self.log.borrow_mut().attached += 1;
        Ok(())
    }

    fn detach_listeners(&mut self) {
        self.log.borrow_mut().detached += 1;
    }
}
