use std::io::{self, Write, stdout};

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use slipstream_core::{CellMetrics, Size};
use slipstream_flow::{Host, PixelCanvas};
use tracing::warn;

const REDUCED_MOTION_ENV: &str = "SLIPSTREAM_REDUCED_MOTION";

/// The terminal as an animation host: a half-block canvas for drawing and
/// mouse capture for pointer input.
#[derive(Debug)]
pub struct TerminalHost {
    viewport: Size,
    cell: CellMetrics,
    reduced_motion: bool,
    captured: bool,
}

impl TerminalHost {
    pub fn new(columns: u16, rows: u16, cell: CellMetrics, reduced_motion: bool) -> Self {
        Self {
            viewport: cell.logical_size(columns, rows),
            cell,
            reduced_motion,
            captured: false,
        }
    }
}

/// Any value other than empty, `0` or `false` asks for reduced motion.
pub fn reduced_motion_from_env() -> bool {
    std::env::var(REDUCED_MOTION_ENV)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

fn release_mouse<W: Write>(out: &mut W) -> io::Result<()> {
    crossterm::execute!(out, DisableMouseCapture)
}

impl Host for TerminalHost {
    type Surface = PixelCanvas;

    fn surface(&mut self) -> Option<PixelCanvas> {
        if self.viewport.is_empty() {
            return None;
        }
        Some(PixelCanvas::new(self.viewport, self.cell))
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn attach_listeners(&mut self) -> io::Result<()> {
        crossterm::execute!(stdout(), EnableMouseCapture)?;
        self.captured = true;
        Ok(())
    }

    fn detach_listeners(&mut self) {
        if !self.captured {
            return;
        }
        if let Err(err) = release_mouse(&mut stdout()) {
            warn!(%err, "failed to release mouse capture");
        }
        self.captured = false;
    }
}
