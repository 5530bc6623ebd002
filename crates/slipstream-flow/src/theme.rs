//! Sharing the theme flag between the application and the animator.

use std::cell::Cell;
use std::rc::Rc;

use slipstream_core::Theme;

/// The application's handle on the current theme.
#[derive(Debug, Clone, Default)]
pub struct ThemeSignal(Rc<Cell<Theme>>);

impl ThemeSignal {
    pub fn new(theme: Theme) -> Self {
        Self(Rc::new(Cell::new(theme)))
    }

    pub fn get(&self) -> Theme {
        self.0.get()
    }

    pub fn set(&self, theme: Theme) {
        self.0.set(theme);
    }

    /// A read-only view for the animator.
    pub fn reader(&self) -> ThemeReader {
        ThemeReader(Rc::clone(&self.0))
    }
}

/// Read-only view of a [`ThemeSignal`].
#[derive(Debug, Clone)]
pub struct ThemeReader(Rc<Cell<Theme>>);

impl ThemeReader {
    pub fn get(&self) -> Theme {
        self.0.get()
    }
}
