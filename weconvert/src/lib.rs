//! WeConvert - Unit conversion form
//!
//! Ties the unit library to a single conversion form: the selection state
//! the user edits, and its markdown rendering.

mod config;
mod render;
mod selection;

pub use config::Settings;
pub use render::{NumberFormat, Renderer};
pub use selection::{FormView, SelectionState};

pub use weconvert_core::{ConvertError, ErrorReport};
pub use weconvert_units::{Category, ConversionUnit, UnitId};

/// Main WeConvert session: one form plus its renderer
pub struct WeConvert {
    state: SelectionState,
    renderer: Renderer,
}

impl WeConvert {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: SelectionState::for_category(settings.initial_category),
            renderer: Renderer::new().with_format(settings.number_format),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SelectionState {
        &mut self.state
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The form as markdown
    pub fn render(&self) -> String {
        self.renderer.render(&self.state)
    }
}

impl Default for WeConvert {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
