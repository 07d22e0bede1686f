mod cell;
mod element;
mod events;
mod keyboard;
pub mod markdown;
mod pipeline;

use thiserror::Error;

pub use cell::{Cell, CellType, Metadata, RENDERED_AREA_CLASS, TOOLBAR_CLASS};
pub use element::{ChangeValue, ControlEffect, Element, Listener, Node};
pub use events::{EventBus, HostEvent, SubscriptionId};
pub use keyboard::{InputCapture, KeyboardManager};
pub use pipeline::{RenderPipeline, RenderStage, UnrenderGuard};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    #[error("no cell with id '{0}'")]
    UnknownCell(String),

    #[error("cell '{cell}' has no control with id '{control}'")]
    UnknownControl { cell: String, control: String },
}

/// The open document: its cells plus the host services extensions talk to.
pub struct Notebook {
    cells: Vec<Cell>,
    pipeline: RenderPipeline,
    keyboard: KeyboardManager,
    events: EventBus,
    head: Element,
    base_url: String,
    kernel_ready: bool,
}

impl Notebook {
    /// `base_url` is where the module loader serves extension resources from.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            cells: Vec::new(),
            pipeline: RenderPipeline::new(),
            keyboard: KeyboardManager::new(),
            events: EventBus::default(),
            head: Element::new("head"),
            base_url: base_url.into(),
            kernel_ready: false,
        }
    }

    pub fn push_cell(&mut self, cell: Cell) -> &mut Cell {
        self.cells.push(cell);
        let last = self.cells.len() - 1;
        &mut self.cells[last]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id() == id)
    }

    pub fn cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.id() == id)
    }

    fn position(&self, id: &str) -> Result<usize, HostError> {
        self.cells
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| HostError::UnknownCell(id.to_string()))
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }

    pub fn keyboard(&self) -> &KeyboardManager {
        &self.keyboard
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn head(&self) -> &Element {
        &self.head
    }

    pub fn head_mut(&mut self) -> &mut Element {
        &mut self.head
    }

    /// Module loader URL resolution, relative to the extension base URL.
    pub fn to_url(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches("./");
        if self.base_url.is_empty() {
            return relative.to_string();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), relative)
    }

    pub fn render_cell(&mut self, id: &str) -> Result<bool, HostError> {
        let idx = self.position(id)?;
        Ok(self.pipeline.render(&mut self.cells[idx], &mut self.keyboard))
    }

    pub fn unrender_cell(&mut self, id: &str) -> Result<bool, HostError> {
        let idx = self.position(id)?;
        Ok(self.pipeline.unrender(&mut self.cells[idx]))
    }

    pub fn unrender_cell_force(&mut self, id: &str) -> Result<bool, HostError> {
        let idx = self.position(id)?;
        let cell = &mut self.cells[idx];
        tracing::debug!(cell = cell.id(), "forced un-render");
        Ok(self.pipeline.unrender_force(cell))
    }

    pub fn render_all(&mut self) {
        for cell in &mut self.cells {
            self.pipeline.render(cell, &mut self.keyboard);
        }
    }

    /// Delivers a change event to a control inside a cell, updating the control the way
    /// a browser would before its listener runs.
    pub fn dispatch(&mut self, cell_id: &str, control_id: &str, change: ChangeValue) -> Result<(), HostError> {
        let idx = self.position(cell_id)?;
        let cell = &mut self.cells[idx];

        let control = cell
            .element_mut()
            .find_by_id_mut(control_id)
            .ok_or_else(|| HostError::UnknownControl {
                cell: cell_id.to_string(),
                control: control_id.to_string(),
            })?;

        match &change {
            // browsers only fire `change` on a real transition
            ChangeValue::Checked(checked) if control.is_checked() == *checked => return Ok(()),
            ChangeValue::Checked(checked) => control.set_checked(*checked),
            ChangeValue::Input(value) => control.set_attr("value", value.clone()),
            ChangeValue::Click => {}
        }
        let listener = control.listener().cloned();
        let radio_group = match (control.attr("type"), control.attr("name"), &change) {
            (Some("radio"), Some(name), ChangeValue::Checked(true)) => Some(name.to_string()),
            _ => None,
        };

        if let Some(group) = radio_group {
            cell.element_mut().for_each_mut(&mut |e: &mut Element| {
                if e.attr("type") == Some("radio") && e.attr("name") == Some(group.as_str()) && e.id() != Some(control_id) {
                    e.set_checked(false);
                }
            });
        }

        let effect = listener.map_or(ControlEffect::Handled, |l| l.call(cell, &change));
        if effect == ControlEffect::ForceUnrender {
            tracing::debug!(cell = cell_id, control = control_id, "forced un-render requested");
            self.pipeline.unrender_force(cell);
        }
        Ok(())
    }

    pub fn is_kernel_ready(&self) -> bool {
        self.kernel_ready
    }

    /// Records a host event and runs its subscribers in subscription order.
    pub fn emit(&mut self, event: HostEvent) {
        if event == HostEvent::KernelReady {
            self.kernel_ready = true;
        }
        for handler in self.events.handlers_for(event) {
            (*handler)(self);
        }
    }
}
