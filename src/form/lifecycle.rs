use std::rc::Rc;

use super::metadata::{self, FormKind};
use super::transform;
use crate::config::FormConfig;
use crate::notebook::{Cell, HostError, InputCapture, Notebook, RenderStage, UnrenderGuard};

pub const FORM_STAGE: &str = "form-cells";

/// Attaches the interactive controls right after the host renders a choice cell.
pub struct FormRenderStage {
    config: Rc<FormConfig>,
}

impl FormRenderStage {
    pub fn new(config: Rc<FormConfig>) -> Self {
        Self { config }
    }
}

impl RenderStage for FormRenderStage {
    fn name(&self) -> &str {
        FORM_STAGE
    }

    fn after_render(&self, cell: &mut Cell, capture: &mut dyn InputCapture) {
        match metadata::classify(cell.metadata()) {
            kind @ (FormKind::SingleChoice | FormKind::MultipleChoice) => {
                transform::make_controls(cell, kind, capture, &self.config);
            }
            FormKind::None => {}
        }
    }
}

/// Keeps displayed form cells displayed; only a forced un-render gets them back to
/// editing.
pub struct FormUnrenderGuard;

impl UnrenderGuard for FormUnrenderGuard {
    fn name(&self) -> &str {
        FORM_STAGE
    }

    fn permits_unrender(&self, cell: &Cell) -> bool {
        !metadata::is_form_cell(cell.metadata())
    }
}

pub fn install(notebook: &mut Notebook, config: Rc<FormConfig>) {
    let pipeline = notebook.pipeline_mut();
    pipeline.add_guard(Box::new(FormUnrenderGuard));
    pipeline.add_stage(Box::new(FormRenderStage::new(config)));
    tracing::debug!("form cell render hooks installed");
}

pub fn uninstall(notebook: &mut Notebook) {
    let pipeline = notebook.pipeline_mut();
    let stage = pipeline.remove_stage(FORM_STAGE);
    let guard = pipeline.remove_guard(FORM_STAGE);
    tracing::debug!(stage, guard, "form cell render hooks removed");
}

/// Removes the form classification. A displayed cell is cycled through editing and
/// back so its plain markup shows at once. Returns whether the cell was a form cell.
pub fn clear_form_metadata(notebook: &mut Notebook, cell_id: &str) -> Result<bool, HostError> {
    let cell = notebook
        .cell_mut(cell_id)
        .ok_or_else(|| HostError::UnknownCell(cell_id.to_string()))?;
    if !metadata::remove_form(cell.metadata_mut()) {
        return Ok(false);
    }
    if cell.is_rendered() {
        notebook.unrender_cell(cell_id)?;
        notebook.render_cell(cell_id)?;
    }
    Ok(true)
}
