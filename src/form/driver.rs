use super::metadata;
use crate::notebook::Notebook;

/// Cycles every displayed form cell through a forced un-render and a render so its
/// controls match the persisted metadata. Returns how many cells were re-rendered.
pub fn render_all_form_cells(notebook: &mut Notebook) -> usize {
    let ids = notebook
        .cells()
        .iter()
        .filter(|c| metadata::is_form_cell(c.metadata()) && c.is_rendered())
        .map(|c| c.id().to_string())
        .collect::<Vec<String>>();

    let mut count = 0;
    for id in &ids {
        match notebook
            .unrender_cell_force(id)
            .and_then(|_| notebook.render_cell(id))
        {
            Ok(_) => count += 1,
            Err(err) => tracing::warn!(cell = %id, %err, "form cell not re-rendered"),
        }
    }

    tracing::info!(count, "form cells re-rendered");
    count
}
