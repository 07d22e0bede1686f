//! Interactive form cells for notebook documents.
//!
//! Markdown cells whose metadata carries a `form_cell` classification are displayed with
//! their first list turned into radio buttons (single choice) or checkboxes with point
//! inputs (multiple choice). Selections and weights are written back to the metadata
//! and the point total is mirrored into the grading metadata.
//!
//! ```
//! use form_cells::{config::FormConfig, extension::FormCellsExtension, notebook::{Cell, ChangeValue, Notebook}};
//! use serde_json::json;
//!
//! let mut notebook = Notebook::new("/nbextensions/form_cells");
//! let metadata = json!({ "form_cell": { "type": "singlechoice", "choice": [] } });
//! notebook.push_cell(Cell::markdown("q1", "- A\n- B").with_metadata(metadata.as_object().unwrap().clone()));
//!
//! FormCellsExtension::new(FormConfig::default()).load(&mut notebook);
//! notebook.render_cell("q1").unwrap();
//! notebook.dispatch("q1", "form-q1-choice-1", ChangeValue::Checked(true)).unwrap();
//!
//! assert_eq!(form_cells::form::get_selections(notebook.cell("q1").unwrap().metadata()), vec!["1"]);
//! ```

pub mod config;
pub mod extension;
pub mod form;
pub mod notebook;
