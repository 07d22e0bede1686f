mod driver;
mod lifecycle;
mod metadata;
mod points;
mod transform;

pub use driver::render_all_form_cells;
pub use lifecycle::{
    clear_form_metadata, install, uninstall, FormRenderStage, FormUnrenderGuard, FORM_STAGE,
};
pub use metadata::{
    classify, get_selections, get_weights, is_form_cell, remove_form, set_kind, set_selections,
    set_weights, FormKind, Weight, FORM_METADATA_KEY,
};
pub use points::{
    declared_points, point_total, recompute_and_apply, GRADING_METADATA_KEY, POINTS_DISPLAY_CLASS,
};
pub use transform::{
    make_controls, parse_weight, ControlIds, CHECKBOX_FORM_CLASS, EDIT_BUTTON_CLASS,
    POINTS_INPUT_CLASS, RADIO_FORM_CLASS,
};
