use form_cells::config::FormConfig;
use form_cells::extension::FormCellsExtension;
use form_cells::form::{self, ControlIds, POINTS_DISPLAY_CLASS};
use form_cells::notebook::{Cell, ChangeValue, Element, HostEvent, Metadata, Notebook};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn object(value: Value) -> Metadata {
    value.as_object().cloned().expect("metadata must be an object")
}

fn loaded_notebook(cells: Vec<Cell>) -> (Notebook, FormCellsExtension) {
    let mut nb = Notebook::new("/nbextensions/form_cells");
    for cell in cells {
        nb.push_cell(cell);
    }
    let mut ext = FormCellsExtension::new(FormConfig::default());
    ext.load(&mut nb);
    (nb, ext)
}

fn metadata<'a>(nb: &'a Notebook, id: &str) -> &'a Metadata {
    nb.cell(id).expect("cell exists").metadata()
}

fn points_value(nb: &Notebook, id: &str, index: usize) -> String {
    let control = ControlIds::for_cell(id).points(index);
    nb.cell(id)
        .and_then(|c| c.element().find_by_id(&control))
        .and_then(|e| e.attr("value"))
        .unwrap_or_default()
        .to_string()
}

fn check(nb: &mut Notebook, id: &str, index: usize, checked: bool) {
    let control = ControlIds::for_cell(id).choice(index);
    nb.dispatch(id, &control, ChangeValue::Checked(checked)).unwrap();
}

#[test]
fn single_choice_keeps_only_latest_answer() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- A\n- B\n- C")
        .with_metadata(object(json!({ "form_cell": { "type": "singlechoice", "choice": [] } })))]);
    nb.render_cell("q").unwrap();

    check(&mut nb, "q", 1, true);
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["1"]);

    check(&mut nb, "q", 2, true);
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["2"]);

    let radios = nb
        .cell("q")
        .unwrap()
        .element()
        .find_all(&|e: &Element| e.attr("type") == Some("radio"));
    assert_eq!(
        radios.iter().map(|r| r.is_checked()).collect::<Vec<bool>>(),
        vec![false, false, true]
    );
}

#[test]
fn multiple_choice_scoring_scenario() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- yes\n- no").with_metadata(object(
        json!({
            "form_cell": { "type": "multiplechoice", "choice": [], "weights": [-3, -2] },
            "nbgrader": { "points": 0 }
        }),
    ))]);
    nb.cell_mut("q")
        .unwrap()
        .toolbar_mut()
        .unwrap()
        .append(Element::new("input").with_class(POINTS_DISPLAY_CLASS));
    nb.render_cell("q").unwrap();

    let display = |nb: &Notebook| {
        nb.cell("q")
            .unwrap()
            .element()
            .find_by_class(POINTS_DISPLAY_CLASS)
            .and_then(|e| e.attr("value"))
            .map(str::to_string)
    };

    check(&mut nb, "q", 0, true);
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(3), Some(-2)]);
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(3)));
    assert_eq!(display(&nb).as_deref(), Some("3"));
    assert_eq!(points_value(&nb, "q", 0), "3");

    check(&mut nb, "q", 1, true);
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(3), Some(2)]);
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(5)));

    check(&mut nb, "q", 0, false);
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(-3), Some(2)]);
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(2)));
    assert_eq!(display(&nb).as_deref(), Some("2"));
    assert_eq!(points_value(&nb, "q", 0), "-3");
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["1"]);
}

#[test]
fn toggle_on_then_off_restores_weight_and_selection() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b\n- c")
        .with_metadata(object(json!({
            "form_cell": { "type": "multiplechoice", "choice": ["2"], "weights": [-4, -1, 6] }
        })))]);
    nb.render_cell("q").unwrap();

    check(&mut nb, "q", 1, true);
    check(&mut nb, "q", 1, false);

    assert_eq!(
        form::get_weights(metadata(&nb, "q")),
        vec![Some(-4), Some(-1), Some(6)]
    );
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["2"]);
}

#[test]
fn point_edits_are_stored_verbatim() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b").with_metadata(object(
        json!({
            "form_cell": { "type": "multiplechoice", "weights": [-1, -1] },
            "nbgrader": { "points": 0 }
        }),
    ))]);
    nb.render_cell("q").unwrap();
    let ids = ControlIds::for_cell("q");

    // unchecked option with a positive weight still counts
    nb.dispatch("q", &ids.points(1), ChangeValue::Input("4".into())).unwrap();
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(-1), Some(4)]);
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(4)));

    nb.dispatch("q", &ids.points(1), ChangeValue::Input("lots".into())).unwrap();
    assert_eq!(metadata(&nb, "q")["form_cell"]["weights"], json!([-1, null]));
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(0)));

    // checking an option whose weight is non-numeric leaves the weight alone
    check(&mut nb, "q", 1, true);
    assert_eq!(metadata(&nb, "q")["form_cell"]["weights"], json!([-1, null]));
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["1"]);
}

#[test]
fn backfill_on_first_render() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b\n- c")
        .with_metadata(object(json!({ "form_cell": { "type": "multiplechoice" } })))]);
    nb.render_cell("q").unwrap();
    assert_eq!(metadata(&nb, "q")["form_cell"]["weights"], json!([-1, -1, -1]));
}

#[test]
fn edit_button_forces_editable_state() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a")
        .with_metadata(object(json!({ "form_cell": { "type": "singlechoice" } })))]);
    nb.render_cell("q").unwrap();

    assert!(!nb.unrender_cell("q").unwrap());
    assert!(nb.cell("q").unwrap().is_rendered());

    let edit = ControlIds::for_cell("q").edit();
    nb.dispatch("q", &edit, ChangeValue::Click).unwrap();
    assert!(!nb.cell("q").unwrap().is_rendered());
}

#[test]
fn cells_have_independent_radio_groups() {
    let single = || object(json!({ "form_cell": { "type": "singlechoice" } }));
    let (mut nb, _ext) = loaded_notebook(vec![
        Cell::markdown("first", "- a\n- b").with_metadata(single()),
        Cell::markdown("second", "- a\n- b").with_metadata(single()),
    ]);
    nb.render_all();

    check(&mut nb, "first", 0, true);
    check(&mut nb, "second", 1, true);

    assert_eq!(form::get_selections(metadata(&nb, "first")), vec!["0"]);
    assert_eq!(form::get_selections(metadata(&nb, "second")), vec!["1"]);
    let first_checked = nb
        .cell("first")
        .unwrap()
        .element()
        .find_by_id(&ControlIds::for_cell("first").choice(0))
        .unwrap()
        .is_checked();
    assert!(first_checked);
}

#[test]
fn kernel_ready_rerenders_with_latest_metadata() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b")
        .with_metadata(object(json!({ "form_cell": { "type": "singlechoice", "choice": [] } })))]);
    nb.render_cell("q").unwrap();

    // metadata changed behind the displayed controls, e.g. by a collaborator
    form::set_selections(nb.cell_mut("q").unwrap().metadata_mut(), &["1".to_string()]);
    nb.emit(HostEvent::KernelReady);

    let checked = nb
        .cell("q")
        .unwrap()
        .element()
        .find_by_id(&ControlIds::for_cell("q").choice(1))
        .unwrap()
        .is_checked();
    assert!(checked);
}

#[test]
fn load_after_kernel_ready_renders_existing_form_cells() {
    let mut nb = Notebook::new("");
    nb.push_cell(
        Cell::markdown("q", "- a")
            .with_metadata(object(json!({ "form_cell": { "type": "multiplechoice" } }))),
    );
    nb.render_all();
    nb.emit(HostEvent::KernelReady);

    FormCellsExtension::new(FormConfig::default()).load(&mut nb);

    let cell = nb.cell("q").unwrap();
    assert!(cell.element().find_by_class(form::CHECKBOX_FORM_CLASS).is_some());
    assert_eq!(cell.metadata()["form_cell"]["weights"], json!([-1]));
    assert!(nb.keyboard().is_registered(&ControlIds::for_cell("q").choice(0)));
}

#[test]
fn set_kind_then_render_switches_variant() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b")
        .with_metadata(object(json!({ "form_cell": { "type": "singlechoice", "choice": ["0"] } })))]);
    nb.render_cell("q").unwrap();

    form::set_kind(nb.cell_mut("q").unwrap().metadata_mut(), form::FormKind::MultipleChoice);
    form::render_all_form_cells(&mut nb);

    let cell = nb.cell("q").unwrap();
    assert!(cell.element().find_by_class(form::CHECKBOX_FORM_CLASS).is_some());
    assert!(form::get_selections(cell.metadata()).is_empty());
}

#[test]
fn huge_point_values_do_not_overflow() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b").with_metadata(object(
        json!({
            "form_cell": { "type": "multiplechoice", "weights": [-1, -1] },
            "nbgrader": { "points": 0 }
        }),
    ))]);
    nb.render_cell("q").unwrap();
    let ids = ControlIds::for_cell("q");

    nb.dispatch("q", &ids.points(0), ChangeValue::Input(i64::MAX.to_string())).unwrap();
    nb.dispatch("q", &ids.points(1), ChangeValue::Input("5".into())).unwrap();
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(i64::MAX)));

    nb.dispatch("q", &ids.points(0), ChangeValue::Input(i64::MIN.to_string())).unwrap();
    check(&mut nb, "q", 0, true);
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(i64::MIN), Some(5)]);
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["0"]);
    assert_eq!(form::declared_points(metadata(&nb, "q")), Some(&json!(5)));
}

#[test]
fn repeated_check_does_not_duplicate_selection() {
    let (mut nb, _ext) = loaded_notebook(vec![Cell::markdown("q", "- a\n- b").with_metadata(object(
        json!({ "form_cell": { "type": "multiplechoice", "choice": [], "weights": [-2, -1] } }),
    ))]);
    nb.render_cell("q").unwrap();

    check(&mut nb, "q", 0, true);
    check(&mut nb, "q", 0, true);
    assert_eq!(form::get_selections(metadata(&nb, "q")), vec!["0"]);
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(2), Some(-1)]);

    check(&mut nb, "q", 0, false);
    check(&mut nb, "q", 0, false);
    assert!(form::get_selections(metadata(&nb, "q")).is_empty());
    assert_eq!(form::get_weights(metadata(&nb, "q")), vec![Some(-2), Some(-1)]);
}
