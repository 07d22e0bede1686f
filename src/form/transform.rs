//! Turns the first list of a rendered form cell into radio buttons or checkboxes.

use std::sync::OnceLock;

use regex::Regex;

use super::metadata::{self, FormKind, Weight};
use super::points;
use crate::config::FormConfig;
use crate::notebook::{
    Cell, ChangeValue, ControlEffect, Element, InputCapture, Listener, Node,
};

pub const RADIO_FORM_CLASS: &str = "hbrs_radio";
pub const CHECKBOX_FORM_CLASS: &str = "hbrs_checkbox";
pub const POINTS_INPUT_CLASS: &str = "hbrs_points";
pub const EDIT_BUTTON_CLASS: &str = "hbrs_unrender";

const SPACER: &str = "\u{a0}\u{a0}";

/// Control names and ids of one cell. Derived from the cell id so that several form
/// cells rendered side by side never share a radio group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlIds {
    group: String,
}

impl ControlIds {
    pub fn for_cell(cell_id: &str) -> Self {
        let mut slugger = github_slugger::Slugger::default();
        Self {
            group: format!("form-{}", slugger.slug(cell_id)),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn choice(&self, index: usize) -> String {
        format!("{}-choice-{}", self.group, index)
    }

    pub fn points(&self, index: usize) -> String {
        format!("{}-points-{}", self.group, index)
    }

    pub fn edit(&self) -> String {
        format!("{}-edit", self.group)
    }
}

/// Integer prefix of a typed value: optional whitespace, sign and leading digits.
/// `None` when there are no digits.
pub fn parse_weight(input: &str) -> Weight {
    static INTEGER_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = INTEGER_PREFIX.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid regex"));
    re.captures(input)
        .and_then(|caps| caps[1].trim_start_matches('+').parse::<i64>().ok())
}

fn is_list(e: &Element) -> bool {
    e.tag == "ul" || e.tag == "ol"
}

/// Replaces the first list in the cell's rendered area with interactive controls and
/// appends the edit button. Returns the number of options, or `None` when the cell has
/// no list (the edit button is still added).
pub fn make_controls(
    cell: &mut Cell,
    kind: FormKind,
    capture: &mut dyn InputCapture,
    config: &FormConfig,
) -> Option<usize> {
    let ids = ControlIds::for_cell(cell.id());
    let option_count = cell
        .rendered_area()?
        .find(&is_list)
        .map(|list| list.child_elements().filter(|e| e.tag == "li").count());

    if let Some(count) = option_count {
        let selections = metadata::get_selections(cell.metadata());
        let mut weights = metadata::get_weights(cell.metadata());
        if weights.len() < count {
            tracing::debug!(cell = cell.id(), count, found = weights.len(), "resetting weights");
            weights = vec![Some(-1); count];
            metadata::set_weights(cell.metadata_mut(), &weights);
        }

        let area = cell.rendered_area_mut()?;
        if let Some(list) = area.find_mut(&is_list) {
            let items = list
                .take_children()
                .into_iter()
                .filter_map(|node| match node {
                    Node::Element(e) if e.tag == "li" => Some(e),
                    _ => None,
                })
                .collect::<Vec<Element>>();

            let mut form = match kind {
                FormKind::MultipleChoice => Element::new("form").with_class(CHECKBOX_FORM_CLASS),
                _ => Element::new("form").with_class(RADIO_FORM_CLASS),
            };
            for (index, mut item) in items.into_iter().enumerate() {
                let selected = selections.contains(&index.to_string());
                let row = match kind {
                    FormKind::MultipleChoice => {
                        let weight = weights.get(index).copied().flatten();
                        checkbox_row(&ids, index, selected, weight, item.take_children(), capture, config)
                    }
                    _ => radio_row(&ids, index, selected, item.take_children(), capture),
                };
                form.append(row);
            }
            *list = form;
        }
        tracing::debug!(cell = cell.id(), ?kind, count, "form controls attached");
    } else {
        tracing::debug!(cell = cell.id(), "form cell has no option list");
    }

    let edit_button = Element::new("button")
        .with_attr("type", "button")
        .with_attr("id", ids.edit())
        .with_class(EDIT_BUTTON_CLASS)
        .with_text(config.edit_label.clone())
        .with_listener(Listener::new(|_, _| ControlEffect::ForceUnrender));
    cell.rendered_area_mut()?.append(edit_button);

    option_count
}

fn option_input(kind: &str, ids: &ControlIds, index: usize, selected: bool) -> Element {
    let mut input = Element::new("input")
        .with_attr("type", kind)
        .with_attr("name", ids.group())
        .with_attr("value", index.to_string())
        .with_attr("id", ids.choice(index));
    input.set_checked(selected);
    input
}

fn radio_row(
    ids: &ControlIds,
    index: usize,
    selected: bool,
    label: Vec<Node>,
    capture: &mut dyn InputCapture,
) -> Element {
    let input = option_input("radio", ids, index, selected).with_listener(Listener::new(
        move |cell, change| {
            if change.checked() == Some(true) {
                metadata::set_selections(cell.metadata_mut(), &[index.to_string()]);
            }
            ControlEffect::Handled
        },
    ));
    capture.register_events(&input);

    let mut row = Element::new("div").with_child(input).with_text(SPACER);
    for node in label {
        row.append(node);
    }
    row
}

fn checkbox_row(
    ids: &ControlIds,
    index: usize,
    selected: bool,
    weight: Weight,
    label: Vec<Node>,
    capture: &mut dyn InputCapture,
    config: &FormConfig,
) -> Element {
    let points_id = ids.points(index);
    let points_input = Element::new("input")
        .with_attr("type", "number")
        .with_attr("id", points_id.clone())
        .with_attr("value", weight.map(|w| w.to_string()).unwrap_or_default())
        .with_class(POINTS_INPUT_CLASS)
        .with_listener(Listener::new(move |cell, change| {
            if let ChangeValue::Input(typed) = change {
                metadata::set_weight(cell.metadata_mut(), index, parse_weight(typed));
                points::recompute_and_apply(cell);
            }
            ControlEffect::Handled
        }));

    let checkbox = option_input("checkbox", ids, index, selected).with_listener(Listener::new(
        move |cell, change| {
            if let Some(checked) = change.checked() {
                toggle_option(cell, index, checked, &points_id);
            }
            ControlEffect::Handled
        },
    ));

    capture.register_events(&points_input);
    capture.register_events(&checkbox);

    let mut row = Element::new("div").with_child(checkbox).with_text(SPACER);
    for node in label {
        row.append(node);
    }
    row.with_text(SPACER)
        .with_child(points_input)
        .with_text(config.points_label.clone())
}

/// Keeps the weight sign in step with the checkbox: checked options count, unchecked
/// ones don't. Magnitudes never change here; a weight with no positive counterpart
/// (`i64::MIN`) is left alone.
fn toggle_option(cell: &mut Cell, index: usize, checked: bool, points_id: &str) {
    let weight = metadata::get_weights(cell.metadata())
        .get(index)
        .copied()
        .flatten();
    let flip = match weight {
        Some(w) if checked && w < 0 => w.checked_neg(),
        Some(w) if !checked && w > 0 => w.checked_neg(),
        _ => None,
    };

    if let Some(flipped) = flip {
        metadata::set_weight(cell.metadata_mut(), index, Some(flipped));
        if let Some(input) = cell.element_mut().find_by_id_mut(points_id) {
            input.set_attr("value", flipped.to_string());
        }
    }

    if checked {
        metadata::push_selection(cell.metadata_mut(), index.to_string());
    } else {
        metadata::remove_selection(cell.metadata_mut(), &index.to_string());
    }
    points::recompute_and_apply(cell);
}
