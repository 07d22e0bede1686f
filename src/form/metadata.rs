//! Reads and writes the form-cell part of a cell's metadata blob.
//!
//! Layout, under the `form_cell` key:
//! `{ "type": "singlechoice" | "multiplechoice", "choice": ["0", ...], "weights": [-1, 2, ...] }`
//!
//! Writes are direct and unvalidated; callers keep selections and weight signs in step.

use serde_json::{Map, Value};

use crate::notebook::Metadata;

pub const FORM_METADATA_KEY: &str = "form_cell";
const TYPE_FIELD: &str = "type";
const CHOICE_FIELD: &str = "choice";
const WEIGHTS_FIELD: &str = "weights";

/// One weight per option. `None` marks a non-numeric entry, persisted as `null`.
pub type Weight = Option<i64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    None,
    SingleChoice,
    MultipleChoice,
}

impl FormKind {
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "singlechoice" => FormKind::SingleChoice,
            "multiplechoice" => FormKind::MultipleChoice,
            _ => FormKind::None,
        }
    }

    pub fn type_tag(self) -> Option<&'static str> {
        match self {
            FormKind::None => None,
            FormKind::SingleChoice => Some("singlechoice"),
            FormKind::MultipleChoice => Some("multiplechoice"),
        }
    }

    pub fn is_choice(self) -> bool {
        !matches!(self, FormKind::None)
    }
}

/// True when the `form_cell` key exists, whatever it holds.
pub fn is_form_cell(metadata: &Metadata) -> bool {
    metadata.contains_key(FORM_METADATA_KEY)
}

pub fn classify(metadata: &Metadata) -> FormKind {
    metadata
        .get(FORM_METADATA_KEY)
        .and_then(|form| form.get(TYPE_FIELD))
        .and_then(Value::as_str)
        .map_or(FormKind::None, FormKind::from_type_tag)
}

/// Replaces any existing form metadata with a bare classification; `FormKind::None`
/// removes the key.
pub fn set_kind(metadata: &mut Metadata, kind: FormKind) {
    match kind.type_tag() {
        Some(tag) => {
            let mut form = Map::new();
            form.insert(TYPE_FIELD.to_string(), Value::from(tag));
            metadata.insert(FORM_METADATA_KEY.to_string(), Value::Object(form));
        }
        None => {
            metadata.remove(FORM_METADATA_KEY);
        }
    }
}

/// Drops the `form_cell` key. Returns whether it was present.
pub fn remove_form(metadata: &mut Metadata) -> bool {
    metadata.remove(FORM_METADATA_KEY).is_some()
}

fn choice_field<'a>(metadata: &'a Metadata, field: &str) -> Option<&'a Vec<Value>> {
    if !classify(metadata).is_choice() {
        return None;
    }
    metadata
        .get(FORM_METADATA_KEY)
        .and_then(|form| form.get(field))
        .and_then(Value::as_array)
}

fn form_object_mut(metadata: &mut Metadata) -> Option<&mut Map<String, Value>> {
    metadata
        .get_mut(FORM_METADATA_KEY)
        .and_then(Value::as_object_mut)
}

/// Selected option indices, as strings. Empty for non-choice cells.
pub fn get_selections(metadata: &Metadata) -> Vec<String> {
    choice_field(metadata, CHOICE_FIELD)
        .map(|choices| {
            choices
                .iter()
                .filter_map(|c| match c {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Per-option weights. Empty for non-choice cells.
pub fn get_weights(metadata: &Metadata) -> Vec<Weight> {
    choice_field(metadata, WEIGHTS_FIELD)
        .map(|weights| weights.iter().map(Value::as_i64).collect())
        .unwrap_or_default()
}

pub fn set_selections(metadata: &mut Metadata, selections: &[String]) {
    if let Some(form) = form_object_mut(metadata) {
        form.insert(
            CHOICE_FIELD.to_string(),
            selections.iter().cloned().map(Value::from).collect(),
        );
    }
}

/// The stored array under `field`, created empty when missing or not an array.
fn array_field_mut<'a>(metadata: &'a mut Metadata, field: &str) -> Option<&'a mut Vec<Value>> {
    let entry = form_object_mut(metadata)?
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !entry.is_array() {
        *entry = Value::Array(Vec::new());
    }
    entry.as_array_mut()
}

fn is_selection(entry: &Value, selection: &str) -> bool {
    match entry {
        Value::String(s) => s == selection,
        Value::Number(n) => n.to_string() == selection,
        _ => false,
    }
}

pub fn push_selection(metadata: &mut Metadata, selection: String) {
    if let Some(choices) = array_field_mut(metadata, CHOICE_FIELD) {
        choices.push(Value::from(selection));
    }
}

/// Removes the first occurrence of `selection`. Returns whether one was found.
pub fn remove_selection(metadata: &mut Metadata, selection: &str) -> bool {
    let Some(choices) = form_object_mut(metadata)
        .and_then(|form| form.get_mut(CHOICE_FIELD))
        .and_then(Value::as_array_mut)
    else {
        return false;
    };
    match choices.iter().position(|c| is_selection(c, selection)) {
        Some(idx) => {
            choices.remove(idx);
            true
        }
        None => false,
    }
}

pub fn set_weights(metadata: &mut Metadata, weights: &[Weight]) {
    if let Some(form) = form_object_mut(metadata) {
        form.insert(
            WEIGHTS_FIELD.to_string(),
            weights.iter().map(|w| w.map_or(Value::Null, Value::from)).collect(),
        );
    }
}

/// Writes a single weight, padding the array with `null` when `index` is past its end.
/// Other entries are left as stored.
pub fn set_weight(metadata: &mut Metadata, index: usize, weight: Weight) {
    if let Some(weights) = array_field_mut(metadata, WEIGHTS_FIELD) {
        if weights.len() <= index {
            weights.resize(index + 1, Value::Null);
        }
        weights[index] = weight.map_or(Value::Null, Value::from);
    }
}
