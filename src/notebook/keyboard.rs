use std::collections::BTreeSet;

use super::element::Element;

/// Host input-capture manager. Controls registered here keep focus while the user
/// types, instead of triggering global shortcuts.
pub trait InputCapture {
    fn register_events(&mut self, control: &Element);
}

#[derive(Debug, Default)]
pub struct KeyboardManager {
    registered: BTreeSet<String>,
}

impl KeyboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, control_id: &str) -> bool {
        self.registered.contains(control_id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }
}

impl InputCapture for KeyboardManager {
    fn register_events(&mut self, control: &Element) {
        match control.id() {
            Some(id) => {
                self.registered.insert(id.to_string());
            }
            None => tracing::trace!(tag = %control.tag, "ignoring control without id"),
        }
    }
}
