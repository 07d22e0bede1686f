//! Render and un-render pipeline for text cells.
//!
//! The host owns the base behavior; extensions hook into it by registering named
//! post-render stages and pre-un-render guards instead of replacing host methods.

use super::keyboard::InputCapture;
use super::Cell;

/// Runs after the host has produced a cell's markup.
pub trait RenderStage {
    fn name(&self) -> &str;
    fn after_render(&self, cell: &mut Cell, capture: &mut dyn InputCapture);
}

/// Consulted before a normal un-render; any refusal makes the un-render a no-op.
pub trait UnrenderGuard {
    fn name(&self) -> &str;
    fn permits_unrender(&self, cell: &Cell) -> bool;
}

#[derive(Default)]
pub struct RenderPipeline {
    post_render: Vec<Box<dyn RenderStage>>,
    guards: Vec<Box<dyn UnrenderGuard>>,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage, replacing any stage already registered under the same name.
    pub fn add_stage(&mut self, stage: Box<dyn RenderStage>) {
        self.remove_stage(stage.name());
        self.post_render.push(stage);
    }

    pub fn remove_stage(&mut self, name: &str) -> bool {
        let before = self.post_render.len();
        self.post_render.retain(|s| s.name() != name);
        self.post_render.len() != before
    }

    pub fn add_guard(&mut self, guard: Box<dyn UnrenderGuard>) {
        self.remove_guard(guard.name());
        self.guards.push(guard);
    }

    pub fn remove_guard(&mut self, name: &str) -> bool {
        let before = self.guards.len();
        self.guards.retain(|g| g.name() != name);
        self.guards.len() != before
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.post_render.iter().any(|s| s.name() == name)
    }

    pub fn has_guard(&self, name: &str) -> bool {
        self.guards.iter().any(|g| g.name() == name)
    }

    /// Renders the cell and runs every post-render stage in registration order.
    /// Returns false, running no stage, if the host had nothing to render.
    pub fn render(&self, cell: &mut Cell, capture: &mut dyn InputCapture) -> bool {
        if !cell.render_markdown() {
            return false;
        }
        for stage in &self.post_render {
            stage.after_render(cell, capture);
        }
        true
    }

    /// Normal un-render. Returns false when the cell stays displayed.
    pub fn unrender(&self, cell: &mut Cell) -> bool {
        if let Some(guard) = self.guards.iter().find(|g| !g.permits_unrender(cell)) {
            tracing::trace!(cell = cell.id(), guard = guard.name(), "un-render suppressed");
            return false;
        }
        cell.unrender_markdown()
    }

    /// Un-render bypassing every guard.
    pub fn unrender_force(&self, cell: &mut Cell) -> bool {
        cell.unrender_markdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notebook::KeyboardManager;

    struct Marker;

    impl RenderStage for Marker {
        fn name(&self) -> &str {
            "marker"
        }

        fn after_render(&self, cell: &mut Cell, _capture: &mut dyn InputCapture) {
            cell.metadata_mut().insert("marked".into(), true.into());
        }
    }

    struct Pinned;

    impl UnrenderGuard for Pinned {
        fn name(&self) -> &str {
            "pinned"
        }

        fn permits_unrender(&self, cell: &Cell) -> bool {
            !cell.metadata().contains_key("pinned")
        }
    }

    #[test]
    fn stages_run_after_render_only_on_transition() {
        let mut pipeline = RenderPipeline::new();
        pipeline.add_stage(Box::new(Marker));
        pipeline.add_stage(Box::new(Marker));
        let mut keyboard = KeyboardManager::new();
        let mut cell = Cell::markdown("c", "text");

        assert!(pipeline.render(&mut cell, &mut keyboard));
        assert_eq!(cell.metadata().get("marked"), Some(&serde_json::Value::Bool(true)));

        cell.metadata_mut().remove("marked");
        assert!(!pipeline.render(&mut cell, &mut keyboard));
        assert!(cell.metadata().get("marked").is_none());
    }

    #[test]
    fn guards_block_normal_unrender_but_not_forced() {
        let mut pipeline = RenderPipeline::new();
        pipeline.add_guard(Box::new(Pinned));
        let mut keyboard = KeyboardManager::new();
        let mut cell = Cell::markdown("c", "text");
        cell.metadata_mut().insert("pinned".into(), true.into());
        pipeline.render(&mut cell, &mut keyboard);

        assert!(!pipeline.unrender(&mut cell));
        assert!(cell.is_rendered());
        assert!(pipeline.unrender_force(&mut cell));
        assert!(!cell.is_rendered());
    }

    #[test]
    fn removed_guard_no_longer_applies() {
        let mut pipeline = RenderPipeline::new();
        pipeline.add_guard(Box::new(Pinned));
        assert!(pipeline.remove_guard("pinned"));
        assert!(!pipeline.has_guard("pinned"));
        let mut keyboard = KeyboardManager::new();
        let mut cell = Cell::markdown("c", "text");
        cell.metadata_mut().insert("pinned".into(), true.into());
        pipeline.render(&mut cell, &mut keyboard);
        assert!(pipeline.unrender(&mut cell));
    }
}
