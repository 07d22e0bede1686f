use serde_json::{Map, Value};

use super::element::{Element, Node};
use super::markdown;

/// A cell's metadata blob, persisted with the document.
pub type Metadata = Map<String, Value>;

pub const RENDERED_AREA_CLASS: &str = "rendered_html";
pub const TOOLBAR_CLASS: &str = "celltoolbar";
const INNER_CELL_CLASS: &str = "inner_cell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Markdown,
    Code,
}

#[derive(Debug, Clone)]
pub struct Cell {
    id: String,
    cell_type: CellType,
    source: String,
    metadata: Metadata,
    rendered: bool,
    element: Element,
}

impl Cell {
    pub fn new(id: impl Into<String>, cell_type: CellType, source: impl Into<String>) -> Self {
        let mut cell = Self {
            id: id.into(),
            cell_type,
            source: source.into(),
            metadata: Metadata::new(),
            rendered: false,
            element: Element::new("div")
                .with_class("cell")
                .with_child(Element::new("div").with_class(TOOLBAR_CLASS))
                .with_child(Element::new("div").with_class(INNER_CELL_CLASS)),
        };
        cell.show_source();
        cell
    }

    pub fn markdown(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(id, CellType::Markdown, source)
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Edits the raw source. Only visible once the cell is rendered again.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        if !self.rendered {
            self.show_source();
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut Element {
        &mut self.element
    }

    pub fn toolbar_mut(&mut self) -> Option<&mut Element> {
        self.element.find_by_class_mut(TOOLBAR_CLASS)
    }

    /// The `.rendered_html` area, present only while rendered.
    pub fn rendered_area(&self) -> Option<&Element> {
        self.element.find_by_class(RENDERED_AREA_CLASS)
    }

    pub fn rendered_area_mut(&mut self) -> Option<&mut Element> {
        self.element.find_by_class_mut(RENDERED_AREA_CLASS)
    }

    /// Host markdown rendering. Returns false when nothing changed: code cells never
    /// render, and an already rendered cell keeps its current markup.
    pub(crate) fn render_markdown(&mut self) -> bool {
        if self.cell_type != CellType::Markdown || self.rendered {
            return false;
        }

        let area = markdown::render(&self.source).with_class(RENDERED_AREA_CLASS);
        if let Some(inner) = self.element.find_by_class_mut(INNER_CELL_CLASS) {
            inner.replace_children(vec![Node::Element(area)]);
        }
        self.element.add_class("rendered");
        self.element.remove_class("unrendered");
        self.rendered = true;
        true
    }

    pub(crate) fn unrender_markdown(&mut self) -> bool {
        if !self.rendered {
            return false;
        }
        self.rendered = false;
        self.show_source();
        true
    }

    fn show_source(&mut self) {
        let editor = Element::new("textarea").with_text(self.source.clone());
        if let Some(inner) = self.element.find_by_class_mut(INNER_CELL_CLASS) {
            inner.replace_children(vec![Node::Element(editor)]);
        }
        self.element.add_class("unrendered");
        self.element.remove_class("rendered");
    }
}
