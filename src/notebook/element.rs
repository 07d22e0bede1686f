use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::Cell;

/// Value carried by a change event on an interactive control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeValue {
    /// radio buttons and checkboxes
    Checked(bool),
    /// text and number inputs, the raw typed value
    Input(String),
    /// buttons
    Click,
}

impl ChangeValue {
    pub fn checked(&self) -> Option<bool> {
        match self {
            ChangeValue::Checked(checked) => Some(*checked),
            _ => None,
        }
    }
}

/// What the host should do once a control listener has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    Handled,
    ForceUnrender,
}

/// Change handler attached to an interactive control.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&mut Cell, &ChangeValue) -> ControlEffect>);

impl Listener {
    pub fn new(f: impl Fn(&mut Cell, &ChangeValue) -> ControlEffect + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, cell: &mut Cell, change: &ChangeValue) -> ControlEffect {
        (self.0)(cell, change)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener")
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A minimal DOM element: tag, attributes, children and an optional change listener.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<Node>,
    listener: Option<Listener>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    pub fn with_listener(mut self, listener: Listener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", classes);
    }

    pub fn remove_class(&mut self, class: &str) {
        if let Some(existing) = self.attr("class") {
            let classes = existing
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<&str>>()
                .join(" ");
            self.set_attr("class", classes);
        }
    }

    pub fn is_checked(&self) -> bool {
        self.attributes.contains_key("checked")
    }

    pub fn set_checked(&mut self, checked: bool) {
        if checked {
            self.set_attr("checked", "checked");
        } else {
            self.remove_attr("checked");
        }
    }

    pub fn listener(&self) -> Option<&Listener> {
        self.listener.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    pub fn replace_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Direct element children, text nodes skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant (self excluded) matching `pred`, depth-first in document order.
    pub fn find(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(e) = child {
                if pred(e) {
                    return Some(e);
                }
                if let Some(found) = e.find(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_mut(&mut self, pred: &impl Fn(&Element) -> bool) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(e) = child {
                if pred(e) {
                    return Some(e);
                }
                if let Some(found) = e.find_mut(pred) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Every descendant matching `pred`, in document order.
    pub fn find_all(&self, pred: &impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_matching(pred, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, pred: &impl Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.collect_matching(pred, out);
        }
    }

    /// Applies `f` to every descendant element.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(e) = child {
                f(e);
                e.for_each_mut(f);
            }
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.find(&|e: &Element| e.id() == Some(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.find_mut(&|e: &Element| e.id() == Some(id))
    }

    pub fn find_by_class(&self, class: &str) -> Option<&Element> {
        self.find(&|e: &Element| e.has_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut Element> {
        self.find_mut(&|e: &Element| e.has_class(class))
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => e.push_text(out),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div").with_class("outer").with_child(
            Element::new("ul")
                .with_attr("id", "list")
                .with_child(Element::new("li").with_text("one"))
                .with_child(Element::new("li").with_text("two")),
        )
    }

    #[test]
    fn classes_are_deduplicated() {
        let mut e = Element::new("div").with_class("a");
        e.add_class("a");
        e.add_class("b");
        assert_eq!(e.attr("class"), Some("a b"));
        e.remove_class("a");
        assert!(!e.has_class("a"));
        assert!(e.has_class("b"));
    }

    #[test]
    fn find_walks_in_document_order() {
        let root = sample();
        let first = root.find(&|e: &Element| e.tag == "li").unwrap();
        assert_eq!(first.text_content(), "one");
        assert_eq!(root.find_all(&|e: &Element| e.tag == "li").len(), 2);
        assert!(root.find_by_id("list").is_some());
        assert!(root.find_by_class("outer").is_none());
    }

    #[test]
    fn checked_flag_is_an_attribute() {
        let mut input = Element::new("input");
        input.set_checked(true);
        assert_eq!(input.attr("checked"), Some("checked"));
        input.set_checked(false);
        assert!(!input.is_checked());
    }
}
