//! Markdown to element tree, the way the host renders text cells.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

use super::element::{Element, Node};

/// Render markdown into a `div` holding the generated markup.
pub fn render(markdown: &str) -> Element {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let mut builder = TreeBuilder::new();
    builder.process(Parser::new_ext(markdown, options));
    builder.finish()
}

struct TreeBuilder {
    // open elements, root first
    stack: Vec<Element>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("div")],
        }
    }

    fn process<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            match event {
                Event::Start(tag) => self.stack.push(element_for(tag)),
                Event::End(_) => self.close(),
                Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                    self.push(Node::text(text.to_string()))
                }
                Event::Code(code) => self.push(Element::new("code").with_text(code.to_string()).into()),
                Event::SoftBreak => self.push(Node::text("\n")),
                Event::HardBreak => self.push(Element::new("br").into()),
                Event::Rule => self.push(Element::new("hr").into()),
                Event::TaskListMarker(done) => {
                    let mut marker = Element::new("input").with_attr("type", "checkbox");
                    marker.set_checked(done);
                    self.push(marker.with_attr("disabled", "disabled").into());
                }
                // footnotes and math
                _ => {}
            }
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.append(node);
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(done) = self.stack.pop() {
            self.push(done.into());
        }
    }

    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().unwrap_or_else(|| Element::new("div"))
    }
}

fn element_for(tag: Tag) -> Element {
    match tag {
        Tag::Paragraph => Element::new("p"),
        Tag::Heading { level, .. } => Element::new(heading_tag(level)),
        Tag::BlockQuote(_) => Element::new("blockquote"),
        Tag::CodeBlock(_) => Element::new("pre"),
        Tag::List(Some(1)) => Element::new("ol"),
        Tag::List(Some(start)) => Element::new("ol").with_attr("start", start.to_string()),
        Tag::List(None) => Element::new("ul"),
        Tag::Item => Element::new("li"),
        Tag::Emphasis => Element::new("em"),
        Tag::Strong => Element::new("strong"),
        Tag::Strikethrough => Element::new("del"),
        Tag::Link { dest_url, .. } => Element::new("a").with_attr("href", dest_url.to_string()),
        Tag::Image { dest_url, .. } => Element::new("img").with_attr("src", dest_url.to_string()),
        Tag::Table(_) => Element::new("table"),
        Tag::TableHead => Element::new("thead"),
        Tag::TableRow => Element::new("tr"),
        Tag::TableCell => Element::new("td"),
        _ => Element::new("span"),
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}
