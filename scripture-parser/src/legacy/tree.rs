//! Minimal element tree over legacy page markup
//!
//! The extractor in [`super::walk`] only depends on [`MarkupNode`]. [`Document`]
//! is the implementation used by the crate: an arena of elements built from
//! quick-xml events in lenient mode, keeping byte ranges into the source so
//! inner and outer markup can be sliced back out verbatim.

use std::ops::Range;
use std::ptr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::common::cleanup::clean_text;

/// Elements that never have content or a closing tag in HTML
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const ROOT: usize = 0;

/// Read-only view of one element in a markup tree
pub trait MarkupNode: Sized {
    /// Lower-case tag name; empty for a synthetic document root
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order (text is not represented)
    fn children(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;

    /// Markup between the opening and closing tag
    fn inner_markup(&self) -> &str;

    /// Markup of the whole element, tags included
    fn outer_markup(&self) -> &str;

    /// Byte offset of the element's opening tag in the source
    fn source_offset(&self) -> usize;

    fn class_list(&self) -> Vec<&str> {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(&class)
    }

    /// All descendant elements in pre-order
    fn descendants(&self) -> Vec<Self> {
        let mut found = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            found.push(node);
        }
        found
    }

    /// Cleaned text content
    fn text(&self) -> String {
        clean_text(self.inner_markup())
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    outer: Range<usize>,
    inner: Range<usize>,
}

impl NodeData {
    fn root(len: usize) -> Self {
        Self {
            tag: String::new(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            outer: 0..len,
            inner: 0..len,
        }
    }

    fn close(&mut self, inner_end: usize, outer_end: usize) {
        self.inner.end = inner_end;
        self.outer.end = outer_end;
    }
}

/// Arena-backed element tree of one markup fragment
#[derive(Debug)]
pub struct Document<'a> {
    source: &'a str,
    nodes: Vec<NodeData>,
}

fn lowercase_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}

fn read_attributes(tag: &BytesStart<'_>) -> Vec<(String, String)> {
    tag.html_attributes()
        .flatten()
        .map(|attr| {
            (
                lowercase_name(attr.key.as_ref()),
                String::from_utf8_lossy(&attr.value).into_owned(),
            )
        })
        .collect()
}

impl<'a> Document<'a> {
    /// Build the tree, tolerating tag soup
    ///
    /// Unclosed elements end where an enclosing element is closed (or at the
    /// end of input), unmatched closing tags are ignored and void elements are
    /// leaves. A reader error stops the parse; everything read so far is kept.
    pub fn parse(source: &'a str) -> Self {
        let mut nodes = vec![NodeData::root(source.len())];
        let mut stack: Vec<usize> = vec![ROOT];

        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        loop {
            let start = reader.buffer_position() as usize;
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    debug!(position = start, error = %err, "Stopping markup parse at malformed input");
                    break;
                }
            };
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(tag) => {
                    let name = lowercase_name(tag.name().as_ref());
                    let is_void = VOID_ELEMENTS.contains(&name.as_str());
                    let parent = stack.last().copied().unwrap_or(ROOT);
                    let index = push_node(&mut nodes, parent, name, read_attributes(&tag), start, end);
                    if is_void {
                        nodes[index].close(end, end);
                    } else {
                        stack.push(index);
                    }
                }
                Event::Empty(tag) => {
                    let name = lowercase_name(tag.name().as_ref());
                    let parent = stack.last().copied().unwrap_or(ROOT);
                    let index = push_node(&mut nodes, parent, name, read_attributes(&tag), start, end);
                    nodes[index].close(end, end);
                }
                Event::End(tag) => {
                    let name = lowercase_name(tag.name().as_ref());
                    let matching = stack
                        .iter()
                        .rposition(|&open| open != ROOT && nodes[open].tag == name);
                    match matching {
                        Some(position) => {
                            for &unclosed in &stack[position + 1..] {
                                nodes[unclosed].close(start, start);
                            }
                            nodes[stack[position]].close(start, end);
                            stack.truncate(position);
                        }
                        None => debug!(tag = %name, "Ignoring unmatched closing tag"),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        for &unclosed in stack.iter().skip(1) {
            nodes[unclosed].close(source.len(), source.len());
        }

        Self { source, nodes }
    }

    /// Synthetic root spanning the whole source
    pub fn root(&self) -> NodeRef<'_> {
        self.node(ROOT)
    }

    /// First element carrying `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeRef<'_>> {
        self.nodes
            .iter()
            .position(|node| {
                node.attributes
                    .iter()
                    .any(|(name, value)| name == "id" && value == id)
            })
            .map(|index| self.node(index))
    }

    /// Number of elements, root excluded
    pub fn element_count(&self) -> usize {
        self.nodes.len() - 1
    }

    fn node(&self, index: usize) -> NodeRef<'_> {
        NodeRef {
            document: self,
            index,
        }
    }
}

fn push_node(
    nodes: &mut Vec<NodeData>,
    parent: usize,
    tag: String,
    attributes: Vec<(String, String)>,
    start: usize,
    end: usize,
) -> usize {
    let index = nodes.len();
    nodes.push(NodeData {
        tag,
        attributes,
        parent: Some(parent),
        children: Vec::new(),
        outer: start..end,
        inner: end..end,
    });
    nodes[parent].children.push(index);
    index
}

/// Handle to one element of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'d> {
    document: &'d Document<'d>,
    index: usize,
}

impl<'d> NodeRef<'d> {
    fn data(&self) -> &'d NodeData {
        &self.document.nodes[self.index]
    }

    fn slice(&self, range: &Range<usize>) -> &'d str {
        self.document.source.get(range.clone()).unwrap_or_default()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.document, other.document) && self.index == other.index
    }
}

impl Eq for NodeRef<'_> {}

impl MarkupNode for NodeRef<'_> {
    fn tag_name(&self) -> &str {
        &self.data().tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&index| self.document.node(index))
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        self.data().parent.map(|index| self.document.node(index))
    }

    fn inner_markup(&self) -> &str {
        self.slice(&self.data().inner)
    }

    fn outer_markup(&self) -> &str {
        self.slice(&self.data().outer)
    }

    fn source_offset(&self) -> usize {
        self.data().outer.start
    }
}
