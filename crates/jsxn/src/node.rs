//! Read-only node contract consumed by the resolver
//!
//! The resolver never depends on a particular XML library. Any tree whose
//! elements and attributes implement these traits can be materialized; the
//! owned [`XmlElement`] tree below is the reference implementation and the
//! one used throughout the tests.

use serde::{Deserialize, Serialize};

use crate::key::is_namespace_declaration;

/// Kind of node a rule is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Element node
    Element,
    /// Attribute node
    Attribute,
}

/// Common shape of elements and attributes
pub trait Node {
    /// Name without any namespace prefix
    fn local_name(&self) -> &str;

    /// Namespace URI, `None` when the node is in no namespace
    fn namespace_uri(&self) -> Option<&str>;
}

/// An attribute of an element
pub trait Attribute: Node {
    /// Name as written in the source, possibly prefixed (`xlink:href`)
    fn name(&self) -> &str;

    /// Attribute value
    fn value(&self) -> &str;

    /// Whether this is an `xmlns` or `xmlns:*` declaration
    fn is_namespace_declaration(&self) -> bool {
        is_namespace_declaration(self.name())
    }
}

/// An element of a markup tree.
///
/// Implementations are cheap handles (references or copyable node ids) into
/// a tree owned elsewhere, hence the `Clone` bound.
pub trait Element: Node + Clone {
    /// Attribute handle type of this tree
    type Attribute: Attribute;

    /// Attributes in document order, namespace declarations included
    fn attributes(&self) -> Vec<Self::Attribute>;

    /// Child elements in document order; text and other node kinds are not children
    fn children(&self) -> Vec<Self>;

    /// Concatenated text of the element, `None` when the source has none
    fn text_content(&self) -> Option<String>;

    /// Number of child elements
    fn child_element_count(&self) -> usize {
        self.children().len()
    }

    /// Raw markup between the start and end tag, for sources that can provide it
    fn inner_markup(&self) -> Option<String> {
        None
    }
}

const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Owned attribute of an [`XmlElement`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    name: String,
    namespace_uri: Option<String>,
    value: String,
}

impl XmlAttribute {
    /// Create an attribute. Namespace declarations get the xmlns namespace.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let namespace_uri = is_namespace_declaration(&name).then(|| XMLNS_NAMESPACE.to_string());
        Self {
            name,
            namespace_uri,
            value: value.into(),
        }
    }

    /// Place the attribute in a namespace
    pub fn in_namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(uri.into());
        self
    }
}

impl Node for &XmlAttribute {
    fn local_name(&self) -> &str {
        crate::key::local_part(&self.name)
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }
}

impl Attribute for &XmlAttribute {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// Owned element tree.
///
/// Mixed content is not modelled: an element carries at most one text run,
/// and its text content is that run followed by the text content of its
/// children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    local_name: String,
    namespace_uri: Option<String>,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlElement>,
    text: Option<String>,
    inner_markup: Option<String>,
}

impl XmlElement {
    /// Create an element with no namespace, attributes, children or text
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            ..Self::default()
        }
    }

    /// Place the element in a namespace
    pub fn in_namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace_uri = Some(uri.into());
        self
    }

    /// Append an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute::new(name, value));
        self
    }

    /// Append a prebuilt attribute, e.g. one placed in a namespace
    pub fn with_attribute_node(mut self, attribute: XmlAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element's own text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the raw inner markup reported by [`Element::inner_markup`]
    pub fn with_inner_markup(mut self, markup: impl Into<String>) -> Self {
        self.inner_markup = Some(markup.into());
        self
    }
}

impl Node for &XmlElement {
    fn local_name(&self) -> &str {
        &self.local_name
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }
}

impl<'a> Element for &'a XmlElement {
    type Attribute = &'a XmlAttribute;

    fn attributes(&self) -> Vec<Self::Attribute> {
        self.attributes.iter().collect()
    }

    fn children(&self) -> Vec<Self> {
        self.children.iter().collect()
    }

    fn text_content(&self) -> Option<String> {
        let mut text = self.text.clone();
        for child in &self.children {
            if let Some(child_text) = child.text_content() {
                text.get_or_insert_with(String::new).push_str(&child_text);
            }
        }
        text
    }

    fn child_element_count(&self) -> usize {
        self.children.len()
    }

    fn inner_markup(&self) -> Option<String> {
        self.inner_markup.clone()
    }
}
