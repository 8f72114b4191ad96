//! Node contract implementation for roxmltree

use std::borrow::Cow;

use jsxn::node::{Attribute, Element, Node};

use crate::error::Result;

/// A parsed XML document
pub struct XmlDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> XmlDocument<'input> {
    /// Parse XML from a string. Document type declarations are accepted.
    pub fn parse(text: &'input str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self { doc })
    }

    /// The document element
    pub fn root_element(&self) -> RoxElement<'_, 'input> {
        RoxElement(self.doc.root_element())
    }
}

/// An element node of a roxmltree document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoxElement<'a, 'input>(pub roxmltree::Node<'a, 'input>);

/// An attribute of a roxmltree element
#[derive(Debug, Clone)]
pub struct RoxAttribute<'a, 'input> {
    attribute: roxmltree::Attribute<'a, 'input>,
    name: Cow<'a, str>,
}

impl<'a, 'input> RoxAttribute<'a, 'input> {
    /// Wrap an attribute, restoring its prefix from the namespaces in scope on `owner`
    fn new(attribute: roxmltree::Attribute<'a, 'input>, owner: roxmltree::Node<'a, 'input>) -> Self {
        let prefix = attribute
            .namespace()
            .and_then(|uri| owner.lookup_prefix(uri))
            .filter(|prefix| !prefix.is_empty());
        let name = match prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, attribute.name())),
            None => Cow::Borrowed(attribute.name()),
        };
        Self { attribute, name }
    }
}

impl Node for RoxElement<'_, '_> {
    fn local_name(&self) -> &str {
        self.0.tag_name().name()
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.0.tag_name().namespace()
    }
}

impl<'a, 'input> Element for RoxElement<'a, 'input> {
    type Attribute = RoxAttribute<'a, 'input>;

    fn attributes(&self) -> Vec<Self::Attribute> {
        let owner = self.0;
        owner
            .attributes()
            .map(|attribute| RoxAttribute::new(attribute, owner))
            .collect()
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children()
            .filter(|child| child.is_element())
            .map(RoxElement)
            .collect()
    }

    /// Concatenated text of all descendant text nodes, as DOM `textContent`
    fn text_content(&self) -> Option<String> {
        Some(
            self.0
                .descendants()
                .filter(|node| node.is_text())
                .filter_map(|node| node.text())
                .collect(),
        )
    }

    fn child_element_count(&self) -> usize {
        self.0.children().filter(|child| child.is_element()).count()
    }

    fn inner_markup(&self) -> Option<String> {
        let first = self.0.first_child()?;
        let last = self.0.last_child()?;
        let input = self.0.document().input_text();
        input
            .get(first.range().start..last.range().end)
            .map(str::to_string)
    }
}

impl Node for RoxAttribute<'_, '_> {
    fn local_name(&self) -> &str {
        self.attribute.name()
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.attribute.namespace()
    }
}

impl Attribute for RoxAttribute<'_, '_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        self.attribute.value()
    }
}
