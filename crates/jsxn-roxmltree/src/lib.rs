//! roxmltree adapter for the jsxn resolver
//!
//! Wraps roxmltree documents so they satisfy the `jsxn` node contract, and
//! offers one-call helpers from XML text to JSON.

pub mod error;
pub mod tree;

pub use error::{Error, Result};
pub use tree::{RoxAttribute, RoxElement, XmlDocument};

use jsxn::{Options, Resolver, RuleSet};
use serde_json::Value;

/// Parse `xml` and resolve its document element.
pub fn to_json(xml: &str, rules: &RuleSet, options: &Options) -> Result<Value> {
    let doc = XmlDocument::parse(xml)?;
    let resolver = Resolver::new(rules, options.clone())?;
    Ok(resolver.resolve(&doc.root_element())?)
}

/// Parse `xml`, resolve its document element and render the value as JSON text.
pub fn to_json_string(xml: &str, rules: &RuleSet, options: &Options) -> Result<String> {
    let value = to_json(xml, rules, options)?;
    Ok(serde_json::to_string(&value).map_err(jsxn::Error::from)?)
}
