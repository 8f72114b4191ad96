//! Rule-driven conversion of XML element trees into JSON values.
//!
//! The resolver walks any tree implementing the [`node`] contract and turns
//! each element into a [`serde_json::Value`]. An ordered [`RuleSet`]
//! decides, per child element and attribute, which key it lands under and
//! whether it becomes text, a nested object, an array entry or nothing.
//!
//! # Quick Start
//!
//! ```rust
//! use jsxn::{resolve, Options, RuleSet, RuleSpec, XmlElement};
//! use serde_json::json;
//!
//! let root = XmlElement::new("root")
//!     .with_child(XmlElement::new("plant").with_attribute("type", "shrub"))
//!     .with_child(XmlElement::new("plant").with_attribute("type", "bush"));
//! let rules = RuleSet::new().with(RuleSpec::element("plant").multiple());
//!
//! let value = resolve(&&root, &rules, &Options::default()).unwrap();
//! assert_eq!(value, json!({ "plant": [{ "type": "shrub" }, { "type": "bush" }] }));
//! ```

pub mod diagnostics;
pub mod error;
pub mod key;
pub mod matcher;
pub mod materialize;
pub mod node;
pub mod options;
pub mod rule;
pub mod shape;
pub mod view;

pub use diagnostics::{CollectingSink, DiagnosticsSink, JsonLinesSink, RuleTrace};
pub use error::{Error, Result};
pub use materialize::{resolve, Resolver};
pub use node::{Attribute, Element, Node, NodeKind, XmlAttribute, XmlElement};
pub use options::Options;
pub use rule::{Cardinality, Effect, Rule, RuleSet, RuleSpec};
pub use view::{LazyObject, LazyValue, ObjectView};
