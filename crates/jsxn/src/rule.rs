//! Rule vocabulary
//!
//! Rules are authored as [`RuleSpec`]s, either through the builder methods
//! or deserialized from JSON, and normalized into immutable [`Rule`]s once
//! when a [`Resolver`](crate::Resolver) is built. Normalization is where
//! the default cardinality is filled in and where unknown cardinality
//! words are rejected.
//!
//! JSON form of a single rule:
//!
//! ```json
//! { "element": "plant", "whenLocalName": "garden", "asKey": "plants", "type": "multiple" }
//! ```
//!
//! `element`, `attribute` and `node` each name the local name to match and
//! select which kind of node the rule targets (`node` targets both).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::node::NodeKind;

/// Output shape policy of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Cardinality {
    /// One value per key; later contributions to the key are dropped
    #[default]
    Single,
    /// Values accumulate in an array, in document order
    Multiple,
    /// Always the node's text, whatever its structure
    Text,
    /// Omitted from the output
    None,
}

impl Cardinality {
    /// The word used for this cardinality in rule documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::Multiple => "multiple",
            Cardinality::Text => "text",
            Cardinality::None => "none",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Cardinality::Single),
            "multiple" => Ok(Cardinality::Multiple),
            "text" => Ok(Cardinality::Text),
            "none" => Ok(Cardinality::None),
            _ => Err(Error::unsupported_cardinality(s)),
        }
    }
}

impl TryFrom<String> for Cardinality {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Namespace condition of a rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceConstraint {
    /// Any namespace, or none
    #[default]
    Any,
    /// Only nodes in no namespace
    Absent,
    /// Only nodes in this namespace
    Uri(String),
}

impl NamespaceConstraint {
    pub fn matches(&self, namespace_uri: Option<&str>) -> bool {
        match self {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Absent => namespace_uri.is_none(),
            NamespaceConstraint::Uri(uri) => namespace_uri == Some(uri.as_str()),
        }
    }

    fn from_field(field: Option<Option<String>>) -> Self {
        match field {
            None => NamespaceConstraint::Any,
            Some(None) => NamespaceConstraint::Absent,
            Some(Some(uri)) => NamespaceConstraint::Uri(uri),
        }
    }
}

/// Conditions a node and its containing element must meet for a rule to apply
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Constraints {
    /// Local name of the node, raw or camel-cased
    pub local_name: Option<String>,
    pub namespace: NamespaceConstraint,
    /// Local name of the containing element
    pub parent_local_name: Option<String>,
    /// Namespace of the containing element
    pub parent_namespace: NamespaceConstraint,
}

impl Constraints {
    /// Whether the rule only applies inside a particular container
    pub fn has_parent_condition(&self) -> bool {
        self.parent_local_name.is_some() || self.parent_namespace != NamespaceConstraint::Any
    }
}

/// What a matched rule does to a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Single { as_key: Option<String> },
    Multiple { as_key: Option<String> },
    Text { as_key: Option<String> },
    Suppressed,
}

impl Effect {
    pub fn new(cardinality: Cardinality, as_key: Option<String>) -> Self {
        match cardinality {
            Cardinality::Single => Effect::Single { as_key },
            Cardinality::Multiple => Effect::Multiple { as_key },
            Cardinality::Text => Effect::Text { as_key },
            Cardinality::None => Effect::Suppressed,
        }
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Effect::Single { .. } => Cardinality::Single,
            Effect::Multiple { .. } => Cardinality::Multiple,
            Effect::Text { .. } => Cardinality::Text,
            Effect::Suppressed => Cardinality::None,
        }
    }

    /// Literal key override, if any
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Effect::Single { as_key } | Effect::Multiple { as_key } | Effect::Text { as_key } => {
                as_key.as_deref()
            }
            Effect::Suppressed => None,
        }
    }
}

/// A normalized, immutable rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Kind of node the rule applies to; `None` for both
    pub target: Option<NodeKind>,
    pub when: Constraints,
    pub effect: Effect,
}

impl Rule {
    /// The rule used when nothing in the rule set matches
    pub fn fallback(cardinality: Cardinality) -> Self {
        Self {
            target: None,
            when: Constraints::default(),
            effect: Effect::new(cardinality, None),
        }
    }

    pub fn applies_to(&self, kind: NodeKind) -> bool {
        match self.target {
            Some(target) => target == kind,
            None => true,
        }
    }
}

/// Cardinality as written in a rule document, kept verbatim until normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardinalitySpec {
    Known(Cardinality),
    Unknown(String),
}

impl From<String> for CardinalitySpec {
    fn from(word: String) -> Self {
        match word.parse() {
            Ok(cardinality) => CardinalitySpec::Known(cardinality),
            Err(_) => CardinalitySpec::Unknown(word),
        }
    }
}

impl From<Cardinality> for CardinalitySpec {
    fn from(cardinality: Cardinality) -> Self {
        CardinalitySpec::Known(cardinality)
    }
}

/// Authoring form of a rule.
///
/// Every field is optional; a spec with no constraints matches every node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawRuleSpec")]
pub struct RuleSpec {
    target: Option<NodeKind>,
    when: Constraints,
    as_key: Option<String>,
    cardinality: Option<CardinalitySpec>,
}

impl RuleSpec {
    /// A rule matching every element and attribute
    pub fn any() -> Self {
        Self::default()
    }

    /// A rule for nodes of either kind with this local name
    pub fn node(local_name: impl Into<String>) -> Self {
        Self::any().named(local_name)
    }

    /// A rule for elements with this local name
    pub fn element(local_name: impl Into<String>) -> Self {
        Self {
            target: Some(NodeKind::Element),
            ..Self::node(local_name)
        }
    }

    /// A rule for attributes with this local name
    pub fn attribute(local_name: impl Into<String>) -> Self {
        Self {
            target: Some(NodeKind::Attribute),
            ..Self::node(local_name)
        }
    }

    /// Restrict to a local name
    pub fn named(mut self, local_name: impl Into<String>) -> Self {
        self.when.local_name = Some(local_name.into());
        self
    }

    /// Restrict to nodes in a namespace
    pub fn in_namespace(mut self, uri: impl Into<String>) -> Self {
        self.when.namespace = NamespaceConstraint::Uri(uri.into());
        self
    }

    /// Restrict to nodes in no namespace
    pub fn without_namespace(mut self) -> Self {
        self.when.namespace = NamespaceConstraint::Absent;
        self
    }

    /// Restrict to nodes whose containing element has this local name
    pub fn within(mut self, parent_local_name: impl Into<String>) -> Self {
        self.when.parent_local_name = Some(parent_local_name.into());
        self
    }

    /// Restrict to nodes whose containing element is in this namespace
    pub fn within_namespace(mut self, uri: impl Into<String>) -> Self {
        self.when.parent_namespace = NamespaceConstraint::Uri(uri.into());
        self
    }

    /// Override the output key
    pub fn as_key(mut self, key: impl Into<String>) -> Self {
        self.as_key = Some(key.into());
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality.into());
        self
    }

    pub fn multiple(self) -> Self {
        self.with_cardinality(Cardinality::Multiple)
    }

    pub fn text(self) -> Self {
        self.with_cardinality(Cardinality::Text)
    }

    pub fn suppressed(self) -> Self {
        self.with_cardinality(Cardinality::None)
    }

    /// Normalize into a [`Rule`], filling in `default` when no cardinality was given.
    pub fn to_rule(&self, default: Cardinality) -> Result<Rule> {
        let cardinality = match &self.cardinality {
            None => default,
            Some(CardinalitySpec::Known(cardinality)) => *cardinality,
            Some(CardinalitySpec::Unknown(word)) => {
                return Err(Error::unsupported_cardinality(word.clone()))
            }
        };
        Ok(Rule {
            target: self.target,
            when: self.when.clone(),
            effect: Effect::new(cardinality, self.as_key.clone()),
        })
    }
}

/// Serde shape of a rule document entry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRuleSpec {
    element: Option<String>,
    attribute: Option<String>,
    node: Option<String>,
    #[serde(default, deserialize_with = "present")]
    namespace: Option<Option<String>>,
    when_local_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    when_namespace: Option<Option<String>>,
    as_key: Option<String>,
    #[serde(rename = "type")]
    cardinality: Option<String>,
}

/// Distinguishes a field set to `null` from a missing field.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TryFrom<RawRuleSpec> for RuleSpec {
    type Error = Error;

    fn try_from(raw: RawRuleSpec) -> Result<Self> {
        let (target, local_name) = match (raw.element, raw.attribute, raw.node) {
            (Some(name), None, None) => (Some(NodeKind::Element), Some(name)),
            (None, Some(name), None) => (Some(NodeKind::Attribute), Some(name)),
            (None, None, name) => (None, name),
            _ => {
                return Err(Error::invalid_rule(
                    "at most one of `element`, `attribute` and `node` may be given",
                ))
            }
        };
        Ok(RuleSpec {
            target,
            when: Constraints {
                local_name,
                namespace: NamespaceConstraint::from_field(raw.namespace),
                parent_local_name: raw.when_local_name,
                parent_namespace: NamespaceConstraint::from_field(raw.when_namespace),
            },
            as_key: raw.as_key,
            cardinality: raw.cardinality.map(CardinalitySpec::from),
        })
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<RuleSpec>,
}

impl Default for RuleSet {
    /// A single rule matching everything with the default cardinality
    fn default() -> Self {
        Self {
            rules: vec![RuleSpec::any()],
        }
    }
}

impl RuleSet {
    /// An empty rule set; every node falls through to the default rule
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parse a JSON array of rule specs
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append a rule after the existing ones
    pub fn with(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Normalize every spec against the default cardinality
    pub fn normalize(&self, default: Cardinality) -> Result<Vec<Rule>> {
        self.rules.iter().map(|spec| spec.to_rule(default)).collect()
    }
}

impl FromIterator<RuleSpec> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleSpec>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
