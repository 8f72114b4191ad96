//! First-match rule selection

use crate::key::normalized_name;
use crate::node::NodeKind;
use crate::options::Options;
use crate::rule::{Constraints, Rule};

/// Name and namespace of a node as seen by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef<'a> {
    pub local_name: &'a str,
    /// Local name after key normalization (camel casing when enabled)
    pub normalized: String,
    pub namespace: Option<&'a str>,
}

impl<'a> NameRef<'a> {
    pub fn new(local_name: &'a str, namespace: Option<&'a str>, options: &Options) -> Self {
        Self {
            local_name,
            normalized: normalized_name(local_name, options),
            namespace,
        }
    }

    fn is_named(&self, name: &str) -> bool {
        self.local_name == name || self.normalized == name
    }
}

/// A rule chosen for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matched<'r> {
    pub rule: &'r Rule,
    /// Position in the rule set, `None` when the fallback rule was used
    pub index: Option<usize>,
}

/// Whether the constraints hold for a node and its containing element.
///
/// Parent conditions never hold for the root, which has no container.
pub fn constraints_hold(when: &Constraints, node: &NameRef<'_>, parent: Option<&NameRef<'_>>) -> bool {
    if let Some(name) = &when.local_name {
        if !node.is_named(name) {
            return false;
        }
    }
    if !when.namespace.matches(node.namespace) {
        return false;
    }
    if !when.has_parent_condition() {
        return true;
    }
    let Some(parent) = parent else {
        return false;
    };
    if let Some(name) = &when.parent_local_name {
        if !parent.is_named(name) {
            return false;
        }
    }
    when.parent_namespace.matches(parent.namespace)
}

/// Select the first rule, in declaration order, that applies to the node.
pub fn match_rule<'r>(
    rules: &'r [Rule],
    fallback: &'r Rule,
    kind: NodeKind,
    node: &NameRef<'_>,
    parent: Option<&NameRef<'_>>,
) -> Matched<'r> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.applies_to(kind) && constraints_hold(&rule.when, node, parent))
        .map(|(index, rule)| Matched {
            rule,
            index: Some(index),
        })
        .unwrap_or(Matched {
            rule: fallback,
            index: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Cardinality, Effect, RuleSet, RuleSpec};

    const GREEN: &str = "http://localhost/green";

    fn rules(set: RuleSet) -> Vec<Rule> {
        set.normalize(Cardinality::Single).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let options = Options::default();
        let rules = rules(
            RuleSet::new()
                .with(RuleSpec::node("v").within("plant").as_key("type"))
                .with(RuleSpec::node("v").as_key("value")),
        );
        let fallback = Rule::fallback(Cardinality::Single);
        let v = NameRef::new("v", None, &options);
        let plant = NameRef::new("plant", None, &options);
        let option = NameRef::new("option", None, &options);

        let matched = match_rule(&rules, &fallback, NodeKind::Element, &v, Some(&plant));
        assert_eq!(matched.index, Some(0));
        let matched = match_rule(&rules, &fallback, NodeKind::Element, &v, Some(&option));
        assert_eq!(matched.index, Some(1));
        assert_eq!(matched.rule.effect.as_key(), Some("value"));
    }

    #[test]
    fn test_target_kind_filters() {
        let options = Options::default();
        let rules = rules(RuleSet::new().with(RuleSpec::attribute("value").text()));
        let fallback = Rule::fallback(Cardinality::Single);
        let value = NameRef::new("value", None, &options);

        let matched = match_rule(&rules, &fallback, NodeKind::Element, &value, None);
        assert_eq!(matched.index, None);
        assert_eq!(matched.rule, &fallback);
        let matched = match_rule(&rules, &fallback, NodeKind::Attribute, &value, None);
        assert_eq!(matched.index, Some(0));
        assert_eq!(matched.rule.effect, Effect::Text { as_key: None });
    }

    #[test]
    fn test_namespace_constraints() {
        let options = Options::default();
        let rules = rules(
            RuleSet::new()
                .with(RuleSpec::element("yellow").in_namespace(GREEN).as_key("green"))
                .with(RuleSpec::element("plain").without_namespace()),
        );
        let fallback = Rule::fallback(Cardinality::Single);
        let green = NameRef::new("yellow", Some(GREEN), &options);
        let yellow = NameRef::new("yellow", Some("http://localhost/yellow"), &options);
        let plain = NameRef::new("plain", None, &options);
        let namespaced_plain = NameRef::new("plain", Some(GREEN), &options);

        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &green, None).index, Some(0));
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &yellow, None).index, None);
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &plain, None).index, Some(1));
        assert_eq!(
            match_rule(&rules, &fallback, NodeKind::Element, &namespaced_plain, None).index,
            None
        );
    }

    #[test]
    fn test_camel_cased_names_match() {
        let options = Options::default();
        let rules = rules(
            RuleSet::new()
                .with(RuleSpec::element("itemPart").multiple())
                .with(RuleSpec::element("other-part").multiple()),
        );
        let fallback = Rule::fallback(Cardinality::Single);
        let item_part = NameRef::new("item-part", None, &options);
        let other_part = NameRef::new("other-part", None, &options);
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &item_part, None).index, Some(0));
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &other_part, None).index, Some(1));

        let raw = Options::default().with_camel_case(false);
        let item_part = NameRef::new("item-part", None, &raw);
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &item_part, None).index, None);
    }

    #[test]
    fn test_parent_conditions_never_hold_for_root() {
        let options = Options::default();
        let rules = rules(RuleSet::new().with(RuleSpec::any().within_namespace(GREEN).text()));
        let fallback = Rule::fallback(Cardinality::Single);
        let root = NameRef::new("root", Some(GREEN), &options);
        let parent = NameRef::new("container", Some(GREEN), &options);
        assert_eq!(match_rule(&rules, &fallback, NodeKind::Element, &root, None).index, None);
        assert_eq!(
            match_rule(&rules, &fallback, NodeKind::Element, &root, Some(&parent)).index,
            Some(0)
        );
    }
}
