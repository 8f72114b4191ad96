//! Element-to-value materialization
//!
//! Every element is resolved the same way: its child elements are visited
//! first, in document order, then its attributes, in document order. Each
//! one is matched against the rules, given a key and a shape, and offered
//! to the slot under its key. Keys are first-write-wins unless the
//! contribution is repeated (`multiple`), in which case values accumulate
//! in an array. A contribution that loses is never materialized.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::diagnostics::{DiagnosticsSink, RuleTrace};
use crate::error::Result;
use crate::key::resolve_key;
use crate::matcher::{match_rule, Matched, NameRef};
use crate::node::{Attribute, Element, Node, NodeKind};
use crate::options::Options;
use crate::rule::{Rule, RuleSet};
use crate::shape::{element_text, resolve_attribute_shape, resolve_shape, Form, Shape, Slot};

/// Resolve an element tree to a JSON value in one call.
pub fn resolve<E: Element>(root: &E, rules: &RuleSet, options: &Options) -> Result<Value> {
    Resolver::new(rules, options.clone())?.resolve(root)
}

/// Where a contribution's value comes from
#[derive(Debug, Clone)]
pub(crate) enum Source<E> {
    Child(E),
    Attribute(String),
}

/// One child or attribute, keyed and shaped but not yet materialized
#[derive(Debug, Clone)]
pub(crate) struct Contribution<E> {
    pub key: String,
    pub shape: Shape,
    pub source: Source<E>,
}

/// Normalized rules and options, ready to resolve any number of trees.
pub struct Resolver {
    rules: Vec<Rule>,
    fallback: Rule,
    options: Options,
    sink: Option<Rc<dyn DiagnosticsSink>>,
}

impl Resolver {
    /// Normalize a rule set against the options.
    ///
    /// Fails with [`Error::UnsupportedCardinality`](crate::Error::UnsupportedCardinality)
    /// when a rule names a cardinality this resolver does not implement.
    pub fn new(rules: &RuleSet, options: Options) -> Result<Self> {
        Ok(Self {
            rules: rules.normalize(options.default_type)?,
            fallback: Rule::fallback(options.default_type),
            options,
            sink: None,
        })
    }

    /// Install the sink that receives traces when `debug_rules` is enabled
    pub fn with_diagnostics(mut self, sink: Rc<dyn DiagnosticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Eagerly resolve the tree below `root`.
    pub fn resolve<E: Element>(&self, root: &E) -> Result<Value> {
        match self.root_shape(root) {
            Shape::Single(form) | Shape::Repeated(form) => self.materialize(root, form),
            Shape::Suppressed => Ok(Value::Null),
        }
    }

    /// Shape of the root element, which has no container to match against
    pub(crate) fn root_shape<E: Element>(&self, root: &E) -> Shape {
        let name = NameRef::new(root.local_name(), root.namespace_uri(), &self.options);
        let matched = self.match_node(NodeKind::Element, &name, None);
        let key = resolve_key(root.local_name(), matched.rule, &self.options);
        let shape = resolve_shape(root, &matched.rule.effect);
        self.trace(NodeKind::Element, &name, None, matched, &key, shape);
        shape
    }

    pub(crate) fn materialize<E: Element>(&self, element: &E, form: Form) -> Result<Value> {
        match form {
            Form::Text => Ok(element_text(element, &self.options)),
            Form::Nested => Ok(Value::Object(self.object(element)?)),
        }
    }

    fn object<E: Element>(&self, element: &E) -> Result<Map<String, Value>> {
        let slots = self.assemble(element, None, |contribution| match &contribution.source {
            Source::Child(child) => match contribution.shape {
                Shape::Single(form) | Shape::Repeated(form) => self.materialize(child, form),
                Shape::Suppressed => Ok(Value::Null),
            },
            Source::Attribute(value) => Ok(Value::String(value.clone())),
        })?;
        Ok(slots
            .into_iter()
            .map(|(key, slot)| (key, Value::from(slot)))
            .collect())
    }

    /// Place the contributions of `element` into keyed slots, in first-seen
    /// key order. With `only`, every other key is skipped.
    pub(crate) fn assemble<E: Element, T>(
        &self,
        element: &E,
        only: Option<&str>,
        make: impl Fn(&Contribution<E>) -> Result<T>,
    ) -> Result<Vec<(String, Slot<T>)>> {
        let mut slots: Vec<(String, Option<Slot<T>>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for contribution in self.contributions(element) {
            if contribution.shape == Shape::Suppressed {
                continue;
            }
            if only.is_some_and(|key| key != contribution.key) {
                continue;
            }
            let position = *index.entry(contribution.key.clone()).or_insert_with(|| {
                slots.push((contribution.key.clone(), None));
                slots.len() - 1
            });
            let repeated = matches!(contribution.shape, Shape::Repeated(_));
            Slot::place(
                &mut slots[position].1,
                repeated,
                self.options.strict_keys,
                &contribution.key,
                element.local_name(),
                || make(&contribution),
            )?;
        }

        Ok(slots
            .into_iter()
            .filter_map(|(key, slot)| slot.map(|slot| (key, slot)))
            .collect())
    }

    /// Key and shape every child element, then every attribute, of `element`.
    pub(crate) fn contributions<E: Element>(&self, element: &E) -> Vec<Contribution<E>> {
        let options = &self.options;
        let parent = NameRef::new(element.local_name(), element.namespace_uri(), options);
        let mut contributions = Vec::new();

        for child in element.children() {
            let (key, shape) = {
                let name = NameRef::new(child.local_name(), child.namespace_uri(), options);
                let matched = self.match_node(NodeKind::Element, &name, Some(&parent));
                let key = resolve_key(child.local_name(), matched.rule, options);
                let shape = resolve_shape(&child, &matched.rule.effect);
                self.trace(NodeKind::Element, &name, Some(&parent), matched, &key, shape);
                (key, shape)
            };
            contributions.push(Contribution {
                key,
                shape,
                source: Source::Child(child),
            });
        }

        for attribute in element.attributes() {
            if attribute.is_namespace_declaration() {
                continue;
            }
            let name = NameRef::new(attribute.local_name(), attribute.namespace_uri(), options);
            let matched = self.match_node(NodeKind::Attribute, &name, Some(&parent));
            let key = resolve_key(attribute.name(), matched.rule, options);
            let shape = resolve_attribute_shape(&matched.rule.effect);
            self.trace(NodeKind::Attribute, &name, Some(&parent), matched, &key, shape);
            contributions.push(Contribution {
                key,
                shape,
                source: Source::Attribute(attribute.value().to_string()),
            });
        }

        contributions
    }

    fn match_node(&self, kind: NodeKind, name: &NameRef<'_>, parent: Option<&NameRef<'_>>) -> Matched<'_> {
        match_rule(&self.rules, &self.fallback, kind, name, parent)
    }

    fn trace(
        &self,
        kind: NodeKind,
        name: &NameRef<'_>,
        parent: Option<&NameRef<'_>>,
        matched: Matched<'_>,
        key: &str,
        shape: Shape,
    ) {
        if !self.options.debug_rules {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.record(&RuleTrace {
                kind,
                local_name: name.local_name.to_string(),
                namespace: name.namespace.map(str::to_string),
                parent: parent.map(|parent| parent.local_name.to_string()),
                rule: matched.index,
                cardinality: matched.rule.effect.cardinality(),
                key: key.to_string(),
                shape,
            });
        }
    }
}
