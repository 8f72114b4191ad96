//! Object views over resolved elements
//!
//! [`ObjectView`] is the common face of the two materialization strategies:
//! an eagerly built [`serde_json::Map`], and a [`LazyObject`] that recomputes
//! the requested key from the source element on every access. Both yield the
//! same values for the same tree, rules and options.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::materialize::{Contribution, Resolver, Source};
use crate::node::Element;
use crate::shape::{element_text, Form, Shape, Slot};

/// Key-addressed access to a resolved object
pub trait ObjectView {
    /// What a key resolves to
    type Item;

    /// Value under `key`, `None` when no contribution has that key
    fn get(&self, key: &str) -> Result<Option<Self::Item>>;

    /// Keys in first-seen document order
    fn keys(&self) -> Result<Vec<String>>;

    /// Fully materialized object
    fn to_value(&self) -> Result<Value>;
}

impl ObjectView for Map<String, Value> {
    type Item = Value;

    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(Map::get(self, key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Map::keys(self).cloned().collect())
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Object(self.clone()))
    }
}

/// A value whose nested objects are computed on access
#[derive(Clone)]
pub enum LazyValue<'r, E> {
    /// Text, or `null` for absent text
    Scalar(Value),
    Object(LazyObject<'r, E>),
    Array(Vec<LazyValue<'r, E>>),
}

impl<'r, E: Element> LazyValue<'r, E> {
    pub fn as_object(&self) -> Option<&LazyObject<'r, E>> {
        match self {
            LazyValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[LazyValue<'r, E>]> {
        match self {
            LazyValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            LazyValue::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// Materialize everything below this value
    pub fn to_value(&self) -> Result<Value> {
        match self {
            LazyValue::Scalar(value) => Ok(value.clone()),
            LazyValue::Object(object) => object.to_value(),
            LazyValue::Array(values) => values
                .iter()
                .map(LazyValue::to_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
        }
    }
}

/// An element viewed as an object, resolved one key at a time
#[derive(Clone)]
pub struct LazyObject<'r, E> {
    resolver: &'r Resolver,
    element: E,
}

impl<'r, E: Element> LazyObject<'r, E> {
    /// The element this object was resolved from, unchanged
    pub fn source(&self) -> &E {
        &self.element
    }

    /// Materialize the whole object and render it as JSON text
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    /// With strict keys, any collision in this object fails every read, as
    /// it fails `resolve`
    fn check_keys(&self) -> Result<()> {
        if self.resolver.options().strict_keys {
            self.resolver.assemble(&self.element, None, |_| Ok(()))?;
        }
        Ok(())
    }

    fn lazy(&self, contribution: &Contribution<E>) -> LazyValue<'r, E> {
        match &contribution.source {
            Source::Attribute(value) => LazyValue::Scalar(Value::String(value.clone())),
            Source::Child(child) => match contribution.shape {
                Shape::Single(form) | Shape::Repeated(form) => self.resolver.lazy(child.clone(), form),
                Shape::Suppressed => LazyValue::Scalar(Value::Null),
            },
        }
    }
}

impl<'r, E: Element> ObjectView for LazyObject<'r, E> {
    type Item = LazyValue<'r, E>;

    fn get(&self, key: &str) -> Result<Option<LazyValue<'r, E>>> {
        self.check_keys()?;
        let slots = self
            .resolver
            .assemble(&self.element, Some(key), |contribution| Ok(self.lazy(contribution)))?;
        Ok(slots.into_iter().next().map(|(_, slot)| match slot {
            Slot::One(value) => value,
            Slot::Many(values) => LazyValue::Array(values),
        }))
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check_keys()?;
        let mut keys: Vec<String> = Vec::new();
        for contribution in self.resolver.contributions(&self.element) {
            if contribution.shape != Shape::Suppressed && !keys.contains(&contribution.key) {
                keys.push(contribution.key);
            }
        }
        Ok(keys)
    }

    fn to_value(&self) -> Result<Value> {
        self.resolver.materialize(&self.element, Form::Nested)
    }
}

impl Resolver {
    /// Lazily resolve the tree below `root`.
    ///
    /// Nothing below the root is resolved until it is read; every read
    /// recomputes from the source tree.
    pub fn view<E: Element>(&self, root: E) -> LazyValue<'_, E> {
        match self.root_shape(&root) {
            Shape::Single(form) | Shape::Repeated(form) => self.lazy(root, form),
            Shape::Suppressed => LazyValue::Scalar(Value::Null),
        }
    }

    fn lazy<E: Element>(&self, element: E, form: Form) -> LazyValue<'_, E> {
        match form {
            Form::Text => LazyValue::Scalar(element_text(&element, self.options())),
            Form::Nested => LazyValue::Object(LazyObject {
                resolver: self,
                element,
            }),
        }
    }
}
