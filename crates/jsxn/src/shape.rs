//! Output shape of elements and attributes

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::node::{Attribute, Element};
use crate::options::Options;
use crate::rule::Effect;

/// How a single value is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    /// The node's text
    Text,
    /// An object built from the element's children and attributes
    Nested,
}

/// How a node contributes to its parent's object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// One value under its key
    Single(Form),
    /// One entry of the array under its key
    Repeated(Form),
    /// Nothing
    Suppressed,
}

/// An element without child elements and without attributes other than
/// namespace declarations is a leaf: it collapses to its text.
pub fn is_leaf<E: Element>(element: &E) -> bool {
    element.child_element_count() == 0
        && element
            .attributes()
            .iter()
            .all(|attribute| attribute.is_namespace_declaration())
}

/// Shape of an element under the effect of its matched rule
pub fn resolve_shape<E: Element>(element: &E, effect: &Effect) -> Shape {
    let form = || {
        if is_leaf(element) {
            Form::Text
        } else {
            Form::Nested
        }
    };
    match effect {
        Effect::Text { .. } => Shape::Single(Form::Text),
        Effect::Suppressed => Shape::Suppressed,
        Effect::Multiple { .. } => Shape::Repeated(form()),
        Effect::Single { .. } => Shape::Single(form()),
    }
}

/// Shape of an attribute.
///
/// Attributes are always a single text value, even under a `multiple` rule:
/// only child elements accumulate into arrays.
pub fn resolve_attribute_shape(effect: &Effect) -> Shape {
    match effect {
        Effect::Suppressed => Shape::Suppressed,
        Effect::Single { .. } | Effect::Multiple { .. } | Effect::Text { .. } => {
            Shape::Single(Form::Text)
        }
    }
}

/// Text value of an element.
///
/// Falls back to the raw inner markup when the text content is empty and
/// the source exposes markup; the fallback is best effort and not
/// equivalent to parsed text.
pub fn element_text<E: Element>(element: &E, options: &Options) -> Value {
    let clean = |text: String| {
        if options.trim_text {
            text.trim().to_string()
        } else {
            text
        }
    };
    match element.text_content().map(clean) {
        Some(text) if !text.is_empty() => Value::String(text),
        text => match element.inner_markup().map(clean) {
            Some(markup) if !markup.is_empty() => Value::String(markup),
            _ => text.map_or(Value::Null, Value::String),
        },
    }
}

/// Value held under one output key while an object is assembled
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Slot<T> {
    /// Offer a contribution to a slot, applying first-write-wins.
    ///
    /// `make` is only called when the contribution is kept. Returns whether
    /// it was kept; with `strict` set, a dropped contribution is an error.
    pub fn place(
        slot: &mut Option<Slot<T>>,
        repeated: bool,
        strict: bool,
        key: &str,
        element: &str,
        make: impl FnOnce() -> Result<T>,
    ) -> Result<bool> {
        match slot {
            None => {
                let value = make()?;
                *slot = Some(if repeated {
                    Slot::Many(vec![value])
                } else {
                    Slot::One(value)
                });
                Ok(true)
            }
            Some(Slot::Many(values)) if repeated => {
                values.push(make()?);
                Ok(true)
            }
            Some(_) if strict => Err(Error::ambiguous_key(key, element)),
            Some(_) => Ok(false),
        }
    }
}

impl From<Slot<Value>> for Value {
    fn from(slot: Slot<Value>) -> Self {
        match slot {
            Slot::One(value) => value,
            Slot::Many(values) => Value::Array(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::XmlElement;

    #[test]
    fn test_leaf_ignores_namespace_declarations() {
        let leaf = XmlElement::new("root").with_attribute("xmlns:y", "http://localhost/yellow");
        let attributed = XmlElement::new("plant").with_attribute("type", "shrub");
        let parent = XmlElement::new("tree").with_child(XmlElement::new("branch"));
        assert!(is_leaf(&&leaf));
        assert!(!is_leaf(&&attributed));
        assert!(!is_leaf(&&parent));
    }

    #[test]
    fn test_shapes() {
        let attributed = XmlElement::new("plant").with_attribute("type", "shrub");
        let leaf = XmlElement::new("item").with_text("1");
        let single = Effect::Single { as_key: None };
        let multiple = Effect::Multiple { as_key: None };
        let text = Effect::Text { as_key: None };

        assert_eq!(resolve_shape(&&attributed, &single), Shape::Single(Form::Nested));
        assert_eq!(resolve_shape(&&leaf, &single), Shape::Single(Form::Text));
        assert_eq!(resolve_shape(&&attributed, &multiple), Shape::Repeated(Form::Nested));
        assert_eq!(resolve_shape(&&leaf, &multiple), Shape::Repeated(Form::Text));
        assert_eq!(resolve_shape(&&attributed, &text), Shape::Single(Form::Text));
        assert_eq!(resolve_shape(&&leaf, &Effect::Suppressed), Shape::Suppressed);
        assert_eq!(resolve_attribute_shape(&multiple), Shape::Single(Form::Text));
        assert_eq!(resolve_attribute_shape(&text), Shape::Single(Form::Text));
    }

    #[test]
    fn test_element_text_fallbacks() {
        let options = Options::default();
        let text = XmlElement::new("a").with_text("  hi ");
        let absent = XmlElement::new("a");
        let empty = XmlElement::new("a").with_text("");
        let markup = XmlElement::new("a").with_text("").with_inner_markup("<b/>");

        assert_eq!(element_text(&&text, &options), Value::from("  hi "));
        assert_eq!(element_text(&&text, &options.clone().with_trim_text(true)), Value::from("hi"));
        assert_eq!(element_text(&&absent, &options), Value::Null);
        assert_eq!(element_text(&&empty, &options), Value::from(""));
        assert_eq!(element_text(&&markup, &options), Value::from("<b/>"));
    }

    #[test]
    fn test_slot_first_write_wins() {
        let mut slot = None;
        assert!(Slot::place(&mut slot, false, false, "k", "e", || Ok(1)).unwrap());
        assert!(!Slot::place(&mut slot, false, false, "k", "e", || unreachable!()).unwrap());
        assert!(!Slot::place(&mut slot, true, false, "k", "e", || unreachable!()).unwrap());
        assert_eq!(slot, Some(Slot::One(1)));

        let err = Slot::place(&mut slot, false, true, "k", "e", || Ok(2)).unwrap_err();
        assert!(matches!(err, Error::AmbiguousKey { .. }));
    }

    #[test]
    fn test_slot_accumulates() {
        let mut slot = None;
        for n in 1..=3 {
            assert!(Slot::place(&mut slot, true, true, "k", "e", || Ok(n)).unwrap());
        }
        assert!(!Slot::place(&mut slot, false, false, "k", "e", || Ok(9)).unwrap());
        assert_eq!(slot, Some(Slot::Many(vec![1, 2, 3])));
    }
}
