//! Rule resolution tracing
//!
//! With [`Options::debug_rules`](crate::Options::debug_rules) enabled, the
//! resolver reports one [`RuleTrace`] per element or attribute it resolves
//! to the sink installed with
//! [`Resolver::with_diagnostics`](crate::Resolver::with_diagnostics).
//! Tracing never changes the resolved value.

use std::cell::RefCell;
use std::io::Write;

use serde::Serialize;

use crate::node::NodeKind;
use crate::rule::Cardinality;
use crate::shape::Shape;

/// One resolution decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    pub kind: NodeKind,
    pub local_name: String,
    pub namespace: Option<String>,
    /// Local name of the containing element, `None` for the root
    pub parent: Option<String>,
    /// Index of the matched rule in the rule set, `None` for the default rule
    pub rule: Option<usize>,
    pub cardinality: Cardinality,
    pub key: String,
    pub shape: Shape,
}

/// Receiver of resolution decisions
pub trait DiagnosticsSink {
    fn record(&self, trace: &RuleTrace);
}

impl<F: Fn(&RuleTrace)> DiagnosticsSink for F {
    fn record(&self, trace: &RuleTrace) {
        self(trace)
    }
}

/// Keeps every trace in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    traces: RefCell<Vec<RuleTrace>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traces recorded so far, oldest first
    pub fn traces(&self) -> Vec<RuleTrace> {
        self.traces.borrow().clone()
    }

    pub fn clear(&self) {
        self.traces.borrow_mut().clear();
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&self, trace: &RuleTrace) {
        self.traces.borrow_mut().push(trace.clone());
    }
}

/// Writes each trace as one line of JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> DiagnosticsSink for JsonLinesSink<W> {
    fn record(&self, trace: &RuleTrace) {
        let mut writer = self.writer.borrow_mut();
        // A failing diagnostics stream must not fail resolution.
        if serde_json::to_writer(&mut *writer, trace).is_ok() {
            let _ = writer.write_all(b"\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Form;

    fn trace() -> RuleTrace {
        RuleTrace {
            kind: NodeKind::Element,
            local_name: "plant".to_string(),
            namespace: None,
            parent: Some("root".to_string()),
            rule: Some(0),
            cardinality: Cardinality::Multiple,
            key: "plant".to_string(),
            shape: Shape::Repeated(Form::Nested),
        }
    }

    #[test]
    fn test_json_lines_sink() {
        let sink = JsonLinesSink::new(Vec::new());
        sink.record(&trace());
        sink.record(&trace());
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"kind":"element","localName":"plant","namespace":null,"parent":"root","rule":0,"cardinality":"multiple","key":"plant","shape":{"repeated":"nested"}}"#
        );
    }

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |t: &RuleTrace| seen.borrow_mut().push(t.key.clone());
        sink.record(&trace());
        assert_eq!(seen.into_inner(), vec!["plant".to_string()]);
    }
}
