//! Resolver configuration

use serde::Deserialize;

use crate::error::Result;
use crate::rule::Cardinality;

/// Options shared by every resolution step.
///
/// Deserializes from camelCase JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Turn `dash-case` and `snake_case` local names into `camelCase`
    pub convert_keys_to_camel_case: bool,
    /// Cardinality of nodes no rule matches, and of rules that name none
    pub default_type: Cardinality,
    /// Report every resolution decision to the installed diagnostics sink
    pub debug_rules: bool,
    /// Trim surrounding whitespace from extracted text
    pub trim_text: bool,
    /// Fail instead of silently dropping a contribution to an occupied key
    pub strict_keys: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            convert_keys_to_camel_case: true,
            default_type: Cardinality::Single,
            debug_rules: false,
            trim_text: false,
            strict_keys: false,
        }
    }
}

impl Options {
    /// Parse options from a JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_camel_case(mut self, enabled: bool) -> Self {
        self.convert_keys_to_camel_case = enabled;
        self
    }

    pub fn with_default_type(mut self, cardinality: Cardinality) -> Self {
        self.default_type = cardinality;
        self
    }

    pub fn with_debug_rules(mut self, enabled: bool) -> Self {
        self.debug_rules = enabled;
        self
    }

    pub fn with_trim_text(mut self, enabled: bool) -> Self {
        self.trim_text = enabled;
        self
    }

    pub fn with_strict_keys(mut self, enabled: bool) -> Self {
        self.strict_keys = enabled;
        self
    }
}
