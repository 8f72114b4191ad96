//! Command-line XML to JSON conversion
//!
//! Usage:
//!   jsxn [INPUT] [--rules FILE] [--pretty] [--lazy-keys] [option flags]
//!
//! The rules file holds either a JSON array of rules, or an object
//! `{ "options": {...}, "rules": [...] }`. Option flags override the file.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use jsxn::{Cardinality, JsonLinesSink, ObjectView, Options, Resolver, RuleSet};
use jsxn_roxmltree::XmlDocument;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "jsxn", version, about = "Convert XML to JSON using declarative rules")]
struct Cli {
    /// XML file to convert; reads stdin when omitted or `-`
    input: Option<PathBuf>,

    /// JSON file with rules, or with options and rules
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Keep local names as written instead of camel-casing them
    #[arg(long)]
    no_camel_case: bool,

    /// Cardinality of nodes no rule matches (single, multiple, text, none)
    #[arg(long)]
    default_type: Option<Cardinality>,

    /// Write every rule resolution to stderr as JSON lines
    #[arg(long)]
    debug_rules: bool,

    /// Fail when two nodes resolve to the same key
    #[arg(long)]
    strict_keys: bool,

    /// Trim surrounding whitespace from element text
    #[arg(long)]
    trim_text: bool,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    /// Print the keys of the root object, one per line, instead of the value
    #[arg(long)]
    lazy_keys: bool,
}

/// Object form of a rules file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesConfig {
    options: Options,
    rules: RuleSet,
}

/// Load options and rules from a rules file.
fn load_config(path: &Path) -> Result<(Options, RuleSet)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid rules file {}", path.display()))
}

fn parse_config(text: &str) -> Result<(Options, RuleSet)> {
    let document: Value = serde_json::from_str(text)?;
    match document {
        Value::Array(_) => Ok((Options::default(), serde_json::from_value(document)?)),
        Value::Object(_) => {
            let config: RulesConfig = serde_json::from_value(document)?;
            Ok((config.options, config.rules))
        }
        _ => bail!("expected a JSON array of rules or an object with `options` and `rules`"),
    }
}

/// Apply command-line flags on top of file options
fn apply_flags(mut options: Options, cli: &Cli) -> Options {
    if cli.no_camel_case {
        options.convert_keys_to_camel_case = false;
    }
    if let Some(default_type) = cli.default_type {
        options.default_type = default_type;
    }
    options.debug_rules |= cli.debug_rules;
    options.strict_keys |= cli.strict_keys;
    options.trim_text |= cli.trim_text;
    options
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut xml = String::new();
            io::stdin()
                .read_to_string(&mut xml)
                .context("failed to read XML from stdin")?;
            Ok(xml)
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let (options, rules) = match &cli.rules {
        Some(path) => load_config(path)?,
        None => (Options::default(), RuleSet::default()),
    };
    let options = apply_flags(options, cli);
    let debug_rules = options.debug_rules;

    let mut resolver = Resolver::new(&rules, options).context("invalid rules")?;
    if debug_rules {
        resolver = resolver.with_diagnostics(Rc::new(JsonLinesSink::new(io::stderr())));
    }

    let xml = read_input(cli.input.as_deref())?;
    let doc = XmlDocument::parse(&xml).context("failed to parse XML")?;

    if cli.lazy_keys {
        let view = resolver.view(doc.root_element());
        let Some(root) = view.as_object() else {
            bail!("the document element resolves to a scalar, it has no keys");
        };
        return Ok(root.keys()?.join("\n"));
    }

    let value = resolver
        .resolve(&doc.root_element())
        .context("failed to resolve document")?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(rendered)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_array() {
        let (options, rules) = parse_config(r#"[{"element": "plant", "type": "multiple"}]"#).unwrap();
        assert_eq!(options, Options::default());
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_parse_config_object() {
        let (options, rules) = parse_config(
            r#"{"options": {"convertKeysToCamelCase": false}, "rules": [{"attribute": "id", "type": "none"}]}"#,
        )
        .unwrap();
        assert!(!options.convert_keys_to_camel_case);
        assert_eq!(rules.len(), 1);

        let (_, rules) = parse_config(r#"{"options": {"trimText": true}}"#).unwrap();
        assert_eq!(rules, RuleSet::default());
    }

    #[test]
    fn test_parse_config_rejects_scalars() {
        assert!(parse_config("42").is_err());
        assert!(parse_config(r#"{"rulez": []}"#).is_err());
    }

    #[test]
    fn test_flags_override_options() {
        let cli = Cli::parse_from(["jsxn", "--no-camel-case", "--default-type", "multiple", "--strict-keys"]);
        let options = apply_flags(Options::default(), &cli);
        assert!(!options.convert_keys_to_camel_case);
        assert_eq!(options.default_type, Cardinality::Multiple);
        assert!(options.strict_keys);
        assert!(!options.debug_rules);
    }

    #[test]
    fn test_unknown_default_type_is_rejected() {
        assert!(Cli::try_parse_from(["jsxn", "--default-type", "auto"]).is_err());
    }
}
