// Copyright (c) 2018 Jason White
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, NameError, TypeError};
use crate::ident;

/// The rule-type-specific configuration carried by a [`Rule`].
///
/// Each variant mirrors one of the built-in rule types implemented in
/// `rules_builtin`. `Custom` is the escape hatch for rule types registered
/// through a [`crate::rule_types::RuleTypeRegistry`] that this crate does
/// not itself define.
#[derive(Debug, Clone, Serialize)]
pub enum RuleKind {
    /// `file_set` — passes `srcs` through as outputs unmodified.
    FileSet,

    /// `copy_files` — copies each src into the output tree at a mirrored
    /// path.
    CopyFiles,

    /// `concat_files` — concatenates all `srcs`, in order, into a single
    /// output file.
    ConcatFiles {
        /// Output file name. Defaults to the rule name when absent.
        out: Option<String>,
    },

    /// `template_files` — substitutes `${key}` placeholders in each src.
    TemplateFiles {
        /// Replacement extension for output file names, including the
        /// leading dot (e.g., `.txt`).
        new_extension: Option<String>,

        /// Key/value substitution parameters.
        params: BTreeMap<String, String>,
    },

    /// Any rule type registered by a host binary through the rule type
    /// registry, keyed by its registration tag.
    Custom { type_tag: String, config: Value },
}

impl RuleKind {
    /// The registry tag this rule type is dispatched under.
    pub fn tag(&self) -> &str {
        match self {
            RuleKind::FileSet => "file_set",
            RuleKind::CopyFiles => "copy_files",
            RuleKind::ConcatFiles { .. } => "concat_files",
            RuleKind::TemplateFiles { .. } => "template_files",
            RuleKind::Custom { type_tag, .. } => type_tag,
        }
    }
}

/// A single unit of work: a name, its source/dependency references, and
/// rule-type-specific configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub name: String,
    pub srcs: Vec<String>,
    pub deps: Vec<String>,
    pub kind: RuleKind,
}

/// Validates a single `srcs`/`deps` element. Unlike a rule or module name,
/// a colon is permitted here (it is the rule-reference marker), but
/// whitespace is not.
fn validate_element(s: &str) -> Result<(), NameError> {
    if s.is_empty() {
        // Callers turn this into a TypeError; this branch only exists so
        // the whitespace check below never runs against an empty string.
        return Ok(());
    }

    if s.contains(char::is_whitespace) {
        return Err(NameError::new(s.to_string()));
    }

    Ok(())
}

/// Validates that a `deps` element is a rule reference: either a bare
/// `:name` or a fully qualified `module_path:name`. A plain path with no
/// colon at all is not a valid dependency, even though it would be a
/// perfectly fine `srcs` entry.
fn validate_dep_reference(s: &str) -> Result<(), NameError> {
    if s.contains(':') {
        Ok(())
    } else {
        Err(NameError::new(s.to_string()))
    }
}

/// Normalizes a `srcs`/`deps` constructor argument.
///
/// Mirrors the exact boundary behavior of the dynamically typed
/// constructor this was distilled from:
/// - absent / `null` / empty string -> empty list.
/// - non-empty string -> one-element list.
/// - array -> each element validated individually.
/// - anything else (object, number, bool) -> a type error.
pub fn parse_string_list(value: Option<&Value>) -> Result<Vec<String>, Error> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => {
            if s.is_empty() {
                Ok(Vec::new())
            } else {
                validate_element(s)?;
                Ok(vec![s.clone()])
            }
        }
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());

            for item in items {
                match item {
                    Value::String(s) if !s.is_empty() => {
                        validate_element(s)?;
                        out.push(s.clone());
                    }
                    other => {
                        return Err(TypeError::new(format!(
                            "expected a non-empty string in list, found {}",
                            other
                        ))
                        .into());
                    }
                }
            }

            Ok(out)
        }
        Some(other) => Err(TypeError::new(format!(
            "expected a string or a list of strings, found {}",
            other
        ))
        .into()),
    }
}

/// Normalizes and validates a `deps` constructor argument. Same shape
/// rules as [`parse_string_list`], plus: every resulting entry must be a
/// rule reference (contain a `:`), since deps are rule references only.
fn parse_dep_list(value: Option<&Value>) -> Result<Vec<String>, Error> {
    let deps = parse_string_list(value)?;

    for dep in &deps {
        validate_dep_reference(dep)?;
    }

    Ok(deps)
}

#[derive(Serialize)]
struct CacheKeyInput<'a> {
    name: &'a str,
    srcs: &'a [String],
    deps: &'a [String],
    kind: &'a RuleKind,
}

impl Rule {
    /// Constructs a new rule.
    ///
    /// `srcs` and `deps` accept any shape the original dynamically typed
    /// constructor did: absent, `null`, a bare string, or a list of
    /// strings. See [`parse_string_list`].
    pub fn new(
        name: &str,
        srcs: Option<&Value>,
        deps: Option<&Value>,
        kind: RuleKind,
    ) -> Result<Rule, Error> {
        ident::validate_name(name)?;

        Ok(Rule {
            name: name.to_string(),
            srcs: parse_string_list(srcs)?,
            deps: parse_dep_list(deps)?,
            kind,
        })
    }

    /// The rule's locally qualified path, `:name`.
    pub fn full_name(&self) -> String {
        format!(":{}", self.name)
    }

    /// Computes a stable cache key derived from the rule's identity and
    /// configuration. Equal rules (by name, srcs, deps, and kind) always
    /// produce equal keys; changing any of those fields changes the key.
    pub fn compute_cache_key(&self) -> String {
        let input = CacheKeyInput {
            name: &self.name,
            srcs: &self.srcs,
            deps: &self.deps,
            kind: &self.kind,
        };

        let bytes = bincode::serialize(&input)
            .expect("rule cache key input is always serializable");

        let mut hasher = Sha256::default();
        hasher.input(&bytes);
        hex::encode(hasher.result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> Rule {
        Rule::new(name, None, None, RuleKind::FileSet).unwrap()
    }

    fn rule_with_srcs(name: &str, srcs: Value) -> Rule {
        Rule::new(name, Some(&srcs), None, RuleKind::FileSet).unwrap()
    }

    #[test]
    fn names() {
        assert!(Rule::new("", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new(" ", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new(" a", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new("a ", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new(" a ", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new("a\n", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new("a\t", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new("a b", None, None, RuleKind::FileSet).is_err());
        assert!(Rule::new(":a", None, None, RuleKind::FileSet).is_err());

        let r = rule("a");
        assert_eq!(r.name, "a");
        assert_eq!(r.full_name(), ":a");

        assert!(Rule::new(
            "\u{0CA}_\u{0CA}",
            None,
            None,
            RuleKind::FileSet
        )
        .is_ok());
    }

    #[test]
    fn srcs_from_list() {
        let r = rule_with_srcs(
            "r",
            Value::Array(vec![
                Value::String("a".into()),
                Value::String("b".into()),
                Value::String(":c".into()),
            ]),
        );
        assert_eq!(r.srcs, vec!["a", "b", ":c"]);
    }

    #[test]
    fn srcs_from_string() {
        let r = rule_with_srcs("r", Value::String("a".into()));
        assert_eq!(r.srcs, vec!["a"]);
    }

    #[test]
    fn srcs_absent_or_empty() {
        assert!(rule("r").srcs.is_empty());
        assert!(rule_with_srcs("r", Value::Null).srcs.is_empty());
        assert!(rule_with_srcs("r", Value::String(String::new()))
            .srcs
            .is_empty());
    }

    #[test]
    fn srcs_type_errors() {
        assert!(Rule::new(
            "r",
            Some(&Value::Object(Default::default())),
            None,
            RuleKind::FileSet
        )
        .is_err());
        assert!(Rule::new(
            "r",
            Some(&Value::Array(vec![Value::Null])),
            None,
            RuleKind::FileSet
        )
        .is_err());
        assert!(Rule::new(
            "r",
            Some(&Value::Array(vec![Value::String(String::new())])),
            None,
            RuleKind::FileSet
        )
        .is_err());
        assert!(Rule::new(
            "r",
            Some(&Value::Array(vec![Value::Object(Default::default())])),
            None,
            RuleKind::FileSet
        )
        .is_err());
    }

    #[test]
    fn srcs_name_errors() {
        assert!(Rule::new(
            "r",
            Some(&Value::String(" a".into())),
            None,
            RuleKind::FileSet
        )
        .is_err());
        assert!(Rule::new(
            "r",
            Some(&Value::String("a ".into())),
            None,
            RuleKind::FileSet
        )
        .is_err());
        assert!(Rule::new(
            "r",
            Some(&Value::String(" a ".into())),
            None,
            RuleKind::FileSet
        )
        .is_err());
    }

    #[test]
    fn deps_mirror_srcs_rules() {
        let deps = Value::Array(vec![
            Value::String(":a".into()),
            Value::String(":b".into()),
            Value::String(":c".into()),
        ]);
        let r = Rule::new("r", None, Some(&deps), RuleKind::FileSet).unwrap();
        assert_eq!(r.deps, vec![":a", ":b", ":c"]);

        assert!(Rule::new(
            "r",
            None,
            Some(&Value::Object(Default::default())),
            RuleKind::FileSet
        )
        .is_err());
    }

    #[test]
    fn deps_must_be_rule_references() {
        assert!(Rule::new(
            "r",
            None,
            Some(&Value::String("plainpath".into())),
            RuleKind::FileSet
        )
        .is_err());

        assert!(Rule::new(
            "r",
            None,
            Some(&Value::Array(vec![Value::String("plainpath".into())])),
            RuleKind::FileSet
        )
        .is_err());

        assert!(Rule::new(
            "r",
            None,
            Some(&Value::String("mod:a".into())),
            RuleKind::FileSet
        )
        .is_ok());
    }

    #[test]
    fn cache_key_is_stable_and_sensitive() {
        let r1 = rule("r1");
        let key1 = r1.compute_cache_key();
        assert!(!key1.is_empty());
        assert_eq!(key1, r1.compute_cache_key());

        let r1_with_src = rule_with_srcs("r1", Value::String("a".into()));
        assert_ne!(key1, r1_with_src.compute_cache_key());

        let r1 = rule("r1");
        let r2 = rule("r1");
        assert_eq!(r1.compute_cache_key(), r2.compute_cache_key());

        let r1 = rule("r1");
        let r2 = rule("r2");
        assert_ne!(r1.compute_cache_key(), r2.compute_cache_key());

        let r1 = rule_with_srcs("r1", Value::String("a".into()));
        let r2 = rule_with_srcs("r1", Value::String("a".into()));
        assert_eq!(r1.compute_cache_key(), r2.compute_cache_key());

        let r1 = rule_with_srcs("r1", Value::String("a".into()));
        let r2 = rule_with_srcs("r1", Value::String("b".into()));
        assert_ne!(r1.compute_cache_key(), r2.compute_cache_key());
    }
}
