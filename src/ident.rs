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

//! Identifier grammar for rule and module names, and for the `:name` /
//! `module_path:name` reference syntax used in `srcs`/`deps`.

use crate::error::NameError;

/// Checks that a bare rule or module name is valid: non-empty and free of
/// whitespace and colons. Colons are reserved for the `:name` reference
/// syntax and can never appear in the name itself.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::new(name));
    }

    if name.contains(|c: char| c.is_whitespace() || c == ':') {
        return Err(NameError::new(name));
    }

    Ok(())
}

/// A parsed rule reference, either local to the referencing rule's own
/// module (`:name`) or fully qualified to another module
/// (`module_path:name`).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RulePath {
    /// `:name` — resolved within the referencing rule's own module.
    Local(String),

    /// `module_path:name` — resolved against a specific module.
    Qualified(String, String),
}

impl RulePath {
    /// The bare rule name, regardless of qualification.
    pub fn name(&self) -> &str {
        match self {
            RulePath::Local(name) => name,
            RulePath::Qualified(_, name) => name,
        }
    }
}

/// Parses a `:name` or `module_path:name` reference string.
///
/// Returns a [`NameError`] if there is no colon, if the name half is
/// invalid, or (for a qualified path) if the module half is empty.
pub fn parse_rule_path(path: &str) -> Result<RulePath, NameError> {
    let idx = path
        .find(':')
        .ok_or_else(|| NameError::new(path.to_string()))?;

    let (module, name) = path.split_at(idx);
    let name = &name[1..]; // skip the colon itself

    validate_name(name)?;

    if module.is_empty() {
        Ok(RulePath::Local(name.to_string()))
    } else {
        Ok(RulePath::Qualified(module.to_string(), name.to_string()))
    }
}

/// Classifies a `srcs`/`deps` element as a literal path or a rule
/// reference.
///
/// A leading `:` is the only marker for a reference; a colon appearing
/// anywhere else (for example, a Windows drive letter) makes the string a
/// literal path instead.
pub fn is_rule_reference(s: &str) -> bool {
    s.starts_with(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert!(validate_name("a").is_ok());
        assert!(validate_name("\u{0CA}_\u{0CA}").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name(" ").is_err());
        assert!(validate_name(" a").is_err());
        assert!(validate_name("a ").is_err());
        assert!(validate_name(" a ").is_err());
        assert!(validate_name("a\n").is_err());
        assert!(validate_name("a\t").is_err());
        assert!(validate_name("a b").is_err());
        assert!(validate_name(":a").is_err());
    }

    #[test]
    fn classify() {
        assert!(is_rule_reference(":a"));
        assert!(!is_rule_reference("a"));
        assert!(!is_rule_reference("C:/foo/bar"));
    }

    #[test]
    fn parse_local() {
        match parse_rule_path(":a1").unwrap() {
            RulePath::Local(name) => assert_eq!(name, "a1"),
            other => panic!("expected Local, got {:?}", other),
        }
    }

    #[test]
    fn parse_qualified() {
        match parse_rule_path("mod/sub:a1").unwrap() {
            RulePath::Qualified(module, name) => {
                assert_eq!(module, "mod/sub");
                assert_eq!(name, "a1");
            }
            other => panic!("expected Qualified, got {:?}", other),
        }
    }

    #[test]
    fn parse_invalid() {
        assert!(parse_rule_path("no-colon").is_err());
        assert!(parse_rule_path(":").is_err());
        assert!(parse_rule_path(": a").is_err());
    }
}
