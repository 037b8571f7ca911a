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

//! A process-wide, explicit registry mapping a rule type's tag (`file_set`,
//! `copy_files`, ...) to the [`RuleBehavior`] constructor that gives a
//! [`crate::rule::Rule`] of that type its meaning. Built at build startup,
//! before any [`crate::project::Project`] is constructed, and never mutated
//! afterward — this is the one piece of global state the design notes call
//! for, modeled as a value a loader owns rather than a hidden global.

use std::collections::HashMap;

use crate::error::{Error, TypeError};
use crate::rule::Rule;
use crate::rule_context::RuleBehavior;
use crate::rules_builtin;

type Factory =
    Box<dyn Fn(&Rule) -> Result<Box<dyn RuleBehavior>, Error> + Send + Sync>;

/// Maps a rule type's registry tag to a constructor for its
/// [`RuleBehavior`].
#[derive(Default)]
pub struct RuleTypeRegistry {
    factories: HashMap<String, Factory>,
}

impl RuleTypeRegistry {
    pub fn new() -> RuleTypeRegistry {
        RuleTypeRegistry {
            factories: HashMap::new(),
        }
    }

    /// Registers a rule type under `tag`. Replaces any existing
    /// registration for the same tag.
    pub fn register<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&Rule) -> Result<Box<dyn RuleBehavior>, Error>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(tag.to_string(), Box::new(factory));
    }

    /// Instantiates the [`RuleBehavior`] for `rule`, dispatched by its
    /// [`crate::rule::RuleKind::tag`].
    ///
    /// The engine never matches on `RuleKind` itself beyond this one call;
    /// everything else flows through the trait object this returns.
    pub fn create(&self, rule: &Rule) -> Result<Box<dyn RuleBehavior>, Error> {
        let tag = rule.kind.tag();

        match self.factories.get(tag) {
            Some(factory) => factory(rule),
            None => Err(TypeError::new(format!(
                "no rule type registered for tag {:?}",
                tag
            ))
            .into()),
        }
    }
}

/// Registers the four illustrative built-in rule types (`file_set`,
/// `copy_files`, `concat_files`, `template_files`).
pub fn register_builtins(registry: &mut RuleTypeRegistry) {
    rules_builtin::register(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    #[test]
    fn unregistered_tag_is_a_type_error() {
        let registry = RuleTypeRegistry::new();
        let rule = Rule::new("r", None, None, RuleKind::FileSet).unwrap();

        match registry.create(&rule) {
            Err(Error::Type(_)) => {}
            other => panic!("expected a type error, got {:?}", other),
        }
    }

    #[test]
    fn builtins_cover_every_built_in_tag() {
        let mut registry = RuleTypeRegistry::new();
        register_builtins(&mut registry);

        for kind in [
            RuleKind::FileSet,
            RuleKind::CopyFiles,
            RuleKind::ConcatFiles { out: None },
            RuleKind::TemplateFiles {
                new_extension: None,
                params: Default::default(),
            },
        ] {
            let rule = Rule::new("r", None, None, kind).unwrap();
            assert!(registry.create(&rule).is_ok());
        }
    }
}
