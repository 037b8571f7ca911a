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

use crate::error::Error;
use crate::ident::{self, RulePath};
use crate::module::Module;
use crate::rule::Rule;

/// Default project name used when none is given to [`Project::new`].
const DEFAULT_PROJECT_NAME: &str = "project";

/// Name of the implicit module that rules added via [`Project::add_rule`]
/// (rather than through a [`Module`]) live in.
const DEFAULT_MODULE_NAME: &str = "";

/// A full collection of modules and the rules they declare.
///
/// Rule lookup by `:name` is flat across the whole project: a module is an
/// organizational grouping, not a separate namespace. Only a qualified
/// `module_path:name` reference narrows the search to one module.
#[derive(Debug)]
pub struct Project {
    pub name: String,
    modules: Vec<Module>,
}

impl Default for Project {
    fn default() -> Project {
        Project::new()
    }
}

impl Project {
    pub fn new() -> Project {
        Project {
            name: DEFAULT_PROJECT_NAME.to_string(),
            modules: Vec::new(),
        }
    }

    pub fn with_name<S: Into<String>>(name: S) -> Project {
        Project {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn with_modules<I: IntoIterator<Item = Module>>(
        modules: I,
    ) -> Project {
        Project {
            name: DEFAULT_PROJECT_NAME.to_string(),
            modules: modules.into_iter().collect(),
        }
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Adds a single rule to the project's default (unnamed) module.
    pub fn add_rule(&mut self, rule: Rule) {
        if let Some(module) = self
            .modules
            .iter_mut()
            .find(|m| m.name == DEFAULT_MODULE_NAME)
        {
            module.add_rule(rule);
        } else {
            let mut module = Module::new(DEFAULT_MODULE_NAME);
            module.add_rule(rule);
            self.modules.push(module);
        }
    }

    /// Adds each rule in `rules`, in order, to the project's default
    /// module.
    pub fn add_rules<I: IntoIterator<Item = Rule>>(&mut self, rules: I) {
        for rule in rules {
            self.add_rule(rule);
        }
    }

    /// Looks up a rule by its `:name` or `module_path:name` reference.
    ///
    /// Returns `Ok(None)` if the path is well-formed but no such rule
    /// exists, and an error if the path itself is malformed (for example,
    /// missing the leading colon entirely).
    pub fn get_rule(&self, path: &str) -> Result<Option<&Rule>, Error> {
        match ident::parse_rule_path(path)? {
            RulePath::Local(name) => Ok(self
                .modules
                .iter()
                .flat_map(|m| m.rules())
                .find(|r| r.name == name)),
            RulePath::Qualified(module_path, name) => Ok(self
                .modules
                .iter()
                .find(|m| m.name == module_path)
                .and_then(|m| m.rules().iter().find(|r| r.name == name))),
        }
    }

    /// All rules in the project, in module-then-insertion order.
    pub fn rules_list(&self) -> Vec<&Rule> {
        self.modules.iter().flat_map(|m| m.rules()).collect()
    }

    /// An iterator over all rules in the project.
    pub fn rules_iter(&self) -> impl Iterator<Item = &Rule> {
        self.modules.iter().flat_map(|m| m.rules())
    }

    /// An iterator over every module in the project.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// The path of the module that owns `rule`, used to resolve a rule's
    /// file-path `srcs` and to mirror its outputs into the output tree.
    ///
    /// Identity is by address: `rule` must be a reference borrowed from
    /// this project (true of every [`Rule`] a [`crate::rule_graph::RuleGraph`]
    /// hands back).
    pub fn module_path_of(&self, rule: &Rule) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.rules().iter().any(|r| std::ptr::eq(r, rule)))
            .map(|m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;

    fn rule(name: &str) -> Rule {
        Rule::new(name, None, None, RuleKind::FileSet).unwrap()
    }

    #[test]
    fn empty_project() {
        let project = Project::new();
        assert!(project.get_rule(":a").unwrap().is_none());
        assert_eq!(project.rules_list().len(), 0);
        assert_eq!(project.rules_iter().count(), 0);
    }

    #[test]
    fn project_name() {
        let project = Project::new();
        assert!(!project.name.is_empty());

        let project = Project::with_name("a");
        assert_eq!(project.name, "a");
    }

    #[test]
    fn add_rule() {
        let mut project = Project::new();
        let rule_a = rule("a");
        let rule_b = rule("b");

        assert!(project.get_rule(":a").unwrap().is_none());
        project.add_rule(rule_a.clone());
        assert_eq!(project.get_rule(":a").unwrap().unwrap().name, rule_a.name);
        assert_eq!(project.rules_list().len(), 1);
        assert_eq!(project.rules_iter().count(), 1);

        assert!(project.get_rule(":b").unwrap().is_none());
        project.add_rule(rule_b);
        assert_eq!(project.get_rule(":b").unwrap().is_some(), true);
        assert_eq!(project.rules_list().len(), 2);
        assert_eq!(project.rules_iter().count(), 2);
    }

    #[test]
    fn add_rules() {
        let mut project = Project::new();
        assert!(project.get_rule(":a").unwrap().is_none());
        assert!(project.get_rule(":b").unwrap().is_none());
        assert_eq!(project.rules_list().len(), 0);

        project.add_rules(vec![rule("a"), rule("b")]);
        assert_eq!(project.rules_list().len(), 2);
        assert_eq!(project.rules_iter().count(), 2);
        assert!(project.get_rule(":a").unwrap().is_some());
        assert!(project.get_rule(":b").unwrap().is_some());
    }

    #[test]
    fn get_rule_requires_colon() {
        let mut project = Project::new();
        project.add_rule(rule("a"));

        assert!(project.get_rule(":a").unwrap().is_some());
        assert!(project.get_rule("a").is_err());
        assert!(project.get_rule(":x").unwrap().is_none());
    }
}
