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

use std::collections::HashSet;

use crate::error::{CycleError, Error, LookupError};
use crate::project::Project;
use crate::rule::Rule;

/// A read-only view of a [`Project`]'s rules as a dependency graph.
///
/// Edges follow `Rule::deps`. The graph is unipartite (rule depends on
/// rule directly; there is no separate resource/task bipartite layer).
pub struct RuleGraph<'p> {
    project: &'p Project,
}

impl<'p> RuleGraph<'p> {
    pub fn new(project: &'p Project) -> RuleGraph<'p> {
        RuleGraph { project }
    }

    pub fn project(&self) -> &'p Project {
        self.project
    }

    fn lookup(&self, path: &str) -> Result<&'p Rule, Error> {
        Project::get_rule(self.project, path)?
            .ok_or_else(|| LookupError::new(path.to_string()).into())
    }

    /// Whether `from` depends, directly or transitively, on `to`.
    ///
    /// A rule is always considered to depend on itself. Returns a lookup
    /// error if either path does not resolve to a rule in the project.
    pub fn has_dependency(
        &self,
        from: &str,
        to: &str,
    ) -> Result<bool, Error> {
        let from_rule = self.lookup(from)?;
        let to_rule = self.lookup(to)?;
        let target = to_rule.full_name();

        if from_rule.full_name() == target {
            return Ok(true);
        }

        let mut seen = HashSet::new();
        let mut stack: Vec<String> = from_rule.deps.clone();

        while let Some(path) = stack.pop() {
            if !seen.insert(path.clone()) {
                continue;
            }

            let rule = self.lookup(&path)?;

            if rule.full_name() == target {
                return Ok(true);
            }

            stack.extend(rule.deps.iter().cloned());
        }

        Ok(false)
    }

    /// Computes a dependency-ordered sequence of rules needed to build
    /// `targets`: every transitive dependency appears before the rule(s)
    /// that need it, and each rule appears exactly once.
    ///
    /// Returns a lookup error if any target (or any rule reachable from
    /// it) does not resolve, and a cycle error naming the offending path
    /// if the dependency graph is not acyclic.
    pub fn calculate_rule_sequence(
        &self,
        targets: &[&str],
    ) -> Result<Vec<&'p Rule>, Error> {
        let mut sequence = Vec::new();
        let mut visited = HashSet::new();
        let mut in_progress = Vec::new();

        for target in targets {
            self.visit(target, &mut sequence, &mut visited, &mut in_progress)?;
        }

        Ok(sequence)
    }

    fn visit(
        &self,
        path: &str,
        sequence: &mut Vec<&'p Rule>,
        visited: &mut HashSet<String>,
        in_progress: &mut Vec<String>,
    ) -> Result<(), Error> {
        let rule = self.lookup(path)?;
        let full = rule.full_name();

        if visited.contains(&full) {
            return Ok(());
        }

        if in_progress.contains(&full) {
            let mut cycle = in_progress.clone();
            cycle.push(full);
            return Err(CycleError::new(cycle).into());
        }

        in_progress.push(full.clone());

        for dep in rule.deps.clone() {
            self.visit(&dep, sequence, visited, in_progress)?;
        }

        in_progress.pop();
        visited.insert(full);
        sequence.push(rule);

        Ok(())
    }
}
