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

//! Orchestrates a single build: resolves targets against a
//! [`crate::project::Project`], asks the [`crate::rule_graph::RuleGraph`]
//! for a sequence, and drives a [`crate::rule_context::RuleContext`] per
//! rule, checking and updating the on-disk [`crate::cache::Cache`] along the
//! way.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::build_env::BuildEnvironment;
use crate::cache::Cache;
use crate::error::Error;
use crate::ident;
use crate::project::Project;
use crate::rule::Rule;
use crate::rule_context::RuleContext;
use crate::rule_graph::RuleGraph;
use crate::rule_types::RuleTypeRegistry;

/// The full `:name` a dependency string resolves to, ignoring any
/// module qualification — rule lookup is flat, so only the bare name
/// distinguishes one rule from another.
fn dep_full_name(dep: &str) -> String {
    match ident::parse_rule_path(dep) {
        Ok(path) => format!(":{}", path.name()),
        Err(_) => dep.to_string(),
    }
}

/// Groups a dependency-ordered rule sequence into levels: level 0 holds
/// every rule with no deps, level N holds rules whose deps are all in
/// levels < N. Every rule in a level is independent of every other rule
/// in that level, so their tasks may run concurrently.
fn into_levels<'p>(sequence: Vec<&'p Rule>) -> Vec<Vec<&'p Rule>> {
    let mut level_of: HashMap<String, usize> = HashMap::new();
    let mut max_level = 0;

    for rule in &sequence {
        let level = rule
            .deps
            .iter()
            .map(|dep| *level_of.get(&dep_full_name(dep)).unwrap_or(&0))
            .max()
            .map(|m| m + 1)
            .unwrap_or(0);

        level_of.insert(rule.full_name(), level);
        max_level = max_level.max(level);
    }

    let mut levels: Vec<Vec<&'p Rule>> = (0..=max_level).map(|_| Vec::new()).collect();

    for rule in sequence {
        let level = level_of[&rule.full_name()];
        levels[level].push(rule);
    }

    levels
}

/// One invocation of the engine over a set of target rules.
pub struct BuildContext<'a> {
    env: &'a BuildEnvironment,
    registry: &'a RuleTypeRegistry,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        env: &'a BuildEnvironment,
        registry: &'a RuleTypeRegistry,
    ) -> BuildContext<'a> {
        BuildContext { env, registry }
    }

    /// Runs a build of `targets` against `project`, consulting and updating
    /// `cache` per rule.
    ///
    /// Resolution and sequencing errors (unknown target, dependency cycle)
    /// surface immediately as `Err`, per the "never deferred" rule for
    /// validation errors. Once the rule sequence is running, a rule's task
    /// or I/O failure does not propagate as `Err` — it is reflected in the
    /// returned `success` flag, with the build's partial outputs still
    /// returned alongside it.
    pub fn build(
        &self,
        project: &Project,
        cache: &mut Cache,
        targets: &[&str],
    ) -> Result<(bool, Vec<PathBuf>), Error> {
        let graph = RuleGraph::new(project);
        let sequence = graph.calculate_rule_sequence(targets)?;
        let levels = into_levels(sequence);

        let mut completed_outputs: HashMap<String, Vec<PathBuf>> =
            HashMap::new();
        let mut all_outputs = Vec::new();
        let mut failed = false;

        for level in levels {
            if failed {
                break;
            }

            log::debug!("dispatching level of {} rule(s)", level.len());

            let mut level_failed = false;
            let mut running = Vec::new();

            // Dispatch every rule in the level before awaiting any of
            // them: `begin` only does synchronous bookkeeping and task
            // submission, so the tasks it submits run concurrently on
            // the worker pool while later rules in the same level are
            // still being dispatched.
            for rule in level.iter().copied() {
                let cache_key = rule.compute_cache_key();

                if let Some(cached) = cache.get(&cache_key) {
                    let outputs = cached.to_vec();
                    log::debug!("cache hit for rule {:?}", rule.full_name());
                    completed_outputs.insert(rule.full_name(), outputs.clone());
                    all_outputs.extend(outputs);
                    continue;
                }

                log::info!("building rule {:?}", rule.full_name());
                let module_path = project.module_path_of(rule).unwrap_or("");

                let behavior = match self.registry.create(rule) {
                    Ok(behavior) => behavior,
                    Err(err) => {
                        log::error!("rule {:?} failed: {}", rule.full_name(), err);
                        level_failed = true;
                        continue;
                    }
                };

                let mut ctx = RuleContext::new(
                    self.env,
                    module_path,
                    rule,
                    &completed_outputs,
                );

                match ctx.begin(behavior.as_ref()) {
                    Ok(()) => running.push((rule, cache_key, ctx)),
                    Err(err) => {
                        log::error!("rule {:?} failed: {}", rule.full_name(), err);
                        level_failed = true;
                    }
                }
            }

            let mut finished = Vec::new();

            for (rule, cache_key, mut ctx) in running {
                match ctx.finish() {
                    Ok(()) => {
                        finished.push((
                            rule.full_name(),
                            cache_key,
                            ctx.outputs().to_vec(),
                        ));
                    }
                    Err(err) => {
                        log::error!("rule {:?} failed: {}", rule.full_name(), err);
                        level_failed = true;
                    }
                }
            }

            for (full_name, cache_key, outputs) in finished {
                cache.insert(cache_key, outputs.clone());
                completed_outputs.insert(full_name, outputs.clone());
                all_outputs.extend(outputs);
            }

            if level_failed {
                failed = true;
            }
        }

        Ok((!failed, all_outputs))
    }
}
