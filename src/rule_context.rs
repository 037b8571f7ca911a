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

//! Per-`(BuildContext, Rule)` evaluation state: the bridge between a
//! declarative [`crate::rule::Rule`] and the concrete filesystem work it
//! does.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::build_env::BuildEnvironment;
use crate::error::{Error, LookupError, TaskError};
use crate::ident;
use crate::rule::Rule;
use crate::task::{Task, TaskHandle};
use crate::util::PathExt;

/// The state a [`RuleContext`] moves through over its lifetime.
///
/// `Pending` -> `Running` -> (`Succeeded` | `Failed`). `Failed` is terminal;
/// a [`crate::build_context::BuildContext`] never starts a context whose
/// deps did not all reach `Succeeded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// The rule-type-specific behavior dispatched by a [`crate::rule_types::RuleTypeRegistry`].
///
/// Implementations declare their work by registering outputs and dispatching
/// tasks against the [`RuleContext`] handed to `begin`. Output registration
/// happens synchronously, before `begin` returns, so downstream contexts can
/// see this rule's output paths immediately; the tasks a behavior chains may
/// still be running when `begin` returns — the orchestrator awaits them via
/// [`RuleContext::finish`].
pub trait RuleBehavior: Send + Sync {
    fn begin(&self, ctx: &mut RuleContext<'_>) -> Result<(), Error>;
}

/// Per-rule evaluation state within one build.
pub struct RuleContext<'a> {
    env: &'a BuildEnvironment,
    module_path: String,
    rule: &'a Rule,

    /// Output paths of every rule that has already reached `Succeeded` in
    /// this build, keyed by [`Rule::full_name`]. Used to resolve
    /// rule-reference `srcs`.
    completed_outputs: &'a HashMap<String, Vec<PathBuf>>,

    outputs: Vec<PathBuf>,
    handles: Vec<TaskHandle>,
    status: Status,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        env: &'a BuildEnvironment,
        module_path: &str,
        rule: &'a Rule,
        completed_outputs: &'a HashMap<String, Vec<PathBuf>>,
    ) -> RuleContext<'a> {
        RuleContext {
            env,
            module_path: module_path.to_string(),
            rule,
            completed_outputs,
            outputs: Vec::new(),
            handles: Vec::new(),
            status: Status::Pending,
        }
    }

    pub fn rule(&self) -> &'a Rule {
        self.rule
    }

    pub fn env(&self) -> &'a BuildEnvironment {
        self.env
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The already-registered output paths, in registration order.
    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    /// Resolves `srcs` into an ordered, de-duplicated list of absolute
    /// source file paths.
    ///
    /// A literal relative path is resolved against the owning module's
    /// directory under the project root. A rule-reference resolves to the
    /// outputs of that rule's already-completed context; it is a lookup
    /// error if that rule has not yet completed (which cannot happen for a
    /// project sequenced by [`crate::rule_graph::RuleGraph`]).
    pub fn src_paths(&self) -> Result<Vec<PathBuf>, Error> {
        let mut out = Vec::with_capacity(self.rule.srcs.len());
        let mut seen = HashSet::new();

        for src in &self.rule.srcs {
            if ident::is_rule_reference(src) {
                let full = self.resolve_reference_full_name(src)?;
                let outputs = self
                    .completed_outputs
                    .get(&full)
                    .ok_or_else(|| LookupError::new(src.clone()))?;

                for path in outputs {
                    if seen.insert(path.clone()) {
                        out.push(path.clone());
                    }
                }
            } else {
                let path =
                    self.env.root().join(&self.module_path).join(src);

                if seen.insert(path.clone()) {
                    out.push(path);
                }
            }
        }

        Ok(out)
    }

    fn resolve_reference_full_name(&self, src: &str) -> Result<String, Error> {
        let path = ident::parse_rule_path(src)?;
        Ok(format!(":{}", path.name()))
    }

    /// Registers output paths produced by this rule.
    pub fn append_output_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.outputs.extend(paths);
    }

    /// The canonical output path for a single-output rule: `rule.out`, or
    /// the rule's own name when not given.
    pub fn get_out_path(&self, name: Option<&str>) -> PathBuf {
        let name = name.unwrap_or(&self.rule.name);
        self.env.out_root().join(&self.module_path).join(name)
    }

    /// Mirrors a resolved source path into the output tree, preserving its
    /// path relative to the owning module.
    pub fn get_out_path_for_src(
        &self,
        src_path: &Path,
    ) -> Result<PathBuf, Error> {
        let module_root = self.env.root().join(&self.module_path);

        let rel = src_path.relative_from(&module_root).ok_or_else(|| {
            TaskError::new(
                self.rule.name.clone(),
                format!(
                    "source path {:?} is not under its owning module {:?}",
                    src_path, module_root
                ),
            )
        })?;

        Ok(self.env.out_root().join(&self.module_path).join(rel))
    }

    /// Idempotently creates `dir` and any missing parent directories.
    pub fn ensure_output_exists(&self, dir: &Path) -> Result<(), Error> {
        fs::create_dir_all(dir)?;
        Ok(())
    }

    /// Submits `task` to the build environment's worker pool. The caller
    /// must [`RuleContext::chain`] the returned handle for the
    /// orchestrator to await it before finalizing this context.
    pub fn run_task_async<T>(&self, task: T) -> TaskHandle
    where
        T: Task + 'static,
    {
        self.env.pool().submit(task)
    }

    /// Attaches `handle`'s outcome to this context's terminal state.
    pub fn chain(&mut self, handle: TaskHandle) {
        self.handles.push(handle);
    }

    /// Marks this context successful immediately, with no tasks to await.
    pub fn succeed(&mut self) {
        self.status = Status::Succeeded;
    }

    /// Runs `behavior.begin`, entering the `Running` state first.
    ///
    /// A synchronous error from `behavior` (for example, a malformed
    /// substitution parameter) fails the context immediately without
    /// waiting on any tasks it may have already chained.
    pub fn begin(
        &mut self,
        behavior: &dyn RuleBehavior,
    ) -> Result<(), Error> {
        self.status = Status::Running;

        match behavior.begin(self) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.status = Status::Failed;
                Err(err)
            }
        }
    }

    /// Awaits every chained task handle and finalizes the context's
    /// terminal state. A no-op if [`RuleContext::succeed`] already put the
    /// context in `Succeeded` with no tasks chained.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.status == Status::Succeeded {
            return Ok(());
        }

        for handle in self.handles.drain(..) {
            match handle.join() {
                Ok(true) => {}
                Ok(false) => {
                    self.status = Status::Failed;
                    return Err(TaskError::new(
                        self.rule.name.clone(),
                        "task reported failure",
                    )
                    .into());
                }
                Err(err) => {
                    self.status = Status::Failed;
                    return Err(err);
                }
            }
        }

        self.status = Status::Succeeded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;
    use crate::task::Task;
    use std::fmt;

    struct AlwaysOk;

    impl fmt::Display for AlwaysOk {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "always-ok")
        }
    }

    impl Task for AlwaysOk {
        fn execute(&self) -> Result<bool, Error> {
            Ok(true)
        }
    }

    struct AlwaysFail;

    impl fmt::Display for AlwaysFail {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "always-fail")
        }
    }

    impl Task for AlwaysFail {
        fn execute(&self) -> Result<bool, Error> {
            Ok(false)
        }
    }

    fn rule(name: &str) -> Rule {
        Rule::new(name, None, None, RuleKind::FileSet).unwrap()
    }

    #[test]
    fn succeed_without_tasks() {
        let env = BuildEnvironment::new("/project");
        let rule = rule("r");
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "", &rule, &completed);

        ctx.succeed();
        assert_eq!(ctx.status(), Status::Succeeded);
        assert!(ctx.finish().is_ok());
        assert_eq!(ctx.status(), Status::Succeeded);
    }

    #[test]
    fn finish_awaits_chained_tasks() {
        let env = BuildEnvironment::new("/project");
        let rule = rule("r");
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "", &rule, &completed);

        let handle = ctx.run_task_async(AlwaysOk);
        ctx.chain(handle);

        assert_eq!(ctx.status(), Status::Pending);
        assert!(ctx.finish().is_ok());
        assert_eq!(ctx.status(), Status::Succeeded);
    }

    #[test]
    fn finish_fails_on_task_failure() {
        let env = BuildEnvironment::new("/project");
        let rule = rule("r");
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "", &rule, &completed);

        let handle = ctx.run_task_async(AlwaysFail);
        ctx.chain(handle);

        assert!(ctx.finish().is_err());
        assert_eq!(ctx.status(), Status::Failed);
    }

    #[test]
    fn src_paths_resolve_literal_paths_under_module() {
        let env = BuildEnvironment::new("/project");
        let srcs = serde_json::Value::String("foo.txt".into());
        let rule = Rule::new("r", Some(&srcs), None, RuleKind::FileSet)
            .unwrap();
        let completed = HashMap::new();
        let ctx = RuleContext::new(&env, "mod/sub", &rule, &completed);

        let paths = ctx.src_paths().unwrap();
        assert_eq!(paths, vec![PathBuf::from("/project/mod/sub/foo.txt")]);
    }

    #[test]
    fn src_paths_resolve_rule_references_from_completed_outputs() {
        let env = BuildEnvironment::new("/project");
        let srcs = serde_json::Value::String(":dep".into());
        let rule = Rule::new("r", Some(&srcs), None, RuleKind::FileSet)
            .unwrap();

        let mut completed = HashMap::new();
        completed.insert(
            ":dep".to_string(),
            vec![PathBuf::from("/project/build-out/mod/dep.out")],
        );

        let ctx = RuleContext::new(&env, "mod", &rule, &completed);
        let paths = ctx.src_paths().unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("/project/build-out/mod/dep.out")]
        );
    }

    #[test]
    fn src_paths_unresolved_reference_is_a_lookup_error() {
        let env = BuildEnvironment::new("/project");
        let srcs = serde_json::Value::String(":dep".into());
        let rule = Rule::new("r", Some(&srcs), None, RuleKind::FileSet)
            .unwrap();
        let completed = HashMap::new();
        let ctx = RuleContext::new(&env, "mod", &rule, &completed);

        match ctx.src_paths() {
            Err(Error::Lookup(_)) => {}
            other => panic!("expected a lookup error, got {:?}", other),
        }
    }

    #[test]
    fn get_out_path_falls_back_to_rule_name() {
        let env = BuildEnvironment::new("/project");
        let rule = rule("r");
        let completed = HashMap::new();
        let ctx = RuleContext::new(&env, "mod", &rule, &completed);

        assert_eq!(
            ctx.get_out_path(None),
            PathBuf::from("/project/build-out/mod/r")
        );
        assert_eq!(
            ctx.get_out_path(Some("custom")),
            PathBuf::from("/project/build-out/mod/custom")
        );
    }

    #[test]
    fn get_out_path_for_src_mirrors_module_relative_path() {
        let env = BuildEnvironment::new("/project");
        let rule = rule("r");
        let completed = HashMap::new();
        let ctx = RuleContext::new(&env, "mod/sub", &rule, &completed);

        let src = PathBuf::from("/project/mod/sub/a/b.txt");
        assert_eq!(
            ctx.get_out_path_for_src(&src).unwrap(),
            PathBuf::from("/project/build-out/mod/sub/a/b.txt")
        );
    }
}
