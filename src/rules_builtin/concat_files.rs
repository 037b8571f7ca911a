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
use crate::rule::{Rule, RuleKind};
use crate::rule_context::{RuleBehavior, RuleContext};
use crate::task::Concat;

/// Concatenates all `srcs`, in declared order, into a single output file
/// (`rule.out`, or the rule name when absent). Concatenation is strictly
/// byte-wise.
pub struct ConcatFiles {
    out: Option<String>,
}

impl RuleBehavior for ConcatFiles {
    fn begin(&self, ctx: &mut RuleContext<'_>) -> Result<(), Error> {
        let srcs = ctx.src_paths()?;
        let out = ctx.get_out_path(self.out.as_deref());

        if let Some(parent) = out.parent() {
            ctx.ensure_output_exists(parent)?;
        }

        let handle = ctx.run_task_async(Concat {
            rule: ctx.rule().name.clone(),
            srcs,
            out: out.clone(),
        });
        ctx.chain(handle);

        ctx.append_output_paths(vec![out]);
        Ok(())
    }
}

pub fn create(rule: &Rule) -> Result<Box<dyn RuleBehavior>, Error> {
    let out = match &rule.kind {
        RuleKind::ConcatFiles { out } => out.clone(),
        _ => None,
    };
    Ok(Box::new(ConcatFiles { out }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_env::BuildEnvironment;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn concatenates_srcs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("mod")).unwrap();
        fs::write(root.join("mod/a.txt"), b"one-").unwrap();
        fs::write(root.join("mod/b.txt"), b"two").unwrap();

        let env = BuildEnvironment::new(root);
        let srcs = Value::Array(vec![
            Value::String("a.txt".into()),
            Value::String("b.txt".into()),
        ]);
        let rule = Rule::new(
            "joined",
            Some(&srcs),
            None,
            RuleKind::ConcatFiles { out: None },
        )
        .unwrap();
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "mod", &rule, &completed);

        ctx.begin(&ConcatFiles { out: None }).unwrap();
        ctx.finish().unwrap();

        let out = root.join("build-out/mod/joined");
        assert_eq!(ctx.outputs(), &[out.clone()]);
        assert_eq!(fs::read(&out).unwrap(), b"one-two");
    }
}
