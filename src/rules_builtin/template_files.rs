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

use crate::error::Error;
use crate::rule::{Rule, RuleKind};
use crate::rule_context::{RuleBehavior, RuleContext};
use crate::task::Template;

/// For each src, mirrors a templated output whose extension is replaced by
/// `new_extension` (when given); the body is produced by substituting
/// `${key}` placeholders in the source with `params[key]`.
pub struct TemplateFiles {
    new_extension: Option<String>,
    params: BTreeMap<String, String>,
}

impl RuleBehavior for TemplateFiles {
    fn begin(&self, ctx: &mut RuleContext<'_>) -> Result<(), Error> {
        let srcs = ctx.src_paths()?;
        let mut outputs = Vec::with_capacity(srcs.len());

        for src in &srcs {
            let mut out = ctx.get_out_path_for_src(src)?;

            if let Some(ext) = &self.new_extension {
                out.set_extension(ext.trim_start_matches('.'));
            }

            if let Some(parent) = out.parent() {
                ctx.ensure_output_exists(parent)?;
            }

            let handle = ctx.run_task_async(Template {
                rule: ctx.rule().name.clone(),
                src: src.clone(),
                out: out.clone(),
                params: self.params.clone(),
            });
            ctx.chain(handle);

            outputs.push(out);
        }

        ctx.append_output_paths(outputs);
        Ok(())
    }
}

pub fn create(rule: &Rule) -> Result<Box<dyn RuleBehavior>, Error> {
    let (new_extension, params) = match &rule.kind {
        RuleKind::TemplateFiles {
            new_extension,
            params,
        } => (new_extension.clone(), params.clone()),
        _ => (None, BTreeMap::new()),
    };

    Ok(Box::new(TemplateFiles {
        new_extension,
        params,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_env::BuildEnvironment;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn substitutes_placeholders_and_swaps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("mod")).unwrap();
        fs::write(root.join("mod/greeting.in"), b"hello, ${name}!").unwrap();

        let env = BuildEnvironment::new(root);
        let srcs = Value::String("greeting.in".into());

        let mut params = BTreeMap::new();
        params.insert("name".to_string(), "world".to_string());

        let kind = RuleKind::TemplateFiles {
            new_extension: Some(".txt".to_string()),
            params: params.clone(),
        };
        let rule = Rule::new("r", Some(&srcs), None, kind).unwrap();
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "mod", &rule, &completed);

        let behavior = TemplateFiles {
            new_extension: Some(".txt".to_string()),
            params,
        };
        ctx.begin(&behavior).unwrap();
        ctx.finish().unwrap();

        let out = root.join("build-out/mod/greeting.txt");
        assert_eq!(ctx.outputs(), &[out.clone()]);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello, world!");
    }
}
