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
use crate::rule::Rule;
use crate::rule_context::{RuleBehavior, RuleContext};
use crate::task::Copy;

/// For each src, dispatches a [`Copy`] task to a mirrored output path under
/// the out-root, preserving file metadata.
pub struct CopyFiles;

impl RuleBehavior for CopyFiles {
    fn begin(&self, ctx: &mut RuleContext<'_>) -> Result<(), Error> {
        let srcs = ctx.src_paths()?;
        let mut outputs = Vec::with_capacity(srcs.len());

        for src in &srcs {
            let out = ctx.get_out_path_for_src(src)?;

            if let Some(parent) = out.parent() {
                ctx.ensure_output_exists(parent)?;
            }

            let handle = ctx.run_task_async(Copy {
                rule: ctx.rule().name.clone(),
                from: src.clone(),
                to: out.clone(),
            });
            ctx.chain(handle);

            outputs.push(out);
        }

        ctx.append_output_paths(outputs);
        Ok(())
    }
}

pub fn create(_rule: &Rule) -> Result<Box<dyn RuleBehavior>, Error> {
    Ok(Box::new(CopyFiles))
}
