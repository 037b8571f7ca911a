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

/// Passes `src_paths` through verbatim as outputs. No task is dispatched;
/// the context completes synchronously.
pub struct FileSet;

impl RuleBehavior for FileSet {
    fn begin(&self, ctx: &mut RuleContext<'_>) -> Result<(), Error> {
        let srcs = ctx.src_paths()?;
        ctx.append_output_paths(srcs);
        ctx.succeed();
        Ok(())
    }
}

pub fn create(_rule: &Rule) -> Result<Box<dyn RuleBehavior>, Error> {
    Ok(Box::new(FileSet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_env::BuildEnvironment;
    use crate::rule::RuleKind;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn passes_srcs_through_as_outputs() {
        let env = BuildEnvironment::new("/project");
        let srcs = serde_json::Value::String("a.txt".into());
        let rule = Rule::new("r", Some(&srcs), None, RuleKind::FileSet)
            .unwrap();
        let completed = HashMap::new();
        let mut ctx = RuleContext::new(&env, "mod", &rule, &completed);

        ctx.begin(&FileSet).unwrap();
        ctx.finish().unwrap();

        assert_eq!(
            ctx.outputs(),
            &[PathBuf::from("/project/mod/a.txt")]
        );
    }
}
