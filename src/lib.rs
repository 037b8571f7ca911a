// Copyright (c) 2017 Jason White
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

pub mod build_context;
pub mod build_env;
pub mod cache;
pub mod error;
pub mod ident;
pub mod module;
pub mod project;
pub mod rule;
pub mod rule_context;
pub mod rule_graph;
pub mod rule_types;
mod rules_builtin;
pub mod task;
pub mod util;

pub use crate::build_context::BuildContext;
pub use crate::build_env::BuildEnvironment;
pub use crate::cache::Cache;
pub use crate::error::Error;
pub use crate::module::Module;
pub use crate::project::Project;
pub use crate::rule::{Rule, RuleKind};
pub use crate::rule_context::{RuleBehavior, RuleContext};
pub use crate::rule_graph::RuleGraph;
pub use crate::rule_types::{register_builtins, RuleTypeRegistry};
