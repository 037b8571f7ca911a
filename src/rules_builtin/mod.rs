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

//! The four illustrative built-in rule types. These are full
//! implementations, not contract stubs, but they are ordinary consumers of
//! the [`crate::rule_context::RuleContext`] contract — a host binary could
//! add its own rule types the same way by registering them with a
//! [`crate::rule_types::RuleTypeRegistry`].

mod concat_files;
mod copy_files;
mod file_set;
mod template_files;

use crate::rule_types::RuleTypeRegistry;

pub fn register(registry: &mut RuleTypeRegistry) {
    registry.register("file_set", file_set::create);
    registry.register("copy_files", copy_files::create);
    registry.register("concat_files", concat_files::create);
    registry.register("template_files", template_files::create);
}
