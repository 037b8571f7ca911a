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

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, TaskError};

use super::traits::Task;

/// Substitutes every `${key}` placeholder in `body` with `params[key]`.
///
/// Returns an error naming the first placeholder that has no entry in
/// `params`.
pub fn substitute(
    body: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        rest = &rest[start + 2..];

        let end = rest
            .find('}')
            .ok_or_else(|| "unterminated ${...} placeholder".to_string())?;

        let key = &rest[..end];
        rest = &rest[end + 1..];

        match params.get(key) {
            Some(value) => out.push_str(value),
            None => {
                return Err(format!(
                    "no substitution value for placeholder \"${{{}}}\"",
                    key
                ))
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// Produces a single output file by substituting `${key}` placeholders in a
/// source file's contents with `params[key]`.
pub struct Template {
    pub rule: String,
    pub src: PathBuf,
    pub out: PathBuf,
    pub params: BTreeMap<String, String>,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template {:?} -> {:?}", self.src, self.out)
    }
}

impl Template {
    fn execute_impl(&self) -> Result<(), String> {
        let body = fs::read_to_string(&self.src)
            .map_err(|err| format!("failed reading {:?}: {}", self.src, err))?;

        let rendered = substitute(&body, &self.params)?;

        if let Some(parent) = self.out.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("{}", err))?;
        }

        fs::write(&self.out, rendered)
            .map_err(|err| format!("failed writing {:?}: {}", self.out, err))
    }
}

impl Task for Template {
    fn execute(&self) -> Result<bool, Error> {
        self.execute_impl()
            .map_err(|message| TaskError::new(self.rule.clone(), message))?;

        Ok(true)
    }
}
