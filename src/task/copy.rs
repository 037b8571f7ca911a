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

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, TaskError};

use super::traits::Task;

/// Copies a single file, preserving its metadata, to a mirrored path under
/// the output tree. The destination's parent directory is created first.
pub struct Copy {
    pub rule: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

impl fmt::Display for Copy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "copy {:?} -> {:?}", self.from, self.to)
    }
}

impl Task for Copy {
    fn execute(&self) -> Result<bool, Error> {
        if let Some(parent) = self.to.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(&self.from, &self.to).map_err(|err| {
            TaskError::new(
                self.rule.clone(),
                format!(
                    "failed copying {:?} to {:?}: {}",
                    self.from, self.to, err
                ),
            )
        })?;

        Ok(true)
    }
}
