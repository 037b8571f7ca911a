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
use std::fs::File;
use std::io;
use std::path::PathBuf;

use crate::error::{Error, TaskError};

use super::traits::Task;

/// Concatenates a list of source files, in order, into a single output file.
///
/// Concatenation is strictly byte-wise: files are opened without any
/// text-mode translation so the result is portable across platforms.
pub struct Concat {
    pub rule: String,
    pub srcs: Vec<PathBuf>,
    pub out: PathBuf,
}

impl fmt::Display for Concat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "concat {} files -> {:?}", self.srcs.len(), self.out)
    }
}

impl Concat {
    fn execute_impl(&self) -> Result<(), io::Error> {
        if let Some(parent) = self.out.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&self.out)?;

        for src in &self.srcs {
            let mut input = File::open(src)?;
            io::copy(&mut input, &mut out)?;
        }

        Ok(())
    }
}

impl Task for Concat {
    fn execute(&self) -> Result<bool, Error> {
        self.execute_impl().map_err(|err| {
            TaskError::new(
                self.rule.clone(),
                format!("failed concatenating into {:?}: {}", self.out, err),
            )
        })?;

        Ok(true)
    }
}
