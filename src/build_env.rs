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

//! Process-wide configuration shared by every [`crate::build_context::BuildContext`]
//! run against the same project: where the project lives on disk, where
//! outputs go, and the worker pool tasks are dispatched to.

use std::path::{Path, PathBuf};

use crate::task::WorkerPool;

/// Name of the default output root, relative to the project root.
pub const DEFAULT_OUT_ROOT: &str = "build-out";

/// Process-wide build configuration: root paths and the worker pool used to
/// run [`crate::task::Task`]s.
pub struct BuildEnvironment {
    /// Root of the project. File-path `srcs` are resolved relative to this
    /// (and the owning module's path).
    root: PathBuf,

    /// Root of the output tree. Defaults to `<root>/build-out`.
    out_root: PathBuf,

    /// Worker pool that rule tasks are dispatched to.
    pool: WorkerPool,
}

impl BuildEnvironment {
    /// Creates a build environment rooted at `root`, with the default
    /// output root and a worker pool sized to the number of logical CPUs.
    pub fn new<P: Into<PathBuf>>(root: P) -> BuildEnvironment {
        let root = root.into();
        let out_root = root.join(DEFAULT_OUT_ROOT);
        let threads = WorkerPool::default_threads();

        BuildEnvironment {
            root,
            out_root,
            pool: WorkerPool::new(threads),
        }
    }

    /// Creates a build environment with explicit root paths and pool size.
    pub fn with_out_root<P: Into<PathBuf>, Q: Into<PathBuf>>(
        root: P,
        out_root: Q,
        threads: usize,
    ) -> BuildEnvironment {
        BuildEnvironment {
            root: root.into(),
            out_root: out_root.into(),
            pool: WorkerPool::new(threads),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn out_root(&self) -> &Path {
        &self.out_root
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}
