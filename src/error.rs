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

use std::error;
use std::fmt;
use std::io;

use failure::Fail;

/// A rule, module, or reference name fails the identifier grammar: empty,
/// made only of whitespace, or containing embedded whitespace.
#[derive(Fail, Debug, Clone, Eq, PartialEq, Hash)]
pub struct NameError {
    pub name: String,
}

impl NameError {
    pub fn new<S: Into<String>>(name: S) -> NameError {
        NameError { name: name.into() }
    }
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid name {:?}", self.name)
    }
}

/// A value passed where a rule construction expected a string or a list of
/// strings was of the wrong shape (a mapping, a number, `null` inside a
/// list, or an empty string inside a list).
#[derive(Fail, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TypeError {
    pub message: String,
}

impl TypeError {
    pub fn new<S: Into<String>>(message: S) -> TypeError {
        TypeError {
            message: message.into(),
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A rule path did not resolve to any rule known to the project.
#[derive(Fail, Debug, Clone, Eq, PartialEq, Hash)]
pub struct LookupError {
    pub path: String,
}

impl LookupError {
    pub fn new<S: Into<String>>(path: S) -> LookupError {
        LookupError { path: path.into() }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no such rule {:?}", self.path)
    }
}

const CYCLE_EXPLANATION: &str = "\
Cycles in the rule graph cause builds to be unorderable and are strictly \
forbidden. Please edit the build description to remove the cycle(s) listed \
above.";

/// One or more cycles were found while sequencing the rule graph.
#[derive(Fail, Debug, Clone, Eq, PartialEq, Hash)]
pub struct CycleError {
    /// Full paths of the rules on the cycle, in the order they were visited.
    pub cycle: Vec<String>,
}

impl CycleError {
    pub fn new(cycle: Vec<String>) -> CycleError {
        CycleError { cycle }
    }
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cycle detected in the rule graph:\n")?;

        for path in &self.cycle {
            writeln!(f, "    {}", path)?;
        }

        write!(f, "\n{}", CYCLE_EXPLANATION)
    }
}

/// A task failed during execution.
#[derive(Fail, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TaskError {
    pub rule: String,
    pub message: String,
}

impl TaskError {
    pub fn new<S: Into<String>, M: Into<String>>(
        rule: S,
        message: M,
    ) -> TaskError {
        TaskError {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task for rule {:?} failed: {}", self.rule, self.message)
    }
}

/// The main error enum. All other errors should trickle down into this one.
///
/// Every validation error ([`NameError`], [`TypeError`], [`LookupError`],
/// [`CycleError`]) is raised eagerly, at construction or query time. Only
/// [`TaskError`] and I/O errors can occur during a build's execution phase.
#[derive(Debug)]
pub enum Error {
    /// A name failed the identifier grammar.
    Name(NameError),

    /// A constructor argument had the wrong shape.
    Type(TypeError),

    /// A rule path did not resolve.
    Lookup(LookupError),

    /// A cycle was found while sequencing the rule graph.
    Cycle(CycleError),

    /// A task failed while executing.
    Task(TaskError),

    /// An I/O error occurred outside of task execution (e.g., reading or
    /// writing the cache store).
    Io(io::Error),
}

impl From<NameError> for Error {
    fn from(err: NameError) -> Error {
        Error::Name(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Error {
        Error::Type(err)
    }
}

impl From<LookupError> for Error {
    fn from(err: LookupError) -> Error {
        Error::Lookup(err)
    }
}

impl From<CycleError> for Error {
    fn from(err: CycleError) -> Error {
        Error::Cycle(err)
    }
}

impl From<TaskError> for Error {
    fn from(err: TaskError) -> Error {
        Error::Task(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Error {
        Error::Io(io::Error::new(io::ErrorKind::InvalidData, err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Name(ref err) => write!(f, "{}", err),
            Error::Type(ref err) => write!(f, "{}", err),
            Error::Lookup(ref err) => write!(f, "{}", err),
            Error::Cycle(ref err) => write!(f, "{}", err),
            Error::Task(ref err) => write!(f, "{}", err),
            Error::Io(ref err) => write!(f, "{}", err),
        }
    }
}

impl error::Error for Error {
    fn cause(&self) -> Option<&dyn error::Error> {
        match *self {
            Error::Name(ref err) => Some(err),
            Error::Type(ref err) => Some(err),
            Error::Lookup(ref err) => Some(err),
            Error::Cycle(ref err) => Some(err),
            Error::Task(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
        }
    }
}
