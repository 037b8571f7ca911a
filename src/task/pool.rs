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

use std::thread;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{Error, TaskError};

use super::traits::Task;

type Job = Box<dyn FnOnce() + Send>;

/// A handle to a task submitted to a [`WorkerPool`].
///
/// Dropping a handle without joining it does not cancel the task; it just
/// discards its result.
pub struct TaskHandle {
    receiver: Receiver<Result<bool, Error>>,
}

impl TaskHandle {
    /// Blocks until the task completes and returns its result.
    pub fn join(self) -> Result<bool, Error> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(TaskError::new(
                "<unknown>",
                "worker thread terminated without producing a result",
            )
            .into())
        })
    }
}

/// A fixed-size pool of OS threads that execute [`Task`]s submitted to it.
///
/// Submission is non-blocking (the job is handed to a `crossbeam` channel);
/// the returned [`TaskHandle`] is a oneshot completion signal the caller
/// can join whenever it actually needs the result. This is what lets
/// independent rules at the same dependency level run their tasks
/// concurrently without the orchestrator itself being multi-threaded.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Creates a pool with the given number of worker threads.
    pub fn new(threads: usize) -> WorkerPool {
        let threads = threads.max(1);
        let (sender, receiver) = channel::unbounded::<Job>();

        let workers = (0..threads)
            .map(|_| {
                let receiver: Receiver<Job> = receiver.clone();
                thread::spawn(move || {
                    for job in receiver {
                        job();
                    }
                })
            })
            .collect();

        WorkerPool {
            sender: Some(sender),
            workers,
        }
    }

    /// The default pool size: one worker per logical CPU.
    pub fn default_threads() -> usize {
        num_cpus::get()
    }

    /// Submits a task to the pool and returns a handle to its result.
    pub fn submit<T>(&self, task: T) -> TaskHandle
    where
        T: Task + 'static,
    {
        let (tx, rx) = channel::bounded(1);

        let job: Job = Box::new(move || {
            let result = task.execute();
            let _ = tx.send(result);
        });

        self.sender
            .send(job)
            .expect("worker pool's channel is never closed while the pool is alive");

        TaskHandle { receiver: rx }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
