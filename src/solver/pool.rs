//! Worker pool and job queues.
//!
//! Brackets travel through the queues by value: a bracket is either in a
//! queue or held by exactly one party, so refinement needs no locks.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use super::bracket::{Bracket, RootFinder};
use super::ErrorFn;

/// Number of worker threads refining brackets.
const WORKERS: usize = 4;

pub enum Job {
    /// Advance a zero bracket by one step.
    Zero {
        index: usize,
        bracket: Bracket,
        eval: Arc<ErrorFn>,
        finder: RootFinder,
    },
    /// Advance an extremum bracket by one step.
    Extremum {
        index: usize,
        bracket: Bracket,
        eval: Arc<ErrorFn>,
    },
    Shutdown,
}

enum Answer {
    Step { index: usize, bracket: Bracket },
    Exit,
}

pub struct Pool {
    questions: Sender<Job>,
    answers: Receiver<Answer>,
    workers: Vec<JoinHandle<()>>,
}

impl Pool {
    pub fn new() -> Pool {
        let (questions, jobs) = unbounded::<Job>();
        let (results, answers) = unbounded::<Answer>();

        let workers = (0..WORKERS)
            .map(|_| {
                let jobs = jobs.clone();
                let results = results.clone();
                thread::spawn(move || worker(jobs, results))
            })
            .collect();

        Pool {
            questions,
            answers,
            workers,
        }
    }

    /// Hands a bracket to the pool.
    pub fn post(&self, job: Job) {
        self.questions.send(job).expect("worker pool is running");
    }

    /// Blocks until some worker finishes a step and returns its bracket.
    pub fn take(&self) -> (usize, Bracket) {
        match self.answers.recv().expect("worker pool is running") {
            Answer::Step { index, bracket } => (index, bracket),
            Answer::Exit => unreachable!("workers only exit during teardown"),
        }
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        // Drain then join: every worker acknowledges the shutdown signal
        // before its handle is collected.
        for _ in &self.workers {
            let _ = self.questions.send(Job::Shutdown);
        }

        let mut acknowledged = 0;
        while acknowledged < self.workers.len() {
            match self.answers.recv() {
                Ok(Answer::Exit) => acknowledged += 1,
                Ok(Answer::Step { .. }) => {}
                Err(_) => break,
            }
        }

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn worker(jobs: Receiver<Job>, results: Sender<Answer>) {
    for job in jobs {
        let answer = match job {
            Job::Zero {
                index,
                mut bracket,
                eval,
                finder,
            } => {
                bracket.refine_zero(finder, |x| eval.absolute(x));
                Answer::Step { index, bracket }
            }
            Job::Extremum {
                index,
                mut bracket,
                eval,
            } => {
                bracket.refine_extremum(|x| eval.relative(x));
                Answer::Step { index, bracket }
            }
            Job::Shutdown => {
                let _ = results.send(Answer::Exit);
                break;
            }
        };

        if results.send(answer).is_err() {
            break;
        }
    }
}
