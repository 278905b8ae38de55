use crate::{resolve, ProbabilityEngine};
use oddsboard_core::{ProbabilityRequest, ProbabilityResult, RequestTicket, Selection};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completion {
    pub ticket: RequestTicket,
    pub result: ProbabilityResult,
}

struct Job {
    ticket: RequestTicket,
    request: ProbabilityRequest,
}

/// Runs engine calls on a worker thread so the caller's event loop keeps
/// going. Requests are never cancelled; each one yields a completion.
pub struct Dispatcher {
    jobs: Sender<Job>,
    completions: Receiver<Completion>,
}

impl Dispatcher {
    pub fn spawn<E>(engine: E) -> Self
    where
        E: ProbabilityEngine + Send + 'static,
    {
        let (jobs, job_rx) = mpsc::channel::<Job>();
        let (done_tx, completions) = mpsc::channel();
        thread::Builder::new()
            .name("oddsboard-engine".to_string())
            .spawn(move || {
                for job in job_rx {
                    let result = resolve(&engine, &job.request);
                    let completion = Completion {
                        ticket: job.ticket,
                        result,
                    };
                    if done_tx.send(completion).is_err() {
                        break;
                    }
                }
            })
            .map(|_| ())
            .unwrap_or_else(|err| warn!(error = %err, "failed to start engine worker"));
        Self { jobs, completions }
    }

    /// Queues a request. Returns false if the worker is gone.
    pub fn submit(&self, ticket: RequestTicket, request: ProbabilityRequest) -> bool {
        debug!(ticket = ticket.0, "submitting probability request");
        self.jobs.send(Job { ticket, request }).is_ok()
    }

    /// Issues a request from `selection` and queues it. A request the worker
    /// can no longer take resolves to `Error` right away.
    pub fn submit_from(&self, selection: &mut Selection, num_opponents: u32) -> RequestTicket {
        let (ticket, request) = selection.issue_request(num_opponents);
        if !self.submit(ticket, request) {
            warn!(ticket = ticket.0, "engine worker unavailable");
            selection.apply_result(ticket, ProbabilityResult::Error);
        }
        ticket
    }

    pub fn try_completion(&self) -> Option<Completion> {
        match self.completions.try_recv() {
            Ok(completion) => Some(completion),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn wait_completion(&self, timeout: Duration) -> Option<Completion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Applies every finished request to `selection`; completions for
    /// superseded tickets are dropped. Returns the results that were applied.
    pub fn drain_into(&self, selection: &mut Selection) -> Vec<ProbabilityResult> {
        let mut applied = Vec::new();
        while let Some(completion) = self.try_completion() {
            if selection.apply_result(completion.ticket, completion.result) {
                applied.push(completion.result);
            } else {
                debug!(ticket = completion.ticket.0, "dropping stale probability result");
            }
        }
        applied
    }
}
