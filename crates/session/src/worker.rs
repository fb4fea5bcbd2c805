//! Background service worker.
//!
//! ```text
//! UI thread (controller)          Service thread
//! ┌──────────────────┐           ┌────────────────────┐
//! │ submit()  ───────┼── cmd ───>│ blocking service   │
//! │                  │  channel  │ call               │
//! │ tick()    <──────┼── done ───│                    │
//! │  - try_recv      │  channel  │                    │
//! └──────────────────┘           └────────────────────┘
//! ```
//!
//! The service thread owns the [`EditService`] and runs one request at a
//! time, in submission order. The UI thread never blocks on it.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use wc_common::{ServiceError, SessionId};

use crate::service::{EditOutcome, EditRequest, EditService, UploadOutcome, UploadRequest};

/// A remote operation to run on the service thread.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceRequest {
    Upload(UploadRequest),
    Edit(EditRequest),
    /// `revision` is echoed back so stale previews can be recognised.
    PreviewCuts { request: EditRequest, revision: u64 },
    Cleanup(SessionId),
}

impl ServiceRequest {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Upload(_) => "upload",
            Self::Edit(_) => "edit",
            Self::PreviewCuts { .. } => "preview",
            Self::Cleanup(_) => "cleanup",
        }
    }
}

/// Result of a finished remote operation.
#[derive(Clone, Debug, PartialEq)]
pub enum ServiceCompletion {
    Uploaded(Result<UploadOutcome, ServiceError>),
    Edited(Result<EditOutcome, ServiceError>),
    Previewed {
        revision: u64,
        result: Result<EditOutcome, ServiceError>,
    },
    CleanedUp {
        session: SessionId,
        result: Result<(), ServiceError>,
    },
}

/// Commands sent from the UI thread to the service thread.
enum WorkerCommand {
    Run(ServiceRequest),
    /// Finish the current request, then exit.
    Stop,
}

/// Handle to the service thread.
pub struct ServiceWorker {
    cmd_tx: Option<Sender<WorkerCommand>>,
    done_rx: Receiver<ServiceCompletion>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ServiceWorker {
    /// Spawn the service thread, moving `service` onto it.
    pub fn spawn<S: EditService>(service: S) -> Result<Self> {
        let (cmd_tx, cmd_rx) = channel::unbounded::<WorkerCommand>();
        let (done_tx, done_rx) = channel::unbounded::<ServiceCompletion>();

        let handle = thread::Builder::new()
            .name("service-worker".to_string())
            .spawn(move || {
                service_thread_main(service, cmd_rx, done_tx);
            })
            .context("Failed to spawn service worker thread")?;

        tracing::info!("Service worker started");
        Ok(Self {
            cmd_tx: Some(cmd_tx),
            done_rx,
            thread: Some(handle),
        })
    }

    /// Queue a request. Fails only if the worker has shut down.
    pub fn submit(&self, request: ServiceRequest) -> Result<(), ServiceError> {
        let Some(tx) = &self.cmd_tx else {
            return Err(ServiceError::WorkerUnavailable);
        };
        let label = request.label();
        tx.send(WorkerCommand::Run(request))
            .map_err(|_| ServiceError::WorkerUnavailable)?;
        tracing::debug!(operation = label, "Service request queued");
        Ok(())
    }

    /// Next finished operation, without blocking.
    pub fn try_recv(&self) -> Option<ServiceCompletion> {
        match self.done_rx.try_recv() {
            Ok(done) => Some(done),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("Service worker disconnected");
                None
            }
        }
    }

    /// Next finished operation, waiting up to `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ServiceCompletion> {
        match self.done_rx.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("Service worker disconnected");
                None
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.cmd_tx.is_some()
    }

    /// Stop the service thread after its current request and join it.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(WorkerCommand::Stop);
        }
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                tracing::error!("Service worker thread panicked");
            }
            tracing::info!("Service worker stopped");
        }
    }
}

impl Drop for ServiceWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn service_thread_main<S: EditService>(
    mut service: S,
    cmd_rx: Receiver<WorkerCommand>,
    done_tx: Sender<ServiceCompletion>,
) {
    loop {
        let request = match cmd_rx.recv() {
            Ok(WorkerCommand::Run(request)) => request,
            Ok(WorkerCommand::Stop) => {
                tracing::debug!("Service thread: stop command received");
                return;
            }
            Err(_) => {
                tracing::debug!("Service thread: command channel disconnected, exiting");
                return;
            }
        };

        let label = request.label();
        tracing::debug!(operation = label, "Service thread: running request");
        let done = run_request(&mut service, request);
        if done_tx.send(done).is_err() {
            tracing::debug!(operation = label, "Service thread: completion receiver dropped, exiting");
            return;
        }
    }
}

fn run_request<S: EditService>(service: &mut S, request: ServiceRequest) -> ServiceCompletion {
    match request {
        ServiceRequest::Upload(request) => {
            ServiceCompletion::Uploaded(service.upload(&request).and_then(|reply| reply.into_outcome()))
        }
        ServiceRequest::Edit(request) => ServiceCompletion::Edited(
            service
                .edit(&request)
                .and_then(|reply| reply.into_outcome(false)),
        ),
        ServiceRequest::PreviewCuts { request, revision } => ServiceCompletion::Previewed {
            revision,
            result: service
                .preview_cuts(&request)
                .and_then(|reply| reply.into_outcome(true)),
        },
        ServiceRequest::Cleanup(session) => {
            let result = service.cleanup(&session).and_then(|reply| reply.into_outcome());
            ServiceCompletion::CleanedUp { session, result }
        }
    }
}
