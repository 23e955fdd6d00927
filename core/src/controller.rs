//! Async driver tying a shared session to an analysis client.
//!
//! The session lock is taken twice per submission: once to start it and
//! once to resolve it. It is never held across the network await, so a
//! second `submit` can supersede the first while it is still in flight.

use crate::{
    client::{AnalysisClient, UploadFile},
    error::ViewerResult,
    export::{self, ExportArtifact},
    graph::Graph,
    report::SuspiciousAccount,
    session::{AnalysisSession, Resolution, SessionState},
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct SessionController<C> {
    session: Arc<Mutex<AnalysisSession>>,
    client:  C,
}

impl<C: AnalysisClient> SessionController<C> {
    pub fn new(client: C) -> Self {
        Self {
            session: Arc::new(Mutex::new(AnalysisSession::new())),
            client,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Submit a file and wait for its response.
    ///
    /// Returns `None` for an empty selection. `Some(Resolution::Stale)`
    /// means a later submission superseded this one before it finished.
    pub async fn submit(&self, file: Option<UploadFile>) -> Option<Resolution> {
        let ticket = self.session.lock().await.submit(file.as_ref());
        let (Some(ticket), Some(file)) = (ticket, file) else {
            return None;
        };

        let outcome = self.client.analyze(&file).await;
        Some(self.session.lock().await.resolve(ticket, outcome))
    }

    pub async fn reset(&self) {
        self.session.lock().await.reset();
    }

    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state().clone()
    }

    /// Run `f` against the session under the lock.
    pub async fn with_session<R>(&self, f: impl FnOnce(&mut AnalysisSession) -> R) -> R {
        let mut session = self.session.lock().await;
        f(&mut session)
    }

    pub async fn graph(&self) -> ViewerResult<Graph> {
        self.session.lock().await.graph()
    }

    pub async fn top_suspicious(&self, k: usize) -> ViewerResult<Vec<SuspiciousAccount>> {
        Ok(self.session.lock().await.top_suspicious(k)?.to_vec())
    }

    pub async fn export(&self) -> ViewerResult<ExportArtifact> {
        self.session.lock().await.export()
    }

    /// Export under a caller-chosen filename.
    pub async fn export_as(&self, filename: &str) -> ViewerResult<ExportArtifact> {
        let session = self.session.lock().await;
        export::export_as(session.report()?, filename)
    }
}
