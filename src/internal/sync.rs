use anyhow::Result;
use strum_macros::Display;

use crate::api::PotApi;
use crate::config::BackendKind;
use crate::internal::models::{MutationOutcome, Pot, PotDraft};

/// Where pot changes are applied.
///
/// `Local` has no I/O at all: the manager reduces its collection directly.
#[derive(Clone, Debug)]
pub enum SyncBackend {
    Remote(PotApi),
    Local,
}

impl SyncBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            SyncBackend::Remote(_) => BackendKind::Remote,
            SyncBackend::Local => BackendKind::Local,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SyncBackend::Remote(_))
    }

    /// Execute a request against the backend.
    pub async fn run(&self, request: &Request) -> RequestResult {
        match self {
            SyncBackend::Remote(api) => run_remote(api, request).await,
            SyncBackend::Local => RequestResult::Failed(
                "local backend does not issue requests".to_string(),
            ),
        }
    }
}

async fn run_remote(api: &PotApi, request: &Request) -> RequestResult {
    match request {
        Request::Fetch { .. } => api.fetch_pots().await.into(),
        Request::Mutate(mutation) => {
            let result = match mutation {
                Mutation::Create(draft) => api.create_pot(draft).await,
                Mutation::Update { id, draft } => api.update_pot(id, draft).await,
                Mutation::Delete { id } => api.delete_pot(id).await,
            };
            result.into()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum Mutation {
    #[strum(to_string = "create")]
    Create(PotDraft),
    #[strum(to_string = "update {id}")]
    Update { id: String, draft: PotDraft },
    #[strum(to_string = "delete {id}")]
    Delete { id: String },
}

impl Mutation {
    pub fn record_id(&self) -> Option<&str> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { id, .. } | Mutation::Delete { id } => Some(id),
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "Pot added!",
            Mutation::Update { .. } => "Pot updated!",
            Mutation::Delete { .. } => "Pot deleted!",
        }
    }

    pub fn rejection_fallback(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "Error adding pot",
            Mutation::Update { .. } => "Error updating pot",
            Mutation::Delete { .. } => "Error deleting pot",
        }
    }
}

/// Work handed back to the caller to run on the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Fetch { seq: u64 },
    Mutate(Mutation),
}

/// What came back from running a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResult {
    Pots(Vec<Pot>),
    Outcome(MutationOutcome),
    /// Transport or decoding failure, already rendered with its context chain.
    Failed(String),
}

impl From<Result<Vec<Pot>>> for RequestResult {
    fn from(result: Result<Vec<Pot>>) -> Self {
        match result {
            Ok(pots) => RequestResult::Pots(pots),
            Err(e) => RequestResult::Failed(format!("{:#}", e)),
        }
    }
}

impl From<Result<MutationOutcome>> for RequestResult {
    fn from(result: Result<MutationOutcome>) -> Self {
        match result {
            Ok(outcome) => RequestResult::Outcome(outcome),
            Err(e) => RequestResult::Failed(format!("{:#}", e)),
        }
    }
}
