use std::collections::{HashMap, VecDeque};

use crate::internal::form::{FormField, PotForm, ValidationRules};
use crate::internal::modal::{ConfirmChoice, DeleteRequest, ModalState};
use crate::internal::models::{MutationOutcome, PendingOp};
use crate::internal::notification::Notification;
use crate::internal::store::CollectionStore;
use crate::internal::sync::{Mutation, Request, RequestResult, SyncBackend};

/// A request handed out by the manager, tagged so its result can find its way back.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub ticket: u64,
    pub request: Request,
}

/// What the caller has to do after driving the manager.
#[derive(Debug, Default)]
pub struct Effects {
    pub notice: Option<Notification>,
    pub requests: Vec<Dispatch>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    fn notice(notice: Notification) -> Self {
        Self {
            notice: Some(notice),
            requests: Vec::new(),
        }
    }

    fn request(dispatch: Dispatch) -> Self {
        Self {
            notice: None,
            requests: vec![dispatch],
        }
    }

    fn and_request(mut self, dispatch: Option<Dispatch>) -> Self {
        self.requests.extend(dispatch);
        self
    }
}

/// Form, collection and sync adapter wired together.
///
/// The manager never does I/O itself. Remote work comes out as [`Dispatch`]es;
/// the caller runs them on [`SyncBackend::run`] (inline or on a task) and feeds
/// the result to [`PotManager::complete`]. The local backend never dispatches.
pub struct PotManager {
    backend: SyncBackend,
    rules: ValidationRules,
    pub form: PotForm,
    pub store: CollectionStore,
    pub modal: ModalState,
    confirmation: Option<DeleteRequest>,
    in_flight: HashMap<u64, Request>,
    next_ticket: u64,
    submitting: Option<u64>,
}

impl PotManager {
    pub fn new(backend: SyncBackend, rules: ValidationRules) -> Self {
        let form = PotForm::new(FormField::active_for(backend.kind(), &rules.required));
        Self {
            backend,
            rules,
            form,
            store: CollectionStore::new(),
            modal: ModalState::default(),
            confirmation: None,
            in_flight: HashMap::new(),
            next_ticket: 0,
            submitting: None,
        }
    }

    pub fn backend(&self) -> &SyncBackend {
        &self.backend
    }

    pub fn confirmation(&self) -> Option<&DeleteRequest> {
        self.confirmation.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_some()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
            .values()
            .any(|r| matches!(r, Request::Fetch { .. }))
    }

    fn dispatch(&mut self, request: Request) -> Dispatch {
        self.next_ticket += 1;
        self.in_flight.insert(self.next_ticket, request.clone());
        Dispatch {
            ticket: self.next_ticket,
            request,
        }
    }

    /// Re-read the whole collection from the server. No-op for the local backend.
    pub fn refresh(&mut self) -> Effects {
        Effects::none().and_request(self.fetch_request())
    }

    fn fetch_request(&mut self) -> Option<Dispatch> {
        match self.backend.is_remote() {
            true => {
                let seq = self.store.begin_fetch();
                Some(self.dispatch(Request::Fetch { seq }))
            }
            false => None,
        }
    }

    pub fn open_create(&mut self) {
        self.detach_submission();
        self.form.clear();
        self.modal.open_create();
    }

    /// Load the chosen record into the form and open it for edit.
    pub fn open_edit(&mut self, id: &str) -> Effects {
        match self.store.get(id) {
            Some(pot) => {
                self.submitting = None;
                self.form.load(pot);
                self.modal.open_edit(id);
                Effects::none()
            }
            None => Effects::notice(Notification::warning("That pot no longer exists")),
        }
    }

    /// Clear the form and close the modal.
    pub fn cancel(&mut self) {
        self.detach_submission();
        self.reset_form();
    }

    // A save still in flight no longer owns the form once the user moves on.
    // Its result still settles the store; it just won't close the modal.
    fn detach_submission(&mut self) {
        if let Some(ticket) = self.submitting.take() {
            tracing::debug!(ticket, "Form detached from in-flight save");
        }
    }

    fn reset_form(&mut self) {
        self.form.clear();
        self.modal.close();
    }

    /// Validate the form and apply it: append or merge locally, or dispatch
    /// a create/update to the server.
    pub fn save(&mut self) -> Effects {
        if self.submitting.is_some() {
            return Effects::notice(Notification::warning("Still saving, please wait"));
        }

        let draft = match self.form.validate(&self.rules) {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "Form validation failed");
                return Effects::notice(Notification::warning(e.message));
            }
        };

        let editing = self.modal.editing_id().map(str::to_string);

        match self.backend {
            SyncBackend::Local => {
                let notice = match editing {
                    Some(id) => match self.store.merge(&id, draft.name, draft.category) {
                        true => {
                            tracing::info!(id = %id, "Updated pot locally");
                            Notification::info("Pot updated!")
                        }
                        false => Notification::warning("That pot no longer exists"),
                    },
                    None => {
                        let id = self.store.append(draft.name, draft.category);
                        tracing::info!(id = %id, "Added pot locally");
                        Notification::info("Pot added!")
                    }
                };
                self.reset_form();
                Effects::notice(notice)
            }
            SyncBackend::Remote(_) => {
                let mutation = match editing {
                    Some(id) => {
                        if self.store.is_busy(&id) {
                            return Effects::notice(Notification::warning(
                                "That pot is busy, try again shortly",
                            ));
                        }
                        self.store.mark_pending(&id, PendingOp::Updating);
                        Mutation::Update { id, draft }
                    }
                    None => {
                        self.store.begin_create();
                        Mutation::Create(draft)
                    }
                };
                tracing::debug!(%mutation, "Dispatching save");
                let dispatch = self.dispatch(Request::Mutate(mutation));
                self.submitting = Some(dispatch.ticket);
                Effects::request(dispatch)
            }
        }
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: &str) -> Effects {
        match self.store.get(id) {
            Some(_) if self.store.is_busy(id) => {
                Effects::notice(Notification::warning("That pot is busy, try again shortly"))
            }
            Some(pot) => {
                self.confirmation = Some(DeleteRequest {
                    id: pot.id.clone(),
                    name: pot.name.clone(),
                });
                Effects::none()
            }
            None => Effects::notice(Notification::warning("That pot no longer exists")),
        }
    }

    /// Answer the pending delete confirmation, if any.
    pub fn resolve_delete(&mut self, choice: ConfirmChoice) -> Effects {
        let Some(request) = self.confirmation.take() else {
            return Effects::none();
        };

        match (choice, self.backend.is_remote()) {
            (ConfirmChoice::Cancel, _) => {
                tracing::debug!(id = %request.id, "Delete cancelled");
                Effects::none()
            }
            (ConfirmChoice::Confirm, false) => match self.store.remove(&request.id) {
                Some(_) => {
                    tracing::info!(id = %request.id, "Deleted pot locally");
                    if self.modal.editing_id() == Some(request.id.as_str()) {
                        self.reset_form();
                    }
                    Effects::notice(Notification::info("Pot deleted!"))
                }
                None => Effects::notice(Notification::warning("That pot no longer exists")),
            },
            (ConfirmChoice::Confirm, true) => {
                self.store.mark_pending(&request.id, PendingOp::Deleting);
                Effects::request(self.dispatch(Request::Mutate(Mutation::Delete {
                    id: request.id,
                })))
            }
        }
    }

    /// Feed back the result of a dispatched request.
    pub fn complete(&mut self, ticket: u64, result: RequestResult) -> Effects {
        let Some(request) = self.in_flight.remove(&ticket) else {
            tracing::warn!(ticket, "Result for unknown request ignored");
            return Effects::none();
        };
        let was_form_save = self.submitting == Some(ticket);
        if was_form_save {
            self.submitting = None;
        }

        match (request, result) {
            (Request::Fetch { seq }, RequestResult::Pots(pots)) => {
                self.store.apply_snapshot(seq, pots);
                Effects::none()
            }
            (Request::Fetch { seq }, RequestResult::Failed(err)) => {
                tracing::error!(seq, error = %err, "Failed to fetch pots");
                Effects::notice(Notification::error("Could not load pots from the server"))
            }
            (Request::Mutate(mutation), RequestResult::Outcome(MutationOutcome::Applied)) => {
                self.settle(&mutation);
                tracing::info!(%mutation, "Server applied change");

                // Patch what we can so the list doesn't flash stale data while
                // the follow-up fetch is in flight.
                match &mutation {
                    Mutation::Update { id, draft } => {
                        self.store.apply_draft(id, draft);
                    }
                    Mutation::Delete { id } => {
                        self.store.remove(id);
                    }
                    Mutation::Create(_) => {}
                }
                if was_form_save {
                    self.reset_form();
                }

                let follow_up = self.fetch_request();
                if let Some(Dispatch {
                    request: Request::Fetch { seq },
                    ..
                }) = &follow_up
                {
                    self.store.supersede_before(*seq);
                }
                Effects::notice(Notification::info(mutation.success_message()))
                    .and_request(follow_up)
            }
            (Request::Mutate(mutation), RequestResult::Outcome(MutationOutcome::Rejected(msg))) => {
                self.settle(&mutation);
                tracing::warn!(%mutation, message = ?msg, "Server rejected change");
                let message = msg.unwrap_or_else(|| mutation.rejection_fallback().to_string());
                Effects::notice(Notification::warning(message))
            }
            (Request::Mutate(mutation), RequestResult::Failed(err)) => {
                self.settle(&mutation);
                tracing::error!(%mutation, error = %err, "Failed to reach server");
                Effects::notice(Notification::error(format!(
                    "{}: server unreachable",
                    mutation.rejection_fallback()
                )))
            }
            (request, result) => {
                if let Request::Mutate(mutation) = &request {
                    self.settle(mutation);
                }
                tracing::error!(?request, ?result, "Mismatched request result");
                Effects::none()
            }
        }
    }

    fn settle(&mut self, mutation: &Mutation) {
        match mutation.record_id() {
            Some(id) => self.store.settle(id),
            None => self.store.finish_create(),
        }
    }

    /// Run `effects` to completion against the backend, following up
    /// re-fetches inline. Returns every notice raised along the way.
    pub async fn drive(&mut self, effects: Effects) -> Vec<Notification> {
        let mut notices: Vec<Notification> = effects.notice.into_iter().collect();
        let mut queue: VecDeque<Dispatch> = effects.requests.into();

        while let Some(Dispatch { ticket, request }) = queue.pop_front() {
            let result = self.backend.run(&request).await;
            let next = self.complete(ticket, result);
            notices.extend(next.notice);
            queue.extend(next.requests);
        }

        notices
    }
}
