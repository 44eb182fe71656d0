//! # Run Coordination
//!
//! Owns the auth form and the lifecycle of a compliance run:
//! `Idle -> Validating -> Idle | Running`, then `Running -> Idle` on the
//! terminal event. Only one run may be in flight; there is no cancellation and
//! no retry.

use std::collections::BTreeMap;
use std::fmt;

use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;

use crate::auth::{self, AuthField, AuthForm, FieldErrors};
use crate::catalog::{PAYLOAD_BINDINGS, PayloadSource};
use crate::error::ValidationError;
use crate::http::client::{SuiteClient, dispatch};
use crate::http::response::RunReport;
use crate::notify::{Notify, Severity};
use crate::selection::SelectionTree;

/// Flat request body expected by the compliance suite.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub endpoint: String,
    pub user_name: String,
    pub password: String,
    pub token: String,
    #[serde(flatten)]
    pub checks: BTreeMap<&'static str, bool>,
}

impl fmt::Debug for RequestPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPayload")
            .field("endpoint", &self.endpoint)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("token", &"<redacted>")
            .field("checks", &self.checks)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started { selected_count: usize },
    Progress { percent: u32 },
    Completed(RunReport),
    Failed { reason: String },
}

impl RunEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunEvent::Completed(_) | RunEvent::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Validating,
    Running,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunState {
    pub in_flight: bool,
    /// Number of selected sub-tests. Shown as the progress value until the
    /// first transfer percentage arrives.
    pub progress_count: usize,
    pub percent: Option<u32>,
    pub statistics: Option<Value>,
    pub results: Option<Vec<Value>>,
    pub report_link: Option<String>,
}

/// What a validated run carries into dispatch.
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub payload: RequestPayload,
    pub selected_count: usize,
}

/// The stricter check behind the Run button.
pub fn validate_for_run(tree: &SelectionTree, form: &AuthForm) -> Result<(), ValidationError> {
    if form.is_empty(AuthField::Endpoint) {
        return Err(ValidationError::MissingEndpoint);
    }

    let has_basic = !form.is_empty(AuthField::UserName) || !form.is_empty(AuthField::Password);
    let has_token = !form.is_empty(AuthField::Token);
    if !has_basic && !has_token {
        return Err(ValidationError::MissingCredentials);
    }
    if has_basic && has_token {
        return Err(ValidationError::ConflictingAuth);
    }

    let missing = form.missing_for_type();
    if !missing.is_empty() {
        return Err(ValidationError::IncompleteAuth { missing });
    }

    if tree.selected_count() == 0 {
        return Err(ValidationError::NothingSelected);
    }

    Ok(())
}

pub fn build_payload(tree: &SelectionTree, form: &AuthForm) -> RequestPayload {
    let checks = PAYLOAD_BINDINGS
        .iter()
        .map(|binding| (binding.key, is_selected(tree, binding.source)))
        .collect();

    RequestPayload {
        endpoint: form.endpoint.clone(),
        user_name: form.user_name.clone(),
        password: form.password.clone(),
        token: form.token.clone(),
        checks,
    }
}

fn is_selected(tree: &SelectionTree, source: PayloadSource) -> bool {
    match source {
        PayloadSource::Group { group_id, .. } => tree.group(group_id).is_some_and(|group| group.checked),
        PayloadSource::SubTest { group_id, index, .. } => tree
            .group(group_id)
            .and_then(|group| group.sub.get(index))
            .is_some_and(|sub| sub.checked),
    }
}

/// `Started`, then whatever the dispatch produces.
pub fn run(client: SuiteClient, ticket: RunTicket) -> impl Stream<Item = RunEvent> + Send + 'static {
    let started = RunEvent::Started {
        selected_count: ticket.selected_count,
    };
    stream::once(async move { started }).chain(dispatch(client, ticket.payload))
}

#[derive(Debug, Clone, Default)]
pub struct RunCoordinator {
    pub form: AuthForm,
    pub field_errors: FieldErrors,
    state: RunState,
    phase: RunPhase,
}

impl RunCoordinator {
    pub fn new(form: AuthForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn can_run(&self) -> bool {
        !self.state.in_flight
    }

    /// The auth dialog's Submit.
    pub fn submit_auth(&mut self, sink: &mut impl Notify) -> Result<(), ValidationError> {
        auth::submit(&self.form, &mut self.field_errors).inspect_err(|err| {
            sink.notify(err.to_string(), Severity::Error);
        })
    }

    /// Validates and moves to `Running`. On failure the error is reported to
    /// `sink` and the coordinator stays idle.
    pub fn start(
        &mut self,
        tree: &SelectionTree,
        sink: &mut impl Notify,
    ) -> Result<RunTicket, ValidationError> {
        if self.state.in_flight {
            return Err(ValidationError::RunInFlight);
        }

        self.phase = RunPhase::Validating;
        if let Err(err) = validate_for_run(tree, &self.form) {
            log::warn!("run rejected: {err}");
            self.phase = RunPhase::Idle;
            sink.notify(err.to_string(), Severity::Error);
            return Err(err);
        }

        let selected_count = tree.selected_count();
        self.state = RunState {
            in_flight: true,
            progress_count: selected_count,
            ..RunState::default()
        };
        self.phase = RunPhase::Running;
        log::info!(
            "starting run against {} with {selected_count} test(s)",
            self.form.endpoint
        );

        Ok(RunTicket {
            payload: build_payload(tree, &self.form),
            selected_count,
        })
    }

    /// Folds one run event into the state. Events arriving while no run is in
    /// flight are ignored.
    pub fn apply(&mut self, event: &RunEvent, sink: &mut impl Notify) {
        if self.phase != RunPhase::Running {
            log::debug!("ignoring {event:?} outside of a run");
            return;
        }

        match event {
            RunEvent::Started { selected_count } => self.state.progress_count = *selected_count,
            RunEvent::Progress { percent } => self.state.percent = Some(*percent),
            RunEvent::Completed(report) => {
                self.finish();
                self.state.statistics = report.statistics.clone();
                self.state.results = report.results.clone();
                self.state.report_link = report.report_link().map(str::to_string);

                match report.error_message() {
                    Some(message) => sink.notify(message.to_string(), Severity::Error),
                    None => sink.notify(
                        format!("Completed {} test case(s)", self.state.progress_count),
                        Severity::Info,
                    ),
                }
            }
            RunEvent::Failed { reason } => {
                self.finish();
                sink.notify(reason.clone(), Severity::Error);
            }
        }
    }

    fn finish(&mut self) {
        self.state.in_flight = false;
        self.state.percent = None;
        self.phase = RunPhase::Idle;
    }
}
