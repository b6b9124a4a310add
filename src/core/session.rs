//! Async driver: runs reducer commands against a [`Gateway`]

use tracing::Instrument;
use uuid::Uuid;

use super::machine::{begin, resolve, Command, Intent, Transition, WorkflowError};
use super::state::{Reply, Request, Response, TransportFailure, WorkflowState};
use crate::services::{BackendError, Gateway};

/// One user session: the workflow state plus the gateway it talks to
///
/// Each dispatch runs to completion or failure; there is no cancellation
/// and no retry. A failed call leaves the step unchanged, records a notice
/// and returns [`WorkflowError::Transport`].
pub struct Session<G> {
    id: Uuid,
    gateway: G,
    state: WorkflowState,
    span: tracing::Span,
}

impl<G: Gateway> Session<G> {
    pub fn new(gateway: G, state: WorkflowState) -> Self {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", id = %id);
        Self {
            id,
            gateway,
            state,
            span,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Apply an intent: validate locally, call the backend, fold the result in
    pub async fn dispatch(&mut self, intent: Intent) -> Result<&WorkflowState, WorkflowError> {
        let span = self.span.clone();
        self.run(intent).instrument(span).await?;
        Ok(&self.state)
    }

    async fn run(&mut self, intent: Intent) -> Result<(), WorkflowError> {
        let Transition { state, command } = begin(&self.state, intent)?;
        let action = command.action();
        self.state = state;

        match self.execute(command).await {
            Ok(reply) => {
                self.state = resolve(
                    &self.state,
                    Response::new(action, Request::Succeeded(reply)),
                )?;
                Ok(())
            }
            Err(err) => {
                self.state = resolve(
                    &self.state,
                    Response::new(action, Request::Failed(TransportFailure::from(&err))),
                )?;
                Err(WorkflowError::Transport(err))
            }
        }
    }

    async fn execute(&self, command: Command) -> Result<Reply, BackendError> {
        match command {
            Command::CreateCompany(request) => self
                .gateway
                .create_company(&request)
                .await
                .map(Reply::Company),
            Command::CreateProduct {
                company_id,
                request,
            } => self
                .gateway
                .create_product(company_id, &request)
                .await
                .map(Reply::Product),
            Command::Search(request) => self
                .gateway
                .search_influencers(&request)
                .await
                .map(Reply::Matches),
            Command::Approve(match_id) => self
                .gateway
                .approve_match(match_id)
                .await
                .map(|_| Reply::Acknowledged),
            Command::ContactAll(campaign_id) => self
                .gateway
                .contact_influencers(campaign_id)
                .await
                .map(|_| Reply::Acknowledged),
            Command::CreateCampaign {
                company_id,
                request,
            } => self
                .gateway
                .create_campaign(company_id, &request)
                .await
                .map(Reply::Campaign),
        }
    }
}
