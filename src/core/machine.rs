//! Workflow reducer
//!
//! Two pure functions drive the session:
//! - [`begin`] turns a user intent into a new state plus the backend
//!   [`Command`] to issue, after checking step, in-flight slot, local
//!   validation and preconditions.
//! - [`resolve`] folds a backend [`Response`] back into the state.
//!
//! Neither touches the network or mutates its input.

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use super::state::{Action, Notice, Reply, Request, Response, WorkflowState};
use super::steps::{next_step, Step};
use super::validation::{
    no_outreach_targets, validate_campaign_form, validate_company_form, validate_product_form,
    validate_search,
};
use crate::models::{
    CampaignForm, CampaignId, CompanyForm, CompanyId, CreateCampaignRequest,
    CreateCompanyRequest, CreateProductRequest, MatchId, MatchStatus, ProductForm,
    SearchInfluencersRequest, SearchParameters,
};
use crate::services::BackendError;

/// Errors surfaced by the workflow
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Local field or range check failed; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The backend call failed or answered with a non-success status
    #[error("Request failed: {0}")]
    Transport(#[from] BackendError),

    /// A caller bypassed the workflow gates
    #[error("Workflow invariant violated: {0}")]
    Invariant(String),

    /// The same action is still waiting for its response
    #[error("{0} is already in progress")]
    InFlight(Action),
}

impl WorkflowError {
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "VALIDATION",
            WorkflowError::Transport(_) => "TRANSPORT",
            WorkflowError::Invariant(_) => "INVARIANT",
            WorkflowError::InFlight(_) => "IN_FLIGHT",
        }
    }

    /// Invariant violations are programming errors, not user errors
    pub fn is_defect(&self) -> bool {
        matches!(self, WorkflowError::Invariant(_))
    }
}

fn invariant(message: String) -> WorkflowError {
    tracing::error!("Workflow invariant violated: {}", message);
    WorkflowError::Invariant(message)
}

/// A user intent dispatched by the view layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SubmitCompany(CompanyForm),
    SubmitProduct(ProductForm),
    SubmitSearch(SearchParameters),
    Approve(MatchId),
    ContactAll,
    OpenCampaign(CampaignForm),
}

impl Intent {
    pub fn action(&self) -> Action {
        match self {
            Intent::SubmitCompany(_) => Action::CreateCompany,
            Intent::SubmitProduct(_) => Action::CreateProduct,
            Intent::SubmitSearch(_) => Action::Search,
            Intent::Approve(id) => Action::Approve(*id),
            Intent::ContactAll => Action::ContactAll,
            Intent::OpenCampaign(_) => Action::OpenCampaign,
        }
    }
}

/// The backend call an accepted intent requires
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateCompany(CreateCompanyRequest),
    CreateProduct {
        company_id: CompanyId,
        request: CreateProductRequest,
    },
    Search(SearchInfluencersRequest),
    Approve(MatchId),
    ContactAll(CampaignId),
    CreateCampaign {
        company_id: CompanyId,
        request: CreateCampaignRequest,
    },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::CreateCompany(_) => Action::CreateCompany,
            Command::CreateProduct { .. } => Action::CreateProduct,
            Command::Search(_) => Action::Search,
            Command::Approve(id) => Action::Approve(*id),
            Command::ContactAll(_) => Action::ContactAll,
            Command::CreateCampaign { .. } => Action::OpenCampaign,
        }
    }
}

/// Outcome of an accepted intent: the pending state and the call to make
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WorkflowState,
    pub command: Command,
}

/// Accept or refuse an intent.
///
/// On refusal the caller keeps its current state untouched. On acceptance
/// the returned state has the action marked in flight and any previous
/// notice cleared.
pub fn begin(state: &WorkflowState, intent: Intent) -> Result<Transition, WorkflowError> {
    let action = intent.action();

    if state.step != action.step() {
        return Err(invariant(format!(
            "cannot {} while at step {}",
            action, state.step
        )));
    }

    if state.is_in_flight(action) {
        return Err(WorkflowError::InFlight(action));
    }

    let mut next = state.clone();
    next.notice = None;

    let command = match intent {
        Intent::SubmitCompany(form) => {
            let form = validate_company_form(&form)?;
            next.company_form = form.clone();
            Command::CreateCompany(form.into())
        }
        Intent::SubmitProduct(form) => {
            let form = validate_product_form(&form)?;
            let company_id = match &state.company {
                Some(company) => company.id,
                None => return Err(invariant("product submitted without an active company".into())),
            };
            next.product_form = form.clone();
            Command::CreateProduct {
                company_id,
                request: form.into(),
            }
        }
        Intent::SubmitSearch(params) => {
            let params = validate_search(&params)?;
            let product_id = match &state.product {
                Some(product) => product.id,
                None => return Err(invariant("search submitted without an active product".into())),
            };
            next.search = params;
            Command::Search(SearchInfluencersRequest {
                product_id,
                max_results: params.max_results,
                min_fit_score: params.min_fit_score,
            })
        }
        Intent::Approve(match_id) => {
            let current = match state.find_match(match_id) {
                Some(m) => m.status,
                None => {
                    return Err(invariant(format!(
                        "match {} is not in the current result set",
                        match_id
                    )))
                }
            };
            if current != MatchStatus::Pending {
                return Err(not_pending(match_id, current).into());
            }
            Command::Approve(match_id)
        }
        Intent::ContactAll => {
            if state.product.is_none() {
                return Err(invariant("contact-all without an active product".into()));
            }
            if state.outreach.blocks_contact(&state.matches) {
                return Err(no_outreach_targets().into());
            }
            let campaign_id = state.campaign_ref();
            next.set_contact_campaign(campaign_id);
            Command::ContactAll(campaign_id)
        }
        Intent::OpenCampaign(form) => {
            let form = validate_campaign_form(&form)?;
            let (company_id, product_id) = match (&state.company, &state.product) {
                (Some(company), Some(product)) => (company.id, product.id),
                _ => {
                    return Err(invariant(
                        "campaign opened without an active company and product".into(),
                    ))
                }
            };
            Command::CreateCampaign {
                company_id,
                request: CreateCampaignRequest::from_form(product_id, form),
            }
        }
    };

    next.mark_in_flight(action);
    tracing::debug!("Dispatching {} at step {}", action, state.step);

    Ok(Transition {
        state: next,
        command,
    })
}

/// Fold a backend response into the state.
///
/// `Pending` leaves the state as is. `Failed` frees the slot and raises an
/// error notice without moving the step. `Succeeded` applies the effect of
/// the action and, for step-advancing actions, moves to the next step.
pub fn resolve(state: &WorkflowState, response: Response) -> Result<WorkflowState, WorkflowError> {
    let Response { action, request } = response;

    if !state.is_in_flight(action) {
        return Err(invariant(format!(
            "response for {} with no request in flight",
            action
        )));
    }

    let reply = match request {
        Request::Pending => return Ok(state.clone()),
        Request::Failed(err) => {
            tracing::warn!("{} failed at step {}: {}", action, state.step, err);
            let mut next = state.clone();
            next.clear_in_flight(action);
            next.notice = Some(Notice::error(action, format!("Could not {}: {}", action, err)));
            return Ok(next);
        }
        Request::Succeeded(reply) => reply,
    };

    let mut next = state.clone();
    let contact_campaign = next.contact_campaign();
    next.clear_in_flight(action);

    match (action, reply) {
        (Action::CreateCompany, Reply::Company(company)) => {
            tracing::info!("Company {} ({}) is now active", company.id, company.name);
            next.company = Some(company);
            next.company_form = CompanyForm::default();
            advance(&mut next)?;
        }
        (Action::CreateProduct, Reply::Product(product)) => {
            tracing::info!("Product {} ({}) is now active", product.id, product.name);
            next.product = Some(product);
            next.product_form = ProductForm::default();
            advance(&mut next)?;
        }
        (Action::Search, Reply::Matches(matches)) => {
            tracing::info!("Search returned {} matches", matches.len());
            next.matches = matches;
            advance(&mut next)?;
        }
        (Action::Approve(match_id), Reply::Acknowledged) => {
            match next.matches.iter_mut().find(|m| m.match_id == match_id) {
                Some(m) if m.status.can_advance_to(MatchStatus::Approved) => {
                    m.status = MatchStatus::Approved;
                    tracing::info!("Match {} approved", match_id);
                }
                Some(m) => {
                    tracing::debug!("Match {} already {}, keeping status", match_id, m.status);
                }
                None => {
                    return Err(invariant(format!(
                        "approved match {} is no longer in the result set",
                        match_id
                    )))
                }
            }
        }
        (Action::ContactAll, Reply::Acknowledged) => {
            let campaign_id = contact_campaign.unwrap_or_else(|| next.campaign_ref());
            let policy = next.outreach;
            let marked = policy.apply_contacted(&mut next.matches);
            tracing::info!(
                "Outreach sent for campaign {} ({} matches marked contacted)",
                campaign_id,
                marked
            );
            next.notice = Some(Notice::info(
                action,
                format!("Outreach sent to qualifying influencers for campaign {}", campaign_id),
            ));
        }
        (Action::OpenCampaign, Reply::Campaign(campaign)) => {
            tracing::info!("Campaign {} ({}) is now active", campaign.id, campaign.name);
            next.campaign = Some(campaign);
        }
        (action, reply) => {
            return Err(invariant(format!(
                "unexpected reply {:?} for {}",
                reply_kind(&reply),
                action
            )))
        }
    }

    Ok(next)
}

fn advance(state: &mut WorkflowState) -> Result<(), WorkflowError> {
    let from: Step = state.step;
    let to = next_step(from).ok_or_else(|| invariant(format!("no step after {}", from)))?;
    tracing::info!("Workflow step {} -> {}", from, to);
    state.step = to;
    Ok(())
}

fn not_pending(match_id: MatchId, status: MatchStatus) -> ValidationErrors {
    let mut error = ValidationError::new("not_pending");
    error.message = Some(format!("match {} is already {}", match_id, status).into());
    let mut errors = ValidationErrors::new();
    errors.add("status", error);
    errors
}

fn reply_kind(reply: &Reply) -> &'static str {
    match reply {
        Reply::Company(_) => "company",
        Reply::Product(_) => "product",
        Reply::Matches(_) => "matches",
        Reply::Campaign(_) => "campaign",
        Reply::Acknowledged => "acknowledgement",
    }
}
