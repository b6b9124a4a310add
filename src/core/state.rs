//! Session state and the value types exchanged with the reducer

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

use crate::core::outreach::OutreachPolicy;
use crate::core::steps::Step;
use crate::models::{
    Campaign, CampaignId, Company, CompanyForm, InfluencerMatch, MatchId, Product, ProductForm,
    SearchParameters,
};
use crate::services::BackendError;

/// A backend-bound action; also the key of its in-flight slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateCompany,
    CreateProduct,
    Search,
    Approve(MatchId),
    ContactAll,
    OpenCampaign,
}

impl Action {
    /// The step in which this action may be issued
    pub fn step(&self) -> Step {
        match self {
            Action::CreateCompany => Step::Company,
            Action::CreateProduct => Step::Product,
            Action::Search => Step::Search,
            Action::Approve(_) | Action::ContactAll | Action::OpenCampaign => Step::Results,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateCompany => f.write_str("create company"),
            Action::CreateProduct => f.write_str("create product"),
            Action::Search => f.write_str("search influencers"),
            Action::Approve(id) => write!(f, "approve match {}", id),
            Action::ContactAll => f.write_str("contact influencers"),
            Action::OpenCampaign => f.write_str("open campaign"),
        }
    }
}

/// A failed backend call as the state remembers it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    /// HTTP status when the backend answered at all
    pub status: Option<u16>,
    pub message: String,
}

impl From<&BackendError> for TransportFailure {
    fn from(err: &BackendError) -> Self {
        let status = match err {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::RequestError(e) => e.status().map(|s| s.as_u16()),
            BackendError::InvalidResponse(_) => None,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for TransportFailure {
    fn from(err: BackendError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Lifecycle of one backend request
#[derive(Debug, Clone, PartialEq)]
pub enum Request<T> {
    Pending,
    Succeeded(T),
    Failed(TransportFailure),
}

impl<T> Request<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Request::Pending)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Request<U> {
        match self {
            Request::Pending => Request::Pending,
            Request::Succeeded(value) => Request::Succeeded(f(value)),
            Request::Failed(err) => Request::Failed(err),
        }
    }
}

impl<T> From<Result<T, BackendError>> for Request<T> {
    fn from(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(value) => Request::Succeeded(value),
            Err(err) => Request::Failed(TransportFailure::from(&err)),
        }
    }
}

/// Payload of a successful backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Company(Company),
    Product(Product),
    Matches(Vec<InfluencerMatch>),
    Campaign(Campaign),
    Acknowledged,
}

/// A backend completion event fed back into the reducer
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub action: Action,
    pub request: Request<Reply>,
}

impl Response {
    pub fn new(action: Action, request: Request<Reply>) -> Self {
        Self { action, request }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible message about the last action's outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub action: Action,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn info(action: Action, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            action,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn error(action: Action, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            action,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Everything one session knows
///
/// Only the reducer in [`crate::core::machine`] should produce new states;
/// fields are public for rendering and inspection.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub step: Step,
    /// Last submitted company form; kept for retry, cleared on success
    pub company_form: CompanyForm,
    pub product_form: ProductForm,
    pub company: Option<Company>,
    pub product: Option<Product>,
    pub search: SearchParameters,
    pub matches: Vec<InfluencerMatch>,
    pub campaign: Option<Campaign>,
    pub outreach: OutreachPolicy,
    pub notice: Option<Notice>,
    in_flight: HashSet<Action>,
    /// Campaign the outstanding contact-all was issued under
    contact_campaign: Option<CampaignId>,
}

impl WorkflowState {
    /// Fresh session at the `company` step with an empty model
    pub fn new(search: SearchParameters, outreach: OutreachPolicy) -> Self {
        Self {
            step: Step::Company,
            company_form: CompanyForm::default(),
            product_form: ProductForm::default(),
            company: None,
            product: None,
            search,
            matches: Vec::new(),
            campaign: None,
            outreach,
            notice: None,
            in_flight: HashSet::new(),
            contact_campaign: None,
        }
    }

    pub fn is_in_flight(&self, action: Action) -> bool {
        self.in_flight.contains(&action)
    }

    /// Whether the triggering control for `action` should be enabled
    pub fn can_trigger(&self, action: Action) -> bool {
        self.step == action.step() && !self.is_in_flight(action)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn find_match(&self, match_id: MatchId) -> Option<&InfluencerMatch> {
        self.matches.iter().find(|m| m.match_id == match_id)
    }

    /// Campaign that contact-all is issued under
    pub fn campaign_ref(&self) -> CampaignId {
        self.campaign
            .as_ref()
            .map(|c| c.id)
            .unwrap_or(self.outreach.default_campaign_id)
    }

    pub(crate) fn mark_in_flight(&mut self, action: Action) -> bool {
        self.in_flight.insert(action)
    }

    pub(crate) fn clear_in_flight(&mut self, action: Action) -> bool {
        if action == Action::ContactAll {
            self.contact_campaign = None;
        }
        self.in_flight.remove(&action)
    }

    /// Campaign of the outstanding contact-all, if one is in flight
    pub fn contact_campaign(&self) -> Option<CampaignId> {
        self.contact_campaign
    }

    pub(crate) fn set_contact_campaign(&mut self, campaign_id: CampaignId) {
        self.contact_campaign = Some(campaign_id);
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(SearchParameters::default(), OutreachPolicy::default())
    }
}
