use creator_discovery::config::Settings;
use creator_discovery::core::{Intent, Session, WorkflowError};
use creator_discovery::models::{
    CampaignForm, CompanyForm, MatchId, MatchStatus, ProductForm, SearchParameters,
};
use creator_discovery::services::BackendClient;
use serde::Deserialize;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Scripted session: the inputs a user would enter at each step
#[derive(Debug, Deserialize)]
struct SessionPlan {
    company: CompanyForm,
    product: ProductForm,
    search: Option<SearchParameters>,
    campaign: Option<CampaignForm>,
    #[serde(default)]
    outreach: PlanOutreach,
}

#[derive(Debug, Default, Deserialize)]
struct PlanOutreach {
    /// Match ids to approve
    #[serde(default)]
    approve: Vec<MatchId>,
    /// Approve the first N pending matches of the result set
    #[serde(default)]
    approve_top: usize,
    #[serde(default)]
    contact_all: bool,
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn exit_code(err: &WorkflowError) -> ExitCode {
    if err.is_defect() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn load_plan(path: &str) -> Result<SessionPlan, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read session plan {}: {}", path, e))?;
    toml::from_str(&raw).map_err(|e| format!("Invalid session plan {}: {}", path, e))
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(1);
        }
    };

    init_logging(&settings);

    let Some(plan_path) = std::env::args().nth(1) else {
        error!("Usage: creator-discovery <session-plan.toml>");
        return ExitCode::from(1);
    };

    let plan = match load_plan(&plan_path) {
        Ok(plan) => plan,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(1);
        }
    };

    let client = match BackendClient::new(settings.backend.base_url.clone(), settings.timeout_secs()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create backend client: {}", e);
            return ExitCode::from(1);
        }
    };

    info!("Backend client initialized for {}", client.base_url());

    let mut session = Session::new(client, settings.initial_state());
    info!("Session {} started", session.id());

    match run_plan(&mut session, plan).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(notice) = &session.state().notice {
                warn!("{}", notice.message);
            }
            error!("Session stopped at step {}: {}", session.state().step, e);
            exit_code(&e)
        }
    }
}

async fn run_plan(
    session: &mut Session<BackendClient>,
    plan: SessionPlan,
) -> Result<(), WorkflowError> {
    let state = session.dispatch(Intent::SubmitCompany(plan.company)).await?;
    if let Some(company) = &state.company {
        info!(
            "Brand summary for {}: {} (keywords: {:?})",
            company.name,
            company.brand_summary.as_deref().unwrap_or("n/a"),
            company.brand_keywords
        );
    }

    let state = session.dispatch(Intent::SubmitProduct(plan.product)).await?;
    if let Some(company_id) = state.company.as_ref().map(|c| c.id) {
        match session.gateway().list_products(company_id).await {
            Ok(products) => info!("Company {} now has {} products", company_id, products.len()),
            Err(e) => warn!("Could not list products for company {}: {}", company_id, e),
        }
    }

    let params = plan.search.unwrap_or(session.state().search);
    let state = session.dispatch(Intent::SubmitSearch(params)).await?;
    for m in &state.matches {
        info!(
            "#{} {} fit={:.2} subscribers={} price=${:.0} [{}]",
            m.match_id, m.name, m.fit_score, m.subscriber_count, m.price_estimate, m.status
        );
    }

    let mut approvals = plan.outreach.approve.clone();
    approvals.extend(
        state
            .matches
            .iter()
            .filter(|m| m.status == MatchStatus::Pending)
            .take(plan.outreach.approve_top)
            .map(|m| m.match_id)
            .filter(|id| !plan.outreach.approve.contains(id)),
    );

    for match_id in approvals {
        match session.dispatch(Intent::Approve(match_id)).await {
            Ok(_) => {}
            // A failed or refused approval does not stop the rest of the plan
            Err(e @ WorkflowError::Transport(_)) | Err(e @ WorkflowError::Validation(_)) => {
                warn!("Approval of match {} not applied: {}", match_id, e);
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(form) = plan.campaign {
        session.dispatch(Intent::OpenCampaign(form)).await?;
    }

    if plan.outreach.contact_all {
        let state = session.dispatch(Intent::ContactAll).await?;
        if let Some(notice) = &state.notice {
            info!("{}", notice.message);
        }
    }

    Ok(())
}
