// Unit tests for Creator Discovery

use creator_discovery::core::{
    begin, is_final_step, next_step, resolve, step_index, Action, Command, ContactPolicy, Intent,
    OutreachPolicy, Reply, Request, Response, Step, TransportFailure, WorkflowError,
    WorkflowState, WORKFLOW_STEPS,
};
use creator_discovery::models::{
    Company, CompanyForm, InfluencerMatch, MatchId, MatchStatus, Product, ProductForm,
    SearchParameters,
};

fn company() -> Company {
    Company {
        id: 1,
        name: "Acme".to_string(),
        email: "a@acme.com".to_string(),
        website: None,
        brand_summary: Some("Home office gadgets".to_string()),
        brand_keywords: vec!["gadgets".to_string()],
    }
}

fn product() -> Product {
    Product {
        id: 5,
        name: "Widget".to_string(),
        description: Some("A widget".to_string()),
        category: None,
        price_range: None,
        company_id: Some(1),
    }
}

fn candidate(match_id: MatchId, fit_score: f64, status: MatchStatus) -> InfluencerMatch {
    InfluencerMatch {
        id: 1000 + match_id,
        match_id,
        name: format!("Creator {}", match_id),
        channel_title: None,
        subscriber_count: 10_000 * match_id as u64,
        avg_views: 1_500,
        engagement_rate: 0.04,
        fit_score,
        price_estimate: 120.0,
        content_categories: vec!["tech".to_string()],
        status,
    }
}

fn company_form() -> CompanyForm {
    CompanyForm {
        name: "Acme".to_string(),
        email: "a@acme.com".to_string(),
        website: None,
    }
}

fn product_form() -> ProductForm {
    ProductForm {
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        ..Default::default()
    }
}

fn succeed(state: &WorkflowState, intent: Intent, reply: Reply) -> WorkflowState {
    let transition = begin(state, intent).unwrap();
    let action = transition.command.action();
    resolve(&transition.state, Response::new(action, Request::Succeeded(reply))).unwrap()
}

fn fail(state: &WorkflowState, intent: Intent) -> WorkflowState {
    let transition = begin(state, intent).unwrap();
    let action = transition.command.action();
    let failure = TransportFailure {
        status: Some(500),
        message: "Internal Server Error".to_string(),
    };
    resolve(&transition.state, Response::new(action, Request::Failed(failure))).unwrap()
}

fn at_search(outreach: OutreachPolicy) -> WorkflowState {
    let state = WorkflowState::new(SearchParameters::default(), outreach);
    let state = succeed(&state, Intent::SubmitCompany(company_form()), Reply::Company(company()));
    succeed(&state, Intent::SubmitProduct(product_form()), Reply::Product(product()))
}

fn at_results(matches: Vec<InfluencerMatch>) -> WorkflowState {
    let state = at_search(OutreachPolicy::default());
    succeed(
        &state,
        Intent::SubmitSearch(SearchParameters::default()),
        Reply::Matches(matches),
    )
}

#[test]
fn test_step_order() {
    assert_eq!(
        WORKFLOW_STEPS,
        [Step::Company, Step::Product, Step::Search, Step::Results]
    );
    for (index, step) in WORKFLOW_STEPS.iter().enumerate() {
        assert_eq!(step_index(*step), index);
    }
    assert_eq!(next_step(Step::Search), Some(Step::Results));
    assert_eq!(next_step(Step::Results), None);
    assert!(is_final_step(Step::Results));
}

#[test]
fn test_step_only_advances_on_success() {
    let state = WorkflowState::default();
    let failed = fail(&state, Intent::SubmitCompany(company_form()));
    assert_eq!(failed.step, Step::Company);

    let state = at_search(OutreachPolicy::default());
    let failed = fail(&state, Intent::SubmitSearch(SearchParameters::default()));
    assert_eq!(failed.step, Step::Search);
    assert!(failed.matches.is_empty());
}

#[test]
fn test_product_step_holds_until_product_is_created() {
    let state = succeed(
        &WorkflowState::default(),
        Intent::SubmitCompany(company_form()),
        Reply::Company(company()),
    );

    let failed = fail(&state, Intent::SubmitProduct(product_form()));
    assert_eq!(failed.step, Step::Product);
    assert!(failed.product.is_none());
    assert_eq!(failed.product_form, product_form());
    assert!(failed.can_trigger(Action::CreateProduct));

    let blank_description = ProductForm {
        description: "   ".to_string(),
        ..product_form()
    };
    match begin(&failed, Intent::SubmitProduct(blank_description)) {
        Err(WorkflowError::Validation(errors)) => {
            assert!(errors.field_errors().contains_key("description"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|t| t.command)),
    }
    assert_eq!(failed.step, Step::Product);
    assert!(!failed.is_in_flight(Action::CreateProduct));

    let retried = succeed(&failed, Intent::SubmitProduct(product_form()), Reply::Product(product()));
    assert_eq!(retried.step, Step::Search);
    assert_eq!(retried.product_form, ProductForm::default());
}

#[test]
fn test_active_entities_present_at_later_steps() {
    let state = at_search(OutreachPolicy::default());
    assert!(state.company.is_some());
    assert!(state.product.is_some());
    assert_eq!(state.product.as_ref().unwrap().company_id, Some(state.company.as_ref().unwrap().id));
}

#[test]
fn test_search_request_carries_active_product() {
    let state = at_search(OutreachPolicy::default());
    let params = SearchParameters {
        max_results: 10,
        min_fit_score: 0.5,
    };
    let transition = begin(&state, Intent::SubmitSearch(params)).unwrap();

    match transition.command {
        Command::Search(request) => {
            assert_eq!(request.product_id, 5);
            assert_eq!(request.max_results, 10);
            assert_eq!(request.min_fit_score, 0.5);
        }
        other => panic!("expected search command, got {:?}", other),
    }
    assert_eq!(transition.state.search, params);
}

#[test]
fn test_search_boundaries() {
    let state = at_search(OutreachPolicy::default());

    for (max_results, min_fit_score) in [(1, 0.0), (50, 1.0)] {
        let params = SearchParameters { max_results, min_fit_score };
        assert!(begin(&state, Intent::SubmitSearch(params)).is_ok());
    }

    for (max_results, min_fit_score) in [(0, 0.3), (51, 0.3), (20, -0.01), (20, 1.01), (20, f64::NAN)] {
        let params = SearchParameters { max_results, min_fit_score };
        let err = begin(&state, Intent::SubmitSearch(params)).unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
    }
}

#[test]
fn test_results_preserve_service_order() {
    let matches = vec![
        candidate(3, 0.41, MatchStatus::Pending),
        candidate(1, 0.93, MatchStatus::Pending),
        candidate(2, 0.67, MatchStatus::Approved),
    ];
    let state = at_results(matches.clone());
    assert_eq!(state.step, Step::Results);
    assert_eq!(state.matches, matches);
}

#[test]
fn test_approval_is_monotonic() {
    let state = at_results(vec![
        candidate(1, 0.9, MatchStatus::Pending),
        candidate(2, 0.8, MatchStatus::Contacted),
    ]);

    let approved = succeed(&state, Intent::Approve(1), Reply::Acknowledged);
    assert_eq!(approved.find_match(1).unwrap().status, MatchStatus::Approved);

    // Neither an approved nor a contacted match can be approved again
    for match_id in [1, 2] {
        match begin(&approved, Intent::Approve(match_id)) {
            Err(WorkflowError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("status"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|t| t.command)),
        }
    }
}

#[test]
fn test_failed_approval_leaves_status_and_frees_slot() {
    let state = at_results(vec![candidate(4, 0.7, MatchStatus::Pending)]);
    let next = fail(&state, Intent::Approve(4));

    assert_eq!(next.find_match(4).unwrap().status, MatchStatus::Pending);
    assert!(next.can_trigger(Action::Approve(4)));
    assert!(next.notice.as_ref().unwrap().message.contains("approve match 4"));
}

#[test]
fn test_in_flight_slots_are_independent() {
    let state = at_results(vec![
        candidate(1, 0.9, MatchStatus::Pending),
        candidate(2, 0.8, MatchStatus::Pending),
    ]);
    let approving = begin(&state, Intent::Approve(1)).unwrap().state;

    assert!(!approving.can_trigger(Action::Approve(1)));
    assert!(approving.can_trigger(Action::Approve(2)));
    assert!(approving.can_trigger(Action::ContactAll));

    let contacting = begin(&approving, Intent::ContactAll).unwrap().state;
    assert_eq!(contacting.in_flight_count(), 2);
    assert!(matches!(
        begin(&contacting, Intent::ContactAll),
        Err(WorkflowError::InFlight(Action::ContactAll))
    ));
}

#[test]
fn test_contact_all_keeps_numeric_fields() {
    let matches = vec![
        candidate(1, 0.9, MatchStatus::Approved),
        candidate(2, 0.4, MatchStatus::Pending),
    ];
    let state = at_results(matches.clone());
    let next = succeed(&state, Intent::ContactAll, Reply::Acknowledged);

    assert_eq!(next.matches, matches);
    assert_eq!(next.step, Step::Results);
}

#[test]
fn test_contact_all_can_mark_targets_contacted() {
    let outreach = OutreachPolicy {
        policy: ContactPolicy::ApprovedOnly,
        mark_contacted: true,
        default_campaign_id: 9,
        require_targets: false,
    };
    let state = at_search(outreach);
    let state = succeed(
        &state,
        Intent::SubmitSearch(SearchParameters::default()),
        Reply::Matches(vec![
            candidate(1, 0.9, MatchStatus::Approved),
            candidate(2, 0.4, MatchStatus::Pending),
        ]),
    );

    let transition = begin(&state, Intent::ContactAll).unwrap();
    assert_eq!(transition.command, Command::ContactAll(9));

    let next = resolve(
        &transition.state,
        Response::new(Action::ContactAll, Request::Succeeded(Reply::Acknowledged)),
    )
    .unwrap();
    assert_eq!(next.find_match(1).unwrap().status, MatchStatus::Contacted);
    assert_eq!(next.find_match(2).unwrap().status, MatchStatus::Pending);
    assert_eq!(next.find_match(1).unwrap().fit_score, 0.9);
}

#[test]
fn test_empty_result_set_can_still_be_contacted() {
    // The backend selects outreach targets from its own records
    let state = at_results(vec![]);
    assert_eq!(state.step, Step::Results);

    let transition = begin(&state, Intent::ContactAll).unwrap();
    assert_eq!(transition.command, Command::ContactAll(1));

    let contacted = at_results(vec![candidate(1, 0.9, MatchStatus::Contacted)]);
    assert!(begin(&contacted, Intent::ContactAll).is_ok());
}

#[test]
fn test_required_targets_refuse_empty_result_set() {
    let outreach = OutreachPolicy {
        require_targets: true,
        ..OutreachPolicy::default()
    };
    let state = at_search(outreach);
    let state = succeed(
        &state,
        Intent::SubmitSearch(SearchParameters::default()),
        Reply::Matches(vec![]),
    );

    assert_eq!(begin(&state, Intent::ContactAll).unwrap_err().code(), "VALIDATION");
}

#[test]
fn test_refused_intent_leaves_state_untouched() {
    let state = WorkflowState::default();
    let err = begin(
        &state,
        Intent::SubmitCompany(CompanyForm {
            name: "   ".to_string(),
            email: "a@acme.com".to_string(),
            website: None,
        }),
    )
    .unwrap_err();

    assert_eq!(err.code(), "VALIDATION");
    assert_eq!(state.in_flight_count(), 0);
    assert!(state.notice.is_none());
}

#[test]
fn test_out_of_step_intents_are_defects() {
    let state = WorkflowState::default();
    for intent in [
        Intent::SubmitProduct(product_form()),
        Intent::SubmitSearch(SearchParameters::default()),
        Intent::Approve(1),
        Intent::ContactAll,
    ] {
        let err = begin(&state, intent).unwrap_err();
        assert!(err.is_defect());
        assert_eq!(err.code(), "INVARIANT");
    }
}

#[test]
fn test_success_clears_previous_error_notice() {
    let state = WorkflowState::default();
    let failed = fail(&state, Intent::SubmitCompany(company_form()));
    assert!(failed.notice.is_some());

    let next = succeed(&failed, Intent::SubmitCompany(company_form()), Reply::Company(company()));
    assert!(next.notice.is_none());
    assert_eq!(next.step, Step::Product);
}
