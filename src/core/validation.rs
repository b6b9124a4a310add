//! Client-side validation, run before any request is built

use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{CampaignForm, CompanyForm, ProductForm, SearchParameters};

/// Trim and validate the company form; name and email are required
pub fn validate_company_form(form: &CompanyForm) -> Result<CompanyForm, ValidationErrors> {
    let form = form.normalized();
    form.validate()?;
    Ok(form)
}

/// Trim and validate the product form; name and description are required
pub fn validate_product_form(form: &ProductForm) -> Result<ProductForm, ValidationErrors> {
    let form = form.normalized();
    form.validate()?;
    Ok(form)
}

/// Check `max_results` in [1, 50] and `min_fit_score` in [0.0, 1.0]
pub fn validate_search(params: &SearchParameters) -> Result<SearchParameters, ValidationErrors> {
    let mut errors = match params.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    // NaN slips through range comparisons
    if !params.min_fit_score.is_finite() && !errors.field_errors().contains_key("min_fit_score") {
        errors.add("min_fit_score", error("not_finite", "min_fit_score must be a number"));
    }

    if errors.errors().is_empty() {
        Ok(*params)
    } else {
        Err(errors)
    }
}

pub fn validate_campaign_form(form: &CampaignForm) -> Result<CampaignForm, ValidationErrors> {
    let form = form.normalized();
    let mut errors = match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if !form.target_fit_score.is_finite()
        && !errors.field_errors().contains_key("target_fit_score")
    {
        errors.add(
            "target_fit_score",
            error("not_finite", "target_fit_score must be a number"),
        );
    }

    if errors.errors().is_empty() {
        Ok(form)
    } else {
        Err(errors)
    }
}

/// Contact-all refused because the policy selects no match
pub fn no_outreach_targets() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        "matches",
        error("no_targets", "no matches are eligible for outreach"),
    );
    errors
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
