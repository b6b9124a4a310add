use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{
    default_target_fit_score, default_true, CompanyId, PriceRange, ProductCategory, ProductId,
};

/// Company registration form as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CompanyForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
}

impl CompanyForm {
    /// Trim every field; a blank website becomes `None`
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            website: trimmed_option(&self.website),
        }
    }
}

/// Product form as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
}

impl ProductForm {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            price_range: self.price_range,
        }
    }
}

/// Campaign form used to open the outreach campaign for the active product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CampaignForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub budget: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_target_fit_score")]
    pub target_fit_score: f64,
    #[serde(default = "default_true")]
    pub auto_contact: bool,
}

impl CampaignForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            budget: None,
            target_fit_score: default_target_fit_score(),
            auto_contact: true,
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: trimmed_option(&self.description),
            ..self.clone()
        }
    }
}

/// Body of `POST /companies/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub email: String,
    pub website: Option<String>,
}

impl From<CompanyForm> for CreateCompanyRequest {
    fn from(form: CompanyForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            website: form.website,
        }
    }
}

/// Body of `POST /products/?company_id={id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub category: Option<ProductCategory>,
    pub price_range: Option<PriceRange>,
}

impl From<ProductForm> for CreateProductRequest {
    fn from(form: ProductForm) -> Self {
        Self {
            name: form.name,
            description: form.description,
            category: form.category,
            price_range: form.price_range,
        }
    }
}

/// Body of `POST /influencers/search`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchInfluencersRequest {
    pub product_id: ProductId,
    pub max_results: i64,
    pub min_fit_score: f64,
}

/// Body of `POST /campaigns/?company_id={id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub target_fit_score: f64,
    pub auto_contact: bool,
}

impl CreateCampaignRequest {
    pub fn from_form(product_id: ProductId, form: CampaignForm) -> Self {
        Self {
            product_id,
            name: form.name,
            description: form.description,
            budget: form.budget,
            target_fit_score: form.target_fit_score,
            auto_contact: form.auto_contact,
        }
    }
}

/// Query string shared by the company-scoped create endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompanyScope {
    pub company_id: CompanyId,
}

fn trimmed_option(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
