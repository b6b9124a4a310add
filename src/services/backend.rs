use crate::models::{
    Campaign, CampaignId, Company, CompanyId, CompanyScope, CreateCampaignRequest,
    CreateCompanyRequest, CreateProductRequest, ErrorResponse, InfluencerMatch, MatchId,
    MessageResponse, Product, SearchInfluencersRequest,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the matching backend
///
/// Every variant is a transport failure from the workflow's point of view:
/// the status code is kept for logging but never branched on.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Operations the workflow needs from the backend
///
/// Results are taken as authoritative: implementations must not re-sort,
/// filter or retry.
pub trait Gateway {
    fn create_company(
        &self,
        request: &CreateCompanyRequest,
    ) -> impl Future<Output = Result<Company, BackendError>> + Send;

    fn create_product(
        &self,
        company_id: CompanyId,
        request: &CreateProductRequest,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send;

    fn search_influencers(
        &self,
        request: &SearchInfluencersRequest,
    ) -> impl Future<Output = Result<Vec<InfluencerMatch>, BackendError>> + Send;

    fn approve_match(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn contact_influencers(
        &self,
        campaign_id: CampaignId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    fn create_campaign(
        &self,
        company_id: CompanyId,
        request: &CreateCampaignRequest,
    ) -> impl Future<Output = Result<Campaign, BackendError>> + Send;
}

/// HTTP client for the matching/outreach backend
///
/// All paths are joined onto `base_url`, which includes any API prefix
/// (e.g. `http://localhost:8000/api`).
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        self.client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Fetch a company by id
    pub async fn get_company(&self, company_id: CompanyId) -> Result<Company, BackendError> {
        let url = self.url(&format!("/companies/{}", company_id));
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        parse_json(response, "company").await
    }

    /// List the products registered under a company
    pub async fn list_products(&self, company_id: CompanyId) -> Result<Vec<Product>, BackendError> {
        let url = self.url(&format!("/companies/{}/products", company_id));
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        parse_json(response, "product list").await
    }
}

impl Gateway for BackendClient {
    async fn create_company(&self, request: &CreateCompanyRequest) -> Result<Company, BackendError> {
        let response = self.post("/companies/").json(request).send().await?;
        let company: Company = parse_json(response, "company").await?;

        tracing::debug!("Created company {} ({})", company.id, company.name);
        Ok(company)
    }

    async fn create_product(
        &self,
        company_id: CompanyId,
        request: &CreateProductRequest,
    ) -> Result<Product, BackendError> {
        let response = self
            .post("/products/")
            .query(&CompanyScope { company_id })
            .json(request)
            .send()
            .await?;
        let product: Product = parse_json(response, "product").await?;

        tracing::debug!("Created product {} for company {}", product.id, company_id);
        Ok(product)
    }

    async fn search_influencers(
        &self,
        request: &SearchInfluencersRequest,
    ) -> Result<Vec<InfluencerMatch>, BackendError> {
        let response = self
            .post("/influencers/search")
            .json(request)
            .send()
            .await?;
        let matches: Vec<InfluencerMatch> = parse_json(response, "influencer matches").await?;

        tracing::debug!(
            "Search for product {} returned {} matches",
            request.product_id,
            matches.len()
        );
        Ok(matches)
    }

    async fn approve_match(&self, match_id: MatchId) -> Result<(), BackendError> {
        let response = self
            .post(&format!("/influencers/{}/approve", match_id))
            .send()
            .await?;
        let ack: MessageResponse = parse_json(response, "approval").await?;

        tracing::debug!("Approved match {}: {:?}", match_id, ack.message);
        Ok(())
    }

    async fn contact_influencers(&self, campaign_id: CampaignId) -> Result<(), BackendError> {
        let response = self
            .post(&format!("/campaigns/{}/contact-influencers", campaign_id))
            .send()
            .await?;
        let ack: MessageResponse = parse_json(response, "outreach").await?;

        tracing::debug!("Outreach for campaign {}: {:?}", campaign_id, ack.message);
        Ok(())
    }

    async fn create_campaign(
        &self,
        company_id: CompanyId,
        request: &CreateCampaignRequest,
    ) -> Result<Campaign, BackendError> {
        let response = self
            .post("/campaigns/")
            .query(&CompanyScope { company_id })
            .json(request)
            .send()
            .await?;
        parse_json(response, "campaign").await
    }
}

/// Map a non-success status to `BackendError::Status`, otherwise parse the body as `T`
async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.detail_text())
            .unwrap_or(body);
        tracing::warn!("Backend rejected {} request: {} - {}", context, status, detail);
        return Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse {}: {}", context, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_client_creation() {
        let client = BackendClient::new("http://localhost:8000/api/", 30).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/");
        assert_eq!(
            client.url("/companies/"),
            "http://localhost:8000/api/companies/"
        );
    }

    #[test]
    fn test_status_error_message_carries_detail() {
        let err = BackendError::Status {
            status: 400,
            detail: "Company with this email already exists".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 400: Company with this email already exists"
        );
    }
}
