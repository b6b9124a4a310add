// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Campaign, CampaignId, CampaignStatus, Company, CompanyId, InfluencerMatch, MatchId,
    MatchStatus, PriceRange, Product, ProductCategory, ProductId, SearchParameters,
};
pub use requests::{
    CampaignForm, CompanyForm, CompanyScope, CreateCampaignRequest, CreateCompanyRequest,
    CreateProductRequest, ProductForm, SearchInfluencersRequest,
};
pub use responses::{ErrorResponse, MessageResponse};
