use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

pub type CompanyId = i64;
pub type ProductId = i64;
pub type MatchId = i64;
pub type CampaignId = i64;

/// Registered company, with the brand analysis the backend derived from its website
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub brand_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand_keywords: Vec<String>,
}

/// Product owned by a company; the subject of an influencer search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<ProductCategory>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub price_range: Option<PriceRange>,
    /// Absent on list responses, which are already scoped to one company
    #[serde(default)]
    pub company_id: Option<CompanyId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Technology,
    #[serde(rename = "Beauty & Fashion")]
    BeautyFashion,
    Gaming,
    Lifestyle,
    #[serde(rename = "Food & Cooking")]
    FoodCooking,
    #[serde(rename = "Health & Fitness")]
    HealthFitness,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Technology,
        ProductCategory::BeautyFashion,
        ProductCategory::Gaming,
        ProductCategory::Lifestyle,
        ProductCategory::FoodCooking,
        ProductCategory::HealthFitness,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Technology => "Technology",
            ProductCategory::BeautyFashion => "Beauty & Fashion",
            ProductCategory::Gaming => "Gaming",
            ProductCategory::Lifestyle => "Lifestyle",
            ProductCategory::FoodCooking => "Food & Cooking",
            ProductCategory::HealthFitness => "Health & Fitness",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown product category: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "Under $25")]
    Under25,
    #[serde(rename = "$25-$50")]
    From25To50,
    #[serde(rename = "$50-$100")]
    From50To100,
    #[serde(rename = "$100-$250")]
    From100To250,
    #[serde(rename = "$250+")]
    Over250,
}

impl PriceRange {
    pub const ALL: [PriceRange; 5] = [
        PriceRange::Under25,
        PriceRange::From25To50,
        PriceRange::From50To100,
        PriceRange::From100To250,
        PriceRange::Over250,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Under25 => "Under $25",
            PriceRange::From25To50 => "$25-$50",
            PriceRange::From50To100 => "$50-$100",
            PriceRange::From100To250 => "$100-$250",
            PriceRange::Over250 => "$250+",
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown price range: {}", s))
    }
}

/// Outreach status of a match. Declaration order is the only legal direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Approved,
    Contacted,
}

impl MatchStatus {
    /// Whether moving from `self` to `next` goes strictly forward
    pub fn can_advance_to(self, next: MatchStatus) -> bool {
        next > self
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Approved => "approved",
            MatchStatus::Contacted => "contacted",
        };
        f.write_str(s)
    }
}

/// An influencer matched against one product search
///
/// `id` identifies the influencer, `match_id` the match record the backend
/// created for this product. Approval and outreach address the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerMatch {
    pub id: i64,
    pub match_id: MatchId,
    pub name: String,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub subscriber_count: u64,
    #[serde(default)]
    pub avg_views: u64,
    #[serde(default)]
    pub engagement_rate: f64,
    pub fit_score: f64,
    pub price_estimate: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content_categories: Vec<String>,
    pub status: MatchStatus,
}

/// Search configuration, checked locally before a search request is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchParameters {
    #[validate(range(min = 1, max = 50))]
    pub max_results: i64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_fit_score: f64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            max_results: 20,
            min_fit_score: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

/// Backend-side grouping under which outreach is sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default = "default_target_fit_score")]
    pub target_fit_score: f64,
    #[serde(default = "default_true")]
    pub auto_contact: bool,
    #[serde(default = "default_campaign_status")]
    pub status: CampaignStatus,
}

pub(crate) fn default_target_fit_score() -> f64 { 0.7 }
pub(crate) fn default_true() -> bool { true }
fn default_campaign_status() -> CampaignStatus { CampaignStatus::Active }

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend stores category and price range as free strings, with "" for "not chosen"
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
