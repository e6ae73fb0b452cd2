use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{RequestStatus, Role};
use crate::money::Money;

// -- Helpers --

/// Binary media travels as standard base64 in JSON bodies.
fn serialize_media<S: Serializer>(media: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as B64;

    match media {
        Some(bytes) => s.serialize_some(&B64.encode(bytes)),
        None => s.serialize_none(),
    }
}

// -- Users --

/// The fields of a user that are safe to show to other users.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(serialize_with = "serialize_media")]
    pub picture: Option<Vec<u8>>,
}

// -- Creator requests --

#[derive(Debug, Clone, Serialize)]
pub struct CreatorRequestView {
    pub id: i64,
    pub status: RequestStatus,
    pub campaign_creator: UserPublic,
    pub created_at: DateTime<Utc>,
}

// -- Campaigns --

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub goal: Money,
    pub end_date: NaiveDate,
    #[serde(serialize_with = "serialize_media")]
    pub media: Option<Vec<u8>>,
    pub creator: UserPublic,
}

/// One page of publicly visible campaigns.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignPage {
    pub campaigns: Vec<CampaignSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorContribution {
    pub id: i64,
    pub username: String,
    #[serde(serialize_with = "serialize_media")]
    pub picture: Option<Vec<u8>>,
    pub amount_donated: Money,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub summary: CampaignSummary,
    pub iban: String,
    pub status: RequestStatus,
    pub validator_id: Option<i64>,
    pub total_donated: Money,
    pub updates: Vec<CampaignUpdateView>,
    pub top_donors: Vec<DonorContribution>,
    pub latest_donors: Vec<DonorContribution>,
}

/// A campaign as its creator sees it in their dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedCampaign {
    pub id: i64,
    pub title: String,
    pub goal: Money,
    pub total_donated: Money,
    pub status: RequestStatus,
}

/// A campaign together with its approval request, for administrator review.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignReview {
    pub campaign_request_id: i64,
    pub status: RequestStatus,
    pub validator_id: Option<i64>,
    pub iban: String,
    pub campaign: CampaignSummary,
}

/// Fields submitted to create a campaign, already validated.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub goal: Money,
    pub end_date: NaiveDate,
    pub iban: String,
    pub media: Option<Vec<u8>>,
}

// -- Updates --

#[derive(Debug, Clone, Serialize)]
pub struct CampaignUpdateView {
    pub id: i64,
    pub campaign_id: i64,
    pub content: String,
    #[serde(serialize_with = "serialize_media")]
    pub media: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
}

// -- Donations --

#[derive(Debug, Clone, Serialize)]
pub struct DonationView {
    pub id: i64,
    pub campaign_id: i64,
    pub donor_id: i64,
    pub value: Money,
    pub created_at: DateTime<Utc>,
}

// -- Reports --

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub id: i64,
    pub description: String,
    pub campaign_id: i64,
    pub campaign_title: Option<String>,
    pub reporter: Option<UserPublic>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDetail {
    pub id: i64,
    pub description: String,
    pub campaign: CampaignSummary,
    pub reporter: Option<UserPublic>,
    pub created_at: DateTime<Utc>,
}

// -- Generic bodies --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
