//! Role-gated workflows of the crowdfunding service.
//!
//! Every operation takes the acting [`Principal`](fundwell_types::Principal)
//! explicitly and talks to the database through [`fundwell_db::Database`].

pub mod error;
pub mod password;
pub mod services;

use std::sync::Arc;

use fundwell_db::Database;

pub use error::{WorkflowError, WorkflowResult};
pub use password::{Argon2Scheme, PasswordScheme};
pub use services::Landing;
pub use services::campaigns::CampaignService;
pub use services::creator_requests::CreatorRequestService;
pub use services::donations::DonationService;
pub use services::identity::IdentityService;
pub use services::reports::ReportService;
pub use services::updates::UpdateService;

/// One handle per workflow, all sharing a database.
#[derive(Clone)]
pub struct Workflows {
    pub identity: IdentityService,
    pub creator_requests: CreatorRequestService,
    pub campaigns: CampaignService,
    pub donations: DonationService,
    pub updates: UpdateService,
    pub reports: ReportService,
}

impl Workflows {
    pub fn new(db: Arc<Database>, passwords: Arc<dyn PasswordScheme>) -> Self {
        Self {
            identity: IdentityService::new(db.clone(), passwords),
            creator_requests: CreatorRequestService::new(db.clone()),
            campaigns: CampaignService::new(db.clone()),
            donations: DonationService::new(db.clone()),
            updates: UpdateService::new(db.clone()),
            reports: ReportService::new(db),
        }
    }
}
