//! Accounts, credentials and the login routing of campaign creators.

use std::sync::Arc;

use tracing::{info, warn};

use fundwell_db::Database;
use fundwell_db::models::UserRow;
use fundwell_types::api::UserPublic;
use fundwell_types::{Principal, RequestStatus, Role};

use super::{LOGIN_REQUIRED, Landing, ROOT_ONLY, parse_role, parse_status, require};
use crate::error::{WorkflowError, WorkflowResult};
use crate::password::PasswordScheme;

/// Registration form fields as submitted.
#[derive(Debug, Default, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: String,
    pub identification_document: Option<Vec<u8>>,
}

#[derive(Debug, Default, Clone)]
pub struct ProfileChange {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub picture: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Start a session for `principal` and send them to `landing`.
    Admitted { principal: Principal, landing: Landing },
    /// No session; show `message` on the login page.
    Blocked { message: String },
}

impl LoginOutcome {
    fn blocked(message: impl Into<String>) -> Self {
        Self::Blocked {
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct IdentityService {
    db: Arc<Database>,
    passwords: Arc<dyn PasswordScheme>,
}

impl IdentityService {
    pub fn new(db: Arc<Database>, passwords: Arc<dyn PasswordScheme>) -> Self {
        Self { db, passwords }
    }

    /// Exact username lookup plus credential check. Unknown user and wrong
    /// password are indistinguishable.
    pub fn authenticate(&self, username: &str, password: &str) -> WorkflowResult<Principal> {
        let user = self
            .db
            .get_user_by_username(username)?
            .filter(|user| self.passwords.verify(password, &user.password))
            .ok_or_else(|| WorkflowError::not_found("User not found."))?;

        Ok(Principal {
            role: parse_role(&user.role)?,
            id: user.id,
            username: user.username,
        })
    }

    /// Public sign-up for donors and campaign creators. A campaign creator
    /// must supply an identification document and starts out pending.
    pub fn register(&self, form: Registration) -> WorkflowResult<i64> {
        if form.username.trim().is_empty()
            || form.password.is_empty()
            || form.password_confirmation.is_empty()
            || form.role.is_empty()
        {
            return Err(WorkflowError::validation("Empty fields."));
        }
        if form.password != form.password_confirmation {
            return Err(WorkflowError::validation("Different passwords."));
        }

        let role = match form.role.parse::<Role>() {
            Ok(role @ (Role::Donor | Role::CampaignCreator)) => role,
            _ => return Err(WorkflowError::validation("Invalid role.")),
        };

        self.ensure_username_free(&form.username, "Username already taken.")?;

        let hash = self.passwords.hash(&form.password)?;
        let user_id = match role {
            Role::CampaignCreator => {
                let document = form
                    .identification_document
                    .filter(|doc| !doc.is_empty())
                    .ok_or_else(|| WorkflowError::validation("No file uploaded."))?;
                let (user_id, request_id) =
                    self.db
                        .register_campaign_creator(&form.username, &hash, &document)?;
                info!(
                    "Registered campaign creator {} ({}) with request {}",
                    form.username, user_id, request_id
                );
                user_id
            }
            _ => {
                let user_id = self.db.create_user(&form.username, &hash, role)?;
                info!("Registered {} {} ({})", role, form.username, user_id);
                user_id
            }
        };

        Ok(user_id)
    }

    /// Authenticate and decide where the user may go. Campaign creators are
    /// admitted only once their request is approved; a rejected creator's
    /// account is destroyed on this attempt.
    pub fn login(&self, username: &str, password: &str) -> WorkflowResult<LoginOutcome> {
        let user = match self.db.get_user_by_username(username)? {
            Some(user) if self.passwords.verify(password, &user.password) => user,
            _ => return Ok(LoginOutcome::blocked("User not found.")),
        };

        let role = match parse_role(&user.role) {
            Ok(role) => role,
            Err(_) => {
                warn!("User {} has unknown role {}", user.id, user.role);
                return Ok(LoginOutcome::blocked(format!(
                    "User does not have a valid role ({}). Contact us to fix your problem.",
                    user.role
                )));
            }
        };

        let landing = match role {
            Role::Donor => Landing::Campaigns,
            Role::Administrator | Role::RootAdministrator => Landing::CampaignReviews,
            Role::CampaignCreator => match self.creator_gate(&user)? {
                Ok(landing) => landing,
                Err(blocked) => return Ok(blocked),
            },
        };

        Ok(LoginOutcome::Admitted {
            principal: Principal {
                id: user.id,
                username: user.username,
                role,
            },
            landing,
        })
    }

    fn creator_gate(&self, user: &UserRow) -> WorkflowResult<Result<Landing, LoginOutcome>> {
        let Some(request) = self.db.get_creator_request_for_user(user.id)? else {
            warn!(
                "Campaign creator {} ({}) has no campaign creator request",
                user.username, user.id
            );
            return Ok(Err(LoginOutcome::blocked(
                "Your account has no campaign creator request. Contact us to fix your problem.",
            )));
        };

        let status = match parse_status(&request.status) {
            Ok(status) => status,
            Err(e) => {
                warn!("Creator request {}: {}", request.id, e);
                return Ok(Err(LoginOutcome::blocked(format!(
                    "Your campaign creator request has an invalid status ({}). Contact us to fix your problem.",
                    request.status
                ))));
            }
        };

        Ok(match status {
            RequestStatus::Pending => Err(LoginOutcome::blocked(
                "Your request to be a campaign creator wasn't validated yet. Please try again later.",
            )),
            RequestStatus::Approved => Ok(Landing::CreateCampaign),
            RequestStatus::Rejected => {
                self.db.delete_user(user.id)?;
                info!(
                    "Removed rejected campaign creator {} ({})",
                    user.username, user.id
                );
                Err(LoginOutcome::blocked(
                    "Your request to be a campaign creator was rejected. Please register again with valid information and document.",
                ))
            }
        })
    }

    /// Re-check a principal carried by a session against the stored account.
    /// `None` once the account is gone or, for campaign creators, once their
    /// request is no longer Approved.
    pub fn resume(&self, claimed: &Principal) -> WorkflowResult<Option<Principal>> {
        let Some(user) = self.db.get_user_by_id(claimed.id)? else {
            return Ok(None);
        };
        let role = match parse_role(&user.role) {
            Ok(role) => role,
            Err(_) => {
                warn!("User {} has unknown role {}", user.id, user.role);
                return Ok(None);
            }
        };
        if role == Role::CampaignCreator {
            let approved = self
                .db
                .get_creator_request_for_user(user.id)?
                .is_some_and(|request| request.status == RequestStatus::Approved.as_str());
            if !approved {
                return Ok(None);
            }
        }

        Ok(Some(Principal {
            id: user.id,
            username: user.username,
            role,
        }))
    }

    /// Root administrators create administrators.
    pub fn create_administrator(
        &self,
        principal: Option<&Principal>,
        username: &str,
        password: &str,
        password_confirmation: &str,
    ) -> WorkflowResult<i64> {
        let root = require(principal, &[Role::RootAdministrator], ROOT_ONLY)?;

        if username.trim().is_empty() || password.is_empty() {
            return Err(WorkflowError::validation("Empty fields."));
        }
        if password != password_confirmation {
            return Err(WorkflowError::validation("Different passwords."));
        }
        self.ensure_username_free(username, "Username already taken.")?;

        let hash = self.passwords.hash(password)?;
        let id = self.db.create_user(username, &hash, Role::Administrator)?;
        info!("{} created administrator {} ({})", root.username, username, id);
        Ok(id)
    }

    /// Create the root administrator if the username is still free.
    /// Returns whether an account was created.
    pub fn seed_root(&self, username: &str, password: &str) -> WorkflowResult<bool> {
        if self.db.get_user_by_username(username)?.is_some() {
            return Ok(false);
        }
        let hash = self.passwords.hash(password)?;
        let id = self.db.create_user(username, &hash, Role::RootAdministrator)?;
        info!("Seeded root administrator {} ({})", username, id);
        Ok(true)
    }

    pub fn profile(&self, principal: Option<&Principal>) -> WorkflowResult<UserPublic> {
        let principal = principal.ok_or_else(|| WorkflowError::unauthorized(LOGIN_REQUIRED))?;
        let user = self
            .db
            .get_user_by_id(principal.id)?
            .ok_or_else(|| WorkflowError::unauthorized(LOGIN_REQUIRED))?;

        Ok(UserPublic {
            id: user.id,
            role: parse_role(&user.role)?,
            username: user.username,
            picture: user.picture,
        })
    }

    /// Change the caller's username and password, and the picture if one is
    /// given. Returns the refreshed principal.
    pub fn update_profile(
        &self,
        principal: Option<&Principal>,
        change: ProfileChange,
    ) -> WorkflowResult<Principal> {
        let principal = principal.ok_or_else(|| WorkflowError::unauthorized(LOGIN_REQUIRED))?;

        if change.password != change.password_confirmation {
            return Err(WorkflowError::validation("Passwords do not match"));
        }
        if change.username.trim().is_empty() || change.password.is_empty() {
            return Err(WorkflowError::validation("Empty fields."));
        }
        if let Some(other) = self.db.get_user_by_username(&change.username)? {
            if other.id != principal.id {
                return Err(WorkflowError::Conflict("Username already in use".into()));
            }
        }

        let hash = self.passwords.hash(&change.password)?;
        let updated = self.db.update_user_profile(
            principal.id,
            &change.username,
            &hash,
            change.picture.as_deref(),
        )?;
        if !updated {
            return Err(WorkflowError::unauthorized(LOGIN_REQUIRED));
        }

        Ok(Principal {
            id: principal.id,
            username: change.username,
            role: principal.role,
        })
    }

    fn ensure_username_free(&self, username: &str, message: &str) -> WorkflowResult<()> {
        match self.db.get_user_by_username(username)? {
            Some(_) => Err(WorkflowError::Conflict(message.to_string())),
            None => Ok(()),
        }
    }
}
