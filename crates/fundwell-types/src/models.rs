use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Account role. Every workflow operation is gated on one or more of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Donor,
    CampaignCreator,
    Administrator,
    RootAdministrator,
}

impl Role {
    /// Roles allowed to review creators, campaigns and reports.
    pub const ADMINS: &'static [Role] = &[Role::Administrator, Role::RootAdministrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::CampaignCreator => "campaign_creator",
            Self::Administrator => "administrator",
            Self::RootAdministrator => "root_administrator",
        }
    }

    pub fn is_admin(&self) -> bool {
        Self::ADMINS.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "campaign_creator" => Ok(Self::CampaignCreator),
            "administrator" => Ok(Self::Administrator),
            "root_administrator" => Ok(Self::RootAdministrator),
            other => Err(ParseEnumError {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Status shared by creator requests and campaign requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Parse an administrator decision. `Pending` is a valid status but not a
    /// valid decision.
    pub fn parse_decision(s: &str) -> Result<Self, ParseEnumError> {
        match s.parse()? {
            Self::Pending => Err(ParseEnumError {
                kind: "decision",
                value: s.to_string(),
            }),
            decided => Ok(decided),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseEnumError {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// The authenticated actor of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
