//! Inventory request lifecycle: status state machine and DTOs.
//!
//! A request is created as `pending` and moves exactly once to `approved`
//! or `rejected`. Terminal states never transition again; re-submitting the
//! status a request already has is treated as an idempotent no-op.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Status of an inventory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// Type of an inventory request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// A new allocation: approving reserves one unit of stock and assigns it.
    New,
    /// A 1:1 replacement: approving touches no counters.
    Exchange,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestType::New => write!(f, "new"),
            RequestType::Exchange => write!(f, "exchange"),
        }
    }
}

impl std::str::FromStr for RequestType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(RequestType::New),
            "exchange" => Ok(RequestType::Exchange),
            _ => Err(()),
        }
    }
}

/// Outcome of asking a request to move to a target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request is pending and the transition must be applied.
    Apply,
    /// The request already carries the target status; nothing to do.
    AlreadyFinal,
}

/// Rejected state transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot change status from '{from}' to '{to}'")]
    InvalidTransition {
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Target status must be 'approved' or 'rejected'")]
    InvalidTarget,
}

impl RequestStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// Decides what moving a request from `self` to `target` means.
    ///
    /// Only `approved` and `rejected` are valid targets. A pending request
    /// yields `Transition::Apply`; a terminal request yields
    /// `Transition::AlreadyFinal` when the target matches its current status
    /// and an error otherwise.
    pub fn transition(self, target: RequestStatus) -> Result<Transition, TransitionError> {
        if target == RequestStatus::Pending {
            return Err(TransitionError::InvalidTarget);
        }

        match self {
            RequestStatus::Pending => Ok(Transition::Apply),
            current if current == target => Ok(Transition::AlreadyFinal),
            current => Err(TransitionError::InvalidTransition {
                from: current,
                to: target,
            }),
        }
    }
}

/// Request body for submitting an inventory request.
///
/// The submitting form identifies the employee and the item by human-typed
/// strings, not ids; resolution is case-insensitive exact match.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub employee_name: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub desk_number: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub inventory_name: String,

    #[validate(custom(function = "shared::validation::validate_request_type"))]
    pub request_type: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub reason: String,
}

/// Request body for approving or rejecting a request.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: String,
}

/// Brief employee reference embedded in request listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEmployeeBrief {
    pub id: Uuid,
    pub name: String,
    pub desk_number: String,
}

/// Brief inventory reference embedded in request listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInventoryBrief {
    pub id: Uuid,
    pub name: String,
}

/// An inventory request with its references resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItem {
    pub id: Uuid,
    pub employee: RequestEmployeeBrief,
    pub inventory: RequestInventoryBrief,
    pub request_type: RequestType,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Option set served to the request submission form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFormData {
    pub employees: Vec<FormEmployeeOption>,
    pub inventory: Vec<FormInventoryOption>,
    pub request_types: Vec<RequestType>,
    pub reason_options: Vec<String>,
}

/// Employee choice for the submission form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormEmployeeOption {
    pub name: String,
    pub desk_number: String,
}

/// Inventory choice for the submission form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInventoryOption {
    pub name: String,
}

/// Canned reasons offered by the submission form.
pub fn reason_options() -> Vec<String> {
    ["Damaged item", "Lost item", "Need upgrade", "Other"]
        .into_iter()
        .map(String::from)
        .collect()
}
