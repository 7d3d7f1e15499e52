//! Caller input validation.
//!
//! Tool arguments arrive as an untyped JSON object. The functions here check
//! required fields and types, apply defaults, and produce the typed queries
//! the control plane runs.

use std::{error::Error, fmt};

use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_CHAIN_IDS: &str = "chain_ids";
pub const FIELD_BLOCK_NUMBER: &str = "block_number";
pub const FIELD_IS_SENDER: &str = "is_sender";
pub const FIELD_IS_RECEIVER: &str = "is_receiver";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingArguments,
    MissingField(&'static str),
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    /// Name of the offending field, if the error is tied to one.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingArguments => None,
            Self::MissingField(field)
            | Self::InvalidType { field, .. }
            | Self::InvalidValue { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArguments => write!(f, "arguments are required"),
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidType { field, expected } => write!(f, "{field} must be {expected}"),
            Self::InvalidValue { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl Error for ValidationError {}

/// Which side of a transaction the queried address must be on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleFilter {
    pub is_sender: bool,
    pub is_receiver: bool,
}

impl RoleFilter {
    pub const fn new(is_sender: bool, is_receiver: bool) -> Self {
        Self {
            is_sender,
            is_receiver,
        }
    }
}

impl Default for RoleFilter {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Validated arguments for `get_transactions_by_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub address: String,
    /// Comma separated chain ids; empty means all chains.
    pub chain_ids: String,
    /// Oldest block to include.
    pub block_number: u64,
    pub roles: RoleFilter,
}

impl TransactionQuery {
    pub fn new(address: impl Into<String>, block_number: u64) -> Self {
        Self {
            address: address.into(),
            chain_ids: String::new(),
            block_number,
            roles: RoleFilter::default(),
        }
    }

    #[must_use]
    pub fn with_chain_ids(mut self, chain_ids: impl Into<String>) -> Self {
        self.chain_ids = chain_ids.into();
        self
    }

    #[must_use]
    pub const fn with_roles(mut self, roles: RoleFilter) -> Self {
        self.roles = roles;
        self
    }

    /// Validates a raw argument object.
    ///
    /// # Errors
    /// Returns `ValidationError` naming the first field that is missing or mistyped.
    pub fn from_args(args: Option<&JsonObject>) -> Result<Self, ValidationError> {
        let args = args.ok_or(ValidationError::MissingArguments)?;
        let address = required_address(args)?;
        let chain_ids = optional_string(args, FIELD_CHAIN_IDS)?.unwrap_or_default();
        let block_number = required_block_number(args)?;
        let is_sender = optional_bool(args, FIELD_IS_SENDER)?.unwrap_or(true);
        let is_receiver = optional_bool(args, FIELD_IS_RECEIVER)?.unwrap_or(true);

        Ok(Self {
            address,
            chain_ids,
            block_number,
            roles: RoleFilter::new(is_sender, is_receiver),
        })
    }
}

/// Validated arguments for `get_activity_by_address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub address: String,
    pub chain_ids: String,
    pub block_number: u64,
}

impl ActivityQuery {
    pub fn new(address: impl Into<String>, block_number: u64) -> Self {
        Self {
            address: address.into(),
            chain_ids: String::new(),
            block_number,
        }
    }

    #[must_use]
    pub fn with_chain_ids(mut self, chain_ids: impl Into<String>) -> Self {
        self.chain_ids = chain_ids.into();
        self
    }

    /// Validates a raw argument object.
    ///
    /// # Errors
    /// Returns `ValidationError` naming the first field that is missing or mistyped.
    pub fn from_args(args: Option<&JsonObject>) -> Result<Self, ValidationError> {
        let args = args.ok_or(ValidationError::MissingArguments)?;
        Ok(Self {
            address: required_address(args)?,
            chain_ids: optional_string(args, FIELD_CHAIN_IDS)?.unwrap_or_default(),
            block_number: required_block_number(args)?,
        })
    }
}

fn required_address(args: &JsonObject) -> Result<String, ValidationError> {
    let address = optional_string(args, FIELD_ADDRESS)?
        .ok_or(ValidationError::MissingField(FIELD_ADDRESS))?;
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: FIELD_ADDRESS,
            reason: "must not be empty".to_string(),
        });
    }
    if trimmed.contains(['/', '?', '#']) {
        return Err(ValidationError::InvalidValue {
            field: FIELD_ADDRESS,
            reason: "must not contain '/', '?' or '#'".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn required_block_number(args: &JsonObject) -> Result<u64, ValidationError> {
    let value = present(args, FIELD_BLOCK_NUMBER)
        .ok_or(ValidationError::MissingField(FIELD_BLOCK_NUMBER))?;
    let Value::Number(number) = value else {
        return Err(ValidationError::InvalidType {
            field: FIELD_BLOCK_NUMBER,
            expected: "a number",
        });
    };
    block_height(number).ok_or_else(|| ValidationError::InvalidValue {
        field: FIELD_BLOCK_NUMBER,
        reason: format!("{number} is not a non-negative block height"),
    })
}

fn optional_string(args: &JsonObject, field: &'static str) -> Result<Option<String>, ValidationError> {
    match present(args, field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a string",
        }),
    }
}

fn optional_bool(args: &JsonObject, field: &'static str) -> Result<Option<bool>, ValidationError> {
    match present(args, field) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(ValidationError::InvalidType {
            field,
            expected: "a boolean",
        }),
    }
}

/// Null counts as absent.
fn present<'a>(args: &'a JsonObject, field: &str) -> Option<&'a Value> {
    args.get(field).filter(|value| !value.is_null())
}

/// Accepts integers and integral floats such as `100.0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn block_height(number: &serde_json::Number) -> Option<u64> {
    if let Some(value) = number.as_u64() {
        return Some(value);
    }
    let value = number.as_f64()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}
