//! User data model.
//!
//! The [`User`] record is immutable: mutation is expressed as "produce a new
//! record", performed by the repository. Value types validate their content on
//! construction so a `User` in hand always satisfies the domain invariants.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyFullName,
    FullNameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from textual input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a [`UserId`] from an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not a domain concern.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address. Uniqueness is enforced by the service and the
/// storage constraint, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a full name.
pub const FULL_NAME_MAX: usize = 255;

/// Optional human-readable name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`] from owned input.
    pub fn new(full_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(full_name.into())
    }

    fn from_owned(full_name: String) -> Result<Self, UserValidationError> {
        if full_name.trim().is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if full_name.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        Ok(Self(full_name))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Candidate for a new user, before the repository generates identifier and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: EmailAddress,
    full_name: Option<FullName>,
    is_active: bool,
}

impl NewUser {
    /// Build a candidate with the active flag defaulted to `true`.
    pub fn new(email: EmailAddress, full_name: Option<FullName>) -> Self {
        Self {
            email,
            full_name,
            is_active: true,
        }
    }

    /// Override the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Requested email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested full name, if any.
    pub fn full_name(&self) -> Option<&FullName> {
        self.full_name.as_ref()
    }

    /// Requested active flag.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// Field changes for an update. `None` means "leave unchanged"; the nested
/// option on `full_name` distinguishes "clear" from "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    email: Option<EmailAddress>,
    full_name: Option<Option<FullName>>,
    is_active: Option<bool>,
}

impl UserChanges {
    /// Change set leaving every field untouched.
    pub fn none() -> Self {
        Self::default()
    }

    /// Request an email change.
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Request a full-name change; `None` clears the stored name.
    pub fn with_full_name(mut self, full_name: Option<FullName>) -> Self {
        self.full_name = Some(full_name);
        self
    }

    /// Request an active-flag change.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Requested email, if the change set includes one.
    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Requested full name, if the change set includes one.
    pub fn full_name(&self) -> Option<Option<&FullName>> {
        self.full_name.as_ref().map(Option::as_ref)
    }

    /// Requested active flag, if the change set includes one.
    pub fn is_active(&self) -> Option<bool> {
        self.is_active
    }

    /// Whether the change set touches no fields at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.is_active.is_none()
    }
}

/// Application user.
///
/// ## Invariants
/// - `id` is generated once and never reassigned.
/// - `email` is unique across all users (enforced upstream).
/// - `updated_at` is always greater than or equal to `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = Option<String>, example = "Ada Lovelace")]
    full_name: Option<FullName>,
    is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    updated_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        full_name: Option<FullName>,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            is_active,
            created_at,
            updated_at,
        }
    }

    /// Produce a new record with the change set applied and `updated_at`
    /// refreshed. Identifier and creation timestamp never change.
    pub fn with_changes(&self, changes: &UserChanges, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            email: changes.email().cloned().unwrap_or_else(|| self.email.clone()),
            full_name: match changes.full_name() {
                Some(full_name) => full_name.cloned(),
                None => self.full_name.clone(),
            },
            is_active: changes.is_active().unwrap_or(self.is_active),
            created_at: self.created_at,
            updated_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Optional human-readable name.
    pub fn full_name(&self) -> Option<&FullName> {
        self.full_name.as_ref()
    }

    /// Whether the user is active.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation timestamp, set once.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last mutation timestamp; equals `created_at` until the first update.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    id: Uuid,
    email: String,
    full_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            email,
            full_name,
            is_active,
            created_at,
            updated_at,
        } = value;
        Self {
            id: *id.as_uuid(),
            email: email.into(),
            full_name: full_name.map(String::from),
            is_active,
            created_at,
            updated_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let UserDto {
            id,
            email,
            full_name,
            is_active,
            created_at,
            updated_at,
        } = value;
        Ok(User::new(
            UserId::from_uuid(id),
            EmailAddress::new(email)?,
            full_name.map(FullName::new).transpose()?,
            is_active,
            created_at,
            updated_at,
        ))
    }
}

#[cfg(test)]
mod tests;
