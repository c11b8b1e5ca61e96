//! Sales representatives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sales_pulse_core::SalesRepId;

/// Reps created the first time the list is loaded on an empty database,
/// as `(name, email)`.
pub const DEFAULT_REPS: [(&str, &str); 2] = [
    ("Thomas", "thomas@example.com"),
    ("Julie", "julie@example.com"),
];

/// A sales representative that can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRep {
    pub id: SalesRepId,
    pub name: String,
    /// Free text, never validated.
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SalesRep {
    /// Build a rep that only exists locally, with a freshly generated id.
    #[must_use]
    pub fn local(new: NewSalesRep) -> Self {
        Self {
            id: SalesRepId::generate(),
            name: new.name,
            email: new.email,
            created_at: Utc::now(),
        }
    }

    /// The default reps, with locally generated ids.
    #[must_use]
    pub fn local_defaults() -> Vec<Self> {
        NewSalesRep::defaults().into_iter().map(Self::local).collect()
    }
}

/// Why a rep could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SalesRepError {
    #[error("rep name cannot be empty")]
    EmptyName,
}

/// A rep about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalesRep {
    pub name: String,
    pub email: Option<String>,
}

impl NewSalesRep {
    /// Trim the inputs; a blank email becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns `SalesRepError::EmptyName` when the name is blank.
    pub fn new(name: &str, email: Option<&str>) -> Result<Self, SalesRepError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SalesRepError::EmptyName);
        }

        Ok(Self {
            name: name.to_owned(),
            email: email
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_owned),
        })
    }

    /// [`DEFAULT_REPS`] as creatable values.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        DEFAULT_REPS
            .iter()
            .map(|(name, email)| Self {
                name: (*name).to_owned(),
                email: Some((*email).to_owned()),
            })
            .collect()
    }
}
