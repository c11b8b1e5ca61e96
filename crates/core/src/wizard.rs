//! The five-step weekly audit form.
//!
//! The wizard only moves one step at a time. Going forward is gated on the
//! current step's fields being filled in; going back is always allowed
//! except from the first step. Side effects of reaching [`WizardStep::Results`]
//! (scoring, persistence, history) belong to the caller.

use serde::{Deserialize, Serialize};

use crate::scoring::{ScoreInputs, parse_count};
use crate::types::{Email, EmailError, SalesRepId};

/// Objections a rep may be confronted with during the flash test.
pub const OBJECTIONS: [&str; 5] = [
    "C'est trop cher pour nous.",
    "On n'a pas le budget cette année.",
    "Je dois en parler à mon équipe d'abord.",
    "Envoyez-moi une proposition par email.",
    "On travaille déjà avec un concurrent.",
];

/// A flash-test answer must be strictly longer than this (in characters).
pub const FLASH_RESPONSE_MIN_CHARS: usize = 10;

/// One screen of the wizard, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Identification,
    Kpis,
    FlashTest,
    Recognition,
    Results,
}

impl WizardStep {
    /// Number of steps.
    pub const COUNT: u8 = 5;

    /// Zero-based position of the step.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Identification => 0,
            Self::Kpis => 1,
            Self::FlashTest => 2,
            Self::Recognition => 3,
            Self::Results => 4,
        }
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Identification),
            1 => Some(Self::Kpis),
            2 => Some(Self::FlashTest),
            3 => Some(Self::Recognition),
            4 => Some(Self::Results),
            _ => None,
        }
    }

    /// The step after this one, `None` from [`Self::Results`].
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The step before this one, `None` from [`Self::Identification`].
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self.index().checked_sub(1) {
            Some(index) => Self::from_index(index),
            None => None,
        }
    }

    /// Heading shown above the step's form.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Identification => "Qui auditez-vous cette semaine ?",
            Self::Kpis => "KPIs de la semaine",
            Self::FlashTest => "Test Flash : Gestion d'objection",
            Self::Recognition => "Reconnaissance",
            Self::Results => "Score de la semaine",
        }
    }

    /// Width of the progress bar, `(index + 1) / 5` as a whole percentage.
    #[must_use]
    pub const fn progress_percent(self) -> u8 {
        (self.index() + 1) * (100 / Self::COUNT)
    }
}

/// Why the wizard refused to move.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardError {
    /// Required fields of this step are missing.
    #[error("step {} is incomplete", .0.index())]
    Incomplete(WizardStep),
    /// Already on the results step.
    #[error("the audit is already complete")]
    AtEnd,
    /// Already on the first step.
    #[error("already on the first step")]
    AtStart,
}

/// Everything typed into the form so far, as raw strings.
///
/// Counters stay strings until scoring so the form can be redisplayed
/// exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditDraft {
    pub manager_email: String,
    pub sales_rep_id: Option<SalesRepId>,
    pub sales_rep_name: String,
    pub prospecting_actions: String,
    pub discovery_meetings: String,
    pub proposals_sent: String,
    pub signed_proposals: String,
    pub revenue: String,
    /// Objection drawn when the flash-test step was entered.
    pub flash_test_objection: String,
    /// The rep's answer. Only used to gate the step; never stored.
    pub flash_test_response: String,
    pub flash_test_passed: bool,
    pub recognition_note: String,
}

impl AuditDraft {
    /// Whether `step`'s required fields are filled in.
    #[must_use]
    pub fn is_complete(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Identification => {
                self.manager_email().is_ok() && !self.sales_rep_name.trim().is_empty()
            }
            WizardStep::Kpis => [
                &self.prospecting_actions,
                &self.discovery_meetings,
                &self.proposals_sent,
            ]
            .iter()
            .all(|field| !field.trim().is_empty()),
            WizardStep::FlashTest => {
                self.flash_test_response.chars().count() > FLASH_RESPONSE_MIN_CHARS
            }
            WizardStep::Recognition => !self.recognition_note.trim().is_empty(),
            WizardStep::Results => false,
        }
    }

    /// The manager email, validated.
    ///
    /// # Errors
    ///
    /// Returns the [`EmailError`] describing why the field is not email-like.
    pub fn manager_email(&self) -> Result<Email, EmailError> {
        Email::parse(&self.manager_email)
    }

    /// Trimmed rep name.
    #[must_use]
    pub fn rep_name(&self) -> &str {
        self.sales_rep_name.trim()
    }

    /// Scoring inputs, with counters coerced by [`parse_count`].
    #[must_use]
    pub fn score_inputs(&self) -> ScoreInputs<'_> {
        ScoreInputs {
            prospecting_actions: parse_count(&self.prospecting_actions),
            discovery_meetings: parse_count(&self.discovery_meetings),
            proposals_sent: parse_count(&self.proposals_sent),
            signed_proposals: parse_count(&self.signed_proposals),
            revenue: parse_count(&self.revenue),
            flash_test_passed: self.flash_test_passed,
            recognition_note: &self.recognition_note,
        }
    }
}

/// Current step plus the draft being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    pub step: WizardStep,
    pub draft: AuditDraft,
}

impl Wizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`Self::advance`] would succeed.
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        self.draft.is_complete(self.step)
    }

    /// Move to the next step.
    ///
    /// # Errors
    ///
    /// [`WizardError::AtEnd`] on the results step, and
    /// [`WizardError::Incomplete`] when the current step is not filled in.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AtEnd)?;
        if !self.can_proceed() {
            return Err(WizardError::Incomplete(self.step));
        }
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step, keeping everything entered.
    ///
    /// # Errors
    ///
    /// [`WizardError::AtStart`] on the first step.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtStart)?;
        self.step = previous;
        Ok(previous)
    }

    /// Discard the draft and return to the first step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
