//! Audit wizard route handlers.
//!
//! The wizard lives in the session: every POST saves the fields of the
//! current step, moves, and redirects back to `/`. Reaching the results step
//! submits the audit through [`PulseService`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use sales_pulse_core::{
    AuditDraft, OBJECTIONS, SalesRepId, Trend, TrendDirection, Wizard, WizardError,
    WizardStep,
};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::models::{SalesRep, SubmissionView, session_keys};
use crate::services::{Outcome, PulseService, SessionMirror};
use crate::state::AppState;

// =============================================================================
// Template Types
// =============================================================================

/// A rep in the identification dropdown and the management panel.
#[derive(Debug, Clone)]
pub struct RepOption {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub selected: bool,
}

/// One bar of the history chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBar {
    pub label: String,
    pub score: u8,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Horizontal centre, for the labels.
    pub center: u32,
}

/// Everything the results step displays.
#[derive(Debug, Clone)]
pub struct ResultsView {
    pub score: u8,
    pub rep_name: String,
    pub bars: Vec<HistoryBar>,
    pub trend_text: Option<String>,
    pub trend_class: &'static str,
    pub cta_title: &'static str,
    pub degraded: bool,
}

/// Wizard page template.
#[derive(Template, WebTemplate)]
#[template(path = "wizard/index.html")]
pub struct WizardTemplate {
    pub step: u8,
    pub title: &'static str,
    pub progress: u8,
    pub draft: AuditDraft,
    pub reps: Vec<RepOption>,
    pub reps_degraded: bool,
    pub error: Option<&'static str>,
    pub results: Option<ResultsView>,
    pub booking_url: Option<String>,
}

// =============================================================================
// Chart Layout
// =============================================================================

/// Height of the chart area in SVG units; a score of 100 fills it.
const CHART_HEIGHT: u32 = 100;
/// Y coordinate of the bars' baseline.
const CHART_BASELINE: u32 = 110;
const BAR_WIDTH: u32 = 40;
const BAR_STRIDE: u32 = 56;
const CHART_LEFT: u32 = 12;

// =============================================================================
// Form Types
// =============================================================================

/// Fields of any step. Only the current step's fields are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StepForm {
    pub manager_email: Option<String>,
    pub sales_rep_id: Option<String>,
    pub prospecting_actions: Option<String>,
    pub discovery_meetings: Option<String>,
    pub proposals_sent: Option<String>,
    pub signed_proposals: Option<String>,
    pub revenue: Option<String>,
    pub flash_test_response: Option<String>,
    /// Checkbox: present when ticked.
    pub flash_test_passed: Option<String>,
    pub recognition_note: Option<String>,
}

impl StepForm {
    /// Copy this step's fields into the draft.
    ///
    /// The rep id is resolved against `reps`; an unknown id clears the
    /// selection.
    pub fn apply(self, step: WizardStep, draft: &mut AuditDraft, reps: &[SalesRep]) {
        match step {
            WizardStep::Identification => {
                draft.manager_email = self.manager_email.unwrap_or_default();
                let selected = self
                    .sales_rep_id
                    .and_then(|id| id.parse::<SalesRepId>().ok())
                    .and_then(|id| reps.iter().find(|rep| rep.id == id));
                match selected {
                    Some(rep) => {
                        draft.sales_rep_id = Some(rep.id);
                        draft.sales_rep_name.clone_from(&rep.name);
                    }
                    None => {
                        draft.sales_rep_id = None;
                        draft.sales_rep_name.clear();
                    }
                }
            }
            WizardStep::Kpis => {
                draft.prospecting_actions = self.prospecting_actions.unwrap_or_default();
                draft.discovery_meetings = self.discovery_meetings.unwrap_or_default();
                draft.proposals_sent = self.proposals_sent.unwrap_or_default();
                draft.signed_proposals = self.signed_proposals.unwrap_or_default();
                draft.revenue = self.revenue.unwrap_or_default();
            }
            WizardStep::FlashTest => {
                draft.flash_test_response = self.flash_test_response.unwrap_or_default();
                draft.flash_test_passed = self.flash_test_passed.is_some();
            }
            WizardStep::Recognition => {
                draft.recognition_note = self.recognition_note.unwrap_or_default();
            }
            WizardStep::Results => {}
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_wizard(session: &Session) -> Result<Wizard> {
    Ok(session
        .get::<Wizard>(session_keys::WIZARD)
        .await?
        .unwrap_or_default())
}

async fn save_wizard(session: &Session, wizard: &Wizard) -> Result<()> {
    session.insert(session_keys::WIZARD, wizard).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the current step.
///
/// GET /
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut wizard = load_wizard(&session).await?;
    let submission = if wizard.step == WizardStep::Results {
        session
            .get::<SubmissionView>(session_keys::SUBMISSION)
            .await?
    } else {
        None
    };

    // Session lost its submission; start over rather than show empty results.
    if wizard.step == WizardStep::Results && submission.is_none() {
        wizard.reset();
        save_wizard(&session, &wizard).await?;
    }

    render(&state, &session, wizard, submission, None, None).await
}

/// Save the current step and move forward.
///
/// POST /wizard/next
#[instrument(skip(state, session, form))]
pub async fn next(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<StepForm>,
) -> Result<Response> {
    let mut wizard = load_wizard(&session).await?;
    let reps = if wizard.step == WizardStep::Identification {
        Some(list_reps(&state, &session).await)
    } else {
        None
    };
    let known = reps
        .as_ref()
        .map(|outcome| outcome.value().as_slice())
        .unwrap_or_default();
    form.apply(wizard.step, &mut wizard.draft, known);

    match wizard.advance() {
        Ok(step) => {
            add_breadcrumb("wizard", "Advanced", &[("step", step_name(step))]);
            if step == WizardStep::FlashTest {
                draw_objection(&mut wizard.draft);
            }
            if step == WizardStep::Results {
                submit(&state, &session, &wizard.draft).await?;
            }
            save_wizard(&session, &wizard).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(WizardError::Incomplete(step)) => {
            save_wizard(&session, &wizard).await?;
            let error = Some(incomplete_message(step));
            let mut response = render(&state, &session, wizard, None, reps, error).await?;
            *response.status_mut() = StatusCode::UNPROCESSABLE_ENTITY;
            Ok(response)
        }
        Err(WizardError::AtEnd | WizardError::AtStart) => Ok(Redirect::to("/").into_response()),
    }
}

/// Save the current step and go back one step.
///
/// POST /wizard/back
#[instrument(skip(session, form))]
pub async fn back(session: Session, Form(form): Form<StepForm>) -> Result<Redirect> {
    let mut wizard = load_wizard(&session).await?;
    if wizard.step != WizardStep::Identification {
        form.apply(wizard.step, &mut wizard.draft, &[]);
    }

    if let Ok(step) = wizard.back() {
        add_breadcrumb("wizard", "Went back", &[("step", step_name(step))]);
        if step == WizardStep::FlashTest {
            draw_objection(&mut wizard.draft);
        }
        if step == WizardStep::Recognition {
            session
                .remove::<SubmissionView>(session_keys::SUBMISSION)
                .await?;
        }
    }
    save_wizard(&session, &wizard).await?;
    Ok(Redirect::to("/"))
}

/// Discard the draft and start a new audit.
///
/// POST /wizard/reset
#[instrument(skip(session))]
pub async fn reset(session: Session) -> Result<Redirect> {
    let mut wizard = load_wizard(&session).await?;
    wizard.reset();
    save_wizard(&session, &wizard).await?;
    session
        .remove::<SubmissionView>(session_keys::SUBMISSION)
        .await?;
    add_breadcrumb("wizard", "Reset", &[]);
    Ok(Redirect::to("/"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Score and save the draft, keeping the outcome for the results step.
async fn submit(state: &AppState, session: &Session, draft: &AuditDraft) -> Result<()> {
    let mirror = SessionMirror::new(session.clone());
    let outcome = PulseService::new(state.store(), &mirror)
        .submit_audit(draft)
        .await?;

    let degraded = outcome.is_degraded();
    let submission = outcome.into_value();
    let view = SubmissionView {
        audit: submission.audit,
        history: submission.history,
        trend: submission.trend,
        degraded,
    };
    session.insert(session_keys::SUBMISSION, &view).await?;
    Ok(())
}

async fn list_reps(state: &AppState, session: &Session) -> Outcome<Vec<SalesRep>> {
    let mirror = SessionMirror::new(session.clone());
    PulseService::new(state.store(), &mirror).list_reps().await
}

/// Render the current step. `reps` is the list already loaded by the
/// caller, if any.
async fn render(
    state: &AppState,
    session: &Session,
    wizard: Wizard,
    submission: Option<SubmissionView>,
    reps: Option<Outcome<Vec<SalesRep>>>,
    error: Option<&'static str>,
) -> Result<Response> {
    let (reps, reps_degraded) = if wizard.step == WizardStep::Identification {
        let outcome = match reps {
            Some(outcome) => outcome,
            None => list_reps(state, session).await,
        };
        let degraded = outcome.is_degraded();
        let selected = wizard.draft.sales_rep_id;
        let options = outcome
            .into_value()
            .into_iter()
            .map(|rep| RepOption {
                id: rep.id.to_string(),
                selected: Some(rep.id) == selected,
                name: rep.name,
                email: rep.email,
            })
            .collect();
        (options, degraded)
    } else {
        (Vec::new(), false)
    };

    let results = submission.map(|view| results_view(&view));

    Ok(WizardTemplate {
        step: wizard.step.index(),
        title: wizard.step.title(),
        progress: wizard.step.progress_percent(),
        draft: wizard.draft,
        reps,
        reps_degraded,
        error,
        results,
        booking_url: state.config().booking_url.clone(),
    }
    .into_response())
}

fn draw_objection(draft: &mut AuditDraft) {
    if let Some(objection) = OBJECTIONS.choose(&mut rand::rng()) {
        draft.flash_test_objection = (*objection).to_string();
    }
}

const fn step_name(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Identification => "identification",
        WizardStep::Kpis => "kpis",
        WizardStep::FlashTest => "flash_test",
        WizardStep::Recognition => "recognition",
        WizardStep::Results => "results",
    }
}

/// Message shown when a step cannot be left yet.
#[must_use]
pub const fn incomplete_message(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Identification => {
            "Indiquez un email valide et sélectionnez un commercial."
        }
        WizardStep::Kpis => "Renseignez la prospection, les rendez-vous et les propositions.",
        WizardStep::FlashTest => "La réponse doit dépasser 10 caractères.",
        WizardStep::Recognition => "Ajoutez une note de reconnaissance.",
        WizardStep::Results => "L'audit est terminé.",
    }
}

/// Build the results step from a stored submission.
#[must_use]
pub fn results_view(view: &SubmissionView) -> ResultsView {
    let score = view.audit.total_score;
    let down = matches!(
        view.trend,
        Some(Trend {
            direction: TrendDirection::Down,
            ..
        })
    );

    ResultsView {
        score,
        rep_name: view.audit.sales_rep_name.clone(),
        bars: history_bars(view.history.iter().map(|p| p.total_score)),
        trend_text: view.trend.map(trend_text),
        trend_class: view.trend.map_or("stable", |t| t.direction.as_str()),
        cta_title: if down {
            "La courbe stagne ?"
        } else {
            "Boostez encore plus vos résultats"
        },
        degraded: view.degraded,
    }
}

/// Label under the score, e.g. `+20% depuis la semaine dernière`.
#[must_use]
pub fn trend_text(trend: Trend) -> String {
    match (trend.direction, trend.magnitude_percent) {
        (TrendDirection::Stable, _) => "Performance stable".to_string(),
        (TrendDirection::Up, Some(pct)) => format!("+{pct}% depuis la semaine dernière"),
        (TrendDirection::Down, Some(pct)) => format!("-{pct}% depuis la semaine dernière"),
        (TrendDirection::Up, None) => "En hausse depuis la semaine dernière".to_string(),
        (TrendDirection::Down, None) => "En baisse depuis la semaine dernière".to_string(),
    }
}

/// Lay out one bar per score, oldest first, labelled `S1`, `S2`, ...
pub fn history_bars(scores: impl IntoIterator<Item = u8>) -> Vec<HistoryBar> {
    (0u32..)
        .zip(scores)
        .map(|(i, score)| {
            let height = u32::from(score.min(100)) * CHART_HEIGHT / 100;
            let x = CHART_LEFT + i * BAR_STRIDE;
            HistoryBar {
                label: format!("S{}", i + 1),
                score,
                x,
                y: CHART_BASELINE - height,
                width: BAR_WIDTH,
                height,
                center: x + BAR_WIDTH / 2,
            }
        })
        .collect()
}
