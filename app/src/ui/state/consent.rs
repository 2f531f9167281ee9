use shared::model::{doctor_roster, AccessDuration, AccessScope, ConsentReceipt, Doctor};
use shared::schema::ConsentRequest;

use crate::ui::input::UiCommand;
use crate::ui::render::{
    ConsentFocus, ConsentPhase, ConsentView, DoctorChoice, DurationChoice, ScopeChoice,
};

use super::{ActiveModal, UiEffect, UiRuntime, DIALOG_AUTOCLOSE_MS};

/// Consent dialog state.
///
/// Everything here is discarded when the dialog closes from the form; a
/// dialog dismissed mid-grant keeps its state so the stale completion has
/// somewhere to land, mirroring the mockup's unmounted-component behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ConsentState {
    pub record_title: String,
    pub record_date: String,
    pub roster: Vec<Doctor>,
    pub selected_doctor: Option<usize>,
    pub scope_index: usize,
    pub duration_index: usize,
    pub focus: ConsentFocus,
    pub cursor: usize,
    pub phase: ConsentPhase,
    pub close_in_ms: Option<u64>,
}

impl ConsentState {
    pub(super) fn new(record_title: String, record_date: String) -> Self {
        Self {
            record_title,
            record_date,
            roster: doctor_roster(),
            selected_doctor: None,
            scope_index: 0,
            // 24 hours, like the web form's preset.
            duration_index: 1,
            focus: ConsentFocus::Doctors,
            cursor: 0,
            phase: ConsentPhase::Form,
            close_in_ms: None,
        }
    }

    fn scope(&self) -> AccessScope {
        AccessScope::ALL_SCOPES[self.scope_index.min(AccessScope::ALL_SCOPES.len() - 1)]
    }

    fn duration(&self) -> AccessDuration {
        AccessDuration::ALL_DURATIONS
            [self.duration_index.min(AccessDuration::ALL_DURATIONS.len() - 1)]
    }

    fn selected(&self) -> Option<&Doctor> {
        self.selected_doctor.and_then(|index| self.roster.get(index))
    }

    fn can_grant(&self) -> bool {
        self.phase == ConsentPhase::Form && self.selected_doctor.is_some()
    }

    fn group_len(&self) -> usize {
        match self.focus {
            ConsentFocus::Doctors => self.roster.len(),
            ConsentFocus::Scopes => AccessScope::ALL_SCOPES.len(),
            ConsentFocus::Durations => AccessDuration::ALL_DURATIONS.len(),
            ConsentFocus::Grant => 1,
        }
    }
}

impl UiRuntime {
    pub(super) fn handle_consent(&mut self, command: UiCommand) -> UiEffect {
        let phase = match self.consent.as_ref() {
            Some(state) => state.phase,
            None => return UiEffect::None,
        };

        match phase {
            ConsentPhase::Granting => {
                if matches!(command, UiCommand::Back) {
                    // Dismissing mid-grant keeps the state: the exchange is
                    // still in flight and its completion will land later.
                    self.modal = ActiveModal::None;
                }
                UiEffect::None
            }
            ConsentPhase::Complete => {
                if matches!(command, UiCommand::Back | UiCommand::Activate) {
                    self.close_consent();
                }
                UiEffect::None
            }
            ConsentPhase::Form => self.handle_consent_form(command),
        }
    }

    fn handle_consent_form(&mut self, command: UiCommand) -> UiEffect {
        match command {
            UiCommand::Back => {
                self.close_consent();
                UiEffect::None
            }
            UiCommand::NextWidget => {
                if let Some(state) = self.consent.as_mut() {
                    state.focus = match state.focus {
                        ConsentFocus::Doctors => ConsentFocus::Scopes,
                        ConsentFocus::Scopes => ConsentFocus::Durations,
                        ConsentFocus::Durations => ConsentFocus::Grant,
                        ConsentFocus::Grant => ConsentFocus::Doctors,
                    };
                    state.cursor = consent_cursor_home(state);
                }
                UiEffect::None
            }
            UiCommand::PreviousWidget => {
                if let Some(state) = self.consent.as_mut() {
                    state.focus = match state.focus {
                        ConsentFocus::Doctors => ConsentFocus::Grant,
                        ConsentFocus::Scopes => ConsentFocus::Doctors,
                        ConsentFocus::Durations => ConsentFocus::Scopes,
                        ConsentFocus::Grant => ConsentFocus::Durations,
                    };
                    state.cursor = consent_cursor_home(state);
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionUp | UiCommand::MoveSelectionLeft => {
                self.move_consent_cursor(-1);
                UiEffect::None
            }
            UiCommand::MoveSelectionDown | UiCommand::MoveSelectionRight => {
                self.move_consent_cursor(1);
                UiEffect::None
            }
            UiCommand::ToggleItem { .. } => {
                if let Some(state) = self.consent.as_mut() {
                    if state.focus == ConsentFocus::Doctors {
                        state.selected_doctor = Some(state.cursor);
                    }
                }
                UiEffect::None
            }
            UiCommand::Activate => self.activate_consent_form(),
            _ => UiEffect::None,
        }
    }

    fn move_consent_cursor(&mut self, delta: i64) {
        if let Some(state) = self.consent.as_mut() {
            let len = state.group_len();
            if len == 0 {
                return;
            }
            let next = if delta < 0 {
                state.cursor.saturating_sub(delta.unsigned_abs() as usize)
            } else {
                (state.cursor + delta as usize).min(len - 1)
            };
            state.cursor = next;
            match state.focus {
                ConsentFocus::Scopes => state.scope_index = next,
                ConsentFocus::Durations => state.duration_index = next,
                _ => {}
            }
        }
    }

    fn activate_consent_form(&mut self) -> UiEffect {
        let (focus, cursor) = match self.consent.as_ref() {
            Some(state) => (state.focus, state.cursor),
            None => return UiEffect::None,
        };

        match focus {
            ConsentFocus::Doctors => {
                if let Some(state) = self.consent.as_mut() {
                    state.selected_doctor = Some(cursor);
                }
                UiEffect::None
            }
            ConsentFocus::Scopes => {
                if let Some(state) = self.consent.as_mut() {
                    state.scope_index = cursor;
                }
                UiEffect::None
            }
            ConsentFocus::Durations => {
                if let Some(state) = self.consent.as_mut() {
                    state.duration_index = cursor;
                }
                UiEffect::None
            }
            ConsentFocus::Grant => self.start_consent_grant(),
        }
    }

    fn start_consent_grant(&mut self) -> UiEffect {
        let now_secs = self.now_ms / 1_000;
        let request = match self.consent.as_mut() {
            Some(state) => {
                let doctor = match state.selected() {
                    Some(doctor) => doctor.address.clone(),
                    None => {
                        self.notice = Some(String::from("Please select a doctor first."));
                        return UiEffect::None;
                    }
                };
                state.phase = ConsentPhase::Granting;
                ConsentRequest {
                    doctor,
                    scope: state.scope(),
                    expiry: state.duration().expiry_from(now_secs),
                }
            }
            None => return UiEffect::None,
        };

        UiEffect::RequestConsent { request }
    }

    fn close_consent(&mut self) {
        self.consent = None;
        self.modal = ActiveModal::None;
    }

    pub(super) fn tick_consent(&mut self, elapsed_ms: u64) {
        let mut close = false;
        if let Some(state) = self.consent.as_mut() {
            if let Some(remaining) = state.close_in_ms {
                let remaining = remaining.saturating_sub(elapsed_ms);
                if remaining == 0 {
                    close = true;
                } else {
                    state.close_in_ms = Some(remaining);
                }
            }
        }
        if close {
            self.close_consent();
        }
    }

    /// Land a successful grant completion.
    ///
    /// Fires even when the dialog was dismissed mid-grant: the success state
    /// re-opens against the dismissed instance. That is the mockup's latent
    /// behavior and it is preserved on purpose.
    pub fn register_consent_granted(&mut self) -> Option<ConsentReceipt> {
        let now_ms = self.now_ms;
        let state = self.consent.as_mut()?;
        if state.phase != ConsentPhase::Granting {
            return None;
        }
        state.phase = ConsentPhase::Complete;
        state.close_in_ms = Some(DIALOG_AUTOCLOSE_MS);
        let receipt = state.selected().cloned().map(|doctor| ConsentReceipt {
            doctor,
            scope: state.scope(),
            duration: state.duration(),
            granted_at_ms: now_ms,
        });
        self.modal = ActiveModal::Consent;
        receipt
    }

    /// Land a failed grant: notice, back to the form, nothing else changes.
    pub fn register_consent_failed(&mut self, message: &str) {
        if let Some(state) = self.consent.as_mut() {
            if state.phase == ConsentPhase::Granting {
                state.phase = ConsentPhase::Form;
            }
        }
        self.notice = Some(format!("Error granting consent: {message}"));
    }

    pub(super) fn render_consent(&self) -> Option<ConsentView> {
        let state = self.consent.as_ref()?;

        let doctors = state
            .roster
            .iter()
            .enumerate()
            .map(|(index, doctor)| DoctorChoice {
                name: doctor.name.clone(),
                specialty: doctor.specialty.clone(),
                hospital: doctor.hospital.clone(),
                verified: doctor.verified,
                selected: state.selected_doctor == Some(index),
            })
            .collect();

        let scopes = AccessScope::ALL_SCOPES
            .iter()
            .enumerate()
            .map(|(index, scope)| ScopeChoice {
                label: scope.label().to_string(),
                description: scope.description().to_string(),
                selected: state.scope_index == index,
            })
            .collect();

        let durations = AccessDuration::ALL_DURATIONS
            .iter()
            .enumerate()
            .map(|(index, duration)| DurationChoice {
                label: duration.label().to_string(),
                selected: state.duration_index == index,
            })
            .collect();

        let summary = state.selected().map(|doctor| {
            format!(
                "{} at {} will have {} for {}",
                doctor.name,
                doctor.hospital,
                state.scope().label().to_lowercase(),
                state.duration().label().to_lowercase()
            )
        });

        let complete_message = if state.phase == ConsentPhase::Complete {
            state.selected().map(|doctor| {
                format!(
                    "{} now has {} access to your record for {}.",
                    doctor.name,
                    state.scope().label().to_lowercase(),
                    state.duration().label().to_lowercase()
                )
            })
        } else {
            None
        };

        Some(ConsentView {
            phase: state.phase,
            record_title: state.record_title.clone(),
            record_date: state.record_date.clone(),
            doctors,
            scopes,
            durations,
            focus: state.focus,
            cursor: state.cursor,
            summary,
            can_grant: state.can_grant(),
            complete_message,
        })
    }
}

fn consent_cursor_home(state: &ConsentState) -> usize {
    match state.focus {
        ConsentFocus::Doctors => state.selected_doctor.unwrap_or(0),
        ConsentFocus::Scopes => state.scope_index,
        ConsentFocus::Durations => state.duration_index,
        ConsentFocus::Grant => 0,
    }
}

#[cfg(test)]
mod tests {
    use crate::ui::input::UiCommand;
    use crate::ui::render::{ConsentPhase, ModalContent};
    use crate::ui::state::fixtures;
    use crate::ui::state::{ActiveModal, UiEffect};

    fn consent_view(ui: &crate::ui::state::UiRuntime) -> crate::ui::render::ConsentView {
        match ui.render().modal {
            Some(ModalContent::Consent(view)) => view,
            other => panic!("expected consent modal, got {other:?}"),
        }
    }

    #[test]
    fn grant_is_enabled_iff_a_doctor_is_selected() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_consent(&mut ui, &adapter);
        assert!(!consent_view(&ui).can_grant);

        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        assert!(consent_view(&ui).can_grant);
    }

    #[test]
    fn granting_without_a_doctor_raises_a_notice_and_changes_nothing() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_consent(&mut ui, &adapter);

        // Jump straight to the Grant button without picking anyone.
        fixtures::apply(&mut ui, &adapter, UiCommand::PreviousWidget);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);

        assert_eq!(ui.notice(), Some("Please select a doctor first."));
        let view = consent_view(&ui);
        assert_eq!(view.phase, ConsentPhase::Form);
        assert!(view.doctors.iter().all(|d| !d.selected));
    }

    #[test]
    fn grant_flow_reaches_complete_and_auto_closes() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_consent(&mut ui, &adapter);

        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        fixtures::apply(&mut ui, &adapter, UiCommand::PreviousWidget);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);

        let view = consent_view(&ui);
        assert_eq!(view.phase, ConsentPhase::Complete);
        let message = view.complete_message.expect("complete message");
        assert!(message.contains("Dr. Carlos Lopez"));
        assert!(message.contains("full access"));
        assert!(message.contains("24 hours"));

        ui.tick(2_000);
        assert_eq!(ui.modal(), ActiveModal::None);
    }

    #[test]
    fn scope_and_duration_choices_follow_the_cursor() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_consent(&mut ui, &adapter);

        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        fixtures::apply(&mut ui, &adapter, UiCommand::NextWidget);
        fixtures::apply(&mut ui, &adapter, UiCommand::MoveSelectionDown);
        fixtures::apply(&mut ui, &adapter, UiCommand::NextWidget);
        fixtures::apply(&mut ui, &adapter, UiCommand::MoveSelectionDown);
        fixtures::apply(&mut ui, &adapter, UiCommand::MoveSelectionDown);

        let pending = fixtures::SystemAdapter::deferred();
        fixtures::apply(&mut ui, &pending, UiCommand::NextWidget);
        let effect = ui.apply_command(UiCommand::Activate);
        match effect {
            UiEffect::RequestConsent { request } => {
                assert_eq!(request.scope, shared::model::AccessScope::Basic);
                // Duration cursor landed on 30 days; expiry is absolute.
                assert_eq!(
                    request.expiry,
                    fixtures::FIXED_NOW_MS / 1_000 + 2_592_000
                );
            }
            other => panic!("expected consent request, got {other:?}"),
        }
    }

    #[test]
    fn stale_completion_reopens_the_dismissed_dialog() {
        let mut ui = fixtures::build_runtime();
        let deferred = fixtures::SystemAdapter::deferred();
        fixtures::open_consent(&mut ui, &deferred);

        fixtures::apply(&mut ui, &deferred, UiCommand::Activate);
        fixtures::apply(&mut ui, &deferred, UiCommand::PreviousWidget);
        fixtures::apply(&mut ui, &deferred, UiCommand::Activate);
        assert_eq!(consent_view(&ui).phase, ConsentPhase::Granting);

        // Dismiss while the exchange is still pending.
        fixtures::apply(&mut ui, &deferred, UiCommand::Back);
        assert_eq!(ui.modal(), ActiveModal::None);

        // The stale completion lands anyway and re-opens the success state.
        deferred.complete(&mut ui);
        assert_eq!(ui.modal(), ActiveModal::Consent);
        assert_eq!(consent_view(&ui).phase, ConsentPhase::Complete);
    }

    #[test]
    fn failed_grant_returns_to_the_form_with_a_notice() {
        let mut ui = fixtures::build_runtime();
        let failing = fixtures::SystemAdapter::default().with_consent_failure("exchange refused");
        fixtures::open_consent(&mut ui, &failing);

        fixtures::apply(&mut ui, &failing, UiCommand::Activate);
        fixtures::apply(&mut ui, &failing, UiCommand::PreviousWidget);
        fixtures::apply(&mut ui, &failing, UiCommand::Activate);

        assert_eq!(
            ui.notice(),
            Some("Error granting consent: exchange refused")
        );
        assert_eq!(consent_view(&ui).phase, ConsentPhase::Form);
    }
}
