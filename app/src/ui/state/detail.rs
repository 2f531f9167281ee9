use shared::model::RecordTag;

use crate::ui::input::UiCommand;
use crate::ui::render::{DetailRow, DetailSection, DetailView};

use super::consent::ConsentState;
use super::{ActiveModal, UiEffect, UiRuntime, UiScreen};

/// Actions offered at the bottom of the detail screen. Only "Share Record"
/// is wired; the rest are demo placeholders like the mockup's.
const DETAIL_ACTIONS: [&str; 4] = [
    "Download PDF",
    "Share Record",
    "Email Doctor",
    "Schedule Follow-up",
];

const SHARE_ACTION_INDEX: usize = 1;

/// Record-detail state, including the discard-on-back notes draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct DetailState {
    pub record_id: u64,
    pub selected_action: usize,
    pub note_draft: String,
    pub notes_focused: bool,
}

impl DetailState {
    pub(super) fn new(record_id: u64) -> Self {
        Self {
            record_id,
            selected_action: 0,
            note_draft: String::new(),
            notes_focused: false,
        }
    }

    fn insert_fallback(&mut self, fallback: Option<char>) {
        if let Some(c) = fallback {
            if !c.is_control() {
                self.note_draft.push(c);
            }
        }
    }
}

impl UiRuntime {
    pub(super) fn handle_detail(&mut self, command: UiCommand) -> UiEffect {
        let notes_focused = self
            .detail
            .as_ref()
            .map(|detail| detail.notes_focused)
            .unwrap_or(false);

        match command {
            UiCommand::Back | UiCommand::GoHome => {
                self.detail = None;
                self.screen = UiScreen::Home;
                UiEffect::None
            }
            UiCommand::NextWidget | UiCommand::PreviousWidget => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.notes_focused = !detail.notes_focused;
                }
                UiEffect::None
            }
            UiCommand::InsertChar(c) => {
                if notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.insert_fallback(Some(c));
                    }
                }
                UiEffect::None
            }
            UiCommand::DeleteChar => {
                if let Some(detail) = self.detail.as_mut() {
                    if detail.notes_focused {
                        detail.note_draft.pop();
                    }
                }
                UiEffect::None
            }
            UiCommand::ShareRecord { fallback } => {
                if notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.insert_fallback(fallback);
                    }
                    UiEffect::None
                } else {
                    self.open_consent_for_current_record()
                }
            }
            UiCommand::Activate => {
                if notes_focused {
                    UiEffect::None
                } else if self
                    .detail
                    .as_ref()
                    .map(|detail| detail.selected_action == SHARE_ACTION_INDEX)
                    .unwrap_or(false)
                {
                    self.open_consent_for_current_record()
                } else {
                    UiEffect::None
                }
            }
            UiCommand::MoveSelectionLeft => {
                if !notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.selected_action = detail.selected_action.saturating_sub(1);
                    }
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionRight => {
                if !notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.selected_action =
                            (detail.selected_action + 1).min(DETAIL_ACTIONS.len() - 1);
                    }
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionUp => {
                if !notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.selected_action = detail.selected_action.saturating_sub(2);
                    }
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionDown => {
                if !notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.selected_action =
                            (detail.selected_action + 2).min(DETAIL_ACTIONS.len() - 1);
                    }
                }
                UiEffect::None
            }
            UiCommand::ToggleItem { fallback }
            | UiCommand::OpenUpload { fallback }
            | UiCommand::GenerateQr { fallback }
            | UiCommand::CopyShareLink { fallback }
            | UiCommand::ToggleEmergencyQr { fallback }
            | UiCommand::SelectTab { fallback, .. } => {
                if notes_focused {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.insert_fallback(fallback);
                    }
                }
                UiEffect::None
            }
            _ => UiEffect::None,
        }
    }

    fn open_consent_for_current_record(&mut self) -> UiEffect {
        let record = self
            .detail
            .as_ref()
            .and_then(|detail| self.records.record(detail.record_id));
        if let Some(record) = record {
            self.consent = Some(ConsentState::new(record.title, record.date));
            self.modal = ActiveModal::Consent;
        }
        UiEffect::None
    }

    pub(super) fn render_detail(&self) -> DetailView {
        let state = self.detail.as_ref();
        let record =
            state.and_then(|detail| self.records.record(detail.record_id));

        DetailView {
            title: record.as_ref().map(|r| r.title.clone()).unwrap_or_default(),
            date: record.as_ref().map(|r| r.date.clone()).unwrap_or_default(),
            meta: record.as_ref().map(|r| r.meta.clone()).unwrap_or_default(),
            tag: record
                .as_ref()
                .map(|r| r.tag.label().to_string())
                .unwrap_or_default(),
            sections: record
                .map(|r| detail_sections(r.tag))
                .unwrap_or_default(),
            actions: DETAIL_ACTIONS.iter().map(|a| a.to_string()).collect(),
            selected_action: state.map(|detail| detail.selected_action),
            note_draft: state
                .map(|detail| detail.note_draft.clone())
                .unwrap_or_default(),
            notes_focused: state
                .map(|detail| detail.notes_focused)
                .unwrap_or(false),
        }
    }
}

/// Fixed detail template for a record category.
///
/// The tag is the only input: every record with the same tag shows the same
/// sections. Uploads have no template.
pub fn detail_sections(tag: RecordTag) -> Vec<DetailSection> {
    match tag {
        RecordTag::Lab => vec![
            section(
                "Test Results",
                vec![
                    measured("Hemoglobin", "14.2 g/dL", "12.0-16.0", "normal"),
                    measured("White Blood Cells", "7.8 K/uL", "4.0-11.0", "normal"),
                    measured("Platelets", "285 K/uL", "150-450", "normal"),
                    measured("Glucose", "95 mg/dL", "70-100", "normal"),
                ],
            ),
            section(
                "Laboratory Information",
                vec![
                    plain("Lab", "Lab ABC Medical Center"),
                    plain("Technician", "Maria Rodriguez, MLT"),
                    plain("Ordered by", "Dr. Lopez"),
                    plain("Collection Date", "12 AUG 2025, 08:30 AM"),
                ],
            ),
        ],
        RecordTag::Note => vec![
            section(
                "Consultation Notes",
                vec![
                    plain("Chief Complaint", "Seasonal allergies, nasal congestion"),
                    plain("Diagnosis", "Allergic rhinitis (ICD-10: J30.9)"),
                    plain("Treatment Plan", "Antihistamine therapy, nasal spray"),
                    plain("Follow-up", "Return in 2 weeks if symptoms persist"),
                ],
            ),
            section(
                "Vital Signs",
                vec![
                    status_only("Blood Pressure", "118/76 mmHg", "normal"),
                    status_only("Heart Rate", "72 bpm", "normal"),
                    status_only("Temperature", "98.6°F", "normal"),
                    status_only("Weight", "65 kg", "normal"),
                ],
            ),
            section(
                "Provider Information",
                vec![
                    plain("Doctor", "Dr. Carlos Lopez, MD"),
                    plain("Specialty", "Internal Medicine"),
                    plain("Hospital", "HMG Medical Center"),
                    plain("Date", "03 AUG 2025, 10:00 AM"),
                ],
            ),
        ],
        RecordTag::Imaging => vec![
            section(
                "Imaging Results",
                vec![
                    plain("Study Type", "Chest X-ray (PA and Lateral)"),
                    plain("Findings", "Normal lung fields, no acute abnormalities"),
                    plain("Impression", "Normal chest radiograph"),
                    plain("Recommendation", "No further imaging needed at this time"),
                ],
            ),
            section(
                "Technical Details",
                vec![
                    plain("Modality", "Digital Radiography"),
                    plain("Protocol", "Standard chest 2-view"),
                    plain("Contrast", "None"),
                    plain("Radiation Dose", "0.02 mSv"),
                ],
            ),
            section(
                "Provider Information",
                vec![
                    plain("Radiologist", "Dr. Ana Martinez, MD"),
                    plain("Technologist", "Roberto Silva, RT"),
                    plain("Facility", "HMG Hospital Imaging"),
                    plain("Date", "20 JUL 2025, 02:30 PM"),
                ],
            ),
        ],
        RecordTag::Upload => Vec::new(),
    }
}

fn section(title: &str, rows: Vec<DetailRow>) -> DetailSection {
    DetailSection {
        title: title.to_string(),
        rows,
    }
}

fn plain(label: &str, value: &str) -> DetailRow {
    DetailRow {
        label: label.to_string(),
        value: value.to_string(),
        range: None,
        status: None,
    }
}

fn measured(label: &str, value: &str, range: &str, status: &str) -> DetailRow {
    DetailRow {
        label: label.to_string(),
        value: value.to_string(),
        range: Some(range.to_string()),
        status: Some(status.to_string()),
    }
}

fn status_only(label: &str, value: &str, status: &str) -> DetailRow {
    DetailRow {
        label: label.to_string(),
        value: value.to_string(),
        range: None,
        status: Some(status.to_string()),
    }
}
