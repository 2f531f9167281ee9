use shared::model::{display_date, RecordSummary, RecordTag};
use shared::schema::UploadResponse;

use crate::ui::data::FileCandidate;
use crate::ui::input::UiCommand;
use crate::ui::render::{FileChoice, UploadFocus, UploadPhase, UploadView};
use crate::wallet::{short_address, WalletSession};

use super::{ActiveModal, UiEffect, UiRuntime, DIALOG_AUTOCLOSE_MS};

/// Upload dialog state.
///
/// The connection and upload steps have no retry or cancellation: a dialog
/// dismissed mid-step keeps its state so the pending completion can land,
/// and a failure drops back to the previous step with a notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct UploadState {
    pub phase: UploadPhase,
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub pairing_qr: Option<String>,
    pub files: Vec<FileCandidate>,
    pub cursor: usize,
    pub selected_file: Option<usize>,
    pub focus: UploadFocus,
    pub record_id_short: Option<String>,
    pub close_in_ms: Option<u64>,
}

impl UploadState {
    pub(super) fn new(files: Vec<FileCandidate>) -> Self {
        Self {
            phase: UploadPhase::Disconnected,
            address: None,
            chain_id: None,
            pairing_qr: None,
            files,
            cursor: 0,
            selected_file: None,
            focus: UploadFocus::Files,
            record_id_short: None,
            close_in_ms: None,
        }
    }
}

impl UiRuntime {
    pub(super) fn handle_upload(&mut self, command: UiCommand) -> UiEffect {
        let phase = match self.upload.as_ref() {
            Some(state) => state.phase,
            None => return UiEffect::None,
        };

        match phase {
            UploadPhase::Disconnected => match command {
                UiCommand::Activate => {
                    if let Some(state) = self.upload.as_mut() {
                        state.phase = UploadPhase::Connecting;
                    }
                    UiEffect::ConnectWallet
                }
                UiCommand::Back => {
                    self.close_upload();
                    UiEffect::None
                }
                _ => UiEffect::None,
            },
            UploadPhase::Connecting | UploadPhase::Uploading => {
                if matches!(command, UiCommand::Back) {
                    // The pending exchange is not cancelled; only the overlay
                    // goes away. Its completion will land later.
                    self.modal = ActiveModal::None;
                }
                UiEffect::None
            }
            UploadPhase::Connected => self.handle_upload_connected(command),
            UploadPhase::Complete => {
                if matches!(command, UiCommand::Back | UiCommand::Activate) {
                    self.close_upload();
                }
                UiEffect::None
            }
        }
    }

    fn handle_upload_connected(&mut self, command: UiCommand) -> UiEffect {
        match command {
            UiCommand::Back => {
                self.close_upload();
                UiEffect::None
            }
            UiCommand::MoveSelectionUp => {
                if let Some(state) = self.upload.as_mut() {
                    state.cursor = state.cursor.saturating_sub(1);
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionDown => {
                if let Some(state) = self.upload.as_mut() {
                    if !state.files.is_empty() {
                        state.cursor = (state.cursor + 1).min(state.files.len() - 1);
                    }
                }
                UiEffect::None
            }
            UiCommand::NextWidget | UiCommand::PreviousWidget => {
                if let Some(state) = self.upload.as_mut() {
                    state.focus = match state.focus {
                        UploadFocus::Files => UploadFocus::Submit,
                        UploadFocus::Submit => UploadFocus::Files,
                    };
                }
                UiEffect::None
            }
            UiCommand::ToggleItem { .. } => {
                self.select_upload_file();
                UiEffect::None
            }
            UiCommand::Activate => {
                let focus = self
                    .upload
                    .as_ref()
                    .map(|state| state.focus)
                    .unwrap_or(UploadFocus::Files);
                match focus {
                    UploadFocus::Files => {
                        self.select_upload_file();
                        UiEffect::None
                    }
                    UploadFocus::Submit => self.start_upload(),
                }
            }
            _ => UiEffect::None,
        }
    }

    fn select_upload_file(&mut self) {
        let mut rejected = false;
        if let Some(state) = self.upload.as_mut() {
            if let Some(file) = state.files.get(state.cursor) {
                if file.is_pdf() {
                    state.selected_file = Some(state.cursor);
                } else {
                    rejected = true;
                }
            }
        }
        if rejected {
            self.notice = Some(String::from("Please select a PDF file only."));
        }
    }

    fn start_upload(&mut self) -> UiEffect {
        let (file, patient) = match self.upload.as_ref() {
            Some(state) => {
                let file = state
                    .selected_file
                    .and_then(|index| state.files.get(index))
                    .cloned();
                match file {
                    Some(file) => (file, state.address.clone().unwrap_or_default()),
                    None => {
                        self.notice = Some(String::from("Please select a PDF file first."));
                        return UiEffect::None;
                    }
                }
            }
            None => return UiEffect::None,
        };

        if let Some(state) = self.upload.as_mut() {
            state.phase = UploadPhase::Uploading;
        }
        UiEffect::UploadRecord { file, patient }
    }

    fn close_upload(&mut self) {
        self.upload = None;
        self.modal = ActiveModal::None;
    }

    pub(super) fn tick_upload(&mut self, elapsed_ms: u64) {
        let mut close = false;
        if let Some(state) = self.upload.as_mut() {
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
            self.close_upload();
        }
    }

    /// Store the pairing QR displayed while the wallet connection runs.
    pub fn register_pairing_qr(&mut self, image: String) {
        if let Some(state) = self.upload.as_mut() {
            state.pairing_qr = Some(image);
        }
    }

    /// Land a successful wallet connection.
    pub fn register_wallet_connected(&mut self, session: WalletSession) {
        let mut reopen = false;
        if let Some(state) = self.upload.as_mut() {
            if state.phase == UploadPhase::Connecting {
                state.phase = UploadPhase::Connected;
                state.address = Some(session.address);
                state.chain_id = Some(session.chain_id);
                reopen = true;
            }
        }
        if reopen {
            self.modal = ActiveModal::Upload;
        }
    }

    /// Land a failed wallet connection: notice and back to disconnected.
    pub fn register_wallet_failed(&mut self, message: &str) {
        if let Some(state) = self.upload.as_mut() {
            if state.phase == UploadPhase::Connecting {
                state.phase = UploadPhase::Disconnected;
                state.pairing_qr = None;
            }
        }
        self.notice = Some(format!("Error connecting wallet: {message}"));
    }

    /// Land a completed upload.
    ///
    /// The synthesized record is appended even when the dialog was dismissed
    /// mid-upload, and the success state re-opens against the dismissed
    /// instance. That is the mockup's stale-callback behavior, kept on
    /// purpose.
    pub fn register_upload_success(&mut self, file: &FileCandidate, response: &UploadResponse) {
        let id = self.records.allocate_id();
        let record = RecordSummary {
            id,
            date: display_date(self.now_ms),
            title: file.stem(),
            meta: format!("PDF • {} • Wallet upload", file.size_label()),
            tag: RecordTag::Upload,
        };
        self.records.insert_front(record);

        let mut reopen = false;
        if let Some(state) = self.upload.as_mut() {
            if state.phase == UploadPhase::Uploading {
                state.phase = UploadPhase::Complete;
                state.record_id_short =
                    Some(response.record_id.chars().take(8).collect::<String>());
                state.close_in_ms = Some(DIALOG_AUTOCLOSE_MS);
                reopen = true;
            }
        }
        if reopen {
            self.modal = ActiveModal::Upload;
        }
    }

    /// Land a failed upload: notice and back to the connected picker.
    pub fn register_upload_failed(&mut self, message: &str) {
        if let Some(state) = self.upload.as_mut() {
            if state.phase == UploadPhase::Uploading {
                state.phase = UploadPhase::Connected;
            }
        }
        self.notice = Some(format!("Upload failed: {message}"));
    }

    /// Apply a wallet accounts-changed notification.
    ///
    /// An empty account list drops the dialog back to disconnected; a
    /// non-empty one swaps the stored address in place.
    pub fn register_accounts_changed(&mut self, accounts: &[String]) {
        if let Some(state) = self.upload.as_mut() {
            match accounts.first() {
                None => {
                    state.phase = UploadPhase::Disconnected;
                    state.address = None;
                    state.chain_id = None;
                    state.selected_file = None;
                    state.pairing_qr = None;
                }
                Some(address) => {
                    if state.address.is_some() {
                        state.address = Some(address.clone());
                    }
                }
            }
        }
    }

    pub(super) fn render_upload(&self) -> Option<UploadView> {
        let state = self.upload.as_ref()?;

        let files = state
            .files
            .iter()
            .enumerate()
            .map(|(index, file)| FileChoice {
                name: file.name.clone(),
                size_label: file.size_label(),
                selected: state.selected_file == Some(index),
            })
            .collect();

        let complete_message = if state.phase == UploadPhase::Complete {
            state.record_id_short.as_ref().map(|short| {
                format!("File uploaded successfully! Record ID: {short}…")
            })
        } else {
            None
        };

        Some(UploadView {
            phase: state.phase,
            address: state.address.as_deref().map(short_address),
            chain_id: state.chain_id,
            pairing_qr: state.pairing_qr.clone(),
            files,
            cursor: state.cursor,
            focus: state.focus,
            complete_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use shared::model::RecordTag;

    use crate::ui::input::UiCommand;
    use crate::ui::render::{ModalContent, UploadPhase};
    use crate::ui::state::fixtures;
    use crate::ui::state::ActiveModal;

    fn upload_view(ui: &crate::ui::state::UiRuntime) -> crate::ui::render::UploadView {
        match ui.render().modal {
            Some(ModalContent::Upload(view)) => view,
            other => panic!("expected upload modal, got {other:?}"),
        }
    }

    #[test]
    fn connect_walks_through_the_pairing_flow() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_upload(&mut ui, &adapter);
        assert_eq!(upload_view(&ui).phase, UploadPhase::Disconnected);

        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        let view = upload_view(&ui);
        assert_eq!(view.phase, UploadPhase::Connected);
        assert_eq!(view.address.as_deref(), Some("0xabab…abab"));
        assert_eq!(view.chain_id, Some(1));
    }

    #[test]
    fn simulated_upload_appends_exactly_one_record() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        let before = ui.records();
        assert_eq!(before.len(), 3);

        fixtures::run_upload_of_first_file(&mut ui, &adapter);

        let after = ui.records();
        assert_eq!(after.len(), 4);
        let newest = &after[0];
        assert_eq!(newest.tag, RecordTag::Upload);
        assert_eq!(newest.title, "report");
        assert!(before.iter().all(|r| r.id != newest.id));

        // Auto-close returns to the dashboard.
        ui.tick(2_000);
        assert_eq!(ui.modal(), ActiveModal::None);
        assert_eq!(ui.records().len(), 4);
    }

    #[test]
    fn non_pdf_selection_is_rejected_without_state_change() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_upload(&mut ui, &adapter);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);

        // vacation.png is the third candidate.
        fixtures::apply(&mut ui, &adapter, UiCommand::MoveSelectionDown);
        fixtures::apply(&mut ui, &adapter, UiCommand::MoveSelectionDown);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);

        assert_eq!(ui.notice(), Some("Please select a PDF file only."));
        assert!(upload_view(&ui).files.iter().all(|f| !f.selected));
        assert_eq!(upload_view(&ui).phase, UploadPhase::Connected);
    }

    #[test]
    fn submitting_without_a_selection_is_blocked() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_upload(&mut ui, &adapter);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        fixtures::apply(&mut ui, &adapter, UiCommand::NextWidget);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        assert_eq!(ui.notice(), Some("Please select a PDF file first."));
        assert_eq!(upload_view(&ui).phase, UploadPhase::Connected);
    }

    #[test]
    fn failed_upload_returns_to_the_picker_with_a_notice() {
        let mut ui = fixtures::build_runtime();
        let failing = fixtures::SystemAdapter::default().with_upload_failure("HTTP error! status: 500");
        fixtures::open_upload(&mut ui, &failing);
        fixtures::apply(&mut ui, &failing, UiCommand::Activate);
        fixtures::apply(&mut ui, &failing, UiCommand::Activate);
        fixtures::apply(&mut ui, &failing, UiCommand::NextWidget);
        fixtures::apply(&mut ui, &failing, UiCommand::Activate);

        assert_eq!(ui.records().len(), 3);
        assert_eq!(
            ui.notice(),
            Some("Upload failed: HTTP error! status: 500")
        );
        assert_eq!(upload_view(&ui).phase, UploadPhase::Connected);
    }

    #[test]
    fn stale_upload_completion_lands_after_dismissal() {
        let mut ui = fixtures::build_runtime();
        let deferred = fixtures::SystemAdapter::deferred();
        fixtures::open_upload(&mut ui, &deferred);

        // Connect synchronously first, then defer the upload completion.
        let eager = fixtures::SystemAdapter::default();
        fixtures::apply(&mut ui, &eager, UiCommand::Activate);
        fixtures::apply(&mut ui, &deferred, UiCommand::Activate);
        fixtures::apply(&mut ui, &deferred, UiCommand::NextWidget);
        fixtures::apply(&mut ui, &deferred, UiCommand::Activate);
        assert_eq!(upload_view(&ui).phase, UploadPhase::Uploading);

        fixtures::apply(&mut ui, &deferred, UiCommand::Back);
        assert_eq!(ui.modal(), ActiveModal::None);
        assert_eq!(ui.records().len(), 3);

        deferred.complete(&mut ui);
        assert_eq!(ui.modal(), ActiveModal::Upload);
        assert_eq!(upload_view(&ui).phase, UploadPhase::Complete);
        assert_eq!(ui.records().len(), 4);
    }

    #[test]
    fn empty_accounts_notification_disconnects_the_dialog() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();
        fixtures::open_upload(&mut ui, &adapter);
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        assert_eq!(upload_view(&ui).phase, UploadPhase::Connected);

        ui.register_accounts_changed(&[]);
        assert_eq!(upload_view(&ui).phase, UploadPhase::Disconnected);
        assert!(upload_view(&ui).address.is_none());

        // A fresh account swaps in place once reconnected.
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        ui.register_accounts_changed(&[String::from(
            "0x9f2d4c8e7b1a5f3e6d9c8b7a6f5e4d3c2b1a0987",
        )]);
        assert_eq!(upload_view(&ui).address.as_deref(), Some("0x9f2d…0987"));
    }
}
