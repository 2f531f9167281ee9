use shared::model::{display_clock, PatientProfile, ShareSettings};
use shared::schema::ConsentRequest;

use super::data::{FileCandidate, RecordStore};
use super::input::{KeyEvent, Keymap, UiCommand};
use super::render::{Frame, ModalContent, StatusBar, ViewContent};

use consent::ConsentState;
use detail::DetailState;
use home::HomeState;
use upload::UploadState;

mod consent;
mod detail;
mod home;
mod upload;
mod widgets;

/// Completed dialogs linger this long before closing themselves.
pub(super) const DIALOG_AUTOCLOSE_MS: u64 = 2_000;

/// Base screens supported by the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiScreen {
    Home,
    RecordDetail,
}

/// Modal overlay layered above the active base screen.
///
/// Each dialog is a singleton: while one is active no second consent or
/// upload flow can start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Consent,
    Upload,
}

/// Message emitted when the UI requests a side effect.
///
/// Effects are executed by the system layer; their completions come back
/// through the runtime's `register_*` methods. There is no cancellation: an
/// effect whose dialog was dismissed still completes and still lands.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum UiEffect {
    #[default]
    None,
    GenerateShareQr {
        permissions: ShareSettings,
    },
    EncodeEmergencyQr {
        payload: String,
    },
    CopyShareLink,
    RequestConsent {
        request: ConsentRequest,
    },
    ConnectWallet,
    UploadRecord {
        file: FileCandidate,
        patient: String,
    },
}

/// Aggregate runtime for navigation, dialogs, and rendering.
pub struct UiRuntime {
    screen: UiScreen,
    modal: ActiveModal,
    keymap: Keymap,
    home: HomeState,
    detail: Option<DetailState>,
    consent: Option<ConsentState>,
    upload: Option<UploadState>,
    records: Box<dyn RecordStore>,
    files: Vec<FileCandidate>,
    profile: PatientProfile,
    notice: Option<String>,
    show_hints: bool,
    now_ms: u64,
}

impl UiRuntime {
    /// Construct a runtime backed by the provided record store and upload
    /// picker candidates.
    pub fn new(records: Box<dyn RecordStore>, files: Vec<FileCandidate>) -> Self {
        Self {
            screen: UiScreen::Home,
            modal: ActiveModal::None,
            keymap: Keymap::default(),
            home: HomeState::new(),
            detail: None,
            consent: None,
            upload: None,
            records,
            files,
            profile: PatientProfile::demo(),
            notice: None,
            show_hints: true,
            now_ms: 0,
        }
    }

    pub fn screen(&self) -> UiScreen {
        self.screen
    }

    pub fn modal(&self) -> ActiveModal {
        self.modal
    }

    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    /// Current timeline snapshot, newest first.
    pub fn records(&self) -> Vec<shared::model::RecordSummary> {
        self.records.records()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Access the mutable keymap for custom bindings.
    pub fn keymap_mut(&mut self) -> &mut Keymap {
        &mut self.keymap
    }

    /// Align the runtime with the wall clock.
    pub fn sync_time(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Advance dialog auto-close timers.
    pub fn tick(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
        self.tick_consent(elapsed_ms);
        self.tick_upload(elapsed_ms);
    }

    /// Handle a raw key event.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> UiEffect {
        if let Some(command) = self.keymap.resolve(&event) {
            self.apply_command(command)
        } else {
            UiEffect::None
        }
    }

    /// Apply a high level command to the state machine.
    ///
    /// Any pending notice is dismissed by the next interaction, mirroring a
    /// blocking alert being acknowledged.
    pub fn apply_command(&mut self, command: UiCommand) -> UiEffect {
        self.notice = None;
        match command {
            UiCommand::ToggleHints => {
                self.show_hints = !self.show_hints;
                UiEffect::None
            }
            other => self.route_command(other),
        }
    }

    fn route_command(&mut self, command: UiCommand) -> UiEffect {
        match self.modal {
            ActiveModal::Consent => self.handle_consent(command),
            ActiveModal::Upload => self.handle_upload(command),
            ActiveModal::None => match self.screen {
                UiScreen::Home => self.handle_home(command),
                UiScreen::RecordDetail => self.handle_detail(command),
            },
        }
    }

    /// Render the current UI frame.
    pub fn render(&self) -> Frame {
        let content = match self.screen {
            UiScreen::Home => ViewContent::Home(self.render_home()),
            UiScreen::RecordDetail => ViewContent::Detail(self.render_detail()),
        };

        let modal = match self.modal {
            ActiveModal::None => None,
            ActiveModal::Consent => self.render_consent().map(ModalContent::Consent),
            ActiveModal::Upload => self.render_upload().map(ModalContent::Upload),
        };

        Frame {
            status: StatusBar {
                clock: display_clock(self.now_ms),
                synced: true,
                battery_percent: 80,
            },
            content,
            modal,
            notice: self.notice.clone(),
            hint_bar: self.hint_bar(),
        }
    }
}

#[cfg(any(test, feature = "ui-tests"))]
pub mod fixtures;
