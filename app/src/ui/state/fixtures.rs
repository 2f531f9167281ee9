//! Test fixtures for driving the UI runtime without a terminal or network.

use std::cell::RefCell;
use std::collections::VecDeque;

use shared::model::ShareSettings;
use shared::schema::UploadResponse;

use crate::ui::data::{sample_files, InMemoryRecords};
use crate::ui::input::{KeyEvent, PhysicalKey, UiCommand};
use crate::ui::render::HomeSection;
use crate::wallet::WalletSession;

use super::{UiEffect, UiRuntime};

/// 2025-08-12 00:00:00 UTC; keeps rendered dates and expiries stable.
pub const FIXED_NOW_MS: u64 = 1_754_956_800_000;

/// Runtime seeded with the demo timeline and picker candidates.
pub fn build_runtime() -> UiRuntime {
    let mut ui = UiRuntime::new(Box::new(InMemoryRecords::seeded()), sample_files());
    ui.sync_time(FIXED_NOW_MS);
    ui
}

/// Scripted effect executor standing in for the system layer.
///
/// By default every effect completes immediately with canned data. The
/// `deferred` variant queues effects instead, letting tests land completions
/// after the dialog that requested them was dismissed.
pub struct SystemAdapter {
    defer: bool,
    qr_fails: bool,
    consent_failure: Option<String>,
    wallet_failure: Option<String>,
    upload_failure: Option<String>,
    queued: RefCell<VecDeque<UiEffect>>,
}

impl Default for SystemAdapter {
    fn default() -> Self {
        Self {
            defer: false,
            qr_fails: false,
            consent_failure: None,
            wallet_failure: None,
            upload_failure: None,
            queued: RefCell::new(VecDeque::new()),
        }
    }
}

impl SystemAdapter {
    /// Adapter that queues effects until `complete` is called.
    pub fn deferred() -> Self {
        Self {
            defer: true,
            ..Self::default()
        }
    }

    pub fn with_qr_failure(mut self) -> Self {
        self.qr_fails = true;
        self
    }

    pub fn with_consent_failure(mut self, message: &str) -> Self {
        self.consent_failure = Some(message.to_string());
        self
    }

    pub fn with_wallet_failure(mut self, message: &str) -> Self {
        self.wallet_failure = Some(message.to_string());
        self
    }

    pub fn with_upload_failure(mut self, message: &str) -> Self {
        self.upload_failure = Some(message.to_string());
        self
    }

    pub fn dispatch(&self, ui: &mut UiRuntime, effect: UiEffect) {
        if matches!(effect, UiEffect::None) {
            return;
        }
        if self.defer {
            self.queued.borrow_mut().push_back(effect);
            return;
        }
        self.execute(ui, effect);
    }

    /// Flush queued effects, landing their completions now.
    pub fn complete(&self, ui: &mut UiRuntime) {
        loop {
            let next = self.queued.borrow_mut().pop_front();
            match next {
                Some(effect) => self.execute(ui, effect),
                None => break,
            }
        }
    }

    fn execute(&self, ui: &mut UiRuntime, effect: UiEffect) {
        match effect {
            UiEffect::None => {}
            UiEffect::GenerateShareQr { .. } => {
                if !self.qr_fails {
                    ui.register_share_qr(String::from("▄▀ share-qr ▀▄"));
                }
            }
            UiEffect::EncodeEmergencyQr { .. } => {
                ui.register_emergency_qr(String::from("▄▀ emergency-qr ▀▄"));
            }
            UiEffect::CopyShareLink => {
                ui.register_link_copied(String::from("https://myhealth.app/share/fixturetoken"));
            }
            UiEffect::RequestConsent { .. } => match &self.consent_failure {
                Some(message) => ui.register_consent_failed(message),
                None => {
                    ui.register_consent_granted();
                }
            },
            UiEffect::ConnectWallet => match &self.wallet_failure {
                Some(message) => ui.register_wallet_failed(message),
                None => {
                    ui.register_pairing_qr(String::from("▄▀ pairing-qr ▀▄"));
                    ui.register_wallet_connected(WalletSession {
                        address: format!("0x{}", "ab".repeat(20)),
                        chain_id: 1,
                    });
                }
            },
            UiEffect::UploadRecord { file, .. } => match &self.upload_failure {
                Some(message) => ui.register_upload_failed(message),
                None => ui.register_upload_success(
                    &file,
                    &UploadResponse {
                        record_id: String::from("rec-4f9a1c2e77"),
                        content_hash: String::from(
                            "0x9c0ffee1face0000000000000000000000000000000000000000000000000000",
                        ),
                    },
                ),
            },
        }
    }
}

pub fn apply(ui: &mut UiRuntime, adapter: &SystemAdapter, command: UiCommand) {
    let effect = ui.apply_command(command);
    adapter.dispatch(ui, effect);
}

pub fn press(ui: &mut UiRuntime, adapter: &SystemAdapter, key: PhysicalKey) {
    let effect = ui.handle_key_event(KeyEvent::pressed(key));
    adapter.dispatch(ui, effect);
}

/// Open the upload dialog from the dashboard.
pub fn open_upload(ui: &mut UiRuntime, adapter: &SystemAdapter) {
    apply(ui, adapter, UiCommand::OpenUpload { fallback: None });
}

/// Open the first timeline record and its consent dialog.
pub fn open_consent(ui: &mut UiRuntime, adapter: &SystemAdapter) {
    apply(ui, adapter, UiCommand::Activate);
    apply(
        ui,
        adapter,
        UiCommand::ShareRecord {
            fallback: Some('s'),
        },
    );
}

/// Drive a full upload of the first picker candidate (`report.pdf`).
pub fn run_upload_of_first_file(ui: &mut UiRuntime, adapter: &SystemAdapter) {
    open_upload(ui, adapter);
    apply(ui, adapter, UiCommand::Activate);
    apply(ui, adapter, UiCommand::Activate);
    apply(ui, adapter, UiCommand::NextWidget);
    apply(ui, adapter, UiCommand::Activate);
}

pub fn share_settings(ui: &UiRuntime) -> ShareSettings {
    ui.home.share_settings
}

pub fn share_qr(ui: &UiRuntime) -> Option<String> {
    ui.home.share_qr.clone()
}

pub fn home_section(ui: &UiRuntime) -> HomeSection {
    ui.home.section
}
