use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use shared::error::AppError;
use shared::model::PatientProfile;
use shared::schema::{UploadRequest, UploadResponse};
use shared::share::{self, SharePayload};

use crate::backend::RecordsBackend;
use crate::qr::{self, QrOptions};
use crate::time::Clock;
use crate::ui::data::FileCandidate;
use crate::ui::{UiEffect, UiRuntime};
use crate::wallet::{WalletEvent, WalletProvider};

/// Result of draining wallet notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemOutcome {
    Continue,
    /// A chain change arrived; the caller rebuilds the whole runtime, the
    /// app's stand-in for a page reload.
    Reload,
}

/// Executes the effects the UI requests and feeds completions back.
///
/// Everything runs sequentially on the caller's thread: an effect's
/// completion is registered before the next command is processed, and a
/// dismissed dialog's pending completion still lands.
pub struct AppSystem {
    backend: Box<dyn RecordsBackend>,
    wallet: Box<dyn WalletProvider>,
    clock: Box<dyn Clock>,
    rng: ChaCha20Rng,
    profile: PatientProfile,
    qr_options: QrOptions,
}

impl AppSystem {
    pub fn new(
        backend: Box<dyn RecordsBackend>,
        wallet: Box<dyn WalletProvider>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            wallet,
            clock,
            rng: ChaCha20Rng::from_entropy(),
            profile: PatientProfile::demo(),
            qr_options: QrOptions::default(),
        }
    }

    /// Replace the token/link RNG, mainly for deterministic tests.
    pub fn with_rng(mut self, rng: ChaCha20Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Execute a single UI effect and register its completion.
    pub fn dispatch(&mut self, ui: &mut UiRuntime, effect: UiEffect) {
        match effect {
            UiEffect::None => {}
            UiEffect::GenerateShareQr { permissions } => {
                let payload = SharePayload::new(
                    &self.profile,
                    permissions,
                    self.clock.now_ms(),
                    &mut self.rng,
                );
                let encoded = payload
                    .to_json()
                    .and_then(|json| qr::encode(&json, &self.qr_options));
                match encoded {
                    Ok(image) => ui.register_share_qr(image),
                    // Silent degradation: the previous QR stays on screen.
                    Err(err) => log::warn!("share QR encoding failed: {err}"),
                }
            }
            UiEffect::EncodeEmergencyQr { payload } => {
                match qr::encode(&payload, &self.qr_options) {
                    Ok(image) => ui.register_emergency_qr(image),
                    Err(err) => log::warn!("emergency QR encoding failed: {err}"),
                }
            }
            UiEffect::CopyShareLink => {
                let link = share::share_link(&share::generate_token(&mut self.rng));
                log::info!("share link ready: {link}");
                ui.register_link_copied(link);
            }
            UiEffect::RequestConsent { request } => match self.backend.grant_consent(&request) {
                Ok(response) if response.success => {
                    if let Some(receipt) = ui.register_consent_granted() {
                        log::info!(
                            "consent granted: doctor={} scope={} expiry={}",
                            receipt.doctor.name,
                            receipt.scope.wire_value(),
                            request.expiry
                        );
                    }
                }
                Ok(_) => ui.register_consent_failed("exchange reported failure"),
                Err(err) => {
                    log::error!("consent exchange failed: {err}");
                    ui.register_consent_failed(&err.to_string());
                }
            },
            UiEffect::ConnectWallet => {
                if let Some(uri) = self.wallet.pairing_uri() {
                    match qr::encode(&uri, &self.qr_options) {
                        Ok(image) => ui.register_pairing_qr(image),
                        Err(err) => log::warn!("pairing QR encoding failed: {err}"),
                    }
                }
                match self.wallet.connect() {
                    Ok(session) => ui.register_wallet_connected(session),
                    Err(err) => {
                        log::error!("wallet connection failed: {err}");
                        ui.register_wallet_failed(&err.to_string());
                    }
                }
            }
            UiEffect::UploadRecord { file, patient } => {
                match self.perform_upload(&file, &patient) {
                    Ok(response) => {
                        log::info!(
                            "upload complete: record={} hash={}",
                            response.record_id,
                            response.content_hash
                        );
                        ui.register_upload_success(&file, &response);
                    }
                    Err(err) => {
                        log::error!("upload failed: {err}");
                        ui.register_upload_failed(&err.to_string());
                    }
                }
            }
        }
    }

    fn perform_upload(
        &mut self,
        file: &FileCandidate,
        patient: &str,
    ) -> Result<UploadResponse, AppError> {
        let bytes = match &file.path {
            Some(path) => std::fs::read(path)?,
            None => Vec::new(),
        };
        let request = UploadRequest::from_bytes(patient, &bytes);
        self.backend.upload(&request)
    }

    /// Drain pending wallet notifications into the runtime.
    pub fn poll_wallet(&mut self, ui: &mut UiRuntime) -> SystemOutcome {
        while let Some(event) = self.wallet.poll_event() {
            if self.handle_wallet_event(ui, event) == SystemOutcome::Reload {
                return SystemOutcome::Reload;
            }
        }
        SystemOutcome::Continue
    }

    /// Apply one wallet notification.
    ///
    /// Account changes update in place; a chain change is not handled
    /// incrementally at all, the whole app reloads instead.
    pub fn handle_wallet_event(&mut self, ui: &mut UiRuntime, event: WalletEvent) -> SystemOutcome {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                ui.register_accounts_changed(&accounts);
                SystemOutcome::Continue
            }
            WalletEvent::ChainChanged(chain_id) => {
                log::info!("chain changed to {chain_id}; reloading app state");
                SystemOutcome::Reload
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use crate::backend::SimulatedBackend;
    use crate::time::{FixedClock, NoopDelay};
    use crate::ui::fixtures;
    use crate::ui::input::UiCommand;
    use crate::ui::render::{ModalContent, UploadPhase};
    use crate::ui::{ActiveModal, UiRuntime};
    use crate::wallet::{SimulatedWallet, WalletEvent};

    use super::{AppSystem, SystemOutcome};

    fn build_system() -> AppSystem {
        AppSystem::new(
            Box::new(SimulatedBackend::new(
                ChaCha20Rng::from_seed([11u8; 32]),
                NoopDelay,
            )),
            Box::new(SimulatedWallet::new(
                ChaCha20Rng::from_seed([12u8; 32]),
                NoopDelay,
            )),
            Box::new(FixedClock(fixtures::FIXED_NOW_MS)),
        )
        .with_rng(ChaCha20Rng::from_seed([13u8; 32]))
    }

    fn drive(ui: &mut UiRuntime, system: &mut AppSystem, command: UiCommand) {
        let effect = ui.apply_command(command);
        system.dispatch(ui, effect);
    }

    #[test]
    fn share_qr_effect_lands_an_encoded_image() {
        let mut ui = fixtures::build_runtime();
        let mut system = build_system();
        drive(&mut ui, &mut system, UiCommand::GenerateQr { fallback: None });
        let image = fixtures::share_qr(&ui).expect("encoded share QR");
        assert!(image.lines().count() > 4);
    }

    #[test]
    fn wallet_connection_flows_through_the_real_provider() {
        let mut ui = fixtures::build_runtime();
        let mut system = build_system();
        drive(&mut ui, &mut system, UiCommand::OpenUpload { fallback: None });
        drive(&mut ui, &mut system, UiCommand::Activate);

        let frame = ui.render();
        match frame.modal {
            Some(ModalContent::Upload(view)) => {
                assert_eq!(view.phase, UploadPhase::Connected);
                let address = view.address.expect("short address");
                assert!(address.starts_with("0x"));
                assert!(address.contains('…'));
            }
            other => panic!("expected upload modal, got {other:?}"),
        }
    }

    #[test]
    fn chain_change_requests_a_full_reload() {
        let mut ui = fixtures::build_runtime();
        let mut system = build_system();
        let outcome = system.handle_wallet_event(&mut ui, WalletEvent::ChainChanged(137));
        assert_eq!(outcome, SystemOutcome::Reload);
    }

    #[test]
    fn account_change_updates_state_without_reload() {
        let mut ui = fixtures::build_runtime();
        let mut system = build_system();
        drive(&mut ui, &mut system, UiCommand::OpenUpload { fallback: None });
        drive(&mut ui, &mut system, UiCommand::Activate);

        let outcome =
            system.handle_wallet_event(&mut ui, WalletEvent::AccountsChanged(Vec::new()));
        assert_eq!(outcome, SystemOutcome::Continue);
        match ui.render().modal {
            Some(ModalContent::Upload(view)) => {
                assert_eq!(view.phase, UploadPhase::Disconnected);
            }
            other => panic!("expected upload modal, got {other:?}"),
        }
        assert_eq!(ui.modal(), ActiveModal::Upload);
    }
}
