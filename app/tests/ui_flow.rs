//! End-to-end flows through the real system layer: UI runtime plus the
//! simulated backend and wallet, no terminal attached.

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

use app::backend::SimulatedBackend;
use app::system::{AppSystem, SystemOutcome};
use app::time::{FixedClock, NoopDelay};
use app::ui::{
    sample_files, ConsentPhase, InMemoryRecords, ModalContent, UiCommand, UiRuntime, UploadPhase,
};
use app::wallet::{SimulatedWallet, WalletEvent};
use shared::model::RecordTag;

// 2025-08-12 00:00:00 UTC.
const NOW_MS: u64 = 1_754_956_800_000;

fn build() -> (UiRuntime, AppSystem) {
    let mut ui = UiRuntime::new(Box::new(InMemoryRecords::seeded()), sample_files());
    ui.sync_time(NOW_MS);

    let system = AppSystem::new(
        Box::new(SimulatedBackend::new(
            ChaCha20Rng::from_seed([21u8; 32]),
            NoopDelay,
        )),
        Box::new(SimulatedWallet::new(
            ChaCha20Rng::from_seed([22u8; 32]),
            NoopDelay,
        )),
        Box::new(FixedClock(NOW_MS)),
    )
    .with_rng(ChaCha20Rng::from_seed([23u8; 32]));

    (ui, system)
}

fn drive(ui: &mut UiRuntime, system: &mut AppSystem, command: UiCommand) {
    let effect = ui.apply_command(command);
    system.dispatch(ui, effect);
}

#[test]
fn uploading_report_pdf_appends_one_upload_record() {
    let (mut ui, mut system) = build();
    let before = ui.records();
    assert_eq!(before.len(), 3);

    // Open the upload dialog, pair the wallet, pick report.pdf, submit.
    drive(&mut ui, &mut system, UiCommand::OpenUpload { fallback: None });
    drive(&mut ui, &mut system, UiCommand::Activate);
    drive(&mut ui, &mut system, UiCommand::Activate);
    drive(&mut ui, &mut system, UiCommand::NextWidget);
    drive(&mut ui, &mut system, UiCommand::Activate);

    let after = ui.records();
    assert_eq!(after.len(), 4);
    let newest = &after[0];
    assert_eq!(newest.tag, RecordTag::Upload);
    assert_eq!(newest.title, "report");
    assert_eq!(newest.date, "12 AUG 2025");
    assert!(before.iter().all(|record| record.id != newest.id));

    match ui.render().modal {
        Some(ModalContent::Upload(view)) => {
            assert_eq!(view.phase, UploadPhase::Complete);
            let message = view.complete_message.expect("completion message");
            assert!(message.contains("Record ID:"));
        }
        other => panic!("expected upload modal, got {other:?}"),
    }

    // The dialog closes on its own and the record stays.
    ui.tick(2_000);
    assert!(ui.render().modal.is_none());
    assert_eq!(ui.records().len(), 4);
}

#[test]
fn consent_grant_round_trips_through_the_simulated_exchange() {
    let (mut ui, mut system) = build();

    // Open the first record, then its consent dialog.
    drive(&mut ui, &mut system, UiCommand::Activate);
    drive(
        &mut ui,
        &mut system,
        UiCommand::ShareRecord {
            fallback: Some('s'),
        },
    );

    // Pick the first doctor and grant with the preset scope and duration.
    drive(&mut ui, &mut system, UiCommand::Activate);
    drive(&mut ui, &mut system, UiCommand::PreviousWidget);
    drive(&mut ui, &mut system, UiCommand::Activate);

    match ui.render().modal {
        Some(ModalContent::Consent(view)) => {
            assert_eq!(view.phase, ConsentPhase::Complete);
            let message = view.complete_message.expect("complete message");
            assert!(message.contains("Dr. Carlos Lopez"));
            assert!(message.contains("24 hours"));
        }
        other => panic!("expected consent modal, got {other:?}"),
    }

    ui.tick(2_000);
    assert!(ui.render().modal.is_none());
    // Granting never touches the record list.
    assert_eq!(ui.records().len(), 3);
}

#[test]
fn share_qr_generation_uses_the_live_settings_snapshot() {
    let (mut ui, mut system) = build();
    drive(&mut ui, &mut system, UiCommand::GenerateQr { fallback: None });

    match ui.render().content {
        app::ui::ViewContent::Home(home) => {
            let qr = home.share.qr.expect("share QR after generation");
            assert!(qr.lines().count() > 4);
        }
        other => panic!("expected home view, got {other:?}"),
    }
}

#[test]
fn chain_change_forces_a_session_reload() {
    let (mut ui, mut system) = build();
    assert_eq!(
        system.handle_wallet_event(&mut ui, WalletEvent::ChainChanged(137)),
        SystemOutcome::Reload
    );
    assert_eq!(
        system.handle_wallet_event(&mut ui, WalletEvent::AccountsChanged(Vec::new())),
        SystemOutcome::Continue
    );
}
