//! Application user interface runtime.
//!
//! The UI module owns the navigation state machine, translates key input
//! into high level commands, and produces renderable frames for the terminal
//! front-end. Side effects (QR encoding, wallet pairing, backend exchanges)
//! never happen here: handlers return [`UiEffect`] values the system layer
//! executes, and completions flow back through the runtime's `register_*`
//! methods. That split keeps every screen and dialog testable without a
//! terminal, a network, or a wallet.

pub mod data;
pub mod input;
pub mod render;
pub mod state;

pub use data::{sample_files, seed_records, FileCandidate, InMemoryRecords, RecordStore};
pub use input::{KeyEvent, KeyModifiers, Keymap, PhysicalKey, UiCommand};
pub use render::{
    ConsentFocus, ConsentPhase, ConsentView, DetailRow, DetailSection, DetailView, DoctorChoice,
    DurationChoice, EmergencyCard, FileChoice, Frame, HeaderView, HintBar, HintItem, HomeSection,
    HomeView, ModalContent, ProfileCard, QuickAction, QuickActionsRow, ScopeChoice, ShareCard,
    ShareToggle, StatusBar, TabBar, TimelineItem, TimelineList, UploadFocus, UploadPhase,
    UploadView, ViewContent,
};
#[cfg(any(test, feature = "ui-tests"))]
pub use state::fixtures;
pub use state::{ActiveModal, UiEffect, UiRuntime, UiScreen};
