use shared::model::{ShareField, ShareSettings};

use crate::ui::input::UiCommand;
use crate::ui::render::{
    EmergencyCard, HeaderView, HomeSection, HomeView, ProfileCard, QuickActionsRow, ShareCard,
    ShareToggle, TabBar, TimelineItem, TimelineList,
};

use super::{widgets, ActiveModal, UiEffect, UiRuntime, UiScreen};
use super::upload::UploadState;

/// Dashboard state: tab highlight, section focus, selections, share toggles,
/// and the cached QR images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct HomeState {
    pub active_tab: usize,
    pub section: HomeSection,
    pub selected_record: usize,
    pub selected_action: usize,
    pub selected_toggle: usize,
    pub share_settings: ShareSettings,
    pub share_qr: Option<String>,
    pub emergency_qr: Option<String>,
    pub emergency_shown: bool,
}

impl HomeState {
    pub(super) fn new() -> Self {
        Self {
            active_tab: 0,
            section: HomeSection::Timeline,
            selected_record: 0,
            selected_action: 0,
            selected_toggle: 0,
            share_settings: ShareSettings::default(),
            share_qr: None,
            emergency_qr: None,
            emergency_shown: false,
        }
    }
}

impl UiRuntime {
    pub(super) fn handle_home(&mut self, command: UiCommand) -> UiEffect {
        match command {
            UiCommand::MoveSelectionUp => {
                self.move_home_selection(-1);
                UiEffect::None
            }
            UiCommand::MoveSelectionDown => {
                self.move_home_selection(1);
                UiEffect::None
            }
            UiCommand::MoveSelectionLeft => {
                if self.home.section == HomeSection::QuickActions {
                    self.home.selected_action = self.home.selected_action.saturating_sub(1);
                }
                UiEffect::None
            }
            UiCommand::MoveSelectionRight => {
                if self.home.section == HomeSection::QuickActions {
                    let last = widgets::quick_actions().len() - 1;
                    self.home.selected_action = (self.home.selected_action + 1).min(last);
                }
                UiEffect::None
            }
            UiCommand::NextWidget => {
                self.home.section = match self.home.section {
                    HomeSection::Timeline => HomeSection::QuickActions,
                    HomeSection::QuickActions => HomeSection::ShareCard,
                    HomeSection::ShareCard => HomeSection::Timeline,
                };
                UiEffect::None
            }
            UiCommand::PreviousWidget => {
                self.home.section = match self.home.section {
                    HomeSection::Timeline => HomeSection::ShareCard,
                    HomeSection::QuickActions => HomeSection::Timeline,
                    HomeSection::ShareCard => HomeSection::QuickActions,
                };
                UiEffect::None
            }
            UiCommand::SelectTab { index, .. } => {
                self.home.active_tab = index.min(widgets::tab_labels().len() - 1);
                UiEffect::None
            }
            UiCommand::Activate => self.activate_home_section(),
            UiCommand::ToggleItem { .. } => {
                if self.home.section == HomeSection::ShareCard {
                    self.toggle_selected_share_flag();
                }
                UiEffect::None
            }
            UiCommand::GenerateQr { .. } | UiCommand::ShareRecord { .. } => self.share_qr_effect(),
            UiCommand::CopyShareLink { .. } => UiEffect::CopyShareLink,
            UiCommand::OpenUpload { .. } => self.open_upload_dialog(),
            UiCommand::ToggleEmergencyQr { .. } => self.toggle_emergency_card(),
            _ => UiEffect::None,
        }
    }

    fn move_home_selection(&mut self, delta: i64) {
        match self.home.section {
            HomeSection::Timeline => {
                let len = self.records.records().len();
                self.home.selected_record = step_index(self.home.selected_record, delta, len);
            }
            HomeSection::QuickActions => {
                let len = widgets::quick_actions().len();
                self.home.selected_action = step_index(self.home.selected_action, delta, len);
            }
            HomeSection::ShareCard => {
                self.home.selected_toggle =
                    step_index(self.home.selected_toggle, delta, ShareField::ALL.len());
            }
        }
    }

    fn activate_home_section(&mut self) -> UiEffect {
        match self.home.section {
            HomeSection::Timeline => {
                let records = self.records.records();
                if let Some(record) = records.get(self.home.selected_record) {
                    self.open_record(record.id);
                }
                UiEffect::None
            }
            HomeSection::QuickActions => match self.home.selected_action {
                0 | 1 => self.open_upload_dialog(),
                _ => self.share_qr_effect(),
            },
            HomeSection::ShareCard => {
                self.toggle_selected_share_flag();
                UiEffect::None
            }
        }
    }

    fn toggle_selected_share_flag(&mut self) {
        let field = ShareField::ALL[self.home.selected_toggle.min(ShareField::ALL.len() - 1)];
        self.home.share_settings.toggle(field);
    }

    fn share_qr_effect(&self) -> UiEffect {
        UiEffect::GenerateShareQr {
            permissions: self.home.share_settings,
        }
    }

    pub(super) fn open_upload_dialog(&mut self) -> UiEffect {
        self.upload = Some(UploadState::new(self.files.clone()));
        self.modal = ActiveModal::Upload;
        UiEffect::None
    }

    fn toggle_emergency_card(&mut self) -> UiEffect {
        self.home.emergency_shown = !self.home.emergency_shown;
        if self.home.emergency_shown && self.home.emergency_qr.is_none() {
            UiEffect::EncodeEmergencyQr {
                payload: self.emergency_payload(),
            }
        } else {
            UiEffect::None
        }
    }

    fn emergency_payload(&self) -> String {
        format!(
            "EMERGENCY • {} • CURP {} • Allergies: Penicillin • Blood type: O+",
            self.profile.name, self.profile.curp
        )
    }

    pub(super) fn open_record(&mut self, record_id: u64) {
        self.detail = Some(super::detail::DetailState::new(record_id));
        self.screen = UiScreen::RecordDetail;
    }

    /// Store a freshly encoded share QR. Encoding failures never reach this
    /// point, so a previous image survives them untouched.
    pub fn register_share_qr(&mut self, image: String) {
        self.home.share_qr = Some(image);
    }

    /// Store the encoded emergency-card QR.
    pub fn register_emergency_qr(&mut self, image: String) {
        self.home.emergency_qr = Some(image);
    }

    /// Surface the copied share link.
    pub fn register_link_copied(&mut self, _link: String) {
        self.notice = Some(String::from("Link copied to clipboard!"));
    }

    pub(super) fn render_home(&self) -> HomeView {
        let records = self.records.records();
        let items = records
            .iter()
            .map(|record| TimelineItem {
                date: record.date.clone(),
                title: record.title.clone(),
                meta: record.meta.clone(),
                tag: record.tag.label().to_string(),
            })
            .collect::<Vec<_>>();
        let selected = if items.is_empty() {
            None
        } else {
            Some(self.home.selected_record.min(items.len() - 1))
        };

        let toggles = ShareField::ALL
            .iter()
            .map(|field| ShareToggle {
                label: field.label().to_string(),
                enabled: self.home.share_settings.get(*field),
            })
            .collect();

        HomeView {
            header: HeaderView {
                app_name: String::from("Healthbook"),
                tagline: String::from("Your records, always at hand"),
                initials: self.profile.initials(),
            },
            emergency: EmergencyCard {
                summary: String::from("Allergies: Penicillin • Blood type: O+"),
                shown: self.home.emergency_shown,
                qr: if self.home.emergency_shown {
                    self.home.emergency_qr.clone()
                } else {
                    None
                },
            },
            profile: ProfileCard {
                patient: self.profile.name.clone(),
                curp: self.profile.curp.clone(),
                chips: vec![
                    String::from("Clinical summary"),
                    String::from("Medications"),
                    String::from("Labs"),
                ],
            },
            timeline: TimelineList { items, selected },
            quick_actions: QuickActionsRow {
                actions: widgets::quick_actions(),
                selected: Some(self.home.selected_action),
            },
            share: ShareCard {
                toggles,
                selected: Some(self.home.selected_toggle),
                expires_label: String::from("24 hours"),
                recipient: String::from("Dr. Lopez (HMG)"),
                qr: self.home.share_qr.clone(),
            },
            tabs: TabBar {
                labels: widgets::tab_labels(),
                active: self.home.active_tab,
            },
            focus: self.home.section,
        }
    }
}

fn step_index(current: usize, delta: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    if delta < 0 {
        current.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        (current + delta as usize).min(max)
    }
}
