use crate::ui::render::{HintBar, HintItem, QuickAction, UploadPhase};

use super::{ActiveModal, UiRuntime, UiScreen};

pub(super) fn quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction {
            label: String::from("Scan"),
            icon: String::from("📄"),
        },
        QuickAction {
            label: String::from("Add"),
            icon: String::from("➕"),
        },
        QuickAction {
            label: String::from("Share"),
            icon: String::from("🔗"),
        },
    ]
}

pub(super) fn tab_labels() -> Vec<String> {
    vec![
        String::from("Home"),
        String::from("Records"),
        String::from("Share"),
        String::from("Profile"),
    ]
}

impl UiRuntime {
    pub(super) fn hint_bar(&self) -> HintBar {
        if !self.show_hints {
            return HintBar::new(vec![]);
        }

        let hints = match self.modal {
            ActiveModal::Consent => vec![
                HintItem::new("↑↓", "Choose"),
                HintItem::new("Tab", "Next group"),
                HintItem::new("Enter", "Select / Grant"),
                HintItem::new("Esc", "Close"),
            ],
            ActiveModal::Upload => {
                let phase = self.upload.as_ref().map(|state| state.phase);
                match phase {
                    Some(UploadPhase::Disconnected) => vec![
                        HintItem::new("Enter", "Connect wallet"),
                        HintItem::new("Esc", "Close"),
                    ],
                    Some(UploadPhase::Connected) => vec![
                        HintItem::new("↑↓", "Pick file"),
                        HintItem::new("Enter", "Select"),
                        HintItem::new("Tab", "Upload"),
                        HintItem::new("Esc", "Close"),
                    ],
                    _ => vec![HintItem::new("Esc", "Close")],
                }
            }
            ActiveModal::None => match self.screen {
                UiScreen::Home => vec![
                    HintItem::new("↑↓", "Navigate"),
                    HintItem::new("Tab", "Section"),
                    HintItem::new("Enter", "Open"),
                    HintItem::new("g", "Share QR"),
                    HintItem::new("u", "Upload"),
                ],
                UiScreen::RecordDetail => vec![
                    HintItem::new("Esc", "Back"),
                    HintItem::new("s", "Share"),
                    HintItem::new("Tab", "Notes"),
                ],
            },
        };

        HintBar::new(hints)
    }
}

#[cfg(test)]
mod tests {
    use crate::ui::input::UiCommand;
    use crate::ui::state::fixtures;

    fn assert_hint(ui: &crate::ui::state::UiRuntime, expected: &str) {
        let frame = ui.render();
        assert!(
            frame
                .hint_bar
                .hints
                .iter()
                .any(|hint| hint.action.contains(expected)),
            "missing {expected} hint"
        );
    }

    #[test]
    fn hint_bar_reflects_the_active_surface() {
        let mut ui = fixtures::build_runtime();
        let adapter = fixtures::SystemAdapter::default();

        assert_hint(&ui, "Open");
        fixtures::apply(&mut ui, &adapter, UiCommand::Activate);
        assert_hint(&ui, "Back");
        fixtures::apply(
            &mut ui,
            &adapter,
            UiCommand::ShareRecord {
                fallback: Some('s'),
            },
        );
        assert_hint(&ui, "Grant");
        fixtures::apply(&mut ui, &adapter, UiCommand::Back);
        fixtures::apply(&mut ui, &adapter, UiCommand::Back);
        fixtures::apply(&mut ui, &adapter, UiCommand::OpenUpload { fallback: None });
        assert_hint(&ui, "Connect wallet");
    }
}
