/// Physical key identifiers delivered by the terminal layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicalKey {
    Enter,
    Escape,
    Home,
    Tab,
    Backspace,
    Delete,
    Space,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Unknown(u8),
}

/// Modifier flags accompanying a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub alt: bool,
    pub control: bool,
}

/// Raw key event prior to command mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    pub modifiers: KeyModifiers,
    pub pressed: bool,
}

impl KeyEvent {
    /// Convenience constructor for a key press without modifiers.
    pub fn pressed(key: PhysicalKey) -> Self {
        Self {
            key,
            modifiers: KeyModifiers::default(),
            pressed: true,
        }
    }
}

/// High level user intention extracted from the key layer.
///
/// Commands bound to printable characters carry the character as `fallback`
/// so text-entry surfaces (the detail-view notes draft) can reinterpret the
/// press as insertion instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    Activate,
    Back,
    GoHome,
    SelectTab { index: usize, fallback: Option<char> },
    MoveSelectionUp,
    MoveSelectionDown,
    MoveSelectionLeft,
    MoveSelectionRight,
    NextWidget,
    PreviousWidget,
    ToggleItem { fallback: Option<char> },
    OpenUpload { fallback: Option<char> },
    GenerateQr { fallback: Option<char> },
    CopyShareLink { fallback: Option<char> },
    ShareRecord { fallback: Option<char> },
    ToggleEmergencyQr { fallback: Option<char> },
    ToggleHints,
    InsertChar(char),
    DeleteChar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Binding {
    key: PhysicalKey,
    modifiers: KeyModifiers,
    command: UiCommand,
}

/// Key map describing how raw key events translate into UI commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<Binding>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self {
            bindings: Vec::new(),
        };
        let plain = KeyModifiers::default();
        let shifted = KeyModifiers {
            shift: true,
            ..KeyModifiers::default()
        };

        map.add_binding(PhysicalKey::Enter, plain, UiCommand::Activate);
        map.add_binding(PhysicalKey::Escape, plain, UiCommand::Back);
        map.add_binding(PhysicalKey::Home, plain, UiCommand::GoHome);
        map.add_binding(PhysicalKey::Tab, plain, UiCommand::NextWidget);
        map.add_binding(PhysicalKey::Tab, shifted, UiCommand::PreviousWidget);
        map.add_binding(PhysicalKey::ArrowUp, plain, UiCommand::MoveSelectionUp);
        map.add_binding(PhysicalKey::ArrowDown, plain, UiCommand::MoveSelectionDown);
        map.add_binding(PhysicalKey::ArrowLeft, plain, UiCommand::MoveSelectionLeft);
        map.add_binding(PhysicalKey::ArrowRight, plain, UiCommand::MoveSelectionRight);
        map.add_binding(PhysicalKey::Backspace, plain, UiCommand::DeleteChar);
        map.add_binding(PhysicalKey::Delete, plain, UiCommand::DeleteChar);
        map.add_binding(
            PhysicalKey::Space,
            plain,
            UiCommand::ToggleItem {
                fallback: Some(' '),
            },
        );

        for (index, digit) in ['1', '2', '3', '4'].into_iter().enumerate() {
            map.add_binding(
                PhysicalKey::Char(digit),
                plain,
                UiCommand::SelectTab {
                    index,
                    fallback: Some(digit),
                },
            );
        }

        map.add_binding(
            PhysicalKey::Char('u'),
            plain,
            UiCommand::OpenUpload {
                fallback: Some('u'),
            },
        );
        map.add_binding(
            PhysicalKey::Char('g'),
            plain,
            UiCommand::GenerateQr {
                fallback: Some('g'),
            },
        );
        map.add_binding(
            PhysicalKey::Char('c'),
            plain,
            UiCommand::CopyShareLink {
                fallback: Some('c'),
            },
        );
        map.add_binding(
            PhysicalKey::Char('s'),
            plain,
            UiCommand::ShareRecord {
                fallback: Some('s'),
            },
        );
        map.add_binding(
            PhysicalKey::Char('e'),
            plain,
            UiCommand::ToggleEmergencyQr {
                fallback: Some('e'),
            },
        );
        map.add_binding(PhysicalKey::Char('?'), shifted, UiCommand::ToggleHints);
        map.add_binding(PhysicalKey::Char('?'), plain, UiCommand::ToggleHints);

        map
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or override a custom binding.
    pub fn add_binding(&mut self, key: PhysicalKey, modifiers: KeyModifiers, command: UiCommand) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|binding| binding.key == key && binding.modifiers == modifiers)
        {
            existing.command = command;
        } else {
            self.bindings.push(Binding {
                key,
                modifiers,
                command,
            });
        }
    }

    /// Resolve a command for the provided key event.
    pub fn resolve(&self, event: &KeyEvent) -> Option<UiCommand> {
        if !event.pressed {
            return None;
        }

        if let Some(binding) = self
            .bindings
            .iter()
            .find(|binding| binding.key == event.key && binding.modifiers == event.modifiers)
        {
            return Some(binding.command);
        }

        if let PhysicalKey::Char(c) = event.key {
            if !event.modifiers.control && !event.modifiers.alt {
                return Some(UiCommand::InsertChar(c));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_resolves_to_activate() {
        let map = Keymap::default();
        let command = map.resolve(&KeyEvent::pressed(PhysicalKey::Enter));
        assert_eq!(command, Some(UiCommand::Activate));
    }

    #[test]
    fn unbound_characters_fall_through_to_insertion() {
        let map = Keymap::default();
        let command = map.resolve(&KeyEvent::pressed(PhysicalKey::Char('z')));
        assert_eq!(command, Some(UiCommand::InsertChar('z')));
    }

    #[test]
    fn bound_characters_carry_their_fallback() {
        let map = Keymap::default();
        let command = map.resolve(&KeyEvent::pressed(PhysicalKey::Char('s')));
        assert_eq!(
            command,
            Some(UiCommand::ShareRecord {
                fallback: Some('s')
            })
        );
    }

    #[test]
    fn releases_resolve_to_nothing() {
        let map = Keymap::default();
        let mut event = KeyEvent::pressed(PhysicalKey::Enter);
        event.pressed = false;
        assert_eq!(map.resolve(&event), None);
    }

    #[test]
    fn bindings_can_be_overridden() {
        let mut map = Keymap::default();
        map.add_binding(
            PhysicalKey::Enter,
            KeyModifiers::default(),
            UiCommand::Back,
        );
        let command = map.resolve(&KeyEvent::pressed(PhysicalKey::Enter));
        assert_eq!(command, Some(UiCommand::Back));
    }
}
