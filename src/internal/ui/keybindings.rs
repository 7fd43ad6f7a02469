use crate::config::KeyBindingConfig;
use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Input context for context-specific keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBindingContext {
    Global,
    Feed,
    Help,
}

/// Maps key events to actions
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    global: HashMap<KeyEvent, Action>,
    feed: HashMap<KeyEvent, Action>,
    help: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn context_map(&self, context: KeyBindingContext) -> &HashMap<KeyEvent, Action> {
        match context {
            KeyBindingContext::Global => &self.global,
            KeyBindingContext::Feed => &self.feed,
            KeyBindingContext::Help => &self.help,
        }
    }

    /// Get the action for a key event, checking the context first and then
    /// the global bindings.
    pub fn get_action(&self, key: &KeyEvent, context: KeyBindingContext) -> Option<Action> {
        let key = normalize(key);
        self.context_map(context)
            .get(&key)
            .or_else(|| self.global.get(&key))
            .cloned()
    }

    pub fn add_binding(&mut self, context: KeyBindingContext, key: KeyEvent, action: Action) {
        let map = match context {
            KeyBindingContext::Global => &mut self.global,
            KeyBindingContext::Feed => &mut self.feed,
            KeyBindingContext::Help => &mut self.help,
        };
        map.insert(normalize(&key), action);
    }

    /// Layer custom keybindings from configuration over the current ones.
    pub fn merge_config(&mut self, config: &KeyBindingConfig) {
        let mut merge = |ctx: KeyBindingContext, bindings: &HashMap<String, Action>| {
            for (key_str, action) in bindings {
                match parse_key_str(key_str) {
                    Some(key_event) => self.add_binding(ctx, key_event, action.clone()),
                    None => tracing::warn!("Invalid key string in config: {}", key_str),
                }
            }
        };

        merge(KeyBindingContext::Global, &config.global);
        merge(KeyBindingContext::Feed, &config.feed);
        merge(KeyBindingContext::Help, &config.help);
    }
}

/// Terminals report shifted characters and BackTab with and without SHIFT;
/// lookups ignore it for those keys.
fn normalize(key: &KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
        modifiers.remove(KeyModifiers::SHIFT);
    }
    KeyEvent::new(key.code, modifiers)
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "BackTab", "Esc", "Up", "Down", "Left", "Right"
/// - With modifiers: "Ctrl+C", "Alt+x"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();

    // A lone "+" is the plus key, not a modifier separator.
    let (modifier_parts, key_part) = match parts.as_slice() {
        ["", ""] => (&[][..], "+"),
        [rest @ .., last] => (rest, *last),
        [] => return None,
    };

    let mut modifiers = KeyModifiers::empty();
    for modifier in modifier_parts {
        match modifier.to_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Esc" => KeyCode::Esc,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
