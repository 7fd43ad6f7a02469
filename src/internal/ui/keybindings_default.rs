use crate::internal::thread::Thread;
use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();

    add_global_bindings(&mut map);
    add_feed_bindings(&mut map);
    add_help_bindings(&mut map);

    map
}

fn add_global_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Global;

    map.add_binding(ctx, key('?'), Action::ToggleHelp);
    map.add_binding(ctx, key('q'), Action::Quit);
    map.add_binding(ctx, key_code(KeyCode::Esc), Action::Quit);
    map.add_binding(
        ctx,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Action::Quit,
    );
    map.add_binding(ctx, key('t'), Action::ToggleTheme);
}

fn add_feed_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Feed;

    // Navigation
    map.add_binding(ctx, key('j'), Action::NavigateDown);
    map.add_binding(ctx, key('k'), Action::NavigateUp);
    map.add_binding(ctx, key_code(KeyCode::Down), Action::NavigateDown);
    map.add_binding(ctx, key_code(KeyCode::Up), Action::NavigateUp);

    // Browser
    map.add_binding(ctx, key_code(KeyCode::Enter), Action::OpenBrowser);
    map.add_binding(ctx, key('o'), Action::OpenBrowser);

    // Threads: 0 = all, 1..8 = topics in tab order
    for thread in Thread::iter() {
        if let Some(c) = char::from_digit(thread.index() as u32, 10) {
            map.add_binding(ctx, key(c), Action::SelectThread(thread));
        }
    }
    map.add_binding(ctx, key_code(KeyCode::Tab), Action::NextThread);
    map.add_binding(ctx, key_code(KeyCode::Right), Action::NextThread);
    map.add_binding(ctx, key_code(KeyCode::BackTab), Action::PrevThread);
    map.add_binding(ctx, key_code(KeyCode::Left), Action::PrevThread);

    // Pagination
    map.add_binding(ctx, key('m'), Action::LoadMore);
    map.add_binding(ctx, key('r'), Action::Retry);

    // Votes
    map.add_binding(ctx, key('+'), Action::Upvote);
    map.add_binding(ctx, key('u'), Action::Upvote);
    map.add_binding(ctx, key('-'), Action::Downvote);
    map.add_binding(ctx, key('d'), Action::Downvote);
}

fn add_help_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Help;

    map.add_binding(ctx, key('q'), Action::ToggleHelp);
    map.add_binding(ctx, key_code(KeyCode::Esc), Action::ToggleHelp);
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}
