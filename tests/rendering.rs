use ratatui::{Terminal, backend::TestBackend};
use tui_news_app::api::{ApiService, FeedError};
use tui_news_app::config::AppConfig;
use tui_news_app::internal::models::DisplayArticle;
use tui_news_app::internal::theme_store::{MemoryStorage, ThemeStore};
use tui_news_app::internal::ui::app::{Action, App};

fn test_app() -> App {
    App::with_parts(
        AppConfig::default(),
        ApiService::with_base_url("http://127.0.0.1:1/", None),
        ThemeStore::load(Box::new(MemoryStorage::new())),
    )
}

fn article(i: usize, title: &str) -> DisplayArticle {
    DisplayArticle {
        id: format!("all-{i}"),
        title: title.to_string(),
        url: format!("https://example.com/{i}"),
        source_name: Some("Example Wire".to_string()),
        favicon_url: "https://www.google.com/s2/favicons?domain=example.com&sz=64".to_string(),
        thumbnail_url: Some("https://example.com/i.jpg".to_string()),
        comment_count: 0,
        vote_count: 0,
        age_label: "3h ago".to_string(),
        thread_tag: "all".to_string(),
    }
}

fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| app.ui(f)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_cards_render_title_and_meta() {
    let mut app = test_app();
    let request = app.feed.start();
    app.handle_action(Action::PageLoaded(
        request,
        Ok(vec![article(0, "Markets rally"), article(1, "Storm warning")]),
    ));

    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("Markets rally"));
    assert!(screen.contains("Storm warning"));
    assert!(screen.contains("Example Wire"));
    assert!(screen.contains("3h ago"));
    assert!(screen.contains("0 comments"));
    assert!(screen.contains("#all"));
    assert!(screen.contains("[img]"));
    assert!(screen.contains("▲"));
    assert!(screen.contains("Theme: light"));
    // Two articles is a short page
    assert!(screen.contains("End of feed"));
}

#[test]
fn test_thread_tabs_render() {
    let mut app = test_app();
    let screen = render(&mut app, 140, 20);
    for label in ["All", "World", "Technology", "Health"] {
        assert!(screen.contains(label), "missing tab {label}");
    }
}

#[test]
fn test_vote_reflected_in_card() {
    let mut app = test_app();
    let request = app.feed.start();
    app.handle_action(Action::PageLoaded(request, Ok(vec![article(0, "Vote on me")])));
    app.handle_action(Action::Upvote);

    let screen = render(&mut app, 80, 20);
    assert!(screen.contains("▲   1 ▼"));
}

#[test]
fn test_long_title_wraps() {
    let mut app = test_app();
    let title = "A very long headline about a long series of events that keeps going well past the edge";
    let request = app.feed.start();
    app.handle_action(Action::PageLoaded(request, Ok(vec![article(0, title)])));

    let screen = render(&mut app, 50, 30);
    assert!(screen.contains("A very long headline"));
    assert!(screen.contains("past the edge"));
}

#[test]
fn test_error_footer_and_help_overlay() {
    let mut app = test_app();
    let request = app.feed.start();
    app.handle_action(Action::PageLoaded(request, Err(FeedError::Status(502))));
    app.handle_action(Action::ClearNotification);

    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("HTTP 502"));
    assert!(screen.contains("r: retry"));
    // Pages are still left, so load more is offered alongside the retry hint
    assert!(screen.contains("[ Load more ]"));

    app.handle_action(Action::ToggleHelp);
    let screen = render(&mut app, 100, 30);
    assert!(screen.contains("Keyboard Shortcuts"));
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let mut app = test_app();
    app.handle_action(Action::ToggleHelp);
    app.notify_error("Failed to fetch news: HTTP 500");
    let _ = render(&mut app, 12, 5);
}
