use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};
use strum::IntoEnumIterator;

use super::app::App;
use crate::internal::feed::FeedStatus;
use crate::internal::models::DisplayArticle;
use crate::internal::notification::NotificationType;
use crate::internal::thread::Thread;
use crate::internal::vote::{VoteCounter, VoteDirection};

pub const LOAD_MORE_LABEL: &str = "[ Load more ]";
pub const END_OF_FEED_LABEL: &str = "End of feed";

#[tracing::instrument(skip(app, f))]
pub fn draw(app: &mut App, f: &mut Frame) {
    // Emitted at the end of draw when performance metrics are enabled in debug builds.
    let start = std::time::Instant::now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_nav_bar(app, f, chunks[0]);
    render_thread_tabs(app, f, chunks[1]);

    let list_start = std::time::Instant::now();
    render_cards(app, f, chunks[2]);
    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?list_start.elapsed(), count = app.feed.articles().len(), "render.cards");
    }

    render_footer(app, f, chunks[3]);
    render_status_bar(app, f, chunks[4]);

    if app.notification.is_some() {
        render_notification(app, f);
    }

    if app.show_help {
        render_help_overlay(app, f);
    }

    if app.config.logging.enable_performance_metrics && cfg!(debug_assertions) {
        tracing::debug!(elapsed = ?start.elapsed(), "render.draw");
    }
}

fn padded_block(app: &App) -> Block<'static> {
    Block::default().padding(Padding::new(
        app.config.ui.padding.horizontal,
        app.config.ui.padding.horizontal,
        app.config.ui.padding.vertical,
        app.config.ui.padding.vertical,
    ))
}

fn render_nav_bar(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(16),
            Constraint::Length(28),
            Constraint::Min(12),
        ])
        .split(area);

    let bar_style = Style::default().bg(app.theme.background);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(
            "News",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" v{}", app.app_version),
            Style::default().fg(app.theme.muted),
        ),
    ]))
    .block(padded_block(app).style(bar_style));
    f.render_widget(brand, chunks[0]);

    // The search box is a placeholder; it never takes input.
    let search = Paragraph::new("[ Search news...         ]")
        .style(bar_style.fg(app.theme.muted))
        .alignment(Alignment::Center);
    f.render_widget(search, chunks[1]);

    let theme = Paragraph::new(format!("Theme: {}", app.theme_store.preference()))
        .alignment(Alignment::Right)
        .block(padded_block(app).style(bar_style))
        .style(Style::default().fg(app.theme.foreground));
    f.render_widget(theme, chunks[2]);
}

fn render_thread_tabs(app: &App, f: &mut Frame, area: Rect) {
    let titles: Vec<Line> = Thread::iter()
        .map(|thread| Line::from(format!("{} {}", thread.index(), thread.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .select(app.feed.thread().index())
        .style(
            Style::default()
                .fg(app.theme.muted)
                .bg(app.theme.background),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider("|");

    f.render_widget(tabs, area);
}

/// Vote widget text and its color for a counter.
fn vote_widget(app: &App, counter: &VoteCounter) -> Span<'static> {
    let color = match counter.direction() {
        VoteDirection::Up => app.theme.upvote,
        VoteDirection::Down => app.theme.downvote,
        VoteDirection::None => app.theme.muted,
    };
    Span::styled(
        format!("▲{:>4} ▼  ", counter.count()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Wrap `title` into lines no wider than `width` once `indent` columns are
/// taken by the vote widget. Always returns at least one line.
pub fn calculate_wrapped_title(title: &str, width: usize, indent: usize) -> Vec<String> {
    let available = width.saturating_sub(indent).max(1);
    let lines: Vec<String> = textwrap::wrap(title, available)
        .into_iter()
        .map(|line| line.into_owned())
        .collect();

    match lines.is_empty() {
        true => vec![String::new()],
        false => lines,
    }
}

fn meta_line(app: &App, article: &DisplayArticle, indent: usize) -> Line<'static> {
    let separator = || Span::styled(" · ", Style::default().fg(app.theme.border));
    let mut spans = vec![Span::raw(" ".repeat(indent))];

    if app.config.ui.show_source {
        let source = article
            .source_name
            .clone()
            .or_else(|| crate::utils::url::extract_domain(&article.url))
            .unwrap_or_else(|| "unknown source".to_string());
        let marker = match article.favicon_url.is_empty() {
            true => "",
            false => "◆ ",
        };
        spans.push(Span::styled(
            format!("{}{}", marker, source),
            Style::default().fg(app.theme.link),
        ));
        spans.push(separator());
    }

    if app.config.ui.show_age {
        spans.push(Span::styled(
            article.age_label.clone(),
            Style::default().fg(app.theme.muted),
        ));
        spans.push(separator());
    }

    spans.push(Span::styled(
        format!("{} comments", article.comment_count),
        Style::default().fg(app.theme.muted),
    ));
    spans.push(separator());
    spans.push(Span::styled(
        format!("#{}", article.thread_tag),
        Style::default().fg(app.theme.accent),
    ));

    if article.thumbnail_url.is_some() {
        spans.push(Span::styled(" [img]", Style::default().fg(app.theme.muted)));
    }

    Line::from(spans)
}

fn card_items(app: &App, width: usize) -> Vec<ListItem<'static>> {
    app.feed
        .articles()
        .iter()
        .map(|article| {
            let vote = vote_widget(app, &app.feed.vote_state(article));
            let indent = vote.content.chars().count();
            let title_style = match article.has_link() {
                true => Style::default().fg(app.theme.foreground),
                false => Style::default().fg(app.theme.muted),
            };

            let mut lines: Vec<Line> = calculate_wrapped_title(&article.title, width, indent)
                .into_iter()
                .enumerate()
                .map(|(i, text)| match i {
                    0 => Line::from(vec![vote.clone(), Span::styled(text, title_style)]),
                    _ => Line::from(vec![
                        Span::raw(" ".repeat(indent)),
                        Span::styled(text, title_style),
                    ]),
                })
                .collect();
            lines.push(meta_line(app, article, indent));
            lines.push(Line::from(""));

            ListItem::new(lines)
        })
        .collect()
}

fn render_cards(app: &mut App, f: &mut Frame, area: Rect) {
    let inner_width = area
        .width
        .saturating_sub(2)
        .saturating_sub(app.config.ui.padding.horizontal * 2) as usize;

    let items = card_items(app, inner_width);

    let title = format!(
        " {} · {} articles · page {} ",
        app.feed.thread().label(),
        app.feed.articles().len(),
        app.feed.page()
    );

    let block = padded_block(app)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(title)
        .title_style(Style::default().fg(app.theme.foreground));

    if items.is_empty() {
        let message = match app.feed.status() {
            FeedStatus::Loaded => "No articles in this thread",
            FeedStatus::Failed => "Nothing to show",
            FeedStatus::Idle | FeedStatus::Loading => "Fetching headlines...",
        };
        let p = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(app.theme.muted)
                    .bg(app.theme.background),
            )
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .style(Style::default().bg(app.theme.background))
        .highlight_style(
            Style::default()
                .bg(app.theme.selection_bg)
                .fg(app.theme.selection_fg)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_footer(app: &App, f: &mut Frame, area: Rect) {
    let line = match app.feed.is_loading() {
        true => Line::from(Span::styled(
            format!("{} Loading page {}...", app.get_spinner_char(), app.feed.page()),
            Style::default().fg(app.theme.accent),
        )),
        false => {
            let mut spans = Vec::new();
            if let Some(error) = app.feed.error() {
                spans.push(Span::styled(
                    error.to_string(),
                    Style::default()
                        .fg(app.theme.error)
                        .add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::styled("  (r: retry)", Style::default().fg(app.theme.muted)));
            }

            match (app.feed.can_load_more(), spans.is_empty()) {
                (true, first) => {
                    if !first {
                        spans.push(Span::raw("   "));
                    }
                    spans.push(Span::styled(
                        LOAD_MORE_LABEL,
                        Style::default()
                            .fg(app.theme.link)
                            .add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::styled("  (m)", Style::default().fg(app.theme.muted)));
                }
                (false, true) => spans.push(Span::styled(
                    END_OF_FEED_LABEL,
                    Style::default().fg(app.theme.muted),
                )),
                (false, false) => {}
            }
            Line::from(spans)
        }
    };

    let p = Paragraph::new(line)
        .alignment(Alignment::Center)
        .style(Style::default().bg(app.theme.background));
    f.render_widget(p, area);
}

fn render_status_bar(app: &App, f: &mut Frame, area: Rect) {
    let status = match app.api_service.has_credential() {
        true => "j/k: Nav | Enter: Open | 0-8/Tab: Thread | m: More | r: Retry | +/-: Vote | t: Theme | ?: Help | q: Quit".to_string(),
        false => format!(
            "No API credential ({}) | t: Theme | ?: Help | q: Quit",
            app.config.api.credential_hint()
        ),
    };

    let p = Paragraph::new(status)
        .block(padded_block(app).style(Style::default().bg(app.theme.selection_bg)))
        .style(Style::default().fg(app.theme.selection_fg));
    f.render_widget(p, area);
}

fn render_notification(app: &App, f: &mut Frame) {
    if let Some(notification) = &app.notification {
        let area = f.area();

        let popup_width = (notification.message.chars().count() as u16 + 4)
            .min(area.width.saturating_sub(4));
        let popup_height = 3.min(area.height);

        let popup_x = (area.width.saturating_sub(popup_width)) / 2;
        let popup_y = (area.height.saturating_sub(popup_height)) / 2;

        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

        let color = match notification.notification_type {
            NotificationType::Info => app.theme.link,
            NotificationType::Error => app.theme.error,
        };

        let popup = Paragraph::new(notification.message.as_str())
            .style(
                Style::default()
                    .bg(app.theme.background)
                    .fg(color)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(notification.notification_type.title())
                    .title_style(Style::default().fg(app.theme.foreground)),
            )
            .alignment(Alignment::Center);

        f.render_widget(Clear, popup_area);
        f.render_widget(popup, popup_area);
    }
}

fn help_entry(app: &App, keys: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<14}", keys), Style::default().fg(app.theme.accent)),
        Span::raw(description),
    ])
}

fn help_heading(app: &App, text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(app.theme.link),
    ))
}

fn render_help_overlay(app: &App, f: &mut Frame) {
    let area = f.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let popup_height = 24.min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let block = padded_block(app)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_bg))
        .title(" Keyboard Shortcuts (Esc/q to close) ")
        .title_style(
            Style::default()
                .fg(app.theme.selection_fg)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(app.theme.background));

    let inner_area = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let shortcuts = vec![
        help_heading(app, "Feed"),
        help_entry(app, "j / k", "Move down / up"),
        help_entry(app, "Enter / o", "Open article in browser"),
        help_entry(app, "m", "Load more"),
        help_entry(app, "r", "Retry failed load"),
        help_entry(app, "+ / u", "Upvote"),
        help_entry(app, "- / d", "Downvote"),
        Line::from(""),
        help_heading(app, "Threads"),
        help_entry(app, "0-8", "Select thread"),
        help_entry(app, "Tab / →", "Next thread"),
        help_entry(app, "S-Tab / ←", "Previous thread"),
        Line::from(""),
        help_heading(app, "Global"),
        help_entry(app, "t", "Toggle light/dark theme"),
        help_entry(app, "?", "Toggle this help"),
        help_entry(app, "q / Esc", "Quit"),
    ];

    let p = Paragraph::new(shortcuts)
        .style(Style::default().fg(app.theme.foreground))
        .wrap(Wrap { trim: false });

    f.render_widget(p, inner_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_title_respects_width() {
        let lines = calculate_wrapped_title("one two three four five six", 15, 5);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "one two three four five six");
    }

    #[test]
    fn test_wrapped_title_degenerate_width() {
        let lines = calculate_wrapped_title("abc", 0, 12);
        assert!(!lines.is_empty());
        assert_eq!(calculate_wrapped_title("", 40, 2), vec![String::new()]);
    }
}
