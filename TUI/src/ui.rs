use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, LoadStatus};
use crate::catalog::{truncate_description, CatalogItem, SearchMode};
use crate::config::KEY_HINTS;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background
const BG_PANEL: Color = Color::Rgb(18, 18, 24);          // Slightly lighter for panels

// Sapphire blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Copper/warm tones
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const WARM_BROWN: Color = Color::Rgb(164, 103, 38);      // #A46726 - Warm brown
const PALE_YELLOW: Color = Color::Rgb(234, 208, 148);    // #EAD094 - Pale yellow

const OLIVE: Color = Color::Rgb(131, 179, 102);          // #83B366 - Success/green
const LAVENDER: Color = Color::Rgb(211, 164, 234);       // #D3A4EA - AI accent

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_SECONDARY: Color = Color::Rgb(180, 180, 190); // Light gray
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Border colors (subtle)
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border
const BORDER_ACCENT: Color = Color::Rgb(70, 85, 110);    // Accent border

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const EMPTY_GRID_MESSAGE: &str = "No movies to show.";

/// Clip `text` to `max_width` display columns, marking the cut with `…`.
pub fn fit_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Number of card columns that fit in `width`.
pub fn grid_columns(width: u16, card_width: u16) -> u16 {
    (width / card_width.max(1)).max(1)
}

fn spinner(anim_frame: usize) -> &'static str {
    SPINNER_FRAMES[(anim_frame / 6) % SPINNER_FRAMES.len()]
}

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill entire background
    let bg = Block::default().style(Style::default().bg(BG_DARK));
    frame.render_widget(bg, frame.area());

    let area = frame.area();
    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };

    let recommendation_height = recommendation_height(app, padded.width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                     // Header
            Constraint::Length(3),                     // Search form
            Constraint::Length(recommendation_height), // AI block (0 when hidden)
            Constraint::Min(3),                        // Grid
            Constraint::Length(1),                     // Footer
        ])
        .split(padded);

    draw_header(frame, app, chunks[0]);
    draw_search_form(frame, app, chunks[1]);
    if recommendation_height > 0 {
        draw_recommendation(frame, app, chunks[2]);
    }
    draw_grid(frame, app, chunks[3]);
    draw_footer(frame, app, chunks[4]);
}

fn draw_glass_border(frame: &mut Frame, area: Rect, title: &str, anim_frame: usize, glow: bool) {
    // Animated border - cycles between sapphire and copper
    let border_color = if glow {
        let t = (anim_frame as f64 / 120.0).sin() * 0.5 + 0.5;
        let r = (84.0 + (138.0 - 84.0) * t) as u8;
        let g = (112.0 + (72.0 - 112.0) * t) as u8;
        let b = (156.0 + (38.0 - 156.0) * t) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(block, area);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    draw_glass_border(frame, area, " Movie Catalog ", app.animation_frame, true);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let count = app.catalog.all.len();
    let summary = match app.load_status {
        LoadStatus::NotRequested | LoadStatus::Loading => vec![
            Span::styled(format!("{} ", spinner(app.animation_frame)), Style::default().fg(SAPPHIRE)),
            Span::styled("Loading catalog...", Style::default().fg(TEXT_MUTED)),
        ],
        LoadStatus::Loaded { at } => vec![
            Span::styled(" * ", Style::default().fg(OLIVE)),
            Span::styled(format!("{} movies", count), Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                format!("  loaded {}", at.format("%H:%M:%S")),
                Style::default().fg(TEXT_MUTED),
            ),
        ],
        LoadStatus::Failed => vec![
            Span::styled(" o ", Style::default().fg(TEXT_MUTED)),
            Span::styled(format!("{} movies", count), Style::default().fg(TEXT_SECONDARY)),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(summary)), inner);
}

fn draw_search_form(frame: &mut Frame, app: &App, area: Rect) {
    let mode = app.catalog.mode;
    let submit_label = format!(" {} ", mode.submit_label());
    let toggle_label = format!(" {} ", mode.toggle_label());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(submit_label.width() as u16 + 2),
            Constraint::Length(toggle_label.width() as u16 + 2),
        ])
        .split(area);

    // Pulse the input border right after a submit
    let border_color = if app.ui.send_animation > 0 {
        let intensity = app.ui.send_animation as f64 / app.config.send_animation_ticks.max(1) as f64;
        let r = (101.0 + (154.0 * intensity)) as u8;
        let g = (150.0 + (70.0 * intensity)) as u8;
        let b = (243.0 - (17.0 * intensity)) as u8;
        Color::Rgb(r, g, b)
    } else {
        let glow = (app.animation_frame as f64 / 90.0).sin() * 0.3 + 0.7;
        Color::Rgb((101.0 * glow) as u8, (150.0 * glow) as u8, (243.0 * glow) as u8)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    let cursor = if app.animation_frame % 30 < 15 { "|" } else { " " };
    let input_line = if app.catalog.query.is_empty() {
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(SAPPHIRE)),
            Span::styled(cursor, Style::default().fg(TEXT_PRIMARY)),
            Span::styled(
                mode.placeholder(),
                Style::default().fg(TEXT_MUTED).add_modifier(Modifier::ITALIC),
            ),
        ])
    } else {
        // Keep the tail of long queries in view
        let room = (inner.width as usize).saturating_sub(4);
        let query = &app.catalog.query;
        let mut start = 0;
        while query[start..].width() > room {
            start += query[start..].chars().next().map_or(1, char::len_utf8);
        }
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(SAPPHIRE)),
            Span::styled(format!("{}{}", &query[start..], cursor), Style::default().fg(TEXT_PRIMARY)),
        ])
    };
    frame.render_widget(Paragraph::new(input_line), inner);

    let accent = match mode {
        SearchMode::Keyword => SAPPHIRE,
        SearchMode::Description => LAVENDER,
    };
    draw_button(frame, chunks[1], &submit_label, accent);
    draw_button(frame, chunks[2], &toggle_label, COPPER);
}

fn draw_button(frame: &mut Frame, area: Rect, label: &str, color: Color) {
    let button = Paragraph::new(Span::styled(
        label.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_ACCENT)),
    );
    frame.render_widget(button, area);
}

/// Rows the recommendation block needs, borders included. Zero hides it.
fn recommendation_height(app: &App, width: u16) -> u16 {
    if app.catalog.recommendation.is_empty() {
        return 0;
    }
    let text_width = width.saturating_sub(4).max(1) as usize;
    let lines: usize = app
        .catalog
        .recommendation
        .lines()
        .map(|line| line.width().div_ceil(text_width).max(1))
        .sum();
    lines.saturating_add(2).clamp(3, 10) as u16
}

fn draw_recommendation(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" AI suggests: ", Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(LAVENDER))
        .style(Style::default().bg(BG_PANEL));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };
    let text = Paragraph::new(app.catalog.recommendation.as_str())
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, padded);
}

fn draw_grid(frame: &mut Frame, app: &App, area: Rect) {
    let visible = &app.catalog.visible;
    let title = format!(" Movies ({} of {}) ", visible.len(), app.catalog.all.len());

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if visible.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(EMPTY_GRID_MESSAGE, Style::default().fg(TEXT_MUTED))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(placeholder, inner);
        return;
    }

    let card_height = app.config.card_height;
    let columns = grid_columns(inner.width, app.config.card_width);
    let card_width = inner.width / columns;
    let total_rows = visible.len().div_ceil(columns as usize);
    let fit_rows = (inner.height / card_height.max(1)).max(1) as usize;
    let first_row = app.ui.scroll_offset.min(total_rows.saturating_sub(1));

    for (slot, item) in visible
        .iter()
        .skip(first_row * columns as usize)
        .take(fit_rows * columns as usize)
        .enumerate()
    {
        let row = (slot / columns as usize) as u16;
        let col = (slot % columns as usize) as u16;
        let y = inner.y + row * card_height;
        let card_area = Rect {
            x: inner.x + col * card_width,
            y,
            width: card_width,
            height: card_height.min(inner.bottom().saturating_sub(y)),
        };
        if card_area.height < 3 {
            continue;
        }
        draw_card(frame, app, item, card_area);
    }
}

fn draw_card(frame: &mut Frame, app: &App, item: &CatalogItem, area: Rect) {
    let title_room = (area.width as usize).saturating_sub(4);
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", fit_width(item.title(), title_room)),
            Style::default().fg(PALE_YELLOW).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACCENT))
        .style(Style::default().bg(BG_PANEL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let room = (inner.width as usize).saturating_sub(2);
    let poster = if item.poster_url().is_empty() {
        "no poster".to_string()
    } else {
        item.poster_url().to_string()
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" # ", Style::default().fg(WARM_BROWN)),
            Span::styled(
                fit_width(item.genre(), room.saturating_sub(2)),
                Style::default().fg(CYAN_LIGHT),
            ),
        ]),
        Line::from(vec![
            Span::styled(" @ ", Style::default().fg(COPPER)),
            Span::styled(
                fit_width(&poster, room.saturating_sub(2)),
                Style::default().fg(TEXT_MUTED),
            ),
        ]),
    ];
    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_description(item.description(), app.config.description_preview_chars)),
        Style::default().fg(TEXT_SECONDARY),
    )));

    let body = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(body, inner);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();

    for (key, desc) in KEY_HINTS {
        spans.push(Span::styled(*key, Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(" {}  ", desc), Style::default().fg(TEXT_MUTED)));
    }

    if app.is_searching() {
        spans.push(Span::styled(
            format!("{} Asking for recommendations...  ", spinner(app.animation_frame)),
            Style::default().fg(LAVENDER),
        ));
    }

    if let Some(status) = &app.ui.status_message {
        spans.push(Span::styled(status.clone(), Style::default().fg(OLIVE)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, BackendRequest};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        assert_eq!(app.mount(), Some(BackendRequest::LoadCatalog));
        app.apply_event(BackendEvent::CatalogLoaded(Ok(vec![
            CatalogItem::new("Dune", "Sci-Fi", "Spice.", "dune.jpg"),
            CatalogItem::new("Amelie", "Romance", "Paris.", "amelie.jpg"),
        ])));
        app
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Dune", 10), "Dune");
        assert_eq!(fit_width("Interstellar", 6), "Inter…");
        assert_eq!(fit_width("Interstellar", 0), "");
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(120, 34), 3);
        assert_eq!(grid_columns(20, 34), 1);
        assert_eq!(grid_columns(68, 34), 2);
    }

    #[test]
    fn test_renders_cards_for_visible_items() {
        let app = loaded_app();

        let screen = render(&app, 100, 30);

        assert!(screen.contains("Dune"));
        assert!(screen.contains("Sci-Fi"));
        assert!(screen.contains("Amelie"));
        assert!(screen.contains("Spice...."));
        assert!(screen.contains("Movies (2 of 2)"));
        assert!(!screen.contains(EMPTY_GRID_MESSAGE));
    }

    #[test]
    fn test_renders_placeholder_when_nothing_visible() {
        let mut app = App::new();
        app.mount();

        let screen = render(&app, 80, 24);

        assert!(screen.contains(EMPTY_GRID_MESSAGE));
        assert!(screen.contains("Search by title or genre"));
    }

    #[test]
    fn test_recommendation_block_only_when_present() {
        let mut app = loaded_app();
        assert!(!render(&app, 100, 30).contains("AI suggests:"));

        app.catalog.recommendation = "I suggest Amelie for you".to_string();
        let screen = render(&app, 100, 30);

        assert!(screen.contains("AI suggests:"));
        assert!(screen.contains("I suggest Amelie for you"));
    }

    #[test]
    fn test_recommendation_height_is_capped_for_long_text() {
        let mut app = loaded_app();
        app.catalog.recommendation = "\n".repeat(65534);

        assert_eq!(recommendation_height(&app, 100), 10);

        app.catalog.recommendation = "Dune ".repeat(20_000);
        assert_eq!(recommendation_height(&app, 100), 10);

        app.catalog.recommendation = "Watch Dune".to_string();
        assert_eq!(recommendation_height(&app, 100), 3);
        assert!(render(&app, 100, 30).contains("Watch Dune"));
    }

    #[test]
    fn test_form_labels_follow_mode() {
        let mut app = loaded_app();
        let screen = render(&app, 100, 30);
        assert!(screen.contains("AI mode"));

        app.catalog.toggle_mode();
        let screen = render(&app, 100, 30);

        assert!(screen.contains("Search with AI"));
        assert!(screen.contains("Keyword mode"));
        assert!(screen.contains("Describe the movie"));
    }
}
