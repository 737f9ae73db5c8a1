use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::prompt::{EntryState, PickState, PromptBody, PromptState};
use crate::config::UiConfig;
use crate::flow::NavButton;

/// Draw one prompt centered near the top of the screen
pub fn draw(frame: &mut Frame, prompt: &PromptState, ui: &UiConfig) {
    let area = prompt_area(frame.area(), prompt, ui);
    frame.render_widget(Clear, area);

    let border_color = if prompt.accepts_input() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} ", prompt.heading()),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_bottom(hint_line(prompt));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &prompt.body {
        PromptBody::Pick(pick) => draw_pick(frame, inner, pick),
        PromptBody::Entry(entry) => draw_entry(frame, inner, entry, prompt.validation.as_deref()),
    }
}

/// Height of the prompt box: one query line, the list or message rows, borders
fn prompt_area(screen: Rect, prompt: &PromptState, ui: &UiConfig) -> Rect {
    let body_rows = match &prompt.body {
        PromptBody::Pick(pick) => pick.visible.len().clamp(1, ui.max_visible_items.max(1)) as u16,
        PromptBody::Entry(_) => 2,
    };
    let height = (body_rows + 3).min(screen.height);
    let width = (screen.width * 4 / 5).max(20).min(screen.width);
    let x = screen.x + (screen.width - width) / 2;
    let y = screen.y + screen.height.min(2);
    Rect {
        x,
        y,
        width,
        height: height.min(screen.height.saturating_sub(y - screen.y)),
    }
}

fn draw_pick(frame: &mut Frame, area: Rect, pick: &PickState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let query = if pick.filter.is_empty() {
        Line::from(Span::styled(
            pick.placeholder.clone().unwrap_or_else(|| "Type to filter".to_string()),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(pick.filter.clone()),
        ])
    };
    frame.render_widget(Paragraph::new(query), chunks[0]);

    if pick.visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No matching items",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = pick
        .visible
        .iter()
        .filter_map(|&i| pick.entries.get(i))
        .map(|entry| {
            let mut spans = vec![Span::raw(entry.label.clone())];
            if let Some(description) = &entry.description {
                spans.push(Span::styled(
                    format!("  {}", description),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if let Some(detail) = &entry.detail {
                spans.push(Span::styled(
                    format!("  {}", detail),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    state.select(Some(pick.selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_entry(frame: &mut Frame, area: Rect, entry: &EntryState, validation: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(&entry.textarea, chunks[0]);

    let below = match validation {
        Some(message) => Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            entry.prompt.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(below)), chunks[1]);
}

fn hint_line(prompt: &PromptState) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::DarkGray);

    if prompt.busy {
        return Line::from(Span::styled(" working… ", text));
    }

    let mut spans = vec![
        Span::styled(" [Enter]", key),
        Span::styled(" ok ", text),
        Span::styled("[Esc]", key),
        Span::styled(" cancel ", text),
    ];
    for button in &prompt.buttons {
        let label = match button.kind {
            NavButton::Back => "[Alt-←]",
            NavButton::Forward => "[Alt-→]",
        };
        spans.push(Span::styled(label, key));
        spans.push(Span::styled(format!(" {} ", button.tooltip), text));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{InputBoxSpec, PickEntry, PromptButton, QuickPickSpec};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(prompt: &PromptState) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let ui = UiConfig::default();
        terminal.draw(|f| draw(f, prompt, &ui)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draws_heading_items_and_buttons() {
        let prompt = PromptState::quick_pick(QuickPickSpec {
            title: "Pick a radio".to_string(),
            step: 1,
            total_steps: 3,
            items: vec![
                PickEntry {
                    label: "Jazz FM".to_string(),
                    description: Some("London".to_string()),
                    detail: None,
                },
                PickEntry {
                    label: "Radio Nova".to_string(),
                    ..PickEntry::default()
                },
            ],
            buttons: vec![PromptButton {
                kind: NavButton::Back,
                tooltip: "Back".to_string(),
            }],
            ..QuickPickSpec::default()
        });

        let text = screen_text(&prompt);
        assert!(text.contains("Pick a radio (1/3)"));
        assert!(text.contains("Jazz FM"));
        assert!(text.contains("London"));
        assert!(text.contains("Radio Nova"));
        assert!(text.contains("Back"));
    }

    #[test]
    fn test_masked_entry_hides_value() {
        let mut prompt = PromptState::input_box(
            InputBoxSpec {
                title: Some("Token".to_string()),
                value: "hunter2".to_string(),
                password: true,
                ..InputBoxSpec::default()
            },
            '*',
        );
        prompt.validation = Some("too short".to_string());

        let text = screen_text(&prompt);
        assert!(!text.contains("hunter2"));
        assert!(text.contains("*******"));
        assert!(text.contains("too short"));
    }

    #[test]
    fn test_busy_prompt_shows_working_hint() {
        let mut prompt = PromptState::quick_pick(QuickPickSpec {
            title: "Wait".to_string(),
            items: vec![PickEntry {
                label: "one".to_string(),
                ..PickEntry::default()
            }],
            ..QuickPickSpec::default()
        });
        prompt.busy = true;

        assert!(screen_text(&prompt).contains("working"));
    }

    #[test]
    fn test_tiny_screen_does_not_panic() {
        let prompt = PromptState::quick_pick(QuickPickSpec::default());
        let backend = TestBackend::new(10, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let ui = UiConfig::default();
        terminal.draw(|f| draw(f, &prompt, &ui)).unwrap();
    }
}
