use crate::app::{App, FocusPane};
use oddsboard_core::{Card, Rank, SlotRef, Suit, HAND_SLOTS};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    draw_slots(frame, root[1], app);
    draw_grid(frame, root[2], app);
    draw_result(frame, root[3], app);
    draw_events(frame, root[4], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Poker Probability Calculator | Focus: {} | Hint: {}",
        app.focus_label(app.focus),
        app.next_hint()
    );
    let summary = format!(
        "Cards chosen {}/7  Opponents {}  Engine {}",
        app.selection.filled_count(),
        app.config.num_opponents,
        app.config.endpoint
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_slots(frame: &mut Frame, area: Rect, app: &App) {
    let slots: Vec<SlotRef> = SlotRef::all().collect();
    let constraints: Vec<Constraint> = slots
        .iter()
        .map(|_| Constraint::Ratio(1, slots.len() as u32))
        .collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (position, slot) in slots.iter().enumerate() {
        let editing = app.selection.cursor() == Some(*slot);
        let focused = app.focus == FocusPane::Slots && app.slot_cursor == position;
        let title = if position < HAND_SLOTS {
            format!("{} Hand", position + 1)
        } else {
            format!("{} Table", position + 1)
        };
        let label = match app.selection.slot(*slot) {
            Some(card) => Span::styled(
                card.to_string(),
                suit_style(card.suit).add_modifier(Modifier::BOLD),
            ),
            None if editing => Span::styled("pick...", Style::default().fg(Color::Green)),
            None => Span::styled("Select", Style::default().fg(Color::DarkGray)),
        };
        let mut block = Block::default().title(title).borders(Borders::ALL);
        if editing {
            block = block.border_style(Style::default().fg(Color::Green));
        } else if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(
            Paragraph::new(Line::from(label))
                .alignment(Alignment::Center)
                .block(block),
            cells[position],
        );
    }
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::with_capacity(Suit::ALL.len() + 1);
    let mut header = vec![Span::raw("   ")];
    for rank in Rank::ALL {
        header.push(Span::raw(format!("{:>4}", rank.code())));
    }
    lines.push(Line::from(header));

    for (row, suit) in Suit::ALL.iter().enumerate() {
        let mut spans = vec![Span::raw(format!("{:<3}", suit.code()))];
        for (col, rank) in Rank::ALL.iter().enumerate() {
            let card = Card::new(*rank, *suit);
            let text = format!("{:>4}", card.to_string());
            let mut style = if app.selection.is_selectable(card) {
                suit_style(*suit)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            };
            if app.focus == FocusPane::Grid && app.grid_row == row && app.grid_col == col {
                style = style
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    let title = match app.selection.cursor() {
        Some(slot) => format!("Cards (placing into {slot})"),
        None => "Cards".to_string(),
    };
    let block = pane_block(title.as_str(), app.focus == FocusPane::Grid);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_result(frame: &mut Frame, area: Rect, app: &App) {
    let style = if app.selection.result_is_stale() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let block = Block::default().borders(Borders::ALL).title("Result");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(app.result_line(), style)))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line<'_>> = app
        .visible_events(capacity)
        .map(|line| Line::from(line.clone()))
        .collect();
    let title = if app.event_scroll > 0 {
        format!("Events (+{} newer)", app.event_scroll)
    } else {
        "Events".to_string()
    };
    let block = pane_block(title.as_str(), app.focus == FocusPane::Events);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("q quit | ? help | tab focus | arrows/hjkl move"),
        Line::from("enter/space: edit slot (Slots) or place card (Cards)"),
        Line::from("1-7 edit slot directly | esc cancel edit"),
        Line::from("up/down in Events scrolls the log"),
        Line::from("c calculate (needs both hand cards) | r reset"),
        Line::from("crossed-out cards are already on the board"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn suit_style(suit: Suit) -> Style {
    match suit {
        Suit::Hearts | Suit::Diamonds => Style::default().fg(Color::Red),
        Suit::Clubs | Suit::Spades => Style::default(),
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if focused {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    block
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
