use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use crate::stats::RoundRecord;
use crate::util;
use crate::App;

pub fn played_ago(played_at: DateTime<Local>) -> String {
    let age = (Local::now() - played_at).to_std().unwrap_or_default();
    HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past)
}

pub fn distance_display(distance: Option<usize>) -> String {
    distance.map_or_else(|| "—".to_string(), |d| d.to_string())
}

/// Pure presenter for a single round row
pub fn present_round_row(record: &RoundRecord) -> Row<'static> {
    let outcome_style = if record.outcome == "won" {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    Row::new(vec![
        Cell::from(played_ago(record.played_at)),
        Cell::from(record.title.clone()),
        Cell::from(record.source.clone()),
        Cell::from(record.outcome.clone()).style(outcome_style),
        Cell::from(util::format_clock(record.elapsed_secs)),
        Cell::from(record.guesses.to_string()),
        Cell::from(distance_display(record.distance)),
    ])
}

/// Render the round history screen
pub fn render_history(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // rounds table
            Constraint::Length(3), // instructions
        ])
        .split(area);

    let (wins, losses) = app
        .game
        .stats_db
        .as_ref()
        .and_then(|db| db.totals().ok())
        .unwrap_or((0, 0));

    let title = Paragraph::new(format!("Round History: {wins} won / {losses} lost"))
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let records = app
        .game
        .stats_db
        .as_ref()
        .and_then(|db| db.recent_rounds(200).ok())
        .unwrap_or_default();

    if records.is_empty() {
        let no_data = Paragraph::new("No rounds on record yet. Play one to fill the book.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        // Calculate scrolling bounds
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = records.len().saturating_sub(table_height);

        // Clamp scroll offset
        if app.history.scroll_offset > max_scroll {
            app.history.scroll_offset = max_scroll;
        }

        let header = Row::new(vec![
            Cell::from("When"),
            Cell::from("Passage"),
            Cell::from("Source"),
            Cell::from("Outcome"),
            Cell::from("Time"),
            Cell::from("Guesses"),
            Cell::from("Distance"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let visible_rows: Vec<Row> = records
            .iter()
            .skip(app.history.scroll_offset)
            .take(table_height)
            .map(present_round_row)
            .collect();

        let widths = [
            Constraint::Length(18), // When
            Constraint::Min(14),    // Passage
            Constraint::Length(10), // Source
            Constraint::Length(8),  // Outcome
            Constraint::Length(6),  // Time
            Constraint::Length(8),  // Guesses
            Constraint::Length(9),  // Distance
        ];

        let table = Table::new(visible_rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Rounds"))
            .column_spacing(2);

        f.render_widget(table, chunks[1]);
    }

    let instructions =
        Paragraph::new("(↑/↓) scroll  (PgUp/PgDn) page  (Home) top  (b/backspace) back")
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn played_ago_reads_like_the_past() {
        let five_min = Local::now() - chrono::Duration::minutes(5);
        assert!(played_ago(five_min).contains("ago"));

        let just_now = Local::now();
        assert!(!played_ago(just_now).is_empty());
    }

    #[test]
    fn distance_column_shows_a_dash_for_losses() {
        assert_eq!(distance_display(Some(12)), "12");
        assert_eq!(distance_display(None), "—");
    }
}
