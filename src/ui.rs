pub mod charting;
pub mod history;
pub mod passage_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use webbrowser::Browser;

use crate::celebration::ParticleKind;
use crate::engine::{Outcome, Phase};
use crate::util;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Split the screen into the voice pane, the passage pane and the
/// legend line. Click handling uses the same split, so the passage
/// pane's cells stay in lockstep with the wrapped rows.
pub fn playing_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let magenta_style = Style::default().fg(Color::Magenta);

        match (!game.has_finished(), game.session.phase() == Phase::Idle) {
            (true, idle) => {
                let (voice_area, passage_area, legend_area) = playing_layout(area);

                if idle {
                    let idle_message = Paragraph::new(Span::styled(
                        "Press space to start the voice, then click the word being spoken",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
                    ))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });

                    idle_message.render(voice_area, buf);
                } else {
                    let word = game.spoken_word.clone().unwrap_or_default();
                    let lines = vec![
                        Line::from(Span::styled(
                            word,
                            magenta_style.patch(bold_style),
                        )),
                        Line::from(""),
                        Line::from(Span::styled(
                            format!(
                                "{}   {} guesses",
                                util::format_clock(game.elapsed_secs),
                                game.guesses
                            ),
                            dim_bold_style,
                        )),
                    ];

                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .render(voice_area, buf);
                }

                // one buffer line per wrapped row, no re-wrapping, so
                // mouse coordinates map straight back to rows
                let rows = passage_view::wrap_units(game.doc.units(), passage_area.width);
                let lines: Vec<Line> = rows
                    .iter()
                    .take(passage_area.height as usize)
                    .map(|row| Line::from(row.text.clone()))
                    .collect();

                Paragraph::new(lines).render(passage_area, buf);

                let legend_text = if idle {
                    "(space) listen / (esc)ape"
                } else {
                    "click the word being spoken / (esc)ape"
                };
                Paragraph::new(Span::styled(legend_text, italic_style))
                    .render(legend_area, buf);
            }
            (false, _) => {
                let show_settings = matches!(self.state, AppState::Results);

                let constraints = if show_settings {
                    vec![
                        Constraint::Min(1),    // chart
                        Constraint::Length(1), // outcome line
                        Constraint::Length(1), // guess spread
                        Constraint::Length(3), // round info box
                        Constraint::Length(1), // padding
                        Constraint::Length(1), // legend
                    ]
                } else {
                    vec![
                        Constraint::Min(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                    ]
                };

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints(constraints.as_slice())
                    .split(area);

                let tuples: Vec<(f64, f64)> = game
                    .progress_points
                    .iter()
                    .map(|&p| p.into())
                    .collect();

                let (overall_duration, offset_ceiling) =
                    charting::compute_chart_params(&tuples, game.doc_chars);

                let datasets = vec![Dataset::default()
                    .marker(ratatui::symbols::Marker::Braille)
                    .style(magenta_style)
                    .graph_type(GraphType::Line)
                    .data(&tuples)];

                let chart = Chart::new(datasets)
                    .x_axis(
                        Axis::default()
                            .title("seconds")
                            .bounds([0.0, overall_duration])
                            .labels(vec![
                                Span::styled("0", bold_style),
                                Span::styled(
                                    charting::format_label(overall_duration),
                                    bold_style,
                                ),
                            ]),
                    )
                    .y_axis(
                        Axis::default()
                            .title("chars")
                            .bounds([0.0, offset_ceiling])
                            .labels(vec![
                                Span::styled("0", bold_style),
                                Span::styled(charting::format_label(offset_ceiling), bold_style),
                            ]),
                    );

                chart.render(chunks[0], buf);

                let outcome_summary = match game.outcome {
                    Some(Outcome::Won) => {
                        let distance = game.guess_distances.last().map_or(0, |d| *d as usize);
                        format!(
                            "won in {}   {} guesses   {} chars off",
                            util::format_clock(game.elapsed_secs),
                            game.guesses,
                            distance
                        )
                    }
                    _ => format!(
                        "lost in {}   {} guesses",
                        util::format_clock(game.elapsed_secs),
                        game.guesses
                    ),
                };

                let stats = Paragraph::new(Span::styled(outcome_summary, bold_style))
                    .alignment(Alignment::Center);

                stats.render(chunks[1], buf);

                let spread_summary = if game.guess_distances.is_empty() {
                    String::from("no guesses made")
                } else {
                    format!(
                        "guess spread: {:.1} mean   {:.1} sd",
                        util::mean(&game.guess_distances).unwrap_or(0.0),
                        util::std_dev(&game.guess_distances).unwrap_or(0.0)
                    )
                };
                let spread_widget = Paragraph::new(Span::styled(
                    spread_summary,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center);

                spread_widget.render(chunks[2], buf);

                if show_settings {
                    let round_info = format!(
                        "Passage: {} | Source: {} | Voice: {} wpm | Tolerance: {} chars | Length: {} chars",
                        game.passage.title,
                        game.passage.source,
                        game.wpm,
                        game.tolerance,
                        game.doc_chars
                    );

                    let info_widget = Paragraph::new(round_info)
                        .style(
                            Style::default()
                                .fg(Color::Gray)
                                .add_modifier(Modifier::ITALIC),
                        )
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true });

                    info_widget.render(chunks[3], buf);
                }

                let legend_chunk_index = if show_settings { 5 } else { 4 };
                let legend = Paragraph::new(Span::styled(
                    String::from(if Browser::is_available() {
                        "(r)eplay / (n)ew / (h)istory / (t)weet / (esc)ape"
                    } else {
                        "(r)eplay / (n)ew / (h)istory / (esc)ape"
                    }),
                    italic_style,
                ));

                legend.render(chunks[legend_chunk_index], buf);

                // Render celebration animation if active
                if game.celebration.is_active {
                    render_celebration_particles(&game.celebration, area, buf);
                }
            }
        }
    }
}

/// Render celebration particles on top of the results screen
fn render_celebration_particles(
    celebration: &crate::celebration::CelebrationAnimation,
    area: Rect,
    buf: &mut Buffer,
) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];

            // fade with age
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = match particle.kind {
                ParticleKind::Letter => {
                    if alpha > 0.4 {
                        Style::default().fg(color).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(color)
                    }
                }
                ParticleKind::Burst => {
                    if alpha > 0.7 {
                        Style::default().fg(color).add_modifier(Modifier::BOLD)
                    } else if alpha > 0.3 {
                        Style::default().fg(color)
                    } else {
                        Style::default().fg(color).add_modifier(Modifier::DIM)
                    }
                }
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
