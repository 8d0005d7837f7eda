use ratatui::{prelude::*, widgets::*};
use tripleytz::{Category, Column, ColumnTotals, Slot, NUM_DICE};

use crate::app::{App, Mode};

const DIE_WIDTH: u16 = 7;

const DICE_WIDGET_WIDTH: u16 = DIE_WIDTH * NUM_DICE as u16;

const LABEL_WIDTH: u16 = 22;

const CELL_WIDTH: u16 = 7;

const HELP: &str = "r roll  1-5 keep  arrows pick  Enter score  u undo  n new  h high scores  q quit";

pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::new(
        Direction::Vertical,
        [
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ],
    )
    .split(frame.size());

    frame.render_widget(score_table(app), main_layout[0]);
    frame.render_widget(roll_line(app), main_layout[1]);
    frame.render_widget(
        DiceWidget {
            faces: app.shown_faces(),
            kept: app.game.dice().kept(),
        },
        main_layout[2],
    );
    frame.render_widget(
        Paragraph::new(app.status.as_str()).alignment(Alignment::Center),
        main_layout[3],
    );
    frame.render_widget(
        Paragraph::new(HELP)
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::DarkGray)),
        main_layout[4],
    );

    match &app.mode {
        Mode::Playing => {}
        Mode::GameOver { final_score } => popup(
            frame,
            "Game over",
            vec![
                Line::from(format!("Final score: {}", final_score)),
                Line::from("Not enough for the high scores this time."),
                Line::from(""),
                Line::from("Press Enter for a new game"),
            ],
        ),
        Mode::NamePrompt { final_score, input } => popup(
            frame,
            "New high score!",
            vec![
                Line::from(format!("Final score: {}", final_score)),
                Line::from(""),
                Line::from(vec![
                    Span::raw("Name: "),
                    Span::styled(input.as_str(), Style::new().add_modifier(Modifier::BOLD)),
                    Span::styled("_", Style::new().add_modifier(Modifier::SLOW_BLINK)),
                ]),
            ],
        ),
        Mode::HighScores => high_scores(frame, app),
    }
}

fn roll_line(app: &App) -> Paragraph<'static> {
    let text = if app.game.can_roll() {
        format!("Roll! ({} left)", app.game.rolls_left())
    } else {
        String::from("No rolls left, pick a score")
    };
    let style = if app.game.can_roll() {
        Style::new().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::new().fg(Color::DarkGray)
    };
    Paragraph::new(text).style(style).alignment(Alignment::Center)
}

fn score_table(app: &App) -> Table<'static> {
    let totals = Column::ALL.map(|column| app.game.totals(column));
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(Column::ALL.iter().map(|column| Cell::from(column.to_string()))),
    )
    .style(Style::new().add_modifier(Modifier::BOLD));

    let mut rows = Vec::new();
    for category in Category::UPPER {
        rows.push(category_row(app, category));
    }
    rows.push(totals_row("Total", &totals, |t| t.upper_subtotal));
    rows.push(totals_row("Bonus", &totals, |t| t.bonus));
    rows.push(totals_row("Upper total", &totals, |t| t.upper_total));
    for category in Category::LOWER {
        rows.push(category_row(app, category));
    }
    rows.push(totals_row("Lower total", &totals, |t| t.lower_total));
    rows.push(totals_row("Upper total", &totals, |t| t.upper_total));
    rows.push(totals_row("Combined", &totals, |t| t.combined_total));
    rows.push(
        totals_row("Total score", &totals, |t| t.final_total)
            .style(Style::new().add_modifier(Modifier::BOLD)),
    );

    let title = format!(
        " Triple Yahtzee  {} plays left  Grand total {} ",
        app.game.plays_left(),
        app.game.grand_total()
    );
    Table::new(
        rows,
        [
            Constraint::Length(LABEL_WIDTH),
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(CELL_WIDTH),
            Constraint::Length(CELL_WIDTH),
        ],
    )
    .header(header)
    .block(
        Block::new()
            .title(title)
            .border_type(BorderType::Rounded)
            .borders(Borders::all()),
    )
}

fn category_row(app: &App, category: Category) -> Row<'static> {
    let cells = Column::ALL.iter().map(|&column| {
        let slot = app.game.slot(category, column);
        let text = slot.shown().map(|v| v.to_string()).unwrap_or_default();
        let mut style = match slot {
            Slot::Committed(_) => Style::new(),
            Slot::Previewing(_) => Style::new().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            Slot::Empty => Style::new().fg(Color::DarkGray),
        };
        if app.mode == Mode::Playing && app.cursor == (category, column) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let text = if text.is_empty() { String::from("  .") } else { format!("{:>3}", text) };
        Cell::from(text).style(style)
    });
    Row::new(std::iter::once(Cell::from(category.label())).chain(cells))
}

fn totals_row(
    label: &'static str,
    totals: &[ColumnTotals; Column::COUNT],
    field: impl Fn(&ColumnTotals) -> Option<u32>,
) -> Row<'static> {
    let cells = totals.iter().map(|t| {
        Cell::from(field(t).map(|v| format!("{:>3}", v)).unwrap_or_default())
    });
    Row::new(std::iter::once(Cell::from(label)).chain(cells))
        .style(Style::new().fg(Color::Cyan))
}

fn high_scores(frame: &mut Frame, app: &App) {
    let area = centered(frame.size(), 60, 24);
    let rows: Vec<Row> = app
        .config
        .high_scores()
        .ranked()
        .map(|(rank, hs)| {
            Row::new([
                format!("{:>2}.", rank),
                hs.name.clone(),
                hs.score.to_string(),
                hs.when.format("%Y-%m-%d %H:%M").to_string(),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(16),
        ],
    )
    .header(
        Row::new(["", "Name", "Score", "When"]).style(Style::new().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::new()
            .title(" High scores ")
            .title_bottom(" c clear  Esc back ")
            .border_type(BorderType::Rounded)
            .borders(Borders::all()),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(table, area);
}

fn popup(frame: &mut Frame, title: &str, lines: Vec<Line>) {
    let area = centered(frame.size(), 44, lines.len() as u16 + 2);
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::new()
            .title(format!(" {} ", title))
            .border_type(BorderType::Rounded)
            .borders(Borders::all()),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Five dice side by side. Kept dice sit one line higher.
struct DiceWidget {
    faces: [u8; NUM_DICE],
    kept: [bool; NUM_DICE],
}

impl Widget for DiceWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(DICE_WIDGET_WIDTH),
                Constraint::Min(0),
            ])
            .split(area)[1];
        if area.height < 4 {
            return;
        }
        for i in 0..NUM_DICE {
            let x = area.x + i as u16 * DIE_WIDTH;
            let y = if self.kept[i] { area.y } else { area.y + 1 };
            let style = if self.kept[i] {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            };
            let block = Block::new()
                .border_type(BorderType::Rounded)
                .borders(Borders::all())
                .border_style(style)
                .title(format!("{}", i + 1));
            block.render(
                Rect {
                    x,
                    y,
                    width: DIE_WIDTH - 1,
                    height: 3,
                },
                buf,
            );
            buf.set_string(x + 2, y + 1, self.faces[i].to_string(), style);
            if self.kept[i] {
                buf.set_string(x + 1, y + 3, "keep", style);
            }
        }
    }
}
