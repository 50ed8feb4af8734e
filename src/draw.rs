use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use chrono::{DateTime, Utc};

use crate::app::{App, MenuItem};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use league_api::board::{BoardSnapshot, DataState};
use league_api::game_of_week::GameOfWeek;
use league_api::matchup::{Contender, Spotlight};
use league_api::{Game, GameStatus};

static TABS: &[&str; 4] = &["Standings", "Schedule", "Spotlight", "Game of the Week"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_ticker(f, layout.ticker, app);
        }

        match app.state.active_tab {
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Spotlight => draw_spotlight(f, layout.main, app),
            MenuItem::GameOfWeek => draw_game_of_week(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Standings => 0,
        MenuItem::Schedule => 1,
        MenuItem::Spotlight => 2,
        MenuItem::GameOfWeek => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new(format!("{}  |  Help: ? ", app.state.scope.label()))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// What to show instead of board content, if anything.
fn board_notice(app: &App) -> Option<(String, Color)> {
    let Some(board) = app.state.board.as_ref() else {
        return Some(("Loading league data...".to_string(), Color::DarkGray));
    };
    match &board.state {
        DataState::Ready => None,
        DataState::Empty => Some((
            format!("No teams or games yet for {}.", board.scope.label()),
            Color::DarkGray,
        )),
        DataState::Unavailable(reason) => Some((
            format!("League data unavailable.\n{reason}\n\nPress r to retry."),
            Color::Red,
        )),
    }
}

fn draw_notice(f: &mut Frame, area: Rect, msg: &str, color: Color) {
    f.render_widget(
        Paragraph::new(msg.to_owned())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Scheduled times read on the league clock.
fn league_time(app: &App, at: DateTime<Utc>, fmt: &str) -> String {
    app.settings.league.zone().wall_clock(at).format(fmt).to_string()
}

fn stale_line(app: &App) -> Option<Line<'static>> {
    app.state.last_error.as_ref().map(|err| {
        Line::from(Span::styled(
            format!("Refresh failed, showing earlier data: {err}"),
            Style::default().fg(Color::Red),
        ))
    })
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some((msg, color)) = board_notice(app) {
        draw_notice(f, inner, &msg, color);
        return;
    }
    let Some(board) = app.state.board.as_ref() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.extend(stale_line(app));
    lines.push(Line::from(Span::styled(quick_stats(board), Style::default().fg(Color::Gray))));

    let header = format!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>6} {:>5} {:>5} {:>6}",
        "#", "Team", "W", "L", "T", "PCT", "PF", "PA", "DIFF"
    );
    for (division, rows) in &board.standings {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            division.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(header.clone(), Style::default().fg(Color::DarkGray))));
        for row in rows {
            let r = &row.record;
            let text = format!(
                "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>6} {:>5} {:>5} {:>6}",
                row.rank,
                truncate_name(&row.team.name, 24),
                r.wins,
                r.losses,
                r.ties,
                row.pct_label(),
                r.points_for,
                r.points_against,
                row.diff_label()
            );
            let style = if r.is_undefeated() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
    }

    f.render_widget(
        Paragraph::new(lines).scroll((app.state.standings_scroll, 0)),
        inner,
    );
}

fn quick_stats(board: &BoardSnapshot) -> String {
    let s = board.stats;
    let mut text = match s.week {
        Some(week) => format!("Week {week}  |  "),
        None => String::new(),
    };
    text.push_str(&format!(
        "{} teams  |  {} games this week  |  {} final  |  {} live",
        s.teams, s.games_this_week, s.completed, s.live
    ));
    let skipped = board.report.unresolved + board.report.malformed;
    if skipped > 0 {
        text.push_str(&format!("  |  {skipped} games skipped (see logs)"));
    }
    text
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Schedule ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some((msg, color)) = board_notice(app) {
        draw_notice(f, inner, &msg, color);
        return;
    }
    let Some(board) = app.state.board.as_ref() else {
        return;
    };
    if board.schedule.is_empty() {
        draw_notice(f, inner, "No games scheduled", Color::DarkGray);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    lines.extend(stale_line(app));
    let mut current_day: Option<String> = None;
    for game in &board.schedule {
        let day = game
            .scheduled_for
            .map(|t| league_time(app, t, "%a %b %-d"))
            .unwrap_or_else(|| "Date TBD".to_string());
        if current_day.as_deref() != Some(day.as_str()) {
            if current_day.is_some() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                day.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            current_day = Some(day);
        }
        lines.push(schedule_line(game, app));
    }

    f.render_widget(
        Paragraph::new(lines).scroll((app.state.schedule_scroll, 0)),
        inner,
    );
}

fn schedule_line(game: &Game, app: &App) -> Line<'static> {
    let time = game
        .time_label
        .clone()
        .or_else(|| game.scheduled_for.map(|t| league_time(app, t, "%-I:%M %p")))
        .unwrap_or_default();
    let court = game.court.clone().unwrap_or_default();
    let division = app.settings.league.short_label(&game.division);
    let matchup = format!("{} vs {}", game.home_label(), game.away_label());

    let (status, color) = match game.status {
        GameStatus::Completed => {
            let (h, a) = game.score.unwrap_or_default();
            (format!("FINAL {h}-{a}"), Color::Gray)
        }
        GameStatus::InProgress => {
            let (h, a) = game.score.unwrap_or_default();
            let mut s = format!("LIVE {h}-{a}");
            if let Some(period) = &game.period {
                s.push_str(&format!(" Q{period}"));
            }
            if let Some(clock) = &game.clock {
                s.push_str(&format!(" {clock}"));
            }
            (s, Color::Green)
        }
        GameStatus::Scheduled => (game.kind.label().to_string(), Color::White),
        GameStatus::Cancelled | GameStatus::Postponed => (game.status.label().to_uppercase(), Color::Red),
    };

    Line::from(vec![
        Span::styled(format!("{time:>9}  {court:<10} {division:<5} "), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{matchup:<44} "), Style::default().fg(Color::White)),
        Span::styled(status, Style::default().fg(color)),
    ])
}

// ---------------------------------------------------------------------------
// Spotlight
// ---------------------------------------------------------------------------

fn draw_spotlight(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Spotlight ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(board) = app.state.board.as_ref() else {
        draw_notice(f, inner, "Loading league data...", Color::DarkGray);
        return;
    };

    let featured = match &board.spotlight {
        Spotlight::Featured(featured) => featured,
        Spotlight::NoFeaturedMatchup => {
            let msg = format!(
                "No featured matchup in {}.\nNo team has an unbeaten record yet.",
                board.scope.label()
            );
            draw_notice(f, inner, &msg, Color::DarkGray);
            return;
        }
        Spotlight::Unavailable => {
            draw_notice(f, inner, "Matchup data unavailable. Press r to retry.", Color::Red);
            return;
        }
    };

    let [title_area, cards_area, story_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(7),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(featured.tier.headline())
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        title_area,
    );

    let [left, vs, right] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(cards_area);
    draw_contender(f, left, &featured.first);
    f.render_widget(
        Paragraph::new("\n\nvs").alignment(Alignment::Center),
        vs,
    );
    draw_contender(f, right, &featured.second);

    let mut lines = vec![Line::from(featured.story.clone()), Line::from("")];
    match &featured.upcoming {
        Some(game) => {
            let when = game
                .scheduled_for
                .map(|t| league_time(app, t, "%a %b %-d, %-I:%M %p"))
                .or_else(|| game.time_label.clone())
                .unwrap_or_else(|| "time TBD".to_string());
            let court = game.court.as_deref().map(|c| format!(" | {c}")).unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("Next meeting: {when}{court}"),
                Style::default().fg(Color::Green),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "No meeting on the schedule yet",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        story_area,
    );
}

fn draw_contender(f: &mut Frame, area: Rect, c: &Contender) {
    let block = default_border(Color::DarkGray).title(format!(" {} ", c.team.division));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let r = &c.record;
    let lines = vec![
        Line::from(Span::styled(
            c.team.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Record {}", r.summary())),
        Line::from(format!("PF {}  PA {}  DIFF {:+}", r.points_for, r.points_against, r.point_differential())),
        Line::from(format!("{:.1} points per game", r.points_per_game())),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

// ---------------------------------------------------------------------------
// Game of the Week
// ---------------------------------------------------------------------------

fn draw_game_of_week(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Game of the Week ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(board) = app.state.board.as_ref() else {
        draw_notice(f, inner, "Loading league data...", Color::DarkGray);
        return;
    };

    let pick = match &board.game_of_week {
        GameOfWeek::Featured(pick) => pick,
        GameOfWeek::NoGames => {
            draw_notice(f, inner, "No completed games this week yet.", Color::DarkGray);
            return;
        }
        GameOfWeek::Unavailable => {
            draw_notice(f, inner, "Game data unavailable. Press r to retry.", Color::Red);
            return;
        }
    };

    let game = &pick.game;
    let (h, a) = game.score.unwrap_or_default();
    let division = app.settings.league.short_label(&game.division);
    let mut lines = vec![
        Line::from(Span::styled(
            pick.narrative.label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} {h}  -  {a} {}", game.home_label(), game.away_label()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "{division} | {} | {}",
                pick.date.format("%a %b %-d"),
                game.court.as_deref().unwrap_or("court TBD")
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(pick.summary.clone()),
        Line::from(""),
    ];
    lines.push(Line::from(Span::styled(
        format!("Excitement {:.1}", pick.excitement),
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let help = [
        ("1-4", "switch tabs"),
        ("d", "next division (all, then each division)"),
        ("r", "reload now"),
        ("j/k", "scroll standings or schedule"),
        ("f", "full screen"),
        ("\"", "show logs"),
        ("Esc", "close help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = help
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>6}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_ticker(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = app.state.ticker_text();
    let visible = app.state.ticker.visible(&text, inner.width as usize);
    f.render_widget(
        Paragraph::new(visible).style(Style::default().fg(Color::White)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Green))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
