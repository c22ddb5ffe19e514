//! Ratatui-based terminal UI.
//!
//! Layout mirrors the dashboard page: title and headline metrics, a tabbed
//! overview of time-based charts, a collapsible loan performance section and
//! a condition-scoped section with its own selector and tabs. Every key press
//! that changes `DashboardState` reruns `dashboard::render`.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};
use tracing::info;

use crate::analysis::LoanTable;
use crate::app::pipeline::Session;
use crate::dashboard::{Dashboard, Panel, render};
use crate::data::LoadSummary;
use crate::domain::LoanCondition;
use crate::error::AppError;
use crate::state::DashboardState;

mod plotters_chart;

use plotters_chart::ChartWidget;

/// Start the TUI.
pub fn run(session: Session) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    table: LoanTable,
    summary: LoadSummary,
    state: DashboardState,
    dashboard: Dashboard,
    overview_tab: usize,
    condition_tab: usize,
    performance_expanded: bool,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        let state = DashboardState::default();
        let dashboard = render(&state, &session.table);
        let status = if session.summary.rows_skipped > 0 {
            format!(
                "Loaded {} loans ({} rows skipped, see log)",
                session.summary.rows_used, session.summary.rows_skipped
            )
        } else {
            format!("Loaded {} loans", session.summary.rows_used)
        };

        Self {
            table: session.table,
            summary: session.summary,
            state,
            dashboard,
            overview_tab: 0,
            condition_tab: 0,
            performance_expanded: true,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply one key press; returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.overview_tab = 0,
            KeyCode::Char('2') => self.overview_tab = 1,
            KeyCode::Char('3') => self.overview_tab = 2,
            KeyCode::Tab => {
                self.overview_tab = (self.overview_tab + 1) % self.dashboard.overview.len().max(1);
            }
            KeyCode::BackTab => {
                let n = self.dashboard.overview.len().max(1);
                self.overview_tab = (self.overview_tab + n - 1) % n;
            }
            KeyCode::Char('e') => {
                self.performance_expanded = !self.performance_expanded;
            }
            KeyCode::Char('c') | KeyCode::Left | KeyCode::Right => {
                self.state.toggle_condition();
                self.rerun();
            }
            KeyCode::Char('g') => self.select_condition(LoanCondition::Good),
            KeyCode::Char('x') => self.select_condition(LoanCondition::Bad),
            KeyCode::Char('h') => self.condition_tab = 0,
            KeyCode::Char('b') => self.condition_tab = 1,
            KeyCode::Char('[') | KeyCode::Char(']') => {
                self.condition_tab = 1 - self.condition_tab.min(1);
            }
            _ => {}
        }
        false
    }

    fn select_condition(&mut self, condition: LoanCondition) {
        if self.state.condition != condition {
            self.state.select(condition);
            self.rerun();
        }
    }

    fn rerun(&mut self) {
        self.dashboard = render(&self.state, &self.table);
        let n = self.table.subset(self.state.condition).len();
        info!(condition = %self.state.condition, loans = n, "condition changed");
        self.status = format!("{}: {n} loans", self.state.condition);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_metrics(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                self.dashboard.title.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", self.summary.source),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let n = self.dashboard.metrics.len().max(1) as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
            .split(area);

        for (metric, rect) in self.dashboard.metrics.iter().zip(columns.iter()) {
            let p = Paragraph::new(Span::styled(
                metric.value.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().title(metric.label.as_str()).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let performance = if self.performance_expanded {
            Constraint::Percentage(30)
        } else {
            Constraint::Length(1)
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(35), performance, Constraint::Min(0)])
            .split(area);

        self.draw_overview(frame, chunks[0]);
        self.draw_performance(frame, chunks[1]);
        self.draw_condition(frame, chunks[2]);
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Overview").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let titles: Vec<String> = self
            .dashboard
            .overview
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{} {}", i + 1, p.heading))
            .collect();
        draw_tabbed_panel(frame, inner, titles, self.overview_tab, &self.dashboard.overview);
    }

    fn draw_performance(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if !self.performance_expanded {
            let p = Paragraph::new(Span::styled(
                "▶ Loan Performance (e to expand)",
                Style::default().fg(Color::Gray),
            ));
            frame.render_widget(p, area);
            return;
        }

        let block = Block::default()
            .title("▼ Loan Performance (e to collapse)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);
        for (panel, rect) in self.dashboard.performance.iter().zip(columns.iter()) {
            draw_panel(frame, *rect, panel);
        }
    }

    fn draw_condition(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Loan Condition Analysis")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let mut selector = vec![Span::raw("Select Loan Condition: ")];
        for condition in LoanCondition::ALL {
            let (mark, style) = if condition == self.dashboard.condition {
                ("(•)", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            } else {
                ("( )", Style::default().fg(Color::Gray))
            };
            selector.push(Span::styled(format!("{mark} {}  ", condition.display_name()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(selector)), chunks[0]);

        let titles = self
            .dashboard
            .by_condition
            .iter()
            .map(|p| p.heading.clone())
            .collect();
        draw_tabbed_panel(
            frame,
            chunks[1],
            titles,
            self.condition_tab,
            &self.dashboard.by_condition,
        );
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1/2/3 Tab overview  e expand  c/←/→ condition  h/b chart  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Tab bar on the first row, selected panel below it.
fn draw_tabbed_panel(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    titles: Vec<String>,
    selected: usize,
    panels: &[Panel],
) {
    if area.height == 0 || panels.is_empty() {
        return;
    }
    let selected = selected.min(panels.len() - 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, chunks[0]);
    draw_chart(frame, chunks[1], &panels[selected]);
}

/// Panel with its heading as a title line above the chart.
fn draw_panel(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    if area.height == 0 {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            panel.heading.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );
    draw_chart(frame, chunks[1], panel);
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, panel: &Panel) {
    let block = Block::default()
        .title(panel.chart.title.as_str())
        .borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);
    frame.render_widget(ChartWidget::new(&panel.chart), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::record;

    fn app() -> App {
        let table = LoanTable::new(vec![
            record("1", 1000.0, LoanCondition::Good),
            record("2", 2000.0, LoanCondition::Good),
            record("3", 3000.0, LoanCondition::Bad),
        ]);
        App::new(Session {
            table,
            summary: LoadSummary {
                source: "test".to_string(),
                rows_read: 3,
                rows_used: 3,
                rows_skipped: 0,
            },
        })
    }

    #[test]
    fn condition_keys_rerun_render() {
        let mut app = app();
        assert_eq!(app.dashboard.condition, LoanCondition::Good);

        assert!(!app.handle_key(KeyCode::Char('c')));
        assert_eq!(app.dashboard.condition, LoanCondition::Bad);
        assert_eq!(app.status, "Bad Loan: 1 loans");

        app.handle_key(KeyCode::Char('g'));
        assert_eq!(app.dashboard.condition, LoanCondition::Good);
    }

    #[test]
    fn tabs_and_expander() {
        let mut app = app();
        app.handle_key(KeyCode::Char('3'));
        assert_eq!(app.overview_tab, 2);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.overview_tab, 0);
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.overview_tab, 2);

        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.condition_tab, 1);
        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.condition_tab, 0);

        assert!(app.performance_expanded);
        app.handle_key(KeyCode::Char('e'));
        assert!(!app.performance_expanded);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
    }
}
