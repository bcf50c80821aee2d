pub mod dashboard;
pub mod helpers;

use crate::config::DashboardConfig;
use crate::snapshot::UsageSnapshot;
use crate::theme::{ColorToken, Palette, ThemeColors};
use crate::view_mode::{Action, DashboardState, ViewMode, WidthPolicy};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::io;
use std::time::{Duration, Instant};

/// Redraw cadence; also advances the pulse frame.
const TICK: Duration = Duration::from_millis(250);

pub struct App {
    snapshots: Vec<UsageSnapshot>,
    config: DashboardConfig,
    state: DashboardState,
    palette: ThemeColors,
    frame: u64,
    last_tick: Instant,
    terminal_size: Rect,
    should_redraw: bool,
    exit: bool,
}

impl App {
    pub fn new(snapshots: Vec<UsageSnapshot>, config: DashboardConfig) -> Self {
        let state = DashboardState::new(config.configured_mode());
        log::info!(
            "starting with {} snapshots in {} view",
            snapshots.len(),
            state.configured.as_str()
        );
        Self {
            snapshots,
            config,
            state,
            palette: ThemeColors::DEFAULT,
            frame: 0,
            last_tick: Instant::now(),
            terminal_size: Rect::default(),
            should_redraw: true,
            exit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<()> {
        let size = terminal.size()?;
        self.terminal_size = Rect::new(0, 0, size.width, size.height);

        while !self.exit {
            let timeout = TICK.saturating_sub(self.last_tick.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) => {
                            if key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                                self.should_redraw = true;
                                if self.exit {
                                    return Ok(());
                                }
                            }
                        }
                        Event::Resize(w, h) => {
                            self.terminal_size = Rect::new(0, 0, w, h);
                            self.should_redraw = true;
                        }
                        _ => {}
                    }
                }
            }

            if self.last_tick.elapsed() >= TICK {
                self.frame = self.frame.wrapping_add(1);
                self.last_tick = Instant::now();
                self.should_redraw = true;
            }

            if self.should_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.should_redraw = false;
            }
        }

        Ok(())
    }

    fn key_action(key: crossterm::event::KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab => Some(Action::NextMode),
            KeyCode::BackTab => Some(Action::PreviousMode),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousTab),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::NextTab),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                ViewMode::ALL.get(index).copied().map(Action::SetMode)
            }
            _ => None,
        }
    }

    fn handle_key_event(&mut self, key: crossterm::event::KeyEvent) {
        if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
            || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            self.exit = true;
            return;
        }
        if let Some(action) = Self::key_action(key) {
            let items = self.config.order_items(&self.snapshots).len();
            self.state = self.state.apply(action, items);
            log::debug!("{:?} -> {:?}", action, self.state);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let items = self.config.order_items(&self.snapshots).len();
        let effective = WidthPolicy::default().effective(self.state.configured, items, area.width);
        let mode_bar =
            dashboard::render_mode_bar(self.state.configured, effective, area.width, &self.palette);
        frame.render_widget(Paragraph::new(mode_bar), chunks[0]);

        let body = dashboard::render_dashboard(
            &self.snapshots,
            &self.config,
            &self.state,
            chunks[1].width,
            chunks[1].height,
            &self.palette,
            self.frame,
        );
        frame.render_widget(Paragraph::new(body), chunks[1]);

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let k = Style::default()
            .fg(self.palette.color(ColorToken::TextSecondary))
            .add_modifier(Modifier::BOLD);
        let t = Style::default().fg(self.palette.color(ColorToken::TextMuted));
        let sep = Span::styled(" │ ", Style::default().fg(self.palette.border_default));

        let spans = vec![
            Span::styled("Tab/S-Tab", k),
            Span::styled(" view", t),
            sep.clone(),
            Span::styled("1-5", k),
            Span::styled(" jump", t),
            sep.clone(),
            Span::styled("←→", k),
            Span::styled(" account", t),
            sep.clone(),
            Span::styled("↑↓", k),
            Span::styled(" scroll", t),
            sep,
            Span::styled("q/Esc", k),
            Span::styled(" quit", t),
        ];

        let status_bar = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(self.palette.bg_primary))
            .alignment(Alignment::Center);
        frame.render_widget(status_bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_keys_map_to_actions() {
        assert_eq!(App::key_action(press(KeyCode::Tab)), Some(Action::NextMode));
        assert_eq!(App::key_action(press(KeyCode::BackTab)), Some(Action::PreviousMode));
        assert_eq!(
            App::key_action(press(KeyCode::Char('4'))),
            Some(Action::SetMode(ViewMode::Split))
        );
        assert_eq!(App::key_action(press(KeyCode::Char('9'))), None);
        assert_eq!(App::key_action(press(KeyCode::Char('j'))), Some(Action::ScrollDown));
    }

    #[test]
    fn test_quit_and_mode_cycling() {
        let mut app = App::new(Vec::new(), DashboardConfig::default());
        app.handle_key_event(press(KeyCode::Tab));
        assert_eq!(app.state.configured, ViewMode::Stacked);
        app.handle_key_event(press(KeyCode::BackTab));
        app.handle_key_event(press(KeyCode::BackTab));
        assert_eq!(app.state.configured, ViewMode::Compare);
        assert!(!app.exit);
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.exit);
    }
}
