use crate::mood_entry::{format_date, parse_tags, Mood, MoodEntry};
use crate::mood_store::{MoodStore, SearchResults};
use crate::week::WeekSummary;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use rand::seq::SliceRandom;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

const QUOTES: [&str; 4] = [
    "Keep smiling, it suits you!",
    "Every day is a fresh start.",
    "Focus on the good things.",
    "You are stronger than you think.",
];

const CURSOR_BLINK: Duration = Duration::from_millis(500);

pub enum Action {
    Record(Mood),
    View(String),
    Delete(String),
    Search,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    selected_mood: usize,
    selected_entry: usize,
    status: Option<String>,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

impl UI {
    pub fn new(initial_mood: Mood) -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            selected_mood: Mood::ALL
                .iter()
                .position(|m| *m == initial_mood)
                .unwrap_or(0),
            selected_entry: 0,
            status: None,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Shows the logo screen for `duration`, or until a key is pressed.
    pub fn splash(&mut self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Ok(());
        }

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(40),
                    Constraint::Length(4),
                    Constraint::Min(0),
                ])
                .split(f.area());

            let emojis = Mood::ALL
                .iter()
                .map(|m| m.emoji())
                .collect::<Vec<_>>()
                .join(" ");
            let logo = Paragraph::new(vec![
                Line::from(Span::styled(
                    "Mood Tracker",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(emojis),
            ])
            .alignment(Alignment::Center);
            f.render_widget(logo, chunks[1]);
        })?;

        if event::poll(duration)? {
            event::read()?;
        }
        Ok(())
    }

    pub fn display(&mut self, store: &MoodStore) -> Result<()> {
        self.selected_entry = self.selected_entry.min(store.len().saturating_sub(1));
        let selected_mood = self.selected_mood;
        let selected_entry = self.selected_entry;
        let status = self.status.clone().unwrap_or_default();

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(title("How Are You Feeling?"), chunks[0]);

            let picker = Paragraph::new(mood_picker_line(selected_mood))
                .block(Block::default().borders(Borders::ALL).title("Pick a mood"))
                .alignment(Alignment::Center);
            f.render_widget(picker, chunks[1]);

            if store.is_empty() {
                let empty = Paragraph::new("No mood recorded yet. Please add a mood first.")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title("Mood Details"));
                f.render_widget(empty, chunks[2]);
            } else {
                let history = List::new(history_items(store.get_entries()))
                    .block(Block::default().borders(Borders::ALL).title("Mood Details"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    history,
                    chunks[2],
                    &mut ListState::default().with_selected(Some(selected_entry)),
                );
            }

            let status_line =
                Paragraph::new(status).style(Style::default().fg(Color::Magenta));
            f.render_widget(status_line, chunks[3]);

            let mut keys = vec![("Left/Right", "pick"), ("Enter", "record")];
            if !store.is_empty() {
                keys.extend([
                    ("Up/Down", "select"),
                    ("v", "details"),
                    ("d", "delete"),
                    ("s", "search"),
                ]);
            }
            keys.push(("q", "quit"));
            f.render_widget(controls(&keys), chunks[4]);
        })?;

        Ok(())
    }

    pub fn handle_input(&mut self, store: &MoodStore) -> Result<Option<Action>> {
        let Some(key) = read_key()? else {
            return Ok(None);
        };
        self.status = None;

        let selected = store.get_entries().get(self.selected_entry);
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Left => {
                self.selected_mood = self.selected_mood.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                self.selected_mood = (self.selected_mood + 1).min(Mood::ALL.len() - 1);
                None
            }
            KeyCode::Up => {
                self.selected_entry = self.selected_entry.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected_entry + 1 < store.len() {
                    self.selected_entry += 1;
                }
                None
            }
            KeyCode::Enter => Some(Action::Record(Mood::ALL[self.selected_mood])),
            KeyCode::Char('v') => selected.map(|e| Action::View(e.id.clone())),
            KeyCode::Char('d') => selected.map(|e| Action::Delete(e.id.clone())),
            KeyCode::Char('s') if !store.is_empty() => Some(Action::Search),
            _ => None,
        };
        Ok(action)
    }

    /// Prompts for comma-separated triggers. Esc records the mood without any.
    pub fn get_tags(&mut self, mood: Mood) -> Result<Vec<String>> {
        let mut tags = String::new();

        loop {
            let heading = format!("Recording {} {}", mood, mood.emoji());
            let input = tags.clone();
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(f.area());

                f.render_widget(title(&heading), chunks[0]);

                let tags_input = Paragraph::new(input).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Triggers (comma-separated)"),
                );
                f.render_widget(tags_input, chunks[1]);

                f.render_widget(instructions("Enter: Save, Esc: Skip triggers"), chunks[2]);
            })?;

            if let Some(key) = read_key()? {
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Esc => return Ok(Vec::new()),
                    KeyCode::Char(c) => tags.push(c),
                    KeyCode::Backspace => {
                        tags.pop();
                    }
                    _ => {}
                }
            }
        }

        Ok(parse_tags(&tags))
    }

    /// Details screen: note editing plus the weekly chart. Shows only the chart
    /// when `id` is no longer in the store.
    pub fn view_details(&mut self, store: &mut MoodStore, id: &str) -> Result<()> {
        let mut note = store
            .get_mood_entry(id)
            .map(|e| e.note.clone())
            .unwrap_or_default();
        let quote = QUOTES.choose(&mut rand::thread_rng()).copied().unwrap_or(QUOTES[0]);
        let mut week = WeekSummary::current(store);

        loop {
            if week.is_stale(store) {
                week = WeekSummary::current(store);
            }

            let now = Instant::now();
            if now.duration_since(self.last_cursor_update) >= CURSOR_BLINK {
                self.cursor_visible = !self.cursor_visible;
                self.last_cursor_update = now;
            }

            let entry = store.get_mood_entry(id).cloned();
            let cursor_visible = self.cursor_visible;
            let draft = note.clone();
            self.terminal.draw(|f| {
                let note_height = if entry.is_some() { 9 } else { 0 };
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(note_height),
                        Constraint::Min(12),
                        Constraint::Length(3),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Mood Details"), chunks[0]);

                if let Some(entry) = &entry {
                    render_note_editor(f, chunks[1], entry, &draft, cursor_visible);
                }

                render_week_chart(f, chunks[2], &week);

                let quote_card = Paragraph::new(quote)
                    .style(Style::default().fg(Color::from_u32(0xE0F7FA)))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(quote_card, chunks[3]);

                let keys: &[(&str, &str)] = if entry.is_some() {
                    &[("Type", "edit note"), ("Ctrl-S/F2", "save"), ("Esc", "back")]
                } else {
                    &[("Esc", "back")]
                };
                f.render_widget(controls(keys), chunks[4]);
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Some(key) = read_key()? else {
                continue;
            };

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            let saving = key.code == KeyCode::F(2) || (ctrl && key.code == KeyCode::Char('s'));
            match key.code {
                KeyCode::Esc => break,
                _ if saving => {
                    store.update_mood_note(id, note.clone());
                }
                _ if entry.is_some() => edit_note(&mut note, key),
                _ => {}
            }
        }

        Ok(())
    }

    pub fn get_search_query(&mut self) -> Result<String> {
        let mut query = String::new();

        loop {
            let input = query.clone();
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(f.area());

                f.render_widget(title("Search Moods"), chunks[0]);

                let search_input = Paragraph::new(input).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Mood, note or trigger"),
                );
                f.render_widget(search_input, chunks[1]);

                f.render_widget(instructions("Enter: Submit, Esc: Cancel"), chunks[2]);
            })?;

            if let Some(key) = read_key()? {
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Char(c) => query.push(c),
                    KeyCode::Backspace => {
                        query.pop();
                    }
                    KeyCode::Esc => return Ok(String::new()),
                    _ => {}
                }
            }
        }

        Ok(query)
    }

    pub fn display_search_results(&mut self, store: &mut MoodStore, query: &str) -> Result<()> {
        let mut results = SearchResults::new(store, query);
        let mut selected_index = 0;

        loop {
            if results.refresh(store) {
                selected_index = selected_index.min(results.entries().len().saturating_sub(1));
            }

            let hits = results.entries();
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Search Results"), chunks[0]);

                if hits.is_empty() {
                    let empty = Paragraph::new("No matching moods.")
                        .style(Style::default().fg(Color::Gray))
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title("Results"));
                    f.render_widget(empty, chunks[1]);
                } else {
                    let results_list = List::new(history_items(hits))
                        .block(Block::default().borders(Borders::ALL).title("Results"))
                        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                        .highlight_symbol("> ");
                    f.render_stateful_widget(
                        results_list,
                        chunks[1],
                        &mut ListState::default().with_selected(Some(selected_index)),
                    );
                }

                f.render_widget(
                    instructions("Up/Down: Navigate, Enter: Details, Esc: Back"),
                    chunks[2],
                );
            })?;

            if let Some(key) = read_key()? {
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < hits.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(id) = hits.get(selected_index).map(|e| e.id.clone()) {
                            self.view_details(store, &id)?;
                        }
                    }
                    KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

// Key presses only; crossterm also reports releases on some platforms.
fn read_key() -> Result<Option<KeyEvent>> {
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            debug!(code = ?key.code, "key pressed");
            Ok(Some(key))
        }
        _ => Ok(None),
    }
}

// Control chords are shortcuts, never text.
fn edit_note(note: &mut String, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return;
    }
    match key.code {
        KeyCode::Char(c) => note.push(c),
        KeyCode::Enter => note.push('\n'),
        KeyCode::Backspace => {
            note.pop();
        }
        _ => {}
    }
}

pub fn record_status(mood: Mood, inserted: bool) -> String {
    if inserted {
        format!("Recorded {mood} {}", mood.emoji())
    } else {
        format!("{mood} was not recorded, please try again")
    }
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn instructions(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn controls<'a>(keys: &[(&'a str, &'a str)]) -> Paragraph<'a> {
    let mut spans = vec![Span::raw("Press ")];
    for (i, (key, what)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" to {what}")));
    }
    Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn mood_picker_line(selected: usize) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, mood) in Mood::ALL.into_iter().enumerate() {
        let mut style = Style::default().fg(Color::Black).bg(mood.color());
        if i == selected {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} {} ", mood.emoji(), mood.label()), style));
        spans.push(Span::raw("  "));
    }
    spans.pop();
    Line::from(spans)
}

/// Pads by display width, so emoji take the columns they actually occupy.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

fn history_items(entries: &[MoodEntry]) -> Vec<ListItem<'static>> {
    entries
        .iter()
        .map(|e| {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    pad(&format!("{} {}", e.mood.emoji(), e.mood.label()), 12),
                    Style::default()
                        .fg(e.mood.color())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(e.formatted_date(), Style::default().fg(Color::DarkGray)),
            ])];
            if !e.tags.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("   Triggers: {}", e.tags.join(", ")),
                    Style::default().fg(Color::Gray),
                )));
            }
            if let Some(first) = e.note.lines().next() {
                lines.push(Line::from(format!("   {first}")));
            }
            ListItem::new(lines)
        })
        .collect()
}

fn render_note_editor(f: &mut Frame, area: Rect, entry: &MoodEntry, draft: &str, cursor: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let heading = Paragraph::new(Line::from(Span::styled(
        format!("Mood: {} {}", entry.mood, entry.mood.emoji()),
        Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )));
    f.render_widget(heading, chunks[0]);

    let unsaved = draft != entry.note;
    let mut text = draft.to_string();
    if cursor {
        text.push('|');
    }
    let note_title = if unsaved { "Note (unsaved)" } else { "Note" };
    let note = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(note_title));
    f.render_widget(note, chunks[1]);

    let date = Paragraph::new(format!("Date: {}", format_date(entry.timestamp)))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(date, chunks[2]);
}

fn render_week_chart(f: &mut Frame, area: Rect, week: &WeekSummary) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(1)])
        .split(area);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Weekly Mood Overview ({} moods)", week.total())),
        )
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2)
        .max(100);

    for day in &week.days {
        let bars: Vec<Bar> = day
            .shares()
            .into_iter()
            .map(|share| {
                let text = if share.count > 0 {
                    share.count.to_string()
                } else {
                    String::new()
                };
                Bar::default()
                    .value(share.percent)
                    .text_value(text)
                    .style(Style::default().fg(share.mood.color()))
                    .value_style(Style::default().fg(Color::Black).bg(share.mood.color()))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(day.label.clone())).bars(&bars));
    }
    f.render_widget(chart, chunks[0]);

    let mut legend = Vec::new();
    for mood in Mood::ALL {
        legend.push(Span::styled("■ ", Style::default().fg(mood.color())));
        legend.push(Span::raw(format!("{}   ", mood.label())));
    }
    f.render_widget(
        Paragraph::new(Line::from(legend)).alignment(Alignment::Center),
        chunks[1],
    );
}
