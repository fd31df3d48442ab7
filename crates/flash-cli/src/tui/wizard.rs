//! Two-step request wizard TUI.
//!
//! Step 1 (compose): a free-text description with live category detection
//! and debounced field extraction, plus canned example suggestions. Step 2
//! (review): the extracted `when`/`where` fields, editable, with inline
//! validation. A status line stands in for toast notifications.
//!
//! The actual state machine lives in [`flash_core::wizard`]; this module
//! only translates key events and renders.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use flash_core::classify::KeywordClassifier;
use flash_core::config::{UserConfig, session_dir};
use flash_core::draft::Draft;
use flash_core::store::FileStore;
use flash_core::wizard::{Field, SUGGESTIONS, Step, SubmitOutcome, Wizard};

/// How long to wait for a key event before driving the debounce timer.
const TICK: Duration = Duration::from_millis(50);

/// The action the wizard wants the caller to take.
pub enum WizardAction {
    /// Hand the submitted draft off to the caller.
    Submit(Draft),
    /// Leave the wizard; any in-progress draft stays persisted.
    Quit,
}

/// Which input currently receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusField {
    Description,
    When,
    Where,
}

impl FocusField {
    const fn next(self) -> Self {
        match self {
            Self::Description => Self::When,
            Self::When => Self::Where,
            Self::Where => Self::Description,
        }
    }
}

/// Full-screen two-step wizard view.
pub struct WizardApp {
    wizard: Wizard<FileStore, KeywordClassifier>,
    focus: FocusField,
    /// Built-in examples plus any configured extras.
    suggestions: Vec<String>,
    /// Selection state for the suggestions list (compose step).
    suggestion_state: ListState,
    /// Status line shown after a blocked submit (toast stand-in).
    notice: Option<&'static str>,
}

impl WizardApp {
    pub fn new(config: &UserConfig) -> Self {
        Self::with_store(FileStore::new(session_dir(config)), config)
    }

    fn with_store(store: FileStore, config: &UserConfig) -> Self {
        let wizard = Wizard::new(store, KeywordClassifier, config.quiet_period());
        let mut suggestions: Vec<String> = SUGGESTIONS.iter().map(ToString::to_string).collect();
        suggestions.extend(config.suggestions.iter().cloned());
        Self {
            wizard,
            focus: FocusField::Description,
            suggestions,
            suggestion_state: ListState::default(),
            notice: None,
        }
    }

    // -----------------------------------------------------------------------
    // Input handling
    // -----------------------------------------------------------------------

    /// Feed a key event to the wizard.
    ///
    /// Returns `Some(WizardAction)` when the session is over (caller should
    /// tear the terminal down), or `None` while the user is still editing.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<WizardAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Some(WizardAction::Quit),
                // Start over: always allowed, never gated by validation.
                KeyCode::Char('r') => {
                    self.wizard.reset();
                    self.focus = FocusField::Description;
                    self.suggestion_state.select(None);
                    self.notice = None;
                    return None;
                }
                _ => return None,
            }
        }

        match self.wizard.step() {
            Step::Compose => self.handle_compose_key(key, now),
            Step::Review => self.handle_review_key(key, now),
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent, now: Instant) -> Option<WizardAction> {
        match key.code {
            KeyCode::Esc => return Some(WizardAction::Quit),

            KeyCode::Enter => {
                // Enter applies a highlighted suggestion; otherwise it is
                // the Next button.
                if let Some(idx) = self.suggestion_state.selected() {
                    if let Some(text) = self.suggestions.get(idx).cloned() {
                        self.wizard.apply_suggestion(&text);
                    }
                    self.suggestion_state.select(None);
                } else if self.wizard.next() {
                    self.focus = FocusField::When;
                }
            }

            KeyCode::Down => self.select_next_suggestion(),
            KeyCode::Up => self.select_prev_suggestion(),

            KeyCode::Backspace => {
                self.suggestion_state.select(None);
                let mut text = self.wizard.draft().description.clone();
                text.pop();
                self.wizard.set_description(&text, now);
            }

            KeyCode::Char(c) => {
                self.suggestion_state.select(None);
                let mut text = self.wizard.draft().description.clone();
                text.push(c);
                self.wizard.set_description(&text, now);
            }

            _ => {}
        }
        None
    }

    fn handle_review_key(&mut self, key: KeyEvent, now: Instant) -> Option<WizardAction> {
        match key.code {
            // Back: no validation, state preserved as-is.
            KeyCode::Esc => {
                self.wizard.back();
                self.focus = FocusField::Description;
                self.notice = None;
            }

            KeyCode::Tab => self.focus = self.focus.next(),

            KeyCode::Enter => match self.wizard.submit() {
                SubmitOutcome::Submitted(draft) => return Some(WizardAction::Submit(draft)),
                SubmitOutcome::Blocked { notice, focus, .. } => {
                    self.notice = Some(notice);
                    self.focus = match focus {
                        Field::When => FocusField::When,
                        Field::Where => FocusField::Where,
                    };
                }
            },

            KeyCode::Backspace => self.edit_focused(now, |text| {
                text.pop();
            }),

            KeyCode::Char(c) => self.edit_focused(now, |text| text.push(c)),

            _ => {}
        }
        None
    }

    /// Route an edit to whichever field has focus. Edits to `when`/`where`
    /// go through the dirty-tracking setters.
    fn edit_focused(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        self.notice = None;
        match self.focus {
            FocusField::Description => {
                let mut text = self.wizard.draft().description.clone();
                edit(&mut text);
                self.wizard.set_description(&text, now);
            }
            FocusField::When => {
                let mut value = self.wizard.draft().when.clone().unwrap_or_default();
                edit(&mut value);
                self.wizard.set_when(&value);
            }
            FocusField::Where => {
                let mut value = self.wizard.draft().where_.clone().unwrap_or_default();
                edit(&mut value);
                self.wizard.set_where(&value);
            }
        }
    }

    /// Drive the debounce timer between key events.
    pub fn tick(&mut self, now: Instant) {
        self.wizard.tick(now);
    }

    fn select_next_suggestion(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        let i = self
            .suggestion_state
            .selected()
            .map_or(0, |i| if i + 1 >= len { 0 } else { i + 1 });
        self.suggestion_state.select(Some(i));
    }

    fn select_prev_suggestion(&mut self) {
        let len = self.suggestions.len();
        if len == 0 {
            return;
        }
        let i = self
            .suggestion_state
            .selected()
            .map_or(len - 1, |i| if i == 0 { len - 1 } else { i - 1 });
        self.suggestion_state.select(Some(i));
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self, frame: &mut Frame) {
        match self.wizard.step() {
            Step::Compose => self.render_compose(frame),
            Step::Review => self.render_review(frame),
        }
    }

    fn render_compose(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let text = format!("{}_", self.wizard.draft().description);
        let input = Paragraph::new(text.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" What do you need? (step 1/2) ")
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(input, chunks[0]);

        let meta = Line::from(vec![
            Span::styled("category ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.wizard.draft().category.as_str(),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("   {} words", self.wizard.word_count()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(meta), chunks[1]);

        if let Some(error) = self.wizard.compose_error() {
            let line = Paragraph::new(error).style(Style::default().fg(Color::Red));
            frame.render_widget(line, chunks[2]);
        }

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .map(|s| ListItem::new(s.as_str()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Examples (↑↓ select, Enter apply) ")
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("► ");
        frame.render_stateful_widget(list, chunks[3], &mut self.suggestion_state);

        render_hints(
            frame,
            chunks[4],
            &[
                ("Enter", " next  "),
                ("↑↓", " examples  "),
                ("Ctrl+R", " start over  "),
                ("Esc", " save & quit"),
            ],
        );
    }

    fn render_review(&mut self, frame: &mut Frame) {
        let errors = self.wizard.review_errors();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        render_input(
            frame,
            chunks[0],
            " Description (step 2/2) ",
            &self.wizard.draft().description.clone(),
            InputState {
                focused: self.focus == FocusField::Description,
                invalid: false,
                auto: false,
            },
        );

        let category = Line::from(vec![
            Span::styled("Detected category: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.wizard.draft().category.as_str(),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(category), chunks[1]);

        let when = self.wizard.draft().when.clone().unwrap_or_default();
        render_input(
            frame,
            chunks[2],
            " When ",
            &when,
            InputState {
                focused: self.focus == FocusField::When,
                invalid: errors.when.is_some(),
                auto: !self.wizard.dirty().when && !when.is_empty(),
            },
        );
        render_field_error(frame, chunks[3], errors.when);

        let where_ = self.wizard.draft().where_.clone().unwrap_or_default();
        render_input(
            frame,
            chunks[4],
            " Where ",
            &where_,
            InputState {
                focused: self.focus == FocusField::Where,
                invalid: errors.where_.is_some(),
                auto: !self.wizard.dirty().where_ && !where_.is_empty(),
            },
        );
        render_field_error(frame, chunks[5], errors.where_);

        if let Some(notice) = self.notice {
            let line = Paragraph::new(notice).style(
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            );
            frame.render_widget(line, chunks[6]);
        }

        render_hints(
            frame,
            chunks[7],
            &[
                ("Enter", " submit  "),
                ("Tab", " next field  "),
                ("Esc", " back  "),
                ("Ctrl+R", " start over"),
            ],
        );
    }
}

/// Visual state of one input box.
#[derive(Debug, Clone, Copy)]
struct InputState {
    focused: bool,
    invalid: bool,
    /// Value came from extraction, not the user; rendered as an "auto" tag.
    auto: bool,
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, state: InputState) {
    let border = if state.invalid {
        Style::default().fg(Color::Red)
    } else if state.focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![Span::raw(value.to_string())];
    if state.focused {
        spans.push(Span::raw("_"));
    }
    if state.auto {
        spans.push(Span::styled("  auto", Style::default().fg(Color::DarkGray)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border),
    );
    frame.render_widget(input, area);
}

fn render_field_error(frame: &mut Frame, area: Rect, error: Option<&'static str>) {
    if let Some(message) = error {
        let line = Paragraph::new(message).style(Style::default().fg(Color::Red));
        frame.render_widget(line, area);
    }
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, Style::default().fg(Color::Yellow)),
                Span::raw(*label),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Run the wizard full-screen. Returns the submitted draft, or `None` when
/// the user quit (the in-progress draft stays persisted for next time).
pub fn run(config: &UserConfig) -> Result<Option<Draft>> {
    let mut app = WizardApp::new(config);
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut WizardApp,
) -> Result<Option<Draft>> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key, Instant::now()) {
                        Some(WizardAction::Submit(draft)) => return Ok(Some(draft)),
                        Some(WizardAction::Quit) => return Ok(None),
                        None => {}
                    }
                }
            }
        }

        app.tick(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flash_core::classify::Category;
    use flash_core::wizard::{SUBMIT_NOTICE, WHEN_ERROR};
    use tempfile::TempDir;

    fn app() -> (TempDir, WizardApp) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = UserConfig::default();
        let app = WizardApp::with_store(FileStore::new(dir.path()), &config);
        (dir, app)
    }

    fn type_text(app: &mut WizardApp, text: &str, now: Instant) {
        for c in text.chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn typing_updates_description_and_category() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "macbook charger", now);
        assert_eq!(app.wizard.draft().description, "macbook charger");
        assert_eq!(app.wizard.draft().category, Category::Electronics);
    }

    #[test]
    fn backspace_removes_a_character() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "ab", now);
        app.handle_key(KeyEvent::from(KeyCode::Backspace), now);
        assert_eq!(app.wizard.draft().description, "a");
    }

    #[test]
    fn enter_on_empty_description_blocks() {
        let (_dir, mut app) = app();
        let action = app.handle_key(KeyEvent::from(KeyCode::Enter), Instant::now());
        assert!(action.is_none());
        assert_eq!(app.wizard.step(), Step::Compose);
        assert!(app.wizard.compose_error().is_some());
    }

    #[test]
    fn enter_applies_highlighted_suggestion() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        app.handle_key(KeyEvent::from(KeyCode::Down), now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);

        assert_eq!(app.wizard.step(), Step::Compose, "apply is not Next");
        assert_eq!(app.wizard.draft().description, SUGGESTIONS[0]);
        assert!(app.suggestion_state.selected().is_none());
    }

    #[test]
    fn typing_clears_suggestion_highlight() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        app.handle_key(KeyEvent::from(KeyCode::Down), now);
        app.handle_key(KeyEvent::from(KeyCode::Char('x')), now);
        assert!(app.suggestion_state.selected().is_none());
    }

    #[test]
    fn blocked_submit_sets_notice_and_focuses_when() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "need a jacket", now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);
        assert_eq!(app.wizard.step(), Step::Review);

        let action = app.handle_key(KeyEvent::from(KeyCode::Enter), now);
        assert!(action.is_none());
        assert_eq!(app.notice, Some(SUBMIT_NOTICE));
        assert_eq!(app.focus, FocusField::When);
        assert_eq!(app.wizard.review_errors().when, Some(WHEN_ERROR));
    }

    #[test]
    fn full_flow_submits_and_returns_draft() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "charger at Clough Commons before 3pm.", now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);
        assert_eq!(app.wizard.step(), Step::Review);

        let action = app.handle_key(KeyEvent::from(KeyCode::Enter), now);
        match action {
            Some(WizardAction::Submit(draft)) => {
                assert_eq!(draft.when.as_deref(), Some("3pm"));
                assert_eq!(draft.where_.as_deref(), Some("Clough Commons before 3pm"));
            }
            _ => panic!("expected submission"),
        }
        assert!(app.wizard.draft().is_empty());
    }

    #[test]
    fn editing_when_in_review_marks_it_dirty() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "need a jacket", now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);

        app.focus = FocusField::When;
        type_text(&mut app, "Today 5PM", now);
        assert_eq!(app.wizard.draft().when.as_deref(), Some("Today 5PM"));
        assert!(app.wizard.dirty().when);
    }

    #[test]
    fn esc_in_review_goes_back_without_validation() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "need a jacket", now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);

        let action = app.handle_key(KeyEvent::from(KeyCode::Esc), now);
        assert!(action.is_none());
        assert_eq!(app.wizard.step(), Step::Compose);
        assert_eq!(app.wizard.draft().description, "need a jacket");
    }

    #[test]
    fn ctrl_r_resets_from_anywhere() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "need a jacket", now);
        app.handle_key(KeyEvent::from(KeyCode::Enter), now);

        app.handle_key(
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            now,
        );
        assert_eq!(app.wizard.step(), Step::Compose);
        assert!(app.wizard.draft().is_empty());
        assert_eq!(app.focus, FocusField::Description);
    }

    #[test]
    fn esc_in_compose_quits_and_keeps_draft() {
        let (_dir, mut app) = app();
        let now = Instant::now();
        type_text(&mut app, "keep me", now);

        let action = app.handle_key(KeyEvent::from(KeyCode::Esc), now);
        assert!(matches!(action, Some(WizardAction::Quit)));
        assert_eq!(app.wizard.draft().description, "keep me");
    }
}
