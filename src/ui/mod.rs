use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::analysis::{self, PipelineOutput};
use crate::dataset::Dataset;
use crate::models::{Config, DateSelection};

pub mod dashboard;

const DATE_FORMAT: &str = "%Y-%m-%d";
const INVALID_RANGE_MESSAGE: &str = "Please select a valid date range.";

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppScreen {
    Dashboard,
    Orders,
}

/// Main application state
pub struct DashboardApp<'a> {
    dataset: &'a Dataset,
    preview_rows: usize,

    // Pipeline state
    selection: DateSelection,
    output: PipelineOutput,

    // UI state
    screen: AppScreen,
    editing_range: bool,
    range_input: String,
    table_offset: usize,
    status_message: String,
}

impl<'a> DashboardApp<'a> {
    /// Create the application with the full data span preselected
    pub fn new(dataset: &'a Dataset, config: &Config) -> Self {
        let selection = match dataset.full_range() {
            Some(range) => DateSelection::Complete(range),
            None => DateSelection::Empty,
        };

        let mut app = Self {
            dataset,
            preview_rows: config.preview_rows,
            selection,
            output: PipelineOutput::AwaitingValidInput,
            screen: AppScreen::Dashboard,
            editing_range: false,
            range_input: String::new(),
            table_offset: 0,
            status_message: String::new(),
        };
        app.recompute();
        app
    }

    /// Run the application
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal);

        disable_raw_mode()?;
        io::stdout().execute(LeaveAlternateScreen)?;

        result
    }

    /// Main application loop
    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| dashboard::render(f, self))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if self.editing_range {
                    match key.code {
                        KeyCode::Enter => {
                            self.apply_range_input();
                        }
                        KeyCode::Esc => {
                            self.editing_range = false;
                            self.range_input.clear();
                        }
                        KeyCode::Backspace => {
                            self.range_input.pop();
                        }
                        KeyCode::Char(c) => {
                            self.range_input.push(c);
                        }
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Tab => {
                        self.screen = match self.screen {
                            AppScreen::Dashboard => AppScreen::Orders,
                            AppScreen::Orders => AppScreen::Dashboard,
                        };
                    }
                    KeyCode::Char('d') => {
                        self.editing_range = true;
                        self.range_input.clear();
                    }
                    KeyCode::Char('r') => {
                        self.reset_range();
                    }
                    KeyCode::Down => self.scroll_down(),
                    KeyCode::Up => self.scroll_up(),
                    _ => {}
                }
            }
        }
    }

    /// Parse the typed range and rerun the pipeline
    fn apply_range_input(&mut self) {
        self.selection = parse_selection(&self.range_input);
        self.editing_range = false;
        self.range_input.clear();
        self.recompute();
    }

    /// Back to the full data span
    fn reset_range(&mut self) {
        self.selection = match self.dataset.full_range() {
            Some(range) => DateSelection::Complete(range),
            None => DateSelection::Empty,
        };
        self.recompute();
    }

    /// Recompute every view from the cached raw table
    fn recompute(&mut self) {
        self.output = analysis::build_views(self.dataset, &self.selection);
        self.table_offset = 0;
        self.status_message = match self.output.view() {
            Some(view) => format!(
                "Showing data from {} to {}",
                view.range.start, view.range.end
            ),
            None => INVALID_RANGE_MESSAGE.to_string(),
        };
    }

    fn scroll_down(&mut self) {
        if self.screen != AppScreen::Orders {
            return;
        }
        let rows = self.preview_len();
        if rows > 0 && self.table_offset + 1 < rows {
            self.table_offset += 1;
        }
    }

    fn scroll_up(&mut self) {
        if self.screen == AppScreen::Orders {
            self.table_offset = self.table_offset.saturating_sub(1);
        }
    }

    fn preview_len(&self) -> usize {
        self.output
            .view()
            .map(|view| view.orders.len().min(self.preview_rows))
            .unwrap_or(0)
    }
}

/// Parse picker input of the form `YYYY-MM-DD..YYYY-MM-DD`. A single date
/// or an unparsable half is an incomplete selection, never an error.
pub fn parse_selection(input: &str) -> DateSelection {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DateSelection::Empty;
    }

    let (start_text, end_text) = match trimmed.split_once("..") {
        Some((start, end)) => (start.trim(), end.trim()),
        None => (trimmed, ""),
    };

    let start = NaiveDate::parse_from_str(start_text, DATE_FORMAT).ok();
    let end = NaiveDate::parse_from_str(end_text, DATE_FORMAT).ok();
    DateSelection::from_dates(start, end)
}
