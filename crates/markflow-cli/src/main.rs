use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use markflow_config::Config;
use markflow_engine::{HeuristicModel, Label, Session};
use pulldown_cmark::{Event as MdEvent, Parser, Tag, TagEnd};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use tracing::warn;
use tracing_subscriber::EnvFilter;

struct App {
    content: String,
    session: Session<HeuristicModel>,
    last_label: Option<Label>,
}

impl App {
    fn new(config: Config) -> Self {
        let model = HeuristicModel::new(config.lexicons);
        let mut session = Session::new(model);
        session.set_inline_annotation(config.inline_annotation);

        Self {
            content: String::new(),
            session,
            last_label: None,
        }
    }

    /// Applies one keystroke to the buffer and reports the change to the
    /// session. A rewritten outcome is adopted and echoed back, which is
    /// what consumes the session's self-trigger suppression.
    fn edit(&mut self, apply: impl FnOnce(&mut String)) {
        apply(&mut self.content);

        let outcome = self.session.observe(&self.content);
        if outcome.label.is_some() {
            self.last_label = outcome.label;
        }
        if outcome.rewritten {
            self.content = outcome.text;
            self.session.observe(&self.content);
        }
    }

    fn type_char(&mut self, c: char) {
        self.edit(|content| content.push(c));
    }

    fn newline(&mut self) {
        self.edit(|content| content.push('\n'));
    }

    fn backspace(&mut self) {
        self.edit(|content| {
            content.pop();
        });
    }

    fn clear(&mut self) {
        self.edit(|content| content.clear());
        self.last_label = None;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            warn!("failed to load config, using defaults: {e}");
            Config::default()
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('l') => app.clear(),
                    _ => {}
                }
                continue;
            }
            match key.code {
                KeyCode::Char(c) => app.type_char(c),
                KeyCode::Enter => app.newline(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Esc => return Ok(()),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[0]);

    // Editor pane: the raw buffer with a cursor marker
    let mut editor_text = app.content.clone();
    editor_text.push('▌');
    let editor = Paragraph::new(editor_text)
        .block(Block::default().borders(Borders::ALL).title("Draft"))
        .wrap(Wrap { trim: false });
    f.render_widget(editor, panes[0]);

    // Preview pane: rendered markdown
    let preview = Paragraph::new(markdown_preview(&app.content))
        .block(Block::default().borders(Borders::ALL).title("Preview"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, panes[1]);

    // Status bar: heading ratchet and last label
    let state = app.session.heading_state();
    let flag = |used: bool, name: &str| {
        if used {
            Span::styled(
                format!(" {name} "),
                Style::default().fg(Color::Black).bg(Color::Green),
            )
        } else {
            Span::styled(format!(" {name} "), Style::default().fg(Color::DarkGray))
        }
    };
    let label = match app.last_label {
        Some(Label::H1) => "h1",
        Some(Label::H2) => "h2",
        Some(Label::H3) => "h3",
        Some(Label::Body) => "body",
        None => "-",
    };
    let status = Line::from(vec![
        flag(state.h1_used, "H1"),
        flag(state.h2_used, "H2"),
        flag(state.h3_used, "H3"),
        Span::raw(format!("  last: {label}  ")),
        Span::raw("Enter: finish block | Ctrl+L: clear | Ctrl+Q/Esc: quit"),
    ]);
    f.render_widget(Paragraph::new(vec![status]), rows[1]);
}

/// Renders markdown into styled terminal lines for the preview pane.
fn markdown_preview(content: &str) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut style = Style::default();

    let mut flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in Parser::new(content) {
        match event {
            MdEvent::Start(Tag::Heading { level, .. }) => {
                flush(&mut spans, &mut lines);
                style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
                spans.push(Span::styled("#".repeat(level as usize) + " ", style));
            }
            MdEvent::End(TagEnd::Heading(_)) => {
                flush(&mut spans, &mut lines);
                lines.push(Line::default());
                style = Style::default();
            }
            MdEvent::End(TagEnd::Paragraph) => {
                flush(&mut spans, &mut lines);
                lines.push(Line::default());
            }
            MdEvent::Start(Tag::Strong) => style = style.add_modifier(Modifier::BOLD),
            MdEvent::End(TagEnd::Strong) => style = style.remove_modifier(Modifier::BOLD),
            MdEvent::Start(Tag::Emphasis) => style = style.add_modifier(Modifier::ITALIC),
            MdEvent::End(TagEnd::Emphasis) => style = style.remove_modifier(Modifier::ITALIC),
            MdEvent::Text(text) => {
                spans.push(Span::styled(text.to_string(), style));
            }
            MdEvent::Code(code) => {
                let code_style = Style::default().fg(Color::Yellow);
                spans.push(Span::styled(code.to_string(), code_style));
            }
            MdEvent::SoftBreak | MdEvent::HardBreak => {
                flush(&mut spans, &mut lines);
            }
            _ => {}
        }
    }
    flush(&mut spans, &mut lines);

    lines
}
