mod app;
mod field;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mentions_input_config::Config;
use mentions_input_engine::{GrammarRegistry, markup::Segment, text::char_len};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

fn main() -> Result<()> {
    // Logs go to stderr; redirect it (2>mentions.log) to keep the TUI clean
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 3 {
        eprintln!("Usage: {} [config-path] [initial-markup]", args[0]);
        process::exit(1);
    }

    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path) {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        Ok(None) if args.len() > 1 => {
            eprintln!("Error: No config file found at {}", config_path.display());
            process::exit(1);
        }
        Ok(None) => {
            log::info!(
                "No config file at {}, using defaults without mention sources",
                config_path.display()
            );
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let initial_markup = args.get(2).map(String::as_str).unwrap_or_default();

    let registry = GrammarRegistry::new();
    let mut app = match App::from_config(&registry, &config, initial_markup) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: Invalid configuration in {}: {e}", config_path.display());
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    // Leave the result on the normal screen so it can be piped or copied.
    println!("{}", app.session.value());
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let session = &app.session;
    let mention_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    // Input panel: plain text with mentions highlighted
    let spans: Vec<Span> = session
        .engine()
        .scan(session.value())
        .map(|segment| match segment {
            Segment::Text(run) => Span::raw(run.text.to_string()),
            Segment::Mention(m) => Span::styled(m.display.into_owned(), mention_style),
        })
        .collect();
    let input = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Input"));
    f.render_widget(input, rows[0]);
    if session.selection().is_some() {
        let plain = session.plain_text();
        let caret = app.caret().min(char_len(&plain)) as u16;
        f.set_cursor_position((rows[0].x + 1 + caret, rows[0].y + 1));
    }

    // Suggestions panel
    let suggestion_items: Vec<ListItem> = session
        .suggestions()
        .iter()
        .map(|(suggestion, context)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", context.kind), Style::default().fg(Color::DarkGray)),
                Span::raw(suggestion.display().to_string()),
            ]))
        })
        .collect();
    let mut list_state = ListState::default();
    if session.suggestions_visible() {
        list_state.select(Some(session.suggestions().focus()));
    }
    let suggestions = List::new(suggestion_items)
        .block(Block::default().borders(Borders::ALL).title("Suggestions"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(suggestions, middle[0], &mut list_state);

    // Mentions panel
    let mention_items: Vec<ListItem> = session
        .mentions()
        .into_iter()
        .map(|m| {
            let kind = m.kind.map(|k| format!("{k}:")).unwrap_or_default();
            ListItem::new(format!(
                "{kind}{} {:?} markup@{} plain@{}",
                m.id, m.display, m.markup_offset, m.plain_text_offset
            ))
        })
        .collect();
    let mentions = List::new(mention_items)
        .block(Block::default().borders(Borders::ALL).title("Mentions"));
    f.render_widget(mentions, middle[1]);

    // Markup panel
    let markup = Paragraph::new(session.value().to_string())
        .block(Block::default().borders(Borders::ALL).title("Markup"))
        .wrap(Wrap { trim: false });
    f.render_widget(markup, rows[2]);

    let help_text = Line::from(vec![
        Span::raw("Ctrl-C: Quit | "),
        Span::raw("←/→/Home/End: Move | "),
        Span::raw("↑/↓: Choose | Enter/Tab: Insert | Esc: Dismiss | "),
        Span::raw(app.status.clone()),
    ]);
    f.render_widget(Paragraph::new(help_text), rows[3]);
}
