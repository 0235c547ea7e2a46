mod app;
mod outline;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use logseq_config::Config;
use logseq_graph::{Graph, GraphOptions, IndexLocation};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

use crate::app::{App, Mode};

fn main() -> Result<()> {
    env_logger::init();

    // Graph path from the CLI args or the config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let (graph_path, config) = match args.len() {
        2 => (PathBuf::from(&args[1]), None),
        1 => match Config::load() {
            Ok(Some(config)) => (config.graph_path.clone(), Some(config)),
            Ok(None) => {
                eprintln!("Error: No graph path provided and no config file found");
                eprintln!("Usage: {} <graph-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <graph-folder-path>", args[0]);
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [graph-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if !graph_path.is_dir() {
        let source = if config.is_some() {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Graph path '{}'{} is not a directory",
            graph_path.display(),
            source
        );
        process::exit(1);
    }

    let mut options = GraphOptions::new().with_index(IndexLocation::Memory);
    if let Some(config) = config {
        if let Some(index_path) = config.index_path {
            options = options.with_index(IndexLocation::Path(index_path));
        }
        if let Some(format) = config.block_time_format {
            options = options.with_block_time_format(format);
        }
    }
    let graph = Graph::open(&graph_path, options)
        .with_context(|| format!("Failed to open graph at {}", graph_path.display()))?;
    let mut app = App::new(graph).context("Failed to list pages")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.mode {
            Mode::Browse => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Esc => app.cancel_search()?,
                _ => {}
            },
            Mode::Search => match key.code {
                KeyCode::Enter => app.run_search()?,
                KeyCode::Esc => app.cancel_search()?,
                KeyCode::Backspace => {
                    app.query.pop();
                }
                KeyCode::Char(c) => app.query.push(c),
                _ => {}
            },
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    // Page list panel
    let items: Vec<ListItem> = app
        .entries
        .iter()
        .map(|entry| ListItem::new(Line::from(Span::raw(entry.title.clone()))))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(app.list_title.clone()),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    // Outline panel
    let content_text: Vec<Line> = if app.content.is_empty() {
        vec![Line::from("Nothing to show")]
    } else {
        app.content
            .iter()
            .map(|line| Line::from(Span::raw(line.clone())))
            .collect()
    };
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Outline"))
        .wrap(Wrap { trim: false });
    f.render_widget(content, chunks[1]);

    // Search prompt or key help
    let footer = match app.mode {
        Mode::Search => Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.query.clone()),
        ]),
        Mode::Browse => Line::from(Span::raw(
            "q: Quit | ↑/k: Previous | ↓/j: Next | /: Search | Esc: All pages",
        )),
    };
    f.render_widget(Paragraph::new(footer), rows[1]);
}
