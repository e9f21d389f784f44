use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use scrollcue_core::{AppConfig, Script};
use scrollcue_tui::{
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets::{PrompterWidget, StatusBarWidget},
    App,
};

const SAMPLE_SCRIPT: &str = "Welcome to scrollcue.\n\n\
Press space to start recording and the text begins to scroll. \
Press p to pause, or hold the mouse button on the text to pause while held. \
Click once to toggle the pause and double click to jump back to the top.\n\n\
Drag the top border to move the prompter and the bottom border to resize it. \
Use + and - to change the speed and m to switch between timing methods.\n\n\
Pass a text file to read your own script: scrollcue notes.txt";

pub async fn run(config: AppConfig, script_path: Option<PathBuf>) -> Result<()> {
    let script = match &script_path {
        Some(path) => Script::load(path)
            .with_context(|| format!("Failed to load script {}", path.display()))?,
        None => Script::from_text("welcome", SAMPLE_SCRIPT),
    };
    info!(title = %script.title, "Starting prompter");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle(format!("scrollcue - {}", script.title))
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, config, script, script_path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: AppConfig,
    script: Script,
    script_path: Option<PathBuf>,
) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_tick(config.ui.tick_rate_ms, config.ui.animation_tick_duration());
    let (cols, rows) = terminal::size()?;
    let mut app = App::new(config, script, script_path, cols, rows, Instant::now());

    loop {
        app.tick(Instant::now());

        terminal.draw(|frame| {
            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(frame.area());

            PrompterWidget::render(frame, &app);
            StatusBarWidget::render(frame, main_layout[1], &app);
        })?;

        // Fast polling while the text moves; otherwise wake for the next timer
        let event = if app.needs_fast_update() {
            event_handler.next_animation()?
        } else if let Some(wait) = app.time_until_deadline(Instant::now()) {
            event_handler.next_within(wait)?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            let now = Instant::now();
            match event {
                AppEvent::Key(key) => app.handle_action(handle_key_event(key), now),
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse, now),
                AppEvent::Resize(cols, rows) => app.on_resize(cols, rows, now),
                AppEvent::Focus(focused) => app.on_focus(focused, now),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("Prompter closed");
    Ok(())
}
