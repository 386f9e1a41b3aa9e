use std::collections::HashMap;
use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use danmaku_core::{Engine, resolve_style};
use danmaku_protocol::{OverlayCommand, Palette, Viewport};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::script::ScriptedComment;

const FRAME: Duration = Duration::from_millis(33);

/// A banner the engine started and has not yet taken back.
struct Live {
    top: f64,
    opacity: f64,
}

/// Parse `#rrggbb` (or `#rgb`) and darken it by `opacity`, the closest a
/// terminal gets to transparency.
fn css_color(css: &str, opacity: f64) -> Color {
    let hex = css.trim_start_matches('#');
    let channels = match hex.len() {
        6 if hex.is_ascii() => (0..3)
            .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<Vec<u8>>>(),
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<Vec<u8>>>(),
        _ => None,
    };
    let Some([r, g, b]) = channels.and_then(|c| <[u8; 3]>::try_from(c).ok()) else {
        return Color::White;
    };
    let fade = |c: u8| (f64::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::Rgb(fade(r), fade(g), fade(b))
}

/// Apply engine commands to the set of live banners.
fn apply(live: &mut HashMap<usize, Live>, commands: Vec<OverlayCommand<usize>>) {
    for command in commands {
        match command {
            OverlayCommand::Start {
                handle,
                top,
                opacity,
                ..
            } => {
                live.insert(handle, Live { top, opacity });
            }
            OverlayCommand::Retire { handle, .. } | OverlayCommand::Discard { handle } => {
                live.remove(&handle);
            }
            OverlayCommand::Clear => live.clear(),
            OverlayCommand::PauseAll | OverlayCommand::ResumeAll => {}
        }
    }
}

/// Replay `script` through `engine`, drawing the overlay until the user
/// quits. Space pauses, `d` toggles the overlay, `q` quits.
pub fn run(mut engine: Engine<usize>, script: &[ScriptedComment], palette: &Palette) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut engine, script, palette);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    engine: &mut Engine<usize>,
    script: &[ScriptedComment],
    palette: &Palette,
) -> Result<()> {
    let start = Instant::now();
    let mut next = 0;
    let mut live: HashMap<usize, Live> = HashMap::new();
    let mut playing = true;
    let mut disabled = false;

    loop {
        let host = start.elapsed().as_secs_f64();
        let size = terminal.size()?;
        // Borders take two columns and two rows, the status line one row.
        let surface = Viewport::new(
            f64::from(size.width.saturating_sub(2)),
            f64::from(size.height.saturating_sub(3)),
        );

        while let Some(comment) = script.get(next).filter(|c| c.at <= host) {
            engine.offer(&comment.record(palette), next, host, &surface)?;
            next += 1;
        }
        engine.tick(host);
        apply(&mut live, engine.take_commands());

        terminal.draw(|frame| draw(frame, engine, script, &live, palette))?;

        if event::poll(FRAME)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => {
                    playing = !playing;
                    engine.set_playing(playing, host);
                }
                KeyCode::Char('d') => {
                    disabled = !disabled;
                    engine.set_disabled(disabled, host);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw(
    frame: &mut Frame,
    engine: &Engine<usize>,
    script: &[ScriptedComment],
    live: &HashMap<usize, Live>,
    palette: &Palette,
) {
    let [surface_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default().borders(Borders::ALL).title(" danmaku ");
    let inner = block.inner(surface_area);
    frame.render_widget(block, surface_area);

    for (banner, x) in engine.positions(f64::from(inner.width)) {
        let (Some(state), Some(comment)) = (live.get(&banner.handle), script.get(banner.handle))
        else {
            continue;
        };
        let row = state.top.floor() as u16;
        if row >= inner.height {
            continue;
        }

        let left = x.round() as i64;
        let visible: String = comment
            .label(palette)
            .chars()
            .enumerate()
            .filter(|(i, _)| (0..i64::from(inner.width)).contains(&(left + *i as i64)))
            .map(|(_, c)| c)
            .collect();
        if visible.is_empty() {
            continue;
        }

        let rect = Rect::new(
            inner.x + left.max(0) as u16,
            inner.y + row,
            visible.chars().count() as u16,
            1,
        )
        .intersection(inner);
        let color = css_color(&resolve_style(&comment.record(palette), palette).color, state.opacity);
        frame.render_widget(Paragraph::new(visible).style(Style::default().fg(color)), rect);
    }

    let stats = engine.stats();
    let status = format!(
        " {} | in flight {} | admitted {} stacked {} overflowed {} dropped {} | space pause, d toggle, q quit",
        if engine.is_disabled() {
            "disabled"
        } else if engine.is_playing() {
            "playing"
        } else {
            "paused"
        },
        engine.lanes().len(),
        stats.admitted,
        stats.stacked,
        stats.overflowed,
        stats.dropped_paused + stats.dropped_disabled,
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        status_area,
    );
}
