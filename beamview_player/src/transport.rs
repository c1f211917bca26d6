//! Terminal transport for trajectory playback.
//!
//! Runs the cooperative render loop: once per tick it advances the
//! player with an `Instant`-based timestamp, hands the derived frame to
//! the Rerun logger, and redraws the transport UI. Input is polled with
//! the remainder of the tick budget, so play/pause and seek land between
//! frames without blocking playback.
//!
//! Keys: space = play/pause, left/right = seek 5%, 0-9 = seek to that
//! tenth of the loop, Home = rewind, q or Esc = quit.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use beamview_core::{Player, PlayerFrame};

use crate::visualizer::RerunLogger;

/// Seek step applied by the arrow keys, as a progress ratio.
const SEEK_STEP: f64 = 0.05;

/// Interactive play/pause/seek surface around the player.
pub struct Transport {
    player: Player,
    logger: RerunLogger,
    tick_interval: Duration,
    tick: u64,
    latest: PlayerFrame,
}

impl Transport {
    pub fn new(mut player: Player, logger: RerunLogger, fps: u32) -> Self {
        let latest = player.refresh();
        Self {
            player,
            logger,
            tick_interval: Duration::from_micros(1_000_000 / fps as u64),
            tick: 0,
            latest,
        }
    }

    /// Runs the transport loop (blocks until 'q' or Esc).
    pub fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(backend)?;

        let start = Instant::now();
        loop {
            let now = start.elapsed().as_secs_f64();
            let frame = self.player.advance(now);
            if frame.wrapped {
                debug!("loop wrapped at tick {}", self.tick);
            }
            self.logger.log_frame(self.tick, &frame, self.player.geometry());
            self.latest = frame;
            self.tick += 1;

            terminal.draw(|f| self.ui(f))?;

            // Spend the rest of the tick budget waiting for input
            if event::poll(self.tick_interval)? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char(' ') => {
                            let playing = self.player.toggle_play();
                            debug!("playback {}", if playing { "resumed" } else { "paused" });
                        }
                        KeyCode::Left => self.seek_by(-SEEK_STEP),
                        KeyCode::Right => self.seek_by(SEEK_STEP),
                        KeyCode::Home => self.seek_to(0.0),
                        KeyCode::Char(c @ '0'..='9') => {
                            self.seek_to((c as u8 - b'0') as f64 / 10.0);
                        }
                        _ => {}
                    }
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn seek_by(&mut self, step: f64) {
        self.seek_to(self.latest.progress_percent / 100.0 + step);
    }

    fn seek_to(&mut self, ratio: f64) {
        self.player.seek(ratio);
        self.latest = self.player.refresh();
    }

    /// Render the transport UI.
    fn ui(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Scrubber gauge
                Constraint::Length(4), // Source readouts
                Constraint::Min(0),    // Spacer
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        let frame = &self.latest;

        // === HEADER ===
        let (state_text, state_color) = if frame.playing {
            ("▶ PLAYING", Color::Green)
        } else {
            ("❚❚ PAUSED", Color::Yellow)
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "beamview",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            Span::styled(state_text, Style::default().fg(state_color)),
            Span::raw("  |  "),
            Span::styled(frame.clock_display.clone(), Style::default().fg(Color::Cyan)),
        ]))
        .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        // === SCRUBBER ===
        let gauge = Gauge::default()
            .block(Block::default().title("Playback").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(frame.progress_percent.clamp(0.0, 100.0) as u16)
            .label(frame.clock_display.clone());
        f.render_widget(gauge, chunks[1]);

        // === SOURCE READOUTS ===
        let beam_text = match &frame.beam {
            Some(beam) if frame.beam_updated => format!("length {:.3}", beam.scale),
            Some(_) => "held (source near origin)".to_string(),
            None => "-".to_string(),
        };
        let readout = Paragraph::new(vec![
            Line::from(format!(
                "source  x: {:+.3}  y: {:+.3}  z: {:+.3}",
                frame.position.x, frame.position.y, frame.position.z
            )),
            Line::from(format!(
                "sample  {} / {}   beam {}   trail {}",
                frame.frame_index + 1,
                frame.sample_count,
                beam_text,
                frame.trail.len(),
            )),
        ])
        .block(Block::default().title("Source").borders(Borders::ALL));
        f.render_widget(readout, chunks[2]);

        // === FOOTER ===
        let footer = Paragraph::new(
            "space play/pause  ←/→ seek 5%  0-9 jump  Home rewind  q quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[4]);
    }
}
