use crate::config::Difficulty;
use crate::entity::{Direction, Position};
use crate::grid::CellState;
use crate::renderer::{Input, Renderer};
use crate::session::{Phase, SessionEvent, SessionSnapshot};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Rows kept free under the field for the status lines.
pub const STATUS_ROWS: u16 = 4;

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    last_message: Option<String>,
    showing_menu: bool,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            last_message: None,
            showing_menu: false,
        }
    }

    /// Largest field (in cells) that fits a terminal of the given size.
    /// Each cell is two columns wide.
    pub fn field_for_terminal(columns: u16, rows: u16) -> (i32, i32) {
        let width = i32::from(columns / 2);
        let height = i32::from(rows.saturating_sub(STATUS_ROWS));
        (width, height)
    }

    fn draw_cell(&self, cell: CellState, stdout: &mut io::Stdout) -> io::Result<()> {
        let color = match cell {
            CellState::Open => Color::Black,
            CellState::Claimed => Color::DarkBlue,
            CellState::Border => Color::Blue,
            CellState::Trail => Color::Yellow,
        };
        queue!(stdout, SetBackgroundColor(color), Print("  "))?;
        Ok(())
    }

    fn draw_sprite(
        &self,
        background: Color,
        foreground: Color,
        glyph: &str,
        stdout: &mut io::Stdout,
    ) -> io::Result<()> {
        queue!(
            stdout,
            SetBackgroundColor(background),
            SetForegroundColor(foreground),
            Print(glyph),
            ResetColor
        )?;
        Ok(())
    }

    fn draw_menu(&self, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(2, 1),
            SetForegroundColor(Color::Cyan),
            Print("Q I X"),
            ResetColor,
            cursor::MoveTo(2, 3),
            Print("Claim the field, keep clear of the hazards."),
            cursor::MoveTo(2, 5),
            Print("1  normal   one roamer, two patrollers"),
            cursor::MoveTo(2, 6),
            Print("2  hard     two roamers, three patrollers"),
            cursor::MoveTo(2, 8),
            Print("Q  quit"),
        )?;
        Ok(())
    }

    fn remember_events(&mut self, events: &[SessionEvent]) {
        for event in events {
            let message = match event {
                SessionEvent::RoundStarted { difficulty } => format!("{difficulty} round started"),
                SessionEvent::TrailStarted { .. } => continue,
                SessionEvent::TrailCommitted {
                    region_cells,
                    trail_cells,
                } => format!("Claimed {} cells", region_cells + trail_cells),
                SessionEvent::LifeLost { lives_left, .. } => {
                    format!("Ouch! {lives_left} lives left")
                }
                SessionEvent::Won | SessionEvent::Lost => continue,
            };
            self.last_message = Some(message);
        }
    }

    fn draw_info(&self, snapshot: &SessionSnapshot<'_>, stdout: &mut io::Stdout) -> io::Result<()> {
        let top = snapshot.grid.height() as u16;

        queue!(
            stdout,
            cursor::MoveTo(0, top + 1),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            Print(format!(
                "Lives: {}  Claimed: {:.1}%  Target: {:.0}%  Difficulty: {}  {}",
                snapshot.lives,
                snapshot.claimed_fraction * 100.0,
                snapshot.win_threshold * 100.0,
                snapshot.difficulty,
                if snapshot.drawing { "[drawing]" } else { "" }
            ))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, top + 2),
            terminal::Clear(ClearType::CurrentLine),
            Print("Arrows move | Space toggles draw | X stops | R menu | Q quits")
        )?;

        queue!(stdout, cursor::MoveTo(0, top + 3), terminal::Clear(ClearType::CurrentLine))?;
        match snapshot.phase {
            Phase::Won => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print("YOU WIN! Press R for the menu"),
                    ResetColor
                )?;
            }
            Phase::Lost => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print("GAME OVER! Press R for the menu"),
                    ResetColor
                )?;
            }
            Phase::RoundTransition { .. } | Phase::Playing => {
                if let Some(message) = &self.last_message {
                    queue!(stdout, Print(message))?;
                }
            }
            Phase::Menu => {}
        }

        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, snapshot: &SessionSnapshot<'_>) -> io::Result<()> {
        // events only show up once, so collect them before frame limiting
        self.remember_events(snapshot.events);

        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }
        self.last_render = Instant::now();

        let mut stdout = io::stdout();

        if snapshot.phase == Phase::Menu {
            if !self.showing_menu {
                self.draw_menu(&mut stdout)?;
                self.showing_menu = true;
                self.last_message = None;
            }
            stdout.flush()?;
            return Ok(());
        }
        if self.showing_menu {
            queue!(stdout, terminal::Clear(ClearType::All))?;
            self.showing_menu = false;
        }

        queue!(stdout, cursor::MoveTo(0, 0))?;

        for (y, row) in snapshot.grid.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                let pos = Position::new(x as i32, y as i32);

                if pos == snapshot.player {
                    let color = if snapshot.drawing {
                        Color::Yellow
                    } else {
                        Color::Green
                    };
                    self.draw_sprite(color, Color::Black, "@@", &mut stdout)?;
                } else if snapshot.roamers.contains(&pos) {
                    self.draw_sprite(Color::Black, Color::Red, "()", &mut stdout)?;
                } else if snapshot.patrollers.contains(&pos) {
                    self.draw_sprite(Color::Magenta, Color::White, "<>", &mut stdout)?;
                } else {
                    self.draw_cell(cell, &mut stdout)?;
                }
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.draw_info(snapshot, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind == KeyEventKind::Release {
                    return Ok(None);
                }
                return Ok(map_key(code));
            }
        }
        Ok(None)
    }
}

fn map_key(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Input::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Restart),
        KeyCode::Char(' ') => Some(Input::ToggleDraw),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Input::Stop),
        KeyCode::Char('1') => Some(Input::Select(Difficulty::Normal)),
        KeyCode::Char('2') => Some(Input::Select(Difficulty::Hard)),
        KeyCode::Up => Some(Input::Direction(Direction::Up)),
        KeyCode::Down => Some(Input::Direction(Direction::Down)),
        KeyCode::Left => Some(Input::Direction(Direction::Left)),
        KeyCode::Right => Some(Input::Direction(Direction::Right)),
        _ => None,
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Char(' ')), Some(Input::ToggleDraw));
        assert_eq!(
            map_key(KeyCode::Char('2')),
            Some(Input::Select(Difficulty::Hard))
        );
        assert_eq!(
            map_key(KeyCode::Left),
            Some(Input::Direction(Direction::Left))
        );
        assert_eq!(map_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_field_fits_terminal() {
        assert_eq!(CliRenderer::field_for_terminal(160, 64), (80, 60));
        assert_eq!(CliRenderer::field_for_terminal(10, 2), (5, 0));
    }
}
