use std::io::{self, Stdout};

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

use pong::{RenderFrame, GRID_WIDTH};

/// The match rendering surface: raw mode plus the alternate screen for the
/// lifetime of one match, restored on drop.
pub struct Surface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Surface {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn draw(&mut self, frame: &RenderFrame) -> io::Result<()> {
        self.terminal.draw(|f| {
            let block = Block::default()
                .title(" CLI Pong ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta));

            let mut lines: Vec<Line> = frame
                .lines()
                .map(|row| Line::styled(row, Style::default().fg(Color::Cyan)))
                .collect();
            lines.push(Line::styled(
                "▀".repeat(GRID_WIDTH),
                Style::default().fg(Color::Magenta),
            ));
            for status in &frame.status {
                lines.push(Line::styled(
                    status.clone(),
                    Style::default().fg(Color::Magenta),
                ));
            }

            f.render_widget(Paragraph::new(lines).block(block), f.area());
        })?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
