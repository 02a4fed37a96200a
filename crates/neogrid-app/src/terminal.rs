//! Crossterm-backed stand-in for the LED matrix.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use neogrid_core::{DisplayError, MatrixDisplay, Rgb};

use crate::runner::{Control, Pacer};
use crate::strip::StripLayout;

/// Brightness of a freshly wired panel.
pub const DEFAULT_BRIGHTNESS: f32 = 0.3;

/// Characters drawn per cell; two keeps cells roughly square.
const CELL: &str = "  ";

/// Raw mode and the alternate screen, restored on drop.
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    /// Switches the terminal to raw mode on the alternate screen.
    pub fn start() -> Result<Self> {
        let session = Self { _private: () };
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("failed to enter alternate screen")?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, ResetColor, Show, LeaveAlternateScreen) {
            tracing::error!(?err, "failed to leave alternate screen");
        }
    }
}

/// Draws the matrix as colored blocks on any writer.
///
/// Pixels are held in strip order with brightness already applied, the way
/// an LED driver buffers them; simulations never see either. Presenting
/// walks the strip and maps each LED back to its cell.
pub struct TerminalDisplay<W: Write> {
    out: W,
    layout: StripLayout,
    brightness: f32,
    pixels: Vec<Rgb>,
}

impl<W: Write> TerminalDisplay<W> {
    /// Creates an all-black display at [`DEFAULT_BRIGHTNESS`].
    pub fn new(out: W, layout: StripLayout) -> Self {
        Self {
            out,
            layout,
            brightness: DEFAULT_BRIGHTNESS,
            pixels: vec![Rgb::BLACK; layout.len()],
        }
    }

    /// Sets the brightness, clamped to `[0, 1]`. Applies to later writes.
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = if brightness.is_nan() {
            0.0
        } else {
            brightness.clamp(0.0, 1.0)
        };
        self
    }

    /// Returns the brightness.
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Buffered strip, brightness applied.
    pub fn strip(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Returns the writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> MatrixDisplay for TerminalDisplay<W> {
    fn dimensions(&self) -> (usize, usize) {
        self.layout.dimensions()
    }

    fn set_cell_color(&mut self, x: usize, y: usize, color: Rgb) {
        if let Some(index) = self.layout.index(x, y) {
            self.pixels[index] = color.scale(self.brightness);
        }
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        for (index, &Rgb { r, g, b }) in self.pixels.iter().enumerate() {
            let Some((x, y)) = self.layout.coords(index) else {
                break;
            };
            queue!(
                self.out,
                MoveTo((x * CELL.len()) as u16, y as u16),
                SetBackgroundColor(Color::Rgb { r, g, b }),
                Print(CELL)
            )?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }
}

/// Waits out the frame delay while watching the keyboard.
///
/// `q`, `Esc` and `Ctrl+C` stop the run. Raw mode swallows the interrupt
/// signal, so Ctrl+C arrives here as a key.
#[derive(Debug, Default)]
pub struct KeyPacer;

impl Pacer for KeyPacer {
    fn pause(&mut self, delay: Duration) -> Result<Control> {
        let deadline = Instant::now() + delay;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining).context("failed to poll terminal events")? {
                return Ok(Control::Continue);
            }
            if let Event::Key(key) = event::read().context("failed to read terminal event")? {
                if is_quit(&key) {
                    return Ok(Control::Stop);
                }
            }
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(display: &TerminalDisplay<Vec<u8>>) -> String {
        String::from_utf8_lossy(display.get_ref()).into_owned()
    }

    #[test]
    fn test_brightness_applied_in_strip_order() {
        let layout = StripLayout::new(4, 2, true);
        let mut display = TerminalDisplay::new(Vec::new(), layout).with_brightness(0.5);
        display.set_cell_color(0, 1, Rgb::RED);
        assert_eq!(display.strip()[7], Rgb::new(127, 0, 0));
        assert!(display.strip()[..7].iter().all(|c| c.is_black()));
    }

    #[test]
    fn test_present_writes_colored_blocks() {
        let layout = StripLayout::new(2, 2, true);
        let mut display = TerminalDisplay::new(Vec::new(), layout).with_brightness(1.0);
        display.set_cell_color(1, 0, Rgb::BLUE);
        display.present().unwrap();
        assert_eq!(display.strip()[1], Rgb::BLUE);
        assert_eq!(output(&display).matches(CELL).count(), 4);
    }

    #[test]
    fn test_present_follows_the_strip() {
        let layout = StripLayout::new(2, 2, true);
        let mut display = TerminalDisplay::new(Vec::new(), layout);
        display.present().unwrap();
        let text = output(&display);
        // Serpentine: (0,0), (1,0), then back along row 1 from (1,1) to (0,1).
        let moves: Vec<_> = ["\x1b[1;1H", "\x1b[1;3H", "\x1b[2;3H", "\x1b[2;1H"]
            .iter()
            .map(|m| text.find(m).unwrap())
            .collect();
        assert!(moves.windows(2).all(|w| w[0] < w[1]), "{text:?}");
    }

    #[test]
    fn test_clear_blanks_on_next_present() {
        let layout = StripLayout::new(2, 1, false);
        let mut display = TerminalDisplay::new(Vec::new(), layout).with_brightness(1.0);
        display.fill(Rgb::GREEN);
        display.clear();
        assert!(display.strip().iter().all(|c| c.is_black()));
        display.present().unwrap();
        assert_eq!(output(&display).matches(CELL).count(), 2);
    }

    #[test]
    fn test_brightness_clamped() {
        let layout = StripLayout::new(1, 1, false);
        let bright = TerminalDisplay::new(Vec::new(), layout).with_brightness(4.0);
        assert_eq!(bright.brightness(), 1.0);
        let nan = TerminalDisplay::new(Vec::new(), layout).with_brightness(f32::NAN);
        assert_eq!(nan.brightness(), 0.0);
    }

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
