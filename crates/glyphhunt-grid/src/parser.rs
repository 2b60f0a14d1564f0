//! Grid loader for plain text and ANSI/VT terminal captures, using the VTE crate.
//!
//! Captures of terminal UIs often carry colour codes and cursor movement.
//! The parser replays them onto a growable canvas and freezes the result
//! into a [`Grid`]. Colours and other attributes are dropped; only the
//! characters matter for recognition.

use vte::{Params, Perform};

use glyphhunt_core::GridSettings;

use crate::grid::{Grid, BLANK};

/// ANSI-aware grid builder wrapping the VTE state machine.
#[derive(Debug)]
pub struct Parser {
    /// Rows written so far (ragged until frozen)
    rows: Vec<Vec<char>>,
    /// Cursor column
    col: usize,
    /// Cursor row
    row: usize,
    /// Canvas limits and tab width
    settings: GridSettings,
    /// Characters dropped because they fell outside the limits
    clipped: usize,
}

impl Parser {
    /// Create a parser with default limits.
    pub fn new() -> Self {
        Self::with_settings(GridSettings::default())
    }

    /// Create a parser with explicit limits.
    pub fn with_settings(settings: GridSettings) -> Self {
        Self {
            rows: Vec::new(),
            col: 0,
            row: 0,
            settings,
            clipped: 0,
        }
    }

    /// Parse a complete capture into a grid.
    pub fn parse(bytes: &[u8], settings: GridSettings) -> Grid {
        let mut parser = Self::with_settings(settings);
        parser.process(bytes);
        parser.into_grid()
    }

    /// Process bytes through the VTE parser.
    ///
    /// Returns the number of bytes consumed.
    pub fn process(&mut self, bytes: &[u8]) -> usize {
        let mut parser = vte::Parser::new();
        for byte in bytes {
            parser.advance(self, *byte);
        }
        bytes.len()
    }

    /// Current cursor position as `(column, row)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Number of characters dropped by the canvas limits.
    pub fn clipped(&self) -> usize {
        self.clipped
    }

    /// Consume the parser and freeze the canvas into a grid.
    ///
    /// Trailing blank rows are dropped.
    pub fn into_grid(mut self) -> Grid {
        while self
            .rows
            .last()
            .is_some_and(|row| row.iter().all(|c| *c == BLANK))
        {
            self.rows.pop();
        }
        if self.clipped > 0 {
            tracing::warn!(
                clipped = self.clipped,
                max_width = self.settings.max_width,
                max_height = self.settings.max_height,
                "grid capture exceeded limits"
            );
        }
        Grid::from_char_rows(self.rows)
    }

    fn put_char(&mut self, c: char) {
        if self.col >= self.settings.max_width || self.row >= self.settings.max_height {
            self.clipped += 1;
            return;
        }
        if self.rows.len() <= self.row {
            self.rows.resize(self.row + 1, Vec::new());
        }
        let line = &mut self.rows[self.row];
        if line.len() <= self.col {
            line.resize(self.col + 1, BLANK);
        }
        line[self.col] = c;
    }

    /// Move cursor forward by n columns.
    fn cursor_forward(&mut self, n: usize) {
        self.col = (self.col + n).min(self.settings.max_width);
    }

    /// Move cursor backward by n columns.
    fn cursor_backward(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
    }

    /// Move cursor down by n rows.
    fn cursor_down(&mut self, n: usize) {
        self.row = (self.row + n).min(self.settings.max_height);
    }

    /// Move cursor up by n rows.
    fn cursor_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
    }

    /// Blank cells `from..to` on a row, if the row exists.
    fn erase_in_row(&mut self, row: usize, from: usize, to: Option<usize>) {
        if let Some(line) = self.rows.get_mut(row) {
            let end = to.unwrap_or(line.len()).min(line.len());
            for cell in line.iter_mut().take(end).skip(from) {
                *cell = BLANK;
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// First parameter of a CSI sequence, treating 0 as "absent".
fn first_param(params: &Params, default: usize) -> usize {
    params
        .iter()
        .next()
        .map(|p| p[0] as usize)
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

impl Perform for Parser {
    fn print(&mut self, c: char) {
        self.put_char(c);
        self.col += 1;
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            // Backspace (BS)
            0x08 => self.cursor_backward(1),

            // Horizontal Tab (HT)
            0x09 => {
                let tab = self.settings.tab_width.max(1);
                let next_tab = (self.col / tab + 1) * tab;
                self.col = next_tab.min(self.settings.max_width);
            }

            // Line Feed (LF): captures are usually saved with bare newlines
            0x0A => {
                self.cursor_down(1);
                self.col = 0;
            }

            // Carriage Return (CR)
            0x0D => self.col = 0,

            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, _intermediates: &[u8], _ignore: bool, c: char) {
        match c {
            // Cursor Up (CUU)
            'A' => self.cursor_up(first_param(params, 1)),

            // Cursor Down (CUD)
            'B' => self.cursor_down(first_param(params, 1)),

            // Cursor Forward (CUF)
            'C' => self.cursor_forward(first_param(params, 1)),

            // Cursor Backward (CUB)
            'D' => self.cursor_backward(first_param(params, 1)),

            // Cursor Position (CUP)
            'H' | 'f' => {
                let mut iter = params.iter();
                let row = iter.next().map(|p| p[0] as usize).unwrap_or(1).max(1) - 1;
                let col = iter.next().map(|p| p[0] as usize).unwrap_or(1).max(1) - 1;
                self.row = row.min(self.settings.max_height);
                self.col = col.min(self.settings.max_width);
            }

            // Erase in Display (ED)
            'J' => {
                let mode = params.iter().next().map(|p| p[0]).unwrap_or(0);
                match mode {
                    // Clear from cursor to end of screen
                    0 => {
                        self.erase_in_row(self.row, self.col, None);
                        self.rows.truncate(self.row + 1);
                    }
                    // Clear from beginning of screen to cursor
                    1 => {
                        for row in 0..self.row {
                            self.erase_in_row(row, 0, None);
                        }
                        self.erase_in_row(self.row, 0, Some(self.col + 1));
                    }
                    // Clear entire screen
                    2 | 3 => self.rows.clear(),
                    _ => {}
                }
            }

            // Erase in Line (EL)
            'K' => {
                let mode = params.iter().next().map(|p| p[0]).unwrap_or(0);
                match mode {
                    0 => self.erase_in_row(self.row, self.col, None),
                    1 => self.erase_in_row(self.row, 0, Some(self.col + 1)),
                    2 => self.erase_in_row(self.row, 0, None),
                    _ => {}
                }
            }

            // SGR and everything else carry no characters
            _ => {}
        }
    }
}
