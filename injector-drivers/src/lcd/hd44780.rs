//! HD44780 character LCD, 4-bit parallel bus
//!
//! Write-only wiring (R/W tied low): RS, EN and D4..D7. Busy flag is never
//! read, so every command is followed by its worst-case execution time.
//!
//! # Init sequence
//!
//! ```text
//!   wait >40 ms after power-up
//!   0x3 (8-bit), wait 4.1 ms
//!   0x3,         wait 100 µs
//!   0x3
//!   0x2          -> now in 4-bit mode
//!   0x28 function set: 4-bit, 2 lines, 5x8 font
//!   0x0C display on, cursor off
//!   0x01 clear, wait 2 ms
//!   0x06 entry mode: increment, no shift
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use injector_core::traits::{Display, DisplayError, Row, LINE_WIDTH};

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_INCREMENT: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM_ADDR: u8 = 0x80;

/// DDRAM address of the first character of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// Execution time of ordinary commands and data writes (datasheet: 37 µs)
const EXEC_US: u32 = 50;
/// Execution time of clear/home (datasheet: 1.52 ms)
const CLEAR_US: u32 = 2_000;

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Run the power-up init sequence and clear the display
    ///
    /// `data` is D4, D5, D6, D7 in that order.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, DisplayError> {
        let mut lcd = Self { rs, en, data, delay };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(50);
        self.rs.set_low().map_err(|_| DisplayError::Bus)?;
        self.en.set_low().map_err(|_| DisplayError::Bus)?;

        self.write_nibble(0x3)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x3)?;
        self.delay.delay_us(150);
        self.write_nibble(0x3)?;
        self.delay.delay_us(EXEC_US);
        self.write_nibble(0x2)?;
        self.delay.delay_us(EXEC_US);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_INCREMENT)
    }

    /// Blank the whole display
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    /// Move the cursor to `col` on `row`
    pub fn set_cursor(&mut self, row: Row, col: u8) -> Result<(), DisplayError> {
        let addr = ROW_OFFSETS[usize::from(row.index())] + col;
        self.command(CMD_SET_DDRAM_ADDR | addr)
    }

    /// Write one character at the cursor; non-ASCII shows as `?`
    pub fn write_char(&mut self, c: u8) -> Result<(), DisplayError> {
        self.write_byte(if c.is_ascii() { c } else { b'?' }, true)
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.write_byte(cmd, false)
    }

    fn write_byte(&mut self, byte: u8, is_data: bool) -> Result<(), DisplayError> {
        self.rs
            .set_state(is_data.into())
            .map_err(|_| DisplayError::Bus)?;
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state((nibble & (1 << bit) != 0).into())
                .map_err(|_| DisplayError::Bus)?;
        }
        // EN pulse width >= 450 ns; latch on falling edge
        self.en.set_high().map_err(|_| DisplayError::Bus)?;
        self.delay.delay_us(1);
        self.en.set_low().map_err(|_| DisplayError::Bus)?;
        self.delay.delay_us(1);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> Display for Hd44780<P, D> {
    fn set_line(&mut self, row: Row, text: &str) -> Result<(), DisplayError> {
        self.set_cursor(row, 0)?;
        // Always write the full row so no stale characters survive
        let mut written = 0;
        for c in text.bytes().take(LINE_WIDTH) {
            self.write_char(c)?;
            written += 1;
        }
        for _ in written..LINE_WIDTH {
            self.write_char(b' ')?;
        }
        Ok(())
    }
}
