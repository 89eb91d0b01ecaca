//! Build script for injector-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml and generates the board wiring constants

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use injector_core::config::TesterConfig;
use serde::Deserialize;

/// GPIOs on the RP2040
const GPIO_COUNT: u8 = 30;
/// GPIOs with an ADC input
const ADC_PINS: core::ops::RangeInclusive<u8> = 26..=29;

#[derive(Deserialize)]
struct BoardFile {
    pump: PumpSection,
    injectors: InjectorSection,
    keypad: KeypadSection,
    lcd: LcdSection,
    #[serde(flatten)]
    tester: TesterConfig,
}

#[derive(Deserialize)]
struct PumpSection {
    pin: String,
}

#[derive(Deserialize)]
struct InjectorSection {
    pins: Vec<String>,
}

#[derive(Deserialize)]
struct KeypadSection {
    adc_pin: String,
}

#[derive(Deserialize)]
struct LcdSection {
    rs: String,
    en: String,
    d4: String,
    d5: String,
    d6: String,
    d7: String,
    backlight: Option<String>,
}

/// A parsed `"gpioN"` / `"!gpioN"` reference
#[derive(Debug, Clone, Copy)]
struct PinRef {
    num: u8,
    active_low: bool,
}

fn main() {
    setup_linker();
    let board = load_board();
    let code = generate_board(&board);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board.rs"), code).unwrap();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read, parse and validate board.toml
fn load_board() -> BoardFile {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml wiring file.                 ║\n\
            ║  Please create one in the injector-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let board: BoardFile = match toml::from_str(&config_content) {
        Ok(board) => board,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = validate_pins(&board);
    if let Err(e) = board.tester.validate() {
        errors.push(format!("timing: {:?}", e));
    }
    report_errors("Invalid board configuration", &errors);

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report_errors(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn parse_pin(value: &str) -> Result<PinRef, String> {
    let (active_low, name) = match value.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let num = name
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or_else(|| format!("'{}' is not a pin (expected \"gpioN\")", value))?;
    if num >= GPIO_COUNT {
        return Err(format!("'{}' is out of range (gpio0-gpio29)", value));
    }
    Ok(PinRef { num, active_low })
}

/// Check every pin parses, is used once and has the right capability
fn validate_pins(board: &BoardFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut used: BTreeMap<u8, String> = BTreeMap::new();

    let mut claim = |role: String, value: &str, errors: &mut Vec<String>| -> Option<PinRef> {
        match parse_pin(value) {
            Ok(pin) => {
                if let Some(previous) = used.insert(pin.num, role.clone()) {
                    errors.push(format!("gpio{} used by both {} and {}", pin.num, previous, role));
                }
                Some(pin)
            }
            Err(e) => {
                errors.push(format!("{}: {}", role, e));
                None
            }
        }
    };

    claim("pump".into(), &board.pump.pin, &mut errors);

    if board.injectors.pins.is_empty() {
        errors.push("[injectors] pins cannot be empty".into());
    }
    let mut injector_polarity = None;
    for (i, value) in board.injectors.pins.iter().enumerate() {
        if let Some(pin) = claim(format!("injector {}", i), value, &mut errors) {
            match injector_polarity {
                None => injector_polarity = Some(pin.active_low),
                Some(low) if low != pin.active_low => {
                    errors.push("injector pins must share one polarity".into());
                }
                Some(_) => {}
            }
        }
    }

    if let Some(pin) = claim("keypad".into(), &board.keypad.adc_pin, &mut errors) {
        if !ADC_PINS.contains(&pin.num) {
            errors.push(format!("keypad: gpio{} has no ADC input (gpio26-gpio29)", pin.num));
        }
        if pin.active_low {
            errors.push("keypad: '!' has no meaning on an analog input".into());
        }
    }

    let lcd = &board.lcd;
    for (role, value) in [
        ("lcd rs", &lcd.rs),
        ("lcd en", &lcd.en),
        ("lcd d4", &lcd.d4),
        ("lcd d5", &lcd.d5),
        ("lcd d6", &lcd.d6),
        ("lcd d7", &lcd.d7),
    ] {
        if let Some(pin) = claim(role.into(), value, &mut errors) {
            if pin.active_low {
                errors.push(format!("{}: LCD bus pins cannot be inverted", role));
            }
        }
    }
    if let Some(value) = &lcd.backlight {
        claim("lcd backlight".into(), value, &mut errors);
    }

    errors
}

/// Parse a reference that already passed validation
fn pin(value: &str) -> PinRef {
    parse_pin(value).unwrap()
}

fn generate_board(board: &BoardFile) -> String {
    let mut out = String::new();
    let pump = pin(&board.pump.pin);
    let injectors: Vec<PinRef> = board.injectors.pins.iter().map(|s| pin(s)).collect();
    let lcd = &board.lcd;
    let t = &board.tester;

    writeln!(out, "// Generated from board.toml by build.rs").unwrap();
    writeln!(out, "pub const PUMP_PIN: u8 = {};", pump.num).unwrap();
    writeln!(out, "pub const PUMP_ACTIVE_LOW: bool = {};", pump.active_low).unwrap();
    writeln!(
        out,
        "pub const INJECTOR_PINS: [u8; {}] = [{}];",
        injectors.len(),
        injectors
            .iter()
            .map(|p| p.num.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
    .unwrap();
    writeln!(
        out,
        "pub const INJECTORS_ACTIVE_LOW: bool = {};",
        injectors[0].active_low
    )
    .unwrap();
    writeln!(out, "pub const KEYPAD_ADC_PIN: u8 = {};", pin(&board.keypad.adc_pin).num).unwrap();
    writeln!(out, "pub const LCD_RS: u8 = {};", pin(&lcd.rs).num).unwrap();
    writeln!(out, "pub const LCD_EN: u8 = {};", pin(&lcd.en).num).unwrap();
    writeln!(
        out,
        "pub const LCD_DATA: [u8; 4] = [{}, {}, {}, {}];",
        pin(&lcd.d4).num,
        pin(&lcd.d5).num,
        pin(&lcd.d6).num,
        pin(&lcd.d7).num
    )
    .unwrap();
    match &lcd.backlight {
        Some(value) => {
            let bl = pin(value);
            writeln!(out, "pub const LCD_BACKLIGHT: Option<(u8, bool)> = Some(({}, {}));", bl.num, bl.active_low).unwrap()
        }
        None => writeln!(out, "pub const LCD_BACKLIGHT: Option<(u8, bool)> = None;").unwrap(),
    }

    writeln!(
        out,
        "pub const TESTER_CONFIG: TesterConfig = TesterConfig {{\n    \
            run: RunTimings {{ stabilize_ms: {}, pulse_gap_ms: {}, status_poll_ms: {} }},\n    \
            ui: UiTimings {{ repeat_us: {}, fast_repeat_us: {}, save_hold_us: {} }},\n    \
            notice: NoticeTimings {{ saving_ms: {}, loading_ms: {}, resetting_ms: {} }},\n\
        }};",
        t.run.stabilize_ms,
        t.run.pulse_gap_ms,
        t.run.status_poll_ms,
        t.ui.repeat_us,
        t.ui.fast_repeat_us,
        t.ui.save_hold_us,
        t.notice.saving_ms,
        t.notice.loading_ms,
        t.notice.resetting_ms,
    )
    .unwrap();

    out
}
