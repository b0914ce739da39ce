//! Terminal simulator for the Windsor Probe.
//!
//! Runs the real firmware core against in-memory hardware: the LCD is drawn
//! in the terminal, the arrow keys, Enter and Esc are the keypad, and the
//! probe position is moved with `+`/`-`. The EEPROM image is kept in
//! `windsor.eeprom` between runs, and downloaded tests are written to
//! `tests.csv`.
//!
//! Run with: cargo run --example simulator
//!
//! ## Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑/↓` | Up/Down keys |
//! | `Enter` | Enter key |
//! | `Esc` | Escape key |
//! | `+/-` | Move the probe (ADC reading ±1) |
//! | `PgUp/PgDn` | Move the probe by 10 |
//! | `Q` | Quit |

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::fs;
use std::io::{self, stdout, Stdout};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use windsor_probe::hal::{
    CaptureUplink, Key, MemoryEeprom, Row, ScriptedKeypad, SharedDisplay, SimulatedAnalog,
    StdDelay, SystemClock,
};
use windsor_probe::protocol::{parse_dump, records_to_csv};
use windsor_probe::{Peripherals, Timing, WindsorProbe};

const EEPROM_FILE: &str = "windsor.eeprom";
const CSV_FILE: &str = "tests.csv";

/// Handles onto the simulated hardware.
struct Bench {
    keypad: ScriptedKeypad,
    display: SharedDisplay,
    eeprom: MemoryEeprom,
    analog: SimulatedAnalog,
    uplink: CaptureUplink,
    status: String,
}

impl Bench {
    fn new() -> Self {
        let eeprom = match fs::read(EEPROM_FILE) {
            Ok(contents) => {
                info!("Loaded EEPROM image from {}", EEPROM_FILE);
                MemoryEeprom::with_contents(contents)
            }
            Err(_) => MemoryEeprom::new(),
        };

        Self {
            keypad: ScriptedKeypad::new(),
            display: SharedDisplay::new(),
            eeprom,
            analog: SimulatedAnalog::new(60),
            uplink: CaptureUplink::new(),
            status: String::from("Ready"),
        }
    }

    fn device(&self) -> WindsorProbe {
        WindsorProbe::new(
            Peripherals {
                keypad: Box::new(self.keypad.clone()),
                display: Box::new(self.display.clone()),
                store: Box::new(self.eeprom.clone()),
                clock: Box::new(SystemClock::new()),
                analog: Box::new(self.analog.clone()),
                uplink: Box::new(self.uplink.clone()),
                delay: Box::new(StdDelay),
            },
            Timing::default(),
        )
    }

    fn move_probe(&self, delta: i16) {
        let reading = (self.analog.get() as i16 + delta).clamp(0, 255);
        self.analog.set(reading as u8);
    }

    /// Write any downloaded tests to the CSV file.
    fn export_download(&mut self) {
        let sent = self.uplink.take();
        if sent.is_empty() {
            return;
        }
        match parse_dump(&sent) {
            Ok(records) => match fs::write(CSV_FILE, records_to_csv(&records)) {
                Ok(()) => self.status = format!("Wrote {} tests to {}", records.len(), CSV_FILE),
                Err(e) => self.status = format!("Cannot write {}: {}", CSV_FILE, e),
            },
            Err(e) => {
                warn!("Bad download stream: {}", e);
                self.status = format!("Bad download: {}", e);
            }
        }
    }
}

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> io::Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// One LCD row, with the cursor cell underlined.
fn lcd_line(bench: &Bench, row: Row) -> Line<'static> {
    let text = bench.display.line(row);
    let style = Style::default().fg(Color::Black).bg(Color::Green);
    match bench.display.cursor() {
        Some((cursor_row, col)) if cursor_row == row && (col as usize) <= text.len() => {
            let at = col.max(1) as usize - 1;
            Line::from(vec![
                Span::styled(text[..at].to_string(), style),
                Span::styled(
                    text[at..at + 1].to_string(),
                    style.add_modifier(Modifier::UNDERLINED),
                ),
                Span::styled(text[at + 1..].to_string(), style),
            ])
        }
        _ => Line::from(Span::styled(text, style)),
    }
}

fn render_ui(frame: &mut Frame, bench: &Bench, device: &WindsorProbe) {
    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Min(4),
    ])
    .split(frame.area());

    let lcd = Paragraph::new(vec![lcd_line(bench, Row::First), lcd_line(bench, Row::Second)])
        .block(Block::bordered().title(" Windsor Probe "));
    frame.render_widget(lcd, chunks[0]);

    let reading = bench.analog.get();
    let gauge = Gauge::default()
        .block(Block::bordered().title(" Probe position "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(reading as f64 / 255.0)
        .label(format!("ADC {}", reading));
    frame.render_widget(gauge, chunks[1]);

    let settings = &device.session().settings;
    let info = Paragraph::new(vec![
        Line::from(format!(
            "{:?} power, {:?} density, {:?}, {:?}, {:?} aggregate",
            settings.power, settings.density, settings.hardness, settings.units, settings.aggregate
        )),
        Line::from(format!("Stored tests: {}", device.stored_count())),
        Line::from(bench.status.clone()),
        Line::from("↑/↓ Enter Esc: keypad   +/- PgUp/PgDn: probe   Q: quit"),
    ])
    .block(Block::bordered().title(" Bench "));
    frame.render_widget(info, chunks[2]);
}

fn run_app(terminal: &mut Terminal, bench: &mut Bench) -> io::Result<()> {
    let mut device = bench.device();
    device.boot();

    loop {
        terminal.draw(|frame| render_ui(frame, bench, &device))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Up => bench.keypad.press(Key::Up),
                        KeyCode::Down => bench.keypad.press(Key::Down),
                        KeyCode::Enter => bench.keypad.press(Key::Enter),
                        KeyCode::Esc => bench.keypad.press(Key::Escape),
                        KeyCode::Char('+') | KeyCode::Char('=') => bench.move_probe(1),
                        KeyCode::Char('-') => bench.move_probe(-1),
                        KeyCode::PageUp => bench.move_probe(10),
                        KeyCode::PageDown => bench.move_probe(-10),
                        _ => {}
                    }
                }
            }
        }

        device.poll();
        bench.export_download();
    }

    fs::write(EEPROM_FILE, bench.eeprom.snapshot())
}

fn main() -> io::Result<()> {
    // Log to a file so output doesn't interfere with the TUI
    let log_file = fs::File::create("simulator.log")?;
    tracing_subscriber::fmt()
        .with_env_filter("warn,windsor_probe=debug")
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let mut bench = Bench::new();
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut bench);
    let _ = restore_terminal(&mut terminal);
    result
}
