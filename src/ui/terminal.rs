// Terminal front end - crossterm key reader and a one-line status display

use crate::keyboard::dispatcher::InputEvent;
use crate::keyboard::keymap::NoteId;
use crate::messaging::channels::CommandProducer;
use crate::messaging::command::Command;
use crate::ui::surface::{ControlState, ControlSurface};
use crossterm::{
    cursor::MoveToColumn,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::Print,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement},
};
use ringbuf::traits::Producer;
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// How long a key stays shown as "pressed" after its trigger
const PRESS_FLASH: Duration = Duration::from_millis(100);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Raw mode for the lifetime of the guard
///
/// Release events only exist with the keyboard enhancement protocol. Without
/// it the terminal reports presses and repeats only, and keys never clear.
pub struct TerminalGuard {
    keyboard_enhancement_enabled: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let supports_enhancement = matches!(supports_keyboard_enhancement(), Ok(true));
        let keyboard_enhancement_enabled = supports_enhancement
            && execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok();

        if !keyboard_enhancement_enabled {
            log::info!("Keyboard enhancement unavailable, key releases will not be reported");
        }

        Ok(Self {
            keyboard_enhancement_enabled,
        })
    }

    pub fn keyboard_enhancement_enabled(&self) -> bool {
        self.keyboard_enhancement_enabled
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhancement_enabled {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), Print("\r\n"));
    }
}

/// Translate a terminal key event into a piano command
pub fn map_key(key: &KeyEvent) -> Option<Command> {
    let pressed = key.kind == KeyEventKind::Press;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            pressed.then_some(Command::Quit)
        }
        KeyCode::Char(symbol) => Some(Command::Input(match key.kind {
            KeyEventKind::Release => InputEvent::KeyUp { symbol },
            KeyEventKind::Repeat => InputEvent::KeyDown {
                symbol,
                repeat: true,
            },
            KeyEventKind::Press => InputEvent::KeyDown {
                symbol,
                repeat: false,
            },
        })),
        _ if !pressed => None,
        KeyCode::Left => Some(Command::ChangeOctave(-1)),
        KeyCode::Right => Some(Command::ChangeOctave(1)),
        KeyCode::F(1) => Some(Command::StartRecording),
        KeyCode::F(2) => Some(Command::StopRecording),
        KeyCode::F(3) => Some(Command::PlayRecording),
        KeyCode::F(5) => Some(Command::SaveRecording),
        KeyCode::F(6) => Some(Command::LoadRecording),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Push `command`, retrying a quit until there is room or `running` is
/// cleared. Other commands are dropped when the buffer is full.
/// Returns true if the command was queued
pub fn push_command(tx: &mut CommandProducer, mut command: Command, running: &AtomicBool) -> bool {
    loop {
        match tx.try_push(command) {
            Ok(()) => return true,
            Err(rejected) if rejected == Command::Quit && running.load(Ordering::Relaxed) => {
                command = rejected;
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(_) => {
                log::warn!("Command buffer full, key dropped");
                return false;
            }
        }
    }
}

/// Read terminal keys on a dedicated thread until `running` is cleared or
/// a quit key is seen
///
/// The producer is dropped when the thread ends, for whatever reason, which
/// tells the piano loop to stop.
pub fn spawn_input_thread(
    mut tx: CommandProducer,
    running: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("terminal-input".to_string())
        .spawn(move || {
            while running.load(Ordering::Relaxed) {
                match event::poll(POLL_INTERVAL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        log::error!("Terminal poll failed: {}", e);
                        break;
                    }
                }

                let key = match event::read() {
                    Ok(Event::Key(key)) => key,
                    Ok(_) => continue,
                    Err(e) => {
                        log::error!("Terminal read failed: {}", e);
                        break;
                    }
                };

                let Some(command) = map_key(&key) else {
                    continue;
                };
                let quit = command == Command::Quit;
                push_command(&mut tx, command, &running);
                if quit {
                    break;
                }
            }
        })
}

/// Status line: octave, transport buttons and the last key
pub struct TerminalSurface {
    out: Stdout,
    octave: u8,
    controls: ControlState,
    active: Option<NoteId>,
    pressed_at: Option<Instant>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            octave: 0,
            controls: ControlState::IDLE,
            active: None,
            pressed_at: None,
        }
    }

    /// Text of the status line at instant `now`
    pub fn status_line(&self, now: Instant) -> String {
        let button = |label: &str, enabled: bool| {
            if enabled {
                format!("[{}]", label)
            } else {
                format!(" {} ", label.to_lowercase())
            }
        };

        let key = match (&self.active, self.pressed_at) {
            (Some(note), Some(at)) if now.duration_since(at) < PRESS_FLASH => format!("*{}*", note),
            (Some(note), _) => note.to_string(),
            (None, _) => "--".to_string(),
        };

        format!(
            "Octave {} | {} {} {} | {:>5} | <-/-> octave  F5 save  F6 load  Esc quit",
            self.octave,
            button("F1 REC", self.controls.record),
            button("F2 STOP", self.controls.stop),
            button("F3 PLAY", self.controls.play),
            key
        )
    }

    /// True once the "pressed" highlight has been shown long enough
    pub fn flash_expired(&self, now: Instant) -> bool {
        self.pressed_at
            .is_some_and(|at| now.duration_since(at) >= PRESS_FLASH)
    }

    /// Redraw the status line; display errors are logged, never propagated
    pub fn redraw(&mut self) {
        let line = self.status_line(Instant::now());
        let result = queue!(
            self.out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(line)
        )
        .and_then(|_| self.out.flush());

        if let Err(e) = result {
            log::debug!("Status line redraw failed: {}", e);
        }
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSurface for TerminalSurface {
    fn octave_changed(&mut self, octave: u8) {
        self.octave = octave;
        self.redraw();
    }

    fn set_controls(&mut self, controls: ControlState) {
        self.controls = controls;
        self.redraw();
    }

    fn note_pressed(&mut self, note: &NoteId) {
        self.active = Some(note.clone());
        self.pressed_at = Some(Instant::now());
        self.redraw();
    }

    fn note_released(&mut self, note: &NoteId) {
        if self.active.as_ref() == Some(note) {
            self.active = None;
            self.pressed_at = None;
            self.redraw();
        }
    }

    fn tick(&mut self) {
        if self.flash_expired(Instant::now()) {
            self.pressed_at = None;
            self.redraw();
        }
    }
}
