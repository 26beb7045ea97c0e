// Piano Keys - terminal piano with take recording and replay

use clap::{Parser, Subcommand};
use piano_keys::audio::{AudioBackend, CpalBackend, SilentBackend};
use piano_keys::config::PianoConfig;
use piano_keys::keyboard::{MAX_OCTAVE, generate};
use piano_keys::messaging::create_command_channel;
use piano_keys::piano::Piano;
use piano_keys::sampler::{DirectorySoundStore, SoundBank};
use piano_keys::sequencer::SystemClock;
use piano_keys::ui::{LogSurface, TerminalGuard, TerminalSurface, spawn_input_thread};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Log file used by the interactive mode when the config names none
const DEFAULT_LOG_FILE: &str = "piano_keys.log";
const FRAME_INTERVAL: Duration = Duration::from_millis(5);
/// Long enough for the audio callback to apply a stop before the stream closes
const SHUTDOWN_GRACE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "piano_keys")]
#[command(about = "Play a sampled piano from the computer keyboard", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/piano_keys/config.ron)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive piano in the terminal
    Play {
        /// Load sounds but produce no output
        #[arg(long)]
        no_audio: bool,
    },

    /// Replay a saved recording
    Replay {
        /// Recording file (.json or .ron)
        file: PathBuf,

        /// Load sounds but produce no output
        #[arg(long)]
        no_audio: bool,
    },

    /// Print the key map of an octave
    Keymap {
        /// Octave to map (default: configured initial octave)
        #[arg(short, long)]
        octave: Option<u8>,
    },

    /// Load every sound and report the ones that failed
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let interactive = matches!(cli.command, Commands::Play { .. });
    if let Err(e) = init_logging(cli.verbose, interactive, &config) {
        eprintln!("ERROR: cannot open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PianoConfig, piano_keys::ConfigError> {
    match path {
        Some(path) => PianoConfig::load(path),
        None => PianoConfig::load_default(),
    }
}

/// stderr by default; a file in interactive mode so the status line stays intact
fn init_logging(verbose: u8, interactive: bool, config: &PianoConfig) -> std::io::Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level));

    let log_file = config
        .log_file
        .clone()
        .or_else(|| interactive.then(|| PathBuf::from(DEFAULT_LOG_FILE)));
    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn run(command: Commands, config: &PianoConfig) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Commands::Play { no_audio } => play(config, no_audio),
        Commands::Replay { file, no_audio } => replay(config, &file, no_audio),
        Commands::Keymap { octave } => {
            print_keymap(octave.unwrap_or(config.initial_octave));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => check(config),
    }
}

fn open_backend(config: &PianoConfig, no_audio: bool) -> Box<dyn AudioBackend> {
    if no_audio {
        return Box::new(SilentBackend::new());
    }

    match CpalBackend::init(config.volume, config.command_capacity) {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("Audio output unavailable ({}), continuing without sound", e);
            eprintln!("WARNING: no audio output ({})", e);
            Box::new(SilentBackend::new())
        }
    }
}

fn load_bank(config: &PianoConfig, backend: &mut dyn AudioBackend) -> SoundBank {
    let store = DirectorySoundStore::new(&config.sound_dir, &config.sound_extension);
    let (bank, report) = SoundBank::load_catalog(&store, backend);
    if !report.is_complete() {
        eprintln!(
            "WARNING: {} of {} sounds failed to load (see `piano_keys check`)",
            report.failed.len(),
            report.loaded + report.failed.len()
        );
    }
    bank
}

fn play(config: &PianoConfig, no_audio: bool) -> Result<ExitCode, Box<dyn Error>> {
    let mut backend = open_backend(config, no_audio);
    let bank = load_bank(config, backend.as_mut());

    println!("=== Piano Keys ===");
    println!("White keys: z..m and a..k   Black keys: q w r t y u i o p [");
    println!("F1 record  F2 stop  F3 play  F5 save  F6 load  <-/-> octave  Esc quit\n");

    let (tx, mut rx) = create_command_channel(config.command_capacity);
    let running = Arc::new(AtomicBool::new(true));

    let guard = TerminalGuard::enter()?;
    let input = spawn_input_thread(tx, Arc::clone(&running))?;

    let mut piano = Piano::new(
        bank,
        backend,
        Box::new(TerminalSurface::new()),
        Arc::new(SystemClock::new()),
    )
    .with_octave(config.initial_octave)
    .with_recording_path(&config.recording_path);

    while piano.process_commands(&mut rx) {
        piano.tick();
        std::thread::sleep(FRAME_INTERVAL);
    }

    running.store(false, Ordering::Relaxed);
    if input.join().is_err() {
        log::error!("Input thread panicked");
    }
    shut_down(piano);
    drop(guard);
    Ok(ExitCode::SUCCESS)
}

fn replay(config: &PianoConfig, file: &Path, no_audio: bool) -> Result<ExitCode, Box<dyn Error>> {
    let mut backend = open_backend(config, no_audio);
    let bank = load_bank(config, backend.as_mut());

    let mut piano = Piano::new(
        bank,
        backend,
        Box::new(LogSurface),
        Arc::new(SystemClock::new()),
    )
    .with_recording_path(file);

    let count = piano.load_recording()?;
    println!("Replaying {} notes from {}", count, file.display());

    let report = piano.play_recording();
    println!(
        "Done: {} played, {} skipped in {:.1}s",
        report.triggered,
        report.skipped,
        report.elapsed.as_secs_f64()
    );
    shut_down(piano);
    Ok(ExitCode::SUCCESS)
}

/// Cut ringing sounds and give the stream one callback before it is dropped
fn shut_down(mut piano: Piano) {
    piano.stop_all();
    std::thread::sleep(SHUTDOWN_GRACE);
    drop(piano);
}

fn print_keymap(octave: u8) {
    if octave > MAX_OCTAVE {
        println!("Note: octave {} is outside the playable range 0-{}", octave, MAX_OCTAVE);
    }

    let keymap = generate(octave as i32);
    println!("Key map for octave {} ({} keys)", octave, keymap.len());
    for (symbol, note) in keymap.iter() {
        println!("  {}  ->  {}", symbol, note);
    }
}

fn check(config: &PianoConfig) -> Result<ExitCode, Box<dyn Error>> {
    let store = DirectorySoundStore::new(&config.sound_dir, &config.sound_extension);
    let (_, report) = SoundBank::load_catalog(&store, &mut SilentBackend::new());

    println!(
        "{} sounds loaded from {}",
        report.loaded,
        config.sound_dir.display()
    );
    for (note, error) in &report.failed {
        println!("  {}: {}", note, error);
    }

    Ok(if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
