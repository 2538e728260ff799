use mastermind::cli::{CliInterface, parse_cli};
use mastermind::game_loop;
use mastermind::logging::init_logging;
use mastermind::settings::{Settings, load_settings_from_file, settings_path, write_settings};
use mastermind::tui::TuiInterface;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    // The board owns the terminal, so it only logs when given a file
    if !cli.tui || cli.log_file.is_some() {
        if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref()) {
            eprintln!("Failed to open log file: {e}");
            return ExitCode::FAILURE;
        }
    }

    let path = cli.settings_path.clone().or_else(settings_path);
    let stored = match &path {
        Some(p) if p.exists() => match load_settings_from_file(p) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Failed to load settings from '{}': {e}", p.display());
                return ExitCode::FAILURE;
            }
        },
        _ => Settings::default(),
    };
    let settings = cli.merge_settings(stored);

    let options = match settings.session_options(cli.seed) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.save_settings {
        match &path {
            Some(p) => match write_settings(p, &settings) {
                Ok(()) => println!("Settings saved to {}.", p.display()),
                Err(e) => eprintln!("Failed to save settings to '{}': {e}", p.display()),
            },
            None => eprintln!("No settings location available; pass --settings <path>."),
        }
    }

    let result = if cli.tui {
        match TuiInterface::new() {
            Ok(mut interface) => game_loop(&options, &mut interface),
            Err(e) => {
                eprintln!("Failed to start the terminal UI: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut interface = CliInterface::new(io::stdin().lock());
        game_loop(&options, &mut interface)
    };

    match result {
        Ok(summary) => {
            println!(
                "Games won: {}, lost: {}, abandoned: {}.",
                summary.won, summary.lost, summary.abandoned
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
