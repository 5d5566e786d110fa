use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;
use yboard::BoardConfig;

const USAGE: &str = "Usage: yboard [--config <board.yaml>] [--background] [--dry-run] (-e <notes> | <notes-file>)";

#[derive(Debug, Default, PartialEq)]
struct Options {
    config: Option<String>,
    background: bool,
    dry_run: bool,
    notes: Option<String>,
    notes_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config needs a file")?;
                options.config = Some(path.clone());
            }
            "--background" => options.background = true,
            "--dry-run" => options.dry_run = true,
            "-e" => {
                let notes = iter.next().ok_or("-e needs a note string")?;
                options.notes = Some(notes.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown flag '{}'", flag)),
            path => {
                if options.notes_path.is_some() {
                    return Err(format!("Unexpected argument '{}'", path));
                }
                options.notes_path = Some(path.to_string());
            }
        }
    }

    match (&options.notes, &options.notes_path) {
        (None, None) => Err("No notes given".to_string()),
        (Some(_), Some(_)) => Err("Give either -e or a notes file, not both".to_string()),
        _ => Ok(options),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => match BoardConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => BoardConfig::default(),
    };

    let notes = match options.notes {
        Some(notes) => notes,
        None => {
            let path = options.notes_path.unwrap_or_default();
            match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    error!("Error reading file '{}': {}", path, e);
                    process::exit(1);
                }
            }
        }
    };

    if options.dry_run {
        match yboard::dry_run(&notes, &config.audio) {
            Ok(report) => print!("{}", report),
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        }
        return;
    }

    let board = yboard::host_board(config);
    let result = if options.background {
        board.play_notes_background(&notes).map(|()| {
            while !board.wait_audio(Duration::from_secs(1)) {}
        })
    } else {
        board.play_notes(&notes)
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
    if let Some(e) = board.audio().last_error() {
        error!("Playback ended early: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inline_notes() {
        let options = parse_args(&args(&["-e", "C D E", "--dry-run"])).unwrap();
        assert_eq!(options.notes.as_deref(), Some("C D E"));
        assert!(options.dry_run);
        assert!(!options.background);
    }

    #[test]
    fn test_file_with_config() {
        let options =
            parse_args(&args(&["--config", "board.yaml", "--background", "song.txt"])).unwrap();
        assert_eq!(options.config.as_deref(), Some("board.yaml"));
        assert_eq!(options.notes_path.as_deref(), Some("song.txt"));
        assert!(options.background);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["-e"])).is_err());
        assert!(parse_args(&args(&["--loud", "song.txt"])).is_err());
        assert!(parse_args(&args(&["-e", "C", "song.txt"])).is_err());
        assert!(parse_args(&args(&["a.txt", "b.txt"])).is_err());
    }
}
