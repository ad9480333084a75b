use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use editor::{Command, Editor, Event, FileGateway};

fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: cli <edit.json> [output.json]");
        return ExitCode::FAILURE;
    };
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{input}.cut.json")));

    let mut session = Editor::with_file_gateway(PathBuf::from(input), output);
    match run(&mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn run(session: &mut Editor<FileGateway>) -> editor::Result<()> {
    let events = session.handle_command(Command::Load)?;
    report(&events);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(error) => {
                eprintln!("stdin: {error}");
                return Ok(());
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            return Ok(());
        }
        if line == "show" {
            print_timeline(session);
            continue;
        }

        let Some(command) = parse_command(line) else {
            eprintln!(
                "commands: seek <ms> | cut | toggle | left | right | all | \
                 play | pause | preview on|off | ack | save | show | quit"
            );
            continue;
        };
        match session.handle_command(command) {
            Ok(events) if events.is_empty() => println!("(no effect)"),
            Ok(events) => report(&events),
            Err(error) => eprintln!("error: {error}"),
        }
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "seek" => parts
            .next()?
            .parse()
            .ok()
            .map(|at_ms| Command::SetPosition { at_ms }),
        "cut" => Some(Command::Cut),
        "toggle" => Some(Command::ToggleSegmentDeleted),
        "left" => Some(Command::MergeLeft),
        "right" => Some(Command::MergeRight),
        "all" => Some(Command::MergeAll),
        "play" => Some(Command::SetPlaying { playing: true }),
        "pause" => Some(Command::SetPlaying { playing: false }),
        "preview" => match parts.next()? {
            "on" => Some(Command::SetPreviewMode { enabled: true }),
            "off" => Some(Command::SetPreviewMode { enabled: false }),
            _ => None,
        },
        "ack" => Some(Command::AcknowledgePreviewSeek),
        "save" => Some(Command::Save),
        _ => None,
    }
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::TimelineChanged(snapshot) => {
                println!(
                    "timeline: {} segments over {} ms{}",
                    snapshot.segments.len(),
                    snapshot.duration,
                    if snapshot.has_changes {
                        " (unsaved changes)"
                    } else {
                        ""
                    }
                );
            }
            Event::PositionChanged {
                at_ms,
                active_segment,
            } => println!("position: {at_ms} ms (segment {active_segment})"),
            Event::PreviewSeek { at_ms } => println!("preview seek -> {at_ms} ms"),
            Event::PlaybackStopped => println!("playback stopped"),
            Event::Saved => println!("saved"),
        }
    }
}

fn print_timeline(session: &Editor<FileGateway>) {
    let snapshot = session.snapshot();
    for (index, segment) in snapshot.segments.iter().enumerate() {
        let marker = if index == session.active_segment() {
            '>'
        } else {
            ' '
        };
        let state = if segment.deleted { "deleted" } else { "alive" };
        println!(
            "{marker} [{index}] {}..{} ms {state}",
            segment.start, segment.end
        );
    }
    println!(
        "position {} ms, playing={}, preview={}",
        session.currently_at(),
        session.playback().is_playing,
        session.playback().is_play_preview
    );
}

#[cfg(test)]
mod tests {
    use editor::Command;

    use super::parse_command;

    #[test]
    fn parses_seek_with_fractional_milliseconds() {
        assert_eq!(
            parse_command("seek 1500.5"),
            Some(Command::SetPosition { at_ms: 1500.5 })
        );
    }

    #[test]
    fn parses_preview_toggle() {
        assert_eq!(
            parse_command("preview on"),
            Some(Command::SetPreviewMode { enabled: true })
        );
        assert_eq!(parse_command("preview sideways"), None);
    }

    #[test]
    fn rejects_unknown_verbs() {
        assert_eq!(parse_command("explode"), None);
    }
}
