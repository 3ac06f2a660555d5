use std::io::BufRead;
use std::thread;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::Command;

/// Blank lines and `#` comments yield nothing; bad lines are logged and dropped.
fn parse_line(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    match trimmed.parse::<Command>() {
        Ok(command) => Some(command),
        Err(err) => {
            warn!("ignoring {trimmed:?}: {err}");
            None
        }
    }
}

/// Reads one command per line and forwards it to the dispatcher.
///
/// Returns on end of input, cancellation, or when the dispatcher goes away.
pub async fn run<R>(reader: R, to_dispatcher: Sender<Command>, cancel: CancellationToken) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("input closed");
            break;
        };
        let Some(command) = parse_line(&line) else {
            continue;
        };
        if to_dispatcher.send(command).await.is_err() {
            warn!("dispatcher channel closed");
            break;
        }
    }
    Ok(())
}

/// Reads commands from stdin on a plain thread.
///
/// The thread is never joined: a read blocked on the terminal must not keep
/// the runtime alive after the session ends.
pub fn spawn_stdin(to_dispatcher: Sender<Command>) -> std::io::Result<thread::JoinHandle<()>> {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()), to_dispatcher)
}

/// Forwards commands from a blocking reader on its own thread. Stops on EOF,
/// a read error, or once the dispatcher side of the channel is gone.
pub fn spawn_line_reader<R>(
    reader: R,
    to_dispatcher: Sender<Command>,
) -> std::io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("command-reader".into())
        .spawn(move || {
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!("command read failed: {err}");
                        break;
                    }
                };
                let Some(command) = parse_line(&line) else {
                    continue;
                };
                if to_dispatcher.blocking_send(command).is_err() {
                    debug!("dispatcher gone; command reader exiting");
                    break;
                }
            }
            debug!("command input closed");
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_blanks_and_garbage() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("# load x.png"), None);
        assert_eq!(parse_line("frobnicate"), None);
        assert_eq!(parse_line("  clear  "), Some(Command::Clear));
    }

    #[test]
    fn line_reader_forwards_commands_then_ends() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        let reader = std::io::Cursor::new(b"volume 20\n# note\nspeak\n".to_vec());
        let handle = spawn_line_reader(reader, tx).unwrap();
        assert_eq!(rx.blocking_recv(), Some(Command::SetVolume(20)));
        assert_eq!(rx.blocking_recv(), Some(Command::Speak));
        assert_eq!(rx.blocking_recv(), None);
        handle.join().unwrap();
    }

    #[test]
    fn line_reader_stops_when_dispatcher_is_gone() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        drop(rx);
        let reader = std::io::Cursor::new(b"clear\nclear\nclear\n".to_vec());
        spawn_line_reader(reader, tx).unwrap().join().unwrap();
    }
}
