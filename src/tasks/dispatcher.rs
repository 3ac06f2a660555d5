use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::events::Command;
use crate::session::{Outcome, Session};

/// Applies commands to the session strictly in arrival order.
///
/// A failing command is logged and the session keeps going. `Quit` cancels
/// the shared token so the input side stops too. The session is handed back
/// once the channel drains or the token fires.
pub async fn run(
    mut commands: Receiver<Command>,
    mut session: Session,
    cancel: CancellationToken,
) -> Result<Session> {
    loop {
        let command = select! {
            _ = cancel.cancelled() => break,
            command = commands.recv() => command,
        };
        let Some(command) = command else {
            break;
        };
        match session.dispatch(command) {
            Ok(Outcome::Quit) => {
                info!("quit requested");
                cancel.cancel();
                break;
            }
            Ok(Outcome::Voices(voices)) => {
                for voice in &voices {
                    info!("{}", voice.label());
                }
            }
            Ok(outcome) => info!(state = %session.state(), ?outcome, "command done"),
            Err(err) => warn!(state = %session.state(), "command failed: {err}"),
        }
    }
    Ok(session)
}
