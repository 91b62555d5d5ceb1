//! Read/print loop.
//!
//! Reads lines from `input`, turns them into session intents, and writes
//! whatever each published snapshot adds to `output`. Ends on `/quit`, at the
//! end of input, or when the session runtime stops.

use parley_app::{Session, SessionError, SessionSnapshot};
use parley_client::SessionPhase;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    input::{Input, parse},
    render::{Printer, rooms_lines, who_line},
};

/// Fatal loop errors.
#[derive(Error, Debug)]
pub enum ReplError {
    /// Reading input or writing output failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The session runtime is gone.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Run the loop until quit.
///
/// `auto_join` is joined the first time the lobby is reached.
pub async fn run<R, W>(
    session: &Session,
    input: R,
    output: &mut W,
    mut auto_join: Option<String>,
) -> Result<(), ReplError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut snapshots = session.subscribe();
    let mut printer = Printer::new();

    let initial = snapshots.borrow_and_update().clone();
    show(session, output, &mut printer, &initial, &mut auto_join).await?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Err(SessionError::RuntimeStopped.into());
                }

                let snapshot = snapshots.borrow_and_update().clone();
                show(session, output, &mut printer, &snapshot, &mut auto_join).await?;
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("end of input");
                    break;
                };

                match parse(&line) {
                    Ok(Input::Quit) => break,
                    Ok(command) => dispatch(session, output, command).await?,
                    Err(e) => write_lines(output, vec![format!("!! {e}")]).await?,
                }
            },
        }
    }

    if session.snapshot().phase.is_logged_in() {
        report(output, session.logout().await).await?;
    }
    output.flush().await?;
    Ok(())
}

/// Print what `snapshot` adds, and join `auto_join` once in the lobby.
async fn show<W>(
    session: &Session,
    output: &mut W,
    printer: &mut Printer,
    snapshot: &SessionSnapshot,
    auto_join: &mut Option<String>,
) -> Result<(), ReplError>
where
    W: AsyncWrite + Unpin,
{
    write_lines(output, printer.update(snapshot)).await?;

    if snapshot.phase == SessionPhase::Lobby
        && let Some(room) = auto_join.take()
    {
        report(output, session.join(room).await).await?;
    }
    Ok(())
}

async fn dispatch<W>(session: &Session, output: &mut W, command: Input) -> Result<(), ReplError>
where
    W: AsyncWrite + Unpin,
{
    match command {
        Input::Join(room) => report(output, session.join(room).await).await,
        Input::Leave => report(output, session.leave().await).await,
        Input::Rooms => write_lines(output, rooms_lines(&session.snapshot().rooms)).await,
        Input::Who => write_lines(output, vec![who_line(&session.snapshot())]).await,
        Input::Post(body) => {
            // Whole lines only: one typing edge up, then the post brings it down.
            report(output, session.input_changed(body.clone()).await).await?;
            report(output, session.post(body).await).await
        },
        Input::Quit | Input::Empty => Ok(()),
    }
}

/// Print a rejected request. Only a stopped runtime is fatal.
async fn report<W>(output: &mut W, result: Result<(), SessionError>) -> Result<(), ReplError>
where
    W: AsyncWrite + Unpin,
{
    match result {
        Ok(()) => Ok(()),
        Err(SessionError::RuntimeStopped) => Err(SessionError::RuntimeStopped.into()),
        Err(e) => write_lines(output, vec![format!("!! {e}")]).await,
    }
}

async fn write_lines<W>(output: &mut W, lines: Vec<String>) -> Result<(), ReplError>
where
    W: AsyncWrite + Unpin,
{
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.flush().await?;
    Ok(())
}
