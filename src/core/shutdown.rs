//! Termination signals.
//!
//! On Unix the group reacts to `SIGINT`, `SIGTERM` and `SIGQUIT`; elsewhere only
//! to Ctrl-C. The returned name ends up in [`StopCause::Signal`](crate::StopCause).

use std::io;

/// Resolves with the name of the first termination signal delivered to the process.
///
/// Handlers are registered on every call; registration errors are returned
/// before any waiting happens.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = int.recv() => "SIGINT",
        _ = term.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl_c")
}
