//! # Termination signal handling for [`Supervisor::run`](crate::Supervisor::run).
//!
//! **Unix:** `SIGINT`, `SIGTERM`, `SIGQUIT`. **Elsewhere:** Ctrl-C.

/// Waits for a termination signal and returns its name.
///
/// Each call installs independent listeners. Fails only if a listener cannot be registered.
#[cfg(unix)]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv()  => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for a termination signal and returns its name.
#[cfg(not(unix))]
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
