/// Which termination request arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Interrupt,
    Terminate,
}

impl Termination {
    pub fn name(self) -> &'static str {
        match self {
            Termination::Interrupt => "SIGINT",
            Termination::Terminate => "SIGTERM",
        }
    }
}

#[cfg(unix)]
impl From<Termination> for nix::sys::signal::Signal {
    fn from(t: Termination) -> Self {
        match t {
            Termination::Interrupt => nix::sys::signal::Signal::SIGINT,
            Termination::Terminate => nix::sys::signal::Signal::SIGTERM,
        }
    }
}

/// Resolve on the first SIGINT or SIGTERM (ctrl-c on other platforms).
#[cfg(unix)]
pub async fn wait_for_termination() -> std::io::Result<Termination> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = int.recv() => Ok(Termination::Interrupt),
        _ = term.recv() => Ok(Termination::Terminate),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_termination() -> std::io::Result<Termination> {
    tokio::signal::ctrl_c().await?;
    Ok(Termination::Interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_posix() {
        assert_eq!(Termination::Interrupt.name(), "SIGINT");
        assert_eq!(Termination::Terminate.name(), "SIGTERM");
    }

    #[cfg(unix)]
    #[test]
    fn converts_to_nix_signals() {
        let s: nix::sys::signal::Signal = Termination::Terminate.into();
        assert_eq!(s, nix::sys::signal::Signal::SIGTERM);
    }
}
