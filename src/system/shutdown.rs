use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Turns Ctrl+C (and SIGTERM on unix) into a request to stop sweeping.
///
/// Every receiver from [`SweepInterrupt::subscribe`] sees one message when a
/// signal arrives or when [`SweepInterrupt::stop`] is called.
pub struct SweepInterrupt {
    tx: broadcast::Sender<()>,
    watcher: JoinHandle<()>,
}

impl SweepInterrupt {
    /// Starts watching for signals. Must be called inside a tokio runtime.
    #[must_use]
    pub fn listen() -> Self {
        let (tx, stop_rx) = broadcast::channel(1);
        let watcher = tokio::spawn(watch_signals(tx.clone(), stop_rx));
        Self { tx, watcher }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notifies subscribers and waits for the signal watcher to exit.
    pub async fn stop(self) {
        drop(self.tx.send(()));
        if let Err(err) = self.watcher.await {
            debug!("Signal watcher ended abnormally: {}", err);
        }
    }
}

async fn watch_signals(tx: broadcast::Sender<()>, mut stop_rx: broadcast::Receiver<()>) {
    tokio::select! {
        _ = stop_rx.recv() => {}
        () = interrupted() => {
            info!("Interrupt received, stopping sweep");
            drop(tx.send(()));
        }
    }
}

async fn interrupted() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        let terminate = async {
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(err) => {
                    warn!("Failed to register SIGTERM handler: {}", err);
                    std::future::pending::<()>().await;
                }
            }
        };
        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }
    }

    #[cfg(not(unix))]
    ctrl_c.await;
}
