use crate::artwork::ArtworkStore;
use crate::renderer::Renderer;
use crate::{Canvas, Error, PreviewConfig, Registry, Result};
use futures::future::try_join_all;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Composite(String, oneshot::Sender<Result<Canvas>>),
    SetRegistry(Registry, oneshot::Sender<Result<()>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async-friendly preview generator backed by a dedicated worker thread.
///
/// The worker owns the renderer, artwork store, registry and config and runs
/// one pipeline at a time; captures inside a run still fan out per device.
/// Async callers await results without blocking their runtime.
#[derive(Clone)]
pub struct Previewer {
    cmd_tx: Sender<Command>,
}

impl Previewer {
    /// Spawn the worker. Fails if the config or registry would make every
    /// run fail.
    pub async fn new<R, A>(
        renderer: R,
        artwork: A,
        registry: Registry,
        config: PreviewConfig,
    ) -> Result<Self>
    where
        R: Renderer + 'static,
        A: ArtworkStore + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let mut registry = registry;
            let checked = config
                .validate()
                .and_then(|_| registry.validate(config.canvas));
            let ok = checked.is_ok();
            let _ = init_tx.send(checked);
            if !ok {
                return;
            }

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Composite(url, resp) => {
                        let res = crate::composite(&url, &registry, &renderer, &artwork, &config);
                        let _ = resp.send(res);
                    }
                    Command::SetRegistry(next, resp) => {
                        let res = next.validate(config.canvas).map(|_| {
                            registry = next;
                        });
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report whether its inputs are usable
        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {}", e)))??;

        Ok(Self { cmd_tx })
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::Other("Preview worker has shut down".into()))
    }

    /// Capture and composite `url` on every registered device
    pub async fn composite(&self, url: &str) -> Result<Canvas> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Composite(url.to_string(), tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Composite canceled: {}", e)))?
    }

    /// Composite several URLs; fails on the first failing run.
    pub async fn composite_many(&self, urls: &[&str]) -> Result<Vec<Canvas>> {
        try_join_all(urls.iter().map(|url| self.composite(url))).await
    }

    /// Swap the device registry used by later runs
    pub async fn set_registry(&self, registry: Registry) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::SetRegistry(registry, tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("SetRegistry canceled: {}", e)))?
    }

    /// Shutdown the background worker
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {}", e)))?
    }
}
