//! Watch mode: recompile whenever the description changes.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::compiler::Compiler;
use crate::config::loader::load_description;
use crate::config::watcher::DescriptionWatcher;
use crate::config::CompilerConfig;
use crate::error::Result;
use crate::lifecycle::Shutdown;
use crate::model::LoadBalancerDescription;
use crate::observability::metrics;
use crate::output::writer::write_atomic;

/// Long-running compile loop.
pub struct WatchLoop {
    input: PathBuf,
    output: PathBuf,
    compiler: Compiler,
    poll_interval: Duration,
    debounce: Duration,
}

impl WatchLoop {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            input: config.input.path.clone(),
            output: config.output.path.clone(),
            compiler: Compiler::new(config.validation.strict),
            poll_interval: Duration::from_secs(config.watch.poll_interval_secs),
            debounce: Duration::from_millis(config.watch.debounce_ms),
        }
    }

    /// Compile once, then on every change until shutdown.
    ///
    /// The initial compilation must succeed; later failures are logged and
    /// the previously delivered document stays in place.
    pub async fn run(self, shutdown: Shutdown) -> Result<()> {
        let description = load_description(&self.input)?;
        self.deliver(&description)?;

        let (watcher, updates) = DescriptionWatcher::new(&self.input, self.poll_interval);
        let _watcher = watcher.run()?;

        self.process_updates(updates, shutdown).await;

        tracing::info!("Watch loop stopped");
        Ok(())
    }

    async fn process_updates(
        &self,
        mut updates: mpsc::UnboundedReceiver<LoadBalancerDescription>,
        shutdown: Shutdown,
    ) {
        let mut shutdown_rx = shutdown.subscribe();

        loop {
            let mut latest = tokio::select! {
                update = updates.recv() => match update {
                    Some(description) => description,
                    None => break,
                },
                _ = shutdown_rx.recv() => break,
            };

            // Editors often emit several events per save; keep only the last.
            tokio::select! {
                _ = tokio::time::sleep(self.debounce) => {}
                _ = shutdown_rx.recv() => break,
            }
            while let Ok(description) = updates.try_recv() {
                latest = description;
            }

            if let Err(e) = self.deliver(&latest) {
                tracing::error!(error = %e, "Recompilation failed, keeping previous document");
            }
        }
    }

    fn deliver(&self, description: &LoadBalancerDescription) -> Result<()> {
        let document = self.compiler.compile(description)?;
        write_atomic(&self.output, &document).map_err(|e| {
            metrics::record_write_failure();
            e
        })?;
        tracing::info!(path = %self.output.display(), "Proxy configuration delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackendHost, IpFamily, Protocol, ServiceDescription, ServicePort};
    use std::fs;
    use std::path::Path;

    fn description() -> LoadBalancerDescription {
        LoadBalancerDescription {
            service: Some(ServiceDescription {
                ports: vec![ServicePort::new(80, 30000, Protocol::Tcp)],
                ip_families: vec![IpFamily::IPv4],
                health_check_port: 32000,
            }),
            nodes: vec![BackendHost::new("a").with_address(IpFamily::IPv4, "10.0.0.1")],
        }
    }

    fn config_in(dir: &Path, debounce_ms: u64) -> CompilerConfig {
        let mut config = CompilerConfig::default();
        config.input.path = dir.join("lb.toml");
        config.output.path = dir.join("envoy.yaml");
        config.watch.debounce_ms = debounce_ms;
        config
    }

    fn toml_description(health_check_port: u16) -> String {
        format!(
            "[service]\nipFamilies = [\"IPv4\"]\nhealthCheckPort = {}\n\n\
             [[service.ports]]\nlistenPort = 80\ntargetPort = 30000\n\n\
             [[nodes]]\nname = \"a\"\naddresses = {{ IPv4 = \"10.0.0.1\" }}\n",
            health_check_port
        )
    }

    async fn wait_for_output(path: &Path, needle: &str) -> bool {
        for _ in 0..100 {
            if fs::read_to_string(path).is_ok_and(|doc| doc.contains(needle)) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_updates_are_delivered_until_channel_closes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 1);
        let watch = WatchLoop::new(&config);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(description()).unwrap();
        drop(tx);

        watch.process_updates(rx, Shutdown::new()).await;

        let document = fs::read_to_string(&config.output.path).unwrap();
        assert!(document.contains("listener_IPv4_80_TCP"));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_debounce() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 60_000);
        let watch = WatchLoop::new(&config);

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(description()).unwrap();

        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.trigger();
        });

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            watch.process_updates(rx, shutdown),
        )
        .await;

        assert!(finished.is_ok(), "shutdown waited for the debounce period");
        assert!(!config.output.path.exists());
        drop(tx);
    }

    #[tokio::test]
    async fn test_run_recompiles_on_rename_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), 10);
        config.watch.poll_interval_secs = 1;
        fs::write(&config.input.path, toml_description(32000)).unwrap();

        let shutdown = Shutdown::new();
        let watch = WatchLoop::new(&config);
        let task = tokio::spawn(watch.run(shutdown.clone()));

        assert!(wait_for_output(&config.output.path, "port_value: 32000").await);

        let staged = dir.path().join("lb.toml.new");
        for port in [32001, 32002, 32003] {
            fs::write(&staged, toml_description(port)).unwrap();
            fs::rename(&staged, &config.input.path).unwrap();
            let needle = format!("port_value: {}", port);
            assert!(wait_for_output(&config.output.path, &needle).await, "{} not delivered", port);
        }

        shutdown.trigger();
        assert!(task.await.unwrap().is_ok());
    }
}
