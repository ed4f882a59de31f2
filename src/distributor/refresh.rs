//! Background root refresh loop

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::broadcast;
use tokio::time::interval;

use super::Distributor;
use crate::rootpool::RootPool;

impl Distributor {
    /// Run the periodic root refresh until shutdown
    ///
    /// Ticks immediately once, then every configured interval. Returns when
    /// the shutdown channel signals or closes; an in-flight refresh cycle is
    /// dropped at that point, not awaited. Submissions are never blocked by
    /// this loop — it only swaps store entries between network calls.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval(self.config.refresh_interval());

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("root refresh loop shutting down");
                    break;
                }
                _ = async {
                    ticker.tick().await;
                    self.refresh_roots().await;
                } => {}
            }
        }
    }

    /// Run one refresh cycle over every registered log, concurrently
    ///
    /// Per log: fetch accepted roots with a bounded deadline, build a fresh
    /// pool (unparsable certificates are skipped, an empty response installs
    /// an empty pool) and atomically replace the store entry. A fetch that
    /// errors or times out leaves the log's previous pool untouched, so a
    /// flaky refresh never erases known-good roots.
    pub async fn refresh_roots(&self) {
        let timeout = self.config.get_roots_timeout();

        let fetches: Vec<_> = self
            .clients
            .iter()
            .map(|(url, client)| {
                let url = url.clone();
                let client = Arc::clone(client);
                async move {
                    match tokio::time::timeout(timeout, client.get_accepted_roots()).await {
                        Ok(Ok(certs)) => Some((url, certs)),
                        Ok(Err(e)) => {
                            tracing::warn!(log = %url, error = %e, "get-roots failed; keeping previous pool");
                            None
                        }
                        Err(_) => {
                            tracing::warn!(log = %url, "get-roots timed out; keeping previous pool");
                            None
                        }
                    }
                }
            })
            .collect();

        for (url, certs) in join_all(fetches).await.into_iter().flatten() {
            let pool = RootPool::from_der_certs(certs.into_iter());
            tracing::debug!(log = %url, roots = pool.len(), "installed refreshed root pool");
            self.store.replace(&url, pool);
        }
    }
}
