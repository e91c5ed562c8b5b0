use crate::deployer::{FarmDeployer, fetch_deployer, list_farms};
use crate::rpc::ChainReader;
use alloy_primitives::Address;
use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub factory_address: Address,
    pub start_block: u64,
    /// Only process the first `limit` farms of the factory list.
    pub limit: Option<usize>,
}

pub struct Scanner<R> {
    reader: R,
    settings: ScanSettings,
}

impl<R: ChainReader> Scanner<R> {
    pub fn new(reader: R, settings: ScanSettings) -> Self {
        Scanner { reader, settings }
    }

    #[cfg(test)]
    pub(crate) fn reader(&self) -> &R {
        &self.reader
    }

    async fn list_farms(&self) -> Result<Vec<Address>> {
        list_farms(&self.reader, self.settings.factory_address).await
    }

    /// Resolves the deployer of every farm, one farm at a time and in factory
    /// order. The first failure aborts the scan.
    pub async fn run(&self) -> Result<Vec<FarmDeployer>> {
        let mut farms = self.list_farms().await?;
        if let Some(limit) = self.settings.limit {
            farms.truncate(limit);
        }

        info!(
            "Scanning {} farms for ownership transfers since block {}",
            farms.len(),
            self.settings.start_block
        );

        let mut results = Vec::with_capacity(farms.len());
        for (index, farm) in farms.into_iter().enumerate() {
            info!("{}. Processing farm: {:?}", index, farm);
            let result =
                fetch_deployer(&self.reader, index, farm, self.settings.start_block).await?;
            results.push(result);
        }

        let missing = results.iter().filter(|r| r.deployer.is_none()).count();
        info!(
            "Scanned {} farms, {} without a deployer",
            results.len(),
            missing
        );

        Ok(results)
    }
}
