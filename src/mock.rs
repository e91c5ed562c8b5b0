//! In-memory `ChainReader` for exercising the pipeline without a node.

use crate::contracts::OwnershipTransferred;
use crate::rpc::ChainReader;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use alloy_primitives::{Address, B256};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Builds the log a farm emits when ownership moves from the zero address to `new_owner`.
pub fn ownership_log(farm: Address, new_owner: Address, block_number: u64) -> Log {
    let data = OwnershipTransferred {
        previousOwner: Address::ZERO,
        newOwner: new_owner,
    }
    .encode_log_data();

    Log {
        inner: alloy_primitives::Log {
            address: farm,
            data,
        },
        block_number: Some(block_number),
        transaction_hash: Some(B256::left_padding_from(&block_number.to_be_bytes())),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct MockChain {
    farms: Vec<Address>,
    logs: HashMap<Address, Vec<Log>>,
    failing: HashSet<Address>,
    fail_farm_list: bool,
    queried: Mutex<Vec<Filter>>,
}

impl MockChain {
    pub fn new(farms: Vec<Address>) -> Self {
        MockChain {
            farms,
            ..Default::default()
        }
    }

    pub fn with_logs(mut self, farm: Address, logs: Vec<Log>) -> Self {
        self.logs.insert(farm, logs);
        self
    }

    pub fn failing_logs(mut self, farm: Address) -> Self {
        self.failing.insert(farm);
        self
    }

    pub fn failing_farm_list(mut self) -> Self {
        self.fail_farm_list = true;
        self
    }

    pub fn filters(&self) -> Vec<Filter> {
        self.queried.lock().unwrap().clone()
    }

    fn farm_of(&self, filter: &Filter) -> Option<Address> {
        self.farms
            .iter()
            .copied()
            .find(|farm| filter.address.matches(farm))
    }

    /// Farm addresses of every log query, in issue order.
    pub fn queried_farms(&self) -> Vec<Address> {
        self.filters()
            .iter()
            .filter_map(|filter| self.farm_of(filter))
            .collect()
    }
}

impl ChainReader for MockChain {
    async fn farm_list(&self, _factory: Address) -> Result<Vec<Address>> {
        if self.fail_farm_list {
            anyhow::bail!("execution reverted");
        }
        Ok(self.farms.clone())
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        self.queried.lock().unwrap().push(filter.clone());

        let Some(farm) = self.farm_of(filter) else {
            return Ok(Vec::new());
        };
        if self.failing.contains(&farm) {
            anyhow::bail!("connection reset by peer");
        }
        Ok(self.logs.get(&farm).cloned().unwrap_or_default())
    }
}
