use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;

sol! {
    event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

    function getFarmList() external view returns (address[] memory);
}

pub fn decode_ownership_transferred(log: &Log) -> anyhow::Result<OwnershipTransferred> {
    let log_data = log.data();
    let decoded = OwnershipTransferred::decode_raw_log(log.topics(), &log_data.data)?;
    Ok(decoded)
}
