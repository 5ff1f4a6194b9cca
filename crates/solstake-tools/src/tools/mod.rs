pub mod stake_sol;
pub mod staking_pools;

pub use stake_sol::{StakeSolArgs, StakeSolError, StakeSolTool};
pub use staking_pools::{StakingPoolsArgs, StakingPoolsError, StakingPoolsTool};

use solstake_lib::{ProtocolId, UnknownProtocol};

/// Blank or missing protocol names mean "let the planner choose".
pub(crate) fn parse_protocol(name: Option<&str>) -> Result<Option<ProtocolId>, UnknownProtocol> {
    match name.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name.parse().map(Some),
    }
}
