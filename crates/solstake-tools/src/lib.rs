//! # solstake-tools
//!
//! `rig` tools exposing liquid staking to an LLM agent. Each tool is a thin
//! wrapper: argument parsing lives here, staking logic in `solstake-protocols`.

pub mod tool_names;
pub mod tools;

pub use tools::{StakeSolTool, StakingPoolsTool};
