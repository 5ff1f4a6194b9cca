//! # solstake-lib
//!
//! Shared building blocks for the solstake workspace: protocol identifiers,
//! mainnet addresses, SOL amount helpers, environment configuration and the
//! serializable instruction format handed to agents.

pub mod constants;
pub mod instruction;
pub mod protocol_id;

pub use constants::env;
pub use instruction::{RawAccountMeta, RawInstruction};
pub use protocol_id::{ProtocolId, UnknownProtocol};
