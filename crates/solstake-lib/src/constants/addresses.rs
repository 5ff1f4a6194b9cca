//! Mainnet addresses of the staking programs, pools and LST mints

use crate::ProtocolId;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Program IDs
pub mod programs {
    use super::*;

    /// SPL Stake Pool program shared by Jito, BlazeStake, JPool and MarginFi
    pub const SPL_STAKE_POOL_PROGRAM: &str = "SPoo1Ku8WFXoNDMHPsrGSTSG1Y47rzgn41SLUNakuHy";

    /// Marinade liquid staking program
    pub const MARINADE_PROGRAM: &str = "MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD";

    pub fn spl_stake_pool_program() -> Pubkey {
        Pubkey::from_str(SPL_STAKE_POOL_PROGRAM).expect("Invalid SPL Stake Pool program address")
    }

    pub fn marinade_program() -> Pubkey {
        Pubkey::from_str(MARINADE_PROGRAM).expect("Invalid Marinade program address")
    }
}

/// Marinade accounts
pub mod marinade {
    use super::*;

    /// Marinade state account
    pub const STATE: &str = "8szGkuLTAux9XMgZ2vtY39jVSowEcpBfFfD8hXSEqdGC";

    /// mSOL mint
    pub const MSOL_MINT: &str = "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So";

    /// mSOL leg token account of the Marinade liquidity pool
    pub const LIQ_POOL_MSOL_LEG: &str = "7GgPYjS5Dza89wV6FpZ23kUJRG5vbQ1GM25ezspYFSoE";

    pub fn state() -> Pubkey {
        Pubkey::from_str(STATE).expect("Invalid Marinade state address")
    }

    pub fn msol_mint() -> Pubkey {
        Pubkey::from_str(MSOL_MINT).expect("Invalid mSOL mint address")
    }

    pub fn liq_pool_msol_leg() -> Pubkey {
        Pubkey::from_str(LIQ_POOL_MSOL_LEG).expect("Invalid Marinade mSOL leg address")
    }
}

/// SPL stake pool accounts and their pool token mints
pub mod pools {
    /// Jito stake pool
    pub const JITO_POOL: &str = "Jito4APyf642JPZPx3hGc6WWJ8zPKtRbRs4P815Awbb";
    pub const JITOSOL_MINT: &str = "J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn";

    /// BlazeStake stake pool
    pub const BLAZE_POOL: &str = "stk9ApL5HeVAwPLr3TLhDXdZS8ptVu7zp6ov8HFDuMi";
    pub const BSOL_MINT: &str = "bSo13r4TkiE4KumL71LsHTPpL2euBYLFx6h9HP3piy1";

    /// JPool stake pool
    pub const JPOOL_POOL: &str = "CtMyWsrUtAwXWiGr9WjHT5fC3p3fgV8cyGpLTo2LJzG1";
    pub const JSOL_MINT: &str = "7Q2afV64in6N6SeZsAAB81TJzwDoD6zpqmHkzi9Dcavn";

    /// MarginFi LST stake pool
    pub const MARGINFI_POOL: &str = "DqhH94PjkZsjAqEze2BEkWhFQJ6EyU6MdtMphMgnXqeK";
    pub const MARGINFI_LST_MINT: &str = "LSTxxxnJzKDFSLr4dUkPcmCf5VyryEqzPLz5j4bpxFp";

    /// Solayer sSOL mint
    pub const SSOL_MINT: &str = "sSo14endRuUbvQaJS3dq36Q829a3A6BEfoeeRGJywEh";
}

/// LST mint address for a protocol.
pub fn lst_mint(protocol: ProtocolId) -> Pubkey {
    let address = match protocol {
        ProtocolId::Marinade => marinade::MSOL_MINT,
        ProtocolId::Jito => pools::JITOSOL_MINT,
        ProtocolId::Blaze => pools::BSOL_MINT,
        ProtocolId::Marginfi => pools::MARGINFI_LST_MINT,
        ProtocolId::Jpool => pools::JSOL_MINT,
        ProtocolId::Solayer => pools::SSOL_MINT,
    };
    Pubkey::from_str(address).expect("Invalid LST mint address")
}

/// Stake pool account for protocols backed by the SPL Stake Pool program.
pub fn spl_pool_address(protocol: ProtocolId) -> Option<Pubkey> {
    let address = match protocol {
        ProtocolId::Jito => pools::JITO_POOL,
        ProtocolId::Blaze => pools::BLAZE_POOL,
        ProtocolId::Marginfi => pools::MARGINFI_POOL,
        ProtocolId::Jpool => pools::JPOOL_POOL,
        ProtocolId::Marinade | ProtocolId::Solayer => return None,
    };
    Some(Pubkey::from_str(address).expect("Invalid stake pool address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protocol_has_a_valid_lst_mint() {
        for id in ProtocolId::ALL {
            assert_ne!(lst_mint(id), Pubkey::default(), "{id}");
        }
    }

    #[test]
    fn only_spl_backed_protocols_have_pool_addresses() {
        assert!(spl_pool_address(ProtocolId::Jito).is_some());
        assert!(spl_pool_address(ProtocolId::Blaze).is_some());
        assert!(spl_pool_address(ProtocolId::Marginfi).is_some());
        assert!(spl_pool_address(ProtocolId::Jpool).is_some());
        assert!(spl_pool_address(ProtocolId::Marinade).is_none());
        assert!(spl_pool_address(ProtocolId::Solayer).is_none());
    }
}
