//! Unsigned transaction assembly and wire encoding.

use crate::chain::ChainReader;
use crate::common::{ProtocolError, StakeInstructions};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::{
    message::{v0, VersionedMessage},
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use tracing::debug;

/// Turns adapter output into a transaction the user's wallet can sign.
///
/// Local instructions are compiled into a v0 message against the latest
/// blockhash with `payer` as fee payer; signature slots are left empty.
/// Pre-built transactions are returned unchanged.
pub async fn build_unsigned_transaction(
    chain: &dyn ChainReader,
    payer: &Pubkey,
    stake: StakeInstructions,
) -> Result<VersionedTransaction, ProtocolError> {
    let instructions = match stake {
        StakeInstructions::Transaction(tx) => return Ok(tx),
        StakeInstructions::Instructions(ixs) => ixs,
    };

    let blockhash = chain.latest_blockhash().await?;
    let message = v0::Message::try_compile(payer, &instructions, &[], blockhash)
        .map_err(|e| ProtocolError::Validation(format!("failed to compile message: {e}")))?;
    debug!(
        accounts = message.account_keys.len(),
        instructions = instructions.len(),
        "Compiled v0 message"
    );

    let signatures =
        vec![Signature::default(); message.header.num_required_signatures as usize];
    Ok(VersionedTransaction {
        signatures,
        message: VersionedMessage::V0(message),
    })
}

/// bincode + base64, the format wallets accept for `signTransaction`.
pub fn encode_transaction(transaction: &VersionedTransaction) -> Result<String> {
    let bytes = bincode::serialize(transaction).context("Failed to serialize transaction")?;
    Ok(STANDARD.encode(bytes))
}

pub fn decode_transaction(encoded: &str) -> Result<VersionedTransaction> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .context("Transaction is not valid base64")?;
    bincode::deserialize(&bytes).context("Failed to deserialize transaction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MemoryChain;
    use solana_sdk::hash::Hash;
    use solana_system_interface::instruction as system_instruction;

    #[tokio::test]
    async fn compiles_instructions_with_payer_and_blockhash() {
        let payer = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let chain = MemoryChain::new().with_blockhash(blockhash);
        let ix = system_instruction::transfer(&payer, &Pubkey::new_unique(), 5);

        let tx = build_unsigned_transaction(
            &chain,
            &payer,
            StakeInstructions::Instructions(vec![ix]),
        )
        .await
        .unwrap();

        assert_eq!(tx.signatures, vec![Signature::default()]);
        assert_eq!(tx.message.static_account_keys()[0], payer);
        assert_eq!(*tx.message.recent_blockhash(), blockhash);
    }

    #[tokio::test]
    async fn prebuilt_transactions_pass_through() {
        let payer = Pubkey::new_unique();
        let chain = MemoryChain::new();
        let prebuilt = build_unsigned_transaction(
            &chain,
            &payer,
            StakeInstructions::Instructions(vec![system_instruction::transfer(
                &payer,
                &Pubkey::new_unique(),
                1,
            )]),
        )
        .await
        .unwrap();

        let passed = build_unsigned_transaction(
            &chain,
            &Pubkey::new_unique(),
            StakeInstructions::Transaction(prebuilt.clone()),
        )
        .await
        .unwrap();
        assert_eq!(passed, prebuilt);
    }

    #[tokio::test]
    async fn encoding_survives_the_wire() {
        let payer = Pubkey::new_unique();
        let chain = MemoryChain::new().with_blockhash(Hash::new_unique());
        let tx = build_unsigned_transaction(
            &chain,
            &payer,
            StakeInstructions::Instructions(vec![system_instruction::transfer(
                &payer,
                &Pubkey::new_unique(),
                7,
            )]),
        )
        .await
        .unwrap();

        let encoded = encode_transaction(&tx).unwrap();
        assert_eq!(decode_transaction(&encoded).unwrap(), tx);
        assert!(decode_transaction("%%%").is_err());
    }
}
