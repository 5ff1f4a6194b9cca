//! Command handlers behind the `solstake` binary.
//!
//! Every handler returns the text to print so the binary stays a thin shell
//! around [`App`].

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rig::tool::Tool;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use solstake_agent::{ActionRequest, ChatMessage, LlmClient, OpenAiCompatibleClient, StakePlugin};
use solstake_lib::constants::sol_to_lamports;
use solstake_lib::ProtocolId;
use solstake_protocols::{
    format_pool_summary, http::api_client, ChainReader, Endpoints, PoolDataProvider,
    ProtocolRegistry, StakePlanner, StakeRequest,
};
use solstake_tools::{StakeSolTool, StakingPoolsTool};
use std::sync::Arc;
use tracing::{info, instrument};

/// Liquid-stake SOL from the command line or through the chat agent.
#[derive(Parser, Debug)]
#[command(name = "solstake", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show APY and TVL of every staking pool.
    Pools {
        /// Print the raw snapshot as JSON.
        #[arg(long)]
        json: bool,
        /// Only show this protocol.
        #[arg(long)]
        protocol: Option<ProtocolId>,
    },
    /// Build an unsigned stake transaction.
    Stake {
        /// Wallet that stakes and will sign.
        #[arg(long)]
        wallet: Pubkey,
        /// Amount in SOL.
        #[arg(long)]
        amount: f64,
        /// Protocol to stake with. Defaults to the highest APY.
        #[arg(long)]
        protocol: Option<ProtocolId>,
    },
    /// Send a chat message to the staking agent.
    Chat {
        #[arg(long)]
        wallet: Pubkey,
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Print the LLM tool definitions as JSON.
    Tools,
}

/// Shared services for all commands.
pub struct App {
    planner: Arc<StakePlanner>,
    plugin: StakePlugin,
}

impl App {
    pub fn new(planner: Arc<StakePlanner>, llm: Option<Arc<dyn LlmClient>>) -> Result<Self> {
        let plugin = StakePlugin::with_planner(planner.clone(), llm)?;
        Ok(Self { planner, plugin })
    }

    /// Mainnet services configured from the environment.
    pub fn from_env() -> Result<Self> {
        let endpoints = Endpoints::from_env();
        info!(rpc = %endpoints.rpc_url, "Connecting to Solana RPC");

        let chain: Arc<dyn ChainReader> = Arc::new(RpcClient::new_with_commitment(
            endpoints.rpc_url.clone(),
            CommitmentConfig::confirmed(),
        ));
        let http = api_client().context("Failed to create HTTP client")?;
        let registry = Arc::new(ProtocolRegistry::mainnet(chain.clone(), http, &endpoints));
        let pool_data = Arc::new(PoolDataProvider::from_env(registry.all()));
        let planner = Arc::new(StakePlanner::new(registry, pool_data, chain));

        let llm = OpenAiCompatibleClient::from_env()?.map(|c| Arc::new(c) as Arc<dyn LlmClient>);
        Self::new(planner, llm)
    }

    pub async fn run(&self, command: Command) -> Result<String> {
        match command {
            Command::Pools { json, protocol } => self.pools(json, protocol).await,
            Command::Stake {
                wallet,
                amount,
                protocol,
            } => self.stake(wallet, amount, protocol).await,
            Command::Chat { wallet, message } => self.chat(wallet, &message.join(" ")).await,
            Command::Tools => self.tools().await,
        }
    }

    #[instrument(skip(self))]
    pub async fn pools(&self, json: bool, protocol: Option<ProtocolId>) -> Result<String> {
        let snapshot = self
            .planner
            .pool_data()
            .get_pool_data()
            .await
            .context("Failed to fetch pool data")?;
        let snapshot = match protocol {
            Some(id) => snapshot.filtered(id),
            None => snapshot,
        };

        if json {
            return serde_json::to_string_pretty(&snapshot).context("Failed to serialize pools");
        }
        Ok(format!(
            "{}\nTotal TVL: {:.0} SOL",
            format_pool_summary(&snapshot),
            snapshot.total_tvl_sol()
        ))
    }

    #[instrument(skip(self))]
    pub async fn stake(
        &self,
        wallet: Pubkey,
        amount_sol: f64,
        protocol: Option<ProtocolId>,
    ) -> Result<String> {
        let lamports = sol_to_lamports(amount_sol)?;
        let prepared = self
            .planner
            .prepare(&StakeRequest {
                user: wallet,
                lamports,
                protocol,
            })
            .await
            .context("Failed to prepare stake")?;

        let apy = prepared
            .apy
            .map(|apy| format!("{:.2}%", apy * 100.0))
            .unwrap_or_else(|| "unknown".to_string());
        Ok(format!(
            "Protocol: {} ({})\nAmount: {} SOL\nAPY: {}\nUnsigned transaction (base64):\n{}",
            prepared.protocol.display_name(),
            prepared.protocol.lst_symbol(),
            amount_sol,
            apy,
            prepared.transaction_base64
        ))
    }

    #[instrument(skip(self))]
    pub async fn chat(&self, wallet: Pubkey, message: &str) -> Result<String> {
        let request = ActionRequest::new(wallet, vec![ChatMessage::user(message)]);
        let response = match self.plugin.handle(&request).await {
            Ok(response) => response,
            Err(e) => return Ok(e.to_string()),
        };

        Ok(match response.stake {
            Some(stake) => format!(
                "{}\n\nUnsigned transaction (base64):\n{}",
                response.text, stake.transaction_base64
            ),
            None => response.text,
        })
    }

    pub async fn tools(&self) -> Result<String> {
        let definitions = vec![
            StakeSolTool::new(self.planner.clone())
                .definition(String::new())
                .await,
            StakingPoolsTool::new(self.planner.pool_data().clone())
                .definition(String::new())
                .await,
        ];
        serde_json::to_string_pretty(&definitions).context("Failed to serialize tool definitions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    #[rstest]
    #[case(&["solstake", "pools"], Command::Pools { json: false, protocol: None })]
    #[case(
        &["solstake", "pools", "--json", "--protocol", "jitosol"],
        Command::Pools { json: true, protocol: Some(ProtocolId::Jito) }
    )]
    #[case(
        &["solstake", "stake", "--wallet", WALLET, "--amount", "1.5", "--protocol", "marinade"],
        Command::Stake {
            wallet: WALLET.parse().unwrap(),
            amount: 1.5,
            protocol: Some(ProtocolId::Marinade),
        }
    )]
    #[case(
        &["solstake", "chat", "--wallet", WALLET, "stake", "2", "sol"],
        Command::Chat {
            wallet: WALLET.parse().unwrap(),
            message: vec!["stake".to_string(), "2".to_string(), "sol".to_string()],
        }
    )]
    #[case(&["solstake", "tools"], Command::Tools)]
    fn parses_commands(#[case] args: &[&str], #[case] expected: Command) {
        assert_eq!(Cli::try_parse_from(args).unwrap().command, expected);
    }

    #[rstest]
    #[case(&["solstake", "stake", "--wallet", "not-a-key", "--amount", "1"])]
    #[case(&["solstake", "pools", "--protocol", "lido"])]
    #[case(&["solstake", "chat", "--wallet", WALLET])]
    fn rejects_bad_arguments(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }
}
