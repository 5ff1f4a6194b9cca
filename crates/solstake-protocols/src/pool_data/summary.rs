use super::PoolSnapshot;

/// Human-readable pool table, highest APY first.
pub fn format_pool_summary(snapshot: &PoolSnapshot) -> String {
    let mut lines = Vec::with_capacity(snapshot.pools.len() + 2);
    for pool in snapshot.sorted_by_apy() {
        lines.push(format!(
            "- {} ({}): {:.2}% APY, {} SOL TVL",
            pool.protocol.display_name(),
            pool.protocol.lst_symbol(),
            pool.apy_percent(),
            format_sol(pool.tvl_sol)
        ));
    }

    if !snapshot.failures.is_empty() {
        let unavailable: Vec<&str> = snapshot
            .failures
            .iter()
            .map(|f| f.protocol.display_name())
            .collect();
        lines.push(format!("Unavailable: {}", unavailable.join(", ")));
    }

    lines.join("\n")
}

/// Compact SOL figure: 12.35M, 840.2K, 95.5
fn format_sol(sol: f64) -> String {
    if sol >= 1_000_000.0 {
        format!("{:.2}M", sol / 1_000_000.0)
    } else if sol >= 1_000.0 {
        format!("{:.1}K", sol / 1_000.0)
    } else {
        format!("{sol:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PoolMetrics;
    use crate::pool_data::ProtocolFailure;
    use solstake_lib::ProtocolId;

    fn pool(protocol: ProtocolId, apy: f64, tvl_sol: f64) -> PoolMetrics {
        PoolMetrics {
            protocol,
            apy,
            tvl_sol,
            lst_mint: String::new(),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn lists_pools_by_apy_and_names_failures() {
        let snapshot = PoolSnapshot {
            pools: vec![
                pool(ProtocolId::Marinade, 0.071, 12_345_678.0),
                pool(ProtocolId::Jito, 0.0795, 840_200.0),
                pool(ProtocolId::Jpool, 0.065, 95.5),
            ],
            failures: vec![ProtocolFailure {
                protocol: ProtocolId::Solayer,
                error: "HTTP 503".to_string(),
            }],
            fetched_at: chrono::Utc::now(),
        };

        let summary = format_pool_summary(&snapshot);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "- Jito (JitoSOL): 7.95% APY, 840.2K SOL TVL");
        assert_eq!(lines[1], "- Marinade (mSOL): 7.10% APY, 12.35M SOL TVL");
        assert_eq!(lines[2], "- JPool (JSOL): 6.50% APY, 95.5 SOL TVL");
        assert_eq!(lines[3], "Unavailable: Solayer");
    }
}
