//! Check-ledger command - audits every group balance

use anyhow::bail;
use tracing::{info, warn};

use crate::domain::ledger::BalanceReport;
use crate::infrastructure::ledger::LedgerService;
use crate::infrastructure::storage::StorageFactory;

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let repos = StorageFactory::create(&config.storage_config()?).await?;
    let service = LedgerService::new(
        repos.ledger.clone(),
        repos.groups.clone(),
        repos.memberships.clone(),
        repos.users.clone(),
    );

    let reports = service.audit().await?;
    let drifted = drifted(&reports);

    for report in &drifted {
        warn!(
            group_id = %report.group_id,
            stored = %report.stored,
            computed = %report.computed,
            "Balance does not match ledger"
        );
    }

    if !drifted.is_empty() {
        bail!(
            "{} of {} groups have a balance that does not match their ledger",
            drifted.len(),
            reports.len()
        );
    }

    info!(groups = reports.len(), "All group balances match their ledgers");
    Ok(())
}

fn drifted(reports: &[BalanceReport]) -> Vec<&BalanceReport> {
    reports.iter().filter(|r| !r.is_consistent()).collect()
}
