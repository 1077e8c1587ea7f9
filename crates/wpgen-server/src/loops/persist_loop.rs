//! Calculation history persistence loop.
//!
//! Completed calculations arrive over a channel and are written in batches,
//! one transaction per flush. A failed flush keeps the batch and backs off.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tokio::time::interval;

use wpgen_core::CalculationRecord;

use crate::backoff::Backoff;
use crate::persistence::{calculations as calculations_db, Database};

const FLUSH_SECS: u64 = 1;
const BACKOFF_MAX_SECS: u64 = 30;

pub async fn run_persist_loop(
    db: Database,
    mut rx: mpsc::Receiver<CalculationRecord>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(Duration::from_secs(FLUSH_SECS));
    let mut backoff = Backoff::new(
        Duration::from_secs(FLUSH_SECS),
        Duration::from_secs(BACKOFF_MAX_SECS),
    );
    let mut pending: Vec<CalculationRecord> = Vec::new();

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("History persistence loop shutting down");
                break;
            }
            maybe_record = rx.recv() => {
                match maybe_record {
                    Some(record) => {
                        pending.push(record);
                        while let Ok(record) = rx.try_recv() {
                            pending.push(record);
                        }
                        try_flush(&db, &mut pending, &mut backoff).await;
                    }
                    None => {
                        tracing::info!("History persistence channel closed");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                try_flush(&db, &mut pending, &mut backoff).await;
            }
        }
    }

    while let Ok(record) = rx.try_recv() {
        pending.push(record);
    }
    if let Err(err) = flush_pending(&db, &mut pending).await {
        tracing::warn!(
            "History persistence final flush failed, {} records lost: {}",
            pending.len(),
            err
        );
    }
}

async fn try_flush(db: &Database, pending: &mut Vec<CalculationRecord>, backoff: &mut Backoff) {
    if pending.is_empty() || !backoff.ready() {
        return;
    }
    match flush_pending(db, pending).await {
        Ok(()) => backoff.reset(),
        Err(err) => {
            let delay = backoff.fail();
            tracing::warn!(
                "History persistence flush failed: {} (backing off {:?})",
                err,
                delay
            );
        }
    }
}

async fn flush_pending(db: &Database, pending: &mut Vec<CalculationRecord>) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }

    let mut tx = db.pool().begin().await?;
    for record in pending.iter() {
        calculations_db::add_calculation_tx(&mut tx, record).await?;
    }
    tx.commit().await?;

    tracing::debug!("Persisted {} calculation records", pending.len());
    pending.clear();
    Ok(())
}
