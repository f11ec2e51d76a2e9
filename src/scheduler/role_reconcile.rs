use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::role_sync::RoleReconciler};

/// Starts the scheduled role reconciliation.
///
/// Runs `reconcile_all` on the given cron schedule so roles drift back into line with the
/// roster even when changes were made by hand in Discord.
///
/// # Arguments
/// - `cron`: Six-field cron expression, e.g. `0 0 */6 * * *`
/// - `reconciler`: Role reconciler shared with the bot
///
/// # Returns
/// - `Ok(JobScheduler)` - The running scheduler; it stops when dropped
/// - `Err(AppError)` - Invalid cron expression or scheduler failure
pub async fn start_scheduler(
    cron: &str,
    reconciler: Arc<RoleReconciler>,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let reconciler = reconciler.clone();

        Box::pin(async move {
            if let Err(e) = reconciler.reconcile_all().await {
                tracing::error!("Error reconciling roster roles: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Role reconciliation scheduler started ({})", cron);

    Ok(scheduler)
}
