use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::Duration;
use tracing::{error, info, warn};

use crate::{
    domain::repositories::{payments::PaymentRepository, users::UserRepository},
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{payments::PaymentPostgres, users::UserPostgres},
    },
};

const SWEEP_INTERVAL_SECS: u64 = 60 * 60;
const STALE_LOGIN_DAYS: i64 = 30;
const STALE_PENDING_HOURS: i64 = 24;

/// Spawns the hourly maintenance sweep: blocks accounts that have not
/// logged in for a month and reports pending payments old enough to need
/// reconciliation against the provider.
pub fn spawn(db_pool: Arc<PgPoolSquad>) {
    let user_repo = UserPostgres::new(Arc::clone(&db_pool));
    let payment_repo = PaymentPostgres::new(db_pool);

    tokio::spawn(async move {
        info!("Starting maintenance sweep loop");
        loop {
            sweep(&user_repo, &payment_repo).await;
            tokio::time::sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
        }
    });
}

async fn sweep<User, Pay>(user_repo: &User, payment_repo: &Pay)
where
    User: UserRepository,
    Pay: PaymentRepository,
{
    let now = Utc::now();

    match user_repo
        .block_logins_before(now - ChronoDuration::days(STALE_LOGIN_DAYS))
        .await
    {
        Ok(blocked) if blocked.is_empty() => {}
        Ok(blocked) => {
            info!(count = blocked.len(), "sweep: blocked stale accounts");
        }
        Err(err) => {
            error!(db_error = ?err, "sweep: failed to block stale accounts");
        }
    }

    match payment_repo
        .list_pending_before(now - ChronoDuration::hours(STALE_PENDING_HOURS))
        .await
    {
        Ok(stale) => {
            // Reported only; the transition to a terminal status stays
            // webhook-driven.
            for payment in &stale {
                warn!(
                    payment_id = payment.id,
                    provider_txn_id = %payment.provider_txn_id,
                    created_at = %payment.created_at,
                    "sweep: payment still pending, needs provider reconciliation"
                );
            }
            if !stale.is_empty() {
                info!(count = stale.len(), "sweep: stale pending payments reported");
            }
        }
        Err(err) => {
            error!(db_error = ?err, "sweep: failed to list stale pending payments");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::payments::PaymentEntity,
        repositories::{payments::MockPaymentRepository, users::MockUserRepository},
    };
    use uuid::Uuid;

    #[tokio::test]
    async fn sweep_blocks_stale_users_and_reports_stale_payments() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_block_logins_before()
            .withf(|cutoff| *cutoff < Utc::now() - ChronoDuration::days(29))
            .times(1)
            .returning(|_| Ok(vec![Uuid::new_v4()]));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list_pending_before()
            .withf(|cutoff| *cutoff < Utc::now() - ChronoDuration::hours(23))
            .times(1)
            .returning(|_| {
                Ok(vec![PaymentEntity {
                    id: 1,
                    user_id: Uuid::new_v4(),
                    post_id: None,
                    amount_minor: 500,
                    method: "stripe".to_string(),
                    is_subscription: true,
                    provider_txn_id: "pi_stale".to_string(),
                    status: "pending".to_string(),
                    created_at: Utc::now() - ChronoDuration::days(2),
                }])
            });

        sweep(&user_repo, &payment_repo).await;
    }

    #[tokio::test]
    async fn a_failing_user_query_does_not_stop_the_payment_check() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_block_logins_before()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list_pending_before()
            .times(1)
            .returning(|_| Ok(vec![]));

        sweep(&user_repo, &payment_repo).await;
    }
}
