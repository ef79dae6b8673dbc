mod limiter;
mod user;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::interval;
use tracing::{debug, info};

use crate::args::TesterArgs;
use crate::metrics::TaskMetric;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::user::UserBehavior;

use super::AlbumsEndpoint;

#[cfg(test)]
pub(super) use limiter::RequestLimiter;
#[cfg(test)]
pub(super) use user::user_rng;

use user::{UserContext, run_user};

/// Users are released in batches of `spawn_rate` once per tick.
const SPAWN_TICK: Duration = Duration::from_secs(1);

/// How many users to run and how fast to start them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwarmSettings {
    pub users: usize,
    pub spawn_rate: usize,
    pub requests: Option<u64>,
    pub seed: Option<u64>,
    pub quiet: bool,
}

impl SwarmSettings {
    #[must_use]
    pub fn from_args(args: &TesterArgs) -> Self {
        Self {
            users: args.users.get(),
            spawn_rate: args.spawn_rate.get(),
            requests: args.requests.map(u64::from),
            seed: args.seed,
            quiet: args.quiet,
        }
    }
}

/// Spawns every simulated user up front, gated on a semaphore that the
/// spawn loop feeds `spawn_rate` permits per tick. The handle resolves to
/// the errors of users that stopped abnormally.
#[must_use]
pub fn setup_swarm(
    settings: SwarmSettings,
    client: Client,
    endpoint: AlbumsEndpoint,
    behavior: UserBehavior,
    shutdown_tx: &ShutdownSender,
    metrics_tx: &mpsc::Sender<TaskMetric>,
) -> tokio::task::JoinHandle<Vec<String>> {
    let context = UserContext {
        client,
        endpoint: Arc::new(endpoint),
        behavior: Arc::new(behavior),
        shutdown_tx: shutdown_tx.clone(),
        metrics_tx: metrics_tx.clone(),
        request_limiter: limiter::RequestLimiter::new(settings.requests).map(Arc::new),
        active_users: Arc::new(AtomicUsize::new(0)),
        seed: settings.seed,
        quiet: settings.quiet,
    };
    let max_users = settings.users;
    let spawn_rate = settings.spawn_rate;

    // Receivers exist before any task runs so an early shutdown is not missed.
    let mut shutdown_rx = context.shutdown_tx.subscribe();
    let user_receivers: Vec<ShutdownReceiver> = (0..max_users)
        .map(|_| context.shutdown_tx.subscribe())
        .collect();

    tokio::spawn(async move {
        let mut spawn_interval = interval(SPAWN_TICK);
        let mut total_spawned: usize = 0;
        let permits = Arc::new(Semaphore::new(0));
        let mut user_handles = Vec::with_capacity(max_users);

        for (index, mut shutdown_rx_user) in user_receivers.into_iter().enumerate() {
            let permits = Arc::clone(&permits);
            let user = context.clone();

            let handle = tokio::spawn(async move {
                let startup_permit_result = tokio::select! {
                    _ = shutdown_rx_user.recv() => return Ok(()),
                    permit = permits.acquire_owned() => permit,
                };
                let Ok(_startup_permit) = startup_permit_result else {
                    return Ok(());
                };
                run_user(&user, index, &mut shutdown_rx_user).await
            });

            user_handles.push(handle);
        }
        let UserContext {
            metrics_tx,
            active_users,
            request_limiter,
            ..
        } = context;
        drop(metrics_tx);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = spawn_interval.tick() => {
                    if total_spawned >= max_users {
                        continue;
                    }
                    let available = max_users.saturating_sub(total_spawned);
                    let to_spawn = spawn_rate.min(available);
                    permits.add_permits(to_spawn);
                    total_spawned = total_spawned.saturating_add(to_spawn);
                    debug!(
                        spawned = total_spawned,
                        active = active_users.load(Ordering::Relaxed),
                        "Spawning users"
                    );
                    if total_spawned == max_users {
                        info!("All {} users spawned.", max_users);
                    }
                }
            }
        }

        permits.close();
        drop(permits);

        let mut runtime_errors = Vec::new();
        for handle in user_handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => runtime_errors.push(err),
                Err(err) => runtime_errors.push(format!("User task failed: {}", err)),
            }
        }
        if let Some(limiter) = request_limiter.as_ref() {
            debug!(reserved = limiter.reserved(), "Request cap accounting");
        }
        runtime_errors
    })
}
