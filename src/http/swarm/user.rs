use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use rand::{SeedableRng, rngs::StdRng};
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::metrics::TaskMetric;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::user::UserBehavior;

use super::super::{AlbumsEndpoint, execute_action};
use super::limiter::RequestLimiter;

/// Everything one simulated user needs; cloned per user.
#[derive(Clone)]
pub(super) struct UserContext {
    pub(super) client: Client,
    pub(super) endpoint: Arc<AlbumsEndpoint>,
    pub(super) behavior: Arc<UserBehavior>,
    pub(super) shutdown_tx: ShutdownSender,
    pub(super) metrics_tx: mpsc::Sender<TaskMetric>,
    pub(super) request_limiter: Option<Arc<RequestLimiter>>,
    pub(super) active_users: Arc<AtomicUsize>,
    pub(super) seed: Option<u64>,
    pub(super) quiet: bool,
}

/// Counts a user as active for as long as the guard lives.
pub(super) struct ActiveUserGuard<'counter> {
    counter: &'counter AtomicUsize,
}

impl<'counter> ActiveUserGuard<'counter> {
    pub(super) fn acquire(counter: &'counter Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self {
            counter: counter.as_ref(),
        }
    }
}

impl Drop for ActiveUserGuard<'_> {
    fn drop(&mut self) {
        loop {
            let current = self.counter.load(Ordering::Relaxed);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }
    }
}

pub(in crate::http) fn user_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => {
            StdRng::seed_from_u64(seed.wrapping_add(u64::try_from(index).unwrap_or(u64::MAX)))
        }
        None => StdRng::from_entropy(),
    }
}

/// Runs one user until shutdown, the request cap, or a closed metrics
/// channel. Returns an error only when a request cannot be built.
pub(super) async fn run_user(
    user: &UserContext,
    index: usize,
    shutdown_rx: &mut ShutdownReceiver,
) -> Result<(), String> {
    let _active = ActiveUserGuard::acquire(&user.active_users);
    let mut rng = user_rng(user.seed, index);
    let behavior = user.behavior.as_ref();
    let inspect = behavior.profile().inspects_responses();
    if let Some(message) = behavior.profile().start_message() {
        info!(user = index, "{}", message);
    }

    loop {
        let action = behavior.next_action(&mut rng);
        if let Some(limiter) = user.request_limiter.as_ref()
            && !limiter.try_reserve(&user.shutdown_tx)
        {
            debug!(user = index, "Request cap reached");
            break;
        }

        let task = action.kind();
        let start = Instant::now();
        let result = tokio::select! {
            _ = shutdown_rx.recv() => break,
            result = execute_action(&user.client, &user.endpoint, &action, inspect) => result,
        };
        let outcome = result.map_err(|err| format!("User {} stopped: {}", index, err))?;

        if user
            .metrics_tx
            .send(TaskMetric::new(task, start, outcome.request))
            .await
            .is_err()
        {
            break;
        }
        if !user.quiet
            && let Some(detail) = outcome.detail.as_ref()
        {
            detail.emit(task, outcome.request.status);
        }

        let pause = behavior.wait().sample(&mut rng);
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            () = sleep(pause) => {},
        }
    }
    Ok(())
}
