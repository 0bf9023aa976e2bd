use async_trait::async_trait;
use repdeck_types::{LikeResponse, LikeState, PostId};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiResult;
use crate::logging::targets;

/// Backend collaborator that flips the current user's like on a post and
/// answers with the authoritative state.
#[async_trait]
pub trait LikeBackend: Send + Sync {
    async fn toggle_like(&self, post_id: &PostId) -> ApiResult<LikeResponse>;
}

/// One optimistic like toggle, from optimistic apply until it settles.
#[derive(Debug, Clone, PartialEq)]
pub struct LikeMutation {
    /// Feed-local sequence number, for correlating log lines
    pub seq: u64,
    pub post_id: PostId,
    pub requested: bool,
    /// Confirmed state before the optimistic update, restored on failure
    pub snapshot: LikeState,
    pub optimistic: LikeState,
}

#[derive(Debug)]
pub struct LikeOutcome {
    pub mutation: LikeMutation,
    pub result: ApiResult<LikeResponse>,
}

impl LikeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the optimistic-update / confirm / rollback protocol for likes.
///
/// Holds no per-post state: each mutation carries its own rollback snapshot,
/// and overlapping toggles on one post settle independently.
#[derive(Clone)]
pub struct LikeMutationCoordinator {
    backend: Arc<dyn LikeBackend>,
}

impl LikeMutationCoordinator {
    pub fn new(backend: Arc<dyn LikeBackend>) -> Self {
        Self { backend }
    }

    /// Snapshot `current` and compute the optimistic state for `requested`.
    pub fn begin(&self, seq: u64, post_id: PostId, current: LikeState, requested: bool) -> LikeMutation {
        let optimistic = current.toggled_to(requested);
        log::debug!(
            target: targets::LIKES,
            "like #{} post={} {:?} -> {:?} (optimistic)",
            seq,
            post_id,
            current,
            optimistic
        );
        LikeMutation {
            seq,
            post_id,
            requested,
            snapshot: current,
            optimistic,
        }
    }

    /// Send the mutation to the backend and wait for it to settle.
    pub async fn execute(&self, mutation: LikeMutation) -> LikeOutcome {
        let result = self.backend.toggle_like(&mutation.post_id).await;
        LikeOutcome { mutation, result }
    }

    /// Run the request on the runtime and deliver the outcome to `outcomes`,
    /// leaving the caller's event loop free in the meantime.
    pub fn dispatch(&self, mutation: LikeMutation, outcomes: UnboundedSender<LikeOutcome>) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let outcome = coordinator.execute(mutation).await;
            if outcomes.send(outcome).is_err() {
                log::debug!(target: targets::LIKES, "like outcome dropped: feed is gone");
            }
        });
    }

    /// State to display once a mutation settles: the server's answer on
    /// success, the exact pre-toggle snapshot on failure.
    pub fn settle(outcome: &LikeOutcome) -> LikeState {
        let mutation = &outcome.mutation;
        match &outcome.result {
            Ok(response) => {
                let confirmed = LikeState::from(*response);
                log::debug!(
                    target: targets::LIKES,
                    "like #{} post={} confirmed {:?}",
                    mutation.seq,
                    mutation.post_id,
                    confirmed
                );
                confirmed
            }
            Err(e) => {
                log::warn!(
                    "Failed to toggle like #{} on post {}: {}; rolling back to {:?}",
                    mutation.seq,
                    mutation.post_id,
                    e,
                    mutation.snapshot
                );
                mutation.snapshot
            }
        }
    }
}

impl std::fmt::Debug for LikeMutationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeMutationCoordinator").finish_non_exhaustive()
    }
}
