//! Auto-play hand-off for `suggestions?play=<id>`.
//!
//! The suggestions route fires a one-shot readiness signal once its list is
//! built. The hand-off waits for that signal and then queues a single
//! [`Action::AutoPlay`] request. It never touches the engine itself and never
//! retries.

use log::debug;
use tokio::sync::{mpsc, oneshot};

use crate::suggestions::Action;

/// Wait for the route to be ready, then request playback of `song_id`.
///
/// Returns whether a request was queued. A route that goes away before it is
/// ready (or stops listening for actions) simply drops the hand-off.
pub async fn hand_off(
    song_id: Option<u32>,
    ready: oneshot::Receiver<()>,
    actions: mpsc::UnboundedSender<Action>,
) -> bool {
    let Some(id) = song_id else {
        return false;
    };

    if ready.await.is_err() {
        debug!("Suggestions route closed before it was ready, dropping hand-off for song {id}");
        return false;
    }

    if actions.send(Action::AutoPlay(id)).is_err() {
        debug!("Suggestions route stopped listening, dropping hand-off for song {id}");
        return false;
    }

    debug!("Requested auto-play of song {id}");
    true
}
