use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use super::{APOLOGY_TEXT, Observers, SubmitError};
use crate::conversation::Turn;
use crate::inference_client::{GenerateResult, InferenceClient};

/// State shared between a [`Session`](super::Session) and the tasks it
/// spawned for outstanding requests.
///
/// Tasks only hold a weak reference, so the state goes away with the
/// session.
pub(crate) struct Shared {
    model: String,
    inference_client: InferenceClient,
    observers: Observers,
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    transcript: Vec<Turn>,
    pending_input: String,
    running_tasks: HashMap<u64, JoinHandle<()>>,
    next_task_id: u64,
    closed: bool,
}

impl Shared {
    pub(crate) fn new(
        inference_client: InferenceClient,
        model: String,
        observers: Observers,
    ) -> Self {
        Self {
            model,
            inference_client,
            observers,
            state: Mutex::new(SessionState {
                next_task_id: 1,
                ..Default::default()
            }),
        }
    }

    #[inline]
    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn submit(
        self: &Arc<Self>,
        text: &str,
    ) -> Result<(), SubmitError> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignored empty input");
            return Err(SubmitError::EmptyInput);
        }

        let mut state = self.lock();
        state.pending_input.clear();
        self.append_turn(&mut state, Turn::user(text));

        // The request is issued here, after the user turn is in place. The
        // task holding its result can't touch the state before we release
        // the lock, so it always finds its own entry in `running_tasks`.
        let resp_fut = self.inference_client.generate(&self.model, text);
        let task_id = state.next_task_id;
        state.next_task_id += 1;

        let weak_self = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let resp_res = resp_fut.await;
            let Some(this) = weak_self.upgrade() else {
                debug!("session has been closed, discard request {task_id}");
                return;
            };
            this.finish_request(task_id, resp_res);
        });
        state.running_tasks.insert(task_id, task);
        trace!("request {task_id} is in flight");

        Ok(())
    }

    fn finish_request(&self, task_id: u64, resp_res: GenerateResult) {
        let mut state = self.lock();
        if state.closed {
            debug!("session has been closed, discard request {task_id}");
            return;
        }
        state.running_tasks.remove(&task_id);

        let turn = match resp_res {
            Ok(generated) => Turn::assistant(generated.text),
            Err(err) => {
                if let Some(on_inference_failure) =
                    &self.observers.on_inference_failure
                {
                    on_inference_failure(err.kind());
                }
                Turn::assistant(APOLOGY_TEXT)
            }
        };
        self.append_turn(&mut state, turn);
        trace!("request {task_id} is resolved");
    }

    /// Appends a turn and notifies the observer, all under the lock so that
    /// notifications follow transcript order.
    fn append_turn(&self, state: &mut SessionState, turn: Turn) {
        state.transcript.push(turn);
        if let (Some(on_turn), Some(turn)) =
            (&self.observers.on_turn, state.transcript.last())
        {
            on_turn(turn);
        }
    }

    pub(crate) fn teardown(&self) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        let running_tasks = std::mem::take(&mut state.running_tasks);
        if !running_tasks.is_empty() {
            debug!("cancelling {} outstanding requests", running_tasks.len());
        }
        for (_, task) in running_tasks {
            task.abort();
        }
    }

    #[inline]
    pub(crate) fn set_pending_input(&self, text: String) {
        self.lock().pending_input = text;
    }

    #[inline]
    pub(crate) fn pending_input(&self) -> String {
        self.lock().pending_input.clone()
    }

    #[inline]
    pub(crate) fn transcript(&self) -> Vec<Turn> {
        self.lock().transcript.clone()
    }

    #[inline]
    pub(crate) fn pending_requests(&self) -> usize {
        self.lock().running_tasks.len()
    }

    // The transcript is append-only, a panicking observer can't leave it
    // half-written.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
