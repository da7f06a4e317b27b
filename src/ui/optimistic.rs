//! Apply-then-reconcile-or-rollback, shared by every interactive widget.

use std::future::Future;

use parking_lot::Mutex;

use crate::types::errors::ActionError;

/// Runs one optimistic action against `state`.
///
/// `apply` mutates the view immediately and returns whatever `rollback` needs
/// to undo it. `request` is awaited with no lock held. On success `reconcile`
/// writes the authoritative response; on failure `rollback` restores the view
/// and the error is returned. Each step is one synchronous turn.
pub async fn run<S, U, T, Fut>(
    state: &Mutex<S>,
    apply: impl FnOnce(&mut S) -> U,
    request: Fut,
    reconcile: impl FnOnce(&mut S, T),
    rollback: impl FnOnce(&mut S, U),
) -> Result<(), ActionError>
where
    Fut: Future<Output = Result<T, ActionError>>,
{
    let undo = {
        let mut guard = state.lock();
        apply(&mut guard)
    };

    match request.await {
        Ok(value) => {
            let mut guard = state.lock();
            reconcile(&mut guard, value);
            Ok(())
        }
        Err(err) => {
            let mut guard = state.lock();
            rollback(&mut guard, undo);
            Err(err)
        }
    }
}
