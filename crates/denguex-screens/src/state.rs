//! Shared state machinery for screen controllers.
//!
//! Every remote-data slice moves through the same four phases, guarded by a
//! generation counter so that a slow response can never overwrite the result
//! of a request started after it. Refreshes are last-write-wins by
//! *initiation* order, not completion order.

use denguex_client::ApiError;

/// Lifecycle of one remote-data slice. Recovery from `Failed` is always a
/// manual retry; nothing transitions out of it on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ScreenState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Proof that a load was started. Settling with a stale ticket is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// One remote-data slice plus its generation counter.
#[derive(Debug)]
pub struct Slice<T> {
    state: ScreenState<T>,
    generation: u64,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self { state: ScreenState::Idle, generation: 0 }
    }
}

impl<T> Slice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScreenState<T> {
        &self.state
    }

    pub fn ready(&self) -> Option<&T> {
        self.state.ready()
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            ScreenState::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Start a load: bump the generation, enter `Loading`, hand back the
    /// ticket the eventual completion must present.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.state = ScreenState::Loading;
        Ticket(self.generation)
    }

    /// Deliver a completion. Returns false (and changes nothing) when a
    /// newer load has started since this ticket was issued.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.state = match result {
            Ok(value) => ScreenState::Ready(value),
            Err(e) => ScreenState::Failed(e.to_string()),
        };
        true
    }

    /// Overwrite the slice with a known value outside the load cycle, e.g.
    /// after a local mutation of already-loaded data.
    pub fn put(&mut self, value: T) {
        self.state = ScreenState::Ready(value);
    }
}

/// A confirmed value plus at most one unconfirmed overlay.
///
/// Mutations render from the staged value immediately; the server's answer
/// either commits it or rolls back to the confirmed value. The discarded
/// overlay is returned from `roll_back` so the caller can word a notice.
#[derive(Debug, Clone)]
pub struct Pending<T> {
    confirmed: T,
    staged: Option<T>,
}

impl<T: Clone> Pending<T> {
    pub fn new(confirmed: T) -> Self {
        Self { confirmed, staged: None }
    }

    /// What the screen should render right now.
    pub fn current(&self) -> &T {
        self.staged.as_ref().unwrap_or(&self.confirmed)
    }

    pub fn is_staged(&self) -> bool {
        self.staged.is_some()
    }

    pub fn stage(&mut self, tentative: T) {
        self.staged = Some(tentative);
    }

    /// Promote the staged value. A commit with nothing staged keeps the
    /// confirmed value, so a duplicate server ack is harmless.
    pub fn commit(&mut self) {
        if let Some(staged) = self.staged.take() {
            self.confirmed = staged;
        }
    }

    /// Replace the confirmed value directly, dropping any overlay. Used
    /// when the server echo is authoritative over what was staged.
    pub fn confirm(&mut self, value: T) {
        self.confirmed = value;
        self.staged = None;
    }

    /// Discard the overlay and return it, restoring the confirmed value.
    pub fn roll_back(&mut self) -> Option<T> {
        self.staged.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_with_current_ticket_lands() {
        let mut slice: Slice<u32> = Slice::new();
        let t = slice.begin();
        assert!(slice.state().is_loading());
        assert!(slice.settle(t, Ok(7)));
        assert_eq!(slice.ready(), Some(&7));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut slice: Slice<u32> = Slice::new();
        let old = slice.begin();
        let new = slice.begin();
        assert!(!slice.settle(old, Ok(1)));
        assert!(slice.state().is_loading());
        assert!(slice.settle(new, Ok(2)));
        assert_eq!(slice.ready(), Some(&2));
        // A duplicate delivery of the already-settled ticket is stale too
        // only if a new load started; the same ticket may settle again.
        assert!(slice.settle(new, Ok(3)));
        assert_eq!(slice.ready(), Some(&3));
    }

    #[test]
    fn failure_lands_as_failed_with_message() {
        let mut slice: Slice<u32> = Slice::new();
        let t = slice.begin();
        slice.settle(t, Err(ApiError::Network("connection refused".into())));
        assert!(slice.state().error().unwrap().contains("connection refused"));
    }

    #[test]
    fn pending_commit_promotes_staged() {
        let mut p = Pending::new(vec![1, 2]);
        p.stage(vec![1, 2, 3]);
        assert_eq!(p.current(), &vec![1, 2, 3]);
        p.commit();
        assert_eq!(p.current(), &vec![1, 2, 3]);
        assert!(!p.is_staged());
    }

    #[test]
    fn pending_roll_back_restores_confirmed() {
        let mut p = Pending::new("Pending".to_string());
        p.stage("Resolved".to_string());
        let discarded = p.roll_back();
        assert_eq!(discarded.as_deref(), Some("Resolved"));
        assert_eq!(p.current(), "Pending");
    }

    #[test]
    fn confirm_overrides_staged_overlay() {
        let mut p = Pending::new(false);
        p.stage(true);
        p.confirm(false);
        assert_eq!(p.current(), &false);
        assert!(!p.is_staged());
    }
}
