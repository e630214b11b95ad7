// Veto flags carried by every event instance.
//
// `cancelled` is what listeners observe during dispatch. `finally_cancelled`
// is only read by the dispatcher once every listener has run. The two bits
// are independent: setting one never touches the other.
//
// Nothing here checks cancellability; the owning event guards every access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancellationState {
    cancelled: bool,
    finally_cancelled: bool,
}

impl CancellationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool { self.cancelled }
    pub fn set_cancelled(&mut self, value: bool) { self.cancelled = value; }

    pub fn is_finally_cancelled(&self) -> bool { self.finally_cancelled }
    pub fn set_finally_cancelled(&mut self, value: bool) { self.finally_cancelled = value; }

    // Neither flag set.
    pub fn is_live(&self) -> bool {
        !self.cancelled && !self.finally_cancelled
    }

    // The outcome a dispatcher acts on after the last listener returns.
    pub fn outcome(&self) -> bool {
        self.cancelled || self.finally_cancelled
    }
}
