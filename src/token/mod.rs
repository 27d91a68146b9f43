mod clock;
mod envelope;
mod guard;

pub use clock::{Clock, SystemClock};
pub use envelope::{Token, TokenEnvelope, TokenState};
pub use guard::{TokenGuard, TokenGuardResult};
