//! Deterministic quiz engine
//!
//! All gameplay logic lives here. Nothing in this module owns a timer or
//! touches the filesystem:
//! - Seeded RNG only
//! - Clock advanced by the caller (`Session::tick`)
//! - Deferred work handed back to the caller as tickets

pub mod expr;
pub mod options;
pub mod select;
pub mod session;
pub mod state;

pub use expr::{Operator, evaluate};
pub use options::generate_options;
pub use select::select_question;
pub use session::{AdvanceTicket, Session, SubmitOutcome, SubscriptionId};
pub use state::{Question, Snapshot, Status, Tier};
