//! External delivery channels.
//!
//! Email is the only side channel; it is best-effort by contract. The
//! [`EmailSender`](email::EmailSender) trait is the seam the dispatch
//! engine depends on, so tests can substitute a mock transport.

pub mod email;
