//! Command handlers. Each one takes a `CommandContext` and turns it into a
//! `CommandOutcome`; the dispatcher decides which handler runs.

pub mod cancel;
pub mod change;
pub mod create;
pub mod queries;
