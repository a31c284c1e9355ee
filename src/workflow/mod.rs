//! The select → transform → package → deliver workflow

pub mod context;
pub mod delivery;
pub mod workspace;

pub use context::RunContext;
pub use delivery::{DeliverySink, DirectorySink, MemorySink};
pub use workspace::Workspace;
