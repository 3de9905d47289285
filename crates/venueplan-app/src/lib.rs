//! VenuePlan Application
//!
//! Drives the planner shell from scripted sessions and exports the result.

pub mod cli;
pub mod session;

pub use cli::{run, Cli, GridArg};
pub use session::{
    load_session, parse_session, run_session, SessionAction, SessionError, SessionReport,
};
