//! `crewroster` - Training roster manager for airline pilots
//!
//! This library keeps a roster of pilot records: names, crew position, base
//! and LOFT months, and flying hours. Records are validated field by field,
//! handed out pilot ids from a monotonic counter, viewed in fixed-size pages,
//! and saved to and loaded from roster files.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod record;
pub mod roster;
pub mod storage;
pub mod view;

pub use app::App;
pub use config::Config;
pub use console::{Console, TerminalConsole};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{CrewRecord, Field, FieldError, Month, Position};
pub use roster::{CrewDraft, FieldGroup, Roster, SavedRoster};
pub use storage::RosterStore;
pub use view::{Column, Page, Pages};
