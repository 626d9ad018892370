//! Session and data context for the gdesk dashboard.
//!
//! A [`Session`] is built once at startup around a [`WorkspaceApi`]
//! implementation and owns the sign-in flags, the current user and the UI
//! state. Callers fetch meetings, agenda events and directory users through
//! it on demand.

pub mod api;
pub mod error;
pub mod google;
pub mod session;
pub mod state;

pub use api::{ClientConfig, WorkspaceApi};
pub use error::SessionError;
pub use google::{GoogleEndpoints, GoogleWorkspace};
pub use session::{Session, SessionStatus};
pub use state::{SessionState, ThemeState, UiState};

pub use gdesk_calendar::{CalendarEvent, Meeting};
pub use gdesk_directory::DirectoryUser;
