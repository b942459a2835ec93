//! Headless workspace core: tree state, inline editing, drag and drop,
//! navigation and the orchestrator that drives the file adapter.

pub mod autosave;
pub mod command;
pub mod commands;
pub mod drag;
pub mod editing;
pub mod effect;
pub mod error;
pub mod navigation;
pub mod notifications;
pub mod services;
pub mod state;
pub mod theme;
pub mod workspace;

pub use autosave::{Autosave, AUTOSAVE_DELAY};
pub use command::{filter as filter_commands, Command, PaletteItem};
pub use commands::CommandHost;
pub use drag::{validate_drop, DragState, DropRejection, DropValidation, MoveRequest};
pub use editing::{parse_entry_name, validate_name, EditingState, EntryName, NameError};
pub use effect::Effect;
pub use error::{WorkspaceError, WorkspaceResult};
pub use navigation::{navigate, Direction, Selection, SidebarKey};
pub use notifications::{Notification, NotificationKind, Notifications, NOTIFICATION_TTL};
pub use state::WorkspaceState;
pub use theme::{Theme, ThemePreference, ThemeState};
pub use workspace::Workspace;
