//! Editor engine for the FC canvas: one [`EditorSession`] owns the
//! document, selection, undo history, viewport, and gesture state.

pub mod config;
pub mod history;
pub mod images;
pub mod input;
pub mod interaction;
pub mod notice;
pub mod pending;
pub mod session;
pub mod shortcuts;

pub use config::EditorConfig;
pub use history::{History, Snapshot};
pub use images::ImageDrop;
pub use input::{Modifiers, PointerButton};
pub use interaction::Gesture;
pub use notice::{Notice, NoticeKind};
pub use pending::PendingUpdates;
pub use session::EditorSession;
pub use shortcuts::{NudgeDir, ShortcutAction, ShortcutMap};
