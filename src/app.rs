//! Application session: the playlist tracker, the playback coordinator and
//! the live preferences, driven by typed UI events and backend
//! notifications.

mod events;
mod session;

pub use events::UiEvent;
pub use session::AppSession;
