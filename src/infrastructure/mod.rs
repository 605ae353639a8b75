pub mod render_session;

pub use render_session::{ChromiumSession, ChromiumSessions, RenderSession, SessionProvider};
