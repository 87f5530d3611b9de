//! # Transport
//!
//! Everything that talks to the chat service lives here. The rest of the
//! crate only sees the [`ChatBackend`] trait and the [`StreamEvent`]s it
//! produces.
//!
//! ```text
//!   core::bootstrap ──create_session()──┐
//!                                        ▼
//!                                 ChatBackend ──► HttpBackend (reqwest)
//!                                        ▲     └► MockBackend (offline)
//!   core::turn ─────stream_reply()──────┘
//!                        │
//!                        ▼
//!           mpsc<StreamEvent> (arrival order)
//! ```

pub mod backend;
pub mod decoder;
pub mod http;
pub mod mock;
pub mod types;

pub use backend::{ChatBackend, ChatRequest, SessionError, TransportError};
pub use decoder::RecordDecoder;
pub use http::HttpBackend;
pub use mock::MockBackend;
pub use types::{StreamEvent, StreamRecord};
