//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components created fresh each frame with everything they need:
//! - `TitleBar`: Top status bar
//! - `MessageView`: One conversation entry
//! - `LandingPage`: Header shown while the conversation is empty
//! - `LoadingView`, `SessionErrorView`: Screens shown while there is no session
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Single-line message editor
//! - `MessageList`: Scrollable conversation view with layout caching
//!
//! Components receive external data as props, never by reaching into `App`.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── landing.rs       (Empty-conversation header)
//! ├── status_view.rs   (Loading spinner, session error)
//! └── input_box/       (Text input)
//! ```

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod status_view;
pub mod title_bar;

pub use input_box::{INPUT_HEIGHT, InputBox, InputEvent};
pub use landing::LandingPage;
pub use message::MessageView;
pub use message_list::{MessageList, MessageListState};
pub use status_view::{LoadingView, SessionErrorView};
pub use title_bar::TitleBar;
