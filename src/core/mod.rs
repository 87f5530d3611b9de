//! # Core Application Logic
//!
//! The chat widget's state machine and the tasks that feed it.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!   ┌──────────────┐   Action    ┌─────────────────────────┐
//!   │  bootstrap   │────────────►│  update(&mut App, ..)   │
//!   │  run_turn    │ (Dispatcher)│                         │
//!   └──────▲───────┘             │  • state   (App)        │
//!          │                     │  • action  (reducer)    │
//!          │   Effect::SpawnTurn │                         │
//!          └─────────────────────│  No I/O. Pure.          │
//!                                └───────────┬─────────────┘
//!                                            ▼
//!                                     ┌────────────┐
//!                                     │    TUI     │
//!                                     │ (ratatui)  │
//!                                     └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all chat state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`dispatch`]: Teardown-aware delivery of actions from background tasks
//! - [`bootstrap`]: One-shot session creation
//! - [`turn`]: Streaming one reply into actions
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod state;
pub mod turn;
