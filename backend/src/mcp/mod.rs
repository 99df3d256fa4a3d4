//! MCP session relay.
//!
//! Sessions are created by a JSON-RPC `initialize` request, after which a
//! client opens one or more Server-Sent-Events streams bound to the session.
//! Any caller can then push named events into those streams.
//!
//! ## Components
//!
//! - [`SessionStore`] - owns sessions and their attached streams
//! - [`McpHandler`] - routes one-shot JSON-RPC requests
//! - [`StreamManager`] - opens streams and detaches them on drop
//! - [`EventDispatcher`] - pushes events to one session or all of them

pub mod dispatch;
pub mod handler;
pub mod session;
pub mod stream;

pub use dispatch::EventDispatcher;
pub use handler::{Handled, McpHandler};
pub use session::{RelayEvent, SessionId, SessionStore, StreamId};
pub use stream::{StreamManager, StreamSubscription};
