mod token_store;
mod authenticator;
mod queue;
mod connector;
mod local_queue;
mod lifecycle;

pub use token_store::{SessionStore, session_sweeper};
pub use authenticator::{Authenticator, StaticAuthenticator, RedisAuthenticator};
pub use queue::WorkQueue;
pub use connector::{ResourceConnector, TcpConnector};
pub use local_queue::LocalQueue;
pub use lifecycle::Lifecycle;
