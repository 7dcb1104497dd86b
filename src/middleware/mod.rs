mod auth;

pub use auth::Gate;
