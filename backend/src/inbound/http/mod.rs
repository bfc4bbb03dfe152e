//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON bodies, path segments and the cookie session into
//! driving-port calls. Routes are registered by the server in the order
//! documented on each module, so literal segments such as `/users/verify`
//! win over their parameterised siblings.

pub mod associations;
pub mod error;
pub mod events;
pub mod health;
pub mod minutes;
pub mod roles;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
