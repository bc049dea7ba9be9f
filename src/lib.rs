//! Client core for OnTa, a note organizer backed by a REST service.
//!
//! A signed-in user owns categories; each category holds articles. The
//! collections here keep in-memory copies of both, fed by [`api::RemoteApi`]
//! and keyed by the identity kept in a [`session::Session`].
pub mod api;
pub mod articles;
pub mod auth;
pub mod catalog;
pub mod categories;
pub mod config;
pub mod error;
pub mod ids;
pub mod layout;
pub mod model;
pub mod navigation;
mod profile;
pub mod search;
pub mod session;
pub mod util;

pub use error::{Error, Result};
