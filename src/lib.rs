//! End-to-end-encrypted private note sharing.
//!
//! Notes are sealed on the client ([`crypto`]) and shared as a link whose
//! URL fragment carries the secret ([`link`]); the server only ever stores
//! an opaque transport string with an expiry ([`store`], [`handlers`]).

#[macro_use]
extern crate diesel;

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod errors;
pub mod handlers;
pub mod link;
pub mod models;
pub mod schema;
pub mod store;
pub mod utils;
