//! Money Wisdom: the projection and scoring engine behind the
//! personal-finance choices game.
//!
//! Layering (leaf to root):
//!   config / catalog  ->  finance  ->  impact  ->  session / scoring
//!   cursor and achievement sit beside the session.
//!   engine ties them together for a single player session.

pub mod achievement;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod event;
pub mod finance;
pub mod impact;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod types;
