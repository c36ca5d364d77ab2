//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own conversation logic and background upkeep so route
//! handlers can stay focused on protocol translation.

pub mod chat;
pub mod expiry;
