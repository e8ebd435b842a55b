//! REST-Handler, gruppiert nach Principal-Art

pub mod admin;
pub mod auth;
