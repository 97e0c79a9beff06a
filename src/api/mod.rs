//! API handlers for the visitor intake REST endpoints

pub mod health;
pub mod openapi;
pub mod visits;
