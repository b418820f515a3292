//! HTTP request handlers

pub mod health;
pub mod odds;
pub mod robots;
pub mod score;
