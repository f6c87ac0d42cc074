#![allow(dead_code)]

pub mod config;
pub mod mock_groq;
pub mod mock_identity;
pub mod mock_speech;
pub mod server;
