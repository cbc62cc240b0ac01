//! Blogsmith - AI blog generation
//!
//! Turns lists of titles into blog posts with an OpenAI model, stores them
//! in SQLite, and serves them over HTTP or the command line.

pub mod config;
pub mod generate;
pub mod storage;
pub mod text;
pub mod web;
pub mod workflow;
