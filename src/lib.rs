//! topic-annotator - interactive curation of topic-annotation datasets.
//!
//! Annotators confirm which scored topic candidates really describe a text,
//! then pick good hard negatives for the cleaned texts. Both sessions run in
//! the terminal and persist after every text.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod session;
pub mod terminal;
