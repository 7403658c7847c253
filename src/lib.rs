pub mod args;
pub mod cli;
pub mod config;
pub mod matching;
pub mod model;
pub mod qif;
pub mod terminal;
