pub mod app;
pub mod cli;
pub mod columns;
pub mod config;
pub mod detail;
pub mod events;
pub mod feed;
pub mod grid;
pub mod layout;
pub mod model;
pub mod output;
pub mod report;
pub mod session;
pub mod source;

#[cfg(test)]
mod tests;
