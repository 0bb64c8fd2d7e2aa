//! Command line tooling for producing mint signatures.

pub mod cli;
