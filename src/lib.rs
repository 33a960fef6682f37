#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod backend;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod outcome;
pub mod reconcile;
pub mod request;
pub mod snapshot;
