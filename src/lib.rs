//! gen-bootstrap: Bootstrap Tooling for Google Cloud Agents
//!
//! A command-line tool and web entry point for projects built around a
//! conversational agent hosted on Google Cloud. It scaffolds the workspace,
//! wraps the `gcloud`/`poetry`/`pytest` workflows, manages secrets and prompts,
//! discovers agent tools, and serves the agent over HTTP.

pub mod agent;
pub mod config;
pub mod console;
pub mod error;
pub mod interactive;
pub mod lifecycle;
pub mod logging;
pub mod process;
pub mod prompts;
pub mod rest;
pub mod secrets;
pub mod testing;
pub mod tokens;
pub mod tooling;
pub mod tools;
pub mod web;
