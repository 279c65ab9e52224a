// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-file portfolio store.
//!
//! Loads the portfolio document, validates it, and renders the prompt-sized
//! summaries the handlers embed in their system prompts and context.

pub mod models;
pub mod store;
pub mod validation;

pub use models::PortfolioData;
pub use store::{JsonPortfolioStore, load_portfolio, parse_portfolio};
