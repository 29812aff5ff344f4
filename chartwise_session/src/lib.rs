// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query sessions for Chartwise.
//!
//! A [`Session`] ties the pure pipeline crates together:
//! - a tabular file is loaded ([`load_path`]) and becomes the session's raw dataset,
//! - each question goes to an [`IntentGenerator`] along with a preview of the data,
//! - the returned JSON is validated into a
//!   [`ChartIntent`](chartwise_charts::ChartIntent), whose transform produces the view
//!   dataset, and
//! - [`Session::chart`] and [`Session::insights`] shape that view for rendering.
//!
//! Every failure is recovered inside the session: the error is returned to the caller, an
//! assistant message explains it, and the previous chart stays on screen.
//!
//! ```
//! use chartwise_core::Dataset;
//! use chartwise_session::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! let data = Dataset::from_text(
//!     &["Category", "Sales"],
//!     &[&["Books", "10"], &["Books", "20"], &["Toys", "5"]],
//! )
//! .unwrap();
//! session.load_dataset("sales.csv", data);
//! assert_eq!(session.insights()[0].sum, 35.0);
//! ```

mod config;
mod error;
mod load;
mod message;
mod provider;
mod session;

pub use config::SessionConfig;
pub use error::{LoadError, ProviderError, QueryError};
#[cfg(feature = "excel")]
pub use load::load_spreadsheet;
pub use load::{Format, load_delimited, load_json, load_path};
pub use message::{Message, Role};
pub use provider::{IntentGenerator, build_prompt, parse_intent_text};
pub use session::{Completion, PendingQuery, QueryResult, QueryToken, Session, Submission};
