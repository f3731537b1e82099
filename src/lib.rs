//! Closed sets of named outcomes, dispatched once and handled per name.
//!
//! A producer declares upfront which outcomes an operation may end with and
//! dispatches exactly one of them together with its arguments. The consumer's
//! resolution handler receives the [`Resolution`] and probes it for every
//! outcome it cares about, only the probe matching the dispatched outcome fires:
//!
//! ```
//! use outcomes::{Arguments, Dispatcher};
//!
//! fn post(text: &str, dispatcher: &mut Dispatcher<&'static str, Arguments, String>) -> anyhow::Result<String> {
//!     if text.len() > 280 {
//!         return dispatcher.dispatch("failure", Arguments::encode(("too long", text.len()))?);
//!     }
//!     dispatcher.dispatch("success", Arguments::encode((text,))?)
//! }
//!
//! let mut dispatcher: Dispatcher<&str, Arguments, String> = Dispatcher::with_handler(["success", "failure"], |res| {
//!     let mut reply = String::new();
//!     res.probe(&"success", |text: String| reply = format!("posted {}", text))?;
//!     res.probe(&"failure", |reason: String, len: usize| {
//!         reply = format!("{} ({})", reason, len)
//!     })?;
//!     Ok(reply)
//! })
//! .unwrap();
//!
//! assert_eq!(post("hello", &mut dispatcher).unwrap(), "posted hello");
//! ```
//!
//! Everything runs synchronously on the caller's stack, handlers are called
//! before `dispatch` returns.

pub mod arguments;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod resolution;
pub mod set;

pub use arguments::{Arguments, FromArgument, IntoArguments};
pub use dispatcher::Dispatcher;
pub use error::{ArgumentError, OutcomeError};
pub use handler::{ProbeHandler, ResolveHandler};
pub use resolution::{OutcomeRecord, Resolution};
pub use set::{OutcomeName, OutcomeSet, Outcomes};

/// Derives [`Outcomes`] for fieldless enums.
pub use macros::Outcomes;
