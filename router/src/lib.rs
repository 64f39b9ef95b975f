//! A small client-side router: a URL model, route pattern matching, ordered
//! route resolution, and navigation state kept in sync with a history host.
//!
//! ```
//! use signpost_router::{
//!     components::{create_router, Route, Switch},
//!     location::MemoryHistory,
//!     NavigateOptions, RouterOptions,
//! };
//!
//! let history = MemoryHistory::new("/");
//! let router = create_router(RouterOptions::default(), history.clone())?;
//! let routes = Switch::new([
//!     Route::builder().path("/").children("home".to_string()).build()?,
//!     Route::builder()
//!         .path("/users/:id<number>")
//!         .render(|params| format!("user {}", params.get("id").unwrap()))
//!         .build()?,
//! ]);
//!
//! router.navigate("/users/42", NavigateOptions::default())?;
//! let matched = routes.run(&router)?.unwrap();
//! assert_eq!(matched.view(), "user 42");
//! assert_eq!(history.entries(), vec!["/", "/users/42"]);
//! # Ok::<(), signpost_router::RouterError>(())
//! ```
#![forbid(unsafe_code)]

pub mod components;
mod error;
pub mod hooks;
pub mod location;
mod matching;
mod navigate;
mod options;
pub mod params;

pub use error::*;
pub use matching::*;
pub use navigate::*;
pub use options::*;
