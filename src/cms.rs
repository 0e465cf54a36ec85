//! Page content, editing, resolution and admin sessions.
//!
//! ```rust,no_run
//! use fotobudka::cms::prelude::*;
//! ```

#[cfg(feature = "cms")]
pub use fotobudka_cms::*;
