//! Site settings read from the environment.

#[cfg(feature = "conf")]
pub use fotobudka_conf::*;
