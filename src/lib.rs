//! albumsplit
//!
//! Splits one continuous album recording into per-track files and embeds
//! title/album/artist/track-number/cover tags into each of them.
//!
//! All of the real work lives in [`core`]; the `albumsplit` binary is a thin
//! command-line shell around it.

pub mod core;
