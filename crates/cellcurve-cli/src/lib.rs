//! cellcurve CLI library.
//!
//! Presentation helpers shared by the `cellcurve` binary: output format
//! selection and the text/JSON renderers for each subcommand.

pub mod output;
