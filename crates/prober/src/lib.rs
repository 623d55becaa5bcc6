//! Prober - single-hostname takeover check
//!
//! For one hostname: normalise it into a URL, look up its CNAME, fetch the
//! page and match the body against the signature catalog.

mod prober;
mod target;

pub use prober::{build_client, HttpProber};
pub use target::ProbeTarget;
