//! Describe spans of time as short English phrases such as "about 2 hours ago" or "almost 2 years".

pub mod clock;
pub mod format;
pub mod span;
pub mod timefile;
