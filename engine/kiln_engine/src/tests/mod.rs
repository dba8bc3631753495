//! Test modules relocated from implementation files.
//!
//! Inline test modules exceeding ~200 lines live here instead of in the
//! implementation files; small unit suites stay inline.
