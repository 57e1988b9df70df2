//! Scannable code generation.
//!
//! # Responsibility
//! - Turn a URL string into a QR symbol rendered as PNG.
//! - Provide a text-safe transport encoding of the image bytes.
//!
//! # Invariants
//! - Output is always `image/png`; base64 output is a pure function of the
//!   PNG bytes.
//! - Input text is encoded byte-for-byte; no escaping is applied.

pub mod qr;
