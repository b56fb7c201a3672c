//! Cryptographic Building Blocks
//!
//! - **constants**: curve orders, bias threshold, purpose index
//! - **secret**: zeroizing containers for secret material
//! - **path**: derivation paths and their validation
//! - **backend**: the primitive interface the core is written against
//! - **helpers**: fixed-width integer compare/reduce, DER encoding
//! - **mnemonic**, **hd**, **stark**, **software**: pure-Rust backend

pub mod backend;
pub mod constants;
pub mod hd;
pub mod helpers;
pub mod mnemonic;
pub mod path;
pub mod secret;
pub mod software;
pub mod stark;
