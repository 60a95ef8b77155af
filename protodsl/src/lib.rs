#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod error;
mod lencache;
pub mod schema;
mod util;
pub mod varint;
pub mod wire;

// Re-exported so code generated by `#[derive(ProtoMessage)]`/`#[derive(ProtoOneof)]`
// in a downstream crate can name `protodsl::alloc::string::String` etc. without
// that crate declaring its own `extern crate alloc`.
#[cfg(feature = "alloc")]
pub use alloc;

#[cfg(feature = "derive")]
pub use protodsl_derive::{ProtoMessage, ProtoOneof};
