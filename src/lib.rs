#![cfg_attr(not(test), allow(unused_attributes))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

// Implementation of features Rust core expects from libc.
//
// This conflicts with anything that uses std, including unit tests. To avoid this conflict, the
// `ltx` binary `mod`s this directly rather than `mod`ing it here.
//
// mod libc_shim;

pub mod buffer;
pub mod child;
pub mod codec;
pub mod constants;
pub mod err;
pub mod message;
pub mod os;
pub mod syscall;
pub mod transfer;
pub mod types;
