//! Print framework

use crate::os::{Fd, STDERR, STDOUT};
use crate::types::pid_t;
use core::ffi::CStr;

pub fn print<T: Print>(s: T) {
    s.print(STDOUT);
}

pub fn println<T: Print>(s: T) {
    s.print(STDOUT);
    b"\n".print(STDOUT);
}

pub fn eprint<T: Print>(s: T) {
    s.print(STDERR);
}

pub fn eprintln<T: Print>(s: T) {
    s.print(STDERR);
    b"\n".print(STDERR);
}

pub trait Print {
    fn print(&self, fd: Fd);
    fn print_len(&self) -> usize;

    fn print_padding(&self, width: usize) {
        let len = self.print_len();
        if width > len {
            let mut remaining = width - len;
            while remaining >= 5 {
                b"     ".print(STDOUT);
                remaining -= 5;
            }
            while remaining > 0 {
                b" ".print(STDOUT);
                remaining -= 1;
            }
        }
    }
}

impl Print for &[u8] {
    fn print(&self, fd: Fd) {
        let _ = fd.write(self);
    }

    fn print_len(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> Print for [u8; N] {
    fn print(&self, fd: Fd) {
        let _ = fd.write(self);
    }

    fn print_len(&self) -> usize {
        N
    }
}

impl Print for &str {
    fn print(&self, fd: Fd) {
        let _ = fd.write(self.as_bytes());
    }

    fn print_len(&self) -> usize {
        self.len()
    }
}

impl Print for &CStr {
    fn print(&self, fd: Fd) {
        let _ = fd.write(self.to_bytes());
    }

    fn print_len(&self) -> usize {
        self.to_bytes().len()
    }
}

impl Print for u32 {
    fn print(&self, fd: Fd) {
        let _ = fd.write(itoa::Buffer::new().format(*self).as_bytes());
    }

    fn print_len(&self) -> usize {
        itoa::Buffer::new().format(*self).len()
    }
}

impl Print for u64 {
    fn print(&self, fd: Fd) {
        let _ = fd.write(itoa::Buffer::new().format(*self).as_bytes());
    }

    fn print_len(&self) -> usize {
        itoa::Buffer::new().format(*self).len()
    }
}

impl Print for pid_t {
    fn print(&self, fd: Fd) {
        let _ = fd.write(itoa::Buffer::new().format(*self).as_bytes());
    }

    fn print_len(&self) -> usize {
        itoa::Buffer::new().format(*self).len()
    }
}

impl Print for usize {
    fn print(&self, fd: Fd) {
        let _ = fd.write(itoa::Buffer::new().format(*self).as_bytes());
    }

    fn print_len(&self) -> usize {
        itoa::Buffer::new().format(*self).len()
    }
}
