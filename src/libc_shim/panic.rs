use ltx_agent::os::{Print, eprint, eprintln, exit};

/// Panic handler
///
/// This binary strives to ensure the compiler can prove no code here could panic. Some part of
/// Rust (rustc? core?) expects a panic handler regardless, even if it ends up dead code.
#[cfg_attr(not(test), panic_handler)]
fn panic(info: &core::panic::PanicInfo) -> ! {
    #[cfg(debug_assertions)]
    {
        eprint("Panic!");
        if let Some(e) = info.message().as_str() {
            eprint(" ");
            eprint(e);
        }
        eprint("\n");
        if let Some(loc) = info.location() {
            eprint("File: ");
            eprint(loc.file());
            eprint(":");
            eprint(loc.line());
            eprint(":");
            eprint(loc.column());
            eprint("\n");
        }
    }

    eprintln("unexpected panic");
    exit(1);
}
