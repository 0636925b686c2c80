//! Styled status lines for the terminal.
//!
//! Status and info lines go to stdout, warnings and errors to stderr.
//! Secret values never pass through here; `get` and `access` print them
//! plain so they stay pipeable.

use console::style;

/// Operation completed.
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Fatal failure, shown before the process exits non-zero.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Something the user should know about, on stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Dimmed follow-up hint, usually the next command to run.
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print secret names, one per line.
pub fn print_names(names: &[String]) {
    if names.is_empty() {
        info("No secrets in this store yet.");
        tip("Run `keepsafe set <KEY>` to add your first secret.");
        return;
    }

    info(&format!("{} secret(s)", names.len()));
    for name in names {
        println!("  {name}");
    }
}
