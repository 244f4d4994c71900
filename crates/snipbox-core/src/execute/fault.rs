//! Extracting the innermost fault message from a failed run.

use std::process::ExitStatus;

/// Describe why a program failed, preferring what the program itself said.
///
/// Looks at stderr for the first panic payload, then for the `Error: ...`
/// line printed when `main` returns `Err`, and falls back to the exit
/// status.
pub fn innermost_message(stderr: &str, status: ExitStatus) -> String {
    panic_message(stderr)
        .or_else(|| error_return_message(stderr))
        .unwrap_or_else(|| describe_status(status))
}

/// Payload of the first panic in `stderr`.
///
/// Handles both `panicked at src/main.rs:2:5:\nmsg` and the older
/// `panicked at 'msg', src/main.rs:2:5`.
fn panic_message(stderr: &str) -> Option<String> {
    let mut lines = stderr.lines();

    while let Some(line) = lines.next() {
        if !line.starts_with("thread '") {
            continue;
        }
        let Some((_, rest)) = line.split_once("panicked at ") else {
            continue;
        };

        if let Some(quoted) = rest.strip_prefix('\'') {
            if let Some(end) = quoted.rfind("', ") {
                return Some(quoted[..end].to_string());
            }
        }

        let message: Vec<&str> = lines
            .by_ref()
            .take_while(|l| !l.starts_with("note: ") && !l.starts_with("stack backtrace:"))
            .collect();
        return Some(message.join("\n").trim_end().to_string());
    }

    None
}

fn error_return_message(stderr: &str) -> Option<String> {
    let line = stderr.lines().find(|l| l.starts_with("Error: "))?;
    let debug = &line["Error: ".len()..];

    let unquoted = debug
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(debug);
    Some(unquoted.to_string())
}

fn describe_status(status: ExitStatus) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("program terminated by signal {signal}");
        }
    }

    format!("program exited with {status}")
}
