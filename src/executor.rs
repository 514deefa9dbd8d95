//! Child-process execution.
//!
//! Spawns the target script under its shebang-declared interpreter with the
//! bridged environment overlay, standard streams inherited from the parent,
//! and blocks until the child terminates. The child's exit code becomes the
//! runner's own; interrupts reach the child through the shared foreground
//! process group and are not intercepted here.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::RunError;

/// Interpreter used when the script has no shebang.
const FALLBACK_INTERPRETER: &str = "sh";

/// Run the script with the given user arguments and environment overlay.
///
/// `source` is the script's already-read text, used only for shebang
/// detection. The overlay is merged over the inherited environment; on key
/// collision the overlay wins.
///
/// # Errors
///
/// Returns [`RunError::Spawn`] if the interpreter cannot be resolved or the
/// child cannot be created. Failures inside the child are not errors; they
/// surface as the returned exit code.
pub fn execute(
    script: &Path,
    source: &str,
    args: &[String],
    overlay: &[(String, String)],
) -> Result<i32, RunError> {
    let command_line = parse_shebang(source)
        .unwrap_or_else(|| vec![FALLBACK_INTERPRETER.to_string()]);
    let program = resolve_program(&command_line[0])?;

    let status = Command::new(&program)
        .args(&command_line[1..])
        .arg(script)
        .args(args)
        .envs(overlay.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| RunError::Spawn {
            program: program.display().to_string(),
            message: e.to_string(),
        })?;

    Ok(exit_code(status))
}

/// Parse the interpreter command line from a script's shebang.
///
/// `#!/usr/bin/env python3 -u` yields `["python3", "-u"]`; `#!/bin/sh -e`
/// yields `["/bin/sh", "-e"]`. Returns `None` for scripts without a usable
/// shebang.
fn parse_shebang(source: &str) -> Option<Vec<String>> {
    let rest = source.lines().next()?.strip_prefix("#!")?;
    let mut parts: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    // `/usr/bin/env prog` means: resolve prog on PATH, as the kernel would.
    if Path::new(parts.first()?).file_name().is_some_and(|n| n == "env") {
        parts.remove(0);
    }
    if parts.is_empty() { None } else { Some(parts) }
}

/// Resolve a bare interpreter name on `PATH`; path-qualified interpreters
/// are taken as-is and left for the spawn itself to report.
fn resolve_program(name: &str) -> Result<PathBuf, RunError> {
    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return Ok(candidate.to_path_buf());
    }
    which::which(name).map_err(|e| RunError::Spawn {
        program: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // A child killed by signal N reports as 128+N, shell-style.
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_shebang_plain_interpreter() {
        assert_eq!(
            parse_shebang("#!/bin/sh -e\necho hi\n"),
            Some(vec!["/bin/sh".to_string(), "-e".to_string()])
        );
    }

    #[test]
    fn test_parse_shebang_env_form() {
        assert_eq!(
            parse_shebang("#!/usr/bin/env python3 -u\nprint()\n"),
            Some(vec!["python3".to_string(), "-u".to_string()])
        );
    }

    #[test]
    fn test_parse_shebang_missing_or_bare_env() {
        assert_eq!(parse_shebang("echo hi\n"), None);
        assert_eq!(parse_shebang("#!/usr/bin/env\n"), None);
        assert_eq!(parse_shebang(""), None);
    }

    #[test]
    fn test_resolve_program_keeps_qualified_paths() {
        let resolved = resolve_program("/bin/sh").unwrap();
        assert_eq!(resolved, PathBuf::from("/bin/sh"));
    }

    #[test]
    fn test_resolve_program_fails_for_missing_interpreter() {
        let err = resolve_program("definitely-not-an-interpreter-7fk2").unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_maps_signals_to_128_plus_n() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatusExt::from_raw(7 << 8)), 7);
        assert_eq!(exit_code(ExitStatusExt::from_raw(9)), 137);
    }

    fn write_script(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("script");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_propagates_child_exit_code() {
        let (_dir, path) = write_script("exit 3\n");
        let source = std::fs::read_to_string(&path).unwrap();
        let code = execute(&path, &source, &[], &[]).unwrap();
        assert_eq!(code, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_applies_env_overlay() {
        let (_dir, path) = write_script("#!/bin/sh\n[ \"$usage_file\" = hello ]\n");
        let source = std::fs::read_to_string(&path).unwrap();
        let overlay = vec![("usage_file".to_string(), "hello".to_string())];
        assert_eq!(execute(&path, &source, &[], &overlay).unwrap(), 0);

        let missing = execute(&path, &source, &[], &[]).unwrap();
        assert_ne!(missing, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_passes_user_args_through() {
        let (_dir, path) = write_script("#!/bin/sh\n[ \"$1\" = --flag ] && [ \"$2\" = value ]\n");
        let source = std::fs::read_to_string(&path).unwrap();
        let args = vec!["--flag".to_string(), "value".to_string()];
        assert_eq!(execute(&path, &source, &args, &[]).unwrap(), 0);
    }

    #[test]
    fn test_execute_fails_with_spawn_error_for_missing_interpreter() {
        let (_dir, path) = write_script("#!/usr/bin/env no-such-interp-7fk2\n");
        let source = std::fs::read_to_string(&path).unwrap();
        let err = execute(&path, &source, &[], &[]).unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }
}
