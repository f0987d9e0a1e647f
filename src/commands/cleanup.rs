//! The `cleanup` subcommand: run a command with registered teardown.

use crate::cleanup::{read_cleanup_file, run_with_cleanup};
use crate::cli::CleanupArgs;
use crate::error::Result;

pub fn cmd_cleanup(args: CleanupArgs) -> Result<i32> {
    // Registration order: --cleanup flags first, then the file's lines.
    // Teardown runs in reverse, so file entries unwind before flag entries.
    let mut actions = args.cleanup;
    if let Some(path) = &args.cleanup_file {
        actions.extend(read_cleanup_file(path)?);
    }

    run_with_cleanup(actions, &args.command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;
    use crate::exit_codes;
    use std::fs;
    use tempfile::TempDir;

    fn args(cleanup: &[&str], command: &[&str]) -> CleanupArgs {
        CleanupArgs {
            cleanup: cleanup.iter().map(|s| s.to_string()).collect(),
            cleanup_file: None,
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn passes_the_command_code_through_when_teardown_succeeds() {
        let a = args(&["true"], &["sh", "-c", "exit 5"]);
        assert_eq!(cmd_cleanup(a).unwrap(), 5);
    }

    #[test]
    fn reports_cleanup_failure_only_when_the_command_succeeded() {
        let a = args(&["false"], &["true"]);
        assert_eq!(cmd_cleanup(a).unwrap(), exit_codes::CLEANUP_FAILURE);
    }

    #[test]
    fn file_actions_register_after_flag_actions() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("order.log");
        let list = temp.path().join("cleanup.list");
        fs::write(
            &list,
            format!("sh -c \"echo from-file >> {}\"\n", log.display()),
        )
        .unwrap();

        let mut a = args(
            &[&format!("sh -c \"echo from-flag >> {}\"", log.display())],
            &["true"],
        );
        a.cleanup_file = Some(list);

        assert_eq!(cmd_cleanup(a).unwrap(), 0);
        let content = fs::read_to_string(&log).unwrap();
        // File entries unwind first.
        assert_eq!(content, "from-file\nfrom-flag\n");
    }

    #[test]
    fn missing_cleanup_file_is_a_usage_error() {
        let mut a = args(&[], &["true"]);
        a.cleanup_file = Some("/nonexistent/cleanup.list".into());
        assert!(matches!(cmd_cleanup(a), Err(GuardError::Usage(_))));
    }
}
