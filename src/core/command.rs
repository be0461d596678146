// sls-logs - core/command.rs
//
// Construction of the external log command for one function.
// Pure string building; spawning lives in app::stream.

use crate::core::model::StreamOptions;

/// How to invoke the framework's native log command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCommandConfig {
    /// Shell the command line is handed to.
    pub shell: String,
    /// Command prefix, e.g. `yarn sls logs`.
    pub base: String,
    /// Flag added in tail mode.
    pub tail_flag: String,
    /// Flag preceding the function name.
    pub function_flag: String,
}

impl Default for LogCommandConfig {
    fn default() -> Self {
        use crate::util::constants;
        Self {
            shell: constants::DEFAULT_SHELL.to_string(),
            base: constants::DEFAULT_LOG_COMMAND.to_string(),
            tail_flag: constants::DEFAULT_TAIL_FLAG.to_string(),
            function_flag: constants::DEFAULT_FUNCTION_FLAG.to_string(),
        }
    }
}

/// A program plus its argument vector, ready for `std::process::Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// The command line as the shell receives it (for display and logging).
    pub command_line: String,
}

impl LogCommandConfig {
    /// Command line for `name`: `<base> [<tail>] <function_flag> <name> [<extra>]`.
    ///
    /// The name and extra arguments are inserted verbatim; the shell does any
    /// word splitting.
    pub fn command_line(&self, name: &str, options: &StreamOptions) -> String {
        let mut parts: Vec<&str> = vec![self.base.as_str()];
        if options.tail_mode && !self.tail_flag.is_empty() {
            parts.push(&self.tail_flag);
        }
        if !self.function_flag.is_empty() {
            parts.push(&self.function_flag);
        }
        parts.push(name);
        if let Some(extra) = options.extra_args.as_deref().filter(|e| !e.is_empty()) {
            parts.push(extra);
        }
        parts.join(" ")
    }

    /// Shell invocation that runs the command line for `name`.
    pub fn invocation(&self, name: &str, options: &StreamOptions) -> ShellInvocation {
        let command_line = self.command_line(name, options);
        ShellInvocation {
            program: self.shell.clone(),
            args: vec![shell_flag(&self.shell).to_string(), command_line.clone()],
            command_line,
        }
    }
}

/// `cmd` takes `/C`; every POSIX-style shell takes `-c`.
fn shell_flag(shell: &str) -> &'static str {
    // Split on both separators so Windows paths are recognised on any host.
    let file = shell.rsplit(['/', '\\']).next().unwrap_or(shell);
    let lower = file.to_ascii_lowercase();
    let stem = lower.strip_suffix(".exe").unwrap_or(&lower);
    if stem == "cmd" {
        "/C"
    } else {
        "-c"
    }
}
