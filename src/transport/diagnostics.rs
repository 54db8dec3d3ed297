//! Failure diagnosis with actionable suggestions.
//!
//! Exhausted retries surface as a short typed result; the detail an operator
//! needs next, what to try by hand, goes through the log as an advisory hint
//! built here. Hints classify the last failure and suggest concrete steps.

use crate::exec::RemoteTarget;
use crate::transport::CommandOutput;

/// Builds a hint for failures where the target could not be reached at all.
pub fn diagnose_transport_failure(
    error_text: &str,
    target: &RemoteTarget,
    transport_desc: &str,
) -> String {
    let lower = error_text.to_lowercase();
    let mut suggestions = Vec::new();

    if lower.contains("connection refused")
        || lower.contains("timed out")
        || lower.contains("timeout")
        || lower.contains("no route to host")
    {
        suggestions.push(format!(
            "• Verify the target '{}' is running and reachable",
            target.name
        ));
        suggestions.push(
            "• A cold tunnel can take a while to establish; raise --attempts or --delay-secs"
                .to_string(),
        );
        suggestions.push("• Check firewall rules between this host and the target".to_string());
    }

    if lower.contains("resolve") || lower.contains("no addresses") {
        suggestions
            .push("• The hostname does not resolve; DNS may still be propagating".to_string());
        suggestions.push("• Double-check the configured host for typos".to_string());
    }

    if lower.contains("authentication")
        || lower.contains("permission denied")
        || lower.contains("publickey")
    {
        suggestions
            .push("• Verify the configured SSH key path and its permissions (chmod 600)".to_string());
        suggestions.push("• Verify the public key is authorized on the target".to_string());
        suggestions.push("• Check that your SSH agent has the key loaded (ssh-add -l)".to_string());
    }

    if lower.contains("host key") || lower.contains("known_hosts") {
        suggestions.push(
            "• The target's host key is not trusted yet; connect once manually or add it with ssh-keyscan"
                .to_string(),
        );
    }

    if lower.contains("failed to spawn") {
        suggestions
            .push("• The tunnel command executable is not installed or not in PATH".to_string());
        suggestions.push("• Run the tunnel command by hand to see its own error".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(format!("• Verify the target '{}' is reachable", target.name));
        suggestions.push("• Check connectivity and credentials by hand".to_string());
    }

    suggestions.push(format!(
        "• Test the channel directly: probex check {}",
        target.name
    ));

    format!(
        "Could not reach {} via {}: {}\n\nTroubleshooting suggestions:\n{}",
        target.qualified_name(),
        transport_desc,
        error_text,
        suggestions.join("\n")
    )
}

/// Builds a hint for commands that ran but kept failing the success predicate.
pub fn diagnose_command_failure(
    output: &CommandOutput,
    command: &str,
    target: &RemoteTarget,
) -> String {
    let combined = format!(
        "{} {}",
        output.stderr.to_lowercase(),
        output.stdout.to_lowercase()
    );
    let name = command_name(command);
    let mut suggestions = Vec::new();

    if output.exit_code == 127
        || combined.contains("command not found")
        || combined.contains("no such file")
    {
        suggestions.push(format!(
            "• '{}' is not installed or not in PATH on {}",
            name, target.name
        ));
        suggestions.push(
            "• Non-interactive sessions often have a reduced PATH; try an absolute path"
                .to_string(),
        );
    } else if output.exit_code == 126 || combined.contains("permission denied") {
        suggestions.push(format!(
            "• The remote user lacks permission to execute '{}'",
            name
        ));
        suggestions.push("• Check file modes and ownership on the target".to_string());
    } else if combined.contains("host key verification failed") {
        suggestions.push("• The tunnel's ssh does not trust the target's host key yet".to_string());
        suggestions.push("• Connect once manually or add the key with ssh-keyscan".to_string());
    } else {
        suggestions.push(format!(
            "• The command kept exiting {}; review its stderr below",
            output.exit_code
        ));
        suggestions.push(
            "• If that exit code is expected at this stage, pass it via --expect-exit-code"
                .to_string(),
        );
    }

    suggestions.push(format!(
        "• Run it by hand: probex run {} '{}'",
        target.name, command
    ));

    let mut message = format!(
        "Command kept failing on {}\nCommand: {}\nLast exit code: {}\n",
        target.qualified_name(),
        command,
        output.exit_code
    );
    if !output.stderr.trim().is_empty() {
        message.push_str("\nStderr:\n");
        message.push_str(&indent_text(output.stderr.trim(), 2));
        message.push('\n');
    }
    message.push_str("\nTroubleshooting suggestions:\n");
    message.push_str(&suggestions.join("\n"));
    message
}

/// First token of the command text.
fn command_name(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or(command)
}

fn indent_text(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}
