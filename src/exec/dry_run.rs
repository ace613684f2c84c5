// src/exec/dry_run.rs

//! `--dry-run` output: what a plan would do, without doing it.

use std::fmt::Write;

use crate::dag::Plan;

/// Render `plan` the way it would run.
///
/// Every command is shown, including `@` lines; `remove` entries and
/// placeholder messages are shown as comments.
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# plan for {}: {}", plan.requested().join(" "), plan.names().join(" -> "));

    for step in plan.steps() {
        let _ = writeln!(out, "# [{}]", step.name);

        if step.missing {
            let _ = writeln!(out, "#   not defined; nothing to do");
            continue;
        }

        if let Some(message) = &step.body.placeholder {
            let _ = writeln!(out, "#   placeholder: {message}");
        }

        for entry in step.body.remove.iter() {
            let _ = writeln!(out, "#   remove {entry}");
        }

        for line in step.body.commands.iter() {
            let marker = if line.ignore_errors { "-" } else { "" };
            let _ = writeln!(out, "{marker}{line}");
        }
    }

    out
}
