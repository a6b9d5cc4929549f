use crate::cli::commands::{CommandError, CommandResult};
use crate::cli::formatters::format_fire_time;
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::core::errors::SubtrackError;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "reminders",
            "Show queued payment reminders, soonest first",
            "reminders",
            cmd_reminders,
        ),
        CommandEntry::new(
            "resync",
            "Cancel and re-register every payment reminder",
            "resync",
            cmd_resync,
        ),
        CommandEntry::new(
            "notifications",
            "Show or change whether reminders are delivered",
            "notifications [on|off]",
            cmd_notifications,
        ),
    ]
}

fn cmd_reminders(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let upcoming = context
        .queue
        .upcoming(context.clock.now())
        .map_err(SubtrackError::from)?;

    if !context.config.notifications_enabled {
        io::print_warning("Notifications are off; the queue below is not being refreshed.");
    }
    if upcoming.is_empty() {
        io::print_info("No reminders scheduled.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = upcoming
        .iter()
        .map(|(at, reminder)| {
            vec![
                format_fire_time(*at),
                reminder.title.clone(),
                reminder.body.clone(),
                reminder.rule.label(),
            ]
        })
        .collect();
    output_section("Reminders");
    println!(
        "{}",
        render_table(&["Next fire", "Title", "Body", "Schedule"], &rows)
    );
    Ok(())
}

fn cmd_resync(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = context.manager.sync_reminders()?;
    context.report_pass(&outcome);
    Ok(())
}

fn cmd_notifications(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let state = if context.config.notifications_enabled {
                "on"
            } else {
                "off"
            };
            io::print_info(format!("Notifications: {state}"));
            Ok(())
        }
        [value] => match value.to_ascii_lowercase().as_str() {
            "on" => {
                context.set_notifications(true)?;
                io::print_success("Notifications enabled.");
                Ok(())
            }
            "off" => {
                context.set_notifications(false)?;
                io::print_success("Notifications disabled. Queued reminders were kept.");
                Ok(())
            }
            other => Err(CommandError::InvalidArguments(format!(
                "expected `on` or `off`, got `{other}`"
            ))),
        },
        _ => Err(CommandError::InvalidArguments(
            "usage: notifications [on|off]".to_string(),
        )),
    }
}
