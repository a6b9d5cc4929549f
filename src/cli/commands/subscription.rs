use crate::cli::commands::{expect_args, CommandError, CommandResult};
use crate::cli::formatters::{format_payment_date, format_price, parse_price};
use crate::cli::io;
use crate::cli::output::{render_table, section as output_section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::{CliMode, ShellContext};
use crate::core::services::{SortOrder, SummaryService};
use crate::domain::{Subscription, SubscriptionId};

const ADD_USAGE: &str = "add <name> <price> <billing_day> <payment_method>";
const DELETE_USAGE: &str = "delete <id> | delete <name> <price> <billing_day> <payment_method>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List subscriptions with their next payment date",
            "list [name|date-asc|date-desc|price-asc|price-desc|payment-method]",
            cmd_list,
        ),
        CommandEntry::new("add", "Add a subscription", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "delete",
            "Delete a subscription by id, or by its fields when it has no id",
            DELETE_USAGE,
            cmd_delete,
        ),
        CommandEntry::new(
            "summary",
            "Show monthly total and the amount still due this month",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let order = match args {
        [] => SortOrder::default(),
        [raw] => raw.parse::<SortOrder>().map_err(CommandError::InvalidArguments)?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: list [sort]".to_string(),
            ))
        }
    };

    let subscriptions = context.manager.subscriptions()?;
    if subscriptions.is_empty() {
        io::print_info("No subscriptions yet. Use `add` to create one.");
        return Ok(());
    }

    let locale = context.locale();
    let currency = context.config.currency.clone();
    let rows: Vec<Vec<String>> = SummaryService::overview(&subscriptions, context.today(), order)
        .into_iter()
        .map(|row| {
            let sub = row.subscription;
            vec![
                sub.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                sub.name.clone(),
                format_price(sub.price, &currency),
                sub.billing_day.to_string(),
                sub.payment_method.clone(),
                format_payment_date(row.next_payment, locale),
            ]
        })
        .collect();

    output_section("Subscriptions");
    println!(
        "{}",
        render_table(
            &["ID", "Name", "Price", "Billing day", "Method", "Next payment"],
            &rows
        )
    );
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 4, ADD_USAGE)?;
    let subscription = subscription_from_args(args)?;

    let report = context.manager.add(subscription)?;
    let id = report
        .subscription
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    io::print_success(format!(
        "Added `{}` ({}) billed on day {}. id: {}",
        report.subscription.name,
        format_price(report.subscription.price, &context.config.currency),
        report.subscription.billing_day,
        id
    ));
    context.report_pass(&report.reminders);
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let report = match args.len() {
        1 => {
            let id = SubscriptionId::from(args[0].trim());
            let target = context
                .manager
                .subscriptions()?
                .into_iter()
                .find(|sub| sub.id.as_ref() == Some(&id));
            if !confirm_delete(context, target.as_ref())? {
                return Ok(());
            }
            context.manager.delete(&id)?
        }
        4 => {
            let target = subscription_from_args(args)?;
            if !confirm_delete(context, Some(&target))? {
                return Ok(());
            }
            context.manager.delete_matching(&target)?
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {DELETE_USAGE}"
            )))
        }
    };

    io::print_success(format!("Deleted `{}`.", report.subscription.name));
    context.report_pass(&report.reminders);
    Ok(())
}

fn confirm_delete(
    context: &ShellContext,
    target: Option<&Subscription>,
) -> Result<bool, CommandError> {
    let Some(target) = target else {
        return Ok(true);
    };
    if context.mode != CliMode::Interactive {
        return Ok(true);
    }
    let confirmed = context.confirm(&format!("Delete `{}`?", target.name))?;
    if !confirmed {
        io::print_info("Delete cancelled.");
    }
    Ok(confirmed)
}

/// Reads `<name> <price> <billing_day> <payment_method>` into a subscription.
fn subscription_from_args(args: &[&str]) -> Result<Subscription, CommandError> {
    let price = parse_price(args[1]).ok_or_else(|| {
        CommandError::InvalidArguments(format!("price `{}` is not a whole number", args[1]))
    })?;
    let billing_day: u32 = args[2].trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("billing day `{}` is not a number", args[2]))
    })?;
    Ok(Subscription::new(args[0], price, billing_day, args[3]))
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let subscriptions = context.manager.subscriptions()?;
    let summary = SummaryService::summarize(&subscriptions, context.today());
    let currency = &context.config.currency;

    output_section("Summary");
    io::print_info(format!(
        "  Monthly total       : {}",
        format_price(summary.monthly_total, currency)
    ));
    io::print_info(format!(
        "  Remaining this month: {}",
        format_price(summary.remaining_this_month, currency)
    ));
    io::print_info(format!("  Subscriptions       : {}", summary.count));
    Ok(())
}
