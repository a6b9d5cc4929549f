use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use tracing::{debug, info};

use crate::{
    config::{Config, ConfigManager},
    core::{
        errors::{CliError, SubtrackError},
        utils::{app_data_dir, reminders_file_in},
        Clock, FixedClock, PassOutcome, ReminderScheduler, SubscriptionManager, SystemClock,
    },
    domain::ReminderLocale,
    notification::{JsonReminderQueue, PermissionStatus},
    storage::JsonSubscriptionStore,
};

use super::commands::{self, CommandError, CommandResult, LoopControl};
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

/// Pins "today" to a `YYYY-MM-DD` date for reproducible runs.
pub const TODAY_OVERRIDE_ENV: &str = "SUBTRACK_TODAY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: SubscriptionManager,
    pub queue: Arc<JsonReminderQueue>,
    pub clock: Arc<dyn Clock>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub base_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir(), clock_from_env()?)
    }

    /// Opens the shell over `base_dir` and rebuilds reminders from the stored
    /// list. A failed initial pass is reported but does not stop the shell.
    pub fn with_base_dir(
        mode: CliMode,
        base_dir: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base_dir.clone())?;
        let config = config_manager.load()?;
        let (manager, queue) = build_manager(&base_dir, &config, Arc::clone(&clock))?;

        let context = ShellContext {
            mode,
            registry,
            manager,
            queue,
            clock,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            base_dir,
            last_command: None,
            running: true,
        };
        context.initial_sync();
        Ok(context)
    }

    fn initial_sync(&self) {
        match self.manager.sync_reminders() {
            Ok(PassOutcome::Scheduled { handles }) => {
                info!(count = handles.len(), "reminders synced at startup");
            }
            Ok(PassOutcome::PermissionDenied) => {
                debug!("notifications disabled; startup sync skipped");
            }
            Err(err) => cli_io::print_warning(format!("Reminders were not synced: {err}")),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        "subtrack> ".to_string()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn locale(&self) -> ReminderLocale {
        self.config.reminder_locale()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.suggest(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(SubtrackError::SubscriptionNotFound(key)) => {
                cli_io::print_error(format!("No subscription matches `{key}`."));
                cli_io::print_hint("Run `list` to see stored subscriptions.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// Prints what a reminder pass did.
    pub(crate) fn report_pass(&self, outcome: &PassOutcome) {
        match outcome {
            PassOutcome::Scheduled { handles } => {
                cli_io::print_info(format!("Reminders scheduled: {}", handles.len()));
            }
            PassOutcome::PermissionDenied => {
                cli_io::print_warning(
                    "Notifications are off; reminders were left unchanged. \
                     Use `notifications on` to enable them.",
                );
            }
        }
    }

    /// Persists the notification preference and rebinds the reminder queue.
    /// Turning notifications on runs a full pass right away.
    pub(crate) fn set_notifications(&mut self, enabled: bool) -> CommandResult {
        let config = Config {
            notifications_enabled: enabled,
            ..self.config.clone()
        };
        let (manager, queue) = build_manager(&self.base_dir, &config, Arc::clone(&self.clock))
            .map_err(CommandError::from)?;
        self.config_manager.save(&config)?;
        self.config = config;
        self.manager = manager;
        self.queue = queue;
        info!(enabled, "notification preference updated");

        if enabled {
            let outcome = self.manager.sync_reminders()?;
            self.report_pass(&outcome);
        }
        Ok(())
    }
}

fn build_manager(
    base_dir: &Path,
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Result<(SubscriptionManager, Arc<JsonReminderQueue>), CliError> {
    let queue = Arc::new(JsonReminderQueue::new(
        reminders_file_in(base_dir),
        PermissionStatus::from(config.notifications_enabled),
    ));
    let scheduler = ReminderScheduler::new(queue.clone())
        .with_locale(config.reminder_locale())
        .with_fire_time(config.reminder_hour, config.reminder_minute)
        .map_err(SubtrackError::from)?;
    let store = JsonSubscriptionStore::new(Some(base_dir.to_path_buf()))?.with_clock(clock);
    Ok((SubscriptionManager::new(Box::new(store), scheduler), queue))
}

fn clock_from_env() -> Result<Arc<dyn Clock>, CliError> {
    match env::var(TODAY_OVERRIDE_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| {
                CliError::Input(format!("{TODAY_OVERRIDE_ENV}=`{raw}` is not a date: {err}"))
            })?;
            Ok(Arc::new(FixedClock::on(date)))
        }
        _ => Ok(Arc::new(SystemClock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Subscription;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> ShellContext {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::on(
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        ));
        ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf(), clock).unwrap()
    }

    #[test]
    fn unknown_commands_continue_the_loop() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        let control = ctx.dispatch("lsit", "lsit", &[]).unwrap();
        assert_eq!(control, LoopControl::Continue);
    }

    #[test]
    fn exit_command_stops_the_loop() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        assert_eq!(ctx.dispatch("exit", "exit", &[]).unwrap(), LoopControl::Exit);
    }

    #[test]
    fn disabling_notifications_keeps_queued_reminders() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.manager
            .add(Subscription::new("Netflix", 17000, 15, "Card"))
            .unwrap();
        assert_eq!(ctx.queue.upcoming(ctx.clock.now()).unwrap().len(), 1);

        ctx.set_notifications(false).unwrap();
        assert!(!ctx.config_manager.load().unwrap().notifications_enabled);

        let report = ctx
            .manager
            .add(Subscription::new("Gym", 50000, 31, "Cash"))
            .unwrap();
        assert!(report.reminders.is_denied());
        assert_eq!(ctx.queue.upcoming(ctx.clock.now()).unwrap().len(), 1);

        ctx.set_notifications(true).unwrap();
        assert_eq!(ctx.queue.upcoming(ctx.clock.now()).unwrap().len(), 2);
    }

    #[test]
    fn failed_rebind_leaves_preference_untouched() {
        let temp = TempDir::new().unwrap();
        let mut ctx = context(&temp);
        ctx.config.reminder_hour = 24;

        assert!(ctx.set_notifications(false).is_err());
        assert!(ctx.config.notifications_enabled);
        assert!(ctx.config_manager.load().unwrap().notifications_enabled);
    }

    #[test]
    fn startup_rebuilds_reminders_from_disk() {
        let temp = TempDir::new().unwrap();
        {
            let ctx = context(&temp);
            ctx.manager
                .add(Subscription::new("Netflix", 17000, 15, "Card"))
                .unwrap();
        }
        std::fs::remove_file(reminders_file_in(temp.path())).unwrap();

        let ctx = context(&temp);
        let pending = ctx.queue.upcoming(ctx.clock.now()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].1.subscription_name(), Some("Netflix"));
    }
}
