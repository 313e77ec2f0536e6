//! Per-task results collected for the end-of-run summary.

/// Outcome of one task, as shown in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Every resource was installed, removed or verified.
    Ok,
    /// The manifest has no section for this task (e.g. no `[locale]`).
    NotApplicable,
    /// The task decided there was nothing to do.
    Skipped,
    /// Changes were previewed only.
    DryRun,
    /// At least one resource failed.
    Failed,
    /// Not started because an earlier task failed in strict mode.
    Aborted,
}

impl TaskStatus {
    const ALL: [Self; 6] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
        Self::Aborted,
    ];

    /// Icon and SGR color used on the summary line.
    const fn marker(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "32"),
            Self::NotApplicable => ("·", "2"),
            Self::Skipped => ("○", "33"),
            Self::DryRun => ("~", "37"),
            Self::Failed => ("✗", "31"),
            Self::Aborted => ("-", "2"),
        }
    }

    /// Word used in the totals line.
    const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
            Self::Aborted => "not run",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Ok => 0,
            Self::NotApplicable => 1,
            Self::Skipped => 2,
            Self::DryRun => 3,
            Self::Failed => 4,
            Self::Aborted => 5,
        }
    }
}

/// One recorded task.
#[derive(Debug, Clone)]
pub struct TaskEntry {
    /// Task name, e.g. `Install translations`.
    pub name: String,
    /// Final status.
    pub status: TaskStatus,
    /// Skip reason or error text.
    pub message: Option<String>,
}

impl TaskEntry {
    /// Colored summary line, e.g. `✗ Install core module (python3 not found)`.
    pub(super) fn line(&self) -> String {
        let (icon, color) = self.status.marker();
        let suffix = self
            .message
            .as_ref()
            .map_or_else(String::new, |msg| format!(" ({msg})"));
        format!("\x1b[{color}m{icon} {}{suffix}\x1b[0m", self.name)
    }
}

/// Count of tasks per status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(super) struct Tally([u32; 6]);

impl Tally {
    pub(super) fn of(entries: &[TaskEntry]) -> Self {
        let mut tally = Self::default();
        for entry in entries {
            if let Some(count) = tally.0.get_mut(entry.status.index()) {
                *count += 1;
            }
        }
        tally
    }

    pub(super) fn total(self) -> u32 {
        self.0.iter().sum()
    }

    pub(super) fn count(self, status: TaskStatus) -> u32 {
        self.0.get(status.index()).copied().unwrap_or(0)
    }

    /// Totals line, e.g. `3 tasks: 2 ok, 0 n/a, ...`, with each count colored.
    pub(super) fn line(self) -> String {
        let parts: Vec<String> = TaskStatus::ALL
            .iter()
            .map(|&status| {
                let (_, color) = status.marker();
                format!(
                    "\x1b[{color}m{} {}\x1b[0m",
                    self.count(status),
                    status.label()
                )
            })
            .collect();
        format!("{} tasks: {}", self.total(), parts.join(", "))
    }
}
