use crate::model::Task;

/// Which completion bucket the presentation is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    Active,
    Completed,
}

impl Default for ViewFilter {
    fn default() -> Self {
        ViewFilter::Active
    }
}

impl ViewFilter {
    pub fn toggled(self) -> Self {
        match self {
            ViewFilter::Active => ViewFilter::Completed,
            ViewFilter::Completed => ViewFilter::Active,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::Active => "Active",
            ViewFilter::Completed => "Completed",
        }
    }
}

/// Counts over the whole task list, not just the visible bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Stats {
    pub fn tally(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.is_completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}

/// One published snapshot of everything the presentation needs. Rebuilt
/// from the full task list on every state change, never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub filter: ViewFilter,
    pub tasks: Vec<Task>,
    pub stats: Stats,
    pub loading: bool,
    pub busy: bool,
}

impl View {
    pub fn assemble(all: &[Task], filter: ViewFilter, loading: bool, busy: bool) -> Self {
        Self {
            filter,
            tasks: visible(all, filter),
            stats: Stats::tally(all),
            loading,
            busy,
        }
    }
}

/// Rows for one bucket, ordered by priority weight and then by creation
/// time, newest first. The sort is stable: rows with equal keys keep the
/// order the store returned them in.
pub fn visible(tasks: &[Task], filter: ViewFilter) -> Vec<Task> {
    let mut rows: Vec<Task> = tasks
        .iter()
        .filter(|task| match filter {
            ViewFilter::Active => !task.is_completed,
            ViewFilter::Completed => task.is_completed,
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        b.priority
            .weight()
            .cmp(&a.priority.weight())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    rows
}
