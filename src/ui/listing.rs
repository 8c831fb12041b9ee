use std::collections::HashSet;

use crate::models::NormalizedProject;
use crate::summary::partition_by_completion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    All,
    Completed,
    /// Everything not completed: in progress and planned.
    Outstanding,
}

impl StatusFilter {
    pub(crate) fn all() -> &'static [StatusFilter] {
        &[Self::All, Self::Completed, Self::Outstanding]
    }

    pub(crate) fn accepts(&self, project: &NormalizedProject) -> bool {
        match self {
            Self::All => true,
            Self::Completed => project.is_completed(),
            Self::Outstanding => !project.is_completed(),
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "completed" | "done" => Some(Self::Completed),
            "outstanding" | "open" | "in-progress" => Some(Self::Outstanding),
            _ => None,
        }
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::All => Self::Completed,
            Self::Completed => Self::Outstanding,
            Self::Outstanding => Self::All,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Completed => write!(f, "Completed"),
            Self::Outstanding => write!(f, "Outstanding"),
        }
    }
}

/// View state for one project table. Pages are zero-based internally and
/// shown one-based.
#[derive(Debug, Clone)]
pub(crate) struct ProjectListing {
    pub(crate) filter: StatusFilter,
    pub(crate) query: String,
    pub(crate) page: usize,
    /// Row within the current page.
    pub(crate) cursor: usize,
    pub(crate) page_size: usize,
    expanded: HashSet<String>,
}

impl ProjectListing {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            filter: StatusFilter::All,
            query: String::new(),
            page: 0,
            cursor: 0,
            page_size: page_size.max(1),
            expanded: HashSet::new(),
        }
    }

    /// Projects passing both the status tab and the search query, in
    /// snapshot order.
    pub(crate) fn filtered<'a>(&self, projects: &'a [NormalizedProject]) -> Vec<&'a NormalizedProject> {
        projects
            .iter()
            .filter(|p| self.filter.accepts(p) && p.matches(&self.query))
            .collect()
    }

    pub(crate) fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub(crate) fn page_rows<'a, 'b>(
        &self,
        filtered: &'b [&'a NormalizedProject],
    ) -> &'b [&'a NormalizedProject] {
        let start = (self.page * self.page_size).min(filtered.len());
        let end = (start + self.page_size).min(filtered.len());
        &filtered[start..end]
    }

    pub(crate) fn selected<'a>(&self, projects: &'a [NormalizedProject]) -> Option<&'a NormalizedProject> {
        let filtered = self.filtered(projects);
        self.page_rows(&filtered).get(self.cursor).copied()
    }

    /// Tab counts: (all, completed, outstanding).
    pub(crate) fn counts(projects: &[NormalizedProject]) -> (usize, usize, usize) {
        let (completed, outstanding) = partition_by_completion(projects);
        (projects.len(), completed.len(), outstanding.len())
    }

    pub(crate) fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.reset_position();
    }

    pub(crate) fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.reset_position();
    }

    fn reset_position(&mut self) {
        self.page = 0;
        self.cursor = 0;
    }

    pub(crate) fn next_page(&mut self, total: usize) {
        if self.page + 1 < self.page_count(total) {
            self.page += 1;
            self.cursor = 0;
        }
    }

    pub(crate) fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.cursor = 0;
        }
    }

    /// Jump to a one-based page, clamped to the last page.
    pub(crate) fn go_to_page(&mut self, page: usize, total: usize) {
        self.page = page.saturating_sub(1).min(self.page_count(total) - 1);
        self.cursor = 0;
    }

    pub(crate) fn cursor_down(&mut self, rows_on_page: usize) {
        if self.cursor + 1 < rows_on_page {
            self.cursor += 1;
        }
    }

    pub(crate) fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn cursor_to_bottom(&mut self, rows_on_page: usize) {
        self.cursor = rows_on_page.saturating_sub(1);
    }

    /// Keep page and cursor in range after the data underneath changed.
    pub(crate) fn clamp(&mut self, total: usize) {
        self.page = self.page.min(self.page_count(total) - 1);
        let rows = total.saturating_sub(self.page * self.page_size).min(self.page_size);
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    pub(crate) fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub(crate) fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Ids are positional for some datasets, so expansion does not survive
    /// a reload.
    pub(crate) fn collapse_all(&mut self) {
        self.expanded.clear();
    }
}
