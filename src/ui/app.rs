use std::sync::Arc;

use crate::config::Config;
use crate::models::NormalizedProject;
use crate::routes::Route;
use crate::snapshot::{Dataset, LoadOutcome, Loader, Snapshot};

use super::listing::ProjectListing;
use super::map_view::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Overview,
    Projects,
    PublicWorks,
    Map,
    Reports,
    NotFound,
}

impl Screen {
    /// Screens reachable from the tab bar.
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Overview,
            Self::Projects,
            Self::PublicWorks,
            Self::Map,
            Self::Reports,
        ]
    }

    /// Dataset whose project table this screen shows, if any.
    pub(crate) fn listing_dataset(&self) -> Option<Dataset> {
        match self {
            Self::Projects => Some(Dataset::Ledger),
            Self::PublicWorks => Some(Dataset::PublicWorks),
            _ => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overview => write!(f, "Overview"),
            Self::Projects => write!(f, "Projects"),
            Self::PublicWorks => write!(f, "Public Works"),
            Self::Map => write!(f, "Map"),
            Self::Reports => write!(f, "Reports"),
            Self::NotFound => write!(f, "Not Found"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportTab {
    Budget,
    Projects,
    Location,
}

impl ReportTab {
    pub(crate) fn all() -> &'static [ReportTab] {
        &[Self::Budget, Self::Projects, Self::Location]
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::Budget => Self::Projects,
            Self::Projects => Self::Location,
            Self::Location => Self::Budget,
        }
    }

    pub(crate) fn prev(&self) -> Self {
        match self {
            Self::Budget => Self::Location,
            Self::Projects => Self::Budget,
            Self::Location => Self::Projects,
        }
    }
}

impl std::fmt::Display for ReportTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Budget => write!(f, "Budget"),
            Self::Projects => write!(f, "Projects"),
            Self::Location => write!(f, "Location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoadState {
    NotLoaded,
    Loading,
    Ready,
    /// The message is shown in the status bar; the view shows zeros.
    Failed(String),
}

pub(crate) struct DatasetView {
    pub(crate) snapshot: Arc<Snapshot>,
    pub(crate) state: LoadState,
    pub(crate) listing: ProjectListing,
}

impl DatasetView {
    fn new(page_size: usize) -> Self {
        Self {
            snapshot: Arc::new(Snapshot::empty()),
            state: LoadState::NotLoaded,
            listing: ProjectListing::new(page_size),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) config: Config,
    pub(crate) fiscal_year: String,

    pub(crate) loader: Loader,
    pub(crate) ledger: DatasetView,
    pub(crate) public_works: DatasetView,

    // Map
    pub(crate) map: MapView,
    /// `?project=` id waiting for its snapshot to arrive.
    pub(crate) pending_focus: Option<String>,

    // Reports
    pub(crate) report_tab: ReportTab,
    pub(crate) report_dataset: Dataset,

    pub(crate) not_found_path: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            running: true,
            screen: Screen::Overview,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            fiscal_year: config.fiscal_year.clone(),

            loader: Loader::new(),
            ledger: DatasetView::new(config.page_size),
            public_works: DatasetView::new(config.page_size),

            map: MapView::new(config.map),
            pending_focus: None,

            report_tab: ReportTab::Budget,
            report_dataset: Dataset::Ledger,

            not_found_path: String::new(),
            visible_rows: 20,
            config,
        }
    }

    pub(crate) fn view(&self, dataset: Dataset) -> &DatasetView {
        match dataset {
            Dataset::Ledger => &self.ledger,
            Dataset::PublicWorks => &self.public_works,
        }
    }

    pub(crate) fn view_mut(&mut self, dataset: Dataset) -> &mut DatasetView {
        match dataset {
            Dataset::Ledger => &mut self.ledger,
            Dataset::PublicWorks => &mut self.public_works,
        }
    }

    pub(crate) fn snapshot(&self, dataset: Dataset) -> &Snapshot {
        &self.view(dataset).snapshot
    }

    // ── Loading ──────────────────────────────────────────────

    pub(crate) fn reload(&mut self, dataset: Dataset) {
        let source = match dataset {
            Dataset::Ledger => self.config.ledger_source(),
            Dataset::PublicWorks => self.config.public_works_source(),
        };
        if self.loader.is_loading(dataset) {
            tracing::debug!("Superseding in-flight {dataset} load");
        }
        tracing::info!("Loading {dataset} from {source}");
        self.loader.request(dataset, source);
        self.view_mut(dataset).state = LoadState::Loading;
    }

    pub(crate) fn reload_all(&mut self) {
        for dataset in Dataset::all() {
            self.reload(*dataset);
        }
    }

    pub(crate) fn drain_loads(&mut self) {
        for outcome in self.loader.poll() {
            self.apply_load(outcome);
        }
    }

    /// Swap in a finished load. Failures are logged, the dataset is shown
    /// empty and the error goes to the status bar.
    pub(crate) fn apply_load(&mut self, outcome: LoadOutcome) {
        let dataset = outcome.dataset;
        let view = self.view_mut(dataset);
        match outcome.result {
            Ok(snapshot) => {
                view.snapshot = Arc::new(snapshot);
                view.state = LoadState::Ready;
            }
            Err(e) => {
                tracing::error!("{e}");
                view.snapshot = Arc::new(Snapshot::empty());
                view.state = LoadState::Failed(e.to_string());
                self.set_status(format!("Could not load {dataset}: {e}"));
            }
        }
        let view = self.view_mut(dataset);
        view.listing.collapse_all();
        let total = view.listing.filtered(&view.snapshot.projects).len();
        view.listing.clamp(total);
        self.map.selected = 0;
        self.map.scroll = 0;

        if let Some(id) = self.pending_focus.take() {
            if !self.focus_project(&id) && self.any_loading() {
                self.pending_focus = Some(id);
            }
        }
    }

    pub(crate) fn any_loading(&self) -> bool {
        Dataset::all()
            .iter()
            .any(|d| self.view(*d).state == LoadState::Loading)
    }

    // ── Navigation ───────────────────────────────────────────

    pub(crate) fn navigate(&mut self, route: &Route) {
        match route {
            Route::Overview => self.screen = Screen::Overview,
            Route::Projects(Dataset::Ledger) => self.screen = Screen::Projects,
            Route::Projects(Dataset::PublicWorks) => self.screen = Screen::PublicWorks,
            Route::Map { project } => {
                self.screen = Screen::Map;
                if let Some(id) = project {
                    if !self.focus_project(id) {
                        if self.any_loading() {
                            self.pending_focus = Some(id.clone());
                        } else {
                            self.set_status(format!("No mapped project with id {id}"));
                        }
                    }
                }
            }
            Route::Reports => self.screen = Screen::Reports,
            Route::NotFound(path) => {
                self.not_found_path = path.clone();
                self.screen = Screen::NotFound;
            }
        }
    }

    /// Route of what is on screen now.
    pub(crate) fn route(&self) -> Route {
        match self.screen {
            Screen::Overview => Route::Overview,
            Screen::Projects => Route::Projects(Dataset::Ledger),
            Screen::PublicWorks => Route::Projects(Dataset::PublicWorks),
            Screen::Map => Route::Map {
                project: self.map.focused.as_ref().map(|(_, id)| id.clone()),
            },
            Screen::Reports => Route::Reports,
            Screen::NotFound => Route::NotFound(self.not_found_path.clone()),
        }
    }

    // ── Map ──────────────────────────────────────────────────

    /// Every project with a coordinate, public works first.
    pub(crate) fn map_entries(&self) -> Vec<(Dataset, &NormalizedProject)> {
        [Dataset::PublicWorks, Dataset::Ledger]
            .iter()
            .flat_map(|d| self.snapshot(*d).mapped_projects().map(move |p| (*d, p)))
            .collect()
    }

    /// Center the map on a project id, looking in the public-works snapshot
    /// before the ledger. Returns false when no mapped project has that id.
    pub(crate) fn focus_project(&mut self, id: &str) -> bool {
        [Dataset::PublicWorks, Dataset::Ledger]
            .iter()
            .any(|d| self.focus_project_in(*d, id))
    }

    pub(crate) fn focus_project_in(&mut self, dataset: Dataset, id: &str) -> bool {
        let Some(coordinate) = self
            .snapshot(dataset)
            .find_project(id)
            .and_then(|p| p.coordinate)
        else {
            return false;
        };
        let index = self
            .map_entries()
            .iter()
            .position(|(d, p)| *d == dataset && p.id == id);
        self.map.focus(dataset, id, coordinate);
        if let Some(index) = index {
            self.map.selected = index;
        }
        true
    }

    // ── Projects ─────────────────────────────────────────────

    pub(crate) fn selected_project(&self, dataset: Dataset) -> Option<&NormalizedProject> {
        let view = self.view(dataset);
        view.listing.selected(&view.snapshot.projects)
    }

    /// Rows on the current page of a project table.
    pub(crate) fn page_len(&self, dataset: Dataset) -> usize {
        let view = self.view(dataset);
        let filtered = view.listing.filtered(&view.snapshot.projects);
        view.listing.page_rows(&filtered).len()
    }

    pub(crate) fn filtered_len(&self, dataset: Dataset) -> usize {
        let view = self.view(dataset);
        view.listing.filtered(&view.snapshot.projects).len()
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
