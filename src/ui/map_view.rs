use crate::config::MapSettings;
use crate::models::Coordinate;
use crate::snapshot::Dataset;

const MAX_ZOOM: u8 = 20;
/// Fraction of the visible span moved by one pan step.
const PAN_STEP: f64 = 0.2;

#[derive(Debug, Clone)]
pub(crate) struct MapView {
    pub(crate) center_lat: f64,
    pub(crate) center_lng: f64,
    pub(crate) zoom: u8,
    home: MapSettings,
    /// Cursor in the list of mapped projects.
    pub(crate) selected: usize,
    pub(crate) scroll: usize,
    /// Project the view was last centered on.
    pub(crate) focused: Option<(Dataset, String)>,
}

impl MapView {
    pub(crate) fn new(home: MapSettings) -> Self {
        Self {
            center_lat: home.center_lat,
            center_lng: home.center_lng,
            zoom: home.zoom.min(MAX_ZOOM),
            home,
            selected: 0,
            scroll: 0,
            focused: None,
        }
    }

    pub(crate) fn span_lng(&self) -> f64 {
        360.0 / f64::from(1u32 << self.zoom.min(MAX_ZOOM))
    }

    /// Longitude and latitude bounds for a canvas of `cols` x `rows` cells.
    /// A terminal cell is about twice as tall as it is wide.
    pub(crate) fn viewport(&self, cols: u16, rows: u16) -> ([f64; 2], [f64; 2]) {
        let span_lng = self.span_lng();
        let span_lat = span_lng * f64::from(rows) * 2.0 / f64::from(cols.max(1));
        (
            [self.center_lng - span_lng / 2.0, self.center_lng + span_lng / 2.0],
            [self.center_lat - span_lat / 2.0, self.center_lat + span_lat / 2.0],
        )
    }

    pub(crate) fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub(crate) fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1);
    }

    /// Move by whole steps; positive `dx` is east, positive `dy` north.
    pub(crate) fn pan(&mut self, dx: i8, dy: i8) {
        let step = self.span_lng() * PAN_STEP;
        self.center_lng = (self.center_lng + f64::from(dx) * step).clamp(-180.0, 180.0);
        self.center_lat = (self.center_lat + f64::from(dy) * step).clamp(-90.0, 90.0);
    }

    pub(crate) fn focus(&mut self, dataset: Dataset, id: &str, at: Coordinate) {
        self.center_lat = at.lat;
        self.center_lng = at.lng;
        self.zoom = self.home.focus_zoom.min(MAX_ZOOM);
        self.focused = Some((dataset, id.to_string()));
    }

    pub(crate) fn is_focused(&self, dataset: Dataset, id: &str) -> bool {
        self.focused
            .as_ref()
            .is_some_and(|(d, focused)| *d == dataset && focused == id)
    }

    pub(crate) fn reset(&mut self) {
        self.center_lat = self.home.center_lat;
        self.center_lng = self.home.center_lng;
        self.zoom = self.home.zoom.min(MAX_ZOOM);
        self.focused = None;
    }
}
