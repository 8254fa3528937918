use crate::config::AppConfig;
use crate::data::basemap::BaseLayer;
use crate::data::fetch::PendingFetch;
use crate::data::loader::{self, LoadedFile};
use crate::data::model::{PlateBoundaries, QuakeCollection, SampleId, SamplesDataset};
use crate::data::select::{TopUnits, is_descending, select_metadata, select_sample, top_units};
use crate::data::trace::{BarTrace, BubbleTrace, bar_trace, bubble_trace};
use crate::error::{DashboardError, SelectError};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which dashboard fills the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dashboard {
    #[default]
    Samples,
    Earthquakes,
}

/// One fetched resource. Each keeps its own error so a success on one
/// never hides a failure on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Samples,
    Earthquakes,
    Plates,
}

/// Everything rendered for one selected subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectView {
    pub subject: SampleId,
    pub metadata_lines: Vec<String>,
    pub top: TopUnits,
    pub bar: BarTrace,
    pub bubble: BubbleTrace,
}

impl SubjectView {
    /// Build the panel and both charts for `id`, or nothing at all.
    pub fn build(dataset: &SamplesDataset, id: &SampleId, top_n: usize) -> Result<Self, SelectError> {
        let record = select_metadata(&dataset.metadata, id)?;
        let sample = select_sample(&dataset.samples, id)?;
        let top = top_units(sample, top_n);

        if !is_descending(&sample.sample_values) {
            log::warn!("Sample {id} is not sorted by value; the top-{top_n} chart may be off");
        }

        Ok(SubjectView {
            subject: id.clone(),
            metadata_lines: record.lines(),
            bar: bar_trace(id, &top, top_n),
            bubble: bubble_trace(sample),
            top,
        })
    }
}

/// Belly-button dashboard state.
#[derive(Default)]
pub struct SamplesState {
    pub dataset: Option<SamplesDataset>,
    /// Currently rendered subject; survives failed selections.
    pub view: Option<SubjectView>,
    pub pending: Option<PendingFetch<SamplesDataset>>,
    /// Last failed fetch of the samples document.
    pub fetch_error: Option<String>,
    /// Last failed subject selection.
    pub selection_error: Option<String>,
}

/// Earthquake map state.
pub struct MapState {
    pub quakes: Option<QuakeCollection>,
    pub plates: Option<PlateBoundaries>,
    pub base_layer: BaseLayer,
    pub show_plates: bool,
    pub show_quakes: bool,
    pub pending_quakes: Option<PendingFetch<QuakeCollection>>,
    pub pending_plates: Option<PendingFetch<PlateBoundaries>>,
    pub quakes_error: Option<String>,
    pub plates_error: Option<String>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            quakes: None,
            plates: None,
            base_layer: BaseLayer::default(),
            show_plates: true,
            show_quakes: true,
            pending_quakes: None,
            pending_plates: None,
            quakes_error: None,
            plates_error: None,
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub active: Dashboard,
    pub samples: SamplesState,
    pub map: MapState,

    /// Last failed attempt to open a local file.
    pub file_error: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            active: Dashboard::default(),
            samples: SamplesState::default(),
            map: MapState::default(),
            file_error: None,
        }
    }

    /// Whether any fetch is still running.
    pub fn loading(&self) -> bool {
        self.samples.pending.is_some()
            || self.map.pending_quakes.is_some()
            || self.map.pending_plates.is_some()
    }

    // -- Fetching --

    /// Start fetching the samples document from the configured source.
    pub fn reload_samples(&mut self) {
        self.samples.pending = Some(PendingFetch::spawn(
            &self.config.samples_url,
            loader::parse_samples,
        ));
    }

    /// Start fetching both map layers from the configured sources.
    pub fn reload_map(&mut self) {
        self.map.pending_quakes = Some(PendingFetch::spawn(
            &self.config.earthquakes_url,
            loader::parse_earthquakes,
        ));
        self.map.pending_plates = Some(PendingFetch::spawn(
            &self.config.plates_url,
            loader::parse_plates,
        ));
    }

    pub fn reload_all(&mut self) {
        self.reload_samples();
        self.reload_map();
    }

    /// Apply any finished fetches. Call once per frame.
    pub fn poll(&mut self) {
        if let Some(result) = self.samples.pending.as_ref().and_then(|p| p.try_take()) {
            self.samples.pending = None;
            match result {
                Ok(dataset) => self.set_samples_dataset(dataset),
                Err(e) => self.report_fetch_error(Source::Samples, e),
            }
        }
        if let Some(result) = self.map.pending_quakes.as_ref().and_then(|p| p.try_take()) {
            self.map.pending_quakes = None;
            match result {
                Ok(quakes) => self.set_quakes(quakes),
                Err(e) => self.report_fetch_error(Source::Earthquakes, e),
            }
        }
        if let Some(result) = self.map.pending_plates.as_ref().and_then(|p| p.try_take()) {
            self.map.pending_plates = None;
            match result {
                Ok(plates) => self.set_plates(plates),
                Err(e) => self.report_fetch_error(Source::Plates, e),
            }
        }
    }

    fn report_fetch_error(&mut self, source: Source, e: DashboardError) {
        log::error!("{e}");
        *self.error_slot(source) = Some(e.to_string());
    }

    fn error_slot(&mut self, source: Source) -> &mut Option<String> {
        match source {
            Source::Samples => &mut self.samples.fetch_error,
            Source::Earthquakes => &mut self.map.quakes_error,
            Source::Plates => &mut self.map.plates_error,
        }
    }

    pub fn report_file_error(&mut self, message: String) {
        self.file_error = Some(message);
    }

    /// Error messages for the active dashboard, then any file-open error.
    pub fn status_messages(&self) -> Vec<&str> {
        let dashboard = match self.active {
            Dashboard::Samples => [&self.samples.fetch_error, &self.samples.selection_error],
            Dashboard::Earthquakes => [&self.map.quakes_error, &self.map.plates_error],
        };
        dashboard
            .into_iter()
            .chain([&self.file_error])
            .filter_map(|msg| msg.as_deref())
            .collect()
    }

    // -- Samples dashboard --

    /// Ingest a newly loaded samples document and show its first subject.
    pub fn set_samples_dataset(&mut self, dataset: SamplesDataset) {
        log::info!(
            "Loaded {} samples, {} metadata records, {} subject ids",
            dataset.len(),
            dataset.metadata.len(),
            dataset.names.len()
        );
        let first = dataset.names.first().cloned();
        self.samples.dataset = Some(dataset);
        self.samples.view = None;
        self.samples.fetch_error = None;
        self.samples.selection_error = None;

        if let Some(id) = first {
            self.select_subject(&id);
        }
    }

    /// Render subject `id`. On failure the previous view stays in place.
    pub fn select_subject(&mut self, id: &SampleId) {
        let Some(dataset) = &self.samples.dataset else {
            return;
        };
        match SubjectView::build(dataset, id, self.config.top_n) {
            Ok(view) => {
                log::debug!("Selected subject {id}");
                self.samples.view = Some(view);
                self.samples.selection_error = None;
            }
            Err(e) => {
                log::warn!("{e}");
                self.samples.selection_error = Some(e.to_string());
            }
        }
    }

    pub fn selected_subject(&self) -> Option<&SampleId> {
        self.samples.view.as_ref().map(|v| &v.subject)
    }

    // -- Map dashboard --

    pub fn set_quakes(&mut self, quakes: QuakeCollection) {
        log::info!(
            "Loaded {} earthquakes{}",
            quakes.len(),
            quakes.title.as_deref().map(|t| format!(" ({t})")).unwrap_or_default()
        );
        self.map.quakes = Some(quakes);
        self.map.quakes_error = None;
    }

    pub fn set_plates(&mut self, plates: PlateBoundaries) {
        log::info!("Loaded {} plate boundary lines", plates.lines.len());
        self.map.plates = Some(plates);
        self.map.plates_error = None;
    }

    // -- Local files --

    /// Route a file opened from disk to the dashboard it belongs to.
    pub fn apply_loaded_file(&mut self, file: LoadedFile) {
        self.file_error = None;
        match file {
            LoadedFile::Samples(ds) => {
                self.set_samples_dataset(ds);
                self.active = Dashboard::Samples;
            }
            LoadedFile::Earthquakes(quakes) => {
                self.set_quakes(quakes);
                self.active = Dashboard::Earthquakes;
            }
            LoadedFile::Plates(plates) => {
                self.set_plates(plates);
                self.active = Dashboard::Earthquakes;
            }
        }
    }
}
