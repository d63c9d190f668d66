use crate::color::ColorScale;
use crate::config::{AppConfig, is_valid_timestep_size};
use crate::data::client::UploadError;
use crate::data::model::{PcaResponse, XyzFile};
use crate::data::report::PcaReport;
use crate::data::selection::select_xyz;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// `.xyz` files chosen for the next upload.
    pub files: Vec<XyzFile>,

    /// Last successful analysis (None until a request succeeds).
    pub report: Option<PcaReport>,

    /// Timestep size currently used for labels, in fs.
    pub timestep_size_fs: f64,

    /// Colour scale for the projection plot.
    pub color_scale: ColorScale,

    /// Point whose details window is open.
    pub selected_point: Option<usize>,

    /// Error shown in the modal error window.
    pub error_message: Option<String>,

    /// Status line shown in the top bar.
    pub status_message: Option<String>,

    /// Whether an upload is in flight.
    pub loading: bool,

    /// Whether files are being dragged over the window.
    pub drop_hover: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            timestep_size_fs: config.timestep_size_fs,
            config,
            files: Vec::new(),
            report: None,
            color_scale: ColorScale::time(),
            selected_point: None,
            error_message: None,
            status_message: None,
            loading: false,
            drop_hover: false,
        }
    }

    /// Replace the selection with the `.xyz` subset of `candidates`.
    pub fn set_files<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = XyzFile>,
    {
        self.files = select_xyz(candidates);
        log::info!("{} .xyz file(s) selected", self.files.len());
        self.status_message = Some(format!("{} file(s) ready", self.files.len()));
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
        self.status_message = None;
    }

    pub fn can_process(&self) -> bool {
        !self.files.is_empty() && !self.loading
    }

    /// Enter the loading state. Returns the files to upload, or `None`
    /// when nothing can be sent right now.
    pub fn begin_upload(&mut self) -> Option<Vec<XyzFile>> {
        if !self.can_process() {
            return None;
        }
        self.loading = true;
        self.report = None;
        self.selected_point = None;
        self.status_message = Some(format!("Analyzing {} file(s)…", self.files.len()));
        Some(self.files.clone())
    }

    /// Leave the loading state with the outcome of an upload.
    pub fn finish_upload(&mut self, result: Result<PcaResponse, UploadError>) {
        self.loading = false;
        match result {
            Ok(response) => {
                log::info!(
                    "Received {} points over {} components",
                    response.points.len(),
                    response.n_components()
                );
                self.status_message =
                    Some(format!("{} points projected", response.points.len()));
                self.report = Some(PcaReport::build(response, self.timestep_size_fs));
            }
            Err(e) => {
                if let Some(status) = e.status() {
                    log::warn!("PCA service rejected the upload with HTTP {status}");
                }
                self.fail(e.to_string());
            }
        }
    }

    /// Show an error and re-enable the controls.
    pub fn fail(&mut self, message: String) {
        log::error!("{message}");
        self.loading = false;
        self.status_message = None;
        self.error_message = Some(format!("An error occurred: {message}"));
    }

    /// Change the timestep size and relabel the current report.
    pub fn set_timestep_size(&mut self, fs: f64) {
        if !is_valid_timestep_size(fs) || fs == self.timestep_size_fs {
            return;
        }
        self.timestep_size_fs = fs;
        if let Some(report) = &mut self.report {
            report.relabel(fs);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::PcaPoint;

    fn file(name: &str) -> XyzFile {
        XyzFile::from_path(PathBuf::from(name))
    }

    fn response() -> PcaResponse {
        PcaResponse {
            points: vec![PcaPoint {
                x: 0.0,
                y: 0.0,
                label: "step_2000.xyz".into(),
            }],
            explained_variance_ratio_all: vec![1.0],
            cumulative_variance_ratio_all: vec![1.0],
        }
    }

    #[test]
    fn selection_replaces_previous_list() {
        let mut state = AppState::new(AppConfig::default());
        state.set_files(vec![file("a_1.xyz"), file("b_2.xyz")]);
        assert_eq!(state.files.len(), 2);
        state.set_files(vec![file("readme.md")]);
        assert!(state.files.is_empty());
        assert!(!state.can_process());
    }

    #[test]
    fn upload_cycle_disables_then_reenables() {
        let mut state = AppState::new(AppConfig::default());
        state.set_files(vec![file("a_1.xyz")]);
        let sent = state.begin_upload().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(state.loading);
        assert!(state.begin_upload().is_none());

        state.finish_upload(Err(UploadError::Api {
            status: 500,
            message: "boom".into(),
        }));
        assert!(!state.loading);
        assert!(state.can_process());
        assert_eq!(state.error_message.as_deref(), Some("An error occurred: boom"));
    }

    #[test]
    fn stopped_worker_ends_loading() {
        let mut state = AppState::new(AppConfig::default());
        state.set_files(vec![file("a_1.xyz")]);
        state.begin_upload().unwrap();

        state.finish_upload(Err(UploadError::WorkerStopped));
        assert!(!state.loading);
        assert!(state.can_process());
        assert_eq!(
            state.error_message.as_deref(),
            Some("An error occurred: the upload worker stopped unexpectedly")
        );
    }

    #[test]
    fn success_builds_report_and_relabels() {
        let mut state = AppState::new(AppConfig::default());
        state.set_files(vec![file("step_2000.xyz")]);
        state.begin_upload();
        state.finish_upload(Ok(response()));
        assert_eq!(state.report.as_ref().unwrap().labels[0], "40 K, 2.00 ps");

        state.set_timestep_size(0.25);
        assert_eq!(state.report.as_ref().unwrap().labels[0], "40 K, 500 fs");

        state.set_timestep_size(-1.0);
        assert_eq!(state.timestep_size_fs, 0.25);
    }
}
