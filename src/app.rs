use eframe::egui;

use crate::config::AppConfig;
use crate::data::model::{FileSource, XyzFile};
use crate::state::AppState;
use crate::ui::{panels, plot};
use crate::worker::{UploadRequest, UploadResponse, UploadWorker};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PcaViewerApp {
    pub state: AppState,
    worker: Option<UploadWorker>,
}

impl PcaViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let worker = match UploadWorker::spawn(&config, cc.egui_ctx.clone()) {
            Ok(w) => Some(w),
            Err(e) => {
                log::error!("Failed to start upload worker: {e}");
                None
            }
        };
        let mut state = AppState::new(config);
        if worker.is_none() {
            state.fail("the HTTP client could not be initialised".into());
        }
        Self { state, worker }
    }

    /// Replace the selection with whatever was dropped this frame.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone())
        });
        self.state.drop_hover = hovering;
        if dropped.is_empty() || self.state.loading {
            return;
        }
        self.state
            .set_files(dropped.into_iter().filter_map(xyz_from_dropped));
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };
        loop {
            match worker.try_recv() {
                Ok(Some(UploadResponse::Finished(result))) => self.state.finish_upload(result),
                Ok(None) => break,
                Err(e) => {
                    // reported once; later uploads fail with "not running"
                    self.worker = None;
                    self.state.finish_upload(Err(e));
                    break;
                }
            }
        }
    }

    fn start_upload(&mut self) {
        let Some(files) = self.state.begin_upload() else {
            return;
        };
        let sent = self
            .worker
            .as_ref()
            .is_some_and(|w| w.send(UploadRequest::Analyze(files)));
        if !sent {
            self.state.fail("the upload worker is not running".into());
        }
    }
}

fn xyz_from_dropped(file: egui::DroppedFile) -> Option<XyzFile> {
    if let Some(path) = file.path {
        return Some(XyzFile::from_path(path));
    }
    file.bytes.map(|bytes| XyzFile {
        name: file.name,
        source: FileSource::Bytes(bytes),
    })
}

impl eframe::App for PcaViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: files and controls ----
        let run = egui::SidePanel::left("file_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| panels::side_panel(ui, &mut self.state))
                    .inner
            })
            .inner;
        if run {
            self.start_upload();
        }

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::results_view(ui, &mut self.state);
        });

        panels::error_window(ctx, &mut self.state);
        panels::point_details_window(ctx, &mut self.state);
    }
}
