use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use eframe::egui;

use crate::config::AppConfig;
use crate::data::client::{PcaClient, UploadError};
use crate::data::model::{PcaResponse, XyzFile};

// ---------------------------------------------------------------------------
// Background upload worker
// ---------------------------------------------------------------------------

pub enum UploadRequest {
    Analyze(Vec<XyzFile>),
}

pub enum UploadResponse {
    Finished(Result<PcaResponse, UploadError>),
}

/// Runs blocking uploads off the UI thread, one at a time.
pub struct UploadWorker {
    tx: Sender<UploadRequest>,
    rx: Receiver<UploadResponse>,
}

impl UploadWorker {
    /// Start the worker thread. `ctx` is repainted whenever a result arrives.
    pub fn spawn(config: &AppConfig, ctx: egui::Context) -> Result<Self, UploadError> {
        let client = PcaClient::new(config)?;
        let (req_tx, req_rx) = mpsc::channel::<UploadRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<UploadResponse>();

        thread::Builder::new()
            .name("pca-upload".into())
            .spawn(move || run(client, req_rx, resp_tx, ctx))
            .map_err(|source| UploadError::Io {
                name: "upload worker".into(),
                source,
            })?;

        Ok(UploadWorker {
            tx: req_tx,
            rx: resp_rx,
        })
    }

    /// Queue a request. Returns `false` when the worker is gone.
    pub fn send(&self, req: UploadRequest) -> bool {
        self.tx.send(req).is_ok()
    }

    /// Non-blocking poll, called once per frame.
    ///
    /// Fails with [`UploadError::WorkerStopped`] once the worker thread is
    /// gone and every response it sent has been drained.
    pub fn try_recv(&self) -> Result<Option<UploadResponse>, UploadError> {
        match self.rx.try_recv() {
            Ok(resp) => Ok(Some(resp)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(UploadError::WorkerStopped),
        }
    }
}

fn run(
    client: PcaClient,
    requests: Receiver<UploadRequest>,
    responses: Sender<UploadResponse>,
    ctx: egui::Context,
) {
    log::debug!("upload worker ready for {}", client.api_url());
    // Ends when the UI drops its sender.
    for req in requests {
        let result = match req {
            UploadRequest::Analyze(files) => client.analyze(&files),
        };
        if responses.send(UploadResponse::Finished(result)).is_err() {
            break;
        }
        ctx.request_repaint();
    }
}
