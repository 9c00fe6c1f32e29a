//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use contact_core::{
    ContactConfig, ContactFormClient, FormEvent, ManualCaptchaWidget, SubmissionsClient,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker thread: a tokio runtime driving a serial
/// command loop. Commands run one at a time, so at most one submission is in
/// flight per form.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    widget: ManualCaptchaWidget,
    config: ContactConfig,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut worker = Worker::new(ui_tx.clone(), widget, config);
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                worker.handle(cmd).await;
            }
        });
    });
}

struct Worker {
    ui_tx: Sender<UiEvent>,
    widget: ManualCaptchaWidget,
    form: ContactFormClient<ManualCaptchaWidget>,
    submissions: SubmissionsClient,
    event_task: JoinHandle<()>,
}

impl Worker {
    fn new(ui_tx: Sender<UiEvent>, widget: ManualCaptchaWidget, config: ContactConfig) -> Self {
        let (form, submissions, event_task) = build_clients(&ui_tx, &widget, config);
        Self {
            ui_tx,
            widget,
            form,
            submissions,
            event_task,
        }
    }

    async fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::UpdateField { field, value } => {
                self.form.update_field(field, value);
            }
            BackendCommand::SubmitForm => {
                let status = self.form.submit().await;
                tracing::debug!(status = ?status, "submission attempt finished");
            }
            BackendCommand::FetchSubmissions => match self.submissions.fetch_all().await {
                Ok(records) => {
                    let _ = self.ui_tx.try_send(UiEvent::SubmissionsLoaded(records));
                }
                Err(err) => {
                    // The dashboard keeps whatever list it already has; the
                    // failure itself only reaches the log.
                    // TODO: surface fetch failures as a dashboard banner.
                    tracing::error!(error = %err, "failed to fetch submissions");
                    let _ = self.ui_tx.try_send(UiEvent::SubmissionsFetchFailed);
                }
            },
            BackendCommand::ApplyConfig { config } => {
                self.event_task.abort();
                let (form, submissions, event_task) =
                    build_clients(&self.ui_tx, &self.widget, config);
                self.form = form;
                self.submissions = submissions;
                self.event_task = event_task;
                let _ = self
                    .ui_tx
                    .try_send(UiEvent::Info("Endpoint configuration applied".to_string()));
            }
        }
    }
}

fn build_clients(
    ui_tx: &Sender<UiEvent>,
    widget: &ManualCaptchaWidget,
    config: ContactConfig,
) -> (
    ContactFormClient<ManualCaptchaWidget>,
    SubmissionsClient,
    JoinHandle<()>,
) {
    let submissions = SubmissionsClient::new(&config);
    let form = ContactFormClient::new(config, widget.clone());
    let mut events = form.subscribe_events();
    let ui_tx = ui_tx.clone();
    let event_task = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            let forwarded = match event {
                FormEvent::StatusChanged(status) => UiEvent::FormStatusChanged(status),
                FormEvent::ErrorsReplaced(errors) => UiEvent::FormErrorsReplaced(errors),
                FormEvent::ErrorCleared(field) => UiEvent::FormErrorCleared(field),
                FormEvent::FieldsReset => UiEvent::FormCleared,
            };
            let _ = ui_tx.try_send(forwarded);
        }
    });
    (form, submissions, event_task)
}
