//! App shell: contact form screen, admin dashboard screen, settings window.

use arboard::Clipboard;
use chrono::{DateTime, Local, TimeZone};
use contact_core::{ContactConfig, ManualCaptchaWidget, ValidationErrors};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{FormField, SubmissionId, SubmissionStatus},
    protocol::SubmissionRecord,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{StatusBanner, StatusBannerSeverity, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

pub const SETTINGS_STORAGE_KEY: &str = "smart_contact_form.settings";

const ERROR_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(217, 98, 98);
const SUCCESS_TEXT_COLOR: egui::Color32 = egui::Color32::from_rgb(87, 171, 90);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppViewState {
    Form,
    Admin,
}

/// Endpoint settings persisted through eframe storage between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedGuiSettings {
    pub api_url: String,
    pub site_key: String,
}

impl Default for PersistedGuiSettings {
    fn default() -> Self {
        Self::from_config(&ContactConfig::default())
    }
}

impl PersistedGuiSettings {
    fn from_config(config: &ContactConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            site_key: config.site_key.clone(),
        }
    }

    fn to_config(&self) -> ContactConfig {
        ContactConfig::new(self.api_url.clone(), self.site_key.clone())
    }
}

pub struct ContactApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view_state: AppViewState,

    // Form screen. The text buffers mirror the backend's form state; edits
    // stream to the worker one field at a time.
    name: String,
    email: String,
    subject: String,
    message: String,
    errors: ValidationErrors,
    submission_status: SubmissionStatus,
    widget: ManualCaptchaWidget,

    // Admin screen.
    submissions: Vec<SubmissionRecord>,
    submissions_loading: bool,
    selected_submission: Option<SubmissionId>,

    status: String,
    status_banner: Option<StatusBanner>,
    settings_open: bool,
    settings_draft: PersistedGuiSettings,
    applied_settings: PersistedGuiSettings,
}

impl ContactApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        widget: ManualCaptchaWidget,
        startup_config: ContactConfig,
        persisted_settings: Option<PersistedGuiSettings>,
    ) -> Self {
        let applied_settings = PersistedGuiSettings::from_config(&startup_config);
        let mut app = Self {
            cmd_tx,
            ui_rx,
            view_state: AppViewState::Form,
            name: String::new(),
            email: String::new(),
            subject: String::new(),
            message: String::new(),
            errors: ValidationErrors::new(),
            submission_status: SubmissionStatus::Idle,
            widget,
            submissions: Vec::new(),
            submissions_loading: false,
            selected_submission: None,
            status: "Backend worker starting...".to_string(),
            status_banner: None,
            settings_open: false,
            settings_draft: applied_settings.clone(),
            applied_settings,
        };

        // Settings saved from the in-app window win over the launch
        // environment.
        if let Some(persisted) = persisted_settings {
            if persisted != app.applied_settings {
                app.settings_draft = persisted.clone();
                app.apply_settings(persisted);
            }
        }

        app
    }

    fn apply_settings(&mut self, settings: PersistedGuiSettings) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::ApplyConfig {
                config: settings.to_config(),
            },
            &mut self.status,
        );
        self.applied_settings = settings;
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    self.status = format!("{} error: {}", err.label(), err.message());
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: err.message().to_string(),
                    });
                }
                UiEvent::FormStatusChanged(status) => {
                    self.submission_status = status;
                    match status {
                        SubmissionStatus::Loading => {
                            self.status = "Sending message...".to_string();
                        }
                        SubmissionStatus::Success => {
                            self.status = "Message delivered".to_string();
                        }
                        SubmissionStatus::Error => {
                            self.status = "Message delivery failed".to_string();
                        }
                        SubmissionStatus::Idle => {}
                    }
                }
                UiEvent::FormErrorsReplaced(errors) => {
                    self.errors = errors;
                }
                UiEvent::FormErrorCleared(field) => {
                    self.errors.remove(&field);
                }
                UiEvent::FormCleared => {
                    self.name.clear();
                    self.email.clear();
                    self.subject.clear();
                    self.message.clear();
                }
                UiEvent::SubmissionsLoaded(records) => {
                    self.submissions_loading = false;
                    if let Some(selected) = self.selected_submission {
                        if !records.iter().any(|record| record.id == selected) {
                            self.selected_submission = None;
                        }
                    }
                    self.submissions = records;
                }
                UiEvent::SubmissionsFetchFailed => {
                    self.submissions_loading = false;
                }
            }
        }
    }

    fn submit_form(&mut self) {
        self.status_banner = None;
        dispatch_backend_command(&self.cmd_tx, BackendCommand::SubmitForm, &mut self.status);
    }

    fn refresh_submissions(&mut self) {
        self.submissions_loading = true;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchSubmissions,
            &mut self.status,
        );
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Smart Contact Form").strong().size(16.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.settings_open = !self.settings_open;
                    }
                    match self.view_state {
                        AppViewState::Form => {
                            if ui.button("🔐 Admin").clicked() {
                                self.view_state = AppViewState::Admin;
                                self.refresh_submissions();
                            }
                        }
                        AppViewState::Admin => {
                            if ui.button("← Form").clicked() {
                                self.view_state = AppViewState::Form;
                            }
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
        }
    }

    fn show_outcome_banner(&self, ui: &mut egui::Ui) {
        match self.submission_status {
            SubmissionStatus::Success => {
                ui.colored_label(SUCCESS_TEXT_COLOR, "✅ Message sent! We'll be in touch soon.");
            }
            SubmissionStatus::Error => {
                ui.colored_label(
                    ERROR_TEXT_COLOR,
                    "❌ Something went wrong. Please try again.",
                );
            }
            SubmissionStatus::Idle | SubmissionStatus::Loading => {}
        }
    }

    fn show_form_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(440.0, 620.0);
            let top_space = (avail.y * 0.06).clamp(8.0, 48.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(top_space);
                ui.vertical_centered(|ui| {
                    ui.set_width(card_width);

                    egui::Frame::NONE
                        .fill(ui.visuals().faint_bg_color.gamma_multiply(0.55))
                        .corner_radius(14.0)
                        .stroke(egui::Stroke::new(
                            1.0,
                            ui.visuals().widgets.noninteractive.bg_stroke.color,
                        ))
                        .inner_margin(egui::Margin::symmetric(20, 18))
                        .show(ui, |ui| {
                            ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);

                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new("💬").size(24.0));
                                ui.vertical(|ui| {
                                    ui.heading("Contact Us");
                                    ui.weak(
                                        "Fill out the form below and we'll get back to you \
                                         within 24 hours.",
                                    );
                                });
                            });

                            ui.add_space(4.0);
                            self.show_status_banner(ui);
                            self.show_outcome_banner(ui);

                            let name_changed = labeled_text_field(
                                ui,
                                "Full Name *",
                                "John Doe",
                                &mut self.name,
                                self.errors.get(&FormField::Name),
                                false,
                            );
                            if name_changed {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::UpdateField {
                                        field: FormField::Name,
                                        value: self.name.clone(),
                                    },
                                    &mut self.status,
                                );
                            }

                            let email_changed = labeled_text_field(
                                ui,
                                "Email Address *",
                                "john@example.com",
                                &mut self.email,
                                self.errors.get(&FormField::Email),
                                false,
                            );
                            if email_changed {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::UpdateField {
                                        field: FormField::Email,
                                        value: self.email.clone(),
                                    },
                                    &mut self.status,
                                );
                            }

                            let subject_changed = labeled_text_field(
                                ui,
                                "Subject *",
                                "How can we help?",
                                &mut self.subject,
                                self.errors.get(&FormField::Subject),
                                false,
                            );
                            if subject_changed {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::UpdateField {
                                        field: FormField::Subject,
                                        value: self.subject.clone(),
                                    },
                                    &mut self.status,
                                );
                            }

                            let message_changed = labeled_text_field(
                                ui,
                                "Message *",
                                "Tell us more...",
                                &mut self.message,
                                self.errors.get(&FormField::Message),
                                true,
                            );
                            if message_changed {
                                dispatch_backend_command(
                                    &self.cmd_tx,
                                    BackendCommand::UpdateField {
                                        field: FormField::Message,
                                        value: self.message.clone(),
                                    },
                                    &mut self.status,
                                );
                            }

                            ui.add_space(4.0);
                            self.show_captcha_widget(ui);

                            ui.add_space(6.0);
                            let sending = self.submission_status == SubmissionStatus::Loading;
                            let label = if sending { "Sending..." } else { "Send Message" };
                            let button =
                                egui::Button::new(egui::RichText::new(label).strong().size(16.0))
                                    .min_size(egui::vec2(ui.available_width(), 40.0));
                            if ui.add_enabled(!sending, button).clicked() {
                                self.submit_form();
                            }
                        });
                });
                ui.add_space(top_space);
            });
        });
    }

    fn show_captcha_widget(&mut self, ui: &mut egui::Ui) {
        egui::Frame::NONE
            .fill(ui.visuals().faint_bg_color.gamma_multiply(0.8))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                let mut checked = self.widget.is_complete();
                if ui.checkbox(&mut checked, "I'm not a robot").changed() {
                    if checked {
                        self.widget.complete();
                    } else {
                        self.widget.clear();
                    }
                }
                ui.small(
                    egui::RichText::new(format!(
                        "protected by site key {}",
                        self.applied_settings.site_key
                    ))
                    .weak(),
                );
            });
        if let Some(error) = self.errors.get(&FormField::Recaptcha) {
            ui.colored_label(ERROR_TEXT_COLOR, error);
        }
    }

    fn show_admin_screen(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("admin_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Admin Dashboard");
                ui.weak(format!("{} total submissions", self.submissions.len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("← Back to Form").clicked() {
                        self.view_state = AppViewState::Form;
                    }
                    if ui.button("🔄 Refresh").clicked() {
                        self.refresh_submissions();
                    }
                });
            });
            ui.add_space(6.0);
        });

        egui::SidePanel::left("submissions_list")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                if self.submissions_loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading submissions...");
                    });
                    return;
                }
                if self.submissions.is_empty() {
                    ui.weak("No submissions yet.");
                    return;
                }

                let mut clicked = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for record in &self.submissions {
                        let selected = self.selected_submission == Some(record.id);
                        let row = format!(
                            "{}\n{}\n{}",
                            record.name,
                            record.subject,
                            format_submission_date(&record.timestamp.with_timezone(&Local)),
                        );
                        if ui.selectable_label(selected, row).clicked() {
                            clicked = Some(record.id);
                        }
                        ui.separator();
                    }
                });
                if let Some(id) = clicked {
                    self.selected_submission = Some(id);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(6.0);
            let record = self
                .selected_submission
                .and_then(|id| self.submissions.iter().find(|record| record.id == id))
                .cloned();
            let Some(record) = record else {
                ui.weak("Select a submission to view details");
                return;
            };

            ui.heading(&record.subject);
            ui.add_space(4.0);
            detail_row(ui, "Name", &record.name);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Email").strong());
                ui.label(&record.email);
                if ui.small_button("Copy").clicked() {
                    if let Ok(mut clipboard) = Clipboard::new() {
                        let _ = clipboard.set_text(record.email.clone());
                    }
                    self.status = "Email address copied to clipboard".to_string();
                }
            });
            detail_row(ui, "Subject", &record.subject);
            detail_row(
                ui,
                "Date",
                &format_submission_date(&record.timestamp.with_timezone(&Local)),
            );
            ui.separator();
            ui.label(egui::RichText::new("Message").strong());
            egui::ScrollArea::vertical()
                .id_salt("submission_message")
                .show(ui, |ui| {
                    ui.label(&record.message);
                });
        });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }

        let mut settings_open = self.settings_open;
        let mut close_requested = false;
        let mut apply_requested = false;

        egui::Window::new("Settings")
            .open(&mut settings_open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Collection endpoint").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_draft.api_url)
                        .desired_width(320.0),
                );
                ui.label(egui::RichText::new("Widget site key").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_draft.site_key)
                        .desired_width(320.0),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let dirty = self.settings_draft != self.applied_settings;
                    if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
                        apply_requested = true;
                    }
                    if ui.button("Close").clicked() {
                        close_requested = true;
                    }
                });
                ui.small(
                    egui::RichText::new("Applying rebuilds the backend clients with the new endpoint.")
                        .weak(),
                );
            });

        if apply_requested {
            self.apply_settings(self.settings_draft.clone());
        }
        self.settings_open = settings_open && !close_requested;
    }
}

impl eframe::App for ContactApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        match self.view_state {
            AppViewState::Form => self.show_form_screen(ctx),
            AppViewState::Admin => self.show_admin_screen(ctx),
        }
        self.show_settings_window(ctx);

        if self.submission_status == SubmissionStatus::Loading || self.submissions_loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.applied_settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

fn labeled_text_field(
    ui: &mut egui::Ui,
    label: &str,
    hint: &str,
    value: &mut String,
    error: Option<&String>,
    multiline: bool,
) -> bool {
    ui.label(egui::RichText::new(label).strong());
    let hint_text =
        egui::RichText::new(hint).color(ui.visuals().weak_text_color().gamma_multiply(0.85));
    let response = if multiline {
        ui.add_sized(
            [ui.available_width(), 96.0],
            egui::TextEdit::multiline(value).hint_text(hint_text).desired_rows(4),
        )
    } else {
        ui.add_sized(
            [ui.available_width(), 34.0],
            egui::TextEdit::singleline(value)
                .hint_text(hint_text)
                .desired_width(f32::INFINITY),
        )
    };
    if let Some(error) = error {
        ui.colored_label(ERROR_TEXT_COLOR, error);
    }
    response.changed()
}

fn detail_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(label).strong());
        ui.label(value);
    });
}

/// Dashboard timestamp rendering, e.g. "05 Mar 2025, 14:30".
fn format_submission_date<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.format("%d %b %Y, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_submission_dates_for_the_dashboard() {
        let timestamp = Utc
            .with_ymd_and_hms(2025, 3, 5, 14, 30, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(format_submission_date(&timestamp), "05 Mar 2025, 14:30");
    }

    #[test]
    fn persisted_settings_default_to_builtin_config() {
        let settings = PersistedGuiSettings::default();
        assert_eq!(settings.api_url, "https://placeholder.api/contact");
        assert_eq!(settings.site_key, "your-site-key-here");
    }

    #[test]
    fn persisted_settings_round_trip_through_storage_json() {
        let settings = PersistedGuiSettings {
            api_url: "https://api.example.com/contact".to_string(),
            site_key: "live-key".to_string(),
        };
        let serialized = serde_json::to_string(&settings).expect("serialize settings");
        let restored: PersistedGuiSettings =
            serde_json::from_str(&serialized).expect("restore settings");
        assert_eq!(restored, settings);
    }
}
