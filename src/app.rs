use std::collections::HashMap;
use std::path::PathBuf;

use crate::{
    error::PrismError,
    gateway::{Gateway, HttpGateway, DEFAULT_GATEWAY_URL},
    partition::GroupId,
    session::ExperimentSession,
};
use anyhow::Result;
use eframe::egui::{self, menu, Ui};

/// A blocking notification. Rendered as a modal window until dismissed.
#[derive(Debug, Clone)]
struct Notice {
    title: String,
    text: String,
}

/// Mutations requested by widgets during a frame. They are queued while the
/// widgets borrow the session for rendering and applied once the frame is
/// built, so every widget of the next frame re-derives its contents from
/// post-mutation state instead of being patched in place.
#[derive(Debug, Clone)]
enum PendingAction {
    OpenExperiment(PathBuf),
    CreateGroup(String),
    AssignSample(GroupId, String),
    DeleteGroup(GroupId),
    Submit,
}

pub struct PrismGroupsApp {
    gateway: Box<dyn Gateway>,
    session: Option<ExperimentSession>,
    pool_selection: Option<String>,
    group_selections: HashMap<GroupId, String>,
    pending: Vec<PendingAction>,
    notice: Option<Notice>,
}

impl PrismGroupsApp {
    pub fn new(gateway_url: Option<&str>) -> Result<Self> {
        let gateway = HttpGateway::new(gateway_url.unwrap_or(DEFAULT_GATEWAY_URL))?;
        Ok(Self::with_gateway(Box::new(gateway)))
    }

    pub fn with_gateway(gateway: Box<dyn Gateway>) -> Self {
        Self {
            gateway,
            session: None,
            pool_selection: None,
            group_selections: HashMap::new(),
            pending: Vec::new(),
            notice: None,
        }
    }

    pub fn session(&self) -> Option<&ExperimentSession> {
        self.session.as_ref()
    }

    fn render_menu_bar(&mut self, ui: &mut Ui) {
        menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open experiment…").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_file() {
                        self.pending.push(PendingAction::OpenExperiment(path));
                    }
                }
            });
        });
    }

    fn render_central(&mut self, ui: &mut Ui) {
        let Some(session) = &self.session else {
            ui.label("Open an experiment file to begin assigning sample groups.");
            return;
        };

        ui.heading(session.name());
        ui.separator();

        Self::render_pool_row(ui, session, &mut self.pool_selection, &mut self.pending);

        for group in session.partition().groups() {
            ui.add_space(4.0);
            ui.group(|ui| {
                Self::render_group_panel(
                    ui,
                    session,
                    group.id(),
                    &mut self.group_selections,
                    &mut self.pending,
                );
            });
        }

        ui.separator();
        ui.horizontal(|ui| {
            if session.partition().is_complete() {
                ui.label("All samples assigned.");
            } else {
                ui.label(format!(
                    "{} sample(s) unassigned",
                    session.partition().unassigned_count()
                ));
            }
            // Always clickable: an early submit is reported as an
            // incomplete partition rather than silently ignored.
            if ui.button("Submit").clicked() {
                self.pending.push(PendingAction::Submit);
            }
        });
    }

    /// The "samples not yet assigned" selector plus group creation. Options
    /// are re-derived from the pool every frame.
    fn render_pool_row(
        ui: &mut Ui,
        session: &ExperimentSession,
        pool_selection: &mut Option<String>,
        pending: &mut Vec<PendingAction>,
    ) {
        let pooled = session.partition().pooled_names();
        Self::sanitize_selection(pool_selection, &pooled);

        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("pool_select")
                .selected_text(pool_selection.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for name in &pooled {
                        ui.selectable_value(pool_selection, Some(name.to_string()), *name);
                    }
                });
            let button = egui::Button::new("Create New Sample Group");
            if ui.add_enabled(pool_selection.is_some(), button).clicked() {
                if let Some(name) = pool_selection.clone() {
                    pending.push(PendingAction::CreateGroup(name));
                }
            }
        });
    }

    fn render_group_panel(
        ui: &mut Ui,
        session: &ExperimentSession,
        group_id: GroupId,
        group_selections: &mut HashMap<GroupId, String>,
        pending: &mut Vec<PendingAction>,
    ) {
        let Some(group) = session.partition().group(group_id) else {
            return;
        };
        let pooled = session.partition().pooled_names();

        let mut selection = group_selections.get(&group_id).cloned();
        Self::sanitize_selection(&mut selection, &pooled);

        ui.horizontal(|ui| {
            ui.label(format!("{}:", group.control()));
            egui::ComboBox::from_id_salt(("group_select", group_id))
                .selected_text(selection.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for name in &pooled {
                        ui.selectable_value(&mut selection, Some(name.to_string()), *name);
                    }
                });
            let button = egui::Button::new("Add Sample To Group");
            if ui.add_enabled(selection.is_some(), button).clicked() {
                if let Some(name) = selection.clone() {
                    pending.push(PendingAction::AssignSample(group_id, name));
                }
            }
            if ui.button("Delete Sample Group").clicked() {
                pending.push(PendingAction::DeleteGroup(group_id));
            }
        });

        for name in group.experimental() {
            ui.label(format!("• {name}"));
        }

        match selection {
            Some(name) => {
                group_selections.insert(group_id, name);
            }
            None => {
                group_selections.remove(&group_id);
            }
        }
    }

    /// A selection is only ever a currently pooled name; anything else
    /// (consumed by another widget, cleared by a reset) falls back to the
    /// first pooled option.
    fn sanitize_selection(selection: &mut Option<String>, pooled: &[&str]) {
        let valid = selection
            .as_deref()
            .is_some_and(|name| pooled.contains(&name));
        if !valid {
            *selection = pooled.first().map(|name| name.to_string());
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let mut dismissed = false;
        if let Some(notice) = &self.notice {
            egui::Window::new(notice.title.clone())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&notice.text);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
        }
        if dismissed {
            self.notice = None;
        }
    }

    fn apply_pending(&mut self) {
        let pending: Vec<PendingAction> = self.pending.drain(..).collect();
        for action in pending {
            self.apply_action(action);
        }
    }

    /// Runs one queued mutation to completion. Failures surface as a notice
    /// and leave the session untouched.
    fn apply_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::OpenExperiment(path) => match self.gateway.upload(&path) {
                Ok(uploaded) => {
                    // Full reset: a new catalog invalidates every prior
                    // group and selection.
                    self.session = Some(ExperimentSession::from_upload(uploaded));
                    self.pool_selection = None;
                    self.group_selections.clear();
                }
                Err(e) => self.show_error("Upload failed", &e),
            },
            PendingAction::CreateGroup(name) => {
                let Some(session) = &mut self.session else {
                    return;
                };
                if let Err(e) = session.partition_mut().create_group(&name) {
                    self.show_error("Could not create sample group", &e);
                }
            }
            PendingAction::AssignSample(group_id, name) => {
                let Some(session) = &mut self.session else {
                    return;
                };
                if let Err(e) = session.partition_mut().assign_sample(group_id, &name) {
                    self.show_error("Could not add sample", &e);
                }
            }
            PendingAction::DeleteGroup(group_id) => {
                let Some(session) = &mut self.session else {
                    return;
                };
                match session.partition_mut().delete_group(group_id) {
                    Ok(()) => {
                        self.group_selections.remove(&group_id);
                    }
                    Err(e) => self.show_error("Could not delete sample group", &e),
                }
            }
            PendingAction::Submit => {
                let Some(session) = &self.session else {
                    return;
                };
                match session.build_submission() {
                    Ok(payload) => match self.gateway.submit(&payload) {
                        Ok(confirmation) => self.show_notice("Submitted", &confirmation),
                        Err(e) => self.show_error("Submission failed", &e),
                    },
                    Err(e) => self.show_error("Cannot submit", &e),
                }
            }
        }
    }

    fn show_notice(&mut self, title: &str, text: &str) {
        self.notice = Some(Notice {
            title: title.to_string(),
            text: text.to_string(),
        });
    }

    fn show_error(&mut self, title: &str, err: &PrismError) {
        eprintln!("{title}: {err}");
        self.show_notice(title, &err.to_string());
    }
}

impl eframe::App for PrismGroupsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_central(ui);
            });
        });

        self.render_notice(ctx);

        // Mutations queued by this frame's widgets run now, to completion,
        // one at a time; the next frame re-derives everything from state.
        self.apply_pending();
    }
}
