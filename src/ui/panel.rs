// src/ui/panel.rs
//! The sandbox control panel
//!
//! The panel never touches the scene directly. It draws from a
//! [`PanelSnapshot`] taken before the frame and returns the
//! [`PanelAction`]s the user triggered, which the app applies afterwards.

use std::collections::VecDeque;

use crate::{
    gfx::{helpers::HelperKind, scene::SceneStats},
    sandbox::{SandboxEvent, SandboxState},
};

const MAX_LOG_LINES: usize = 8;

/// Something the user asked for through the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    SetHelper(HelperKind, bool),
    ResetCamera,
}

/// Recent sandbox events shown at the bottom of the panel
#[derive(Debug, Default)]
pub struct EventLog {
    lines: VecDeque<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: &SandboxEvent) {
        if self.lines.len() == MAX_LOG_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(event.to_string());
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Owned copy of everything the panel displays
#[derive(Debug, Clone)]
pub struct PanelSnapshot {
    pub helpers: Vec<(HelperKind, bool)>,
    pub held: Option<String>,
    pub loading_model: bool,
    pub stats: SceneStats,
    pub log: Vec<String>,
}

impl PanelSnapshot {
    pub fn capture(sandbox: &SandboxState, log: &EventLog) -> Self {
        Self {
            helpers: HelperKind::ALL
                .iter()
                .map(|&kind| (kind, sandbox.helper_visible(kind)))
                .collect(),
            held: sandbox.held_object_name().map(str::to_owned),
            loading_model: sandbox.is_loading_model(),
            stats: sandbox.scene.get_stats(),
            log: log.lines().map(str::to_owned).collect(),
        }
    }

    /// Text for the status line
    pub fn status(&self) -> String {
        match &self.held {
            Some(name) => format!("Holding {name}: click to drop"),
            None => "Click an object to pick it up".to_string(),
        }
    }
}

/// Draws the panel and returns what the user changed this frame
pub fn sandbox_panel(ui: &imgui::Ui, snapshot: &PanelSnapshot) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return actions;
    }

    ui.window("Sandbox")
        .size([320.0, 0.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .always_auto_resize(true)
        .build(|| {
            ui.text(snapshot.status());
            if snapshot.loading_model {
                ui.text_disabled("Loading model...");
            }
            ui.separator();

            ui.text("Helpers");
            for (kind, visible) in &snapshot.helpers {
                let mut checked = *visible;
                if ui.checkbox(kind.label(), &mut checked) {
                    actions.push(PanelAction::SetHelper(*kind, checked));
                }
            }

            ui.separator();
            if ui.button("Reset camera") {
                actions.push(PanelAction::ResetCamera);
            }
            ui.text_disabled("Shift + C also resets the view");

            ui.separator();
            ui.text(format!(
                "Objects: {} ({} visible)",
                snapshot.stats.object_count, snapshot.stats.visible_objects
            ));
            ui.text(format!("Triangles: {}", snapshot.stats.total_triangles));

            if !snapshot.log.is_empty() {
                ui.separator();
                for line in &snapshot.log {
                    ui.text_wrapped(line);
                }
            }
        });

    actions
}
