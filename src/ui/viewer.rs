use crate::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};

/// Read-only window over one project file, opened from `/files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileViewer {
    pub name: String,
    pub content: String,
}

/// Returns false once the window was closed.
pub fn show(ctx: &egui::Context, theme: &Theme, viewer: &FileViewer) -> bool {
    let mut open = true;
    let mut close_clicked = false;
    egui::Window::new(RichText::new(&viewer.name).monospace())
        .id(egui::Id::new("file_viewer"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([720.0, 520.0])
        .show(ctx, |ui| {
            ScrollArea::both()
                .id_salt("file_viewer_content")
                .max_height(ui.available_height() - 36.0)
                .show(ui, |ui| {
                    theme.code_frame().show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        ui.label(RichText::new(&viewer.content).monospace());
                    });
                });
            ui.separator();
            close_clicked = ui.button("Close").clicked();
        });
    open && !close_clicked
}
