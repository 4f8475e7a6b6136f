use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use batikscan_common::{validate_asset, ImageSource, Notice, PickedAsset, ResultView};
use eframe::egui::{self, Color32, RichText};

use crate::io::{capture_with_cli, classify_with_cli, load_preview_pixels, resolve_cli_binary};
use crate::model::{AppState, UiMessage};

const BACKGROUND: Color32 = Color32::from_rgb(0xF5, 0xEB, 0xDD);
const BROWN: Color32 = Color32::from_rgb(0x6E, 0x42, 0x2A);
const ACCENT: Color32 = Color32::from_rgb(0xB0, 0x5E, 0x27);
const SUCCESS: Color32 = Color32::from_rgb(0x28, 0xA7, 0x45);
const PREVIEW_SIZE: f32 = 250.0;

pub struct DesktopApp {
    state: AppState,
    cli: PathBuf,
    preview: Option<(String, egui::TextureHandle)>,
    status: String,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            cli: resolve_cli_binary(),
            preview: None,
            status: String::new(),
            tx,
            rx,
        }
    }
}

/// バーの塗りつぶし幅（クランプしない）
fn bar_fill_width(track_width: f32, percent: f64) -> f32 {
    track_width * (percent / 100.0) as f32
}

impl DesktopApp {
    fn request_image(&mut self, source: ImageSource) {
        match self.state.permissions.get(source) {
            Some(true) => self.launch_picker(source),
            Some(false) => self.state.notice = Some(Notice::PermissionDenied),
            None => self.state.pending_permission = Some(source),
        }
    }

    fn answer_permission(&mut self, granted: bool) {
        let Some(source) = self.state.pending_permission.take() else {
            return;
        };
        self.state.permissions.set(source, granted);
        if granted {
            self.launch_picker(source);
        } else {
            self.state.notice = Some(Notice::PermissionDenied);
        }
    }

    fn launch_picker(&mut self, source: ImageSource) {
        match source {
            ImageSource::MediaLibrary => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Gambar", &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"])
                    .add_filter("Semua file", &["*"])
                    .pick_file();
                if let Some(path) = picked {
                    self.accept_asset(PickedAsset::new(path.display().to_string()));
                }
            }
            ImageSource::Camera => {
                if self.state.capturing {
                    return;
                }
                self.state.capturing = true;
                let cli = self.cli.clone();
                let tx = self.tx.clone();
                std::thread::spawn(move || {
                    let result = capture_with_cli(&cli).map_err(|e| e.to_string());
                    let _ = tx.send(UiMessage::CaptureDone(result));
                });
            }
        }
    }

    fn accept_asset(&mut self, asset: PickedAsset) {
        match validate_asset(&asset) {
            Ok(staged) => {
                let uri = staged.local_path().to_string();
                self.state.screen.stage_image(staged);
                self.preview = None;
                self.load_preview(uri);
            }
            Err(_) => self.state.notice = Some(Notice::UnsupportedFormat),
        }
    }

    fn load_preview(&self, uri: String) {
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            if let Ok((size, pixels)) = load_preview_pixels(&uri, PREVIEW_SIZE as u32 * 2) {
                let _ = tx.send(UiMessage::PreviewLoaded { uri, size, pixels });
            }
        });
    }

    fn classify(&mut self) {
        let Some(ticket) = self.state.screen.begin_submit() else {
            return;
        };
        let cli = self.cli.clone();
        let tx = self.tx.clone();
        let image = ticket.image.clone();
        self.state.in_flight = Some(ticket);
        self.status = "Classify running...".to_string();

        std::thread::spawn(move || {
            let result = classify_with_cli(&cli, &image).map_err(|e| e.to_string());
            let _ = tx.send(UiMessage::ClassifyDone(result));
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::CaptureDone(result) => {
                    self.state.capturing = false;
                    match result {
                        Ok(Some(asset)) => self.accept_asset(asset),
                        Ok(None) => self.status = "Capture cancelled".to_string(),
                        Err(err) => self.status = format!("Capture failed: {err}"),
                    }
                }
                UiMessage::ClassifyDone(result) => {
                    self.status = self.state.finish_classify(result);
                }
                UiMessage::PreviewLoaded { uri, size, pixels } => {
                    let current = self.state.screen.staged().map(|s| s.local_path() == uri).unwrap_or(false);
                    if current && size[0] > 0 && size[1] > 0 {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
                        let texture = ctx.load_texture(&uri, color_image, egui::TextureOptions::default());
                        self.preview = Some((uri, texture));
                    }
                }
            }
        }
    }

    fn custom_button(ui: &mut egui::Ui, title: &str, enabled: bool) -> bool {
        let button = egui::Button::new(RichText::new(title).color(Color32::WHITE).strong().size(14.0))
            .fill(BROWN)
            .rounding(egui::Rounding::same(8.0))
            .min_size(egui::vec2(0.0, 36.0));
        ui.add_enabled(enabled, button).clicked()
    }

    fn render_preview(&mut self, ui: &mut egui::Ui) {
        let Some(staged) = self.state.screen.staged() else {
            return;
        };
        ui.add_space(20.0);
        let frame = egui::Frame::none()
            .stroke(egui::Stroke::new(2.0, ACCENT))
            .rounding(egui::Rounding::same(12.0));
        frame.show(ui, |ui| {
            let size = egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE);
            match &self.preview {
                Some((_, texture)) => {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size).rounding(12.0));
                }
                None => {
                    ui.allocate_ui_with_layout(size, egui::Layout::centered_and_justified(egui::Direction::LeftToRight), |ui| {
                        ui.label(staged.uri.as_str());
                    });
                }
            }
        });
        ui.label(RichText::new("Preview Gambar").italics().color(BROWN));
        ui.add_space(10.0);
        if Self::custom_button(ui, "🔍 Klasifikasikan", self.state.screen.can_submit()) {
            self.classify();
        }
    }

    fn render_result(&self, ui: &mut egui::Ui, view: &ResultView) {
        ui.add_space(20.0);
        egui::Frame::none()
            .fill(Color32::from_rgb(0xE6, 0xFF, 0xED))
            .stroke(egui::Stroke::new(1.0, SUCCESS))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(15.0))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("✅ Hasil Klasifikasi:").color(SUCCESS).strong().size(16.0));
                    ui.label(RichText::new(&view.headline).strong().size(20.0));
                });
            });

        ui.add_space(20.0);
        egui::Frame::none()
            .fill(Color32::WHITE)
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(15.0))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📊 Probabilitas Tiap Kelas:").strong().size(16.0));
                });
                ui.add_space(10.0);
                for row in &view.rows {
                    ui.horizontal(|ui| {
                        let label_width = ui.available_width() * 0.4;
                        ui.add_sized([label_width, 18.0], egui::Label::new(RichText::new(&row.label).size(14.0)));

                        let track_width = (ui.available_width() - 70.0).max(10.0);
                        let (rect, _) = ui.allocate_exact_size(egui::vec2(track_width, 10.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 5.0, Color32::from_gray(0xDD));
                        let fill = egui::Rect::from_min_size(
                            rect.min,
                            egui::vec2(bar_fill_width(track_width, row.bar_width), rect.height()),
                        );
                        ui.painter().rect_filled(fill, 0.0, ACCENT);

                        ui.label(RichText::new(&row.percent).size(12.0));
                    });
                    ui.add_space(6.0);
                }
            });
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(source) = self.state.pending_permission {
            let prompt = match source {
                ImageSource::MediaLibrary => "Izinkan BatikScan mengakses galeri?",
                ImageSource::Camera => "Izinkan BatikScan mengakses kamera?",
            };
            let mut answer = None;
            egui::Window::new("Izin")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(prompt);
                    ui.horizontal(|ui| {
                        if ui.button("Izinkan").clicked() {
                            answer = Some(true);
                        }
                        if ui.button("Tolak").clicked() {
                            answer = Some(false);
                        }
                    });
                });
            if let Some(granted) = answer {
                self.answer_permission(granted);
            }
        }

        if let Some(notice) = self.state.notice {
            let mut close = false;
            egui::Window::new(notice.title())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(notice.message());
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.state.notice = None;
            }
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.screen.is_busy() || self.state.capturing {
            ctx.request_repaint();
        }
        self.poll_messages(ctx);

        // ダイアログ表示中は画面操作を止める
        let modal = self.state.notice.is_some() || self.state.pending_permission.is_some();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND).inner_margin(egui::Margin::same(20.0)))
            .show(ctx, |ui| {
                ui.add_enabled_ui(!modal, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            let top = if self.state.screen.staged().is_some() { 20.0 } else { ui.available_height() * 0.35 };
                            ui.add_space(top);
                            ui.label(RichText::new("BatikScan").size(28.0).strong().color(BROWN));
                            ui.label(RichText::new("Klasifikasi Batik Nusantara").italics().size(16.0).color(ACCENT));
                            ui.add_space(20.0);

                            ui.horizontal(|ui| {
                                if Self::custom_button(ui, "📤 Upload Gambar", true) {
                                    self.request_image(ImageSource::MediaLibrary);
                                }
                                if Self::custom_button(ui, "📸 Ambil Foto", !self.state.capturing) {
                                    self.request_image(ImageSource::Camera);
                                }
                            });

                            self.render_preview(ui);

                            if self.state.screen.is_busy() {
                                ui.add_space(20.0);
                                ui.add(egui::Spinner::new().size(32.0).color(ACCENT));
                                ui.label(RichText::new("Mengklasifikasi Gambar...").color(BROWN));
                            }

                            if let Some(result) = self.state.screen.result() {
                                let view = ResultView::from_result(result);
                                self.render_result(ui, &view);
                            }

                            if !self.status.is_empty() {
                                ui.add_space(10.0);
                                ui.label(RichText::new(&self.status).size(11.0).color(Color32::from_gray(110)));
                            }
                        });
                    });
                });
            });

        self.render_dialogs(ctx);
    }
}
