use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use batikscan::acquisition::{
    CommandCamera, PathPicker, PermissionGate, PolicyPermissions, PromptPicker, RoutedPicker, StaticPermissions,
};
use batikscan::client::PredictClient;
use batikscan::run::{self, ConfigEdit, RunOptions};
use batikscan::screen::{AcquireOutcome, ScreenController, SubmitReport};
use batikscan::{cli, config, error, logging, terminal};
use batikscan_common::ImageSource;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Select;
use error::{BatikScanError, Result};

type Controller = ScreenController<Box<dyn PermissionGate>, RoutedPicker, PredictClient>;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Classify { image, json } => {
            let config = runtime_config(&cli.endpoint)?;
            let picker = RoutedPicker::new(PathPicker::new(Some(image)), camera_for(&config, None));
            let mut controller = build_controller(&config, cli.yes, picker, !json)?;
            let options = RunOptions {
                source: ImageSource::MediaLibrary,
                json,
                classify: true,
                bar_cells: config.bar_cells,
            };
            run_to_stdout(&mut controller, options).await
        }

        Commands::Capture { json, no_classify, output_dir } => {
            let config = runtime_config(&cli.endpoint)?;
            let picker = RoutedPicker::new(PathPicker::new(None), camera_for(&config, output_dir));
            let mut controller = build_controller(&config, cli.yes, picker, !json)?;
            let options = RunOptions {
                source: ImageSource::Camera,
                json,
                classify: !no_classify,
                bar_cells: config.bar_cells,
            };
            run_to_stdout(&mut controller, options).await
        }

        Commands::Screen => {
            let config = runtime_config(&cli.endpoint)?;
            let picker = RoutedPicker::new(PromptPicker, camera_for(&config, None));
            let mut controller = build_controller(&config, cli.yes, picker, true)?;
            run_screen(&mut controller, config.bar_cells).await?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Config { set_endpoint, set_camera_command, show } => {
            let edit = ConfigEdit {
                set_endpoint,
                set_camera_command,
                show,
            };
            run::run_config(&Config::config_path()?, edit, &mut std::io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 設定ファイル + 環境変数 + --endpoint
fn runtime_config(endpoint: &Option<String>) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

async fn run_to_stdout(controller: &mut Controller, options: RunOptions) -> Result<ExitCode> {
    let status = run::run_once(controller, options, &mut std::io::stdout(), &mut std::io::stderr()).await?;
    Ok(status.into())
}

fn camera_for(config: &Config, output_dir: Option<std::path::PathBuf>) -> CommandCamera {
    let dir = output_dir.unwrap_or_else(|| std::env::temp_dir().join("batikscan"));
    CommandCamera::new(config.camera_command.clone(), dir)
}

fn build_controller(config: &Config, assume_yes: bool, picker: RoutedPicker, spinner: bool) -> Result<Controller> {
    let permissions: Box<dyn PermissionGate> = if assume_yes {
        Box::new(StaticPermissions::granted())
    } else {
        Box::new(PolicyPermissions::from_config(config))
    };
    let client = PredictClient::from_config(config)?;
    tracing::debug!(endpoint = client.endpoint(), "client ready");

    let controller = ScreenController::new(permissions, picker, client);
    if !spinner {
        return Ok(controller);
    }

    let progress = Arc::new(Mutex::new(None));
    Ok(controller.with_busy_listener(move |busy| {
        let Ok(mut slot) = progress.lock() else { return };
        if busy {
            *slot = Some(terminal::spinner());
        } else if let Some(bar) = slot.take() {
            bar.finish_and_clear();
        }
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Upload,
    Camera,
    Classify,
    Quit,
}

async fn select_action(has_image: bool) -> Result<Action> {
    let mut actions = vec![(Action::Upload, "📤 Upload Gambar"), (Action::Camera, "📸 Ambil Foto")];
    if has_image {
        actions.push((Action::Classify, "🔍 Klasifikasikan"));
    }
    actions.push((Action::Quit, "Keluar"));

    let labels: Vec<&'static str> = actions.iter().map(|(_, label)| *label).collect();
    let index = tokio::task::spawn_blocking(move || Select::new().items(&labels[..]).default(0).interact())
        .await
        .map_err(|e| BatikScanError::Picker(e.to_string()))?
        .map_err(|e| BatikScanError::Picker(e.to_string()))?;
    Ok(actions[index].0)
}

async fn run_screen(controller: &mut Controller, bar_cells: usize) -> Result<()> {
    println!("BatikScan");
    println!("Klasifikasi Batik Nusantara\n");

    loop {
        let source = match select_action(controller.state().staged().is_some()).await? {
            Action::Upload => ImageSource::MediaLibrary,
            Action::Camera => ImageSource::Camera,
            Action::Classify => {
                match controller.submit().await {
                    SubmitReport::Completed(view) => println!("\n{}", terminal::render_result(&view, bar_cells)),
                    SubmitReport::Notice(notice) => eprintln!("{}", terminal::render_notice(&notice)),
                    SubmitReport::Skipped | SubmitReport::Stale => {}
                }
                continue;
            }
            Action::Quit => return Ok(()),
        };

        match controller.acquire(source).await {
            AcquireOutcome::Staged(staged) => println!("{}", terminal::render_preview(&staged.uri)),
            AcquireOutcome::Cancelled => {}
            AcquireOutcome::Notice(notice) => eprintln!("{}", terminal::render_notice(&notice)),
        }
    }
}
