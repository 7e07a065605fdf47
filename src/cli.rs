// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for the booth
//!
//! This module provides command-line functionality for:
//! - Listing filters and cameras
//! - Capturing a still
//! - Running a full booth session (capture, filter, generate, save)

use photobooth::app::{Message, Photobooth, Step};
use photobooth::backends::camera::{Facing, V4l2Backend, v4l2};
use photobooth::capture::{CaptureAdapter, upload_from_file};
use photobooth::config::Config;
use photobooth::constants::file_formats::IMAGE_EXTENSIONS;
use photobooth::filters::{CATALOG, FilterId};
use photobooth::generation::GenerationClient;
use photobooth::media::EncodedImage;
use photobooth::output::{self, DesktopShare, ShareOutcome};
use photobooth::{fl, storage};
use std::path::{Path, PathBuf};

/// Options for [`run_booth`]
#[derive(Debug, Default)]
pub struct RunOptions {
    pub input: Option<PathBuf>,
    pub facing: Option<Facing>,
    pub filter: Option<FilterId>,
    pub output: Option<PathBuf>,
    pub print: bool,
    pub share: bool,
}

/// List the filter catalog in display order
pub fn list_filters() -> Result<(), Box<dyn std::error::Error>> {
    println!("Available filters:");
    println!();
    for definition in CATALOG.iter() {
        let id = definition.id;
        let marker = if id == FilterId::AFTER_CAPTURE {
            " (default)"
        } else {
            ""
        };
        println!("  {:<12} {}{}", id.as_str(), id.label(), marker);
        println!("      CSS: {}", id.css());
    }
    Ok(())
}

/// List all video capture devices
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = v4l2::enumerate_devices();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path: {}", camera.path);
        println!("      Driver: {}", camera.driver);
        if let Some(location) = &camera.camera_location {
            println!("      Location: {}", location);
        }
        println!();
    }

    Ok(())
}

/// Capture a single still and save it
pub fn capture_photo(
    facing: Option<Facing>,
    zoom: f32,
    torch: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let facing = facing.unwrap_or(config.default_facing);

    let mut adapter = open_camera(&config);
    let info = adapter.start(facing)?;
    println!(
        "Using camera: {} ({}x{} {})",
        info.device, info.width, info.height, info.pixel_format
    );

    let zoom = adapter.set_zoom(zoom);
    if zoom > 1.0 {
        println!("Zoom: {:.1}x", zoom);
    }
    if torch {
        if adapter.toggle_torch() {
            println!("Torch: on");
        } else {
            println!("Torch not available on this camera");
        }
    }

    println!("Capturing...");
    let image = adapter.capture()?;
    adapter.stop();

    let rt = tokio::runtime::Runtime::new()?;
    let path = rt.block_on(async {
        match output {
            Some(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| storage::result_file_name(&image));
                storage::save_as(&image, &dir, &name).await
            }
            None => storage::save_result(&image, &config.output_dir()).await,
        }
    })?;

    println!("Photo saved: {}", path.display());
    Ok(())
}

/// Run one booth session from capture to result
pub fn run_booth(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    println!("{}", fl!("app-title"));

    let client = GenerationClient::from_config(&config);
    if !client.has_credential() {
        tracing::warn!("No API key configured, generation will fail");
    }

    let Some(image) = obtain_image(&config, &options)? else {
        println!("No image selected.");
        return Ok(());
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut booth = Photobooth::new(client);
        booth.dispatch(Message::Start)?;
        booth.dispatch(Message::ImageObtained(image))?;
        if let Some(filter) = options.filter {
            booth.dispatch(Message::SelectFilter(filter))?;
        }
        println!("Filter: {}", booth.session().selected_filter().label());

        booth.dispatch(Message::Confirm)?;
        println!("Generating...");
        while booth.is_busy() {
            booth.next_event().await;
        }

        let result = match booth.session().step() {
            Step::Result { result, .. } => result.clone(),
            Step::Error { message } => return Err(message.clone().into()),
            other => return Err(format!("unexpected step: {}", other.kind()).into()),
        };

        let output_dir = options.output.clone().unwrap_or_else(|| config.output_dir());
        let path = storage::save_result(&result, &output_dir).await?;
        println!("Result saved: {}", path.display());

        if options.share {
            match output::share(&DesktopShare, Some(&result), &output_dir).await? {
                ShareOutcome::Shared => println!("Shared."),
                ShareOutcome::Saved { path, hint } => {
                    println!("{}", hint);
                    println!("Saved for sharing: {}", path.display());
                }
                ShareOutcome::Cancelled(reason) => println!("Share cancelled: {}", reason),
            }
        }

        if options.print {
            let page = output::print(Some(&result), &config.print).await?;
            println!("Print page: {}", page.display());
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn open_camera(config: &Config) -> CaptureAdapter<V4l2Backend> {
    CaptureAdapter::new(V4l2Backend::new(
        config.front_camera.clone(),
        config.back_camera.clone(),
    ))
}

/// Input file, else camera, else a file picker when the camera is unavailable
fn obtain_image(
    config: &Config,
    options: &RunOptions,
) -> Result<Option<EncodedImage>, Box<dyn std::error::Error>> {
    if let Some(path) = &options.input {
        return Ok(Some(upload_from_file(path)?));
    }

    let facing = options.facing.unwrap_or(config.default_facing);
    let mut adapter = open_camera(config);
    match adapter.start(facing) {
        Ok(info) => {
            println!("Using camera: {}", info.device);
            println!("Capturing...");
            let image = adapter.capture()?;
            adapter.stop();
            Ok(Some(image))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Camera unavailable");
            eprintln!("{}", fl!("camera-access-failed"));
            pick_upload()
        }
    }
}

fn pick_upload() -> Result<Option<EncodedImage>, Box<dyn std::error::Error>> {
    let picked = rfd::FileDialog::new()
        .set_title(fl!("camera-upload-fallback"))
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file();

    match picked {
        Some(path) => Ok(Some(upload_from_file(&path)?)),
        None => Ok(None),
    }
}
