use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use serde_json::{Map, Value};

use video_replay_core::camera::domain::camera::{Camera, ImageRequest, Reconfigurable};
use video_replay_core::camera::domain::config::{ComponentConfig, ReplayConfig};
use video_replay_core::camera::frame_provider::FrameProvider;
use video_replay_core::shared::constants::MODEL_TRIPLET;

/// Replays a video file through the replay camera and saves the frames it serves.
#[derive(Parser)]
#[command(name = "video-replay")]
struct Cli {
    /// Component configuration JSON file (`name`, `attributes.video_path`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Video file to replay, instead of --config.
    #[arg(long)]
    video_path: Option<PathBuf>,

    /// Component name used with --video-path.
    #[arg(long, default_value = "video-replay")]
    name: String,

    /// Number of images to request.
    #[arg(long, default_value = "5")]
    frames: usize,

    /// Delay between image requests, in milliseconds.
    #[arg(long, default_value = "1000")]
    interval_ms: u64,

    /// Directory the served JPEG frames are written to.
    #[arg(long, default_value = "output_frames")]
    output_dir: PathBuf,

    /// Print the camera properties as JSON and exit.
    #[arg(long)]
    properties: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = load_config(&cli)?;
    ReplayConfig::validate(&config.attributes)?;
    log::info!("Starting {} as {MODEL_TRIPLET}", config.name);

    let camera = FrameProvider::new(&config)?;

    if cli.properties {
        let properties = camera.get_properties(None)?;
        println!("{}", serde_json::to_string_pretty(&properties)?);
        return Ok(());
    }

    let result = replay(&camera, &cli.output_dir, cli.frames, cli.interval_ms);
    camera.close();
    result
}

fn replay(
    camera: &FrameProvider,
    output_dir: &Path,
    frames: usize,
    interval_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    for i in 0..frames {
        if i > 0 {
            thread::sleep(Duration::from_millis(interval_ms));
        }
        let image = camera.get_image(&ImageRequest::default())?;
        let path = output_dir.join(frame_file_name(i));
        fs::write(&path, &image.data)?;
        log::info!(
            "Saved {} (frame {}, {} bytes)",
            path.display(),
            camera.frame_index(),
            image.data.len()
        );
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    match (&cli.config, &cli.video_path) {
        (Some(_), Some(_)) => {
            return Err("--config and --video-path are mutually exclusive".into());
        }
        (None, None) => return Err("Either --config or --video-path is required".into()),
        _ => {}
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Config file not found: {}", config.display()).into());
        }
    }
    if !cli.properties && cli.frames == 0 {
        return Err("--frames must be at least 1".into());
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ComponentConfig, Box<dyn std::error::Error>> {
    match (&cli.config, &cli.video_path) {
        (Some(path), _) => {
            let json = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        (None, Some(video_path)) => Ok(config_for_video(&cli.name, video_path)),
        (None, None) => Err("Either --config or --video-path is required".into()),
    }
}

fn config_for_video(name: &str, video_path: &Path) -> ComponentConfig {
    let mut attributes = Map::new();
    attributes.insert(
        "video_path".to_string(),
        Value::String(video_path.to_string_lossy().into_owned()),
    );
    let mut config = ComponentConfig::new(name, attributes);
    config.model = Some(MODEL_TRIPLET.to_string());
    config
}

fn frame_file_name(i: usize) -> String {
    format!("frame_{i}.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("video-replay").chain(args.iter().copied()))
    }

    #[test]
    fn test_requires_a_source() {
        assert!(validate(&cli(&[])).is_err());
    }

    #[test]
    fn test_config_and_video_path_are_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, "{}").unwrap();
        let args = cli(&[
            "--config",
            config.to_str().unwrap(),
            "--video-path",
            "/v.mp4",
        ]);
        assert!(validate(&args).is_err());
    }

    #[test]
    fn test_zero_frames_rejected() {
        assert!(validate(&cli(&["--video-path", "/v.mp4", "--frames", "0"])).is_err());
        let properties_only = cli(&["--video-path", "/v.mp4", "--frames", "0", "--properties"]);
        assert!(validate(&properties_only).is_ok());
    }

    #[test]
    fn test_missing_config_file_rejected() {
        assert!(validate(&cli(&["--config", "/nonexistent/config.json"])).is_err());
    }

    #[test]
    fn test_video_path_builds_config() {
        let args = cli(&["--video-path", "/data/out.mp4", "--name", "cam"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.name, "cam");
        assert_eq!(config.model.as_deref(), Some("bill:video:replay"));
        let replay = ReplayConfig::from_attributes(&config.attributes).unwrap();
        assert_eq!(replay.video_path, PathBuf::from("/data/out.mp4"));
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"name": "replay-cam", "attributes": {"video_path": "/data/clip.mov"}}"#,
        )
        .unwrap();

        let config = load_config(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.name, "replay-cam");
        assert_eq!(config.attributes["video_path"], "/data/clip.mov");
    }

    #[test]
    fn test_config_file_without_video_path_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"name": "replay-cam", "attributes": {}}"#).unwrap();

        let config = load_config(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        let err = ReplayConfig::validate(&config.attributes).unwrap_err();
        assert!(err.to_string().ends_with("video_path"));
    }

    #[test]
    fn test_frame_file_name() {
        assert_eq!(frame_file_name(0), "frame_0.jpg");
        assert_eq!(frame_file_name(12), "frame_12.jpg");
    }
}
