use std::process::ExitCode;
use std::sync::Arc;

use nightscout_segment::env::{FileCache, Properties, SegmentEnv};
use nightscout_segment::nightscout::NightscoutSegment;
use nightscout_segment::nightscout::config::URL;
use tracing_subscriber::EnvFilter;

/// Default location of the on-disk cache.
const DEFAULT_CACHE_PATH: &str = "nightscout_cache.json";

fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for the segment text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Segment properties from an optional JSON file
    let mut props = match std::env::var("NIGHTSCOUT_SEGMENT_CONFIG") {
        Ok(path) => match Properties::from_path(&path) {
            Ok(props) => props,
            Err(e) => {
                eprintln!("Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => Properties::new(),
    };

    if let Ok(url) = std::env::var("NIGHTSCOUT_URL") {
        props.set(URL, url);
    }

    if props.get_string(URL, "").is_empty() {
        eprintln!("Warning: no Nightscout URL set (NIGHTSCOUT_URL or \"url\" in the config).");
        return ExitCode::SUCCESS;
    }

    let cache_path =
        std::env::var("NIGHTSCOUT_CACHE_PATH").unwrap_or_else(|_| DEFAULT_CACHE_PATH.to_string());
    let env = SegmentEnv::with_cache(Arc::new(FileCache::new(cache_path)));

    let mut segment = NightscoutSegment::new(env);
    segment.init(&props);

    if segment.enabled() {
        println!("{}", segment.string());
    }

    ExitCode::SUCCESS
}
