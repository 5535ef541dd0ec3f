//! Application configuration and constants.

use std::path::PathBuf;

use clap::Parser;

use crate::catalog::DESCRIPTION_PREVIEW_CHARS;

pub struct Config {
    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    /// Modulo for animation frame counter
    pub animation_frame_mod: usize,

    /// Duration of the submit pulse in ticks
    pub send_animation_ticks: u8,

    /// Grid rows to scroll per key press
    pub scroll_step: usize,

    /// Characters of description shown on each card
    pub description_preview_chars: usize,

    /// Minimum card width in columns
    pub card_width: u16,

    /// Card height in rows, borders included
    pub card_height: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            animation_frame_mod: 360,
            send_animation_ticks: 20,
            scroll_step: 1,
            description_preview_chars: DESCRIPTION_PREVIEW_CHARS,
            card_width: 34,
            card_height: 8,
        }
    }
}

/// Resolved collaborator URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub catalog_url: String,
    pub recommend_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str, catalog_path: &str, recommend_path: &str) -> Self {
        Self {
            catalog_url: join_url(base_url, catalog_path),
            recommend_url: join_url(base_url, recommend_path),
        }
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Terminal movie catalog browser with AI recommendations.
#[derive(Debug, Parser)]
#[command(name = "catalog-tui")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the backend serving both endpoints.
    #[arg(long, default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Path of the catalog endpoint.
    #[arg(long, default_value = "/api/peliculas")]
    pub catalog_path: String,

    /// Path of the recommendation endpoint.
    #[arg(long, default_value = "/api/recomendaciones")]
    pub recommend_path: String,

    /// File receiving the log output (the terminal belongs to the UI).
    #[arg(long, default_value = "catalog-tui.log")]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.base_url, &self.catalog_path, &self.recommend_path)
    }
}

/// Keyboard hints shown in the footer
pub const KEY_HINTS: &[(&str, &str)] = &[
    ("Enter", "search"),
    ("Tab", "switch mode"),
    ("↑↓", "scroll"),
    ("Esc", "clear/quit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["catalog-tui"]);

        assert_eq!(cli.log_file, PathBuf::from("catalog-tui.log"));
        assert_eq!(
            cli.endpoints(),
            Endpoints {
                catalog_url: "http://localhost:3000/api/peliculas".to_string(),
                recommend_url: "http://localhost:3000/api/recomendaciones".to_string(),
            }
        );
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "catalog-tui",
            "--base-url",
            "https://movies.example.com/",
            "--catalog-path",
            "v2/movies",
            "--recommend-path",
            "/v2/recommend",
        ]);

        let endpoints = cli.endpoints();

        assert_eq!(endpoints.catalog_url, "https://movies.example.com/v2/movies");
        assert_eq!(endpoints.recommend_url, "https://movies.example.com/v2/recommend");
    }
}
