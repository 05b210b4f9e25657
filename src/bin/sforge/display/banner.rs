use std::io::{self, Write};
use std::sync::LazyLock;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER_ART: &str = r#"
      ▗▄▄▖▗▖ ▗▖ ▗▄▖ ▗▄▄▖ ▗▄▄▄▖    ▗▄▄▄▖ ▗▄▖ ▗▄▄▖  ▗▄▄▖▗▄▄▄▖
     ▐▌   ▐▌ ▐▌▐▌ ▐▌▐▌ ▐▌▐▌       ▐▌   ▐▌ ▐▌▐▌ ▐▌▐▌   ▐▌
      ▝▀▚▖▐▛▀▜▌▐▛▀▜▌▐▛▀▘ ▐▛▀▀▘    ▐▛▀▀▘▐▌ ▐▌▐▛▀▚▖▐▌▝▜▌▐▛▀▀▘
     ▗▄▄▞▘▐▌ ▐▌▐▌ ▐▌▐▌   ▐▙▄▄▖    ▐▌   ▝▚▄▞▘▐▌ ▐▌▝▚▄▞▘▐▙▄▄▖

   ───────────────────────────────────────────────────────────
      globularity  ·  planarity  ·  rotatable bonds  ·  amines
   ───────────────────────────────────────────────────────────
   "#;

static HELP_BANNER: LazyLock<String> = LazyLock::new(|| format!("\n{BANNER_ART}"));

pub fn banner_for_help() -> &'static str {
    &HELP_BANNER
}

pub fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "\n{BANNER_ART}\n");
    let _ = writeln!(
        stderr,
        "   Conformer-Averaged Shape Descriptors               v{VERSION}\n"
    );
}
