//! Command-line arguments for the E2E harness binary

use std::path::PathBuf;

use clap::Parser;

use crate::playwright::Browser;

#[derive(Parser, Debug)]
#[command(name = "inveniordm-e2e")]
#[command(about = "Browser E2E scenario runner for an InvenioRDM repository")]
pub struct Args {
    /// Base URL of the target instance
    #[arg(long, default_value = "https://inveniordm.web.cern.ch")]
    pub base_url: String,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long, default_value = "chromium")]
    pub browser: Browser,

    /// Run in headless mode; pass `--headless false` to run headed
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub headless: bool,

    /// Viewport width (desktop layout needs >= 1500)
    #[arg(long, default_value = "1500")]
    pub viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "1080")]
    pub viewport_height: u32,

    /// Local file uploaded as record content
    #[arg(long, default_value = "tests/data/test_example.txt")]
    pub fixture: PathBuf,

    /// Preflight timeout in seconds
    #[arg(long, default_value = "30")]
    pub preflight_timeout_secs: u64,

    /// Output directory for results and screenshots
    #[arg(short, long, default_value = "test-results")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_target_instance() {
        let args = Args::try_parse_from(["e2e"]).unwrap();
        assert_eq!(args.base_url, "https://inveniordm.web.cern.ch");
        assert_eq!(args.browser, Browser::Chromium);
        assert!(args.headless);
        assert_eq!(args.viewport_width, 1500);
        assert_eq!(args.viewport_height, 1080);
    }

    #[test]
    fn headless_can_be_switched_off() {
        let args = Args::try_parse_from(["e2e", "--headless", "false"]).unwrap();
        assert!(!args.headless);

        let args = Args::try_parse_from(["e2e", "--headless", "true"]).unwrap();
        assert!(args.headless);
    }

    #[test]
    fn browser_choice_is_parsed() {
        let args = Args::try_parse_from(["e2e", "--browser", "firefox"]).unwrap();
        assert_eq!(args.browser, Browser::Firefox);

        assert!(Args::try_parse_from(["e2e", "--browser", "edge"]).is_err());
    }
}
