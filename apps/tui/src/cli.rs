use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "worklog-admin", version, about = "Work-record admin dashboard")]
pub struct CliArgs {
    /// Load once, print statistics and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Statistics API endpoint
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Use the built-in sample dataset even when an API URL is configured
    #[arg(long)]
    pub offline: bool,

    /// Number of work records requested per load
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<u32>,

    /// Log file used by the terminal UI
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    /// Flags win over the environment and `.env`.
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("ADMIN_API_URL", url);
        }
        if self.offline {
            std::env::set_var("ADMIN_OFFLINE", "1");
        }
        if let Some(page_size) = self.page_size {
            std::env::set_var("ADMIN_PAGE_SIZE", page_size.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("ADMIN_LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::parse_from([
            "worklog-admin",
            "--headless",
            "--json",
            "--offline",
            "--api-url",
            "http://localhost:9000/adminWeb",
            "--page-size",
            "20",
            "--log-file",
            "/tmp/admin.log",
        ]);
        assert!(args.headless && args.json && args.offline);
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:9000/adminWeb"));
        assert_eq!(args.page_size, Some(20));
        assert_eq!(args.log_file.as_deref(), Some("/tmp/admin.log"));
    }
}
