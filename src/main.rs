// folio command-line entry point.
// Loads the page document, runs one page load (or a theme toggle), and writes the page back.

use tracing_subscriber::EnvFilter;

use folio::cache::{ExpiringCache, FileStorage};
use folio::fetch::FetchContext;
use folio::github::GitHubClient;
use folio::page::StaticPage;
use folio::{Config, FolioError, Portfolio, Result};

enum Command {
    Load,
    ToggleTheme,
}

impl Command {
    fn from_args() -> Result<Self> {
        match std::env::args().nth(1).as_deref() {
            None | Some("load") => Ok(Command::Load),
            Some("toggle-theme") => Ok(Command::ToggleTheme),
            Some(other) => Err(FolioError::Other(format!(
                "unknown command '{}' (expected 'load' or 'toggle-theme')",
                other
            ))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = Command::from_args()?;
    let config = Config::load()?;

    let client = GitHubClient::new(&config.api_base, config.token.as_deref())?;
    let storage = FileStorage::new(config.cache_dir());
    let cache = ExpiringCache::new(storage).default_ttl(config.cache_ttl());
    let mut portfolio = Portfolio::new(FetchContext::new(client, cache, config.username.clone()));

    let mut page = StaticPage::load_or_default(&config.page_path)?;

    match command {
        Command::Load => {
            let report = portfolio.on_load(&mut page).await;
            tracing::info!(
                stats = ?report.stats.status,
                activity = ?report.activity.status,
                page = %config.page_path.display(),
                "Page updated"
            );
        }
        Command::ToggleTheme => {
            let theme = portfolio.toggle_theme(&mut page);
            tracing::info!(%theme, "Theme switched");
        }
    }

    page.save(&config.page_path)?;
    Ok(())
}
