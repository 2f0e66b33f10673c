//! `search`: one extraction run with the result printed to stdout.

use std::path::PathBuf;

use clap::Args;
use menucrawl_core::{
    resolve_site_profile, AppConfig, DataSource, RestaurantsEnvelope, SearchRequest,
};
use menucrawl_scraper::{collect_restaurants, ChromeLauncher, MenuPipeline};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Location typed into the site's autocomplete
    #[arg(long)]
    pub location: Option<String>,

    /// Cuisine or dish to filter on
    #[arg(long)]
    pub query: Option<String>,

    /// Maximum number of restaurants
    #[arg(long)]
    pub restaurants: Option<usize>,

    /// Maximum number of menu items per restaurant
    #[arg(long)]
    pub items: Option<usize>,

    /// Overrides MENUCRAWL_DATA_SOURCE (live, synthetic, fallback)
    #[arg(long)]
    pub source: Option<DataSource>,

    /// Site profile to use instead of MENUCRAWL_SITE_PROFILE_PATH
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl SearchArgs {
    /// Missing or zero values fall back to the request defaults.
    pub fn to_request(&self) -> SearchRequest {
        SearchRequest::new(
            self.location.clone().unwrap_or_default(),
            self.query.clone().unwrap_or_default(),
            self.restaurants.unwrap_or(0),
            self.items.unwrap_or(0),
        )
    }
}

pub async fn run(args: &SearchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let source = args.source.unwrap_or(config.data_source);
    let profile_path = args.profile.as_deref().or(config.site_profile_path.as_deref());
    let profile = resolve_site_profile(profile_path)?;
    let pipeline = MenuPipeline::new(ChromeLauncher::new(config.browser.clone()), profile)?;
    let request = args.to_request();

    let restaurants = match collect_restaurants(&pipeline, source, &request).await {
        Ok(restaurants) => restaurants,
        Err(e) => {
            tracing::error!(error = %e, %source, "search failed");
            return Err(e.into());
        }
    };

    println!(
        "{}",
        render(&RestaurantsEnvelope { restaurants }, args.pretty)?
    );
    Ok(())
}

pub fn render(envelope: &RestaurantsEnvelope, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(envelope)
    } else {
        serde_json::to_string(envelope)
    }
}
