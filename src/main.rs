use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swefreq_portal::models::{AccessRequest, BeaconQuery, Country, VariantSource};
use swefreq_portal::navigation::{DatasetSubpage, NavLinks, Route};
use swefreq_portal::{Config, Portal, PortalError, Result};

/// Client a riga di comando per il portale SweFreq
#[derive(Parser, Debug)]
#[command(name = "swefreq-portal", version, about)]
struct Cli {
    /// Backend base URL, overrides SWEFREQ_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show who the backend thinks we are
    Me,
    /// List the dataset catalog
    Datasets,
    /// Load a dataset page (identity, dataset, files)
    Dataset {
        dataset: String,
        #[arg(long)]
        version: Option<String>,
        /// Log that the data-use terms were viewed
        #[arg(long)]
        accept_terms: bool,
    },
    /// List the versions of a dataset
    Versions {
        dataset: String,
        /// Version to flag as active
        #[arg(long)]
        active: Option<String>,
    },
    /// List downloadable files
    Files {
        dataset: String,
        #[arg(long)]
        version: Option<String>,
        /// Record a download in the audit log
        #[arg(long)]
        log_download: bool,
    },
    /// List the countries accepted by the request form
    Countries,
    /// Request access to a dataset
    Request(RequestArgs),
    /// Show the users of a dataset (admin)
    Roster {
        dataset: String,
        /// Only print the newsletter subscribers
        #[arg(long)]
        newsletter: bool,
    },
    /// Approve a pending user (admin)
    Approve { dataset: String, email: String },
    /// Revoke a user's access (admin)
    Revoke { dataset: String, email: String },
    /// Ask the beacon whether a variant is present
    Beacon(BeaconArgs),
    /// Variant browser lookups
    Browser {
        dataset: String,
        #[arg(long)]
        version: Option<String>,
        #[command(subcommand)]
        lookup: BrowserLookup,
    },
    /// Cookie consent banner
    Consent {
        #[command(subcommand)]
        action: ConsentAction,
    },
    /// Resolve a portal path to its view
    Route { path: String },
}

#[derive(Args, Debug)]
struct RequestArgs {
    dataset: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    affiliation: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    newsletter: bool,
}

#[derive(Args, Debug)]
struct BeaconArgs {
    dataset: String,
    chromosome: String,
    /// 1-based position
    position: u64,
    reference_allele: String,
    allele: String,
    /// Reference genome; defaults to the first one the beacon serves for the dataset
    #[arg(long)]
    reference: Option<String>,
}

#[derive(Subcommand, Debug)]
enum BrowserLookup {
    /// Resolve a gene, transcript, region or variant name
    Search { query: String },
    /// Gene names completing a prefix
    Autocomplete { query: String },
    Transcript { id: String },
    /// Region as chrom-start-stop
    Region { region: String },
    /// Variants of a gene, region or transcript
    Variants {
        source: VariantSource,
        item: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConsentAction {
    Show,
    Accept,
}

#[tokio::main]
async fn main() {
    // Carica variabili d'ambiente da .env
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swefreq_portal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        // 2: il backend o la rete hanno fallito, 1: errore locale
        std::process::exit(if e.is_remote() { 2 } else { 1 });
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env();
    if let Some(url) = cli.base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    let portal = Portal::new(config)?;

    let outcome = match cli.command {
        Command::Me => print_json(&portal.session().current_identity().await?),
        Command::Datasets => print_json(&portal.datasets().list_datasets().await?),
        Command::Dataset {
            dataset,
            version,
            accept_terms,
        } => {
            let page = portal.load_dataset_page(&dataset, version.as_deref()).await;
            if accept_terms {
                match page.terms_consent_log(&portal) {
                    Some(log) => {
                        log.consented().await;
                    }
                    None => tracing::warn!("Dataset non risolto, consenso non registrato"),
                }
            }
            print_json(&page.view())
        }
        Command::Versions { dataset, active } => print_json(
            &portal
                .datasets()
                .list_versions(&dataset, active.as_deref())
                .await?,
        ),
        Command::Files {
            dataset,
            version,
            log_download,
        } => {
            let files = portal
                .datasets()
                .list_files(&dataset, version.as_deref())
                .await?;
            if log_download {
                portal.audit().log_download().await;
            }
            print_json(&files)
        }
        Command::Countries => print_json(&portal.access_requests().countries().await?),
        Command::Request(args) => request_access(&portal, args).await,
        Command::Roster {
            dataset,
            newsletter,
        } => {
            let roster = portal.roster().load_roster(&dataset).await?;
            if newsletter {
                print_json(&roster.newsletter_emails())
            } else {
                print_json(&roster)
            }
        }
        Command::Approve { dataset, email } => {
            print_json(&portal.roster().approve(&dataset, &email).await?)
        }
        Command::Revoke { dataset, email } => {
            print_json(&portal.roster().revoke(&dataset, &email).await?)
        }
        Command::Beacon(args) => beacon_query(&portal, args).await,
        Command::Browser {
            dataset,
            version,
            lookup,
        } => browse(&portal, &dataset, version.as_deref(), lookup).await,
        Command::Consent { action } => {
            let banner = portal.consent_banner();
            if let ConsentAction::Accept = action {
                if banner.set_consent()? {
                    portal.audit().log_consent().await;
                }
            }
            print_json(&json!({ "consented": banner.is_consented() }))
        }
        Command::Route { path } => print_route(&path),
    };

    // I cookie ricevuti vengono salvati in background: scrive lo stato finale
    if let Err(e) = portal.cookies().flush() {
        tracing::warn!("Impossibile salvare i cookie: {}", e);
    }
    outcome
}

async fn request_access(portal: &Portal, args: RequestArgs) -> Result<()> {
    let page = portal.load_dataset_page(&args.dataset, None).await;
    if let Some(error) = &page.error {
        return Err(PortalError::NotFound(error.clone()));
    }

    let form = AccessRequest {
        email: args.email,
        display_name: args.name,
        affiliation: args.affiliation,
        country: Country { name: args.country },
        subscribe_newsletter: args.newsletter,
    };

    portal
        .access_requests()
        .submit_request(&args.dataset, &form, form.is_complete(), &page.tracker)
        .await?;

    print_json(&json!({ "authorization_level": page.authorization_level() }))
}

async fn beacon_query(portal: &Portal, args: BeaconArgs) -> Result<()> {
    let reference_genome = match args.reference {
        Some(reference) => reference,
        None => portal
            .beacon()
            .get_beacon_references(&args.dataset)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                PortalError::NotFound(format!(
                    "Nessun genoma di riferimento per {}",
                    args.dataset
                ))
            })?,
    };

    let record = portal
        .beacon()
        .query(BeaconQuery {
            chromosome: args.chromosome,
            position: args.position,
            allele: args.allele,
            reference_allele: args.reference_allele,
            reference_genome,
            dataset_id: args.dataset,
        })
        .await?;

    print_json(&record)
}

async fn browse(
    portal: &Portal,
    dataset: &str,
    version: Option<&str>,
    lookup: BrowserLookup,
) -> Result<()> {
    let browser = portal.browser();
    match lookup {
        BrowserLookup::Search { query } => {
            let hit = browser.search(dataset, version, &query).await?;
            let link = hit
                .browser_target()
                .map(|target| NavLinks::new(dataset, version).browser_link(&target));
            print_json(&json!({ "result": hit, "link": link }))
        }
        BrowserLookup::Autocomplete { query } => {
            print_json(&browser.autocomplete(dataset, version, &query).await?)
        }
        BrowserLookup::Transcript { id } => {
            print_json(&browser.transcript(dataset, version, &id).await?)
        }
        BrowserLookup::Region { region } => {
            print_json(&browser.region(dataset, version, &region).await?)
        }
        BrowserLookup::Variants { source, item } => {
            print_json(&browser.variants(dataset, version, source, &item).await?)
        }
    }
}

fn print_route(path: &str) -> Result<()> {
    let route = Route::parse(path);
    let mut out = json!({ "route": &route, "template": route.template() });

    if let Route::Dataset {
        dataset, version, ..
    } = &route
    {
        let links = NavLinks::new(dataset, version.as_deref());
        out["links"] = json!({
            "main": links.create_url(DatasetSubpage::Main, None),
            "terms": links.create_url(DatasetSubpage::Terms, None),
            "download": links.create_url(DatasetSubpage::Download, None),
            "beacon": links.create_url(DatasetSubpage::Beacon, None),
            "admin": links.create_url(DatasetSubpage::Admin, None),
        });
    }

    print_json(&out)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
