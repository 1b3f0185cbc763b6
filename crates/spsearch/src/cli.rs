//! Command line definitions and dispatch

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::render::render_hierarchy;
use clap::{Args, Parser, Subcommand};
use eol_api::{ClassicClient, CypherClient, Page, SearchOptions, TraitFilter};
use gbif_api::{GbifClient, GbifSpecies, SpeciesDetail};
use inaturalist_api::{InatClient, TaxaQuery};
use redlist_api::{RedListCategory, RedListClient, Species};
use redlist_codes::{Dictionaries, Domain, NameDictionary, TableFormat};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "spsearch", version, about = "Search species across biodiversity databases")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// IUCN Red List lookups
    #[command(subcommand)]
    Redlist(RedlistCommand),

    /// GBIF backbone lookups
    #[command(subcommand)]
    Gbif(GbifCommand),

    /// iNaturalist taxa search
    #[command(subcommand)]
    Inat(InatCommand),

    /// Encyclopedia of Life search and traits
    #[command(subcommand)]
    Eol(EolCommand),

    /// Convert a Japanese name to its scientific name
    Ja2sci {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RedlistCommand {
    /// Show a species' assessment summary
    Species {
        name: String,
        /// Also accept synonyms of the accepted name
        #[arg(long)]
        synonym: bool,
    },
    /// Show a species' habitats
    Habitats(ClassificationArgs),
    /// Show a species' threats
    Threats(ClassificationArgs),
    /// Show a species' conservation measures
    Measures(ClassificationArgs),
    /// List species assessed under a category (e.g. CR, LR/lc)
    Category {
        category: String,
    },
    /// List species occurring in a country (two-letter ISO code)
    Country {
        iso2: String,
    },
    /// Show the API version
    Version,
}

#[derive(Debug, Args)]
pub struct ClassificationArgs {
    /// Scientific name, a synonym, or a Japanese name in the ja2sci dictionary
    pub name: String,

    /// Translate titles into this language when a dictionary entry exists
    #[arg(long)]
    pub lang: Option<String>,

    /// Only show entries under this dotted code, e.g. 5.4
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum GbifCommand {
    /// Backbone record of a species: rank, status and classification
    Species { name: String },
    /// Accepted name and every synonym of a species
    Synonyms { name: String },
}

#[derive(Debug, Subcommand)]
pub enum InatCommand {
    /// Search taxa by name prefix
    Taxa {
        q: String,
        /// Only active taxa
        #[arg(long)]
        active: bool,
        /// 70 kingdom .. 10 species, 5 subspecies
        #[arg(long)]
        rank_level: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
        /// Locale for common names
        #[arg(long)]
        locale: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EolCommand {
    /// Search EOL pages
    Search {
        q: String,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Exact title, synonym or common name match
        #[arg(long)]
        exact: bool,
    },
    /// List the traits of a page
    Traits {
        page_id: u64,
        /// Only traits of this category (predicate name)
        #[arg(long)]
        category: Option<String>,
    },
}

impl Cli {
    pub async fn run(self, config: &Config) -> Result<()> {
        match self.command {
            Command::Redlist(command) => command.run(config).await,
            Command::Gbif(command) => command.run(config).await,
            Command::Inat(command) => command.run(config).await,
            Command::Eol(command) => command.run(config).await,
            Command::Ja2sci { name } => {
                let dictionary = NameDictionary::load(&config.ja2sci_path)?;
                let scientific = dictionary
                    .convert(&name)
                    .ok_or_else(|| CliError::NotFound(format!("{} is not in the dictionary", name)))?;
                println!("{}", scientific);
                Ok(())
            }
        }
    }
}

impl RedlistCommand {
    async fn run(self, config: &Config) -> Result<()> {
        let client = RedListClient::with_timeout(config.require_redlist_token()?, config.http_timeout)?;

        match self {
            Self::Species { name, synonym } => {
                let name = resolve_name(config, &name);
                let species = if synonym {
                    client.species_by_synonym(&name).await?
                } else {
                    client.species_by_name(&name).await?
                };
                print_species(&species)
            }
            Self::Habitats(args) => show_classification(&client, config, Domain::Habitat, args).await,
            Self::Threats(args) => show_classification(&client, config, Domain::Threat, args).await,
            Self::Measures(args) => {
                show_classification(&client, config, Domain::ConservationMeasure, args).await
            }
            Self::Category { category } => {
                let category: RedListCategory = category.parse()?;
                for species in client.species_by_category(category).await? {
                    println!("{}\t{}", species.taxonid, species);
                }
                Ok(())
            }
            Self::Country { iso2 } => {
                for species in client.species_by_country(&iso2).await? {
                    println!("{}\t{}", species.taxonid, species);
                }
                Ok(())
            }
            Self::Version => {
                println!("{}", client.version().await?);
                Ok(())
            }
        }
    }
}

/// Swap a Japanese name for its scientific name when the dictionary knows it
fn resolve_name(config: &Config, name: &str) -> String {
    if name.is_ascii() || !config.ja2sci_path.is_file() {
        return name.to_string();
    }
    match NameDictionary::load(&config.ja2sci_path) {
        Ok(dictionary) => match dictionary.convert(name) {
            Some(scientific) => {
                debug!(name, scientific, "Resolved Japanese name");
                scientific.to_string()
            }
            None => name.to_string(),
        },
        Err(e) => {
            debug!(error = %e, "ja2sci dictionary unavailable");
            name.to_string()
        }
    }
}

fn print_species(species: &Species) -> Result<()> {
    println!("{} (id={})", species, species.taxonid);
    for synonym in &species.synonyms {
        println!("  synonym: {}", synonym.synonym);
    }
    if let Some(info) = &species.info {
        println!("{}", serde_json::to_string_pretty(info)?);
    }
    Ok(())
}

async fn show_classification(
    client: &RedListClient,
    config: &Config,
    domain: Domain,
    args: ClassificationArgs,
) -> Result<()> {
    let name = resolve_name(config, &args.name);
    let species = client.species_by_synonym(&name).await?;
    info!(species = %species, taxonid = species.taxonid, "Fetching {}", domain.label());

    let hierarchy = client.classification_for(domain, species.taxonid).await?;
    let hierarchy = match &args.branch {
        Some(path) => hierarchy.at_path(path)?,
        None => hierarchy,
    };

    let dictionaries = match &args.lang {
        Some(_) => Dictionaries::load(&config.dictionary_dir, TableFormat::TAB)?,
        None => Dictionaries::default(),
    };

    println!("{}", species);
    print!("{}", render_hierarchy(&hierarchy, &dictionaries, args.lang.as_deref()));
    Ok(())
}

impl GbifCommand {
    async fn run(self, config: &Config) -> Result<()> {
        let client = GbifClient::with_timeout(config.http_timeout)?;
        match self {
            Self::Species { name } => {
                let species = gbif_species(&client, config, &name).await?;
                let detail = client
                    .get_species(species.key)
                    .await?
                    .ok_or_else(|| CliError::NotFound(format!("no GBIF record for {}", species)))?;
                print!("{}", describe_gbif_species(&species, &detail));
                Ok(())
            }
            Self::Synonyms { name } => {
                let species = gbif_species(&client, config, &name).await?;
                for synonym in client.synonym_names(&species).await? {
                    println!("{}", synonym);
                }
                Ok(())
            }
        }
    }
}

async fn gbif_species(client: &GbifClient, config: &Config, name: &str) -> Result<GbifSpecies> {
    let name = resolve_name(config, name);
    client
        .species_by_name(&name)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("{} not found in GBIF", name)))
}

fn describe_gbif_species(species: &GbifSpecies, detail: &SpeciesDetail) -> String {
    let mut out = match &detail.scientific_name {
        Some(name) => format!("{} (key={})\n", name, species.key),
        None => format!("{}\n", species),
    };
    if let Some(rank) = &detail.rank {
        out.push_str(&format!("  rank: {}\n", rank));
    }
    if let Some(status) = &detail.taxonomic_status {
        out.push_str(&format!("  status: {}\n", status));
    }
    let lineage = detail.lineage();
    if !lineage.is_empty() {
        out.push_str(&format!("  lineage: {}\n", lineage.join(" > ")));
    }
    out
}

impl InatCommand {
    async fn run(self, config: &Config) -> Result<()> {
        let client = InatClient::with_timeout(config.http_timeout)?;
        match self {
            Self::Taxa {
                q,
                active,
                rank_level,
                per_page,
                locale,
            } => {
                let query = TaxaQuery {
                    is_active: active.then_some(true),
                    rank_level,
                    per_page,
                    locale,
                    ..TaxaQuery::new(q)
                };
                for taxon in client.taxa(&query).await? {
                    println!(
                        "{}\t{}\t{}\t{}",
                        taxon.id,
                        taxon.rank.as_deref().unwrap_or(""),
                        taxon.name.as_deref().unwrap_or(""),
                        taxon.preferred_common_name.as_deref().unwrap_or("")
                    );
                }
                Ok(())
            }
        }
    }
}

impl EolCommand {
    async fn run(self, config: &Config) -> Result<()> {
        match self {
            Self::Search { q, limit, exact } => {
                let client = ClassicClient::with_base_url(ClassicClient::BASE_URL, config.http_timeout)?;
                let options = SearchOptions {
                    exact: exact.then_some(true),
                    ..SearchOptions::default()
                };
                for result in client.search(&q, limit, &options).await? {
                    println!("{}\t{}", result.id, result.title.as_deref().unwrap_or(""));
                }
                Ok(())
            }
            Self::Traits { page_id, category } => {
                let client = CypherClient::with_endpoint(
                    config.require_eol_token()?,
                    CypherClient::ENDPOINT,
                    config.http_timeout,
                )?;
                let page = Page::from_id(&client, page_id).await?;
                let filter = category.map(TraitFilter::by_name);
                for t in page.traits(&client, filter.as_ref()).await? {
                    println!("{}", t);
                }
                Ok(())
            }
        }
    }
}
