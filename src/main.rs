use clap::{Parser, Subcommand};
use pokemon_companion::cache::{spawn_sweeper, TtlCache};
use pokemon_companion::config::CompanionConfig;
use pokemon_companion::search::filters::SearchFilters;
use pokemon_companion::search::query_string::SearchParams;
use pokemon_companion::search::sort::{SortBy, SortOrder};
use pokemon_companion::{
    run_battle, CompanionResult, Notifier, PokeApiClient, Pokedex, PokemonType, RosterMember,
    SearchEngine, SearchSession,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Search creatures, look up evolutions and run quick battles
#[derive(Parser, Debug)]
#[command(name = "pokemon-companion")]
#[command(version)]
struct Args {
    /// RON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search by name, or filter by type and generation
    Search {
        /// Name substring; filters are ignored when given
        query: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        types: Vec<PokemonType>,
        #[arg(long = "generation", value_name = "N")]
        generations: Vec<u8>,
        /// A saved query string, e.g. "types=fire&min_speed=90"
        #[arg(long, conflicts_with_all = ["query", "types", "generations"])]
        params: Option<String>,
        #[arg(long, default_value = "id")]
        sort: SortBy,
        #[arg(long)]
        desc: bool,
        /// Extra pages to load after the first
        #[arg(long, default_value = "0")]
        more: usize,
    },
    /// Battle two creatures by id
    Battle {
        first: u32,
        second: u32,
        /// Fixed seed for a repeatable battle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the evolution chain of a creature
    Evolution { id: u32 },
}

#[tokio::main]
async fn main() -> CompanionResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pokemon_companion=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = CompanionConfig::load(args.config.as_deref())?;
    debug!(?config, "configuration loaded");

    let source = Arc::new(PokeApiClient::from_config(&config.upstream)?);
    let cache = Arc::new(TtlCache::with_batch_size(
        config.cache.default_ttl(),
        config.cache.batch_size,
    ));
    let _sweeper = spawn_sweeper(&cache, config.cache.sweep_interval());
    let pokedex = Arc::new(Pokedex::with_cache(source, cache, config.cache.clone()));

    let preload = {
        let pokedex = Arc::clone(&pokedex);
        tokio::spawn(async move { pokedex.preload_featured().await })
    };

    match args.command {
        Command::Search {
            query,
            types,
            generations,
            params,
            sort,
            desc,
            more,
        } => {
            let params = match params {
                Some(raw) => SearchParams::from_query_string(&raw)?,
                None => {
                    let mut filters = SearchFilters::default();
                    types.into_iter().for_each(|t| filters.toggle_type(t));
                    generations.into_iter().for_each(|g| filters.toggle_generation(g));
                    SearchParams {
                        query: query.unwrap_or_default(),
                        filters,
                        offset: 0,
                    }
                }
            };
            let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
            search(&pokedex, &config, params, sort, order, more).await;
        }
        Command::Battle {
            first,
            second,
            seed,
        } => {
            let first = pokedex.creature(first).await?;
            let first = RosterMember::with_default_moves(Arc::unwrap_or_clone(first));
            let second = pokedex.creature(second).await?;
            let second = RosterMember::with_default_moves(Arc::unwrap_or_clone(second));
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let (notifier, mut notices) = Notifier::channel();
            let report = run_battle(&first, &second, &config.battle, rng, &notifier, |line| {
                println!("{line}")
            })
            .await;
            debug!(turns = report.total_turns, "battle report ready");
            while let Ok(notice) = notices.try_recv() {
                info!(title = %notice.title, "{}", notice.message);
            }
        }
        Command::Evolution { id } => match pokedex.evolution_chain_for(id).await {
            Some(chain) => {
                let stages: Vec<String> = chain
                    .stages()
                    .iter()
                    .map(|stage| stage.join(" / "))
                    .collect();
                println!("{}", stages.join(" -> "));
            }
            None => println!("No evolution data for #{id}"),
        },
    }

    if preload.is_finished() {
        if let Ok(loaded) = preload.await {
            debug!(loaded, "featured creatures preloaded");
        }
    } else {
        preload.abort();
    }
    let stats = pokedex.cache_stats();
    debug!(
        size = stats.size,
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        "cache stats"
    );
    Ok(())
}

async fn search(
    pokedex: &Arc<Pokedex>,
    config: &CompanionConfig,
    params: SearchParams,
    sort: SortBy,
    order: SortOrder,
    more: usize,
) {
    let engine = Arc::new(SearchEngine::new(Arc::clone(pokedex), config.search.clone()));
    let (notifier, mut notices) = Notifier::channel();
    let mut session = SearchSession::new(engine, notifier);

    session.restore(params).await;
    for _ in 0..more {
        if !session.state().has_more {
            break;
        }
        session.load_more().await;
    }
    session.set_sort(sort, order);

    for creature in session.sorted_items() {
        let types: Vec<&str> = creature.types.iter().map(|t| t.name()).collect();
        println!(
            "#{:<4} {:<16} {:<16} {}",
            creature.id,
            creature.name,
            types.join("/"),
            creature.total_stats()
        );
    }

    let state = session.state();
    println!(
        "{} of {} shown{}",
        state.items.len(),
        state.total_results,
        if state.has_more { ", more available" } else { "" }
    );
    println!("share: {}", session.params().to_url_path());

    while let Ok(notice) = notices.try_recv() {
        info!(level = %notice.level, title = %notice.title, "{}", notice.message);
    }
}
