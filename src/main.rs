use anyhow::{Context, Result, anyhow};
use clap::Parser;
use epochset::{
    config::PoolConfig,
    pool::VisitedPool,
    sets::visited::{HashVisitedSet, UncompressedSet},
    statistics::Stats,
    workload::{TraceParams, run_pooled_traversals, run_traversals},
};
use serde::Serialize;
use std::{fs::File, io::BufWriter, path::PathBuf, thread, time::Instant};
use tqdm::tqdm;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Benchmark of visited-set strategies for graph traversals
#[derive(Parser, Debug)]
#[command(name = "epochset")]
#[command(about = "Compares epoch-stamped visited sets against naive alternatives", long_about = None)]
struct Args {
    /// Number of nodes in the simulated graph
    #[arg(short, long)]
    nodes: usize,

    /// Traversals performed by each thread
    #[arg(short = 'r', long, default_value_t = 10_000)]
    traversals: usize,

    /// Candidate ids tested per traversal
    #[arg(short, long, default_value_t = 1_000)]
    visits: usize,

    /// Fraction of candidates drawn from the hub region of the graph
    #[arg(long, default_value_t = 0.2)]
    hub_ratio: f64,

    /// Number of threads to use (comma-separated list, e.g., "1,2,4,8")
    #[arg(short, long, value_delimiter = ',', default_value = "1")]
    threads: Vec<usize>,

    /// Pool configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the capacity of freshly created sets
    #[arg(long)]
    initial_capacity: Option<usize>,

    /// Overrides the growth margin of the sets
    #[arg(long)]
    growth_margin: Option<usize>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write a JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct JobReport {
    set: &'static str,
    threads: usize,
    elapsed_secs: f64,
    traversals_per_sec: f64,
    stats: Stats,
}

impl JobReport {
    fn new(set: &'static str, threads: usize, elapsed_secs: f64, stats: Stats) -> Self {
        let traversals_per_sec = if elapsed_secs > 0.0 {
            stats.get_traversals() as f64 / elapsed_secs
        } else {
            0.0
        };
        JobReport {
            set,
            threads,
            elapsed_secs,
            traversals_per_sec,
            stats,
        }
    }

    fn print(&self) {
        let avg_visits = if self.stats.get_traversals() > 0 {
            self.stats.get_visits() as f64 / self.stats.get_traversals() as f64
        } else {
            0.0
        };
        println!(
            "  {:<10} {:>8.3}s {:>14.2} traversals/s  {:.2} first visits/traversal, {} full clears",
            self.set,
            self.elapsed_secs,
            self.traversals_per_sec,
            avg_visits,
            self.stats.get_full_clears(),
        );
    }
}

/// Runs `work` on `num_threads` scoped threads and merges their statistics.
fn run_parallel<F>(num_threads: usize, work: F) -> Result<(Stats, f64)>
where
    F: Fn(usize) -> Stats + Sync,
{
    let start_time = Instant::now();
    let merged = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|worker| {
                let work = &work;
                scope.spawn(move || work(worker))
            })
            .collect();

        handles.into_iter().try_fold(Stats::new(), |combined, handle| {
            handle
                .join()
                .map(|local| combined.merge(&local))
                .map_err(|_| anyhow!("worker thread panicked"))
        })
    })?;
    Ok((merged, start_time.elapsed().as_secs_f64()))
}

fn run_job(
    args: &Args,
    config: &PoolConfig,
    num_threads: usize,
    traces: &[Vec<Vec<usize>>],
) -> Result<Vec<JobReport>> {
    println!("\n==========");
    println!("Running with threads={num_threads}");
    println!("==========");

    let pool: VisitedPool = VisitedPool::new(config.clone())?;
    let (stats, elapsed) = run_parallel(num_threads, |worker| {
        let mut local_stats = Stats::new();
        run_pooled_traversals(&pool, &traces[worker], &mut local_stats);
        local_stats
    })?;
    let pool_stats = pool.stats();
    // full clears happen when the pool resets a returned set
    let pooled = JobReport::new("epoch", num_threads, elapsed, stats.merge(&pool_stats));
    debug!(?pool_stats, "pool statistics");
    let released = pool.shutdown();
    debug!(released, "pool released");

    let (stats, elapsed) = run_parallel(num_threads, |worker| {
        let mut local_stats = Stats::new();
        let mut visited = HashVisitedSet::with_capacity(args.visits);
        run_traversals(&mut visited, &traces[worker], &mut local_stats);
        local_stats
    })?;
    let hashed = JobReport::new("hashset", num_threads, elapsed, stats);

    let (stats, elapsed) = run_parallel(num_threads, |worker| {
        let mut local_stats = Stats::new();
        let mut visited = UncompressedSet::new(args.nodes);
        run_traversals(&mut visited, &traces[worker], &mut local_stats);
        local_stats
    })?;
    let bitmap = JobReport::new("bitmap", num_threads, elapsed, stats);

    let reports = vec![pooled, hashed, bitmap];
    for report in &reports {
        report.print();
    }
    Ok(reports)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PoolConfig::load_from_toml_file(path)
            .with_context(|| format!("loading pool configuration from {}", path.display()))?,
        None => PoolConfig {
            initial_capacity: args.nodes,
            ..PoolConfig::default()
        },
    };
    if let Some(initial_capacity) = args.initial_capacity {
        config.initial_capacity = initial_capacity;
    }
    if let Some(growth_margin) = args.growth_margin {
        config.growth_margin = growth_margin;
    }
    config.validate()?;
    info!(?config, "pool configuration");

    let params = TraceParams {
        node_count: args.nodes,
        visits_per_traversal: args.visits,
        hub_ratio: args.hub_ratio,
        seed: args.seed,
    };
    if params.node_count == 0 || !(0.0..=1.0).contains(&params.hub_ratio) {
        return Err(anyhow!("--nodes must be positive and --hub-ratio within [0, 1]"));
    }

    let max_threads = args.threads.iter().copied().max().unwrap_or(0);
    println!("Generating traces for {max_threads} workers...");
    let traces: Vec<Vec<Vec<usize>>> = (0..max_threads)
        .map(|worker| params.for_worker(worker).generate(args.traversals))
        .collect();

    println!("\nStarting sweep:");
    println!("  Threads: {:?}", args.threads);
    println!("  Nodes: {}, traversals/thread: {}, visits/traversal: {}", args.nodes, args.traversals, args.visits);

    let mut reports = Vec::new();
    for &num_threads in tqdm(args.threads.iter()) {
        reports.extend(run_job(&args, &config, num_threads, &traces)?);
    }

    if let Some(path) = &args.json {
        let file = File::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &reports)
            .context("writing JSON report")?;
        info!(path = %path.display(), "report written");
    }

    println!("\n==========");
    println!("All jobs completed!");
    println!("==========");
    Ok(())
}
