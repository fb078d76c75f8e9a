//! Demo/bench CLI driving the pack scheduler with synthetic transactions.

use clap::{Parser, Subcommand};
use rand::Rng;

use pack_scheduler::pack::config::PackConfig;
use pack_scheduler::pack::scheduler::{EmittedTxn, Scheduler};
use pack_scheduler::utils::logging::init_logging;
use pack_scheduler::utils::metrics::MetricsRegistry;

#[derive(Parser)]
#[clap(name = "pack-bench", version)]
struct Cli {
    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Feed a batch of random transactions through the scheduler and print stats.
    Run {
        #[clap(long, default_value_t = 256)]
        pack_depth: usize,

        #[clap(long, default_value_t = 4)]
        gap: usize,

        #[clap(long, default_value_t = 64)]
        max_txn_per_microblock: usize,

        #[clap(long, default_value_t = 2000)]
        num_txns: usize,

        #[clap(long, default_value_t = 1_400_000)]
        cu_limit: u64,

        #[clap(long, default_value_t = 0.25)]
        vote_fraction: f64,

        #[clap(long, default_value_t = 20)]
        distinct_accounts: usize,
    },
}

fn random_payload(rng: &mut impl Rng, distinct_accounts: usize, sig_seed: u64) -> Vec<u8> {
    let mut sig = [0u8; 64];
    sig[..8].copy_from_slice(&sig_seed.to_le_bytes());
    rng.fill(&mut sig[8..]);

    let write_account = [rng.gen_range(0..distinct_accounts as u8); 32];
    let writes = [write_account];

    let mut payload = Vec::new();
    payload.extend_from_slice(&sig);
    payload.push(1); // account_count
    payload.push(0b11); // writable + signer
    payload.extend_from_slice(&write_account);
    payload.push(0); // instruction_count
    let _ = &writes;
    payload
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Run { pack_depth, gap, max_txn_per_microblock, num_txns, cu_limit, vote_fraction, distinct_accounts } => {
            let config = PackConfig::new(pack_depth, gap, max_txn_per_microblock);
            tracing::info!(?config, footprint = config.footprint(), "starting pack bench");

            let mut scheduler = Scheduler::new(config);
            let mut metrics = MetricsRegistry::new();
            let mut rng = rand::thread_rng();

            let mut rejected = 0u64;
            for i in 0..num_txns {
                let payload = random_payload(&mut rng, distinct_accounts, i as u64);
                match scheduler.insert(&payload) {
                    Ok(()) => metrics.inc_counter("inserted"),
                    Err(_) => {
                        rejected += 1;
                        metrics.inc_counter("rejected");
                    }
                }
            }

            let mut microblocks = 0u64;
            let mut total_emitted = 0u64;
            let mut out = vec![EmittedTxn::default(); max_txn_per_microblock];
            loop {
                let n = scheduler.schedule_next_microblock(cu_limit, vote_fraction, &mut out);
                if n == 0 {
                    break;
                }
                microblocks += 1;
                total_emitted += n as u64;
                metrics.set_gauge("avail_txn_cnt", scheduler.avail_txn_cnt() as f64);
            }
            scheduler.end_block();

            let (counters, _) = metrics.snapshot();
            println!(
                "inserted={} rejected={} microblocks={} emitted={} still_resident={}",
                counters.get("inserted").copied().unwrap_or(0),
                rejected,
                microblocks,
                total_emitted,
                scheduler.avail_txn_cnt(),
            );
            Ok(())
        }
    }
}
