//! lan_race: a scripted kart session over a simulated network.
//!
//! One authority and a handful of clients slalom around a walled arena.
//! Each client predicts its own kart, the authority broadcasts once a second
//! by default, and the traces show how far each prediction had to be pulled
//! back when a broadcast landed.
//!
//! ```bash
//! cargo run -p lan_race -- --clients 4 --latency-ms 150 --loss 0.05
//! cargo run -p lan_race -- --config demos/lan_race/lan_race.json
//! RUST_LOG=debug cargo run -p lan_race
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kart_core::{BodyId, ParticipantId, Tick};
use kart_motion::Arena;
use kart_output::{CsvTraceWriter, TraceObserver, TraceWriter};
use kart_replicate::Reconciliation;
use kart_sim::{ParticipantView, SessionBuilder, SessionConfig, SessionObserver, SessionStats, SlalomInput};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:        &str = "output/lan_race";
const ARENA_HALF_METRES: f32  = 60.0;

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Scripted kart race with client prediction and server reconciliation.
///
/// Flags override values loaded from `--config`; anything unset keeps the
/// file's value, or the built-in default without a file.
#[derive(Parser, Debug)]
#[command(name = "lan_race")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of remote clients, one kart each
    #[arg(short = 'c', long, default_value = "3")]
    clients: usize,

    /// Ticks to simulate
    #[arg(short = 't', long)]
    ticks: Option<u64>,

    /// Seed for link jitter and loss
    #[arg(long)]
    seed: Option<u64>,

    /// One-way link latency in milliseconds
    #[arg(long)]
    latency_ms: Option<f64>,

    /// Uniform jitter half-width in milliseconds
    #[arg(long)]
    jitter_ms: Option<f64>,

    /// Packet loss probability (0.0-1.0)
    #[arg(long)]
    loss: Option<f64>,

    /// Authority broadcast rate
    #[arg(long)]
    broadcast_hz: Option<f64>,

    /// Authority also drives kart 0
    #[arg(long)]
    listen_server: bool,

    /// Directory for the CSV traces
    #[arg(short = 'o', long, default_value = OUTPUT_DIR)]
    output: PathBuf,
}

impl Args {
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SessionConfig::default(),
        };

        if let Some(t) = self.ticks {
            config.total_ticks = t;
        }
        if let Some(s) = self.seed {
            config.seed = s;
        }
        if let Some(ms) = self.latency_ms {
            config.link.latency_secs = ms / 1000.0;
        }
        if let Some(ms) = self.jitter_ms {
            config.link.jitter_secs = ms / 1000.0;
        }
        if let Some(p) = self.loss {
            config.link.loss = p;
        }
        if let Some(hz) = self.broadcast_hz {
            config.broadcast_rate_hz = hz;
        }
        config.listen_server |= self.listen_server;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer wrapper to count rows ────────────────────────────────────────────

struct CountingObserver<W: TraceWriter> {
    inner:           TraceObserver<W>,
    state_rows:      usize,
    correction_rows: usize,
}

impl<W: TraceWriter> CountingObserver<W> {
    fn new(inner: TraceObserver<W>) -> Self {
        Self { inner, state_rows: 0, correction_rows: 0 }
    }
}

impl<W: TraceWriter> SessionObserver for CountingObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, views: &[ParticipantView]) {
        self.state_rows += views.iter().filter(|v| v.state.is_some()).count();
        self.inner.on_snapshot(tick, views);
    }

    fn on_correction(
        &mut self,
        tick:        Tick,
        participant: ParticipantId,
        body:        BodyId,
        outcome:     &Reconciliation,
    ) {
        self.correction_rows += 1;
        self.inner.on_correction(tick, participant, body, outcome);
    }

    fn on_session_end(&mut self, final_tick: Tick, stats: &SessionStats) {
        self.inner.on_session_end(final_tick, stats);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,kart_sim=info")),
        )
        .init();

    let args = Args::parse();
    let config = args.session_config()?;

    info!(
        clients       = args.clients,
        ticks         = config.total_ticks,
        latency_secs  = config.link.latency_secs,
        jitter_secs   = config.link.jitter_secs,
        loss          = config.link.loss,
        broadcast_hz  = config.broadcast_rate_hz,
        listen_server = config.listen_server,
        "configured"
    );

    // 1. Track and session.
    let arena = Arena::square(ARENA_HALF_METRES * config.motion.units_per_meter)?;
    let mut session = SessionBuilder::new(config.clone(), arena, SlalomInput::default())
        .clients(args.clients)
        .build()?;

    // 2. Output.
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let writer = CsvTraceWriter::new(&args.output)?;
    let mut obs = CountingObserver::new(TraceObserver::new(writer));

    // 3. Run.
    let t0 = Instant::now();
    session.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    let stats = session.stats();
    println!("Session complete in {:.3} s", elapsed.as_secs_f64());
    println!("  ticks            : {}", stats.ticks);
    println!("  moves sent       : {}", stats.moves_sent);
    println!("  moves applied    : {}", stats.moves_applied);
    println!("  moves rejected   : {}", stats.moves_rejected);
    println!("  moves ignored    : {}", stats.moves_ignored);
    println!("  packets dropped  : {}", stats.packets_dropped);
    println!("  broadcasts       : {}", stats.broadcasts);
    println!("  max correction   : {:.2}", stats.max_correction);
    println!("  body_states.csv  : {} rows", obs.state_rows);
    println!("  corrections.csv  : {} rows", obs.correction_rows);
    println!();

    // 5. Where each driver thinks its kart is, versus the authority.
    println!("{:<14} {:<8} {:<8} {:>10} {:>10} {:>8}", "Participant", "Body", "Queue", "Speed", "Ahead by", "Role");
    println!("{}", "-".repeat(64));
    let drivers = std::iter::once(ParticipantId::AUTHORITY).chain(session.client_ids());
    for id in drivers {
        let Some(body) = session.controlled_body(id) else {
            continue;
        };
        let copy = if id.is_authority() {
            session.authority_copy(body)
        } else {
            session.client_copy(id, body)
        };
        let (Some(copy), Some(truth)) = (copy, session.authority_copy(body)) else {
            continue;
        };
        let (Some(local), Some(canonical)) = (copy.state(), truth.state()) else {
            continue;
        };
        println!(
            "{:<14} {:<8} {:<8} {:>10.2} {:>10.1} {:>8}",
            id.0,
            body.0,
            copy.queue_len(),
            local.speed(),
            local.transform.distance(&canonical.transform),
            copy.net_role().as_str(),
        );
    }

    Ok(())
}
