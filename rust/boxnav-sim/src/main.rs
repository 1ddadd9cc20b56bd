use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use boxnav_core::navigator::policy::DEFAULT_WANDER_PROBABILITY;
use boxnav_core::simulation::DEFAULT_MAX_STEPS;
use boxnav_core::{
    run, ActionPolicy, Environment, FrameSink, Navigator, NavigatorConfig, NavigatorKind, NullSink, Perfect,
    RunSummary, SceneSpec, Wandering,
};
use boxnav_sim::engine::{self, EngineConfig, TcpEngineBridge};
use boxnav_sim::output::open_sink;

#[derive(Parser, Debug)]
#[command(name = "boxnav-sim", version, about = "Navigate an agent through a corridor of oriented boxes")]
struct Args {
    /// Scene JSON (boxes and start pose); the built-in two-box scene when omitted
    #[arg(long = "scene", value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Navigator variant: perfect or wandering
    #[arg(long = "navigator", value_name = "KIND", default_value = "perfect")]
    navigator: NavigatorKind,

    /// Chance per step that the wandering navigator substitutes a random action
    #[arg(long = "wander-probability", value_name = "P", default_value_t = DEFAULT_WANDER_PROBABILITY)]
    wander_probability: f64,

    /// Seed for the wandering navigator
    #[arg(long = "seed", value_name = "N")]
    seed: Option<u64>,

    #[arg(long = "max-steps", value_name = "N", default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: u64,

    /// Trajectory output (.jsonl or .json)
    #[arg(long = "out", value_name = "PATH")]
    out: Option<PathBuf>,

    /// Drive an external engine listening on this port
    #[arg(long = "engine-port", value_name = "PORT")]
    engine_port: Option<u16>,

    #[arg(long = "engine-host", value_name = "HOST", default_value = engine::DEFAULT_ENGINE_HOST)]
    engine_host: String,

    #[arg(long = "engine-timeout-ms", value_name = "MS", default_value_t = engine::DEFAULT_TIMEOUT_MS)]
    engine_timeout_ms: u64,

    #[arg(long = "engine-retries", value_name = "N", default_value_t = engine::DEFAULT_MAX_RETRIES)]
    engine_retries: u32,

    /// Emit logs as JSON
    #[arg(long = "log-json")]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().with_env_filter(filter).with_ansi(false).json().init();
    } else {
        fmt().with_env_filter(filter).init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);
    info!(core_version = %boxnav_core::version(), ?args, "starting boxnav-sim");

    let scene = match &args.scene {
        Some(path) => SceneSpec::from_path(path).with_context(|| format!("failed to load scene {:?}", path))?,
        None => SceneSpec::default(),
    };
    let mut config = NavigatorConfig::from_env();
    if args.engine_port.is_some() {
        // The engine owns collision; its reported position may leave the boxes.
        config.allow_out_of_bounds = true;
    }
    let env = scene.build_environment_with_radius(config.target_arrival_radius).context("invalid scene")?;

    let mut sink: Box<dyn FrameSink> = match &args.out {
        Some(path) => open_sink(path)?,
        None => Box::new(NullSink),
    };

    let summary = match args.navigator {
        NavigatorKind::Perfect => drive(&args, &env, &scene, config, Perfect, sink.as_mut())?,
        NavigatorKind::Wandering => {
            let policy = match args.seed {
                Some(seed) => Wandering::seeded(args.wander_probability, seed)?,
                None => Wandering::new(args.wander_probability)?,
            };
            drive(&args, &env, &scene, config, policy, sink.as_mut())?
        }
    };

    info!(
        steps = summary.steps,
        arrived = summary.arrived,
        rejected = summary.rejected_steps,
        agreements = summary.stats.agreements,
        disagreements = summary.stats.disagreements,
        x = summary.final_position.x,
        y = summary.final_position.y,
        "run finished"
    );
    if !summary.arrived {
        anyhow::bail!("agent did not reach the final target within {} steps", args.max_steps);
    }
    Ok(())
}

fn drive<P: ActionPolicy>(
    args: &Args,
    env: &Environment,
    scene: &SceneSpec,
    config: NavigatorConfig,
    policy: P,
    sink: &mut dyn FrameSink,
) -> Result<RunSummary> {
    let mut nav = Navigator::new(env, scene.start.position, scene.start.rotation(), config, policy)
        .context("invalid start pose")?;
    if let Some(port) = args.engine_port {
        let cfg = EngineConfig {
            host: args.engine_host.clone(),
            timeout_ms: args.engine_timeout_ms,
            max_retries: args.engine_retries,
            ..EngineConfig::new(port)
        };
        let bridge = TcpEngineBridge::connect(cfg)
            .with_context(|| format!("failed to connect to engine at {}:{port}", args.engine_host))?;
        nav = nav.with_bridge(Box::new(bridge));
    }
    let summary = run(&mut nav, sink, args.max_steps)?;
    Ok(summary)
}
