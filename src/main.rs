//! camel-roleplay - command line entry point
//!
//! Collects the four inputs, then runs one simulation and streams it to the
//! terminal.

use camel_roleplay::{
    config::Config,
    run_simulation,
    sink::{CollectingSink, OutputSink, TerminalSink},
    SimulationError, SimulationInputs,
};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = "Run a two-agent role-playing simulation")]
struct Cli {
    /// Role played by the executor (e.g. "Python Programmer").
    #[arg(long, short = 'a', env = "CAMEL_ASSISTANT_ROLE", default_value = "")]
    assistant: String,

    /// Role played by the instructor (e.g. "Stock Trader").
    #[arg(long, short = 'u', env = "CAMEL_USER_ROLE", default_value = "")]
    user: String,

    /// Task the two roles collaborate on.
    #[arg(long, short = 't', env = "CAMEL_TASK", default_value = "")]
    task: String,

    /// API key for the chat-completions endpoint.
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Model override (otherwise `CAMEL_MODEL` or the built-in default).
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Maximum number of rounds.
    #[arg(long)]
    turn_limit: Option<usize>,

    /// Print the full report as JSON instead of streaming text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the simulation output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camel_roleplay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(turn_limit) = cli.turn_limit {
        config = config.with_turn_limit(turn_limit)?;
    }
    info!(
        "Loaded configuration: model={} turn_limit={}",
        config.model, config.turn_limit
    );

    let inputs = SimulationInputs {
        assistant_role_name: cli.assistant,
        user_role_name: cli.user,
        task: cli.task,
        api_key: cli.api_key,
    };

    if let Err(SimulationError::MissingInput(field)) = inputs.validate() {
        warn!("Please fill in all the input fields (missing: {})", field);
        anyhow::bail!("missing input: {}", field);
    }

    if cli.json {
        let mut sink = CollectingSink::new();
        let report = run_simulation(&inputs, &config, &mut sink).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut sink = TerminalSink::stdout();
        sink.emit("<h2>Output:</h2>");
        let report = run_simulation(&inputs, &config, &mut sink).await?;
        info!(
            "Simulation finished: status={:?} rounds={}",
            report.status, report.rounds
        );
    }

    Ok(())
}
