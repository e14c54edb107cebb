use clap::Parser;
use env_logger::Env;
use job_harvest::Harvest;
use job_harvest::interpreter::{FieldInterpreter, FormField, OpenAiClient};
use job_harvest::providers::google::DEFAULT_WEBDRIVER_URL;
use serde_json::Value;

mod args;
use args::{Args, Command, FillFieldsArgs, HarvestArgs, convert_profile};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging, info unless RUST_LOG says otherwise
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let outcome = match args.command {
        Command::Harvest(harvest) => run_harvest(harvest).await,
        Command::FillFields(fill) => run_fill_fields(fill).await,
    };

    if let Err(e) = &outcome {
        ::log::error!("{}", e);
    }
    outcome
}

async fn run_harvest(args: HarvestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let profile = convert_profile(args.profile);
    ::log::info!("Starting harvest for profile: {}", profile.name());

    let mut harvest = Harvest::new(profile);
    if let Some(path) = &args.config {
        harvest = harvest.with_config_file(path)?;
    }
    if let Some(dir) = args.output_dir {
        harvest = harvest.with_output_dir(dir);
    }
    if let Some(max_results) = args.max_results {
        harvest = harvest.with_max_results(max_results);
    }
    if let Some(max_output) = args.max_output {
        harvest = harvest.with_max_output(max_output);
    }
    if args.no_liveness {
        harvest = harvest.without_liveness();
    }

    if args.browser {
        let webdriver_url = args
            .webdriver_url
            .or_else(|| std::env::var("WEBDRIVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string());

        println!("Note: Browser search requires a WebDriver server (e.g., ChromeDriver).");
        println!("Using WebDriver at {}", webdriver_url);
        harvest = harvest.with_browser(webdriver_url);
    }

    let start_time = std::time::Instant::now();
    let report = harvest.run().await?;

    ::log::info!(
        "Harvest complete in {:.2} seconds: {} fetched, {} rejected, {} duplicates, {} closed, {} failed, {} without email",
        start_time.elapsed().as_secs_f64(),
        report.fetched,
        report.rejected,
        report.duplicates,
        report.closed,
        report.failed,
        report.missing_email
    );
    if let Some(path) = &report.output_path {
        println!("{} listings written to {}", report.emitted, path.display());
    }

    Ok(())
}

async fn run_fill_fields(args: FillFieldsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fields = FormField::list_from_file(&args.fields)?;
    let profile: Value = match &args.profile_file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Value::Null,
    };

    let interpreter = FieldInterpreter::new(OpenAiClient::from_env()?);
    let answers = interpreter.map_fields(&fields, &profile).await?;

    println!("{}", serde_json::to_string_pretty(&answers)?);
    Ok(())
}
