use clap::{Parser, Subcommand, ValueEnum};
use job_harvest::Profile;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "job-harvest")]
#[command(about = "Harvests job listings from search results and fills application fields")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search, filter, dedupe and check listings, then write them to JSON
    Harvest(HarvestArgs),
    /// Ask the model for answers to application form fields
    FillFields(FillFieldsArgs),
}

#[derive(clap::Args, Debug)]
pub struct HarvestArgs {
    /// Built-in profile to run
    #[arg(short, long, value_enum)]
    pub profile: ProfileArg,

    /// JSON configuration replacing the profile's settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the output file
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Stop paging at this result offset
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Write at most this many listings
    #[arg(long)]
    pub max_output: Option<usize>,

    /// Render Google through WebDriver instead of calling SerpAPI
    #[arg(long)]
    pub browser: bool,

    /// WebDriver server (falls back to WEBDRIVER_URL, then http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Skip re-fetching posting pages
    #[arg(long)]
    pub no_liveness: bool,
}

#[derive(clap::Args, Debug)]
pub struct FillFieldsArgs {
    /// JSON array of form fields
    #[arg(short, long)]
    pub fields: PathBuf,

    /// JSON user profile
    #[arg(short, long)]
    pub profile_file: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    LinkedinDenmark,
    LinkedinUk,
    UkFinance,
    UkFinanceInternships,
    UkFrontend,
    UkMarketing,
}

/// Convert from CLI argument profile to the library profile
pub fn convert_profile(arg: ProfileArg) -> Profile {
    match arg {
        ProfileArg::LinkedinDenmark => Profile::LinkedinDenmark,
        ProfileArg::LinkedinUk => Profile::LinkedinUk,
        ProfileArg::UkFinance => Profile::UkFinance,
        ProfileArg::UkFinanceInternships => Profile::UkFinanceInternships,
        ProfileArg::UkFrontend => Profile::UkFrontend,
        ProfileArg::UkMarketing => Profile::UkMarketing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_harvest() {
        let args = Args::try_parse_from([
            "job-harvest",
            "harvest",
            "--profile",
            "uk-finance-internships",
            "--max-output",
            "10",
            "--no-liveness",
        ])
        .unwrap();

        match args.command {
            Command::Harvest(harvest) => {
                assert_eq!(
                    convert_profile(harvest.profile),
                    Profile::UkFinanceInternships
                );
                assert_eq!(harvest.max_output, Some(10));
                assert!(harvest.no_liveness);
                assert!(!harvest.browser);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_fill_fields() {
        let args =
            Args::try_parse_from(["job-harvest", "fill-fields", "--fields", "form.json"]).unwrap();
        match args.command {
            Command::FillFields(fill) => {
                assert_eq!(fill.fields, PathBuf::from("form.json"));
                assert!(fill.profile_file.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
