use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use loan_sage::application::{load_application, Application};
use loan_sage::config::Config;
use loan_sage::pricing::{
    amortization_schedule, calculate_emi, validate_loan_terms, validate_pricing,
    MAX_SCHEDULE_MONTHS,
};
use loan_sage::scoring::{score_rules, ScoringService};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Default)]
struct ApplicationArgs {
    /// Read the application from a JSON or YAML file (flags override its fields)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Monthly income
    #[arg(long)]
    income: Option<f64>,

    /// Requested loan principal
    #[arg(long)]
    loan_amount: Option<f64>,

    #[arg(long)]
    age: Option<f64>,

    #[arg(long)]
    employment_years: Option<f64>,

    /// Number of loans already open
    #[arg(long)]
    existing_loans: Option<f64>,

    /// Monthly expenses (default: half of income)
    #[arg(long)]
    expenses: Option<f64>,

    /// Loan product, e.g. "Home Loan"
    #[arg(long)]
    loan_type: Option<String>,

    /// Tenure in years
    #[arg(long)]
    tenure: Option<f64>,
}

impl ApplicationArgs {
    fn into_application(self) -> anyhow::Result<Application> {
        let mut app = match &self.input {
            Some(path) => load_application(path)?,
            None => Application::default(),
        };

        if let Some(v) = self.income {
            app.monthly_income = v;
        }
        if let Some(v) = self.loan_amount {
            app.loan_amount = v;
        }
        if let Some(v) = self.age {
            app.age = v;
        }
        if let Some(v) = self.employment_years {
            app.employment_years = v;
        }
        if let Some(v) = self.existing_loans {
            app.existing_loans = v;
        }
        if self.expenses.is_some() {
            app.monthly_expenses = self.expenses;
        }
        if self.loan_type.is_some() {
            app.loan_type = self.loan_type;
        }
        if self.tenure.is_some() {
            app.tenure_years = self.tenure;
        }

        Ok(app)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score an application and price the loan
    Assess {
        #[command(flatten)]
        application: ApplicationArgs,

        /// Model artifact to use instead of the configured one
        #[arg(long)]
        model: Option<PathBuf>,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,

        /// Show which scoring rules fired
        #[arg(long)]
        explain: bool,

        /// Also save the assessment as a JSON report
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Calculate the monthly installment for a loan
    Emi {
        #[arg(long)]
        principal: f64,

        /// Annual interest rate in percent
        #[arg(long)]
        rate: f64,

        /// Tenure in years
        #[arg(long)]
        tenure: f64,

        /// Print the month-by-month repayment schedule
        #[arg(long)]
        schedule: bool,
    },
    /// Validate the config file
    CheckConfig,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "loan-sage")]
#[command(about = "Credit scoring and loan pricing CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/loan-sage/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config_or_exit(path: Option<PathBuf>) -> Config {
    match loan_sage::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Init => {
            if let Err(e) = loan_sage::config::init::run_init_wizard(config_path) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::CheckConfig => {
            let config = load_config_or_exit(config_path);
            if let Err(errors) = validate_pricing(&config.effective_pricing()) {
                eprintln!("Pricing config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }

            let model = config.effective_model();
            if model.enabled {
                match ScoringService::load(&model.artifact_path()) {
                    Ok(_) => println!("Model artifact OK: {}", model.artifact_path().display()),
                    Err(e) => println!(
                        "Model artifact not usable ({}), rule-based scoring will be used",
                        e
                    ),
                }
            } else {
                println!("Model scoring disabled, rule-based scoring will be used");
            }
            println!("Config OK");
        }
        Commands::Emi {
            principal,
            rate,
            tenure,
            schedule,
        } => {
            if let Err(errors) = validate_loan_terms(principal, rate, tenure) {
                eprintln!("Invalid loan terms:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_INPUT);
            }
            if schedule && tenure * 12.0 > f64::from(MAX_SCHEDULE_MONTHS) {
                eprintln!(
                    "Invalid loan terms:\n  - tenure: schedule is limited to {} months",
                    MAX_SCHEDULE_MONTHS
                );
                std::process::exit(EXIT_INPUT);
            }

            let emi = calculate_emi(principal, rate, tenure);
            println!("EMI: {}", loan_sage::output::format_amount(emi));
            if schedule {
                let installments = amortization_schedule(principal, rate, tenure);
                println!();
                println!("{}", loan_sage::output::format_schedule(&installments));
            }
        }
        Commands::Assess {
            application,
            model,
            json,
            explain,
            save,
        } => {
            let config = load_config_or_exit(config_path);

            let pricing = config.effective_pricing();
            if let Err(errors) = validate_pricing(&pricing) {
                eprintln!("Pricing config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }

            let app = match application.into_application() {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            if let Err(errors) = app.validate() {
                eprintln!("Invalid application:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_INPUT);
            }

            let service = match model {
                Some(path) => ScoringService::load_or_rule_based(&path),
                None => ScoringService::from_config(&config.effective_model()),
            };

            let assessment = loan_sage::assess(&app, &service, &pricing);

            if json {
                match serde_json::to_string_pretty(&assessment) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize assessment: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else {
                let use_colors = loan_sage::output::should_use_colors();
                println!("{}", loan_sage::output::format_assessment(&assessment, use_colors));
                if explain {
                    println!();
                    println!(
                        "{}",
                        loan_sage::output::format_breakdown(&score_rules(
                            &assessment.prediction.features_used
                        ))
                    );
                }
            }

            if let Some(path) = save {
                if let Err(e) = loan_sage::output::write_report(&path, &assessment) {
                    eprintln!("Failed to save report: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                eprintln!("Saved assessment to {}", path.display());
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
