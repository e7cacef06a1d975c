pub mod cli;
pub mod sync_config;

#[cfg(feature = "cli")]
pub use args::{CliConfig, Command};

#[cfg(feature = "cli")]
mod args {
    use crate::domain::dates::DEFAULT_EXPIRY_WARNING_DAYS;
    use crate::domain::workflow::DocumentKind;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "erp-rules")]
    #[command(about = "Freight ERP business rules and sync-mapping runner")]
    pub struct CliConfig {
        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, global = true, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Run a sync mapping described by a TOML file
        Sync {
            #[arg(short, long, default_value = "sync.toml")]
            config: String,

            /// Validate and show the mapping without reading or writing data
            #[arg(long)]
            dry_run: bool,
        },
        /// Profit and margin for a job
        Margin {
            #[arg(long)]
            revenue: f64,
            #[arg(long, default_value = "0")]
            direct_cost: f64,
            #[arg(long, default_value = "0")]
            overhead: f64,
            /// PJO budgeted cost to compare against direct + overhead
            #[arg(long)]
            budget: Option<f64>,
        },
        /// HSE risk level on the 5x5 matrix
        Risk {
            #[arg(short, long)]
            likelihood: u8,
            #[arg(short, long)]
            consequence: u8,
        },
        /// Check a document status transition, or list the allowed next statuses
        Transition {
            #[arg(short, long, value_enum)]
            document: DocumentKind,
            #[arg(long)]
            from: String,
            #[arg(long)]
            to: Option<String>,
        },
        /// Notification retry delay
        Backoff {
            #[arg(long, allow_negative_numbers = true)]
            retry_count: i64,
        },
        /// Expiry status of a certificate or permit
        Expiry {
            #[arg(long)]
            expires_on: String,
            /// Defaults to the current date
            #[arg(long)]
            today: Option<String>,
            #[arg(long, default_value_t = DEFAULT_EXPIRY_WARNING_DAYS)]
            warning_days: i64,
        },
    }
}
