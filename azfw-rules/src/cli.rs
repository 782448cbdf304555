use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "azfw-rules")]
#[command(about = "Validate, inspect, and deploy Azure Firewall Policy rules from CSV")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Validate a rules CSV against the schema and priority invariants.
    Validate(ValidateArgs),
    /// Show the rule collection group hierarchy in a rules CSV.
    Inspect(InspectArgs),
    /// Deploy rule collection groups to a firewall policy, one deployment per group.
    Deploy(DeployArgs),
    /// Export a policy's rule collection groups to a schema CSV.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Rules CSV to validate.
    #[arg(default_value = "firewall-rules.csv")]
    pub file: PathBuf,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Optional validation profile TOML (priority bounds, protocol sets).
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Show data source metadata.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Rules CSV to inspect.
    #[arg(default_value = "firewall-rules.csv")]
    pub file: PathBuf,
    /// Tree depth: 1 = groups, 2 = collections, 3 = rules.
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DeployArgs {
    /// Rules CSV to deploy.
    #[arg(default_value = "firewall-rules.csv")]
    pub file: PathBuf,
    /// Subscription holding the firewall policy and IP groups.
    #[arg(long)]
    pub subscription: String,
    /// Resource group holding the firewall policy.
    #[arg(long)]
    pub resource_group: String,
    /// Firewall policy name. Falls back to `firewallPolicyName` in --parameters.
    #[arg(long)]
    pub policy: Option<String>,
    /// Resource group owning referenced IP groups. Falls back to
    /// `ipGroupsResourceGroup` in --parameters, then --resource-group.
    #[arg(long)]
    pub ipgroups_resource_group: Option<String>,
    /// ARM parameter file used to default missing identifiers.
    #[arg(long)]
    pub parameters: Option<PathBuf>,
    /// Rule collection group deployment template.
    #[arg(long, default_value = "templates/rulecollectiongroup.json")]
    pub template_file: PathBuf,
    /// Print each deployment and its payload without calling the Azure CLI.
    #[arg(long)]
    pub dry_run: bool,
    /// Write the built deployment payloads to a JSON file.
    #[arg(long)]
    pub plan: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Rule-collection-group JSON dump; omit to query the Azure CLI.
    #[arg(long, conflicts_with_all = ["subscription", "resource_group", "policy"])]
    pub input: Option<PathBuf>,
    /// Subscription holding the firewall policy.
    #[arg(long)]
    pub subscription: Option<String>,
    /// Resource group holding the firewall policy.
    #[arg(long)]
    pub resource_group: Option<String>,
    /// Firewall policy name.
    #[arg(long)]
    pub policy: Option<String>,
    /// Output CSV path.
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
