use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use archmap::config::{
	RuleTable, RulesFile, default_rule_tables, load_rules, parse_rules_file, rules_file_path,
};
use archmap::inventory::DiscoveryPath;
use archmap::range::expand;
use archmap::rules::{detect_arch, rewrite_image, validate_rules};

#[derive(Parser)]
#[command(name = "archmap")]
#[command(
	author,
	version,
	about = "Architecture-aware image rewriting and host range expansion"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	/// Log rule evaluation to stderr
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Rewrite an image reference for a node architecture
	Rewrite {
		/// Image reference, e.g. nginx:latest
		image: String,

		/// Node architecture (defaults to amd64)
		#[arg(long)]
		arch: Option<String>,

		/// Rules file replacing the built-in rules
		#[arg(long, value_name = "FILE")]
		rules: Option<PathBuf>,

		/// Ignore any rules file and use the built-in rules
		#[arg(long, conflicts_with = "rules")]
		defaults_only: bool,
	},
	/// Guess a node architecture from its kernel version
	Arch {
		/// Kernel version string, e.g. 3.4.106-cubieboard
		kernel_version: String,

		/// Rules file holding the `kernels` table
		#[arg(long, value_name = "FILE")]
		rules: Option<PathBuf>,
	},
	/// Expand a bracketed range pattern, one value per line
	Expand {
		/// Pattern such as web[01:10].example.com
		pattern: String,
	},
	/// List the hosts of an inventory section
	Hosts {
		/// Discovery path: /path/to/inventory/section or /section
		path: String,
	},
	/// Rules file commands
	Rules {
		#[command(subcommand)]
		action: RulesAction,

		/// Rules file to inspect
		#[arg(long, value_name = "FILE", global = true)]
		rules: Option<PathBuf>,
	},
}

#[derive(Subcommand)]
enum RulesAction {
	/// Display the effective rules in evaluation order
	Show,
	/// Check the rules file for errors without rewriting anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: bool) {
	let default_filter = if verbose {
		"archmap=debug"
	} else {
		"archmap=warn"
	};

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
		)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	match cli.command {
		Commands::Rewrite {
			image,
			arch,
			rules,
			defaults_only,
		} => handle_rewrite(&image, arch.as_deref(), rules.as_deref(), defaults_only),
		Commands::Arch {
			kernel_version,
			rules,
		} => handle_arch(&kernel_version, rules.as_deref()),
		Commands::Expand { pattern } => handle_expand(&pattern),
		Commands::Hosts { path } => handle_hosts(&path),
		Commands::Rules { action, rules } => match action {
			RulesAction::Show => handle_rules_show(rules.as_deref()),
			RulesAction::Validate => handle_rules_validate(rules.as_deref()),
		},
	}
}

/// Load an explicitly given rules file, or the user's file if it exists.
fn load_rules_file(explicit: Option<&Path>) -> Result<Option<RulesFile>> {
	if let Some(path) = explicit {
		let rules = parse_rules_file(path)
			.with_context(|| format!("Failed to load rules from {}", path.display()))?;
		return Ok(Some(rules));
	}

	let path = rules_file_path().context("Failed to locate rules file")?;
	load_rules(&path).with_context(|| format!("Failed to load rules from {}", path.display()))
}

fn handle_rewrite(
	image: &str,
	arch: Option<&str>,
	rules: Option<&Path>,
	defaults_only: bool,
) -> Result<ExitCode> {
	let overrides = if defaults_only {
		None
	} else {
		load_rules_file(rules)?
	};

	let rewritten = rewrite_image(image, arch, overrides.as_ref().map(|r| &r.rules))
		.with_context(|| format!("Failed to rewrite {}", image))?;

	println!("{}", rewritten);
	Ok(ExitCode::SUCCESS)
}

fn handle_arch(kernel_version: &str, rules: Option<&Path>) -> Result<ExitCode> {
	let kernels = load_rules_file(rules)?
		.map(|r| r.kernels)
		.unwrap_or_default();

	println!("{}", detect_arch(&kernels, kernel_version));
	Ok(ExitCode::SUCCESS)
}

fn handle_expand(pattern: &str) -> Result<ExitCode> {
	let values = expand(pattern).with_context(|| format!("Failed to expand {}", pattern))?;
	for value in values {
		println!("{}", value);
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_hosts(path: &str) -> Result<ExitCode> {
	let discovery = DiscoveryPath::parse(path);
	let entries = discovery.fetch().with_context(|| {
		format!(
			"Failed to read section {} of {}",
			discovery.section,
			discovery.file.display()
		)
	})?;

	for entry in entries {
		println!("{}", entry);
	}
	Ok(ExitCode::SUCCESS)
}

fn print_table(table: &RuleTable) {
	for rule in &table.rules {
		println!("  {}", rule.pattern);
		for (arch, template) in &rule.targets {
			println!("    {}: {}", arch, template);
		}
	}
}

fn handle_rules_show(rules: Option<&Path>) -> Result<ExitCode> {
	let Some(loaded) = load_rules_file(rules)? else {
		println!("No rules file found, using built-in rules:\n");
		for table in default_rule_tables() {
			print_table(table);
		}
		return Ok(ExitCode::SUCCESS);
	};

	if !loaded.kernels.patterns.is_empty() || loaded.kernels.default.is_some() {
		println!("kernels:");
		for (pattern, arch) in &loaded.kernels.patterns {
			println!("  {}: {}", pattern, arch);
		}
		if let Some(ref default) = loaded.kernels.default {
			println!("  default: {}", default);
		}
		println!();
	}

	println!("rules ({}):", loaded.rules.len());
	print_table(&loaded.rules);

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_validate(rules: Option<&Path>) -> Result<ExitCode> {
	let loaded = match load_rules_file(rules) {
		Ok(Some(loaded)) => loaded,
		Ok(None) => {
			println!("No rules file found.");
			return Ok(ExitCode::SUCCESS);
		}
		Err(e) => {
			eprintln!("Rules error: {:#}", e);
			return Ok(ExitCode::FAILURE);
		}
	};

	match validate_rules(&loaded.rules) {
		Ok(()) => {
			println!("Rules file is valid ({} rules)", loaded.rules.len());
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Rules error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
