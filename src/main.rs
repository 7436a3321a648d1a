//! apkplan CLI
//!
//! Entry point for the `apkplan` command-line tool.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use apkplan::{
    AbiSet, BuildType, EnvSnapshot, ExitCode, ExplainOutput, Resolver, ResolutionReport,
    SigningOverrides, VariantConfig,
};

#[derive(Parser)]
#[command(name = "apkplan")]
#[command(about = "Android build-variant resolver", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Signing override parameters, honored on release builds only
#[derive(Args)]
struct SigningArgs {
    /// Key alias override
    #[arg(long)]
    key_alias: Option<String>,

    /// Key password override
    #[arg(long)]
    key_password: Option<String>,

    /// Keystore path override
    #[arg(long)]
    store_file: Option<String>,

    /// Keystore password override
    #[arg(long)]
    store_password: Option<String>,
}

impl SigningArgs {
    fn to_overrides(&self) -> SigningOverrides {
        SigningOverrides {
            key_alias: self.key_alias.clone(),
            key_password: self.key_password.clone(),
            store_file: self.store_file.clone(),
            store_password: self.store_password.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and validate a packaging plan for one variant
    Resolve {
        /// Build type: debug or release
        #[arg(long, short = 'b')]
        build_type: String,

        /// Path to the declaration file (default: variants.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        #[command(flatten)]
        signing: SigningArgs,

        /// Output the report as JSON instead of human-readable text
        #[arg(long)]
        json: bool,

        /// Also write the report to a file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Explain a resolution decision without producing a report file
    Explain {
        /// Build type: debug or release
        #[arg(long, short = 'b')]
        build_type: String,

        /// Path to the declaration file (default: variants.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        #[command(flatten)]
        signing: SigningArgs,

        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,
    },

    /// Verify the declaration file structure
    Verify {
        /// Path to the declaration file (default: variants.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            build_type,
            config,
            signing,
            json,
            out,
        } => run_resolve(&build_type, config, &signing, json, out),
        Commands::Explain {
            build_type,
            config,
            signing,
            human,
        } => run_explain(&build_type, config, &signing, human),
        Commands::Verify { config } => run_verify(config),
    }
}

fn parse_build_type(s: &str) -> BuildType {
    match s.parse::<BuildType>() {
        Ok(bt) => bt,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(ExitCode::Config.as_i32());
        }
    }
}

fn load_config(path: Option<PathBuf>) -> VariantConfig {
    let path = path.unwrap_or_else(|| PathBuf::from("variants.toml"));

    match VariantConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config {}: {}", path.display(), e);
            process::exit(ExitCode::Config.as_i32());
        }
    }
}

fn run_resolve(
    build_type: &str,
    config_path: Option<PathBuf>,
    signing: &SigningArgs,
    json: bool,
    out: Option<PathBuf>,
) {
    let build_type = parse_build_type(build_type);
    let config = load_config(config_path);
    let resolver = Resolver::new(config);

    // Fresh snapshot per invocation; variants never share one.
    let env = EnvSnapshot::from_process();
    let plan = match resolver.resolve(build_type, &signing.to_overrides(), &env) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Plan rejected [{}]: {}", e.code(), e);
            process::exit(e.exit_code().as_i32());
        }
    };

    let report = ResolutionReport::new(
        plan,
        resolver
            .config()
            .source_path
            .as_ref()
            .map(|p| p.display().to_string()),
        resolver.config().source_digest.clone(),
    );

    if let Some(ref out_path) = out {
        if let Err(e) = report.write_to_file(out_path) {
            eprintln!("Error writing report to {}: {}", out_path.display(), e);
            process::exit(ExitCode::Config.as_i32());
        }
    }

    if json {
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(ExitCode::Config.as_i32());
            }
        }
    } else {
        println!("{}", report.to_human());
    }
}

fn run_explain(
    build_type: &str,
    config_path: Option<PathBuf>,
    signing: &SigningArgs,
    human: bool,
) {
    let build_type = parse_build_type(build_type);
    let config = load_config(config_path);
    let resolver = Resolver::new(config);

    let env = EnvSnapshot::from_process();
    let outcome = resolver.compose(build_type, &signing.to_overrides(), &env);
    let rejection = match &outcome {
        Ok(plan) => plan.validate().err(),
        Err(e) => Some(e.clone()),
    };
    let explain = ExplainOutput::from_outcome(build_type, &outcome);

    if human {
        println!("{}", explain.to_human());
    } else {
        match explain.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(ExitCode::Config.as_i32());
            }
        }
    }

    match rejection {
        None => process::exit(ExitCode::Success.as_i32()),
        Some(e) => process::exit(e.exit_code().as_i32()),
    }
}

fn run_verify(config_path: Option<PathBuf>) {
    let path = config_path.unwrap_or_else(|| PathBuf::from("variants.toml"));

    let config = match VariantConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(ExitCode::Config.as_i32());
        }
    };

    let abis = match AbiSet::resolve(&config.abis) {
        Ok(abis) => abis,
        Err(e) => {
            eprintln!("Configuration error [{}]: {}", e.code(), e);
            process::exit(e.exit_code().as_i32());
        }
    };

    if !config.has_target() {
        eprintln!("Configuration error [EMPTY_TARGET]: no packaging format requested");
        process::exit(ExitCode::EmptyTarget.as_i32());
    }

    println!("Configuration valid: {}", path.display());
    println!();
    println!("  Application id: {}", config.application_id);
    println!(
        "  SDK: min {} / target {} / compile {}",
        config.sdk.min_sdk, config.sdk.target_sdk, config.sdk.compile_sdk
    );
    println!(
        "  ABIs: {}",
        abis.iter().map(|a| a.as_str()).collect::<Vec<_>>().join(", ")
    );
    println!(
        "  Targets: apk={} bundle={}",
        config.targets.apk, config.targets.bundle
    );
    println!(
        "  Splits: abi={} density={} language={} universal={}",
        config.splits.abi, config.splits.density, config.splits.language, config.splits.universal
    );
    println!(
        "  Shrink: minify={} resources={}",
        config.shrink.minify, config.shrink.resources
    );
}
