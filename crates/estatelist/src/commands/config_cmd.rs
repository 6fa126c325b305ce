//! Config inspection commands. These never need a portal connection.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", estatelist_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let config = estatelist_config::load_config_or_default();
            println!(
                "default_profile: {}",
                config.default_profile.as_deref().unwrap_or("<none>")
            );
            println!("defaults.output: {}", config.defaults.output);
            println!("defaults.timeout: {}s", config.defaults.timeout);
            for (name, profile) in &config.profiles {
                println!("\n[{name}]");
                println!("  project_url: {}", profile.project_url);
                println!(
                    "  anon_key: {}",
                    if profile.anon_key.is_some() {
                        "<set in config (consider keyring)>"
                    } else {
                        "<resolved via env/keyring>"
                    }
                );
                if let Some(ref bucket) = profile.bucket {
                    println!("  bucket: {bucket}");
                }
            }
            if !global.quiet && config.profiles.is_empty() {
                eprintln!("\nNo profiles configured yet.");
            }
            Ok(())
        }
    }
}
