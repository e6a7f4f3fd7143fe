use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config, ModelConfig};
use crate::pricing::{validate_pricing, PricingConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses as a number accepted by `check`.
fn prompt_number(message: &str, default: f64, check: impl Fn(f64) -> bool) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && check(v) => return Ok(v),
            _ => println!("  Invalid value. Try again."),
        }
    }
}

/// Serialize a config and write it to `path`, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Loan Sage Configuration Wizard");
    println!("==============================");
    println!();

    let defaults = PricingConfig::default();
    let configure_pricing = prompt_yes_no("Configure pricing? (n accepts defaults)", true)?;

    let pricing = if configure_pricing {
        println!();
        println!("The base rate is the annual interest rate before the risk premium is added.");
        let base_rate = prompt_number("Base rate (%)", defaults.base_rate(), |v| v >= 0.0)?;

        println!();
        println!("Tenure is used when an application does not ask for one.");
        let tenure_years = prompt_number("Tenure (years)", defaults.tenure_years(), |v| v > 0.0)?;

        PricingConfig {
            base_rate: Some(base_rate),
            tenure_years: Some(tenure_years),
            ..defaults
        }
    } else {
        defaults
    };

    if let Err(errors) = validate_pricing(&pricing) {
        anyhow::bail!("Pricing config is invalid: {}", errors.join("; "));
    }

    println!();
    println!("A trained model artifact is optional.");
    println!("Without one, applications are scored with rules.");
    let use_model = prompt_yes_no("Use a model artifact?", false)?;
    let model = if use_model {
        let path = prompt_with_default("Model artifact path", crate::config::DEFAULT_MODEL_PATH)?;
        ModelConfig {
            enabled: true,
            path: Some(PathBuf::from(path)),
        }
    } else {
        ModelConfig {
            enabled: false,
            path: None,
        }
    };

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        model: Some(model),
        pricing: Some(pricing),
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `loan-sage assess --help` to score an application.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_write_config_roundtrip() {
        let dir = env::temp_dir().join("loan_sage_test_init");
        let path = dir.join("config.yaml");
        let _ = std::fs::remove_dir_all(&dir);

        let config = Config {
            model: Some(ModelConfig {
                enabled: true,
                path: Some(PathBuf::from("models/custom.json")),
            }),
            pricing: Some(PricingConfig::default()),
        };
        write_config(&path, &config).unwrap();

        let loaded = crate::config::load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
