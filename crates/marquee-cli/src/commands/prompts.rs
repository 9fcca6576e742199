use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Confirm;

/// Prompt for yes/no with optional default
pub fn prompt_yes_no(prompt: &str, default: Option<bool>) -> Result<bool> {
    let mut confirm = Confirm::new().with_prompt(prompt);
    if let Some(default_value) = default {
        confirm = confirm.default(default_value);
    }
    confirm
        .interact()
        .map_err(|e| eyre!("Failed to read confirmation: {}", e))
}

/// Read a secret without echoing it
pub fn prompt_secret(prompt: &str) -> Result<String> {
    let value = rpassword::prompt_password(format!("{}: ", prompt))
        .map_err(|e| eyre!("Failed to read input: {}", e))?;
    Ok(value.trim().to_string())
}
