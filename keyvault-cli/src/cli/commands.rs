//! Command implementations

use anyhow::{Context, Result};
use keyvault_core::types::{ApiKey, NewApiKey};
use keyvault_core::ApiKeyService;

use super::AddArgs;

/// Store a new API key and print its ID.
pub async fn add(svc: &ApiKeyService, args: AddArgs) -> Result<()> {
    let mut new_key = NewApiKey::new(args.name, args.key);
    new_key.organization = args.organization;
    new_key.project_id = args.project_id;
    new_key.description = args.description;

    let id = svc
        .insert(new_key)
        .await
        .context("Failed to store API key")?;
    println!("Stored API key #{id}");
    Ok(())
}

pub async fn list(svc: &ApiKeyService, json: bool) -> Result<()> {
    let keys = svc.list_all().await.context("Failed to list API keys")?;
    print_keys(&keys, json)
}

pub async fn search(svc: &ApiKeyService, query: &str, json: bool) -> Result<()> {
    let keys = svc.search(query).await.context("Search failed")?;
    print_keys(&keys, json)
}

fn print_keys(keys: &[ApiKey], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(keys)?);
        return Ok(());
    }

    if keys.is_empty() {
        println!("No API keys found.");
        return Ok(());
    }

    for key in keys {
        println!("{}", format_row(key));
    }
    println!("\n{} key(s)", keys.len());
    Ok(())
}

fn format_row(key: &ApiKey) -> String {
    let mut row = format!("#{:<4} {:<24} {}", key.id, key.name, mask_secret(&key.key));
    if let Some(org) = &key.organization {
        row.push_str(&format!("  org={org}"));
    }
    if let Some(project) = &key.project_id {
        row.push_str(&format!("  project={project}"));
    }
    if let Some(desc) = &key.description {
        row.push_str(&format!("  \"{desc}\""));
    }
    row
}

/// Keep the first four characters, hide the rest.
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_all_but_prefix() {
        assert_eq!(mask_secret("sk-abcdef"), "sk-a****");
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn row_lists_present_optionals_only() {
        let now = chrono::Utc::now();
        let key = ApiKey::from_new(
            7,
            &NewApiKey::new("Stripe", "sk_live_123").with_organization("Acme"),
            now,
        );
        let row = format_row(&key);
        assert!(row.starts_with("#7"));
        assert!(row.contains("sk_l****"));
        assert!(row.contains("org=Acme"));
        assert!(!row.contains("project="));
        assert!(!row.contains("sk_live_123"));
    }
}
