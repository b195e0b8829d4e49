//! Secret commands (write, read, delete, list, export, history).

use serde::Serialize;

use super::output;
use crate::core::domain::{SecretId, Version};
use crate::core::store::SecretStore;
use crate::error::{Error, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| Error::EncodingFailure(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Set a secret value. An empty value deletes the key.
pub fn write(store: &dyn SecretStore, service: &str, key: &str, value: &str) -> Result<()> {
    let id = SecretId::new(service, key);
    store.write(&id, value)?;
    if value.is_empty() {
        output::success(&format!("deleted {}", id));
    } else {
        output::success(&format!("wrote {}", id));
    }
    Ok(())
}

/// Read a secret.
pub fn read(
    store: &dyn SecretStore,
    service: &str,
    key: &str,
    version: Option<u32>,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let id = SecretId::new(service, key);
    let secret = store.read(&id, Version::from(version))?;

    if json {
        return print_json(&secret);
    }

    let value = secret.value.as_deref().unwrap_or_default();
    if quiet {
        println!("{}", value);
        return Ok(());
    }

    output::kv("key", &secret.meta.key);
    output::kv("value", value);
    output::kv("version", secret.meta.version);
    output::kv("created", secret.meta.created.to_rfc3339());
    output::kv("by", &secret.meta.created_by);
    Ok(())
}

/// Remove a secret.
pub fn delete(store: &dyn SecretStore, service: &str, key: &str) -> Result<()> {
    let id = SecretId::new(service, key);
    store.delete(&id)?;
    output::success(&format!("deleted {}", id));
    Ok(())
}

/// List secrets in a service.
pub fn list(store: &dyn SecretStore, service: &str, values: bool, json: bool) -> Result<()> {
    let secrets = store.list(service, values)?;

    if json {
        return print_json(&secrets);
    }
    if secrets.is_empty() {
        output::dimmed("no secrets stored");
        return Ok(());
    }

    println!("{} secrets in {}:", secrets.len(), service);
    for secret in &secrets {
        let details = format!(
            "v{}  {}  {}",
            secret.meta.version,
            secret.meta.created.format("%Y-%m-%d %H:%M:%S"),
            secret.meta.created_by
        );
        match &secret.value {
            Some(value) => output::key_line(secret.key(), format!("{}  = {}", details, value)),
            None => output::key_line(secret.key(), details),
        }
    }
    Ok(())
}

/// Export raw key/value pairs as a JSON object.
pub fn export(store: &dyn SecretStore, service: &str) -> Result<()> {
    let pairs: std::collections::BTreeMap<String, String> = store
        .list_raw(service)?
        .into_iter()
        .map(|raw| (raw.key, raw.value))
        .collect();
    print_json(&pairs)
}

/// Show a secret's change history.
pub fn history(store: &dyn SecretStore, service: &str, key: &str, json: bool) -> Result<()> {
    let id = SecretId::new(service, key);
    let events = store.history(&id)?;

    if json {
        return print_json(&events);
    }

    for event in &events {
        println!(
            "v{:<4} {:<8} {}  {}",
            event.version,
            event.kind,
            event.time.format("%Y-%m-%d %H:%M:%S"),
            event.user
        );
    }
    Ok(())
}
