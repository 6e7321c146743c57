//! Local host identity reported to dashboard clients.

/// Reported when the hostname cannot be resolved.
pub const UNKNOWN_HOSTNAME: &str = "Unknown";

/// Resolve this machine's hostname, falling back to [`UNKNOWN_HOSTNAME`].
pub fn local_hostname() -> String {
    match read_hostname() {
        Ok(name) if !name.is_empty() => name,
        Ok(_) => UNKNOWN_HOSTNAME.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve local hostname");
            UNKNOWN_HOSTNAME.to_string()
        }
    }
}

fn read_hostname() -> std::io::Result<String> {
    let name = hostname::get()?;
    Ok(name.to_string_lossy().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_a_name() {
        let name = local_hostname();
        assert!(!name.is_empty());
        assert!(!name.contains('\0'));
    }

    #[test]
    fn stable_across_calls() {
        assert_eq!(local_hostname(), local_hostname());
    }
}
