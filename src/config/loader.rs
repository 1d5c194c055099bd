//! Configuration loading from the process environment.

use thiserror::Error;

use crate::config::schema::{
    ContactConfig, ListenerConfig, LogFormat, MailConfig, MailUnavailable, ObservabilityConfig,
    RateLimitConfig, ServerConfig, SmtpConfig,
};

/// Variables that must all be set before mail can be delivered.
pub const MAIL_VARIABLES: [&str; 6] = [
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASS",
    "CONTACT_TO",
    "CONTACT_FROM",
];

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid TCP port, got {0:?}")]
    InvalidPort(String),
}

/// Load configuration from the process environment.
pub fn from_env() -> Result<ServerConfig, ConfigError> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable source.
///
/// Empty values are treated as unset. A missing or malformed mail variable
/// leaves `mail` as an `Err` naming the problem rather than failing: the
/// server still answers health checks and reports the misconfiguration per
/// request. Nothing is logged here; the caller may not have a subscriber yet.
pub fn from_lookup<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut listener = ListenerConfig::default();
    if let Some(port) = var("PORT") {
        listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
    }
    if let Some(origin) = var("CORS_ORIGIN") {
        listener.cors_origin = origin;
    }

    let observability = ObservabilityConfig {
        log_format: LogFormat::parse(var("LOG_FORMAT").as_deref()),
    };

    Ok(ServerConfig {
        listener,
        mail: load_mail(&var),
        rate_limit: RateLimitConfig::default(),
        observability,
    })
}

fn load_mail<F>(var: &F) -> Result<MailConfig, MailUnavailable>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&'static str> = MAIL_VARIABLES
        .iter()
        .copied()
        .filter(|&key| var(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(MailUnavailable::Missing(missing));
    }
    let required = |key: &'static str| var(key).ok_or_else(|| MailUnavailable::Missing(vec![key]));

    let port = required("SMTP_PORT")?
        .trim()
        .parse::<u16>()
        .map_err(|_| MailUnavailable::InvalidSmtpPort)?;

    Ok(MailConfig {
        smtp: SmtpConfig {
            host: required("SMTP_HOST")?,
            port,
            user: required("SMTP_USER")?,
            password: required("SMTP_PASS")?,
        },
        contact: ContactConfig {
            from: required("CONTACT_FROM")?,
            to: required("CONTACT_TO")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("SMTP_USER", "mailer"),
            ("SMTP_PASS", "hunter2"),
            ("CONTACT_TO", "owner@example.com"),
            ("CONTACT_FROM", "noreply@example.com"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<ServerConfig, ConfigError> {
        from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = load(&HashMap::new()).unwrap();
        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.listener.cors_origin, "*");
        assert_eq!(config.listener.max_body_bytes, 256 * 1024);
        assert_eq!(config.rate_limit.max_requests, 20);
        assert_eq!(config.rate_limit.window.as_secs(), 900);
        assert!(config.mail.is_err());
    }

    #[test]
    fn full_mail_environment_is_loaded() {
        let config = load(&full_env()).unwrap();
        let mail = config.mail.expect("mail section");
        assert_eq!(mail.smtp.host, "smtp.example.com");
        assert_eq!(mail.smtp.port, 587);
        assert!(!mail.smtp.implicit_tls());
        assert_eq!(mail.contact.to, "owner@example.com");
        assert_eq!(mail.contact.from, "noreply@example.com");
    }

    #[test]
    fn any_single_missing_mail_variable_disables_mail() {
        for key in MAIL_VARIABLES {
            let mut env = full_env();
            env.remove(key);
            assert_eq!(
                load(&env).unwrap().mail.err(),
                Some(MailUnavailable::Missing(vec![key])),
                "{key} removed"
            );

            let mut env = full_env();
            env.insert(key, "  ");
            assert!(load(&env).unwrap().mail.is_err(), "{key} blank");
        }
    }

    #[test]
    fn non_numeric_smtp_port_disables_mail() {
        let mut env = full_env();
        env.insert("SMTP_PORT", "submission");
        assert_eq!(load(&env).unwrap().mail.err(), Some(MailUnavailable::InvalidSmtpPort));
    }

    #[test]
    fn unavailability_reason_names_variables_not_values() {
        let mut env = full_env();
        env.remove("SMTP_HOST");
        env.remove("CONTACT_TO");
        let reason = load(&env).unwrap().mail.unwrap_err().to_string();
        assert_eq!(reason, "variables not set: SMTP_HOST, CONTACT_TO");
        assert!(!reason.contains("hunter2"));
    }

    #[test]
    fn port_465_selects_implicit_tls() {
        let mut env = full_env();
        env.insert("SMTP_PORT", "465");
        assert!(load(&env).unwrap().mail.unwrap().smtp.implicit_tls());
    }

    #[test]
    fn invalid_listener_port_is_fatal() {
        let env = HashMap::from([("PORT", "eighty")]);
        assert!(matches!(load(&env), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn listener_overrides_and_log_format() {
        let env = HashMap::from([
            ("PORT", "8081"),
            ("CORS_ORIGIN", "https://example.com"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let config = load(&env).unwrap();
        assert_eq!(config.listener.port, 8081);
        assert_eq!(config.listener.cors_origin, "https://example.com");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn smtp_password_is_redacted_in_debug_output() {
        let config = load(&full_env()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
