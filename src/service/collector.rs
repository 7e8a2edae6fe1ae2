//! Application settings collection.
//!
//! Both modes implement [`ValueSource`] and are driven over the same
//! [`FIELDS`] table by [`collect`].

use std::env::VarError;
use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::domain::fields::SECRET_MIN_LEN;
use crate::domain::style;
use crate::domain::{secret, ConfigRecord, DeployError, FieldSpec, FIELDS};

/// Trait for obtaining the value of one declared field.
pub trait ValueSource {
    fn obtain(&mut self, field: &FieldSpec) -> Result<String, DeployError>;
}

/// Collect every declared field, in declaration order.
pub fn collect(source: &mut dyn ValueSource) -> Result<ConfigRecord, DeployError> {
    let mut record = ConfigRecord::new();
    for field in FIELDS {
        let value = source.obtain(field)?;
        debug!(key = field.key, empty = value.is_empty(), "Collected field");
        record.insert(field.key, value);
    }
    info!(fields = record.len(), "Configuration collected");
    Ok(record)
}

/// Non-interactive mode: environment variables, then declared defaults.
pub struct EnvironmentSource<F, W> {
    lookup: F,
    out: W,
}

impl<F, W> EnvironmentSource<F, W>
where
    F: Fn(&str) -> Result<Option<String>, DeployError>,
    W: Write,
{
    pub fn new(lookup: F, out: W) -> Self {
        Self { lookup, out }
    }
}

/// Environment lookup backed by the process environment.
pub type ProcessEnv = fn(&str) -> Result<Option<String>, DeployError>;

/// Unset is `None`. A value that is not UTF-8 is an error rather than unset,
/// so a mangled secret is never silently replaced.
fn process_env(key: &str) -> Result<Option<String>, DeployError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => {
            warn!(key, "Environment variable is not valid UTF-8");
            Err(DeployError::InvalidEnv {
                key: key.to_string(),
            })
        }
    }
}

impl<W: Write> EnvironmentSource<ProcessEnv, W> {
    /// Read from the process environment.
    pub fn from_env(out: W) -> Self {
        Self::new(process_env as ProcessEnv, out)
    }
}

impl<F, W> ValueSource for EnvironmentSource<F, W>
where
    F: Fn(&str) -> Result<Option<String>, DeployError>,
    W: Write,
{
    fn obtain(&mut self, field: &FieldSpec) -> Result<String, DeployError> {
        let mut value = (self.lookup)(field.key)?.unwrap_or_else(|| field.default.to_string());

        if field.is_secret() && value.is_empty() {
            value = secret::generate();
            writeln!(
                self.out,
                "  Generated {}: {}",
                field.key,
                secret::preview(&value)
            )?;
        }

        if field.required && value.is_empty() {
            return Err(DeployError::MissingRequired {
                key: field.key.to_string(),
            });
        }
        Ok(value)
    }
}

/// Interactive mode: one prompt per field.
pub struct PromptSource<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Read one trimmed line. End of input reads as an empty line.
    fn read_answer(&mut self) -> Result<String, DeployError> {
        self.out.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn obtain_secret(&mut self, field: &FieldSpec) -> Result<String, DeployError> {
        let generated = secret::generate();
        writeln!(self.out, "  {}", field.prompt)?;
        writeln!(
            self.out,
            "  [Generated: {}] (press Enter to use, or type your own)",
            secret::preview(&generated)
        )?;
        write!(self.out, "  > ")?;

        let answer = self.read_answer()?;
        if answer.is_empty() {
            return Ok(generated);
        }
        if answer.chars().count() < SECRET_MIN_LEN {
            warn!(length = answer.chars().count(), "Rejected short secret");
            writeln!(
                self.out,
                "{}",
                style::warning(&format!(
                    "JWT secret should be at least {} characters. Using generated value.",
                    SECRET_MIN_LEN
                ))
            )?;
            return Ok(generated);
        }
        Ok(answer)
    }
}

impl<R: BufRead, W: Write> ValueSource for PromptSource<R, W> {
    fn obtain(&mut self, field: &FieldSpec) -> Result<String, DeployError> {
        if field.is_secret() {
            return self.obtain_secret(field);
        }

        let suffix = if field.required {
            " [required]: ".to_string()
        } else if !field.default.is_empty() {
            format!(" [{}]: ", field.default)
        } else {
            ": ".to_string()
        };
        write!(self.out, "  {}{}", field.prompt, suffix)?;

        let answer = self.read_answer()?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        if field.required {
            return Err(DeployError::RequiredInput {
                prompt: field.prompt.to_string(),
            });
        }
        Ok(field.default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;

    fn is_generated_secret(value: &str) -> bool {
        value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn env_source(
        vars: &[(&str, &str)],
    ) -> EnvironmentSource<impl Fn(&str) -> Result<Option<String>, DeployError>, Vec<u8>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvironmentSource::new(move |key: &str| Ok(vars.get(key).cloned()), Vec::new())
    }

    #[test]
    fn test_environment_defaults_when_unset() {
        let mut source = env_source(&[]);
        let record = collect(&mut source).unwrap();

        assert_eq!(record.len(), FIELDS.len());
        for field in FIELDS.iter().filter(|f| !f.is_secret()) {
            assert_eq!(record.get(field.key), Some(field.default), "{}", field.key);
        }
        assert!(is_generated_secret(record.get("JWT_SECRET").unwrap()));

        let printed = String::from_utf8(source.out).unwrap();
        assert!(printed.contains("Generated JWT_SECRET: "));
    }

    #[test]
    fn test_environment_values_override_defaults() {
        let secret = "s".repeat(40);
        let mut source = env_source(&[
            ("JWT_SECRET", secret.as_str()),
            ("VITE_STORE_NAME", "Card Shop"),
            ("SMTP_HOST", "mail.example.com"),
        ]);
        let record = collect(&mut source).unwrap();

        assert_eq!(record.get("JWT_SECRET"), Some(secret.as_str()));
        assert_eq!(record.get("VITE_STORE_NAME"), Some("Card Shop"));
        assert_eq!(record.get("SMTP_HOST"), Some("mail.example.com"));
        assert_eq!(record.get("SMTP_PORT"), Some("587"));
    }

    #[test]
    fn test_environment_empty_secret_is_generated() {
        let mut source = env_source(&[("JWT_SECRET", "")]);
        let record = collect(&mut source).unwrap();
        assert!(is_generated_secret(record.get("JWT_SECRET").unwrap()));
    }

    #[test]
    fn test_environment_required_without_default_fails() {
        let field = FieldSpec {
            key: "DATABASE_URL",
            prompt: "Database URL",
            default: "",
            required: true,
        };
        let mut source = env_source(&[]);
        let err = source.obtain(&field).unwrap_err();
        assert!(matches!(err, DeployError::MissingRequired { ref key } if key == "DATABASE_URL"));
    }

    #[test]
    fn test_environment_lookup_error_aborts() {
        let lookup = |key: &str| -> Result<Option<String>, DeployError> {
            if key == "JWT_SECRET" {
                Err(DeployError::InvalidEnv {
                    key: key.to_string(),
                })
            } else {
                Ok(None)
            }
        };
        let mut source = EnvironmentSource::new(lookup, Vec::new());
        let err = collect(&mut source).unwrap_err();
        assert!(matches!(err, DeployError::InvalidEnv { ref key } if key == "JWT_SECRET"));
        assert!(source.out.is_empty(), "no secret should have been generated");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_env_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let key = "LISTPULL_DEPLOY_TEST_NON_UTF8";
        std::env::set_var(key, OsStr::from_bytes(&[0x66, 0x6f, 0xff, 0x6f]));
        let result = process_env(key);
        std::env::remove_var(key);

        assert!(matches!(result, Err(DeployError::InvalidEnv { .. })));
        assert!(matches!(process_env("LISTPULL_DEPLOY_TEST_UNSET"), Ok(None)));
    }

    #[test]
    fn test_environment_secrets_differ_across_runs() {
        let a = collect(&mut env_source(&[])).unwrap();
        let b = collect(&mut env_source(&[])).unwrap();
        assert_ne!(a.get("JWT_SECRET"), b.get("JWT_SECRET"));
    }

    #[test]
    fn test_prompt_short_secret_replaced_with_warning() {
        let input = format!("{}\n", "0123456789");
        let mut source = PromptSource::new(Cursor::new(input), Vec::new());
        let record = collect(&mut source).unwrap();

        let secret = record.get("JWT_SECRET").unwrap();
        assert!(is_generated_secret(secret));
        assert_ne!(secret, "0123456789");

        let printed = String::from_utf8(source.out).unwrap();
        assert!(printed.contains("JWT secret should be at least 32 characters"));
    }

    #[test]
    fn test_prompt_accepts_long_secret_and_answers() {
        let secret = "x".repeat(32);
        let input = format!("{}\n  Card Shop  \n\n\n\nCS\n", secret);
        let mut source = PromptSource::new(Cursor::new(input), Vec::new());
        let record = collect(&mut source).unwrap();

        assert_eq!(record.get("JWT_SECRET"), Some(secret.as_str()));
        assert_eq!(record.get("VITE_STORE_NAME"), Some("Card Shop"));
        assert_eq!(record.get("VITE_STORE_EMAIL"), Some("contact@example.com"));
        assert_eq!(record.get("VITE_ORDER_PREFIX"), Some("CS"));
        // Input ran out: remaining fields take their defaults
        assert_eq!(record.get("VITE_MAX_DECKLIST_CARDS"), Some("500"));
        assert_eq!(record.get("SMTP_HOST"), Some(""));
    }

    #[test]
    fn test_prompt_empty_secret_uses_generated() {
        let mut source = PromptSource::new(Cursor::new("\n"), Vec::new());
        let record = collect(&mut source).unwrap();
        assert!(is_generated_secret(record.get("JWT_SECRET").unwrap()));
    }

    #[test]
    fn test_prompt_suffixes() {
        let mut source = PromptSource::new(Cursor::new("\n\n"), Vec::new());
        let name = FIELDS.iter().find(|f| f.key == "VITE_STORE_NAME").unwrap();
        let host = FIELDS.iter().find(|f| f.key == "SMTP_HOST").unwrap();
        source.obtain(name).unwrap();
        source.obtain(host).unwrap();

        let printed = String::from_utf8(source.out).unwrap();
        assert!(printed.contains("  Store Name [ListPull]: "));
        assert!(printed.contains("  SMTP Host (optional): "));
    }

    #[test]
    fn test_prompt_required_empty_fails() {
        let field = FieldSpec {
            key: "ADMIN_EMAIL",
            prompt: "Admin Email",
            default: "",
            required: true,
        };
        let mut source = PromptSource::new(Cursor::new("\n"), Vec::new());
        let err = source.obtain(&field).unwrap_err();
        assert_eq!(err.to_string(), "Admin Email is required");

        let printed = String::from_utf8(source.out).unwrap();
        assert!(printed.contains("Admin Email [required]: "));
    }
}
