use crate::{Config, DEFAULT_COOKIE_SECRET, media, store};
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

const REQUIRED_TEMPLATES: &[&str] = &[
    "_header.html.liquid",
    "_footer.html.liquid",
    "login.html.liquid",
    "gallery.html.liquid",
    "photo.html.liquid",
    "upload.html.liquid",
    "upload_result.html.liquid",
    "admin.html.liquid",
    "admin_edit.html.liquid",
    "error.html.liquid",
];

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Templates directory does not exist: {0}")]
    TemplatesDirectoryMissing(String),

    #[error("Required template missing: {0}")]
    RequiredTemplateMissing(String),

    #[error("Static files directory does not exist")]
    StaticDirectoryMissing,

    #[error("The {0} password is empty")]
    EmptyPassword(&'static str),

    #[error("Admin and user passwords are identical; every login would be an admin")]
    SharedPassword,

    #[error("Cookie secret is the built-in default")]
    DefaultCookieSecret,
}

impl StartupCheckError {
    /// Failures the server cannot run without.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::TemplatesDirectoryMissing(_)
                | StartupCheckError::RequiredTemplateMissing(_)
        )
    }
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    let templates_dir = Path::new(&config.templates.directory);
    if !templates_dir.exists() {
        error!("Templates directory does not exist: {:?}", templates_dir);
        errors.push(StartupCheckError::TemplatesDirectoryMissing(
            templates_dir.display().to_string(),
        ));
    } else {
        info!("Templates directory exists: {:?}", templates_dir);
        for template in REQUIRED_TEMPLATES {
            if !templates_dir.join(template).exists() {
                error!("Required template missing: {}", template);
                errors.push(StartupCheckError::RequiredTemplateMissing(
                    template.to_string(),
                ));
            }
        }
    }

    let static_dir = Path::new(&config.static_files.directory);
    if !static_dir.exists() {
        warn!("Static files directory does not exist: {:?}", static_dir);
        errors.push(StartupCheckError::StaticDirectoryMissing);
    } else {
        info!("Static files directory exists: {:?}", static_dir);
    }

    let app = &config.app;
    if app.admin_password.is_empty() {
        warn!("No admin password configured; nobody can sign in as admin");
        errors.push(StartupCheckError::EmptyPassword("admin"));
    }
    if app.user_password.is_empty() {
        warn!("No user password configured; only the admin can sign in");
        errors.push(StartupCheckError::EmptyPassword("user"));
    }
    if !app.admin_password.is_empty() && app.admin_password == app.user_password {
        warn!("Admin and user passwords are identical");
        errors.push(StartupCheckError::SharedPassword);
    }
    if app.cookie_secret == DEFAULT_COOKIE_SECRET {
        warn!("Cookie secret is the default; set PHOTOSHARE_COOKIE_SECRET");
        errors.push(StartupCheckError::DefaultCookieSecret);
    }

    if matches!(config.media, media::MediaHostConfig::Memory(_)) {
        warn!("Using the in-memory media host; uploads are lost on restart");
    }
    if matches!(config.store, store::PhotoStoreConfig::Memory) {
        warn!("Using the in-memory photo store; records are lost on restart");
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.templates.directory = dir.path().join("templates");
        config.static_files.directory = dir.path().join("static");
        config.app.admin_password = "admin".to_string();
        config.app.user_password = "family".to_string();
        config.app.cookie_secret = "not-the-default".to_string();
        config
    }

    #[tokio::test]
    async fn test_complete_setup_passes() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::create_dir_all(&config.templates.directory).unwrap();
        std::fs::create_dir_all(&config.static_files.directory).unwrap();
        for template in REQUIRED_TEMPLATES {
            std::fs::write(config.templates.directory.join(template), "").unwrap();
        }

        assert!(perform_startup_checks(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_templates_are_critical() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert!(errors.iter().any(StartupCheckError::is_critical));
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, StartupCheckError::StaticDirectoryMissing))
        );
    }

    #[tokio::test]
    async fn test_weak_secrets_are_reported_but_not_critical() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        std::fs::create_dir_all(&config.templates.directory).unwrap();
        std::fs::create_dir_all(&config.static_files.directory).unwrap();
        for template in REQUIRED_TEMPLATES {
            std::fs::write(config.templates.directory.join(template), "").unwrap();
        }
        config.app.user_password = "admin".to_string();
        config.app.cookie_secret = DEFAULT_COOKIE_SECRET.to_string();

        let errors = perform_startup_checks(&config).await.unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| !e.is_critical()));
    }
}
