//! Runner wiring configuration, credentials and the image commands together

use crate::cli::args::{Args, Command, ImagesCommand};
use crate::config::{AppConfig, CredentialSource};
use crate::error::Result;
use crate::image::{
    DeleteOptions, DeleteOutcome, GcStatus, ImageDeleter, ImageLister, ImageReference,
    ListOptions,
};
use crate::logging::Logger;
use crate::output::{ImageRenderer, OutputFormat};
use crate::registry::{
    CredentialManager, CredentialProvider, CredentialRequest, HttpCredentialProvider,
    RegistryClient, RegistryClientBuilder, StaticCredentialProvider,
};
use std::sync::Arc;

pub struct Runner {
    config: AppConfig,
    command: Command,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Result<Self> {
        let config = AppConfig::from_args(&args)?;
        let output = if config.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(config.verbose)
        };

        Ok(Self {
            config,
            command: args.command,
            output,
        })
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<()> {
        let client = self.create_registry_client()?;
        let credentials = self.create_credential_manager(&client);

        match &self.command {
            Command::Images { command } => match command {
                ImagesCommand::List {
                    filter,
                    include_digests,
                    json,
                } => {
                    let options = ListOptions {
                        filter: filter.clone(),
                        include_digests: *include_digests,
                    };
                    self.list(&client, &credentials, &options, OutputFormat::from_json_flag(*json))
                        .await
                }
                ImagesCommand::Delete { image, concurrency } => {
                    let options = DeleteOptions {
                        concurrency: usize::from(*concurrency),
                    };
                    self.delete(&client, &credentials, image, options).await
                }
            },
        }
    }

    fn create_registry_client(&self) -> Result<RegistryClient> {
        let registry = &self.config.registry;
        self.output
            .verbose(&format!("Registry: {} ({})", registry.domain, registry.base_url));

        RegistryClientBuilder::new(registry.base_url.clone())
            .with_timeout(registry.timeout)
            .with_skip_tls(registry.skip_tls)
            .with_output(self.output.clone())
            .build()
    }

    fn create_credential_manager(&self, client: &RegistryClient) -> CredentialManager {
        let provider: Arc<dyn CredentialProvider> = match &self.config.credentials {
            CredentialSource::Static { password } => {
                Arc::new(StaticCredentialProvider::new(password.clone()))
            }
            CredentialSource::Service { api_url, api_token } => Arc::new(
                HttpCredentialProvider::new(client.http_client().clone(), api_url.clone(), api_token.clone()),
            ),
        };

        CredentialManager::new(
            provider,
            CredentialRequest::pull_push(self.config.registry.domain.clone()),
            self.output.clone(),
        )
    }

    async fn list(
        &self,
        client: &RegistryClient,
        credentials: &CredentialManager,
        options: &ListOptions,
        format: OutputFormat,
    ) -> Result<()> {
        let credential = credentials.credential().await?;
        let images = ImageLister::new(client, self.output.clone())
            .list_images(options, &credential)
            .await?;

        // Results go to stdout even in quiet mode
        println!("{}", ImageRenderer::render(&images, format)?);
        Ok(())
    }

    async fn delete(
        &self,
        client: &RegistryClient,
        credentials: &CredentialManager,
        image: &str,
        options: DeleteOptions,
    ) -> Result<()> {
        let reference = ImageReference::parse(image)?;
        self.output.section(&format!("Deleting {}", reference));

        let outcome = ImageDeleter::new(client, credentials, self.output.clone())
            .with_options(options)
            .delete(&reference)
            .await?;

        match outcome {
            DeleteOutcome::NoTags { .. } => {}
            DeleteOutcome::Deleted { deleted, gc, .. } => {
                if matches!(gc, GcStatus::Failed(_)) {
                    self.output
                        .warning("Tags were deleted but storage may not be reclaimed until the next GC");
                }
                self.output.verbose(&format!(
                    "Deleted {} tag(s) from {} in {}",
                    deleted.len(),
                    reference.repository(),
                    self.output.format_duration(self.output.elapsed())
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_runner_requires_credentials() {
        let args = Args::try_parse_from(["registry-images", "images", "list"]).unwrap();
        assert!(Runner::new(args).is_err());
    }

    #[test]
    fn test_runner_quiet_mode() {
        let args = Args::try_parse_from([
            "registry-images",
            "--password",
            "pw",
            "-q",
            "images",
            "delete",
            "demo:v1",
        ])
        .unwrap();

        let runner = Runner::new(args).unwrap();
        assert!(runner.config.quiet);
        assert_eq!(runner.config.registry.domain, "registry.cloudchamber.cfdata.org");
    }
}
