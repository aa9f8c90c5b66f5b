//! Command-line argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "registry-images")]
#[command(about = "List and delete container images in a registry")]
#[command(version)]
pub struct Args {
    /// Registry domain credentials are issued for
    #[arg(long = "registry", global = true, help = "Registry domain")]
    pub registry: Option<String>,

    /// Explicit registry URL, overriding https://<registry>
    #[arg(
        long = "registry-url",
        global = true,
        help = "Registry base URL (defaults to https://<registry>)"
    )]
    pub registry_url: Option<String>,

    /// Static registry password
    #[arg(long = "password", global = true, help = "Registry password")]
    pub password: Option<String>,

    /// Credential service used to issue short-lived passwords
    #[arg(
        long = "credentials-api",
        global = true,
        help = "Base URL of the registry credential service"
    )]
    pub credentials_api: Option<String>,

    #[arg(
        long = "api-token",
        global = true,
        help = "API token for the credential service"
    )]
    pub api_token: Option<String>,

    /// Timeout in seconds for a single registry request
    #[arg(long = "timeout", short = 't', global = true, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    /// Skip TLS verification
    #[arg(
        long = "skip-tls",
        short = 'k',
        global = true,
        help = "Skip TLS certificate verification"
    )]
    pub skip_tls: bool,

    #[arg(long = "verbose", short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long = "quiet", short = 'q', global = true, help = "Only print results and errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Perform operations on images in the registry
    Images {
        #[command(subcommand)]
        command: ImagesCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ImagesCommand {
    /// List repositories and their tags
    List {
        #[arg(long = "filter", help = "Regex to filter repository names")]
        filter: Option<String>,

        #[arg(long = "include-digests", help = "Include digest tags in the output")]
        include_digests: bool,

        #[arg(long = "json", help = "Print the result as JSON")]
        json: bool,
    },
    /// Remove a tag, or every tag of a repository, from the registry
    Delete {
        #[arg(help = "Image to delete: <repository> or <repository>:<tag>")]
        image: String,

        #[arg(
            long = "concurrency",
            short = 'j',
            default_value = "1",
            value_parser = clap::value_parser!(u16).range(1..=64),
            help = "Number of tags deleted at the same time"
        )]
        concurrency: u16,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Fill options not given on the command line from environment variables
    pub fn from_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.registry.is_none() {
            self.registry = lookup("REGISTRY_DOMAIN");
        }

        if self.registry_url.is_none() {
            self.registry_url = lookup("REGISTRY_URL");
        }

        if self.password.is_none() {
            self.password = lookup("REGISTRY_PASSWORD");
        }

        if self.credentials_api.is_none() {
            self.credentials_api = lookup("REGISTRY_CREDENTIALS_API");
        }

        if self.api_token.is_none() {
            self.api_token = lookup("REGISTRY_API_TOKEN");
        }

        if self.timeout.is_none() {
            if let Some(t) = lookup("REGISTRY_TIMEOUT").and_then(|t| t.parse().ok()) {
                self.timeout = Some(t);
            }
        }

        // An explicit --quiet wins over a verbose environment
        if !self.quiet && env_flag(lookup("REGISTRY_VERBOSE")) {
            self.verbose = true;
        }

        if env_flag(lookup("REGISTRY_SKIP_TLS")) {
            self.skip_tls = true;
        }

        self
    }
}

fn env_flag(value: Option<String>) -> bool {
    match value {
        Some(value) => !matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_list_command() {
        let args = Args::try_parse_from([
            "registry-images",
            "images",
            "list",
            "--filter",
            "^team/",
            "--include-digests",
            "--json",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Images {
                command: ImagesCommand::List {
                    filter: Some("^team/".to_string()),
                    include_digests: true,
                    json: true,
                }
            }
        );
    }

    #[test]
    fn test_parse_delete_with_global_flags() {
        let args = Args::try_parse_from([
            "registry-images",
            "images",
            "delete",
            "demo:v1",
            "--password",
            "secret",
            "-j",
            "4",
        ])
        .unwrap();

        assert_eq!(args.password.as_deref(), Some("secret"));
        assert_eq!(
            args.command,
            Command::Images {
                command: ImagesCommand::Delete {
                    image: "demo:v1".to_string(),
                    concurrency: 4,
                }
            }
        );
    }

    #[test]
    fn test_delete_requires_image() {
        assert!(Args::try_parse_from(["registry-images", "images", "delete"]).is_err());
        assert!(
            Args::try_parse_from(["registry-images", "images", "delete", "demo", "-j", "0"]).is_err()
        );
    }

    #[test]
    fn test_env_fills_missing_options_only() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("REGISTRY_PASSWORD", "from-env"),
            ("REGISTRY_DOMAIN", "registry.example.com"),
            ("REGISTRY_TIMEOUT", "12"),
            ("REGISTRY_VERBOSE", "1"),
        ]);
        let args = Args::try_parse_from([
            "registry-images",
            "--registry",
            "cli.example.com",
            "images",
            "list",
        ])
        .unwrap()
        .with_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(args.registry.as_deref(), Some("cli.example.com"));
        assert_eq!(args.password.as_deref(), Some("from-env"));
        assert_eq!(args.timeout, Some(12));
        assert!(args.verbose);
        assert!(!args.skip_tls);
    }

    #[test]
    fn test_quiet_flag_beats_verbose_env() {
        let args = Args::try_parse_from(["registry-images", "-q", "images", "list"])
            .unwrap()
            .with_env(|key| (key == "REGISTRY_VERBOSE").then(|| "1".to_string()));

        assert!(args.quiet);
        assert!(!args.verbose);
    }

    #[test]
    fn test_false_env_flags_are_ignored() {
        let args = Args::try_parse_from(["registry-images", "images", "list"])
            .unwrap()
            .with_env(|key| match key {
                "REGISTRY_VERBOSE" => Some("0".to_string()),
                "REGISTRY_SKIP_TLS" => Some("false".to_string()),
                _ => None,
            });

        assert!(!args.verbose);
        assert!(!args.skip_tls);
    }
}
