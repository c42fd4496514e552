//! Code to deal with executable parameters.

use github_login::config::{Config, Settings};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

pub use clap::Parser;

/// Server side of a “login with GitHub” OAuth flow
#[derive(Debug, clap::Parser)]
#[clap(version, about)]
pub struct Params {
    /// Whether or not to output in color
    #[clap(long, default_value = "auto", value_name = "WHEN", global = true)]
    pub color: ColorChoice,

    /// Verbosity (may be repeated up to two times)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Start the server
    Serve(ServeParams),
    /// Print the GitHub authorize URLs
    Urls(ConfigParams),
    /// Generate `OpenAPI` specification
    Openapi(OpenapiParams),
    /// Print version
    Version,
}

/// Parameters for the `serve` subcommand
#[derive(Debug, clap::Args)]
pub struct ServeParams {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// OAuth configuration
    #[command(flatten)]
    pub config: ConfigParams,
}

/// Configuration sources shared by subcommands that talk to GitHub
#[derive(Debug, clap::Args)]
pub struct ConfigParams {
    /// TOML configuration file (flags and environment take precedence)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GitHub client ID for OAuth
    #[arg(long, env = "GITHUB_OAUTH_CLIENT_ID")]
    pub client_id: Option<String>,

    /// GitHub client secret for OAuth
    #[arg(long, env = "GITHUB_OAUTH_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Callback URL registered with GitHub (`info`, `emails`, or `orgs` is
    /// appended)
    #[arg(long, env = "GITHUB_OAUTH_REDIRECT_URL", value_name = "URL")]
    pub redirect_url: Option<String>,

    /// Seconds to wait for GitHub before giving up (0 to wait forever)
    #[arg(long, env = "GITHUB_OAUTH_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl ConfigParams {
    /// Load the configuration file, if any, and layer flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can’t be loaded or the result is
    /// incomplete or invalid.
    pub fn resolve(&self) -> anyhow::Result<Config> {
        let file = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let flags = Settings {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_url: self.redirect_url.clone(),
            timeout: self.timeout,
            ..Settings::default()
        };

        Ok(file.merge(flags).resolve()?)
    }
}

/// Parameters for the `openapi` subcommand
#[derive(Debug, clap::Args)]
pub struct OpenapiParams {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl Params {
    /// Print a warning message in error color to `err_stream()`.
    pub fn warn<S: AsRef<str>>(&self, message: S) -> io::Result<()> {
        let mut err_out = self.err_stream();
        err_out.set_color(&error_color())?;
        err_out.write_all(message.as_ref().as_bytes())?;
        err_out.reset()?;

        Ok(())
    }

    /// Get stream to use for standard output.
    pub fn out_stream(&self) -> StandardStream {
        StandardStream::stdout(self.color_choice(&io::stdout()))
    }

    /// Get stream to use for errors.
    pub fn err_stream(&self) -> StandardStream {
        StandardStream::stderr(self.color_choice(&io::stderr()))
    }

    /// Whether or not to output on a stream in color.
    ///
    /// Checks if passed stream is a terminal.
    pub fn color_choice<T: IsTerminal>(
        &self,
        stream: &T,
    ) -> termcolor::ColorChoice {
        if self.color == ColorChoice::Auto && !stream.is_terminal() {
            termcolor::ColorChoice::Never
        } else {
            self.color.into()
        }
    }
}

/// Whether or not to output in color
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Output in color when running in a terminal that supports it
    #[default]
    Auto,

    /// Always output in color
    Always,

    /// Never output in color
    Never,
}

impl From<ColorChoice> for termcolor::ColorChoice {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// Returns color used to output errors.
pub fn error_color() -> ColorSpec {
    let mut color = ColorSpec::new();
    color.set_fg(Some(Color::Red));
    color.set_intense(true);
    color
}

/// Returns color used to label output.
pub fn label_color() -> ColorSpec {
    let mut color = ColorSpec::new();
    color.set_fg(Some(Color::Cyan));
    color.set_bold(true);
    color
}
