//! github-login executable.

use anyhow::anyhow;
use github_login::api;
use github_login::github::AuthorizeUrls;
use github_login::views::Template;
use std::io::Write;
use std::process::ExitCode;
use termcolor::WriteColor;

mod logging;
mod params;
mod server;

use params::{Command, ConfigParams, Params, Parser};

/// Wrapper to handle errors.
///
/// See [`cli()`].
fn main() -> ExitCode {
    let params = Params::parse();
    cli(&params).unwrap_or_else(|error| {
        let error = format!("{error}\n");
        if error.to_lowercase().starts_with("error") {
            params.warn(error).unwrap();
        } else {
            params.warn(format!("Error: {error}")).unwrap();
        }

        ExitCode::FAILURE
    })
}

/// Do the actual work.
///
/// Returns the exit code to use.
///
/// # Errors
///
/// This returns any errors encountered during the run so that they can be
/// outputted nicely in [`main()`].
fn cli(params: &Params) -> anyhow::Result<ExitCode> {
    match &params.command {
        Command::Serve(serve_params) => {
            // Everything that can be checked is checked before binding.
            let config = serve_params.config.resolve()?;
            let home_template = Template::home()?;
            let log = logging::init(params.verbose);
            server::serve(&serve_params.bind, config, home_template, &log)?;
        }
        Command::Urls(config_params) => {
            print_urls(params, config_params)?;
        }
        Command::Openapi(openapi_params) => {
            generate_openapi(openapi_params)?;
        }
        Command::Version => {
            println!("{}", env!("GIT_VERSION"));
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the authorize URL for each redirect kind.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or output fails.
fn print_urls(
    params: &Params,
    config_params: &ConfigParams,
) -> anyhow::Result<()> {
    let config = config_params.resolve()?;
    let urls = AuthorizeUrls::build(&config.oauth, &config.endpoints)?;

    let mut out = params.out_stream();
    for (kind, url) in urls.iter() {
        out.set_color(&params::label_color())?;
        write!(out, "{kind:>6}")?;
        out.reset()?;
        writeln!(out, " {url}")?;
    }
    Ok(())
}

/// Generate `OpenAPI` specification.
///
/// Uses the trait-based API stub to generate the spec without requiring
/// an implementation.
///
/// # Errors
///
/// Returns an error if the `OpenAPI` spec cannot be generated or written.
fn generate_openapi(params: &params::OpenapiParams) -> anyhow::Result<()> {
    let api = api::login_api_mod::stub_api_description().map_err(|error| {
        anyhow!("Failed to create API description: {error}")
    })?;

    // Use version from Cargo.toml via CARGO_PKG_VERSION environment variable
    let version = semver::Version::parse(env!("CARGO_PKG_VERSION"))
        .expect("CARGO_PKG_VERSION should be valid semver");

    let spec = api.openapi("GitHub Login API", version);

    let json_value = spec.json()?;
    let json_string = serde_json::to_string_pretty(&json_value)?;

    if let Some(output_path) = &params.output {
        std::fs::write(output_path, format!("{json_string}\n"))?;
    } else {
        println!("{json_string}");
    }

    Ok(())
}
