//! `dmpub publish`: authenticate, then reconcile download and version.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use dmpub_core::{Publication, PublishingClient, WordPressDate, artifact_url};

use crate::cli::{GlobalOpts, OutputFormat, PublishArgs};
use crate::config;
use crate::error::CliError;
use crate::output::{self, DetailRow};

pub async fn handle(args: PublishArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = config::resolve_target(global)?;

    let url = match (args.url, args.remote_folder, args.file) {
        (Some(url), _, _) => url,
        (None, Some(folder), Some(file)) => artifact_url(&target.config.site, &folder, &file)?,
        _ => {
            return Err(CliError::Validation {
                field: "url".into(),
                reason: "pass --url, or --remote-folder together with --file".into(),
            });
        }
    };

    let mut client = PublishingClient::new(target.config)?;
    let spinner = spinner(global);

    spinner.set_message(format!("Authenticating with {}", client.site()));
    let result = async {
        client.authenticate(&target.credentials).await?;
        spinner.set_message(format!("Publishing {} {}", args.title, args.release));
        client.publish(&args.title, &args.release, &url).await
    }
    .await;
    spinner.finish_and_clear();

    let publication = result.map_err(|e| CliError::from(e).with_profile(&target.profile_name))?;
    report(&publication, &target.output, global)
}

fn report(
    publication: &Publication,
    format: &OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let version = &publication.version;
    let message = if publication.version_created {
        format!("published version {} (id {})", version.version, version.id)
    } else {
        format!("version {} already published (id {})", version.version, version.id)
    };
    output::status(&global.color, global.quiet, &message);

    let out = output::render_single(format, publication, detail_rows, |p| {
        p.version.id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail_rows(p: &Publication) -> Vec<DetailRow> {
    let created = |yes: bool| if yes { "created" } else { "existing" };
    let download = &p.download;
    let version = &p.version;

    vec![
        DetailRow::new("Download ID", download.id.to_string()),
        DetailRow::new("Title", download.title.clone().unwrap_or_default()),
        DetailRow::new("Download", created(p.download_created)),
        DetailRow::new("Version ID", version.id.to_string()),
        DetailRow::new("Version", version.version.clone()),
        DetailRow::new("URL", version.url.clone()),
        DetailRow::new("Version record", created(p.version_created)),
        DetailRow::new(
            "Date",
            version
                .date
                .as_ref()
                .and_then(WordPressDate::parsed)
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
    ]
}

/// Spinner on stderr, hidden when quiet or not attached to a terminal.
fn spinner(global: &GlobalOpts) -> ProgressBar {
    if global.quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
