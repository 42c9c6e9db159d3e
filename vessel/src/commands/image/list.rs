//! `image list`: show the images an engine holds.

use crate::cli::{ArgPolicy, CommandDescriptor, CommandError, FlagSet, Handler, RegistrationError};
use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use clap::{Arg, ValueEnum, value_parser};
use libvessel::EngineMode;
use libvessel::image::{ImageFilter, ImageListOptions, ImageSummary, NONE_LABEL};
use std::collections::HashSet;
use tabled::builder::Builder;
use tabled::settings::Style;

const EXAMPLE: &str = "vessel image list --format json
  vessel image list --sort repository --format yaml
  vessel image list --filter dangling=true";

/// Column the listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    /// Newest first
    #[default]
    Created,
    Id,
    Repository,
    Size,
    Tag,
}

/// Flags of `image list`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub all: bool,
    pub digests: bool,
    pub filters: Vec<String>,
    /// Falls back to the configured style when absent
    pub format: Option<OutputFormat>,
    pub noheading: bool,
    pub no_trunc: bool,
    pub quiet: bool,
    pub sort: SortKey,
}

impl Formattable for ImageSummary {
    fn format_pretty(&self) -> String {
        format!("{} {}", self.reference(), self.short_id())
    }
}

pub fn flag_set() -> FlagSet<ListOptions> {
    FlagSet::<ListOptions>::new()
        .bool_flag(
            Arg::new("all")
                .long("all")
                .short('a')
                .help("Show all images, including intermediate images"),
            |o| &mut o.all,
        )
        .bool_flag(
            Arg::new("digests")
                .long("digests")
                .help("Show image digests"),
            |o| &mut o.digests,
        )
        .strings_flag(
            Arg::new("filter")
                .long("filter")
                .short('f')
                .value_name("FILTER")
                .help("Filter output based on conditions provided (reference=, dangling=)"),
            |o| &mut o.filters,
        )
        .flag(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["pretty", "json", "yaml"])
                .help("Output format"),
            |matches, o| {
                o.format = matches
                    .get_one::<String>("format")
                    .map(|f| OutputFormat::from(f.as_str()));
            },
        )
        .bool_flag(
            Arg::new("noheading")
                .long("noheading")
                .short('n')
                .help("Do not print column headings"),
            |o| &mut o.noheading,
        )
        .bool_flag(
            Arg::new("no-trunc")
                .long("no-trunc")
                .help("Do not truncate output"),
            |o| &mut o.no_trunc,
        )
        .bool_flag(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Display only image IDs"),
            |o| &mut o.quiet,
        )
        .flag(
            Arg::new("sort")
                .long("sort")
                .value_name("KEY")
                .value_parser(value_parser!(SortKey))
                .default_value("created")
                .help("Sort by created, id, repository, size or tag"),
            |matches, o| {
                o.sort = matches.get_one::<SortKey>("sort").copied().unwrap_or_default();
            },
        )
}

pub fn descriptor() -> Result<CommandDescriptor, RegistrationError> {
    let flags = FlagSet::compose("image list", flag_set(), Vec::new())?;
    let args = flags.args();

    Ok(CommandDescriptor::new("list [flags] [IMAGE]")
        .parent("image")
        .aliases(["ls"])
        .short("List images in local storage")
        .long("Lists images previously pulled to the system or created on the system.")
        .example(EXAMPLE)
        .args(ArgPolicy::Maximum(1))
        .flags(args)
        .handler(Handler::new(move |ctx, invocation| {
            let mut options = ListOptions::default();
            flags.bind(&invocation.matches, &mut options);

            let output = run(ctx, &options, &invocation.args)?;
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(())
        }))
        .modes(EngineMode::ALL))
}

/// Lists images and renders them; `args` holds at most one reference pattern.
pub fn run(ctx: &AppContext, options: &ListOptions, args: &[String]) -> Result<String, CommandError> {
    let request = list_request(options, args)?;
    tracing::debug!(
        all = request.all,
        filters = request.filters.len(),
        "listing images"
    );

    let mut images = ctx.images.list(&ctx.cancel, &request)?;
    sort_images(&mut images, options.sort);

    if options.quiet {
        return Ok(quiet_ids(&images, options.no_trunc).join("\n"));
    }

    match options.format.unwrap_or(ctx.config.style.format) {
        OutputFormat::Pretty => Ok(render_table(&images, options)),
        format => format::format_output_vec(&images, format).map_err(CommandError::Output),
    }
}

fn list_request(options: &ListOptions, args: &[String]) -> Result<ImageListOptions, CommandError> {
    let mut filters = options
        .filters
        .iter()
        .map(|f| ImageFilter::parse(f))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CommandError::usage(e.to_string()))?;

    if let Some(reference) = args.first() {
        filters.push(ImageFilter::Reference(reference.clone()));
    }

    Ok(ImageListOptions {
        all: options.all,
        filters,
    })
}

fn sort_images(images: &mut [ImageSummary], key: SortKey) {
    match key {
        SortKey::Created => images.sort_by(|a, b| b.created.cmp(&a.created)),
        SortKey::Id => images.sort_by(|a, b| a.id.cmp(&b.id)),
        SortKey::Repository => {
            images.sort_by(|a, b| (&a.repository, &a.tag).cmp(&(&b.repository, &b.tag)))
        }
        SortKey::Size => images.sort_by_key(|image| image.size),
        SortKey::Tag => images.sort_by(|a, b| (&a.tag, &a.repository).cmp(&(&b.tag, &b.repository))),
    }
}

fn display_id(image: &ImageSummary, no_trunc: bool) -> &str {
    if no_trunc {
        image.full_id()
    } else {
        image.short_id()
    }
}

/// Each image id once, in listing order.
fn quiet_ids(images: &[ImageSummary], no_trunc: bool) -> Vec<String> {
    let mut seen = HashSet::new();
    images
        .iter()
        .map(|image| display_id(image, no_trunc))
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

fn render_table(images: &[ImageSummary], options: &ListOptions) -> String {
    let mut builder = Builder::default();

    if !options.noheading {
        let mut header = vec!["REPOSITORY", "TAG"];
        if options.digests {
            header.push("DIGEST");
        }
        header.extend(["IMAGE ID", "CREATED", "SIZE"]);
        builder.push_record(header.into_iter().map(String::from));
    }

    for image in images {
        let mut row = vec![image.repository.clone(), image.tag.clone()];
        if options.digests {
            row.push(image.digest.clone().unwrap_or_else(|| NONE_LABEL.to_string()));
        }
        row.push(display_id(image, options.no_trunc).to_string());
        row.push(format::format_age(&image.created));
        row.push(format::format_size(image.size));
        builder.push_record(row);
    }

    builder.build().with(Style::empty()).to_string()
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
