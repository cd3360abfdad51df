use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;

use crate::{
    cli::FetchArgs,
    models::{
        AppError, CategoriesResponse, FetchResponse, IconOutcome, OutputMode, QueryEnvelope,
    },
};

const COMMONS_API: &str = "https://commons.wikimedia.org/w/api.php";

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

// MediaWiki namespace for uploaded media files
const FILE_NAMESPACE: &str = "6";

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "svg"];

pub const DEFAULT_CATEGORIES: [&str; 33] = [
    "Academic disciplines",
    "Behavior",
    "Business",
    "Communication",
    "Concepts",
    "Culture",
    "Economy",
    "Education",
    "Energy",
    "Engineering",
    "Entities",
    "Food and Drink",
    "Geography",
    "Government",
    "Humanities",
    "Information",
    "Knowledge",
    "Language",
    "Law",
    "Life",
    "Lists",
    "Mass media",
    "Mathematics",
    "Nature",
    "People",
    "Philosophy",
    "Politics",
    "Religion",
    "Science",
    "Society",
    "Technology",
    "Time",
    "Universe",
];

struct FetchConfig {
    endpoint: String,
    out: PathBuf,
    categories: Vec<String>,
    width: u32,
    timeout: Duration,
}

fn api_endpoint() -> String {
    std::env::var("COMMONS_ICONS_TEST_ENDPOINT").unwrap_or_else(|_| COMMONS_API.to_string())
}

enum Outcome {
    Saved { file: String },
    NotFound { reason: &'static str },
}

pub fn fetch(args: &FetchArgs, mode: &OutputMode) -> Result<(), AppError> {
    let categories = if args.categories.is_empty() {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    } else {
        args.categories.clone()
    };

    let config = FetchConfig {
        endpoint: api_endpoint(),
        out: args.out.clone(),
        categories,
        width: args.width,
        timeout: Duration::from_secs(args.timeout_secs),
    };

    fs::create_dir_all(&config.out)
        .map_err(|err| AppError::OutputDir(err.to_string()))?;

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout)
        .build()
        .map_err(|_| AppError::Request)?;

    let mut items = Vec::with_capacity(config.categories.len());
    let mut saved = 0usize;

    // One category at a time; a failure here never aborts the run.
    for category in &config.categories {
        progress(mode, &format!("Processing: {category}"));

        let outcome = match fetch_category(&client, &config, category, mode) {
            Ok(Outcome::Saved { file }) => {
                if !mode.json {
                    println!("  Saved: {file}");
                }
                saved += 1;
                IconOutcome {
                    category: category.clone(),
                    status: "saved".to_string(),
                    file,
                    detail: String::new(),
                }
            }
            Ok(Outcome::NotFound { reason }) => {
                if !mode.json {
                    println!("  {reason}");
                }
                IconOutcome {
                    category: category.clone(),
                    status: "not-found".to_string(),
                    file: String::new(),
                    detail: reason.to_string(),
                }
            }
            Err(err) => {
                if !mode.json {
                    println!("  Error: {err}");
                }
                IconOutcome {
                    category: category.clone(),
                    status: "error".to_string(),
                    file: String::new(),
                    detail: err.to_string(),
                }
            }
        };

        items.push(outcome);
    }

    if mode.json {
        let response = FetchResponse {
            ok: true,
            count: items.len(),
            saved,
            items,
        };
        print_json(&response).map_err(|_| AppError::Parse)?;
    }

    Ok(())
}

pub fn categories(mode: &OutputMode) -> Result<(), AppError> {
    let items: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();

    if mode.json {
        let response = CategoriesResponse {
            ok: true,
            count: items.len(),
            items,
        };
        print_json(&response).map_err(|_| AppError::Parse)?;
    } else {
        if !mode.quiet {
            println!("{} categories", items.len());
        }
        for item in &items {
            println!("{item}");
        }
    }

    Ok(())
}

/// Resolve one icon for `category`: direct page-image lookup first, then a
/// file-namespace search with image-info resolution. Soft misses become
/// `Outcome::NotFound`; only network/parse/IO failures return `Err`.
fn fetch_category(
    client: &Client,
    config: &FetchConfig,
    category: &str,
    mode: &OutputMode,
) -> anyhow::Result<Outcome> {
    if let Some(url) = lookup_page_thumbnail(client, config, category, mode)? {
        progress(mode, &format!("  Found thumbnail: {url}"));
        let file = download_and_save(client, config, category, &url, mode)?;
        return Ok(Outcome::Saved { file });
    }

    progress(mode, "  No thumbnail found, searching for related images...");

    let Some(title) = search_file_title(client, config, category, mode)? else {
        return Ok(Outcome::NotFound {
            reason: "No images found in search",
        });
    };
    progress(mode, &format!("  Found image: {title}"));

    let Some(url) = lookup_image_info(client, config, &title, mode)? else {
        return Ok(Outcome::NotFound {
            reason: "No image info found",
        });
    };

    let file = download_and_save(client, config, category, &url, mode)?;
    Ok(Outcome::Saved { file })
}

fn lookup_page_thumbnail(
    client: &Client,
    config: &FetchConfig,
    category: &str,
    mode: &OutputMode,
) -> anyhow::Result<Option<String>> {
    let mut url = Url::parse(&config.endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("action", "query")
            .append_pair("titles", &format!("Category:{}", category.replace(' ', "_")))
            .append_pair("prop", "pageimages")
            .append_pair("pithumbsize", &config.width.to_string())
            .append_pair("format", "json")
            .append_pair("formatversion", "2");
    }

    let envelope = fetch_envelope(client, url, mode)?;
    let source = envelope
        .query
        .and_then(|body| body.pages)
        .and_then(|pages| pages.into_iter().next())
        .and_then(|page| page.thumbnail)
        .and_then(|thumb| thumb.source);

    Ok(source)
}

fn search_file_title(
    client: &Client,
    config: &FetchConfig,
    category: &str,
    mode: &OutputMode,
) -> anyhow::Result<Option<String>> {
    let mut url = Url::parse(&config.endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", category)
            .append_pair("srnamespace", FILE_NAMESPACE)
            .append_pair("srlimit", "1")
            .append_pair("format", "json")
            .append_pair("formatversion", "2");
    }

    let envelope = fetch_envelope(client, url, mode)?;
    let title = envelope
        .query
        .and_then(|body| body.search)
        .and_then(|hits| hits.into_iter().next())
        .map(|hit| hit.title);

    Ok(title)
}

fn lookup_image_info(
    client: &Client,
    config: &FetchConfig,
    title: &str,
    mode: &OutputMode,
) -> anyhow::Result<Option<String>> {
    let mut url = Url::parse(&config.endpoint)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("action", "query")
            .append_pair("titles", title)
            .append_pair("prop", "imageinfo")
            .append_pair("iiprop", "url")
            .append_pair("iiurlwidth", &config.width.to_string())
            .append_pair("format", "json")
            .append_pair("formatversion", "2");
    }

    let envelope = fetch_envelope(client, url, mode)?;
    let url = envelope
        .query
        .and_then(|body| body.pages)
        .and_then(|pages| pages.into_iter().next())
        .and_then(|page| page.imageinfo)
        .and_then(|infos| infos.into_iter().next())
        .and_then(|info| info.thumburl.or(info.url));

    Ok(url)
}

fn fetch_envelope(client: &Client, url: Url, mode: &OutputMode) -> anyhow::Result<QueryEnvelope> {
    if mode.verbose {
        eprintln!("debug: request_url={url}");
    }
    let envelope = client
        .get(url)
        .send()?
        .error_for_status()?
        .json::<QueryEnvelope>()?;
    Ok(envelope)
}

fn download_and_save(
    client: &Client,
    config: &FetchConfig,
    category: &str,
    url: &str,
    mode: &OutputMode,
) -> anyhow::Result<String> {
    if mode.verbose {
        eprintln!("debug: download_url={url}");
    }
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;

    let file = format!("{category}.{}", extension_for(url));
    fs::write(config.out.join(&file), &bytes)?;
    Ok(file)
}

/// Sniff an extension from the URL's suffix, stripping any query string.
/// Anything outside the whitelist falls back to `jpg`.
fn extension_for(url: &str) -> &str {
    let candidate = url
        .rsplit('.')
        .next()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("");

    if ALLOWED_EXTENSIONS.contains(&candidate) {
        candidate
    } else {
        "jpg"
    }
}

fn progress(mode: &OutputMode, line: &str) {
    if !mode.json && !mode.quiet {
        println!("{line}");
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
