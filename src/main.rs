use clap::Parser;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use wtkx::{CliError, FilesystemResourceProvider, JsonResourceBundleLoader, Locale, Serializer};

/// Reads a WTKX document and prints the resulting object graph as JSON.
///
/// Only the builtin collection types (`wtkx.collections.HashMap` and
/// `wtkx.collections.ArrayList`) are available to documents read this way.
#[derive(Parser, Debug)]
#[command(name = "wtkx", version)]
struct Args {
    /// Document to read, relative to the root directory.
    document: String,

    /// Directory that documents, includes and resource bundles are loaded from.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Resource bundle base name, e.g. `demo.Strings` for `demo/Strings.json`.
    #[arg(long)]
    resources: Option<String>,

    /// Locale used to select bundle overlays, e.g. `fr_CA`.
    #[arg(long)]
    locale: Option<String>,

    /// Print only the object with this id (dotted paths reach into includes).
    #[arg(long)]
    id: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let documents = Arc::new(FilesystemResourceProvider::new(&args.root));
    let mut builder = Serializer::builder()
        .with_documents(documents.clone())
        .with_bundle_loader(Rc::new(JsonResourceBundleLoader::new(documents)));
    if let Some(tag) = &args.locale {
        builder = builder.with_locale(tag.parse::<Locale>()?);
    }
    let mut serializer = builder.build();

    if let Some(base_name) = &args.resources {
        let bundle = serializer.load_bundle(base_name, None)?;
        serializer = serializer.with_resources(Some(bundle));
    }

    log::info!("Reading {} from {}", args.document, args.root.display());
    let document = serializer.read(&args.document)?;
    let value = match &args.id {
        Some(id) => document.get(id).ok_or_else(|| CliError::UnknownId(id.clone()))?,
        None => document.root().clone(),
    };

    println!("{}", serde_json::to_string_pretty(&wtkx::dump::to_json(&value))?);
    Ok(())
}
