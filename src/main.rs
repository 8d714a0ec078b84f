//! Command-line interface for dwca-model

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use dwca_model::{Extension, ExtensionParser, Location, Vocabulary, VocabularyParser};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "dwca-model")]
#[command(author, version, about = "Darwin Core extension and thesaurus inspector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an extension definition and display its properties
    Extension {
        /// File path or URL of the extension document
        #[arg(value_name = "LOCATION")]
        location: String,

        /// Mark the extension as a development version
        #[arg(long)]
        dev: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Parse a thesaurus definition and display its concepts
    Vocabulary {
        /// File path or URL of the thesaurus document
        #[arg(value_name = "LOCATION")]
        location: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extension { location, dev, json } => cmd_extension(&location, dev, json),
        Commands::Vocabulary { location, json } => cmd_vocabulary(&location, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_extension(location: &str, dev: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let location = Location::parse(location);
    let extension = ExtensionParser::new().parse_location(&location, dev)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&extension)?);
    } else {
        print_extension(&extension);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_vocabulary(location: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let location = Location::parse(location);
    let vocabulary = VocabularyParser::new().parse_location(&location)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vocabulary)?);
    } else {
        print_vocabulary(&vocabulary, "  ");
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("(none)")
}

#[cfg(feature = "cli")]
fn print_extension(extension: &Extension) {
    println!("dwca-model v{}", dwca_model::VERSION);
    println!();
    println!("Extension Information:");
    println!("  Title: {}", or_none(extension.title.as_deref()));
    println!("  Name: {}", or_none(extension.name.as_deref()));
    println!("  Namespace: {}", or_none(extension.namespace.as_deref()));
    match &extension.row_type {
        Some(term) => println!("  Row Type: {}", term.qualified_name()),
        None => println!("  Row Type: (none)"),
    }
    println!("  Source: {}", extension.url());
    if extension.dev {
        println!("  Status: development");
    }
    println!();
    println!("=== Properties ({}) ===", extension.properties().len());
    for property in extension.properties() {
        let flag = if property.required { " [required]" } else { "" };
        println!(
            "  {} : {}{}",
            or_none(property.qual_name.as_deref()),
            property.data_type.as_deref().unwrap_or("string"),
            flag
        );
        if let Some(vocabulary) = &property.vocabulary {
            println!(
                "    thesaurus: {} ({} concepts)",
                or_none(vocabulary.title.as_deref()),
                vocabulary.concepts.len()
            );
        }
    }
}

#[cfg(feature = "cli")]
fn print_vocabulary(vocabulary: &Vocabulary, indent: &str) {
    println!("Thesaurus: {}", or_none(vocabulary.title.as_deref()));
    if let Some(uri) = &vocabulary.uri {
        println!("URI: {}", uri);
    }
    println!();
    println!("=== Concepts ({}) ===", vocabulary.concepts.len());
    for concept in &vocabulary.concepts {
        let label = concept
            .preferred_term("en")
            .and_then(|t| t.title.as_deref());
        println!(
            "{}{} : {}",
            indent,
            or_none(concept.identifier.as_deref()),
            or_none(label)
        );
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
