//! Render a template document into the recording backend and print the
//! draw log, followed by every collected diagnostic.
//!
//! Usage: `cargo run --example render_card -- card.toml [composites-dir]`

use cardstock::{CompositeLibrary, LayerDefaults, Recorder, RenderContext, load_template, render_template};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let source = match args.next() {
        Some(path) => std::fs::read_to_string(&path).map_err(|e| miette::miette!("{path}: {e}"))?,
        None => DEFAULT_CARD.to_string(),
    };

    let mut library = match args.next() {
        Some(dir) => CompositeLibrary::load_dir(&dir)?,
        None => CompositeLibrary::new(),
    };
    // Definitions inside the card win over the shared directory
    library.merge(CompositeLibrary::from_toml(&source)?);

    let template = load_template(&source, &LayerDefaults::default())?;
    let ctx = RenderContext::new().with_library(library);
    let mut recorder = Recorder::new();
    let reports = render_template(&template, &ctx, &mut recorder)?;

    print!("{}", recorder.log());
    for report in reports {
        for error in report.errors {
            eprintln!("{:?}", miette::Report::new(error));
        }
        for warning in report.warnings {
            eprintln!("{:?}", miette::Report::new(warning));
        }
    }
    Ok(())
}

const DEFAULT_CARD: &str = r##"
name = "hello"

[[regions]]
name = "front"
x = 0
y = 0
width = 5
height = 7

[[regions.shapes]]
type = "rectangle"
x = 0
y = 0
width = 5
height = 7
fill_color = "#FFF8E7"

[[regions.texts]]
content = "Hello"
x = 1
y = 3
font_size = 36
"##;
