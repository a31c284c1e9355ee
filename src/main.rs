use anyhow::{Context, Result};
use clap::Parser;

use paperclip::cli::{Args, Command};
use paperclip::config::Settings;
use paperclip::{pick, DirectorySink, PdfiumRasterizer, ProgressState, RunContext, Workspace};

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::from_args(&args);

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(settings.log_level)
        .init();

    let inputs = pick(args.command.inputs()).with_context(|| "Failed to read input files")?;
    if inputs.is_empty() {
        anyhow::bail!("No input files found");
    }

    let context = RunContext::new().with_observer(Box::new(|state: &ProgressState| {
        if !state.message.is_empty() {
            eprintln!("{}", state);
        }
    }));
    let mut workspace = Workspace::with_context(context);
    let added = workspace.select(inputs);
    log::info!("Selected {} files", added);

    let mut sink = DirectorySink::new(&settings.output_dir);

    let artifact = match &args.command {
        Command::Combine { .. } => {
            let options = args.command.combine_options().unwrap_or_default();
            workspace
                .combine(options, &mut sink)
                .with_context(|| "Failed to combine PDFs")?
        }
        Command::Compress { .. } => {
            let options = args.command.compress_options().unwrap_or_default();
            let rasterizer = PdfiumRasterizer::new(settings.pdfium_library_dir.as_deref())
                .with_context(|| "Failed to load the PDFium library")?;
            workspace
                .compress(options, &rasterizer, &mut sink)
                .with_context(|| "Failed to compress PDFs")?
        }
        Command::Zip { .. } => {
            let options = args.command.zip_options().unwrap_or_default();
            workspace
                .zip(options, &mut sink)
                .with_context(|| "Failed to build archive")?
        }
    };

    println!(
        "Successfully wrote {} ({} bytes) to {}",
        artifact.file_name,
        artifact.len(),
        settings.output_dir.display()
    );

    Ok(())
}
