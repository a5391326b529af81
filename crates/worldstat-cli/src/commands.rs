use anyhow::Result;
use comfy_table::Table;
use tracing::{info_span, warn};

use worldstat_ingest::read_raw_table;
use worldstat_model::{ClassifierConfig, PipelineOptions};
use worldstat_output::WriteOptions;
use worldstat_transform::data_utils::column_names;
use worldstat_transform::{TableShape, detect_shape};

use worldstat_cli::pipeline::{ingest, run};
use worldstat_cli::summary::{apply_table_style, write_summary_json};
use worldstat_cli::types::{RunConfig, RunResult};

use crate::cli::{FilesArgs, RunArgs};

pub fn run_integrate(args: &RunArgs) -> Result<RunResult> {
    let config = run_config(args);
    let result = run(&config)?;
    if let Some(path) = &args.summary_json {
        write_summary_json(&result.summary, path)?;
    }
    Ok(result)
}

fn run_config(args: &RunArgs) -> RunConfig {
    let classifier = ClassifierConfig::default()
        .with_sample_size(args.sample_size)
        .with_population_threshold(args.population_threshold);
    let pipeline = PipelineOptions::new()
        .with_classifier(classifier)
        .with_duplicate_measures(args.duplicate_measures.into());
    RunConfig {
        pipeline,
        write: WriteOptions {
            mode: args.mode.into(),
            partition_by_year: !args.no_partition,
        },
        jobs: args.jobs,
        dry_run: args.dry_run,
        ..RunConfig::new(&args.raw_dir, &args.out_dir)
    }
}

pub fn run_files(args: &FilesArgs) -> Result<()> {
    let span = info_span!("files", raw_dir = %args.raw_dir.display());
    let _guard = span.enter();

    let files = ingest(&args.raw_dir)?;
    let mut table = Table::new();
    table.set_header(vec!["File", "Hint", "Layout", "Rows"]);
    apply_table_style(&mut table);
    for file in files {
        let (layout, rows) = match read_raw_table(&file.path) {
            Ok(raw) => {
                let layout = match detect_shape(&column_names(&raw)) {
                    Ok(TableShape::Long) => "long".to_string(),
                    Ok(TableShape::Wide { year_columns }) => {
                        format!("wide ({} years)", year_columns.len())
                    }
                    Err(error) => error.to_string(),
                };
                (layout, raw.height().to_string())
            }
            Err(error) => {
                warn!(file = %file.name(), %error, "failed to read file");
                (error.to_string(), "-".to_string())
            }
        };
        table.add_row(vec![
            file.name(),
            format!("{:?}", file.hint).to_lowercase(),
            layout,
            rows,
        ]);
    }
    println!("{table}");
    Ok(())
}
