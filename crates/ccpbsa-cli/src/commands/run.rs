use crate::cli::RunArgs;
use crate::config::RunConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ccpbsa::core::config::flags::ToolFlags;
use ccpbsa::core::energy::delta::DeltaTable;
use ccpbsa::core::energy::table::EnergyTable;
use ccpbsa::core::models::mutation::parse_mutation_list;
use ccpbsa::engine::config::RunMode;
use ccpbsa::engine::progress::ProgressReporter;
use ccpbsa::engine::runner::SystemRunner;
use ccpbsa::workflows::{self, PipelineContext};
use std::path::Path;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let config = RunConfig::from_file(&args.config)?.merge_with_cli(&args);
    let flags = ToolFlags::load(&config.flags)?;
    let mutations = parse_mutation_list(&config.mutations)?;
    let settings = config.settings()?;

    info!(
        structure = %config.structure.display(),
        mutations = mutations.len(),
        "Run configuration loaded"
    );

    let runner = SystemRunner;
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let context = PipelineContext {
        runner: &runner,
        flags: &flags,
        settings: &settings,
        coefficients: config.coefficients,
        reporter: &reporter,
    };

    let parent = config.workspace_parent();
    let reference_key = config.reference_key()?;

    let (root, ddg) = match settings.mode {
        RunMode::Stability => {
            let gxg_path = config.gxg_table.as_ref().ok_or_else(|| {
                CliError::Config(
                    "stability mode requires 'gxg-table' (generate one with the 'gxg' command)"
                        .to_string(),
                )
            })?;
            let gxg = EnergyTable::read_csv(gxg_path)?;
            println!("Starting stability run for '{reference_key}'...");
            let outcome = workflows::stability::run(
                &context,
                &parent,
                &reference_key,
                &config.structure,
                &mutations,
                &gxg,
            )?;
            (outcome.workspace_root, outcome.ddg)
        }
        RunMode::Binding => {
            println!("Starting binding-affinity run for '{reference_key}'...");
            let outcome = workflows::binding::run(
                &context,
                &parent,
                &reference_key,
                &config.structure,
                &mutations,
            )?;
            (outcome.workspace_root, outcome.ddg)
        }
    };

    print_summary(&root, &ddg);
    Ok(())
}

fn print_summary(root: &Path, ddg: &DeltaTable) {
    println!("\nPredicted free energy differences:");
    for row in ddg.rows() {
        println!("  {:<12} ddG = {:9.2} kJ/mol", row.key, row.calc);
    }
    println!(
        "\nTables written to {} ({}, {}, {})",
        root.display(),
        workflows::G_TABLE,
        workflows::DG_TABLE,
        workflows::DDG_TABLE,
    );
}
